//! Card primitives.
//!
//! A `Card` is one classifiable statement in a round. It belongs to exactly
//! one ledger and has exactly one correct category; the exclusion categories
//! (`NotProduction`, `NotExpenditure`, `NotIncome`) mark distractors whose
//! amounts count toward no aggregate.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Millions;

/// The three independent approaches to aggregating the same economic total.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ledger {
    Production,
    Expenditure,
    Income,
}

impl Ledger {
    pub const ALL: [Ledger; 3] = [Ledger::Production, Ledger::Expenditure, Ledger::Income];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Expenditure => "expenditure",
            Self::Income => "income",
        }
    }
}

/// A classification target within one ledger.
///
/// Every category belongs to exactly one [`Ledger`]. The `Not*` variants are
/// the per-ledger exclusion bins: a card whose correct category is an
/// exclusion bin is a distractor and never contributes to any total.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    // Production ledger
    Output,
    IntermediateInput,
    NotProduction,
    // Expenditure ledger
    Consumption,
    Investment,
    Government,
    Exports,
    Imports,
    NotExpenditure,
    // Income ledger
    Wages,
    Profits,
    NotIncome,
}

impl Category {
    /// The ledger this category belongs to.
    #[must_use]
    pub const fn ledger(self) -> Ledger {
        match self {
            Self::Output | Self::IntermediateInput | Self::NotProduction => Ledger::Production,
            Self::Consumption
            | Self::Investment
            | Self::Government
            | Self::Exports
            | Self::Imports
            | Self::NotExpenditure => Ledger::Expenditure,
            Self::Wages | Self::Profits | Self::NotIncome => Ledger::Income,
        }
    }

    /// Whether amounts filed under this category enter an aggregate formula.
    ///
    /// False exactly for the three exclusion bins.
    #[must_use]
    pub const fn counts(self) -> bool {
        !matches!(
            self,
            Self::NotProduction | Self::NotExpenditure | Self::NotIncome
        )
    }

    /// The exclusion bin of a ledger.
    #[must_use]
    pub const fn exclusion_for(ledger: Ledger) -> Category {
        match ledger {
            Ledger::Production => Self::NotProduction,
            Ledger::Expenditure => Self::NotExpenditure,
            Ledger::Income => Self::NotIncome,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Output => "output",
            Self::IntermediateInput => "intermediate_input",
            Self::NotProduction => "not_production",
            Self::Consumption => "consumption",
            Self::Investment => "investment",
            Self::Government => "government",
            Self::Exports => "exports",
            Self::Imports => "imports",
            Self::NotExpenditure => "not_expenditure",
            Self::Wages => "wages",
            Self::Profits => "profits",
            Self::NotIncome => "not_income",
        }
    }
}

/// Secondary marker used only by the targeted investment check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    FixedInvestment,
    InventoryChange,
}

/// One classifiable statement. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Unique within a round; drawn from the round's seeded RNG so a seed
    /// reproduces the full scenario, ids included.
    pub id: Uuid,
    pub ledger: Ledger,
    pub amount: Millions,
    pub text: String,
    pub correct_bin: Category,
    pub kind: Option<CardKind>,
}

impl Card {
    /// True when the card's correct category is its ledger's exclusion bin.
    #[must_use]
    pub fn is_distractor(&self) -> bool {
        !self.correct_bin.counts()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_category_maps_to_its_ledger() {
        assert_eq!(Category::Output.ledger(), Ledger::Production);
        assert_eq!(Category::IntermediateInput.ledger(), Ledger::Production);
        assert_eq!(Category::Consumption.ledger(), Ledger::Expenditure);
        assert_eq!(Category::Imports.ledger(), Ledger::Expenditure);
        assert_eq!(Category::Wages.ledger(), Ledger::Income);
        assert_eq!(Category::NotIncome.ledger(), Ledger::Income);
    }

    #[test]
    fn exclusion_bins_do_not_count() {
        for ledger in Ledger::ALL {
            let bin = Category::exclusion_for(ledger);
            assert_eq!(bin.ledger(), ledger);
            assert!(!bin.counts());
        }
        assert!(Category::Investment.counts());
        assert!(Category::Profits.counts());
    }
}
