//! The reconciliation engine.
//!
//! `check` recomputes the three ledger totals and per-card correctness from
//! the card data and the caller's placement. It is pure: totals always derive
//! from the model, never from anything the view rendered, and two calls with
//! the same inputs return the same report.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Category, Ledger, Millions, Placement, Scenario};

/// Below-or-equal gap that counts as reconciled. Integer arithmetic leaves no
/// rounding slack, so the tolerance is zero; the constant keeps the policy
/// explicit.
pub const GAP_TOLERANCE: Millions = Millions::ZERO;

/// Coarse outcome of one check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    /// No card has been placed yet; there is nothing to verify.
    NothingPlaced,
    /// Cards are placed but the ledger totals still disagree.
    GapOpen,
    /// The three totals agree within [`GAP_TOLERANCE`].
    Reconciled,
}

/// Everything the view layer needs after a placement change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Sum of placed amounts per counting bin. Distractor amounts never
    /// appear here, wherever the learner put them.
    pub bin_totals: HashMap<Category, Millions>,
    pub gdp_production: Millions,
    pub gdp_expenditure: Millions,
    pub gdp_income: Millions,
    /// Largest pairwise absolute difference between the three totals.
    pub gap: Millions,
    /// Per-card verdict for every placed card; unplaced cards are absent.
    pub card_results: HashMap<Uuid, bool>,
    pub placed: usize,
    pub correct: usize,
    pub total_cards: usize,
    /// True iff every inventory-flagged card sits in the Investment bin.
    pub inventory_placed: bool,
    pub status: CheckStatus,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            CheckStatus::NothingPlaced => write!(f, "nothing to check yet"),
            CheckStatus::Reconciled => write!(
                f,
                "fully reconciled: all three ledgers total {}",
                self.gdp_production
            ),
            CheckStatus::GapOpen => write!(
                f,
                "{}/{} placed correctly, reconciliation gap {}",
                self.correct, self.placed, self.gap
            ),
        }
    }
}

/// Recomputes totals and correctness for an arbitrary placement.
///
/// Defensive no-ops, not faults: placement entries for ids the scenario does
/// not contain are ignored, as are entries whose category belongs to a
/// different ledger.
#[must_use]
pub fn check(scenario: &Scenario, placement: &Placement) -> Report {
    let mut bin_totals: HashMap<Category, Millions> = HashMap::new();
    let mut card_results: HashMap<Uuid, bool> = HashMap::new();
    let mut placed = 0usize;
    let mut correct = 0usize;

    for ledger in Ledger::ALL {
        for card in scenario.cards(ledger).values() {
            let Some(assigned) = placement.get(ledger, card.id) else {
                continue;
            };
            if assigned.ledger() != ledger {
                continue;
            }
            placed += 1;
            let is_correct = assigned == card.correct_bin;
            if is_correct {
                correct += 1;
            }
            card_results.insert(card.id, is_correct);

            // Distractor amounts belong to none of the three summation
            // formulas; only per-card correctness tracks them.
            if !card.is_distractor() && assigned.counts() {
                *bin_totals.entry(assigned).or_default() += card.amount;
            }
        }
    }

    let sum = |bin: Category| bin_totals.get(&bin).copied().unwrap_or_default();

    let gdp_production = sum(Category::Output) - sum(Category::IntermediateInput);
    let gdp_expenditure = sum(Category::Consumption)
        + sum(Category::Investment)
        + sum(Category::Government)
        + (sum(Category::Exports) - sum(Category::Imports));
    let gdp_income = sum(Category::Wages) + sum(Category::Profits);

    let gap = (gdp_production - gdp_expenditure)
        .abs()
        .max((gdp_production - gdp_income).abs())
        .max((gdp_expenditure - gdp_income).abs());

    let inventory_placed = scenario
        .inventory_ids()
        .iter()
        .all(|id| placement.get(Ledger::Expenditure, *id) == Some(Category::Investment));

    let status = if placed == 0 {
        CheckStatus::NothingPlaced
    } else if gap <= GAP_TOLERANCE {
        CheckStatus::Reconciled
    } else {
        CheckStatus::GapOpen
    };

    Report {
        bin_totals,
        gdp_production,
        gdp_expenditure,
        gdp_income,
        gap,
        card_results,
        placed,
        correct,
        total_cards: scenario.len(),
        inventory_placed,
        status,
    }
}
