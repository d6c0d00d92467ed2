//! The learner's current card-to-category assignment.
//!
//! Owned and mutated by the calling layer; the reconciliation engine only
//! reads it. Absence of an entry means the card is unplaced.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Category, Ledger};

/// Mapping per ledger from card id to the category currently assigned.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    production: HashMap<Uuid, Category>,
    expenditure: HashMap<Uuid, Category>,
    income: HashMap<Uuid, Category>,
}

impl Placement {
    /// Records an assignment, overwriting any previous one for the card.
    ///
    /// Storage only: ledger/card validation is the session's job.
    pub fn place(&mut self, ledger: Ledger, card_id: Uuid, category: Category) {
        self.ledger_mut(ledger).insert(card_id, category);
    }

    /// Removes an assignment. Unknown ids are a no-op.
    pub fn unplace(&mut self, ledger: Ledger, card_id: Uuid) {
        self.ledger_mut(ledger).remove(&card_id);
    }

    /// Clears every assignment in every ledger.
    pub fn clear(&mut self) {
        self.production.clear();
        self.expenditure.clear();
        self.income.clear();
    }

    /// The category currently assigned to a card, if any.
    #[must_use]
    pub fn get(&self, ledger: Ledger, card_id: Uuid) -> Option<Category> {
        self.for_ledger(ledger).get(&card_id).copied()
    }

    /// One ledger's assignments, keyed by card id.
    #[must_use]
    pub fn for_ledger(&self, ledger: Ledger) -> &HashMap<Uuid, Category> {
        match ledger {
            Ledger::Production => &self.production,
            Ledger::Expenditure => &self.expenditure,
            Ledger::Income => &self.income,
        }
    }

    /// Number of placed cards across all ledgers.
    #[must_use]
    pub fn placed_count(&self) -> usize {
        self.production.len() + self.expenditure.len() + self.income.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.placed_count() == 0
    }

    fn ledger_mut(&mut self, ledger: Ledger) -> &mut HashMap<Uuid, Category> {
        match ledger {
            Ledger::Production => &mut self.production,
            Ledger::Expenditure => &mut self.expenditure,
            Ledger::Income => &mut self.income,
        }
    }
}
