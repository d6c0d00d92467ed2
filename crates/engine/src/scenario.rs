//! The immutable output of one solver run.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Card, Ledger, Millions};

/// One round's worth of cards plus identity metadata.
///
/// Created once per round and replaced wholesale when a new round starts.
/// Card order within a ledger is irrelevant; each collection is keyed by id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    target: Millions,
    production: HashMap<Uuid, Card>,
    expenditure: HashMap<Uuid, Card>,
    income: HashMap<Uuid, Card>,
    inventory_ids: HashSet<Uuid>,
}

impl Scenario {
    pub(crate) fn new(
        target: Millions,
        cards: Vec<Card>,
        inventory_ids: HashSet<Uuid>,
    ) -> Self {
        let mut production = HashMap::new();
        let mut expenditure = HashMap::new();
        let mut income = HashMap::new();
        for card in cards {
            match card.ledger {
                Ledger::Production => production.insert(card.id, card),
                Ledger::Expenditure => expenditure.insert(card.id, card),
                Ledger::Income => income.insert(card.id, card),
            };
        }
        Self {
            target,
            production,
            expenditure,
            income,
            inventory_ids,
        }
    }

    /// The canonical aggregate value all three ledgers resolve to.
    #[must_use]
    pub fn target(&self) -> Millions {
        self.target
    }

    /// The cards of one ledger, keyed by id.
    #[must_use]
    pub fn cards(&self, ledger: Ledger) -> &HashMap<Uuid, Card> {
        match ledger {
            Ledger::Production => &self.production,
            Ledger::Expenditure => &self.expenditure,
            Ledger::Income => &self.income,
        }
    }

    /// Looks up one card within a ledger.
    #[must_use]
    pub fn card(&self, ledger: Ledger, id: Uuid) -> Option<&Card> {
        self.cards(ledger).get(&id)
    }

    /// Expenditure card ids subject to the dedicated inventory check.
    #[must_use]
    pub fn inventory_ids(&self) -> &HashSet<Uuid> {
        &self.inventory_ids
    }

    /// All cards across the three ledgers.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.production
            .values()
            .chain(self.expenditure.values())
            .chain(self.income.values())
    }

    /// Total number of cards in the round.
    #[must_use]
    pub fn len(&self) -> usize {
        self.production.len() + self.expenditure.len() + self.income.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
