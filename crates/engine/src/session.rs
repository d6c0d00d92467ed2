//! One learner's exercise session.
//!
//! The session replaces any process-wide "current round" state: it owns the
//! RNG, the current [`Scenario`] and the current [`Placement`], and exposes
//! exactly the operations the view layer invokes. The scenario is immutable
//! once produced; the placement is the single mutable resource and is always
//! cleared before a new scenario replaces the old one, so a stale placement
//! can never reference dropped card ids.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::{
    Category, Ledger, Placement, Report, ResultEngine, Scenario, reconcile,
    solver::{RoundConfig, generate_round},
};

#[derive(Debug)]
pub struct Session {
    config: RoundConfig,
    rng: SmallRng,
    scenario: Scenario,
    placement: Placement,
}

impl Session {
    /// Creates a session seeded from the operating system and generates the
    /// first round. Fails only on an invalid configuration.
    pub fn new(config: RoundConfig) -> ResultEngine<Self> {
        let mut seeder = SmallRng::from_os_rng();
        Self::with_seed(config, seeder.random())
    }

    /// Creates a session from an explicit seed. The same seed and
    /// configuration reproduce every round of the session, card ids included.
    pub fn with_seed(config: RoundConfig, seed: u64) -> ResultEngine<Self> {
        config.validate()?;
        let mut rng = SmallRng::seed_from_u64(seed);
        let scenario = generate_round(&mut rng, &config)?;
        tracing::debug!("session started with seed {seed}");
        Ok(Self {
            config,
            rng,
            scenario,
            placement: Placement::default(),
        })
    }

    /// Discards the current round and generates a fresh one.
    ///
    /// The placement is cleared *before* the scenario swap; the two are
    /// replaced together, never observable half-updated.
    pub fn new_round(&mut self) -> ResultEngine<&Scenario> {
        self.placement.clear();
        self.scenario = generate_round(&mut self.rng, &self.config)?;
        Ok(&self.scenario)
    }

    /// Clears every placement of the current round.
    pub fn reset_placement(&mut self) {
        self.placement.clear();
    }

    /// Records an assignment for a card of `ledger`.
    ///
    /// Returns `true` when the assignment was recorded. Unknown card ids and
    /// categories belonging to another ledger are no-ops returning `false`,
    /// never errors.
    pub fn place(&mut self, ledger: Ledger, card_id: uuid::Uuid, category: Category) -> bool {
        if category.ledger() != ledger {
            return false;
        }
        if self.scenario.card(ledger, card_id).is_none() {
            return false;
        }
        self.placement.place(ledger, card_id, category);
        true
    }

    /// Removes an assignment. Unknown ids are a no-op.
    pub fn unplace(&mut self, ledger: Ledger, card_id: uuid::Uuid) {
        self.placement.unplace(ledger, card_id);
    }

    /// Recomputes the three totals and per-card correctness.
    #[must_use]
    pub fn check(&self) -> Report {
        reconcile::check(&self.scenario, &self.placement)
    }

    /// The current round's cards and metadata.
    #[must_use]
    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    /// The learner's current assignments.
    #[must_use]
    pub fn placement(&self) -> &Placement {
        &self.placement
    }
}
