//! Core engine for the three-ledger reconciliation exercise.
//!
//! Each round manufactures a set of transaction cards spread over three
//! accounting ledgers (production, expenditure, income). Classified
//! correctly, the cards yield three independently computed totals that agree
//! exactly under integer arithmetic. The engine covers generation
//! ([`solver`]), exact integer fragmentation ([`partition`]), card phrasing
//! ([`factory`]) and verification ([`reconcile`]); rendering and input
//! handling belong to the embedding view layer, which drives a [`Session`].

pub use cards::{Card, CardKind, Category, Ledger};
pub use error::EngineError;
pub use money::Millions;
pub use placement::Placement;
pub use reconcile::{CheckStatus, GAP_TOLERANCE, Report, check};
pub use scenario::Scenario;
pub use session::Session;
pub use solver::{RoundConfig, generate_round};

mod cards;
mod error;
pub mod factory;
mod money;
pub mod partition;
mod placement;
mod reconcile;
mod scenario;
mod session;
pub mod solver;

type ResultEngine<T> = Result<T, EngineError>;
