//! The module contains the errors the engine can return.
//!
//! The errors only cover construction-time misuse (an invalid round
//! configuration, an empty phrasing pool). Runtime operations never fail:
//! unknown card ids, foreign-ledger categories and infeasible partitions are
//! defensive no-ops.
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid round configuration: {0}")]
    InvalidConfig(String),
    #[error("Empty phrasing pool: {0}")]
    EmptyPool(String),
}
