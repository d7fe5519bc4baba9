//! Cap table model, scenarios and result checks.
//!
//! This module holds the records the solver reads and writes
//! ([`CapTable`], [`SafeNote`], [`Investor`], [`NewRound`], [`ResultEntry`]),
//! the [`Scenario`] that bundles them, and the checks a caller applies
//! around a solve: identity validation before, ownership closure after.

mod scenario;
mod summary;
mod types;
mod validate;

pub use scenario::Scenario;
pub use summary::{ResultSummary, OWNERSHIP_TOLERANCE};
pub use types::*;
pub use validate::validate_scenario;
