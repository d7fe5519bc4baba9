//! Equilibrium solver for SAFE conversion in a priced round.
//!
//! This module provides the numerical engine of the calculator.
//!
//! ## The circular system
//!
//! Converting SAFEs into a priced round couples four quantities:
//!
//! ```text
//! share price      = pre-money valuation / shares after pool expansion
//! pool expansion   = target pool % x shares after the round - remaining options
//! note shares      = max(principal / cap price, principal / share price)
//! investor shares  = principal / share price
//! ```
//!
//! Every line depends on the others, so the solver iterates: each pass
//! recomputes all four from the previous pass's share totals until the share
//! price moves less than [`CONVERGENCE_TOLERANCE`] or [`MAX_ITERATIONS`] passes
//! have run.
//!
//! The solver is a pure function of its inputs. It never validates them and
//! never fails: degenerate input (zero shares, a non-positive pre-money
//! valuation, a zero cap) yields negative or non-finite numbers in the result,
//! and running out of passes is indistinguishable from converging.

mod aggregate;
mod conversion;
mod equilibrium;
mod valuation;

pub use aggregate::{aggregate_results, EXISTING_SHAREHOLDERS_ID, OPTION_POOL_ID};
pub use conversion::{ConversionBasis, ConversionQuote};
pub use equilibrium::{Solution, Solver, SolverConfig};
pub use valuation::pre_money_valuation;

use crate::captable::{CapTable, NewRound, ResultEntry, SafeNote};

/// Share price change below which the loop is considered converged.
pub const CONVERGENCE_TOLERANCE: f64 = 1e-5;

/// Maximum number of equilibrium passes.
pub const MAX_ITERATIONS: usize = 500;

/// Solve a round with the default configuration and return the ownership table.
///
/// The inputs are not modified; use [`Solver::solve`] to also get the notes
/// and investors with their computed share counts.
pub fn solve(cap_table: &CapTable, notes: &[SafeNote], round: &NewRound) -> Vec<ResultEntry> {
    Solver::new().solve(cap_table, notes, round).results
}

/// `max` that returns NaN when either side is NaN.
///
/// `f64::max` discards NaN, which would turn a degenerate pass into a
/// plausible-looking zero.
pub(crate) fn nan_max(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.max(b)
    }
}
