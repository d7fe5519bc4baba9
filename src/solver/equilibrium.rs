//! Fixed-point iteration over share price, pool expansion and conversions.

use tracing::{debug, trace};

use crate::captable::{CapTable, Investor, NewRound, ResultEntry, SafeNote};

use super::aggregate::aggregate_results;
use super::conversion::{ConversionBasis, ConversionQuote};
use super::valuation::pre_money_valuation;
use super::{nan_max, CONVERGENCE_TOLERANCE, MAX_ITERATIONS};

/// Configuration for the solver.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Maximum equilibrium passes.
    pub max_iterations: usize,
    /// Share price change that ends the loop.
    pub tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: MAX_ITERATIONS,
            tolerance: CONVERGENCE_TOLERANCE,
        }
    }
}

impl SolverConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of passes.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the convergence tolerance on the share price.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

/// Running totals carried from one pass to the next.
///
/// All start at 1 so the first pass never divides by zero.
#[derive(Debug, Clone, Copy)]
struct LoopState {
    share_price: f64,
    esop_expansion: f64,
    shares_after_safe_conversion: f64,
    shares_after_esop_expansion: f64,
    shares_after_new_round: f64,
}

impl LoopState {
    fn seeded() -> Self {
        Self {
            share_price: 1.0,
            esop_expansion: 1.0,
            shares_after_safe_conversion: 1.0,
            shares_after_esop_expansion: 1.0,
            shares_after_new_round: 1.0,
        }
    }
}

/// Outcome of a solve.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Ownership table: notes, investors, existing holders, option pool
    pub results: Vec<ResultEntry>,
    /// Input notes with their converted share counts
    pub notes: Vec<SafeNote>,
    /// Round investors with their purchased share counts
    pub investors: Vec<Investor>,
    pub pre_money_valuation: f64,
    /// Price per share of the last pass
    pub share_price: f64,
    /// Option pool top-up of the last pass
    pub esop_expansion: f64,
    /// Fully diluted shares after the round
    pub shares_after_new_round: f64,
    /// Passes executed
    pub iterations: usize,
}

/// SAFE conversion equilibrium solver.
#[derive(Debug, Clone, Default)]
pub struct Solver {
    config: SolverConfig,
}

impl Solver {
    /// Create a solver with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a solver with a custom configuration.
    pub fn with_config(config: SolverConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Iterate the round to a fixed point.
    ///
    /// Each pass reads the share totals of the previous pass, in this order:
    /// share price, pool expansion, note conversions, investor purchases.
    /// The loop stops once the share price settles, after `max_iterations`
    /// passes, or when the price entering a pass is negative. That last check
    /// happens before the price is recomputed, so the pass that first produces
    /// a negative price still runs to completion and is what gets returned.
    pub fn solve(&self, cap_table: &CapTable, notes: &[SafeNote], round: &NewRound) -> Solution {
        let pre_money_valuation = pre_money_valuation(round);
        let fully_diluted_shares = cap_table.fully_diluted_shares as f64;
        let remaining_options = cap_table.remaining_options as f64;
        let pool_fraction = cap_table.new_pool_size / 100.0;

        let mut notes = notes.to_vec();
        let mut investors = round.investors.clone();
        let mut state = LoopState::seeded();
        let mut iterations = 0usize;
        let mut converged = false;

        while state.share_price >= 0.0 && !converged && iterations < self.config.max_iterations {
            let prev_share_price = state.share_price;

            state.share_price = pre_money_valuation / state.shares_after_esop_expansion;
            state.esop_expansion = nan_max(
                0.0,
                pool_fraction * state.shares_after_new_round - remaining_options,
            );

            let basis = ConversionBasis {
                fully_diluted_shares,
                esop_expansion: state.esop_expansion,
                shares_after_safe_conversion: state.shares_after_safe_conversion,
                share_price: state.share_price,
            };
            for note in &mut notes {
                note.shares = ConversionQuote::for_note(note, &basis).shares();
            }

            state.shares_after_safe_conversion =
                fully_diluted_shares + notes.iter().fold(0.0, |sum, note| sum + note.shares);
            state.shares_after_esop_expansion =
                state.shares_after_safe_conversion + state.esop_expansion;

            for investor in &mut investors {
                investor.shares = (investor.principal / state.share_price).round();
            }
            state.shares_after_new_round = state.shares_after_esop_expansion
                + investors.iter().fold(0.0, |sum, inv| sum + inv.shares);

            let change = (state.share_price - prev_share_price).abs();
            converged = change < self.config.tolerance;
            iterations += 1;

            trace!(
                iteration = iterations,
                share_price = state.share_price,
                change,
                "equilibrium pass"
            );
        }

        debug!(
            iterations,
            share_price = state.share_price,
            budget_spent = iterations >= self.config.max_iterations,
            "equilibrium loop finished"
        );

        let results = aggregate_results(
            cap_table,
            &notes,
            &investors,
            state.esop_expansion,
            state.shares_after_new_round,
        );

        Solution {
            results,
            notes,
            investors,
            pre_money_valuation,
            share_price: state.share_price,
            esop_expansion: state.esop_expansion,
            shares_after_new_round: state.shares_after_new_round,
            iterations,
        }
    }
}
