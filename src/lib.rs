//! # SAFE Dilution
//!
//! A cap table calculator for SAFE notes converting into a priced round.
//!
//! This library provides:
//! - An equilibrium solver for share price, option pool top-up, SAFE
//!   conversions and new-investor allocations
//! - A small DSL for describing a financing scenario
//! - Ownership table checks and reporting (CLI and WASM)
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`dsl`] - Parser for the scenario description language
//! - [`captable`] - Cap table records, scenarios and result checks
//! - [`solver`] - Valuation normalization, conversion rule, fixed-point loop
//! - [`report`] - Text table and CSV rendering
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! safecalc seed-round.safe
//! safecalc --format csv - < seed-round.safe > results.csv
//! ```
//!
//! ### Library
//!
//! ```
//! use safe_dilution::{solve, CapTable, Investor, NewRound, ValuationType};
//!
//! let cap_table = CapTable::new(5_000_000, 500_000, 0.0);
//! let round = NewRound::new(11_000_000.0, ValuationType::PostMoney)
//!     .with_investor(Investor::new("lead", "Lead Fund", 1_000_000.0));
//!
//! let results = solve(&cap_table, &[], &round);
//! assert_eq!(results[0].shares, 500_000.0);
//! ```
//!
//! ### WASM
//!
//! ```javascript
//! import { WasmSafeCalc } from 'safe_dilution';
//!
//! const calc = new WasmSafeCalc(scenarioText);
//! console.log(calc.share_price, calc.to_csv());
//! ```
//!
//! ## Solution Method
//!
//! Share price, pool expansion, note conversions and investor shares depend
//! on each other, so there is no closed form. Each pass recomputes all of
//! them from the previous pass's share totals:
//!
//! 1. Price the round from the pre-money valuation
//! 2. Top up the option pool to its target share of post-round shares
//! 3. Convert each SAFE at the better of its cap price and the round price
//! 4. Allocate investor shares at the round price
//!
//! The loop ends when the price moves less than 1e-5 or after 500 passes.

pub mod captable;
pub mod dsl;
pub mod error;
pub mod report;
pub mod solver;

// Re-export main types for convenience
pub use captable::{
    CapTable, Investor, NewRound, ResultEntry, ResultSummary, SafeNote, Scenario, ValuationType,
};
pub use error::{DilutionError, Result};
pub use solver::{solve, Solution, Solver, SolverConfig};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmSafeCalc;
