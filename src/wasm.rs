//! WASM bindings for the SAFE calculator.
//!
//! This module provides JavaScript-friendly bindings so a browser front end
//! can re-solve on every edit.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmSafeCalc } from 'safe_dilution';
//!
//! await init();
//!
//! const scenario = `
//!   .captable shares=5M options=500k pool=10
//!   .round post 11M
//!   SAFE angel "Angel" 250k cap=5M
//!   INVESTOR lead "Lead Fund" 1M
//! `;
//!
//! const calc = new WasmSafeCalc(scenario);
//! for (let i = 0; i < calc.entry_count(); i++) {
//!   console.log(calc.entry_name(i), calc.entry_ownership(i));
//! }
//! ```

use wasm_bindgen::prelude::*;

use crate::captable::{validate_scenario, ResultEntry, ResultSummary, Scenario};
use crate::dsl;
use crate::error::DilutionError;
use crate::report;
use crate::solver::{Solution, Solver, SolverConfig, CONVERGENCE_TOLERANCE, MAX_ITERATIONS};

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn to_js(err: DilutionError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// A solved scenario exposed to JavaScript.
#[wasm_bindgen]
pub struct WasmSafeCalc {
    solution: Solution,
    summary: ResultSummary,
}

#[wasm_bindgen]
impl WasmSafeCalc {
    /// Parse and solve a scenario with the default solver settings.
    ///
    /// # Arguments
    /// * `scenario` - The scenario in DSL format
    ///
    /// # Returns
    /// A solved `WasmSafeCalc` or an error message if the scenario is invalid.
    #[wasm_bindgen(constructor)]
    pub fn new(scenario: &str) -> Result<WasmSafeCalc, JsValue> {
        Self::with_config(scenario, MAX_ITERATIONS, CONVERGENCE_TOLERANCE)
    }

    /// Parse and solve a scenario with a custom iteration budget and tolerance.
    #[wasm_bindgen]
    pub fn with_config(
        scenario: &str,
        max_iterations: usize,
        tolerance: f64,
    ) -> Result<WasmSafeCalc, JsValue> {
        let ast = dsl::parse(scenario).map_err(to_js)?;
        let scenario = Scenario::from_ast(ast).map_err(to_js)?;
        validate_scenario(&scenario).map_err(to_js)?;

        let solver = Solver::with_config(
            SolverConfig::new()
                .with_max_iterations(max_iterations)
                .with_tolerance(tolerance),
        );
        let solution = scenario.solve_with(&solver);
        let summary = ResultSummary::from_entries(&solution.results);

        Ok(WasmSafeCalc { solution, summary })
    }

    /// Price per share of the round.
    #[wasm_bindgen(getter)]
    pub fn share_price(&self) -> f64 {
        self.solution.share_price
    }

    /// Pre-money valuation after normalization.
    #[wasm_bindgen(getter)]
    pub fn pre_money_valuation(&self) -> f64 {
        self.solution.pre_money_valuation
    }

    /// Number of rows in the ownership table.
    #[wasm_bindgen]
    pub fn entry_count(&self) -> usize {
        self.solution.results.len()
    }

    fn entry(&self, index: usize) -> Option<&ResultEntry> {
        self.solution.results.get(index)
    }

    /// Id of a row, or `undefined` when out of range.
    #[wasm_bindgen]
    pub fn entry_id(&self, index: usize) -> Option<String> {
        self.entry(index).map(|e| e.id.clone())
    }

    /// Display name of a row.
    #[wasm_bindgen]
    pub fn entry_name(&self, index: usize) -> Option<String> {
        self.entry(index).map(|e| e.name.clone())
    }

    /// Cash invested by a row's holder.
    #[wasm_bindgen]
    pub fn entry_principal(&self, index: usize) -> Option<f64> {
        self.entry(index).map(|e| e.principal)
    }

    /// Ownership fraction of a row.
    #[wasm_bindgen]
    pub fn entry_ownership(&self, index: usize) -> Option<f64> {
        self.entry(index).map(|e| e.ownership)
    }

    /// Share count of a row.
    #[wasm_bindgen]
    pub fn entry_shares(&self, index: usize) -> Option<f64> {
        self.entry(index).map(|e| e.shares)
    }

    /// Sum of all ownership fractions.
    #[wasm_bindgen(getter)]
    pub fn total_ownership(&self) -> f64 {
        self.summary.total_ownership
    }

    /// Whether ownership adds up to 100% within 1%.
    #[wasm_bindgen(getter)]
    pub fn is_valid(&self) -> bool {
        self.summary.is_valid()
    }

    /// The ownership table as CSV.
    #[wasm_bindgen]
    pub fn to_csv(&self) -> String {
        report::render_csv(&self.solution.results)
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
