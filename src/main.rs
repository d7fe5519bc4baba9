//! safecalc - SAFE conversion calculator
//!
//! Solves a financing scenario and prints the post-round ownership table.
//!
//! # Usage
//!
//! ```bash
//! safecalc seed-round.safe
//! cat seed-round.safe | safecalc --format csv -
//! ```

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::Parser;
use safe_dilution::{
    captable::{validate_scenario, ResultSummary, Scenario},
    dsl,
    error::{DilutionError, Result},
    report::{self, OutputFormat},
    solver::{CONVERGENCE_TOLERANCE, MAX_ITERATIONS},
    Solver, SolverConfig,
};
use tracing_subscriber::EnvFilter;

/// SAFE note conversion calculator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the scenario file, or '-' for stdin
    #[arg(value_name = "SCENARIO_FILE")]
    scenario_file: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Maximum equilibrium passes
    #[arg(long, default_value_t = MAX_ITERATIONS)]
    max_iterations: usize,

    /// Share price convergence tolerance
    #[arg(long, default_value_t = CONVERGENCE_TOLERANCE)]
    tolerance: f64,

    /// Print the result even when ownership does not add up to 100%
    #[arg(long)]
    allow_invalid: bool,
}

fn read_scenario(path: &Path) -> Result<dsl::ScenarioAst> {
    if path.as_os_str() != "-" {
        return dsl::parse_file(path);
    }

    let mut content = String::new();
    io::stdin()
        .read_to_string(&mut content)
        .map_err(|e| DilutionError::FileReadError {
            path: "<stdin>".to_string(),
            source: e,
        })?;
    dsl::parse(&content)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("safe_dilution=warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    // Parse and build the scenario
    let ast = read_scenario(&args.scenario_file)?;
    let scenario = Scenario::from_ast(ast)?;
    validate_scenario(&scenario)?;

    // Solve
    let solver = Solver::with_config(
        SolverConfig::new()
            .with_max_iterations(args.max_iterations)
            .with_tolerance(args.tolerance),
    );
    let solution = scenario.solve_with(&solver);

    // Check ownership closure before reporting
    let summary = ResultSummary::from_entries(&solution.results);
    if !summary.is_valid() {
        if args.allow_invalid {
            tracing::warn!(total_ownership = summary.total_ownership, "ownership does not close");
        } else {
            summary.check()?;
        }
    }

    report::write_report(&solution, args.format, &mut io::stdout().lock())
}
