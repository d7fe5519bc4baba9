//! Rendering of solved ownership tables.
//!
//! Produces the aligned text table printed by the CLI and a CSV export.

use std::io::Write;

use crate::captable::{ResultEntry, ResultSummary};
use crate::error::{DilutionError, Result};
use crate::solver::Solution;

/// Output format for a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    /// Aligned text table with a totals row
    #[default]
    Table,
    /// Comma-separated values
    Csv,
}

const HEADERS: [&str; 4] = ["Name", "Investment", "Ownership %", "Number of Shares"];

/// Group the integer part of a number in thousands.
fn group_thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Whole dollars, or `-` for non-positive amounts.
pub fn format_currency(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value <= 0.0 {
        return "-".to_string();
    }
    if value.is_infinite() {
        return "$inf".to_string();
    }
    format!("${}", group_thousands(value))
}

/// A share count with thousands separators.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    group_thousands(value)
}

/// A fraction as a percentage with two decimals.
pub fn format_percentage(value: f64) -> String {
    if !value.is_finite() {
        return format!("{}%", value);
    }
    format!("{:.2}%", value * 100.0)
}

fn row(entry: &ResultEntry) -> [String; 4] {
    [
        entry.name.clone(),
        format_currency(entry.principal),
        format_percentage(entry.ownership),
        format_number(entry.shares),
    ]
}

/// Render a solution as an aligned text table.
pub fn render_table(solution: &Solution) -> String {
    let summary = ResultSummary::from_entries(&solution.results);

    let body: Vec<[String; 4]> = solution.results.iter().map(row).collect();
    let total = [
        "Total".to_string(),
        format_currency(summary.total_principal),
        format_percentage(summary.total_ownership),
        format_number(summary.total_shares),
    ];

    let mut widths = HEADERS.map(str::len);
    for cells in body.iter().chain(std::iter::once(&total)) {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &[String; 4]| {
        format!(
            "{:<w0$}  {:>w1$}  {:>w2$}  {:>w3$}\n",
            cells[0],
            cells[1],
            cells[2],
            cells[3],
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2],
            w3 = widths[3],
        )
    };

    let mut out = String::new();
    out.push_str(&format!(
        "Pre-money valuation: {}\n",
        format_currency(solution.pre_money_valuation)
    ));
    out.push_str(&format!("Price per share:     ${:.4}\n\n", solution.share_price));
    out.push_str(&line(&HEADERS.map(String::from)));
    out.push_str(&format!("{}\n", "-".repeat(widths.iter().sum::<usize>() + 6)));
    for cells in &body {
        out.push_str(&line(cells));
    }
    out.push_str(&format!("{}\n", "=".repeat(widths.iter().sum::<usize>() + 6)));
    out.push_str(&line(&total));
    out
}

fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Render entries as CSV with raw numeric values.
pub fn render_csv(entries: &[ResultEntry]) -> String {
    let mut out = String::from("id,name,principal,ownership,shares\n");
    for entry in entries {
        out.push_str(&format!(
            "{},{},{},{},{}\n",
            csv_field(&entry.id),
            csv_field(&entry.name),
            entry.principal,
            entry.ownership,
            entry.shares
        ));
    }
    out
}

/// Write a solution in the requested format.
pub fn write_report<W: Write>(solution: &Solution, format: OutputFormat, out: &mut W) -> Result<()> {
    let text = match format {
        OutputFormat::Table => render_table(solution),
        OutputFormat::Csv => render_csv(&solution.results),
    };

    out.write_all(text.as_bytes())
        .and_then(|_| out.flush())
        .map_err(|e| DilutionError::OutputError {
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::captable::{CapTable, Investor, NewRound, ValuationType};
    use crate::solver::Solver;

    fn seed_solution() -> Solution {
        let cap = CapTable::new(5_000_000, 500_000, 0.0);
        let round = NewRound::new(11e6, ValuationType::PostMoney)
            .with_investor(Investor::new("lead", "Lead, LLC", 1e6));
        Solver::new().solve(&cap, &[], &round)
    }

    #[test]
    fn test_number_formats() {
        assert_eq!(format_currency(1_000_000.0), "$1,000,000");
        assert_eq!(format_currency(999.4), "$999");
        assert_eq!(format_currency(0.0), "-");
        assert_eq!(format_currency(-5.0), "-");
        assert_eq!(format_number(4_500_000.0), "4,500,000");
        assert_eq!(format_number(-1_234.0), "-1,234");
        assert_eq!(format_number(12.0), "12");
        assert_eq!(format_number(f64::INFINITY), "inf");
        assert_eq!(format_percentage(0.0909), "9.09%");
        assert_eq!(format_percentage(1.0), "100.00%");
    }

    #[test]
    fn test_table_layout() {
        let table = render_table(&seed_solution());
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "Pre-money valuation: $10,000,000");
        assert_eq!(lines[1], "Price per share:     $2.0000");
        assert!(lines[3].starts_with("Name"));
        assert!(lines[5].starts_with("Lead, LLC"));
        assert!(lines[5].contains("$1,000,000"));
        assert!(lines[5].ends_with("500,000"));
        assert!(lines[6].contains("4,500,000"));
        assert!(lines[8].starts_with('='));
        assert!(lines[9].starts_with("Total"));
        assert!(lines[9].contains("100.00%"));
        assert!(lines[9].ends_with("5,500,000"));
    }

    #[test]
    fn test_csv_quotes_fields() {
        let csv = render_csv(&seed_solution().results);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "id,name,principal,ownership,shares");
        assert!(lines[1].starts_with("lead,\"Lead, LLC\",1000000,"));
        assert!(lines[1].ends_with(",500000"));
        assert!(lines[2].starts_with("existing_shareholders,Existing Shareholders,0,"));
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_write_report() {
        let mut buf = Vec::new();
        write_report(&seed_solution(), OutputFormat::Csv, &mut buf).unwrap();
        assert!(String::from_utf8(buf).unwrap().starts_with("id,name"));
    }
}
