//! Assembly of the post-round ownership table.

use crate::captable::{CapTable, Investor, ResultEntry, SafeNote};

/// Result id of the existing holders' entry.
pub const EXISTING_SHAREHOLDERS_ID: &str = "existing_shareholders";

/// Result id of the option pool entry.
pub const OPTION_POOL_ID: &str = "esop_expansion";

/// Build the ownership table from the final pass.
///
/// Entries come in a fixed order: every note, every investor, the existing
/// holders, then the option pool. Ownership of the two synthetic entries is
/// computed from their unrounded share counts.
pub fn aggregate_results(
    cap_table: &CapTable,
    notes: &[SafeNote],
    investors: &[Investor],
    esop_expansion: f64,
    shares_after_new_round: f64,
) -> Vec<ResultEntry> {
    let mut results = Vec::with_capacity(notes.len() + investors.len() + 2);

    results.extend(notes.iter().map(|note| ResultEntry {
        id: note.id.clone(),
        name: note.name.clone(),
        principal: note.principal,
        ownership: note.shares / shares_after_new_round,
        shares: note.shares,
    }));

    results.extend(investors.iter().map(|investor| ResultEntry {
        id: investor.id.clone(),
        name: investor.name.clone(),
        principal: investor.principal,
        ownership: investor.shares / shares_after_new_round,
        shares: investor.shares,
    }));

    let existing = cap_table.existing_holder_shares();
    results.push(ResultEntry {
        id: EXISTING_SHAREHOLDERS_ID.to_string(),
        name: "Existing Shareholders".to_string(),
        principal: 0.0,
        ownership: existing / shares_after_new_round,
        shares: existing.round(),
    });

    let pool = esop_expansion + cap_table.remaining_options as f64;
    results.push(ResultEntry {
        id: OPTION_POOL_ID.to_string(),
        name: "Option Pool".to_string(),
        principal: 0.0,
        ownership: pool / shares_after_new_round,
        shares: pool.round(),
    });

    results
}
