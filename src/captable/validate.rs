//! Scenario validation.

use std::collections::HashSet;

use crate::error::{DilutionError, Result};
use crate::solver::{EXISTING_SHAREHOLDERS_ID, OPTION_POOL_ID};

use super::Scenario;

/// Validate a scenario's holder identities.
///
/// Checks:
/// - No two notes or investors share an id
/// - No holder uses the id of a computed result entry
///
/// Amounts are deliberately left alone; the solver accepts any number.
pub fn validate_scenario(scenario: &Scenario) -> Result<()> {
    let ids = scenario
        .notes
        .iter()
        .map(|note| note.id.as_str())
        .chain(scenario.round.investors.iter().map(|inv| inv.id.as_str()));

    let mut seen = HashSet::new();
    for id in ids {
        if id == EXISTING_SHAREHOLDERS_ID || id == OPTION_POOL_ID {
            return Err(DilutionError::ReservedId { id: id.to_string() });
        }
        if !seen.insert(id) {
            return Err(DilutionError::DuplicateId { id: id.to_string() });
        }
    }

    Ok(())
}
