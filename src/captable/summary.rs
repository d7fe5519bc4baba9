//! Totals over a solved ownership table.

use crate::error::{DilutionError, Result};

use super::ResultEntry;

/// Allowed distance of total ownership from 100%.
pub const OWNERSHIP_TOLERANCE: f64 = 0.01;

/// Column totals of an ownership table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResultSummary {
    pub total_principal: f64,
    pub total_ownership: f64,
    pub total_shares: f64,
}

impl ResultSummary {
    /// Sum the entries.
    pub fn from_entries(entries: &[ResultEntry]) -> Self {
        entries.iter().fold(
            Self {
                total_principal: 0.0,
                total_ownership: 0.0,
                total_shares: 0.0,
            },
            |acc, entry| Self {
                total_principal: acc.total_principal + entry.principal,
                total_ownership: acc.total_ownership + entry.ownership,
                total_shares: acc.total_shares + entry.shares,
            },
        )
    }

    /// Whether ownership closes to 100% within [`OWNERSHIP_TOLERANCE`].
    ///
    /// A missing or non-positive round valuation makes the solver produce
    /// non-finite or lopsided fractions, which fail here.
    pub fn is_valid(&self) -> bool {
        self.total_ownership >= 1.0 - OWNERSHIP_TOLERANCE
            && self.total_ownership <= 1.0 + OWNERSHIP_TOLERANCE
    }

    /// [`is_valid`](Self::is_valid) as a `Result`.
    pub fn check(&self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(DilutionError::InvalidOwnership {
                total: self.total_ownership,
                tolerance: OWNERSHIP_TOLERANCE,
            })
        }
    }
}
