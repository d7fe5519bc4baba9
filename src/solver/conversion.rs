//! SAFE conversion rule.

use crate::captable::{SafeNote, ValuationType};

use super::nan_max;

/// Share totals a note's conversion is priced against.
///
/// `shares_after_safe_conversion` comes from the *previous* equilibrium pass;
/// `esop_expansion` and `share_price` are the current pass's values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionBasis {
    pub fully_diluted_shares: f64,
    pub esop_expansion: f64,
    pub shares_after_safe_conversion: f64,
    pub share_price: f64,
}

/// Unrounded share counts under the two competing conversion mechanisms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionQuote {
    /// Shares at the (discounted) cap price
    pub at_cap_price: f64,
    /// Shares at the round's own price
    pub at_round_price: f64,
}

impl ConversionQuote {
    /// Price a note's conversion against the given basis.
    pub fn for_note(note: &SafeNote, basis: &ConversionBasis) -> Self {
        // `discount` is the retained share of the cap
        let discounted_valuation = note.valuation_cap * (note.discount / 100.0);

        let at_cap_price = match note.valuation_type {
            ValuationType::PreMoney => {
                note.principal
                    / (discounted_valuation / (basis.fully_diluted_shares + basis.esop_expansion))
            }
            ValuationType::PostMoney => {
                note.principal / (discounted_valuation / basis.shares_after_safe_conversion)
            }
        };

        Self {
            at_cap_price,
            at_round_price: note.principal / basis.share_price,
        }
    }

    /// Whole shares issued: the more favorable mechanism for the holder.
    pub fn shares(&self) -> f64 {
        nan_max(self.at_cap_price, self.at_round_price).round()
    }
}
