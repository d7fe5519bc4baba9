//! Valuation normalization.

use crate::captable::{NewRound, ValuationType};

/// Pre-money valuation of the round.
///
/// A post-money valuation has the round's total investment subtracted. The
/// result may be negative when the stated post-money valuation is smaller
/// than the money raised; it is passed on as is.
pub fn pre_money_valuation(round: &NewRound) -> f64 {
    match round.valuation_type {
        ValuationType::PreMoney => round.valuation,
        ValuationType::PostMoney => round.valuation - round.total_principal(),
    }
}
