//! Core types for cap table representation.

use std::fmt;

/// Whether a valuation excludes or includes the money raised alongside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ValuationType {
    /// Valuation before the new money
    #[default]
    PreMoney,
    /// Valuation including the new money
    PostMoney,
}

impl ValuationType {
    /// Parse a valuation type from a scenario keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "pre" | "premoney" | "pre-money" => Some(Self::PreMoney),
            "post" | "postmoney" | "post-money" => Some(Self::PostMoney),
            _ => None,
        }
    }
}

impl fmt::Display for ValuationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PreMoney => write!(f, "Pre-Money"),
            Self::PostMoney => write!(f, "Post-Money"),
        }
    }
}

/// Company capitalization before the round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapTable {
    /// All shares and options outstanding before the round
    pub fully_diluted_shares: u64,
    /// Unallocated shares already inside the existing option pool
    pub remaining_options: u64,
    /// Target option pool after the round, in percent of post-round shares
    pub new_pool_size: f64,
}

impl CapTable {
    /// Create a cap table.
    pub fn new(fully_diluted_shares: u64, remaining_options: u64, new_pool_size: f64) -> Self {
        Self {
            fully_diluted_shares,
            remaining_options,
            new_pool_size,
        }
    }

    /// Shares held by existing holders, excluding the unallocated pool.
    pub fn existing_holder_shares(&self) -> f64 {
        self.fully_diluted_shares as f64 - self.remaining_options as f64
    }
}

impl Default for CapTable {
    fn default() -> Self {
        Self::new(5_000_000, 500_000, 10.0)
    }
}

/// A SAFE note converting in the round.
#[derive(Debug, Clone, PartialEq)]
pub struct SafeNote {
    pub id: String,
    pub name: String,
    /// Amount invested
    pub principal: f64,
    /// Valuation ceiling used for cap-based conversion pricing
    pub valuation_cap: f64,
    /// Denominator base for the cap price
    pub valuation_type: ValuationType,
    /// Percentage of the cap *retained* when pricing: 100 is no discount,
    /// 80 prices conversion at 80% of the cap.
    pub discount: f64,
    /// Converted share count (computed)
    pub shares: f64,
}

impl SafeNote {
    /// Create a post-money note without a discount.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        principal: f64,
        valuation_cap: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            principal,
            valuation_cap,
            valuation_type: ValuationType::PostMoney,
            discount: 100.0,
            shares: 0.0,
        }
    }

    /// Set the cap's valuation type.
    pub fn with_valuation_type(mut self, valuation_type: ValuationType) -> Self {
        self.valuation_type = valuation_type;
        self
    }

    /// Set the retained percentage of the cap.
    pub fn with_discount(mut self, discount: f64) -> Self {
        self.discount = discount;
        self
    }
}

/// A new-money participant in the priced round.
#[derive(Debug, Clone, PartialEq)]
pub struct Investor {
    pub id: String,
    pub name: String,
    /// Amount invested
    pub principal: f64,
    /// Purchased share count (computed)
    pub shares: f64,
}

impl Investor {
    /// Create an investor.
    pub fn new(id: impl Into<String>, name: impl Into<String>, principal: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            principal,
            shares: 0.0,
        }
    }
}

/// The priced round the notes convert into.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewRound {
    /// Valuation as stated, pre- or post-money per `valuation_type`
    pub valuation: f64,
    pub valuation_type: ValuationType,
    pub investors: Vec<Investor>,
}

impl NewRound {
    /// Create a round with no investors.
    pub fn new(valuation: f64, valuation_type: ValuationType) -> Self {
        Self {
            valuation,
            valuation_type,
            investors: Vec::new(),
        }
    }

    /// Add an investor.
    pub fn with_investor(mut self, investor: Investor) -> Self {
        self.investors.push(investor);
        self
    }

    /// Total new money raised.
    pub fn total_principal(&self) -> f64 {
        self.investors.iter().fold(0.0, |sum, inv| sum + inv.principal)
    }
}

/// One stakeholder class in the post-round ownership table.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultEntry {
    pub id: String,
    pub name: String,
    /// Cash invested (0 for existing holders and the option pool)
    pub principal: f64,
    /// Fraction of post-round shares
    pub ownership: f64,
    pub shares: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valuation_type_keywords() {
        assert_eq!(ValuationType::from_keyword("pre"), Some(ValuationType::PreMoney));
        assert_eq!(ValuationType::from_keyword("POST"), Some(ValuationType::PostMoney));
        assert_eq!(ValuationType::from_keyword("PostMoney"), Some(ValuationType::PostMoney));
        assert_eq!(ValuationType::from_keyword("mid"), None);
        assert_eq!(ValuationType::PostMoney.to_string(), "Post-Money");
    }

    #[test]
    fn test_round_total_principal() {
        let round = NewRound::new(20e6, ValuationType::PostMoney)
            .with_investor(Investor::new("a", "A", 1e6))
            .with_investor(Investor::new("b", "B", 2.5e6));
        assert_eq!(round.total_principal(), 3.5e6);
        assert_eq!(NewRound::default().total_principal(), 0.0);
    }

    #[test]
    fn test_existing_holder_shares() {
        let cap = CapTable::default();
        assert_eq!(cap.existing_holder_shares(), 4_500_000.0);

        // No validation: more options than shares simply goes negative
        let odd = CapTable::new(100, 250, 0.0);
        assert_eq!(odd.existing_holder_shares(), -150.0);
    }
}
