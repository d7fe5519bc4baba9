//! Abstract Syntax Tree types for the scenario DSL.

use std::collections::HashMap;

use crate::captable::ValuationType;

/// Complete AST representation of a parsed scenario.
#[derive(Debug, Clone, Default)]
pub struct ScenarioAst {
    /// `.captable` directive, if present
    pub cap_table: Option<CapTableDef>,
    /// `.round` directive, if present
    pub round: Option<RoundDef>,
    /// Notes and investors in source order
    pub entries: Vec<EntryDef>,
}

impl ScenarioAst {
    /// Create a new empty scenario AST.
    pub fn new() -> Self {
        Self::default()
    }
}

/// The `.captable` directive.
#[derive(Debug, Clone)]
pub struct CapTableDef {
    /// Parameters by lowercase name
    pub params: HashMap<String, f64>,
    /// Source line number
    pub line: usize,
}

/// The `.round` directive.
#[derive(Debug, Clone)]
pub struct RoundDef {
    pub valuation: f64,
    /// Defaults to pre-money when not stated
    pub valuation_type: Option<ValuationType>,
    /// Source line number
    pub line: usize,
}

/// A note or investor line.
#[derive(Debug, Clone)]
pub struct EntryDef {
    pub kind: EntryKind,
    /// Holder id
    pub id: String,
    /// Display name, if given
    pub name: Option<String>,
    /// First bare value on the line
    pub principal: Option<f64>,
    /// `key=value` parameters by lowercase name
    pub params: HashMap<String, f64>,
    /// `pre` / `post` keyword, if given
    pub valuation_type: Option<ValuationType>,
    /// Source line number for error reporting
    pub line: usize,
}

/// Entry kinds supported by the DSL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// SAFE note converting in the round
    Safe,
    /// New-money investor in the round
    Investor,
}

impl EntryKind {
    /// Parse an entry kind from its keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_uppercase().as_str() {
            "SAFE" | "NOTE" => Some(Self::Safe),
            "INVESTOR" | "INV" => Some(Self::Investor),
            _ => None,
        }
    }
}
