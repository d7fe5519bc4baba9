//! DSL (Domain Specific Language) parser for financing scenarios.
//!
//! This module provides a small line-oriented language for describing a cap
//! table, the SAFE notes outstanding against it, and the priced round they
//! convert into. It stands in for the forms and saved state of an
//! interactive calculator: one file holds everything a solve needs.
//!
//! # Grammar Overview
//!
//! ```text
//! scenario   = { line }
//! line       = comment | directive | entry | empty
//! comment    = ('#' | ';') { any_char }
//! directive  = ".captable" { param } | ".round" value [type] | ".round" type value
//! entry      = kind id [string] { value | param | type }
//!
//! kind       = "SAFE" | "NOTE" | "INVESTOR" | "INV"
//! param      = identifier '=' value
//! type       = "pre" | "post" | "premoney" | "postmoney" | "pre-money" | "post-money"
//! value      = ['-'|'+'] ['$'] digit { digit | '_' } ['.' digit+] [exponent] [suffix]
//! suffix     = 'k' | 'K' | 'M' | 'B' | 'G'
//! string     = '"' { any_char except '"' or newline } '"'
//! ```
//!
//! # Directives
//!
//! | Directive | Description | Syntax |
//! |-----------|-------------|--------|
//! | .captable | Pre-round capitalization | `.captable shares=<n> options=<n> pool=<percent>` |
//! | .round | Priced round valuation | `.round <pre\|post> <valuation>` |
//!
//! # Entries
//!
//! | Kind | Description | Syntax |
//! |------|-------------|--------|
//! | SAFE | Convertible note | `SAFE <id> ["name"] <principal> cap=<value> [discount=<retained %>] [pre\|post]` |
//! | INVESTOR | New-round investor | `INVESTOR <id> ["name"] <principal>` |
//!
//! # Example
//!
//! ```text
//! # Seed round converting two SAFEs
//! .captable shares=5M options=500k pool=10
//! .round pre $12M
//!
//! SAFE angel  "Angel Syndicate" 250k cap=5M discount=80
//! SAFE friends "Friends & Family" 100k cap=4M pre
//! INVESTOR lead "Lead Fund" 2M
//! ```

mod ast;
mod lexer;
mod parser;

pub use ast::*;
pub use lexer::{parse_value, Lexer, Token, TokenKind};
pub use parser::Parser;

use crate::error::Result;

/// Parse a scenario DSL string into an AST.
pub fn parse(input: &str) -> Result<ScenarioAst> {
    let lexer = Lexer::new(input);
    let mut parser = Parser::new(lexer)?;
    parser.parse()
}

/// Parse a scenario DSL file.
#[cfg(feature = "cli")]
pub fn parse_file(path: &std::path::Path) -> Result<ScenarioAst> {
    let content =
        std::fs::read_to_string(path).map_err(|e| crate::error::DilutionError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;
    parse(&content)
}
