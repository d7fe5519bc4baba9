//! Error types for the SAFE dilution calculator.
//!
//! This module provides a unified error type [`DilutionError`] that covers
//! everything that can go wrong *around* the solver: scenario parsing,
//! scenario validation, checking a result for ownership closure, and I/O.
//! The solver itself never fails; degenerate input simply produces
//! non-finite numbers.

use thiserror::Error;

/// Result type alias using [`DilutionError`].
pub type Result<T> = std::result::Result<T, DilutionError>;

/// Unified error type for all calculator operations.
#[derive(Error, Debug)]
pub enum DilutionError {
    // ============ Scenario Parsing Errors ============
    /// Error during lexical analysis
    #[error("Lexer error at line {line}, column {column}: {message}")]
    LexerError {
        line: usize,
        column: usize,
        message: String,
    },

    /// Error during parsing
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    /// Malformed note or investor entry
    #[error("Invalid entry '{id}' at line {line}: {message}")]
    InvalidEntry {
        id: String,
        line: usize,
        message: String,
    },

    /// Unknown entry keyword
    #[error("Unknown entry kind '{kind}' at line {line}")]
    UnknownEntryKind { kind: String, line: usize },

    /// Invalid parameter value
    #[error("Invalid parameter '{param}' for '{entry}': {message}")]
    InvalidParameter {
        entry: String,
        param: String,
        message: String,
    },

    /// A directive that may appear once was repeated
    #[error("Directive '{directive}' repeated at line {line}")]
    DuplicateDirective { directive: String, line: usize },

    // ============ Scenario Validation Errors ============
    /// Two holders share an id
    #[error("Duplicate holder id '{id}'")]
    DuplicateId { id: String },

    /// A holder uses an id reserved for a synthetic result entry
    #[error("Holder id '{id}' is reserved for a computed result entry")]
    ReservedId { id: String },

    // ============ Result Errors ============
    /// Ownership fractions do not close to 100%
    #[error("Total ownership is {total:.4}, expected 1 within {tolerance} - is the new round valuation missing?")]
    InvalidOwnership { total: f64, tolerance: f64 },

    // ============ I/O Errors ============
    /// Error reading a scenario file
    #[error("Failed to read scenario file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error writing a report
    #[error("Report output error: {message}")]
    OutputError { message: String },
}

impl DilutionError {
    /// Create a lexer error
    pub fn lexer(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::LexerError {
            line,
            column,
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
        }
    }

    /// Create an invalid entry error
    pub fn invalid_entry(id: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self::InvalidEntry {
            id: id.into(),
            line,
            message: message.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(
        entry: impl Into<String>,
        param: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            entry: entry.into(),
            param: param.into(),
            message: message.into(),
        }
    }
}
