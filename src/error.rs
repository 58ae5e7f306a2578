//! Error types for the nodal solver.
//!
//! This module provides a unified error type [`NodalError`] that covers
//! every way a solve request can fail: a malformed netlist line, an element
//! that cannot be modeled, an unsolvable system, or file I/O.

use thiserror::Error;

/// Result type alias using [`NodalError`].
pub type Result<T> = std::result::Result<T, NodalError>;

/// Coarse classification of a [`NodalError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The netlist text could not be read as elements.
    Parse,
    /// An element is syntactically fine but cannot be stamped.
    Modeling,
    /// The assembled system has no unique solution.
    Singular,
    /// Reading the netlist or writing the result failed.
    Io,
}

/// Unified error type for all nodal operations.
#[derive(Error, Debug)]
pub enum NodalError {
    // ============ Netlist Parsing Errors ============
    /// A line matches neither the resistor nor the voltage source grammar
    #[error("Parse error at line {line}: {message}: '{text}'")]
    ParseError {
        line: usize,
        text: String,
        message: String,
    },

    // ============ Modeling Errors ============
    /// Resistance of zero or below
    #[error("Resistor '{name}' at line {line} has non-positive resistance {value}")]
    NonPositiveResistance { name: String, line: usize, value: f64 },

    /// Voltage source between two non-ground nodes under the reduced policy
    #[error("Voltage source '{name}' at line {line} is floating; the reduced policy only supports grounded sources")]
    FloatingSource { name: String, line: usize },

    /// Voltage source with both terminals on ground
    #[error("Voltage source '{name}' at line {line} has both terminals on ground")]
    ShortedSource { name: String, line: usize },

    /// Node referenced by an element but absent from the index
    #[error("Node '{node}' not found in node index")]
    UnknownNode { node: String },

    // ============ Solver Errors ============
    /// Matrix is singular and cannot be solved
    #[error("Singular matrix at unknown '{unknown}' - circuit may have a floating subnetwork or conflicting sources")]
    SingularMatrix { unknown: String },

    /// Two grounded sources fix the same node under the reduced policy
    #[error("Voltage sources '{first}' and '{second}' both fix node '{node}'")]
    ConflictingSources {
        node: String,
        first: String,
        second: String,
    },

    /// A matrix or vector does not have the length its system needs
    #[error("Dimension mismatch: {what} has {found} entries, expected {expected}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    // ============ I/O Errors ============
    /// Error reading the netlist file
    #[error("Failed to read netlist file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error writing the result file
    #[error("Failed to write output file '{path}': {source}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl NodalError {
    /// Create a parse error for the given 1-based line.
    pub fn parse(line: usize, text: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            text: text.into(),
            message: message.into(),
        }
    }

    /// Create a singular matrix error naming the offending unknown.
    pub fn singular(unknown: impl Into<String>) -> Self {
        Self::SingularMatrix {
            unknown: unknown.into(),
        }
    }

    /// Which part of the taxonomy this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ParseError { .. } => ErrorCategory::Parse,
            Self::NonPositiveResistance { .. }
            | Self::FloatingSource { .. }
            | Self::ShortedSource { .. }
            | Self::UnknownNode { .. } => ErrorCategory::Modeling,
            Self::SingularMatrix { .. }
            | Self::ConflictingSources { .. }
            | Self::DimensionMismatch { .. } => ErrorCategory::Singular,
            Self::FileReadError { .. } | Self::FileWriteError { .. } => ErrorCategory::Io,
        }
    }
}
