//! Error types for gridcalc-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Edit-time failures.
///
/// These reject an edit outright and leave the sheet untouched. Problems that
/// show up while *evaluating* a formula are not errors in this sense; they are
/// ordinary values, see [`CellError`](crate::CellError).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Position outside the supported grid, or unparsable A1 text
    #[error("Invalid position: {0}")]
    InvalidPosition(String),

    /// Formula text that does not parse
    #[error("Formula syntax error: {0}")]
    Syntax(String),

    /// The edit would make a cell depend on itself, directly or transitively
    #[error("Circular dependency detected involving cell {0}")]
    CircularDependency(String),
}
