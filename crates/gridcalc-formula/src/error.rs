//! Formula error types

use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur while parsing a formula.
///
/// Evaluation never fails with this type; evaluation problems are
/// [`CellError`](gridcalc_core::CellError) values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormulaError {
    /// Formula parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Numeric literal that is malformed or not finite
    #[error("Invalid number: {0}")]
    InvalidNumber(String),
}

impl From<FormulaError> for gridcalc_core::Error {
    fn from(err: FormulaError) -> Self {
        gridcalc_core::Error::Syntax(err.to_string())
    }
}
