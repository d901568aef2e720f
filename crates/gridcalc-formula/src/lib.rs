//! # gridcalc-formula
//!
//! Formula support for gridcalc.
//!
//! This crate provides:
//! - Formula parsing (text → AST)
//! - Canonical printing (AST → text)
//! - Formula evaluation (AST → number or [`CellError`](gridcalc_core::CellError))
//!
//! The language is plain arithmetic over numbers and cell references:
//! `+ - * /`, unary `+`/`-`, and parentheses.
//!
//! ## Example
//!
//! ```rust
//! use gridcalc_core::{CellError, Position};
//! use gridcalc_formula::Formula;
//!
//! let formula = Formula::parse("=(A1 + 2) * B1").unwrap();
//! assert_eq!(formula.expression(), "(A1+2)*B1");
//! assert_eq!(formula.referenced_cells(), &[Position::new(0, 0), Position::new(0, 1)]);
//!
//! let lookup = |pos: Position| -> Result<f64, CellError> {
//!     Ok(if pos == Position::new(0, 0) { 4.0 } else { 10.0 })
//! };
//! assert_eq!(formula.evaluate(&lookup), Ok(60.0));
//! ```

pub mod ast;
pub mod error;
pub mod evaluator;
pub mod formula;
pub mod parser;

pub use ast::{BinaryOperator, FormulaExpr, UnaryOperator};
pub use error::{FormulaError, FormulaResult};
pub use evaluator::{evaluate, EvaluationContext, EvaluationResult};
pub use formula::Formula;
pub use parser::parse_formula;

/// Leading character that marks cell text as a formula
pub const FORMULA_SIGN: char = '=';
