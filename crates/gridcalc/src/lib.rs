//! # gridcalc
//!
//! An in-memory spreadsheet engine.
//!
//! A [`Sheet`] is a sparse grid of cells. Each cell holds nothing, literal
//! text, or an arithmetic formula over other cells. The sheet keeps a
//! dependency graph between cells and uses it to:
//!
//! - reject any edit that would introduce a circular reference
//! - evaluate formulas lazily and memoize the result
//! - drop memoized results when something they depend on changes
//!
//! ## Example
//!
//! ```rust
//! use gridcalc::prelude::*;
//!
//! let mut sheet = Sheet::new();
//! let a1: Position = "A1".parse().unwrap();
//! let b1: Position = "B1".parse().unwrap();
//!
//! sheet.set_cell(a1, "5").unwrap();
//! sheet.set_cell(b1, "=A1+3").unwrap();
//! assert_eq!(sheet.value_at(b1).unwrap(), CellValue::Number(8.0));
//!
//! // Cycles are rejected and leave the sheet as it was
//! assert!(matches!(sheet.set_cell(a1, "=B1"), Err(Error::CircularDependency(_))));
//!
//! sheet.set_cell(a1, "7").unwrap();
//! assert_eq!(sheet.value_at(b1).unwrap(), CellValue::Number(10.0));
//!
//! let mut out = Vec::new();
//! sheet.print_values(&mut out).unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), "7\t10\n");
//! ```

pub mod cell;
mod graph;
pub mod prelude;
mod print;
pub mod sheet;

pub use cell::{Cell, CellContent, CellView, ESCAPE_SIGN};
pub use sheet::Sheet;

// Re-export core types
pub use gridcalc_core::{
    CellError, CellValue, Error, Position, Result, Size, MAX_COLS, MAX_COL_LETTERS, MAX_ROWS,
};

// Re-export formula types
pub use gridcalc_formula::{
    parse_formula, EvaluationContext, EvaluationResult, Formula, FormulaError, FormulaExpr,
    FORMULA_SIGN,
};
