//! # gridcalc-core
//!
//! Core data types shared by the gridcalc crates:
//! - [`Position`] - A zero-based `(row, col)` grid coordinate with A1 notation
//! - [`CellValue`] and [`CellError`] - What a cell evaluates to
//! - [`Error`] - Edit-time failures (bad position, syntax, circular dependency)
//!
//! ## Example
//!
//! ```rust
//! use gridcalc_core::{CellError, CellValue, Position};
//!
//! let pos: Position = "B3".parse().unwrap();
//! assert_eq!(pos, Position::new(2, 1));
//! assert_eq!(pos.to_string(), "B3");
//!
//! assert_eq!(CellValue::from(CellError::Arithmetic).to_string(), "#ARITHM!");
//! ```

pub mod cell;
pub mod error;

// Re-exports for convenience
pub use cell::{CellError, CellValue, Position, Size};
pub use error::{Error, Result};

/// Maximum number of rows in a sheet
pub const MAX_ROWS: u32 = 16_384;

/// Maximum number of columns in a sheet
pub const MAX_COLS: u32 = 16_384;

/// Maximum number of letters in the column part of an A1 reference
pub const MAX_COL_LETTERS: usize = 3;
