//! Cell-related types and utilities
//!
//! This module contains:
//! - [`Position`] - A cell's location (e.g., "A1")
//! - [`Size`] - The extent of a printable area
//! - [`CellValue`] - The value a cell evaluates to
//! - [`CellError`] - Evaluation error categories

mod position;
mod value;

pub use position::{Position, Size};
pub use value::{CellError, CellValue};
