//! Prelude module - common imports for gridcalc users
//!
//! ```rust
//! use gridcalc::prelude::*;
//! ```

pub use crate::{
    // Cell types
    CellContent,
    CellError,
    CellValue,
    CellView,
    // Error types
    Error,
    // Formula types
    Formula,
    // Grid types
    Position,
    Result,
    // Main types
    Sheet,
    Size,
};
