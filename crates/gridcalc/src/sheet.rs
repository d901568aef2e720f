//! The sheet: sparse cell storage and the editing API
//!
//! # Example
//!
//! ```rust
//! use gridcalc::prelude::*;
//!
//! let mut sheet = Sheet::new();
//! sheet.set_cell("A1".parse().unwrap(), "2").unwrap();
//! sheet.set_cell("B1".parse().unwrap(), "=A1*21").unwrap();
//!
//! let b1 = sheet.cell("B1".parse().unwrap()).unwrap().unwrap();
//! assert_eq!(b1.value(), CellValue::Number(42.0));
//! ```

use std::collections::BTreeMap;

use gridcalc_core::{CellError, CellValue, Position, Result, Size};
use gridcalc_formula::EvaluationResult;
use log::debug;

use crate::cell::{Cell, CellContent, CellView};

/// A grid of cells, keyed row-major.
///
/// Only populated positions take space. A position is populated once it has
/// been edited or once a formula refers to it; the latter are placeholder
/// cells with [`CellContent::Empty`].
#[derive(Debug, Default)]
pub struct Sheet {
    rows: BTreeMap<u32, BTreeMap<u32, Cell>>,
    /// Number of populated positions
    count: usize,
}

impl Sheet {
    pub fn new() -> Self {
        Self::default()
    }

    // === Editing ===

    /// Set the text of the cell at `position`.
    ///
    /// The text is classified as empty, literal text or a formula. On any
    /// error the sheet is unchanged: a bad position, a formula that does not
    /// parse, or a formula that would make `position` depend on itself all
    /// reject the edit before anything is touched.
    pub fn set_cell(&mut self, position: Position, text: &str) -> Result<()> {
        let position = position.validate()?;

        if let Some(cell) = self.get(position) {
            if cell.text() == text {
                return Ok(());
            }
        }

        let content = CellContent::from_text(text).map_err(|e| {
            debug!("Rejected edit of {}: {}", position, e);
            e
        })?;

        self.check_circular_dependency(position, content.referenced_cells())
            .map_err(|e| {
                debug!("Rejected edit of {}: {}", position, e);
                e
            })?;

        self.install_content(position, content)?;
        debug!("Set {} to {:?}", position, text);
        Ok(())
    }

    /// Read the cell at `position`; `None` if nothing was ever stored there
    pub fn cell(&self, position: Position) -> Result<Option<CellView<'_>>> {
        let position = position.validate()?;
        Ok(self.view(position))
    }

    /// Clear the cell at `position`.
    ///
    /// The cell becomes empty. If no other cell reads it, it is removed from
    /// the sheet altogether; otherwise it stays behind as a placeholder so
    /// its dependents keep their edges.
    pub fn clear_cell(&mut self, position: Position) -> Result<()> {
        let position = position.validate()?;
        if self.get(position).is_none() {
            return Ok(());
        }

        self.set_cell(position, "")?;

        let unreferenced = self
            .get(position)
            .map_or(false, |cell| !cell.is_referenced());
        if unreferenced {
            self.remove(position);
            debug!("Removed {}", position);
        }
        Ok(())
    }

    // === Queries ===

    /// Value at `position`, treating an absent cell as empty
    pub fn value_at(&self, position: Position) -> Result<CellValue> {
        Ok(self
            .cell(position)?
            .map(|view| view.value())
            .unwrap_or_else(CellValue::empty))
    }

    /// Smallest rectangle anchored at A1 that covers every cell with
    /// non-empty text. Placeholders and cleared cells do not count.
    pub fn printable_size(&self) -> Size {
        let mut size = Size::default();
        for (&row, cells) in &self.rows {
            for (&col, cell) in cells {
                if !cell.content.is_empty() {
                    size.rows = size.rows.max(row + 1);
                    size.cols = size.cols.max(col + 1);
                }
            }
        }
        size
    }

    /// Number of populated positions, placeholders included
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Iterate over populated cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = CellView<'_>> + '_ {
        self.rows.iter().flat_map(move |(&row, cells)| {
            cells
                .iter()
                .map(move |(&col, cell)| CellView::new(self, Position::new(row, col), cell))
        })
    }

    // === Storage ===

    pub(crate) fn view(&self, position: Position) -> Option<CellView<'_>> {
        self.get(position)
            .map(|cell| CellView::new(self, position, cell))
    }

    pub(crate) fn get(&self, position: Position) -> Option<&Cell> {
        self.rows.get(&position.row)?.get(&position.col)
    }

    pub(crate) fn get_mut(&mut self, position: Position) -> Option<&mut Cell> {
        self.rows.get_mut(&position.row)?.get_mut(&position.col)
    }

    /// Get the cell at `position`, inserting an empty one if needed.
    ///
    /// Used both by edits and when a formula starts referring to a position
    /// that has never been populated.
    pub(crate) fn get_or_create_cell_for_graph(&mut self, position: Position) -> Result<&mut Cell> {
        let position = position.validate()?;
        let row = self.rows.entry(position.row).or_default();
        if !row.contains_key(&position.col) {
            self.count += 1;
        }
        Ok(row.entry(position.col).or_insert_with(Cell::new))
    }

    fn remove(&mut self, position: Position) -> Option<Cell> {
        let row = self.rows.get_mut(&position.row)?;
        let cell = row.remove(&position.col)?;
        if row.is_empty() {
            self.rows.remove(&position.row);
        }
        self.count -= 1;
        Some(cell)
    }

    // === Evaluation ===

    /// Numeric value of `position` as seen by a formula.
    ///
    /// Absent and empty cells read as zero. Text must parse as a finite
    /// number after leading whitespace, with nothing left over.
    pub(crate) fn cell_number(&self, position: Position) -> EvaluationResult {
        if !position.is_valid() {
            return Err(CellError::Ref);
        }
        let Some(cell) = self.get(position) else {
            return Ok(0.0);
        };
        match cell.value(position, self) {
            CellValue::Number(n) => Ok(n),
            CellValue::String(s) => text_to_number(&s),
            CellValue::Error(e) => Err(e),
        }
    }
}

fn text_to_number(text: &str) -> EvaluationResult {
    if text.is_empty() {
        return Ok(0.0);
    }
    match text.trim_start().parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(CellError::Value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridcalc_core::Error;
    use pretty_assertions::assert_eq;

    fn pos(a1: &str) -> Position {
        a1.parse().unwrap()
    }

    #[test]
    fn test_new_sheet_is_empty() {
        let sheet = Sheet::new();
        assert!(sheet.is_empty());
        assert_eq!(sheet.printable_size(), Size::new(0, 0));
        assert!(sheet.cell(pos("A1")).unwrap().is_none());
    }

    #[test]
    fn test_set_and_read_text() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("B2"), "hello").unwrap();

        let cell = sheet.cell(pos("B2")).unwrap().unwrap();
        assert_eq!(cell.text(), "hello");
        assert_eq!(cell.value(), CellValue::string("hello"));
        assert_eq!(sheet.len(), 1);
        assert_eq!(sheet.printable_size(), Size::new(2, 2));
    }

    #[test]
    fn test_invalid_position_rejected() {
        let mut sheet = Sheet::new();
        assert!(matches!(
            sheet.set_cell(Position::NONE, "1"),
            Err(Error::InvalidPosition(_))
        ));
        assert!(matches!(
            sheet.set_cell(Position::new(16_384, 0), "1"),
            Err(Error::InvalidPosition(_))
        ));
        assert!(matches!(
            sheet.cell(Position::new(0, 16_384)),
            Err(Error::InvalidPosition(_))
        ));
        assert!(matches!(
            sheet.clear_cell(Position::NONE),
            Err(Error::InvalidPosition(_))
        ));
        assert!(sheet.is_empty());
    }

    #[test]
    fn test_set_empty_text_creates_cell() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("C3"), "").unwrap();

        let cell = sheet.cell(pos("C3")).unwrap().unwrap();
        assert_eq!(cell.text(), "");
        assert_eq!(cell.value(), CellValue::empty());
        assert_eq!(sheet.printable_size(), Size::new(0, 0));
    }

    #[test]
    fn test_syntax_error_leaves_sheet_untouched() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("A1"), "=1+2").unwrap();

        assert!(matches!(
            sheet.set_cell(pos("A1"), "=1+"),
            Err(Error::Syntax(_))
        ));
        assert_eq!(sheet.cell(pos("A1")).unwrap().unwrap().text(), "=1+2");

        assert!(matches!(
            sheet.set_cell(pos("B1"), "=A1*("),
            Err(Error::Syntax(_))
        ));
        assert!(sheet.cell(pos("B1")).unwrap().is_none());
    }

    #[test]
    fn test_placeholder_created_for_reference() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("A1"), "=C5+1").unwrap();

        let placeholder = sheet.cell(pos("C5")).unwrap().unwrap();
        assert_eq!(placeholder.text(), "");
        assert_eq!(placeholder.dependents(), vec![pos("A1")]);
        assert_eq!(sheet.len(), 2);
        assert_eq!(sheet.printable_size(), Size::new(1, 1));
    }

    #[test]
    fn test_clear_unreferenced_cell_removes_it() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("A1"), "text").unwrap();
        sheet.clear_cell(pos("A1")).unwrap();

        assert!(sheet.cell(pos("A1")).unwrap().is_none());
        assert!(sheet.is_empty());
    }

    #[test]
    fn test_clear_referenced_cell_keeps_placeholder() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("A1"), "5").unwrap();
        sheet.set_cell(pos("B1"), "=A1*2").unwrap();
        sheet.clear_cell(pos("A1")).unwrap();

        let a1 = sheet.cell(pos("A1")).unwrap().unwrap();
        assert_eq!(a1.text(), "");
        assert!(a1.is_referenced());
        assert_eq!(sheet.value_at(pos("B1")).unwrap(), CellValue::Number(0.0));
    }

    #[test]
    fn test_clear_absent_cell_is_noop() {
        let mut sheet = Sheet::new();
        sheet.clear_cell(pos("Z100")).unwrap();
        assert!(sheet.is_empty());
    }

    #[test]
    fn test_value_of_absent_cell() {
        let sheet = Sheet::new();
        assert_eq!(sheet.value_at(pos("D4")).unwrap(), CellValue::empty());
    }

    #[test]
    fn test_cells_iterate_row_major() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("B2"), "x").unwrap();
        sheet.set_cell(pos("A2"), "y").unwrap();
        sheet.set_cell(pos("C1"), "z").unwrap();

        let order: Vec<Position> = sheet.cells().map(|c| c.position()).collect();
        assert_eq!(order, vec![pos("C1"), pos("A2"), pos("B2")]);
    }

    #[test]
    fn test_text_to_number() {
        assert_eq!(text_to_number(""), Ok(0.0));
        assert_eq!(text_to_number("42"), Ok(42.0));
        assert_eq!(text_to_number("  3.5"), Ok(3.5));
        assert_eq!(text_to_number("1e2"), Ok(100.0));
        assert_eq!(text_to_number("3.5 "), Err(CellError::Value));
        assert_eq!(text_to_number("12abc"), Err(CellError::Value));
        assert_eq!(text_to_number("   "), Err(CellError::Value));
        assert_eq!(text_to_number("inf"), Err(CellError::Value));
        assert_eq!(text_to_number("NaN"), Err(CellError::Value));
        assert_eq!(text_to_number("1e999"), Err(CellError::Value));
    }
}
