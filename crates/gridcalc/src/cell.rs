//! Cells and their content
//!
//! A [`Cell`] is one populated grid slot. It owns its content, a memoized
//! value for formulas, and the two halves of its dependency edges. Edges are
//! positions, never references to other cells, so removing a cell from the
//! sheet cannot leave anything dangling.

use ahash::AHashSet;
use gridcalc_core::{CellValue, Position, Result};
use gridcalc_formula::{Formula, FORMULA_SIGN};
use log::trace;
use once_cell::unsync::OnceCell;

use crate::sheet::Sheet;

/// Leading character that forces the rest of the text to be taken literally
pub const ESCAPE_SIGN: char = '\'';

/// What a cell holds
#[derive(Debug, Clone, PartialEq)]
pub enum CellContent {
    /// No content; also used for placeholder cells
    Empty,
    /// Literal text, stored exactly as typed
    Text(String),
    /// Parsed formula
    Formula(Formula),
}

impl CellContent {
    /// Classify raw input.
    ///
    /// `=` followed by anything is a formula, other non-empty input is text,
    /// and the empty string is [`CellContent::Empty`]. A lone `=` is text.
    pub fn from_text(text: &str) -> Result<Self> {
        if text.len() > 1 && text.starts_with(FORMULA_SIGN) {
            Ok(CellContent::Formula(Formula::parse(text)?))
        } else if !text.is_empty() {
            Ok(CellContent::Text(text.to_string()))
        } else {
            Ok(CellContent::Empty)
        }
    }

    /// Text as the user would edit it
    pub fn text(&self) -> String {
        match self {
            CellContent::Empty => String::new(),
            CellContent::Text(raw) => raw.clone(),
            CellContent::Formula(formula) => {
                format!("{}{}", FORMULA_SIGN, formula.expression())
            }
        }
    }

    /// Valid positions read by this content, sorted
    pub fn referenced_cells(&self) -> &[Position] {
        match self {
            CellContent::Formula(formula) => formula.referenced_cells(),
            CellContent::Empty | CellContent::Text(_) => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellContent::Empty)
    }
}

/// One populated grid slot
#[derive(Debug)]
pub struct Cell {
    pub(crate) content: CellContent,
    /// Memoized formula result. Filling it through `&self` is invisible to
    /// callers apart from `has_cached_value`.
    cache: OnceCell<CellValue>,
    /// Cells this one reads
    pub(crate) precedents: AHashSet<Position>,
    /// Cells that read this one
    pub(crate) dependents: AHashSet<Position>,
}

impl Cell {
    pub(crate) fn new() -> Self {
        Self {
            content: CellContent::Empty,
            cache: OnceCell::new(),
            precedents: AHashSet::new(),
            dependents: AHashSet::new(),
        }
    }

    pub fn text(&self) -> String {
        self.content.text()
    }

    pub fn referenced_cells(&self) -> &[Position] {
        self.content.referenced_cells()
    }

    /// Whether any other cell reads this one
    pub fn is_referenced(&self) -> bool {
        !self.dependents.is_empty()
    }

    pub fn has_cached_value(&self) -> bool {
        self.cache.get().is_some()
    }

    /// Compute the value, evaluating and caching formulas on first use.
    ///
    /// `position` is only used for logging. Evaluation reads other cells
    /// through `sheet` but never changes content or edges.
    pub(crate) fn value(&self, position: Position, sheet: &Sheet) -> CellValue {
        match &self.content {
            CellContent::Empty => CellValue::empty(),
            CellContent::Text(raw) => {
                CellValue::string(raw.strip_prefix(ESCAPE_SIGN).unwrap_or(raw))
            }
            CellContent::Formula(formula) => {
                if self.cache.get().is_none() {
                    sheet.warm_precedents(position);
                }
                self.cache
                    .get_or_init(|| {
                        let lookup = |pos: Position| sheet.cell_number(pos);
                        let value = CellValue::from(formula.evaluate(&lookup));
                        trace!("cached {} = {}", position, value);
                        value
                    })
                    .clone()
            }
        }
    }

    /// A formula whose value has not been computed yet
    pub(crate) fn needs_evaluation(&self) -> bool {
        matches!(self.content, CellContent::Formula(_)) && self.cache.get().is_none()
    }

    /// Drop the cached value; returns whether there was one
    pub(crate) fn invalidate_cache(&mut self) -> bool {
        self.cache.take().is_some()
    }
}

/// Read-only view of a populated cell
#[derive(Debug, Clone, Copy)]
pub struct CellView<'a> {
    sheet: &'a Sheet,
    position: Position,
    cell: &'a Cell,
}

impl<'a> CellView<'a> {
    pub(crate) fn new(sheet: &'a Sheet, position: Position, cell: &'a Cell) -> Self {
        Self {
            sheet,
            position,
            cell,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Value of the cell; formulas are evaluated lazily and memoized
    pub fn value(&self) -> CellValue {
        self.cell.value(self.position, self.sheet)
    }

    /// Raw text for literals, `=` plus the canonical expression for formulas
    pub fn text(&self) -> String {
        self.cell.text()
    }

    /// Valid positions the formula reads, sorted and de-duplicated
    pub fn referenced_cells(&self) -> &'a [Position] {
        self.cell.referenced_cells()
    }

    pub fn is_referenced(&self) -> bool {
        self.cell.is_referenced()
    }

    pub fn has_cached_value(&self) -> bool {
        self.cell.has_cached_value()
    }

    /// Cells this one reads, sorted
    pub fn precedents(&self) -> Vec<Position> {
        sorted(&self.cell.precedents)
    }

    /// Cells that read this one, sorted
    pub fn dependents(&self) -> Vec<Position> {
        sorted(&self.cell.dependents)
    }
}

fn sorted(set: &AHashSet<Position>) -> Vec<Position> {
    let mut positions: Vec<Position> = set.iter().copied().collect();
    positions.sort_unstable();
    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridcalc_core::Error;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_classify_input() {
        assert_eq!(CellContent::from_text("").unwrap(), CellContent::Empty);
        assert_eq!(
            CellContent::from_text("hello").unwrap(),
            CellContent::Text("hello".into())
        );
        assert_eq!(
            CellContent::from_text("=").unwrap(),
            CellContent::Text("=".into())
        );
        assert!(matches!(
            CellContent::from_text("=1+2").unwrap(),
            CellContent::Formula(_)
        ));
        assert!(matches!(
            CellContent::from_text("=1+"),
            Err(Error::Syntax(_))
        ));
    }

    #[test]
    fn test_content_text() {
        assert_eq!(CellContent::Empty.text(), "");
        assert_eq!(CellContent::from_text("'=1").unwrap().text(), "'=1");
        assert_eq!(CellContent::from_text("=( 1 + A1 )").unwrap().text(), "=1+A1");
    }

    #[test]
    fn test_referenced_cells() {
        assert!(CellContent::from_text("A1").unwrap().referenced_cells().is_empty());
        assert_eq!(
            CellContent::from_text("=B1+A1+B1").unwrap().referenced_cells(),
            &[Position::new(0, 0), Position::new(0, 1)]
        );
    }

    #[test]
    fn test_literal_values() {
        let sheet = Sheet::new();
        let mut cell = Cell::new();
        let pos = Position::new(0, 0);

        assert_eq!(cell.value(pos, &sheet), CellValue::empty());

        cell.content = CellContent::from_text("'123").unwrap();
        assert_eq!(cell.value(pos, &sheet), CellValue::string("123"));

        cell.content = CellContent::from_text("''x").unwrap();
        assert_eq!(cell.value(pos, &sheet), CellValue::string("'x"));

        cell.content = CellContent::from_text("42").unwrap();
        assert_eq!(cell.value(pos, &sheet), CellValue::string("42"));
        assert!(!cell.has_cached_value());
    }

    #[test]
    fn test_formula_value_is_memoized() {
        let sheet = Sheet::new();
        let mut cell = Cell::new();
        let pos = Position::new(0, 0);
        cell.content = CellContent::from_text("=6/4").unwrap();

        assert!(!cell.has_cached_value());
        assert_eq!(cell.value(pos, &sheet), CellValue::Number(1.5));
        assert!(cell.has_cached_value());

        assert!(cell.invalidate_cache());
        assert!(!cell.invalidate_cache());
        assert!(!cell.has_cached_value());
    }
}
