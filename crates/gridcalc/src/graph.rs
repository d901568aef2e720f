//! Dependency tracking between cells
//!
//! Every cell keeps both directions of its edges: `precedents` are the cells
//! it reads, `dependents` the cells that read it. The two are kept inverse to
//! each other and the graph they form is acyclic.

use ahash::AHashSet;
use gridcalc_core::{Error, Position, Result};
use log::{debug, trace};

use crate::cell::CellContent;
use crate::sheet::Sheet;

impl Sheet {
    /// Check that giving `position` a formula reading `referenced` keeps the
    /// graph acyclic.
    ///
    /// Walks everything that already depends on `position`, `position`
    /// included. If the walk reaches one of the new references, the edit
    /// would close a loop.
    pub(crate) fn check_circular_dependency(
        &self,
        position: Position,
        referenced: &[Position],
    ) -> Result<()> {
        if referenced.is_empty() {
            return Ok(());
        }

        let targets: AHashSet<Position> = referenced.iter().copied().collect();
        let mut visited = AHashSet::new();
        let mut stack = vec![position];

        while let Some(current) = stack.pop() {
            if targets.contains(&current) {
                return Err(Error::CircularDependency(position.to_string()));
            }
            if !visited.insert(current) {
                continue;
            }
            if let Some(cell) = self.get(current) {
                stack.extend(
                    cell.dependents
                        .iter()
                        .copied()
                        .filter(|dependent| !visited.contains(dependent)),
                );
            }
        }

        Ok(())
    }

    /// Replace the content at `position` and bring the graph up to date.
    ///
    /// The caller has already parsed the content and checked it for cycles.
    pub(crate) fn install_content(&mut self, position: Position, content: CellContent) -> Result<()> {
        let referenced = content.referenced_cells().to_vec();
        for &target in &referenced {
            target.validate()?;
        }

        let cell = self.get_or_create_cell_for_graph(position)?;
        cell.content = content;
        let old_precedents = std::mem::take(&mut cell.precedents);

        for precedent in old_precedents {
            if let Some(cell) = self.get_mut(precedent) {
                cell.dependents.remove(&position);
            }
        }

        for &precedent in &referenced {
            self.get_or_create_cell_for_graph(precedent)?
                .dependents
                .insert(position);
        }

        if let Some(cell) = self.get_mut(position) {
            cell.precedents = referenced.into_iter().collect();
        }

        self.invalidate_caches(position);
        Ok(())
    }

    /// Drop cached values of `position` and everything depending on it.
    ///
    /// Each cell is visited at most once, so diamonds do not multiply work.
    pub(crate) fn invalidate_caches(&mut self, position: Position) {
        let mut visited = AHashSet::new();
        let mut stack = vec![position];
        let mut invalidated = 0usize;

        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            if let Some(cell) = self.get_mut(current) {
                if cell.invalidate_cache() {
                    trace!("Invalidated {}", current);
                    invalidated += 1;
                }
                stack.extend(cell.dependents.iter().copied());
            }
        }

        if invalidated > 0 {
            debug!(
                "Edit of {} invalidated {} cached value(s)",
                position, invalidated
            );
        }
    }

    /// Evaluate the uncached formulas `position` reads, deepest first.
    ///
    /// Afterwards every formula `position` reads directly is cached, so
    /// evaluating `position` itself only looks one level down and stack depth
    /// does not grow with the length of a reference chain.
    pub(crate) fn warm_precedents(&self, position: Position) {
        let mut order = Vec::new();
        let mut visited = AHashSet::new();
        let mut stack = vec![(position, false)];

        while let Some((current, expanded)) = stack.pop() {
            if expanded {
                order.push(current);
                continue;
            }
            if !visited.insert(current) {
                continue;
            }
            stack.push((current, true));
            if let Some(cell) = self.get(current) {
                for &precedent in &cell.precedents {
                    let pending = self
                        .get(precedent)
                        .map_or(false, |cell| cell.needs_evaluation());
                    if pending && !visited.contains(&precedent) {
                        stack.push((precedent, false));
                    }
                }
            }
        }

        // `position` finishes last; the caller evaluates it
        order.pop();
        for current in order {
            if let Some(cell) = self.get(current) {
                cell.value(current, self);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridcalc_core::CellValue;
    use pretty_assertions::assert_eq;

    fn pos(a1: &str) -> Position {
        a1.parse().unwrap()
    }

    #[test]
    fn test_edges_are_inverse() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("C1"), "=A1+B1").unwrap();

        let c1 = sheet.cell(pos("C1")).unwrap().unwrap();
        assert_eq!(c1.precedents(), vec![pos("A1"), pos("B1")]);

        for p in ["A1", "B1"] {
            let cell = sheet.cell(pos(p)).unwrap().unwrap();
            assert_eq!(cell.dependents(), vec![pos("C1")]);
        }
    }

    #[test]
    fn test_rewire_drops_old_edges() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("C1"), "=A1").unwrap();
        sheet.set_cell(pos("C1"), "=B1").unwrap();

        assert!(!sheet.cell(pos("A1")).unwrap().unwrap().is_referenced());
        assert_eq!(
            sheet.cell(pos("B1")).unwrap().unwrap().dependents(),
            vec![pos("C1")]
        );
        assert_eq!(
            sheet.cell(pos("C1")).unwrap().unwrap().precedents(),
            vec![pos("B1")]
        );
    }

    #[test]
    fn test_text_edit_drops_edges() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("B1"), "=A1*2").unwrap();
        sheet.set_cell(pos("B1"), "plain").unwrap();

        assert!(sheet.cell(pos("B1")).unwrap().unwrap().precedents().is_empty());
        assert!(!sheet.cell(pos("A1")).unwrap().unwrap().is_referenced());
    }

    #[test]
    fn test_self_reference_rejected() {
        let mut sheet = Sheet::new();
        assert!(matches!(
            sheet.set_cell(pos("A1"), "=A1+1"),
            Err(Error::CircularDependency(_))
        ));
        assert!(sheet.is_empty());
    }

    #[test]
    fn test_indirect_cycle_rejected() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("A1"), "=B1").unwrap();
        sheet.set_cell(pos("B1"), "=C1").unwrap();

        assert!(matches!(
            sheet.set_cell(pos("C1"), "=A1"),
            Err(Error::CircularDependency(_))
        ));

        let c1 = sheet.cell(pos("C1")).unwrap().unwrap();
        assert_eq!(c1.text(), "");
        assert!(c1.precedents().is_empty());
        assert_eq!(c1.dependents(), vec![pos("B1")]);
    }

    #[test]
    fn test_rejected_cycle_keeps_previous_formula() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("A1"), "=B1+1").unwrap();
        sheet.set_cell(pos("B1"), "=5").unwrap();

        assert!(sheet.set_cell(pos("B1"), "=A1").is_err());
        assert_eq!(sheet.cell(pos("B1")).unwrap().unwrap().text(), "=5");
        assert_eq!(sheet.value_at(pos("A1")).unwrap(), CellValue::Number(6.0));
    }

    #[test]
    fn test_cycle_check_ignores_unrelated_cells() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("B1"), "=A1").unwrap();
        sheet.set_cell(pos("C1"), "=A1").unwrap();
        sheet.set_cell(pos("D1"), "=B1+C1").unwrap();
        sheet.set_cell(pos("A1"), "=E1").unwrap();

        assert!(matches!(
            sheet.set_cell(pos("E1"), "=D1"),
            Err(Error::CircularDependency(_))
        ));
    }

    #[test]
    fn test_invalidation_reaches_transitive_dependents() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("A1"), "1").unwrap();
        sheet.set_cell(pos("B1"), "=A1+1").unwrap();
        sheet.set_cell(pos("C1"), "=B1+1").unwrap();
        sheet.set_cell(pos("D1"), "=B1*C1").unwrap();

        assert_eq!(sheet.value_at(pos("D1")).unwrap(), CellValue::Number(6.0));
        for p in ["B1", "C1", "D1"] {
            assert!(sheet.cell(pos(p)).unwrap().unwrap().has_cached_value());
        }

        sheet.set_cell(pos("A1"), "2").unwrap();
        for p in ["B1", "C1", "D1"] {
            assert!(!sheet.cell(pos(p)).unwrap().unwrap().has_cached_value());
        }
        assert_eq!(sheet.value_at(pos("D1")).unwrap(), CellValue::Number(12.0));
    }

    #[test]
    fn test_long_reference_chain() {
        const LEN: u32 = 10_000;
        let mut sheet = Sheet::new();

        // Build bottom-up so each edit only sees cells below it
        sheet.set_cell(Position::new(LEN - 1, 0), "1").unwrap();
        for row in (0..LEN - 1).rev() {
            let below = Position::new(row + 1, 0);
            sheet
                .set_cell(Position::new(row, 0), &format!("={}+1", below))
                .unwrap();
        }

        let top = Position::new(0, 0);
        assert_eq!(sheet.value_at(top).unwrap(), CellValue::Number(LEN as f64));
        assert!(sheet
            .cell(Position::new(LEN / 2, 0))
            .unwrap()
            .unwrap()
            .has_cached_value());

        sheet.set_cell(Position::new(LEN - 1, 0), "2").unwrap();
        assert!(!sheet.cell(top).unwrap().unwrap().has_cached_value());
        assert_eq!(
            sheet.value_at(top).unwrap(),
            CellValue::Number(LEN as f64 + 1.0)
        );
    }

    #[test]
    fn test_warm_precedents_leaves_target_uncached() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("A1"), "3").unwrap();
        sheet.set_cell(pos("B1"), "=A1*2").unwrap();
        sheet.set_cell(pos("B2"), "=B1+1").unwrap();
        sheet.set_cell(pos("C1"), "=B1+B2").unwrap();

        sheet.warm_precedents(pos("C1"));
        assert!(sheet.cell(pos("B1")).unwrap().unwrap().has_cached_value());
        assert!(sheet.cell(pos("B2")).unwrap().unwrap().has_cached_value());
        assert!(!sheet.cell(pos("C1")).unwrap().unwrap().has_cached_value());
        assert_eq!(sheet.value_at(pos("C1")).unwrap(), CellValue::Number(13.0));
    }

    #[test]
    fn test_invalidation_leaves_unrelated_caches() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("B1"), "=A1").unwrap();
        sheet.set_cell(pos("B2"), "=A2").unwrap();
        sheet.value_at(pos("B1")).unwrap();
        sheet.value_at(pos("B2")).unwrap();

        sheet.set_cell(pos("A1"), "3").unwrap();
        assert!(!sheet.cell(pos("B1")).unwrap().unwrap().has_cached_value());
        assert!(sheet.cell(pos("B2")).unwrap().unwrap().has_cached_value());
    }
}
