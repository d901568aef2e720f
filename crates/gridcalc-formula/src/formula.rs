//! Parsed formula handle

use crate::ast::FormulaExpr;
use crate::error::FormulaResult;
use crate::evaluator::{evaluate, EvaluationContext, EvaluationResult};
use crate::parser::parse_formula;
use gridcalc_core::Position;

/// A parsed formula together with the cells it reads.
///
/// This is the only thing the sheet needs from the formula language: parse
/// once, then evaluate, list references, and print back.
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    expr: FormulaExpr,
    /// Valid referenced positions, sorted and de-duplicated
    references: Vec<Position>,
}

impl Formula {
    /// Parse formula text, including its leading `=`
    pub fn parse(text: &str) -> FormulaResult<Self> {
        let expr = parse_formula(text)?;

        let mut references = Vec::new();
        expr.visit_references(&mut |pos| {
            if pos.is_valid() {
                references.push(pos);
            }
        });
        references.sort_unstable();
        references.dedup();

        Ok(Self { expr, references })
    }

    /// Evaluate against `ctx`
    pub fn evaluate<C>(&self, ctx: &C) -> EvaluationResult
    where
        C: EvaluationContext + ?Sized,
    {
        evaluate(&self.expr, ctx)
    }

    /// Canonical expression text, without the leading `=`
    pub fn expression(&self) -> String {
        self.expr.to_string()
    }

    /// Valid positions this formula reads, in position order
    pub fn referenced_cells(&self) -> &[Position] {
        &self.references
    }
}
