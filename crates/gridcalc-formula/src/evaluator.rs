//! Formula evaluator
//!
//! Evaluates formula ASTs to produce numbers.

use crate::ast::{BinaryOperator, FormulaExpr, UnaryOperator};
use gridcalc_core::{CellError, Position};

/// Outcome of evaluating a formula: a finite number or an evaluation error
pub type EvaluationResult = Result<f64, CellError>;

/// Source of cell values during evaluation.
///
/// The evaluator does not know about sheets; it asks the context for the
/// numeric value of every referenced position and propagates whatever error
/// comes back. Any `Fn(Position) -> EvaluationResult` closure is a context.
pub trait EvaluationContext {
    /// Numeric value of the cell at `position`
    fn cell_number(&self, position: Position) -> EvaluationResult;
}

impl<F> EvaluationContext for F
where
    F: Fn(Position) -> EvaluationResult,
{
    fn cell_number(&self, position: Position) -> EvaluationResult {
        self(position)
    }
}

/// Evaluate a formula expression.
///
/// Operands are evaluated left to right and the first error wins.
pub fn evaluate<C>(expr: &FormulaExpr, ctx: &C) -> EvaluationResult
where
    C: EvaluationContext + ?Sized,
{
    match expr {
        // === Literals ===
        FormulaExpr::Number(n) => Ok(*n),
        FormulaExpr::Error(e) => Err(*e),

        // === References ===
        FormulaExpr::CellRef(position) => ctx.cell_number(*position),

        // === Operators ===
        FormulaExpr::BinaryOp { op, left, right } => {
            let l = evaluate(left, ctx)?;
            let r = evaluate(right, ctx)?;
            evaluate_binary_op(*op, l, r)
        }

        FormulaExpr::UnaryOp { op, operand } => {
            let n = evaluate(operand, ctx)?;
            Ok(match op {
                UnaryOperator::Plus => n,
                UnaryOperator::Negate => -n,
            })
        }
    }
}

/// Evaluate a binary operation
fn evaluate_binary_op(op: BinaryOperator, l: f64, r: f64) -> EvaluationResult {
    let result = match op {
        BinaryOperator::Add => l + r,
        BinaryOperator::Subtract => l - r,
        BinaryOperator::Multiply => l * r,
        BinaryOperator::Divide => l / r,
    };

    // Division by zero and overflow both end up here
    if result.is_finite() {
        Ok(result)
    } else {
        Err(CellError::Arithmetic)
    }
}
