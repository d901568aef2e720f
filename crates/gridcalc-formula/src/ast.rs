//! Formula Abstract Syntax Tree types

use gridcalc_core::{CellError, Position};
use std::fmt;

/// Formula expression AST
#[derive(Debug, Clone, PartialEq)]
pub enum FormulaExpr {
    // === Literals ===
    /// Numeric literal (always finite, never negative; see [`UnaryOperator::Negate`])
    Number(f64),
    /// Error literal (only `#REF!` is accepted by the parser)
    Error(CellError),

    // === References ===
    /// Single cell reference; may be an invalid position
    CellRef(Position),

    // === Operators ===
    /// Binary operation
    BinaryOp {
        op: BinaryOperator,
        left: Box<FormulaExpr>,
        right: Box<FormulaExpr>,
    },
    /// Unary operation
    UnaryOp {
        op: UnaryOperator,
        operand: Box<FormulaExpr>,
    },
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Plus,
    Negate,
}

impl BinaryOperator {
    pub fn symbol(&self) -> char {
        match self {
            BinaryOperator::Add => '+',
            BinaryOperator::Subtract => '-',
            BinaryOperator::Multiply => '*',
            BinaryOperator::Divide => '/',
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            BinaryOperator::Add | BinaryOperator::Subtract => 1,
            BinaryOperator::Multiply | BinaryOperator::Divide => 2,
        }
    }
}

impl UnaryOperator {
    pub fn symbol(&self) -> char {
        match self {
            UnaryOperator::Plus => '+',
            UnaryOperator::Negate => '-',
        }
    }
}

impl FormulaExpr {
    fn precedence(&self) -> u8 {
        match self {
            FormulaExpr::BinaryOp { op, .. } => op.precedence(),
            FormulaExpr::UnaryOp { .. } => 3,
            _ => 4,
        }
    }

    /// Call `f` for every cell reference in evaluation order (left to right)
    pub fn visit_references<F: FnMut(Position)>(&self, f: &mut F) {
        match self {
            FormulaExpr::CellRef(pos) => f(*pos),
            FormulaExpr::BinaryOp { left, right, .. } => {
                left.visit_references(f);
                right.visit_references(f);
            }
            FormulaExpr::UnaryOp { operand, .. } => operand.visit_references(f),
            FormulaExpr::Number(_) | FormulaExpr::Error(_) => {}
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>, parens: bool) -> fmt::Result {
        if parens {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }
}

/// Canonical printing.
///
/// Whitespace is dropped and only the parentheses needed to rebuild the same
/// tree are kept, so `parse(print(expr)) == expr`.
impl fmt::Display for FormulaExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormulaExpr::Number(n) => write!(f, "{}", n),
            FormulaExpr::Error(e) => write!(f, "{}", e),
            FormulaExpr::CellRef(pos) => write!(f, "{}", pos),
            FormulaExpr::BinaryOp { op, left, right } => {
                let prec = op.precedence();
                left.fmt_operand(f, left.precedence() < prec)?;
                write!(f, "{}", op.symbol())?;
                // Equal precedence on the right keeps its parentheses: a-(b-c)
                right.fmt_operand(f, right.precedence() <= prec)
            }
            FormulaExpr::UnaryOp { op, operand } => {
                write!(f, "{}", op.symbol())?;
                operand.fmt_operand(f, matches!(**operand, FormulaExpr::BinaryOp { .. }))
            }
        }
    }
}
