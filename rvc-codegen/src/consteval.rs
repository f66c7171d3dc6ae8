//! Constant evaluation and folding
//!
//! Tracks which variables are currently known to hold compile-time
//! constants and evaluates foldable expressions. Classification via
//! [`ConstEval::is_constant`] is deliberately shallow (literal or
//! known-constant identifier); full-subtree folding goes through
//! [`ConstEval::try_fold`], which recurses over arithmetic binary
//! nodes and refuses to evaluate a division or modulo with a zero
//! right-hand side.

use log::trace;
use rvc_ast::{BinaryOp, Expr};
use std::collections::HashMap;

/// Constant-value table plus evaluation entry points.
///
/// The table is scoped to the function currently being lowered; the
/// generator clears it at each function entry.
#[derive(Debug, Default)]
pub struct ConstEval {
    values: HashMap<String, i32>,
}

/// Apply an arithmetic operator to two known values.
///
/// Returns `None` for non-arithmetic operators and for division or
/// modulo by zero, which must never be evaluated at compile time.
pub fn fold_arithmetic(op: BinaryOp, left: i32, right: i32) -> Option<i32> {
    match op {
        BinaryOp::Add => Some(left.wrapping_add(right)),
        BinaryOp::Sub => Some(left.wrapping_sub(right)),
        BinaryOp::Mul => Some(left.wrapping_mul(right)),
        BinaryOp::Div if right != 0 => Some(left.wrapping_div(right)),
        BinaryOp::Mod if right != 0 => Some(left.wrapping_rem(right)),
        _ => None,
    }
}

impl ConstEval {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shallow constantness check: a numeric literal, or an identifier
    /// currently present in the constant-value table. Every other
    /// variant is non-constant at this level.
    pub fn is_constant(&self, expr: &Expr) -> bool {
        match expr {
            Expr::Number(_) => true,
            Expr::Identifier(name) => self.values.contains_key(name),
            _ => false,
        }
    }

    /// Value of a constant expression. Only called after
    /// [`is_constant`](Self::is_constant) holds; the identifier lookup
    /// is still validated here so a contract slip degrades to zero
    /// instead of panicking.
    pub fn evaluate(&self, expr: &Expr) -> i32 {
        match expr {
            Expr::Number(value) => *value,
            Expr::Identifier(name) => self.values.get(name).copied().unwrap_or(0),
            _ => 0,
        }
    }

    /// Full-subtree fold: literals, known-constant identifiers, and
    /// arithmetic binaries whose both sides fold. Unary, call,
    /// comparison and logical nodes never fold.
    pub fn try_fold(&self, expr: &Expr) -> Option<i32> {
        match expr {
            Expr::Number(value) => Some(*value),
            Expr::Identifier(name) => self.values.get(name).copied(),
            Expr::Binary { op, left, right } if op.is_arithmetic() => {
                let left = self.try_fold(left)?;
                let right = self.try_fold(right)?;
                fold_arithmetic(*op, left, right)
            }
            _ => None,
        }
    }

    /// Record that a variable currently holds a known constant
    pub fn define(&mut self, name: &str, value: i32) {
        trace!("const table: {} = {}", name, value);
        self.values.insert(name.to_string(), value);
    }

    /// Forget a variable after a non-constant assignment
    pub fn invalidate(&mut self, name: &str) {
        if self.values.remove(name).is_some() {
            trace!("const table: {} invalidated", name);
        }
    }

    /// Drop all entries; called when a new function begins
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Capture the table so a conditionally-executed branch can be
    /// lowered and the state rolled back at the join
    pub fn snapshot(&self) -> HashMap<String, i32> {
        self.values.clone()
    }

    /// Replace the table with a previously captured snapshot
    pub fn restore(&mut self, values: HashMap<String, i32>) {
        self.values = values;
    }
}
