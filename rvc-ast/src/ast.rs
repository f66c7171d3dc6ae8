//! Abstract Syntax Tree definitions for the rvc source language
//!
//! The language is a small imperative one: integer expressions,
//! assignments, declarations, blocks, if/while control flow, function
//! definitions. All node variants are closed enums so the backend gets
//! compile-time exhaustiveness when matching on them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    /// Unary plus (no-op on the value)
    Plus,
    /// Arithmetic negation
    Minus,
    /// Logical not: nonzero -> 0, zero -> 1
    Not,
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Comparison (results are 0/1 integers)
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Equal,
    NotEqual,

    // Logical
    And,
    Or,
}

impl BinaryOp {
    /// Arithmetic operators are the only ones the constant folder
    /// evaluates at compile time.
    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod
        )
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op_str = match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Less => "<",
            BinaryOp::LessEqual => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        };
        write!(f, "{}", op_str)
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op_str = match self {
            UnaryOp::Plus => "+",
            UnaryOp::Minus => "-",
            UnaryOp::Not => "!",
        };
        write!(f, "{}", op_str)
    }
}

/// Expressions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Integer literal
    Number(i32),

    /// Variable reference (local or global, resolved at lowering time)
    Identifier(String),

    /// Unary operation
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },

    /// Binary operation
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Function call by symbolic name
    Call {
        function: String,
        arguments: Vec<Expr>,
    },
}

/// Statements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    /// Assignment to a named variable
    Assign {
        target: String,
        value: Expr,
    },

    /// Variable declaration with optional initializer
    Declare {
        name: String,
        init: Option<Expr>,
    },

    /// Statement sequence; introduces no new naming scope
    Block(Vec<Stmt>),

    /// Conditional with optional else branch
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },

    /// While loop
    While {
        condition: Expr,
        body: Box<Stmt>,
    },

    /// Jump to the innermost enclosing loop's exit
    Break,

    /// Jump to the innermost enclosing loop's head
    Continue,

    /// Return with optional value (missing value returns 0)
    Return(Option<Expr>),

    /// Expression evaluated for effect; its result is discarded
    Expression(Expr),
}

/// A function definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    pub parameters: Vec<String>,
    pub body: Stmt,
}

/// A whole compilation unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub functions: Vec<Function>,
}

/// Signature metadata for a function, as produced by the semantic
/// analysis pass that runs before code generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionInfo {
    pub name: String,
    pub param_count: usize,
}

/// Function name -> signature metadata, consumed read-only by codegen
pub type FunctionTable = HashMap<String, FunctionInfo>;

/// Build a function table from a program's own definitions.
///
/// Stands in for the external semantic-analysis collaborator when the
/// driver compiles a self-contained program.
pub fn collect_function_info(program: &Program) -> FunctionTable {
    program
        .functions
        .iter()
        .map(|f| {
            (
                f.name.clone(),
                FunctionInfo {
                    name: f.name.clone(),
                    param_count: f.parameters.len(),
                },
            )
        })
        .collect()
}
