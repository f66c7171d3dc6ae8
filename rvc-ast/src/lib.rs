//! Rvc Compiler - AST definitions
//!
//! This crate defines the AST nodes for the small imperative source
//! language. The AST is built by an external parser/resolver; the code
//! generation backend only borrows it for read access during a run.

pub mod ast;

pub use ast::{
    BinaryOp, Expr, Function, FunctionInfo, FunctionTable, Program, Stmt, UnaryOp,
    collect_function_info,
};
