//! Rvc Compiler - Code Generation Backend
//!
//! This crate lowers a typed AST for a small imperative language into
//! RV32 textual assembly in a single pass, using an explicit operand
//! stack convention. It includes:
//!
//! - Assembly instruction model and text rendering
//! - Constant folding and algebraic simplification (inline, optional)
//! - Expression and statement lowering
//! - Stack frame layout with size-scaled prologue/epilogue
//! - A no-op dead-code-elimination extension point

pub mod asm;
pub mod consteval;
pub mod emitter;
pub mod frame;
pub mod generator;
pub mod opt;

mod expr;
mod stmt;


pub use asm::{AsmInst, Reg, WORD_SIZE};
pub use consteval::ConstEval;
pub use emitter::Emitter;
pub use frame::FrameLayout;
pub use generator::{generate_program, CodegenOptions, Generator};
pub use opt::eliminate_dead_code;
pub use rvc_common::CodegenError;
