//! Rvc Compiler - Common Types and Utilities
//!
//! This crate contains shared types and error definitions used across
//! the components of the rvc compiler backend.

pub mod error;

pub use error::CodegenError;
