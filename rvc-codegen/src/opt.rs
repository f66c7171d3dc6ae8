//! Post-generation optimization passes
//!
//! Currently only the dead-code-elimination extension point lives here.
//! The pass contract: it takes the finished instruction sequence and
//! returns an equal-or-shorter sequence with identical observable
//! behavior, so it can grow an implementation without touching the
//! emission logic.

use crate::asm::AsmInst;

/// Dead-code elimination hook. No-op for now.
///
/// Candidates for a future implementation include the trailing
/// epilogue of functions whose every path already returned, and code
/// between an unconditional jump and the next label.
pub fn eliminate_dead_code(instructions: Vec<AsmInst>) -> Vec<AsmInst> {
    instructions
}
