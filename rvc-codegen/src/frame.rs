//! Stack frame layout and prologue/epilogue generation
//!
//! Each function gets a frame sized for its saved registers plus every
//! declaration in its body. The frame pointer is set to the caller's
//! stack pointer, so `ra` and the caller's `fp` live at fixed negative
//! offsets and locals grow downward from there:
//!
//! ```text
//!   fp - 0   <- entry sp (caller's operand stack top)
//!   fp - 4      saved ra
//!   fp - 8      saved caller fp
//!   fp - 12     first local
//!   ...
//!   fp - size   last local, == sp at statement boundaries
//! ```

use crate::asm::{AsmInst, Reg, WORD_SIZE};
use rvc_ast::Stmt;
use std::collections::HashMap;

/// Words reserved at the top of every frame for `ra` and the caller `fp`
const SAVED_SLOTS: i32 = 2;

/// Per-function frame layout: local-variable offsets and frame size
#[derive(Debug)]
pub struct FrameLayout {
    locals: HashMap<String, i32>,
    cursor: i32,
    frame_size: i32,
}

/// Count declarations anywhere in a statement tree.
///
/// Redeclarations count again on purpose: each one is handed a fresh
/// slot, so the frame must cover all of them.
fn count_declarations(stmt: &Stmt) -> i32 {
    match stmt {
        Stmt::Declare { .. } => 1,
        Stmt::Block(stmts) => stmts.iter().map(count_declarations).sum(),
        Stmt::If {
            then_branch,
            else_branch,
            ..
        } => {
            count_declarations(then_branch)
                + else_branch.as_deref().map(count_declarations).unwrap_or(0)
        }
        Stmt::While { body, .. } => count_declarations(body),
        _ => 0,
    }
}

impl FrameLayout {
    /// Build the layout for a function body, sizing the frame to cover
    /// every declaration plus the saved-register slots.
    pub fn for_body(body: &Stmt) -> Self {
        let local_count = count_declarations(body);
        Self {
            locals: HashMap::new(),
            cursor: -SAVED_SLOTS * WORD_SIZE,
            frame_size: (SAVED_SLOTS + local_count) * WORD_SIZE,
        }
    }

    /// Total bytes the prologue allocates (and the epilogue releases)
    pub fn frame_size(&self) -> i32 {
        self.frame_size
    }

    /// Claim the next slot for a declared variable and record its
    /// fp-relative offset. A redeclared name overwrites the previous
    /// mapping but still consumes a fresh slot.
    pub fn allocate(&mut self, name: &str) -> i32 {
        self.cursor -= WORD_SIZE;
        let offset = self.cursor;
        self.locals.insert(name.to_string(), offset);
        offset
    }

    /// Frame offset of a local, if the name was declared
    pub fn offset_of(&self, name: &str) -> Option<i32> {
        self.locals.get(name).copied()
    }

    /// Function prologue: label, frame allocation, callee saves, new fp
    pub fn gen_prologue(&self, name: &str) -> Vec<AsmInst> {
        let size = self.frame_size;
        vec![
            AsmInst::Label(name.to_string()),
            AsmInst::AddI(Reg::Sp, Reg::Sp, -size),
            AsmInst::Sw(Reg::Ra, size - WORD_SIZE, Reg::Sp),
            AsmInst::Sw(Reg::Fp, size - 2 * WORD_SIZE, Reg::Sp),
            AsmInst::AddI(Reg::Fp, Reg::Sp, size),
        ]
    }

    /// Function epilogue, valid at any return site: restores `ra`,
    /// resets `sp` from `fp` (releasing exactly the prologue's
    /// allocation plus any transient operand-stack slots), restores the
    /// caller's `fp`, returns.
    pub fn gen_epilogue(&self) -> Vec<AsmInst> {
        vec![
            AsmInst::Lw(Reg::Ra, -WORD_SIZE, Reg::Fp),
            AsmInst::Lw(Reg::T0, -2 * WORD_SIZE, Reg::Fp),
            AsmInst::Mv(Reg::Sp, Reg::Fp),
            AsmInst::Mv(Reg::Fp, Reg::T0),
            AsmInst::Ret,
        ]
    }
}
