//! RISC-V Assembly Instruction Definitions
//!
//! This module defines the subset of RV32 instructions, pseudo-
//! instructions and assembler directives the backend emits. The
//! generated program uses an explicit operand stack: expression results
//! live in stack slots and are staged through the scratch registers.

use std::fmt;

/// Registers used by the generated code
///
/// - T0, T1, T2: scratch registers for staging operand-stack values
///   (T0 is scratch A, T1 scratch B, T2 a third temp for the
///   complemented comparison sequences)
/// - A0: return-value register
/// - SP, FP, RA: stack pointer, frame pointer, return address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reg {
    T0,
    T1,
    T2,
    A0,
    Sp,
    Fp,
    Ra,
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reg::T0 => write!(f, "t0"),
            Reg::T1 => write!(f, "t1"),
            Reg::T2 => write!(f, "t2"),
            Reg::A0 => write!(f, "a0"),
            Reg::Sp => write!(f, "sp"),
            Reg::Fp => write!(f, "fp"),
            Reg::Ra => write!(f, "ra"),
        }
    }
}

/// Assembly output lines
///
/// Each value renders to exactly one line of textual assembly. Labels
/// and directives are modeled alongside real instructions so the whole
/// output buffer is a single ordered sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum AsmInst {
    // Immediate / address loads
    Li(Reg, i32),         // rd = immediate
    La(Reg, String),      // rd = address of symbol

    // Memory
    Lw(Reg, i32, Reg),    // rd = memory[base + offset]
    Sw(Reg, i32, Reg),    // memory[base + offset] = rs

    // Arithmetic
    Add(Reg, Reg, Reg),   // rd = rs + rt
    Sub(Reg, Reg, Reg),   // rd = rs - rt
    Mul(Reg, Reg, Reg),   // rd = rs * rt
    Div(Reg, Reg, Reg),   // rd = rs / rt
    Rem(Reg, Reg, Reg),   // rd = rs % rt
    AddI(Reg, Reg, i32),  // rd = rs + imm

    // Comparison / logical
    Slt(Reg, Reg, Reg),   // rd = (rs < rt) ? 1 : 0
    XorI(Reg, Reg, i32),  // rd = rs ^ imm
    Seqz(Reg, Reg),       // rd = (rs == 0) ? 1 : 0
    Snez(Reg, Reg),       // rd = (rs != 0) ? 1 : 0
    Neg(Reg, Reg),        // rd = -rs
    And(Reg, Reg, Reg),   // rd = rs & rt
    Or(Reg, Reg, Reg),    // rd = rs | rt

    // Register move (pseudo)
    Mv(Reg, Reg),         // rd = rs

    // Control flow
    Beqz(Reg, String),    // branch to label if rs == 0
    J(String),            // unconditional jump to label
    Call(String),         // call function by label
    Ret,                  // return to caller

    // Assembly pseudo-lines
    Label(String),        // label definition
    Directive(String),    // assembler directive (.data, .text, ...)
}

impl fmt::Display for AsmInst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AsmInst::Li(rd, imm) => write!(f, "li {}, {}", rd, imm),
            AsmInst::La(rd, sym) => write!(f, "la {}, {}", rd, sym),

            AsmInst::Lw(rd, off, base) => write!(f, "lw {}, {}({})", rd, off, base),
            AsmInst::Sw(rs, off, base) => write!(f, "sw {}, {}({})", rs, off, base),

            AsmInst::Add(rd, rs, rt) => write!(f, "add {}, {}, {}", rd, rs, rt),
            AsmInst::Sub(rd, rs, rt) => write!(f, "sub {}, {}, {}", rd, rs, rt),
            AsmInst::Mul(rd, rs, rt) => write!(f, "mul {}, {}, {}", rd, rs, rt),
            AsmInst::Div(rd, rs, rt) => write!(f, "div {}, {}, {}", rd, rs, rt),
            AsmInst::Rem(rd, rs, rt) => write!(f, "rem {}, {}, {}", rd, rs, rt),
            AsmInst::AddI(rd, rs, imm) => write!(f, "addi {}, {}, {}", rd, rs, imm),

            AsmInst::Slt(rd, rs, rt) => write!(f, "slt {}, {}, {}", rd, rs, rt),
            AsmInst::XorI(rd, rs, imm) => write!(f, "xori {}, {}, {}", rd, rs, imm),
            AsmInst::Seqz(rd, rs) => write!(f, "seqz {}, {}", rd, rs),
            AsmInst::Snez(rd, rs) => write!(f, "snez {}, {}", rd, rs),
            AsmInst::Neg(rd, rs) => write!(f, "neg {}, {}", rd, rs),
            AsmInst::And(rd, rs, rt) => write!(f, "and {}, {}, {}", rd, rs, rt),
            AsmInst::Or(rd, rs, rt) => write!(f, "or {}, {}, {}", rd, rs, rt),

            AsmInst::Mv(rd, rs) => write!(f, "mv {}, {}", rd, rs),

            AsmInst::Beqz(rs, label) => write!(f, "beqz {}, {}", rs, label),
            AsmInst::J(label) => write!(f, "j {}", label),
            AsmInst::Call(label) => write!(f, "call {}", label),
            AsmInst::Ret => write!(f, "ret"),

            AsmInst::Label(label) => write!(f, "{}:", label),
            AsmInst::Directive(text) => write!(f, "{}", text),
        }
    }
}

/// Word size of the target machine in bytes
pub const WORD_SIZE: i32 = 4;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_display() {
        assert_eq!(format!("{}", Reg::T0), "t0");
        assert_eq!(format!("{}", Reg::A0), "a0");
        assert_eq!(format!("{}", Reg::Fp), "fp");
    }

    #[test]
    fn test_instruction_display() {
        assert_eq!(format!("{}", AsmInst::Li(Reg::T0, 42)), "li t0, 42");
        assert_eq!(format!("{}", AsmInst::Lw(Reg::T0, 0, Reg::Sp)), "lw t0, 0(sp)");
        assert_eq!(format!("{}", AsmInst::Sw(Reg::T0, -12, Reg::Fp)), "sw t0, -12(fp)");
        assert_eq!(format!("{}", AsmInst::AddI(Reg::Sp, Reg::Sp, -4)), "addi sp, sp, -4");
        assert_eq!(
            format!("{}", AsmInst::Slt(Reg::T0, Reg::T1, Reg::T0)),
            "slt t0, t1, t0"
        );
        assert_eq!(format!("{}", AsmInst::Beqz(Reg::T0, "else3".to_string())), "beqz t0, else3");
        assert_eq!(format!("{}", AsmInst::Label("main".to_string())), "main:");
        assert_eq!(format!("{}", AsmInst::Directive(".text".to_string())), ".text");
    }

    #[test]
    fn test_pseudo_instruction_display() {
        assert_eq!(format!("{}", AsmInst::Mv(Reg::Sp, Reg::Fp)), "mv sp, fp");
        assert_eq!(format!("{}", AsmInst::Seqz(Reg::T0, Reg::T0)), "seqz t0, t0");
        assert_eq!(format!("{}", AsmInst::Call("helper".to_string())), "call helper");
        assert_eq!(format!("{}", AsmInst::Ret), "ret");
    }
}
