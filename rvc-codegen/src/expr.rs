//! Expression lowering
//!
//! Every lowered expression leaves exactly one new value on top of the
//! operand stack. Binary operators consume the two slots their operands
//! pushed and write the result into the surviving one, so their net
//! stack effect is -1 and the whole-expression invariant of +1 holds at
//! any nesting depth.

use crate::asm::{AsmInst, Reg, WORD_SIZE};
use crate::consteval::fold_arithmetic;
use crate::generator::Generator;
use log::{trace, warn};
use rvc_ast::{BinaryOp, Expr, UnaryOp};

impl Generator {
    /// Push a register onto the operand stack
    pub(crate) fn push_reg(&mut self, reg: Reg) {
        self.emitter.emit(AsmInst::AddI(Reg::Sp, Reg::Sp, -WORD_SIZE));
        self.emitter.emit(AsmInst::Sw(reg, 0, Reg::Sp));
    }

    /// Pop the operand-stack top into a register
    pub(crate) fn pop_reg(&mut self, reg: Reg) {
        self.emitter.emit(AsmInst::Lw(reg, 0, Reg::Sp));
        self.emitter.emit(AsmInst::AddI(Reg::Sp, Reg::Sp, WORD_SIZE));
    }

    /// Load an immediate and push it
    fn push_immediate(&mut self, value: i32) {
        self.emitter.emit(AsmInst::Li(Reg::T0, value));
        self.push_reg(Reg::T0);
    }

    /// Lower an expression subtree; result lands on the stack top
    pub(crate) fn lower_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Number(value) => self.push_immediate(*value),

            Expr::Identifier(name) => {
                match self.frame.offset_of(name) {
                    Some(offset) => {
                        self.emitter.emit(AsmInst::Lw(Reg::T0, offset, Reg::Fp));
                    }
                    None => {
                        // Not a local: a process-wide location addressed
                        // by symbolic name. Existence was the semantic
                        // pass's problem.
                        self.emitter.emit(AsmInst::La(Reg::T0, name.clone()));
                        self.emitter.emit(AsmInst::Lw(Reg::T0, 0, Reg::T0));
                    }
                }
                self.push_reg(Reg::T0);
            }

            Expr::Unary { op, operand } => {
                self.lower_expr(operand);
                self.emitter.emit(AsmInst::Lw(Reg::T0, 0, Reg::Sp));
                match op {
                    UnaryOp::Plus => {}
                    UnaryOp::Minus => self.emitter.emit(AsmInst::Neg(Reg::T0, Reg::T0)),
                    UnaryOp::Not => self.emitter.emit(AsmInst::Seqz(Reg::T0, Reg::T0)),
                }
                self.emitter.emit(AsmInst::Sw(Reg::T0, 0, Reg::Sp));
            }

            Expr::Binary { op, left, right } => self.lower_binary(*op, left, right),

            Expr::Call {
                function,
                arguments,
            } => self.lower_call(function, arguments),
        }
    }

    /// The optimization-bearing path: full fold, then algebraic
    /// simplification, then plain two-operand lowering.
    fn lower_binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr) {
        if self.options.optimize {
            // Full fold. Comparison and logical operators are never
            // folded; division/modulo by a constant zero abandons the
            // fold and falls back to runtime lowering.
            if op.is_arithmetic() {
                if let (Some(l), Some(r)) =
                    (self.consts.try_fold(left), self.consts.try_fold(right))
                {
                    if let Some(value) = fold_arithmetic(op, l, r) {
                        trace!("folded {} {} {} -> {}", l, op, r, value);
                        self.push_immediate(value);
                        return;
                    }
                }
            }

            // Right-constant algebraic identities. x * 0 discards the
            // left subtree entirely; the source language has no
            // side-effecting expressions, so nothing is lost.
            if let Some(r) = self.consts.try_fold(right) {
                match (op, r) {
                    (BinaryOp::Add, 0) | (BinaryOp::Mul, 1) => {
                        trace!("simplified x {} {} -> x", op, r);
                        self.lower_expr(left);
                        return;
                    }
                    (BinaryOp::Mul, 0) => {
                        trace!("simplified x * 0 -> 0");
                        self.push_immediate(0);
                        return;
                    }
                    _ => {}
                }
            }
        }

        // Unoptimized lowering: left below right on the stack, right
        // popped into t1, left loaded into t0, result reuses the left
        // operand's slot.
        self.lower_expr(left);
        self.lower_expr(right);
        self.pop_reg(Reg::T1);
        self.emitter.emit(AsmInst::Lw(Reg::T0, 0, Reg::Sp));

        match op {
            BinaryOp::Add => self.emitter.emit(AsmInst::Add(Reg::T0, Reg::T0, Reg::T1)),
            BinaryOp::Sub => self.emitter.emit(AsmInst::Sub(Reg::T0, Reg::T0, Reg::T1)),
            BinaryOp::Mul => self.emitter.emit(AsmInst::Mul(Reg::T0, Reg::T0, Reg::T1)),
            BinaryOp::Div => self.emitter.emit(AsmInst::Div(Reg::T0, Reg::T0, Reg::T1)),
            BinaryOp::Mod => self.emitter.emit(AsmInst::Rem(Reg::T0, Reg::T0, Reg::T1)),

            BinaryOp::Less => self.emitter.emit(AsmInst::Slt(Reg::T0, Reg::T0, Reg::T1)),
            BinaryOp::LessEqual => {
                // !(right < left)
                self.emitter.emit(AsmInst::Slt(Reg::T2, Reg::T1, Reg::T0));
                self.emitter.emit(AsmInst::XorI(Reg::T0, Reg::T2, 1));
            }
            BinaryOp::Greater => self.emitter.emit(AsmInst::Slt(Reg::T0, Reg::T1, Reg::T0)),
            BinaryOp::GreaterEqual => {
                // !(left < right)
                self.emitter.emit(AsmInst::Slt(Reg::T2, Reg::T0, Reg::T1));
                self.emitter.emit(AsmInst::XorI(Reg::T0, Reg::T2, 1));
            }
            BinaryOp::Equal => {
                self.emitter.emit(AsmInst::Sub(Reg::T0, Reg::T0, Reg::T1));
                self.emitter.emit(AsmInst::Seqz(Reg::T0, Reg::T0));
            }
            BinaryOp::NotEqual => {
                self.emitter.emit(AsmInst::Sub(Reg::T0, Reg::T0, Reg::T1));
                self.emitter.emit(AsmInst::Snez(Reg::T0, Reg::T0));
            }

            BinaryOp::And => self.emitter.emit(AsmInst::And(Reg::T0, Reg::T0, Reg::T1)),
            BinaryOp::Or => self.emitter.emit(AsmInst::Or(Reg::T0, Reg::T0, Reg::T1)),
        }

        self.emitter.emit(AsmInst::Sw(Reg::T0, 0, Reg::Sp));
    }

    /// Lower a call: arguments pushed left to right, callee invoked by
    /// name, argument slots released, return value pushed from a0. Net
    /// stack growth is +1 regardless of argument count.
    fn lower_call(&mut self, function: &str, arguments: &[Expr]) {
        for arg in arguments {
            self.lower_expr(arg);
        }

        if let Some(info) = self.functions.get(function) {
            if info.param_count != arguments.len() {
                warn!(
                    "call to '{}' passes {} arguments, signature has {}",
                    function,
                    arguments.len(),
                    info.param_count
                );
            }
        }

        self.emitter.emit(AsmInst::Call(function.to_string()));
        if !arguments.is_empty() {
            self.emitter.emit(AsmInst::AddI(
                Reg::Sp,
                Reg::Sp,
                WORD_SIZE * arguments.len() as i32,
            ));
        }
        self.push_reg(Reg::A0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitter::Emitter;
    use crate::generator::CodegenOptions;
    use pretty_assertions::assert_eq;

    fn lowered(expr: &Expr, optimize: bool) -> Vec<AsmInst> {
        let mut generator = Generator::new(CodegenOptions { optimize });
        generator.lower_expr(expr);
        generator.emitter.take()
    }

    fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    fn ident(name: &str) -> Expr {
        Expr::Identifier(name.to_string())
    }

    /// Net stack movement of an instruction sequence, in words
    fn net_stack_effect(insts: &[AsmInst]) -> i32 {
        insts
            .iter()
            .map(|inst| match inst {
                AsmInst::AddI(Reg::Sp, Reg::Sp, delta) => -(*delta) / WORD_SIZE,
                _ => 0,
            })
            .sum()
    }

    #[test]
    fn test_number_pushes_one_slot() {
        let insts = lowered(&Expr::Number(7), false);
        assert_eq!(
            insts,
            vec![
                AsmInst::Li(Reg::T0, 7),
                AsmInst::AddI(Reg::Sp, Reg::Sp, -4),
                AsmInst::Sw(Reg::T0, 0, Reg::Sp),
            ]
        );
    }

    #[test]
    fn test_unknown_identifier_is_global_load() {
        let insts = lowered(&ident("counter"), false);
        assert_eq!(insts[0], AsmInst::La(Reg::T0, "counter".to_string()));
        assert_eq!(insts[1], AsmInst::Lw(Reg::T0, 0, Reg::T0));
        assert_eq!(net_stack_effect(&insts), 1);
    }

    #[test]
    fn test_full_fold_emits_single_immediate() {
        // 2 + 3 * 4 with optimization: one li, no mul/add
        let expr = binary(
            BinaryOp::Add,
            Expr::Number(2),
            binary(BinaryOp::Mul, Expr::Number(3), Expr::Number(4)),
        );
        let insts = lowered(&expr, true);
        assert_eq!(
            insts,
            vec![
                AsmInst::Li(Reg::T0, 14),
                AsmInst::AddI(Reg::Sp, Reg::Sp, -4),
                AsmInst::Sw(Reg::T0, 0, Reg::Sp),
            ]
        );
    }

    #[test]
    fn test_fold_disabled_emits_runtime_ops() {
        let expr = binary(BinaryOp::Add, Expr::Number(2), Expr::Number(3));
        let insts = lowered(&expr, false);
        assert!(insts.contains(&AsmInst::Add(Reg::T0, Reg::T0, Reg::T1)));
        assert_eq!(net_stack_effect(&insts), 1);
    }

    #[test]
    fn test_division_by_constant_zero_falls_back_to_runtime() {
        let expr = binary(BinaryOp::Div, Expr::Number(10), Expr::Number(0));
        let insts = lowered(&expr, true);
        assert!(insts.contains(&AsmInst::Div(Reg::T0, Reg::T0, Reg::T1)));
        assert_eq!(net_stack_effect(&insts), 1);
    }

    #[test]
    fn test_add_zero_lowers_left_exactly_once() {
        let expr = binary(BinaryOp::Add, ident("x"), Expr::Number(0));
        let insts = lowered(&expr, true);
        // Just the load of x and one push; no add anywhere
        let loads = insts
            .iter()
            .filter(|i| matches!(i, AsmInst::La(_, name) if name == "x"))
            .count();
        assert_eq!(loads, 1);
        assert!(!insts.iter().any(|i| matches!(i, AsmInst::Add(..))));
        assert_eq!(net_stack_effect(&insts), 1);
    }

    #[test]
    fn test_mul_one_lowers_left_only() {
        let expr = binary(BinaryOp::Mul, ident("x"), Expr::Number(1));
        let insts = lowered(&expr, true);
        assert!(!insts.iter().any(|i| matches!(i, AsmInst::Mul(..))));
        assert!(insts.iter().any(|i| matches!(i, AsmInst::La(_, name) if name == "x")));
    }

    #[test]
    fn test_mul_zero_skips_left_subtree() {
        let expr = binary(BinaryOp::Mul, ident("x"), Expr::Number(0));
        let insts = lowered(&expr, true);
        assert_eq!(insts[0], AsmInst::Li(Reg::T0, 0));
        assert!(!insts.iter().any(|i| matches!(i, AsmInst::La(..) | AsmInst::Mul(..))));
        assert_eq!(net_stack_effect(&insts), 1);
    }

    #[test]
    fn test_no_left_constant_simplification() {
        // 0 + x must not be simplified; only right-constant identities apply
        let expr = binary(BinaryOp::Add, Expr::Number(0), ident("x"));
        let insts = lowered(&expr, true);
        assert!(insts.contains(&AsmInst::Add(Reg::T0, Reg::T0, Reg::T1)));
    }

    #[test]
    fn test_comparisons_are_never_folded() {
        let expr = binary(BinaryOp::Less, Expr::Number(1), Expr::Number(2));
        let insts = lowered(&expr, true);
        assert!(insts.contains(&AsmInst::Slt(Reg::T0, Reg::T0, Reg::T1)));
    }

    #[test]
    fn test_less_equal_sequence() {
        let expr = binary(BinaryOp::LessEqual, ident("a"), ident("b"));
        let insts = lowered(&expr, false);
        assert!(insts.contains(&AsmInst::Slt(Reg::T2, Reg::T1, Reg::T0)));
        assert!(insts.contains(&AsmInst::XorI(Reg::T0, Reg::T2, 1)));
    }

    #[test]
    fn test_equality_uses_sub_seqz() {
        let expr = binary(BinaryOp::Equal, ident("a"), ident("b"));
        let insts = lowered(&expr, false);
        assert!(insts.contains(&AsmInst::Sub(Reg::T0, Reg::T0, Reg::T1)));
        assert!(insts.contains(&AsmInst::Seqz(Reg::T0, Reg::T0)));
    }

    #[test]
    fn test_unary_operates_in_place() {
        let expr = Expr::Unary {
            op: UnaryOp::Minus,
            operand: Box::new(Expr::Number(5)),
        };
        let insts = lowered(&expr, false);
        assert!(insts.contains(&AsmInst::Neg(Reg::T0, Reg::T0)));
        assert_eq!(net_stack_effect(&insts), 1);
    }

    #[test]
    fn test_call_nets_one_slot() {
        let expr = Expr::Call {
            function: "helper".to_string(),
            arguments: vec![Expr::Number(1), Expr::Number(2), Expr::Number(3)],
        };
        let insts = lowered(&expr, false);
        assert!(insts.contains(&AsmInst::Call("helper".to_string())));
        // Argument slots released in one adjustment
        assert!(insts.contains(&AsmInst::AddI(Reg::Sp, Reg::Sp, 12)));
        assert!(insts.contains(&AsmInst::Sw(Reg::A0, 0, Reg::Sp)));
        assert_eq!(net_stack_effect(&insts), 1);
    }

    #[test]
    fn test_zero_argument_call_has_no_cleanup() {
        let expr = Expr::Call {
            function: "poll".to_string(),
            arguments: vec![],
        };
        let insts = lowered(&expr, false);
        assert!(!insts.iter().any(|i| matches!(i, AsmInst::AddI(Reg::Sp, Reg::Sp, d) if *d > 0)));
        assert_eq!(net_stack_effect(&insts), 1);
    }

    #[test]
    fn test_deep_nesting_keeps_stack_invariant() {
        // ((1 + a) * (b - 2)) / (c % 3), optimization off
        let expr = binary(
            BinaryOp::Div,
            binary(
                BinaryOp::Mul,
                binary(BinaryOp::Add, Expr::Number(1), ident("a")),
                binary(BinaryOp::Sub, ident("b"), Expr::Number(2)),
            ),
            binary(BinaryOp::Mod, ident("c"), Expr::Number(3)),
        );
        let insts = lowered(&expr, false);
        assert_eq!(net_stack_effect(&insts), 1);
    }

    #[test]
    fn test_rendered_text_matches_convention() {
        let expr = binary(BinaryOp::Add, Expr::Number(2), Expr::Number(3));
        let text = Emitter::render(&lowered(&expr, false));
        assert!(text.contains("lw t1, 0(sp)\naddi sp, sp, 4\nlw t0, 0(sp)\nadd t0, t0, t1\nsw t0, 0(sp)\n"));
    }
}
