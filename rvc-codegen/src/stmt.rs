//! Statement lowering
//!
//! Statements are fully self-contained on the operand stack: whatever a
//! statement pushes it also releases, so the net stack effect of any
//! statement is zero. Control flow synthesizes unique labels through
//! the emitter; break and continue resolve their targets through the
//! loop-label stack maintained around each while body.

use crate::asm::{AsmInst, Reg, WORD_SIZE};
use crate::generator::{Generator, LoopLabels};
use log::debug;
use rvc_ast::Stmt;
use rvc_common::CodegenError;
use std::collections::HashSet;

/// Every name the subtree can write: assignment targets and declared
/// locals, through nested blocks, branches and loops.
fn mutated_names(stmt: &Stmt, out: &mut HashSet<String>) {
    match stmt {
        Stmt::Assign { target, .. } => {
            out.insert(target.clone());
        }
        Stmt::Declare { name, .. } => {
            out.insert(name.clone());
        }
        Stmt::Block(stmts) => {
            for stmt in stmts {
                mutated_names(stmt, out);
            }
        }
        Stmt::If {
            then_branch,
            else_branch,
            ..
        } => {
            mutated_names(then_branch, out);
            if let Some(else_branch) = else_branch {
                mutated_names(else_branch, out);
            }
        }
        Stmt::While { body, .. } => mutated_names(body, out),
        _ => {}
    }
}

impl Generator {
    /// Lower a statement subtree
    pub(crate) fn lower_stmt(&mut self, stmt: &Stmt) -> Result<(), CodegenError> {
        match stmt {
            Stmt::Assign { target, value } => {
                self.lower_expr(value);
                self.pop_reg(Reg::T0);
                match self.frame.offset_of(target) {
                    Some(offset) => {
                        self.emitter.emit(AsmInst::Sw(Reg::T0, offset, Reg::Fp));
                    }
                    None => {
                        self.emitter.emit(AsmInst::La(Reg::T1, target.clone()));
                        self.emitter.emit(AsmInst::Sw(Reg::T0, 0, Reg::T1));
                    }
                }
                // The variable stays "known constant" only if the new
                // value is itself a compile-time constant
                match self.consts.try_fold(value) {
                    Some(folded) => self.consts.define(target, folded),
                    None => self.consts.invalidate(target),
                }
                Ok(())
            }

            Stmt::Declare { name, init } => {
                match init {
                    Some(expr) => {
                        self.lower_expr(expr);
                        self.pop_reg(Reg::T0);
                    }
                    None => self.emitter.emit(AsmInst::Li(Reg::T0, 0)),
                }

                if self.frame.offset_of(name).is_some() {
                    debug!("redeclaration of '{}' shadows the earlier slot", name);
                }
                let offset = self.frame.allocate(name);
                self.emitter.emit(AsmInst::Sw(Reg::T0, offset, Reg::Fp));

                match init.as_ref().and_then(|e| self.consts.try_fold(e)) {
                    Some(folded) => self.consts.define(name, folded),
                    None => self.consts.invalidate(name),
                }
                Ok(())
            }

            Stmt::Block(stmts) => {
                for stmt in stmts {
                    self.lower_stmt(stmt)?;
                }
                Ok(())
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let else_label = self.emitter.new_label("else");
                let end_label = self.emitter.new_label("endif");

                self.lower_expr(condition);
                self.pop_reg(Reg::T0);
                self.emitter.emit(AsmInst::Beqz(Reg::T0, else_label.clone()));

                // Each branch folds against the table as it stood at
                // the condition; only facts that hold on both paths
                // may survive past the join.
                let entry_consts = self.consts.snapshot();
                self.lower_stmt(then_branch)?;
                self.emitter.emit(AsmInst::J(end_label.clone()));

                self.emitter.emit_label(else_label);
                self.consts.restore(entry_consts.clone());
                if let Some(else_branch) = else_branch {
                    self.lower_stmt(else_branch)?;
                }
                self.emitter.emit_label(end_label);

                self.consts.restore(entry_consts);
                let mut written = HashSet::new();
                mutated_names(then_branch, &mut written);
                if let Some(else_branch) = else_branch {
                    mutated_names(else_branch, &mut written);
                }
                for name in &written {
                    self.consts.invalidate(name);
                }
                Ok(())
            }

            Stmt::While { condition, body } => {
                let head_label = self.emitter.new_label("loop");
                let end_label = self.emitter.new_label("endloop");

                // A binding the body rewrites holds its pre-loop value
                // only on the first iteration, and the body's value
                // only when the loop ran at all; forget such names
                // before the condition and again after the body.
                let mut written = HashSet::new();
                mutated_names(body, &mut written);
                for name in &written {
                    self.consts.invalidate(name);
                }

                self.emitter.emit_label(head_label.clone());
                self.lower_expr(condition);
                self.pop_reg(Reg::T0);
                self.emitter.emit(AsmInst::Beqz(Reg::T0, end_label.clone()));

                self.loop_stack.push(LoopLabels {
                    head: head_label.clone(),
                    end: end_label.clone(),
                });
                let body_result = self.lower_stmt(body);
                self.loop_stack.pop();
                body_result?;

                self.emitter.emit(AsmInst::J(head_label));
                self.emitter.emit_label(end_label);

                for name in &written {
                    self.consts.invalidate(name);
                }
                Ok(())
            }

            Stmt::Break => match self.loop_stack.last() {
                Some(labels) => {
                    let target = labels.end.clone();
                    self.emitter.emit(AsmInst::J(target));
                    Ok(())
                }
                None => Err(CodegenError::BreakOutsideLoop),
            },

            Stmt::Continue => match self.loop_stack.last() {
                Some(labels) => {
                    let target = labels.head.clone();
                    self.emitter.emit(AsmInst::J(target));
                    Ok(())
                }
                None => Err(CodegenError::ContinueOutsideLoop),
            },

            Stmt::Return(value) => {
                match value {
                    Some(expr) => {
                        self.lower_expr(expr);
                        self.pop_reg(Reg::A0);
                    }
                    None => self.emitter.emit(AsmInst::Li(Reg::A0, 0)),
                }
                // Each return site tears the frame down itself
                self.emit_epilogue();
                Ok(())
            }

            Stmt::Expression(expr) => {
                self.lower_expr(expr);
                // Discard the one slot the expression produced
                self.emitter.emit(AsmInst::AddI(Reg::Sp, Reg::Sp, WORD_SIZE));
                Ok(())
            }
        }
    }
}
