//! Generator driver
//!
//! Top-level entry point for one code-generation run. All mutable state
//! (output buffer, label counter, frame layout, constant table, loop
//! stack) hangs off a [`Generator`] value, so independent runs are
//! isolated by construction; nothing is shared or global.

use crate::asm::AsmInst;
use crate::consteval::ConstEval;
use crate::emitter::Emitter;
use crate::frame::FrameLayout;
use crate::opt;
use log::info;
use rvc_ast::{Function, FunctionTable, Program, Stmt};
use rvc_common::CodegenError;

/// Configuration for a generation run
#[derive(Debug, Clone, Copy)]
pub struct CodegenOptions {
    /// Apply constant folding and algebraic simplification during
    /// binary expression lowering. Disabling it produces straight
    /// operand-stack code for every expression.
    pub optimize: bool,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self { optimize: true }
    }
}

/// Labels of the innermost enclosing loop, for break/continue targets
#[derive(Debug, Clone)]
pub(crate) struct LoopLabels {
    pub(crate) head: String,
    pub(crate) end: String,
}

/// Holds all per-run state and drives the tree walk
#[derive(Debug)]
pub struct Generator {
    pub(crate) options: CodegenOptions,
    pub(crate) emitter: Emitter,
    pub(crate) consts: ConstEval,
    pub(crate) frame: FrameLayout,
    pub(crate) loop_stack: Vec<LoopLabels>,
    pub(crate) functions: FunctionTable,
}

impl Generator {
    pub fn new(options: CodegenOptions) -> Self {
        Self {
            options,
            emitter: Emitter::new(),
            consts: ConstEval::new(),
            frame: FrameLayout::for_body(&Stmt::Block(Vec::new())),
            loop_stack: Vec::new(),
            functions: FunctionTable::new(),
        }
    }

    /// Generate the full assembly text for a compilation unit.
    ///
    /// Clears all run state first, so the same `Generator` can be
    /// reused for independent inputs without residue.
    pub fn generate(
        &mut self,
        program: &Program,
        functions: &FunctionTable,
    ) -> Result<String, CodegenError> {
        self.emitter.clear();
        self.consts.clear();
        self.loop_stack.clear();
        self.functions = functions.clone();

        // Module preamble: data segment, code segment, entry point
        self.emitter.emit(AsmInst::Directive(".data".to_string()));
        self.emitter.emit(AsmInst::Directive(".text".to_string()));
        self.emitter.emit(AsmInst::Directive(".global main".to_string()));

        for function in &program.functions {
            self.lower_function(function)?;
        }

        let instructions = opt::eliminate_dead_code(self.emitter.take());
        Ok(Emitter::render(&instructions))
    }

    /// Lower one function: fresh frame and constant table, prologue,
    /// body, trailing epilogue.
    fn lower_function(&mut self, function: &Function) -> Result<(), CodegenError> {
        info!("Lowering function '{}'", function.name);

        self.consts.clear();
        self.loop_stack.clear();
        self.frame = FrameLayout::for_body(&function.body);

        for inst in self.frame.gen_prologue(&function.name) {
            self.emitter.emit(inst);
        }

        self.lower_stmt(&function.body)?;

        // Fall-off-the-end return path; redundant when every path
        // already returned, which the dead-code pass may clean up later
        self.emit_epilogue();
        Ok(())
    }

    /// Emit the self-contained frame teardown at the current point
    pub(crate) fn emit_epilogue(&mut self) {
        for inst in self.frame.gen_epilogue() {
            self.emitter.emit(inst);
        }
    }
}

/// Generate assembly for a program with a fresh per-run generator
pub fn generate_program(
    program: &Program,
    functions: &FunctionTable,
    options: CodegenOptions,
) -> Result<String, CodegenError> {
    Generator::new(options).generate(program, functions)
}
