//! Instruction emitter
//!
//! Owns the append-only output buffer and the label counter. Every
//! synthesized label gets a unique numeric suffix within one generation
//! run, so `else3`/`endif3` style targets never collide.

use crate::asm::AsmInst;

/// Accumulates the generated instruction sequence for one run
#[derive(Debug, Default)]
pub struct Emitter {
    instructions: Vec<AsmInst>,
    label_counter: u32,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one instruction to the output buffer
    pub fn emit(&mut self, inst: AsmInst) {
        self.instructions.push(inst);
    }

    /// Append a label definition line
    pub fn emit_label(&mut self, label: String) {
        self.instructions.push(AsmInst::Label(label));
    }

    /// Synthesize a fresh label from a prefix, e.g. "else" -> "else3".
    ///
    /// The counter is shared across all prefixes; paired labels from
    /// one construct carry the same number ("else3"/"endif3" is not
    /// guaranteed, only uniqueness is).
    pub fn new_label(&mut self, prefix: &str) -> String {
        let label = format!("{}{}", prefix, self.label_counter);
        self.label_counter += 1;
        label
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Reset all emitter state for a fresh run
    pub fn clear(&mut self) {
        self.instructions.clear();
        self.label_counter = 0;
    }

    /// Take the finished instruction sequence out of the emitter
    pub fn take(&mut self) -> Vec<AsmInst> {
        std::mem::take(&mut self.instructions)
    }

    /// Render an instruction sequence to the final line-terminated text
    pub fn render(instructions: &[AsmInst]) -> String {
        let mut out = String::new();
        for inst in instructions {
            out.push_str(&inst.to_string());
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asm::Reg;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_labels_are_unique() {
        let mut emitter = Emitter::new();
        let a = emitter.new_label("else");
        let b = emitter.new_label("endif");
        let c = emitter.new_label("else");

        assert_eq!(a, "else0");
        assert_eq!(b, "endif1");
        assert_eq!(c, "else2");
    }

    #[test]
    fn test_emit_preserves_order() {
        let mut emitter = Emitter::new();
        emitter.emit(AsmInst::Li(Reg::T0, 7));
        emitter.emit_label("main".to_string());
        emitter.emit(AsmInst::Ret);

        let text = Emitter::render(&emitter.take());
        assert_eq!(text, "li t0, 7\nmain:\nret\n");
    }

    #[test]
    fn test_clear_resets_counter() {
        let mut emitter = Emitter::new();
        emitter.emit(AsmInst::Ret);
        let _ = emitter.new_label("loop");
        emitter.clear();

        assert!(emitter.is_empty());
        assert_eq!(emitter.new_label("loop"), "loop0");
    }
}
