//! Instruction words and the append-only instruction stream (C1)

use crate::opcode::Opcode;

/// Sentinel for "this address field is not yet known" — either awaiting a
/// later patch, or (for BSS-held re-entry/jump-back slots) filled in at
/// runtime by the VM rather than at compile time.
pub const UNINIT: u32 = 0xFFFF_FFFF;

/// A single fixed-width instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction {
    /// The operation this word performs.
    pub opcode: Opcode,
    /// First address/immediate field.
    pub a1: u32,
    /// Second address/immediate field.
    pub a2: u32,
    /// Third address/immediate field.
    pub a3: u32,
}

/// Stable index of an instruction within a [`InstructionStream`].
pub type InstructionIndex = usize;

/// Append-only log of emitted instructions with random-write access to the
/// three address fields, used for patching forward jumps once their target
/// is known.
///
/// The stream never inspects instructions semantically — it has no notion of
/// "this is a jump" or "this opcode needs patching". That's the node code
/// generators' job; the stream just remembers what was pushed and lets
/// callers overwrite a field by index.
#[derive(Debug, Clone, Default)]
pub struct InstructionStream {
    instructions: Vec<Instruction>,
    generate_debug: bool,
}

impl InstructionStream {
    /// Create an empty stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an instruction, returning its stable index.
    pub fn push(&mut self, opcode: Opcode, a1: u32, a2: u32, a3: u32) -> InstructionIndex {
        let index = self.instructions.len();
        self.instructions.push(Instruction { opcode, a1, a2, a3 });
        index
    }

    /// Number of instructions emitted so far.
    pub fn count(&self) -> InstructionIndex {
        self.instructions.len()
    }

    /// Overwrite the `a1` field of a previously emitted instruction.
    pub fn set_a1(&mut self, index: InstructionIndex, value: u32) {
        self.instructions[index].a1 = value;
    }

    /// Overwrite the `a2` field of a previously emitted instruction.
    pub fn set_a2(&mut self, index: InstructionIndex, value: u32) {
        self.instructions[index].a2 = value;
    }

    /// Overwrite the `a3` field of a previously emitted instruction.
    pub fn set_a3(&mut self, index: InstructionIndex, value: u32) {
        self.instructions[index].a3 = value;
    }

    /// Enable or disable debug scope emission for subsequent generation.
    pub fn set_generate_debug(&mut self, enabled: bool) {
        self.generate_debug = enabled;
    }

    /// Whether debug scope emission is currently enabled.
    pub fn generate_debug(&self) -> bool {
        self.generate_debug
    }

    /// Borrow the underlying instructions in emission order.
    pub fn as_slice(&self) -> &[Instruction] {
        &self.instructions
    }

    /// True if an absolute-jump instruction's `a1` (its instruction-index
    /// target) still holds [`UNINIT`] by the time generation finishes.
    ///
    /// Only `a1` on the absolute-jump opcodes is ever a forward patch
    /// awaiting its target address; every other field that can hold
    /// `UNINIT` does so on purpose: `StoreCInB`/`StoreCInR`'s immediates use
    /// it as the "this scratch slot has no current value" sentinel, and
    /// `JabbCDiffB`/`JabbSCInB`'s `a1` is a compile-time-constant BSS slot
    /// number, never a patch target.
    ///
    /// Returns the index of the first offending instruction, if any.
    pub fn find_dangling_patch(&self) -> Option<InstructionIndex> {
        for (index, instr) in self.instructions.iter().enumerate() {
            let has_patchable_a1 = matches!(
                instr.opcode,
                Opcode::JabcConstant
                    | Opcode::JabcREquaC
                    | Opcode::JabcRDiffC
                    | Opcode::JabcCEquaB
                    | Opcode::JabcCDiffB
                    | Opcode::JabcSCInB
            );
            if has_patchable_a1 && instr.a1 == UNINIT {
                return Some(index);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_returns_stable_indices() {
        let mut s = InstructionStream::new();
        let i0 = s.push(Opcode::StoreCInR, 0, 0, 0);
        let i1 = s.push(Opcode::Halt, 0, 0, 0);
        assert_eq!(i0, 0);
        assert_eq!(i1, 1);
        assert_eq!(s.count(), 2);
    }

    #[test]
    fn patch_overwrites_only_targeted_field() {
        let mut s = InstructionStream::new();
        let idx = s.push(Opcode::JabcConstant, UNINIT, 1, 2);
        s.set_a1(idx, 7);
        let instr = s.as_slice()[idx];
        assert_eq!(instr.a1, 7);
        assert_eq!(instr.a2, 1);
        assert_eq!(instr.a3, 2);
    }

    #[test]
    fn dangling_patch_ignores_runtime_filled_fields() {
        let mut s = InstructionStream::new();
        s.push(Opcode::JabbCDiffB, 0, UNINIT, 0);
        assert_eq!(s.find_dangling_patch(), None);

        s.push(Opcode::JabcConstant, UNINIT, 0, 0);
        assert_eq!(s.find_dangling_patch(), Some(1));
    }

    #[test]
    fn dangling_patch_ignores_deliberate_uninit_sentinel_immediates() {
        let mut s = InstructionStream::new();
        // B[slot] = UNINIT is a legitimate "no value yet" sentinel write,
        // not a forward jump awaiting a target.
        s.push(Opcode::StoreCInB, 4, UNINIT, 0);
        s.push(Opcode::JabcREquaC, 0, UNINIT, 0);
        assert_eq!(s.find_dangling_patch(), None);
    }
}
