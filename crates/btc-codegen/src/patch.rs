//! Transient jump-patch lists
//!
//! An emitter records an instruction index here whenever it emits a jump
//! whose target isn't known yet; once the target address is known, every
//! recorded index is patched and the list is discarded. Per Design Notes
//! §9, this is backed by a small-vector to avoid heap allocation for the
//! common case of a composite with a handful of children.

use smallvec::SmallVec;

use btc_bytecode::InstructionStream;

/// Instruction indices awaiting a jump-target patch, inlined up to 8
/// entries (the common "few children" case) before spilling to the heap.
pub type PatchList = SmallVec<[usize; 8]>;

/// Patch every recorded instruction's `a1` field to `target`.
pub fn patch_all(instructions: &mut InstructionStream, patches: &PatchList, target: u32) {
    for &index in patches {
        instructions.set_a1(index, target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use btc_bytecode::{Opcode, UNINIT};

    #[test]
    fn patch_all_fills_in_every_recorded_jump() {
        let mut instructions = InstructionStream::new();
        let mut patches = PatchList::new();
        patches.push(instructions.push(Opcode::JabcConstant, UNINIT, 0, 0));
        patches.push(instructions.push(Opcode::JabcConstant, UNINIT, 0, 0));

        patch_all(&mut instructions, &patches, 42);

        for &index in &patches {
            assert_eq!(instructions.as_slice()[index].a1, 42);
        }
    }
}
