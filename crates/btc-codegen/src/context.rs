//! Shared state threaded through every node emitter

use btc_bytecode::{NodeStatus, Opcode, Phase, Program, UNINIT};
use btc_ir::NodeId;

use crate::error::CodegenResult;
use crate::scratch::ScratchTable;

/// Everything a node emitter needs: the program being built and the
/// scratch table allocated during setup. Threaded by `&mut` through every
/// `gen_construct`/`gen_execute`/`gen_destruct` call, the same way the
/// teacher's `FunctionContext` is threaded through `IrCodeGenerator`.
pub struct CodegenContext<'a> {
    program: &'a mut Program,
    scratch: &'a mut ScratchTable,
}

impl<'a> CodegenContext<'a> {
    /// Borrow the program and scratch table for one generation pass.
    pub fn new(program: &'a mut Program, scratch: &'a mut ScratchTable) -> Self {
        Self { program, scratch }
    }

    /// Read-only access to the scratch table (setup/teardown use this to
    /// mutate it directly; emitters only read from it).
    pub fn scratch(&self) -> &ScratchTable {
        self.scratch
    }

    /// Mutable access to the scratch table, for setup/teardown.
    pub fn scratch_mut(&mut self) -> &mut ScratchTable {
        self.scratch
    }

    /// Current instruction count — the address the next `push` will land at.
    pub fn here(&self) -> u32 {
        self.program.instructions_ref().count() as u32
    }

    /// Emit a raw instruction, returning its index.
    pub fn push(&mut self, opcode: Opcode, a1: u32, a2: u32, a3: u32) -> usize {
        self.program.instructions().push(opcode, a1, a2, a3)
    }

    /// `B[slot] = value`
    pub fn store_const_in_bss(&mut self, slot: u32, value: u32) -> usize {
        self.push(Opcode::StoreCInB, slot, value, 0)
    }

    /// `R = status`
    pub fn store_status_in_return(&mut self, status: NodeStatus) -> usize {
        self.push(Opcode::StoreCInR, status.as_u32(), 0, 0)
    }

    /// Reserve a jump whose target is unknown yet; returns the instruction
    /// index so the caller can record it in a [`crate::patch::PatchList`].
    pub fn reserve_jump(&mut self, opcode: Opcode, a2: u32, a3: u32) -> usize {
        self.push(opcode, UNINIT, a2, a3)
    }

    /// Set a previously emitted instruction's `a1` (jump target) field.
    pub fn patch_a1(&mut self, index: usize, target: u32) {
        self.program.instructions().set_a1(index, target);
    }

    /// Set a previously emitted instruction's `a2` field.
    pub fn patch_a2(&mut self, index: usize, value: u32) {
        self.program.instructions().set_a2(index, value);
    }

    /// Reserve a BSS slot during setup.
    pub fn alloc_bss(&mut self, size: u32, align: u32) -> CodegenResult<u32> {
        Ok(self.program.bss().push(size, align)?)
    }

    /// Open a debug scope at the current instruction address.
    pub fn push_debug_scope(&mut self, node_id: NodeId, phase: Phase) {
        let at = self.here();
        self.program.debug().push_debug_scope(node_id.0, phase, at);
    }

    /// Close the innermost debug scope at the current instruction address.
    pub fn pop_debug_scope(&mut self, node_id: NodeId, phase: Phase) -> CodegenResult<()> {
        let at = self.here();
        self.program.debug().pop_debug_scope(node_id.0, phase, at)?;
        Ok(())
    }

    /// Run `f` bracketed by a push/pop debug scope pair, popping even if `f`
    /// fails partway through. Without this, a descendant's error propagating
    /// through `f` via `?` would skip the matching pop and leave this node's
    /// scope open on the debug stream for every ancestor above it.
    pub fn with_debug_scope<T>(
        &mut self,
        node_id: NodeId,
        phase: Phase,
        f: impl FnOnce(&mut Self) -> CodegenResult<T>,
    ) -> CodegenResult<T> {
        self.push_debug_scope(node_id, phase);
        let result = f(self);
        let popped = self.pop_debug_scope(node_id, phase);
        match result {
            Ok(value) => popped.map(|()| value),
            Err(err) => Err(err),
        }
    }
}
