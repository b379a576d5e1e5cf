//! Per-node generator scratch state
//!
//! Per the Design Notes in `spec.md` §9, the "opaque per-node scratchpad"
//! the original C++ hung off an untyped `UserData` pointer is, here, a
//! side table keyed by [`NodeId`] rather than a field on [`btc_ir::Node`] —
//! this keeps `btc-ir` free of any codegen-specific type. The table is
//! scoped strictly between `setup` and `teardown`: [`ScratchTable::take`]
//! removes an entry, and [`Driver::teardown`](crate::driver::Driver::teardown)
//! asserts the table is empty afterward.

use btc_ir::NodeId;
use rustc_hash::FxHashMap;

/// BSS slot offsets and counters a composite's emitters need between its
/// `setup` and `teardown` calls.
#[derive(Debug, Clone, Copy)]
pub enum GeneratorScratch {
    /// Sequence/Selector share the same scratch shape (REDESIGN FLAGS:
    /// one composite-with-policy emitter instead of duplicated code).
    SequenceLike {
        /// BSS slot holding the destruct-chain jump-back address.
        jump_back_target: u32,
        /// BSS slot holding the re-entry address for resuming a RUNNING tick.
        re_entry: u32,
    },
    /// Parallel's single counter of children that succeeded this tick.
    Parallel {
        /// BSS slot holding the success counter.
        success_counter: u32,
    },
}

/// The side table mapping nodes to their generator scratch, scoped to one
/// generation pass.
#[derive(Debug, Default)]
pub struct ScratchTable {
    entries: FxHashMap<NodeId, GeneratorScratch>,
}

impl ScratchTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record scratch for a node, allocated during its `setup` call.
    pub fn insert(&mut self, id: NodeId, scratch: GeneratorScratch) {
        self.entries.insert(id, scratch);
    }

    /// Look up a node's scratch. Panics if `setup` was never called for
    /// this node — that is a driver bug, not a recoverable condition, since
    /// the driver always runs `setup` before `generate`.
    pub fn get(&self, id: NodeId) -> GeneratorScratch {
        *self
            .entries
            .get(&id)
            .unwrap_or_else(|| panic!("no generator scratch for node {id}: setup was not run"))
    }

    /// Remove a node's scratch, called during its `teardown`.
    pub fn remove(&mut self, id: NodeId) -> Option<GeneratorScratch> {
        self.entries.remove(&id)
    }

    /// True once every `setup`-allocated entry has been torn down.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_get_remove_round_trips() {
        let mut table = ScratchTable::new();
        let id = NodeId::from_name("seq");
        table.insert(
            id,
            GeneratorScratch::SequenceLike {
                jump_back_target: 0,
                re_entry: 4,
            },
        );
        assert!(matches!(
            table.get(id),
            GeneratorScratch::SequenceLike { re_entry: 4, .. }
        ));
        table.remove(id);
        assert!(table.is_empty());
    }
}
