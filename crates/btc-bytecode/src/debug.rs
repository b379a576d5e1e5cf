//! Debug scope stream (C3)

use thiserror::Error;

/// Which phase of a node's emitted code a debug scope covers.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// The node's construct code.
    Construct = 0,
    /// The node's execute code.
    Execute = 1,
    /// The node's destruct code.
    Destruct = 2,
}

impl Phase {
    /// Decode a raw phase byte, used by [`crate::program::Program::load`].
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Construct),
            1 => Some(Self::Execute),
            2 => Some(Self::Destruct),
            _ => None,
        }
    }
}

/// A closed `(instruction_range, node_id, phase)` debug scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebugScopeEntry {
    /// Instruction index where this scope opened.
    pub open: u32,
    /// Instruction index where this scope closed.
    pub close: u32,
    /// The node this scope describes.
    pub node_id: u32,
    /// Which phase of the node's code this scope covers.
    pub phase: Phase,
}

/// Errors raised by unbalanced push/pop calls.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DebugError {
    /// A `pop_debug_scope` call did not match the innermost open scope.
    #[error("unbalanced debug scope: popped node {popped_node} phase {popped_phase:?}, but the innermost open scope is node {open_node} phase {open_phase:?}")]
    Unbalanced {
        /// Node id the caller tried to pop.
        popped_node: u32,
        /// Phase the caller tried to pop.
        popped_phase: Phase,
        /// Node id actually on top of the open-scope stack.
        open_node: u32,
        /// Phase actually on top of the open-scope stack.
        open_phase: Phase,
    },
    /// A `pop_debug_scope` call occurred with no open scopes at all.
    #[error("unbalanced debug scope: popped node {popped_node} phase {popped_phase:?} with no open scopes")]
    EmptyStack {
        /// Node id the caller tried to pop.
        popped_node: u32,
        /// Phase the caller tried to pop.
        popped_phase: Phase,
    },
}

#[derive(Debug)]
struct OpenScope {
    node_id: u32,
    phase: Phase,
    open: u32,
}

/// Records `(instruction_range, node_id, phase)` triples interleaved with
/// instruction emission. Entirely suppressed (no-op) when disabled, so
/// emitters can call `push_debug_scope`/`pop_debug_scope` unconditionally
/// without branching on whether debug info was requested.
#[derive(Default, Debug)]
pub struct DebugScopeStream {
    enabled: bool,
    open_stack: Vec<OpenScope>,
    entries: Vec<DebugScopeEntry>,
}

impl DebugScopeStream {
    /// Create a stream with debug emission disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable debug scope emission.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether debug scope emission is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Open a debug scope at the given instruction offset.
    pub fn push_debug_scope(&mut self, node_id: u32, phase: Phase, at: u32) {
        if !self.enabled {
            return;
        }
        self.open_stack.push(OpenScope { node_id, phase, open: at });
    }

    /// Close the innermost open debug scope. Validates stack discipline:
    /// the popped `(node_id, phase)` must match the innermost open scope.
    pub fn pop_debug_scope(
        &mut self,
        node_id: u32,
        phase: Phase,
        at: u32,
    ) -> Result<(), DebugError> {
        if !self.enabled {
            return Ok(());
        }
        let Some(top) = self.open_stack.pop() else {
            return Err(DebugError::EmptyStack {
                popped_node: node_id,
                popped_phase: phase,
            });
        };
        if top.node_id != node_id || top.phase != phase {
            return Err(DebugError::Unbalanced {
                popped_node: node_id,
                popped_phase: phase,
                open_node: top.node_id,
                open_phase: top.phase,
            });
        }
        self.entries.push(DebugScopeEntry {
            open: top.open,
            close: at,
            node_id,
            phase,
        });
        Ok(())
    }

    /// True once every opened scope has been closed.
    pub fn is_balanced(&self) -> bool {
        self.open_stack.is_empty()
    }

    /// Closed entries recorded so far, in closing order.
    pub fn entries(&self) -> &[DebugScopeEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_stream_records_nothing() {
        let mut d = DebugScopeStream::new();
        d.push_debug_scope(1, Phase::Execute, 0);
        assert!(d.pop_debug_scope(1, Phase::Execute, 5).is_ok());
        assert!(d.entries().is_empty());
    }

    #[test]
    fn balanced_push_pop_records_a_closed_entry() {
        let mut d = DebugScopeStream::new();
        d.set_enabled(true);
        d.push_debug_scope(1, Phase::Execute, 0);
        d.pop_debug_scope(1, Phase::Execute, 5).unwrap();
        assert!(d.is_balanced());
        assert_eq!(d.entries().len(), 1);
        assert_eq!(d.entries()[0].close, 5);
    }

    #[test]
    fn nested_scopes_close_innermost_first() {
        let mut d = DebugScopeStream::new();
        d.set_enabled(true);
        d.push_debug_scope(1, Phase::Execute, 0);
        d.push_debug_scope(2, Phase::Execute, 1);
        assert_eq!(
            d.pop_debug_scope(1, Phase::Execute, 2),
            Err(DebugError::Unbalanced {
                popped_node: 1,
                popped_phase: Phase::Execute,
                open_node: 2,
                open_phase: Phase::Execute,
            })
        );
        d.pop_debug_scope(2, Phase::Execute, 2).unwrap();
        d.pop_debug_scope(1, Phase::Execute, 3).unwrap();
        assert!(d.is_balanced());
    }

    #[test]
    fn pop_with_no_open_scopes_errors() {
        let mut d = DebugScopeStream::new();
        d.set_enabled(true);
        assert_eq!(
            d.pop_debug_scope(1, Phase::Construct, 0),
            Err(DebugError::EmptyStack {
                popped_node: 1,
                popped_phase: Phase::Construct,
            })
        );
    }
}
