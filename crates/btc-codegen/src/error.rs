//! Code generation errors

use btc_bytecode::{BssError, DebugError};
use btc_ir::{NodeId, NodeKind};
use thiserror::Error;

/// Errors the code generator or driver can raise.
///
/// Per `spec.md` §7: emitters return a non-zero result on failure, the
/// driver propagates the first one and aborts without emitting a partial
/// file. There is no local recovery — a tree that cannot be fully lowered
/// is a programming error, not a runtime condition.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// An emitter was asked to process a node with `declared = false`.
    #[error("node {id} ({kind:?}) was never declared by the front end")]
    UndeclaredNode {
        /// The undeclared node's id.
        id: NodeId,
        /// The undeclared node's kind.
        kind: NodeKind,
    },

    /// No emitter implements this node kind.
    #[error("node {id}: no code generator implements {kind:?}")]
    UnsupportedKind {
        /// The node whose kind has no emitter.
        id: NodeId,
        /// The unsupported kind.
        kind: NodeKind,
    },

    /// The BSS allocator's capacity was exceeded during setup.
    #[error(transparent)]
    BssExhausted(#[from] BssError),

    /// A debug scope push/pop was unbalanced during emission.
    #[error(transparent)]
    DebugUnbalanced(#[from] DebugError),

    /// An I/O failure while writing the compiled program.
    #[error("I/O error writing program: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the code generator.
pub type CodegenResult<T> = Result<T, CodegenError>;
