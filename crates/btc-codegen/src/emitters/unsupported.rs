//! Extension points with no core emitter: Decorator, DynSelector, Work.
//!
//! The original compiler stubs these the same way (`nodes.cpp`'s
//! `gen_con_decorator`/`gen_exe_decorator`/`gen_des_decorator` and the
//! `dynselector` equivalents all `return -1`). This generator preserves that
//! behavior as a typed error rather than a bare sentinel return code.

use btc_ir::Node;

use crate::error::CodegenError;

/// Always fails: no emitter implements this node's kind.
pub fn reject(node: &Node) -> CodegenError {
    CodegenError::UnsupportedKind {
        id: node.id,
        kind: node.kind,
    }
}
