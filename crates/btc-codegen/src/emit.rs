//! Kind dispatch: the generic switch every node's construct/execute/destruct
//! call goes through, mirroring `nodes.cpp`'s `gen_con`/`gen_exe`/`gen_des`.

use btc_ir::{Node, NodeKind};

use crate::context::CodegenContext;
use crate::emitters::{composite, leaf, parallel, unsupported};
use crate::error::{CodegenError, CodegenResult};

/// Allocate and record whatever scratch a node's emitters need. Runs for
/// every node regardless of `declared` — only `gen_construct`/`gen_execute`/
/// `gen_destruct` enforce that a node was actually declared by the front end.
pub fn gen_setup(ctx: &mut CodegenContext<'_>, node: &Node) -> CodegenResult<()> {
    let scratch = match &node.kind {
        NodeKind::Sequence | NodeKind::Selector => Some(composite::setup(ctx, node)?),
        NodeKind::Parallel => Some(parallel::setup(ctx, node)?),
        NodeKind::DynSelector | NodeKind::Decorator(_) | NodeKind::Action { .. } | NodeKind::Succeed
        | NodeKind::Fail | NodeKind::Work => None,
    };
    if let Some(scratch) = scratch {
        ctx.scratch_mut().insert(node.id, scratch);
    }
    for child in &node.children {
        gen_setup(ctx, child)?;
    }
    Ok(())
}

/// Release whatever scratch `gen_setup` recorded for this node and its
/// children.
pub fn gen_teardown(ctx: &mut CodegenContext<'_>, node: &Node) {
    for child in &node.children {
        gen_teardown(ctx, child);
    }
    ctx.scratch_mut().remove(node.id);
}

/// Emit a node's construct code.
pub fn gen_construct(ctx: &mut CodegenContext<'_>, node: &Node) -> CodegenResult<()> {
    if !node.declared {
        return Err(CodegenError::UndeclaredNode {
            id: node.id,
            kind: node.kind,
        });
    }
    match &node.kind {
        NodeKind::Sequence | NodeKind::Selector => composite::emit_construct(ctx, node),
        NodeKind::Parallel => parallel::emit_construct(ctx, node),
        NodeKind::Action { .. } => leaf::emit_construct_noop(ctx, node.id, btc_bytecode::Phase::Construct),
        NodeKind::Succeed | NodeKind::Fail => {
            leaf::emit_construct_noop(ctx, node.id, btc_bytecode::Phase::Construct)
        }
        NodeKind::DynSelector | NodeKind::Decorator(_) | NodeKind::Work => {
            Err(unsupported::reject(node))
        }
    }
}

/// Emit a node's execute code.
pub fn gen_execute(ctx: &mut CodegenContext<'_>, node: &Node) -> CodegenResult<()> {
    if !node.declared {
        return Err(CodegenError::UndeclaredNode {
            id: node.id,
            kind: node.kind,
        });
    }
    match &node.kind {
        NodeKind::Sequence => composite::emit_execute(ctx, node, composite::SEQUENCE),
        NodeKind::Selector => composite::emit_execute(ctx, node, composite::SELECTOR),
        NodeKind::Parallel => parallel::emit_execute(ctx, node),
        NodeKind::Action { callback_id } => leaf::emit_action_execute(ctx, node.id, *callback_id),
        NodeKind::Succeed | NodeKind::Fail => {
            leaf::emit_constant_execute(ctx, node.id, leaf::constant_status(&node.kind))
        }
        NodeKind::DynSelector | NodeKind::Decorator(_) | NodeKind::Work => {
            Err(unsupported::reject(node))
        }
    }
}

/// Emit a node's destruct code.
pub fn gen_destruct(ctx: &mut CodegenContext<'_>, node: &Node) -> CodegenResult<()> {
    if !node.declared {
        return Err(CodegenError::UndeclaredNode {
            id: node.id,
            kind: node.kind,
        });
    }
    match &node.kind {
        NodeKind::Sequence | NodeKind::Selector => composite::emit_destruct(ctx, node),
        NodeKind::Parallel => parallel::emit_destruct(ctx, node),
        NodeKind::Action { .. } => leaf::emit_construct_noop(ctx, node.id, btc_bytecode::Phase::Destruct),
        NodeKind::Succeed | NodeKind::Fail => {
            leaf::emit_construct_noop(ctx, node.id, btc_bytecode::Phase::Destruct)
        }
        NodeKind::DynSelector | NodeKind::Decorator(_) | NodeKind::Work => {
            Err(unsupported::reject(node))
        }
    }
}
