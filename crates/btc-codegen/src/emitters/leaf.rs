//! Leaf emission: Action, Succeed, Fail.
//!
//! None of these carry scratch state or children, so they have no `setup`/
//! `teardown` step — unlike the original compiler's Action stub (`nodes.cpp`
//! `gen_con_action`/`gen_exe_action`/`gen_des_action` all `return -1`), this
//! generator implements Action's dispatch: its semantics are given directly
//! in the spec body text, unlike the genuinely undetermined `Work` kind.

use btc_bytecode::{NodeStatus, Opcode, Phase};
use btc_ir::{NodeId, NodeKind};

use crate::context::CodegenContext;
use crate::error::CodegenResult;

/// Action has no setup/execution state to initialize.
pub fn emit_construct_noop(ctx: &mut CodegenContext<'_>, node_id: NodeId, phase: Phase) -> CodegenResult<()> {
    ctx.push_debug_scope(node_id, phase);
    ctx.pop_debug_scope(node_id, phase)?;
    Ok(())
}

/// `R = NATIVE_CALL(callback_id)`
pub fn emit_action_execute(
    ctx: &mut CodegenContext<'_>,
    node_id: NodeId,
    callback_id: NodeId,
) -> CodegenResult<()> {
    ctx.push_debug_scope(node_id, Phase::Execute);
    ctx.push(Opcode::NativeCall, callback_id.0, 0, 0);
    ctx.pop_debug_scope(node_id, Phase::Execute)?;
    Ok(())
}

/// `R = status`, for the constant Succeed/Fail leaves.
pub fn emit_constant_execute(
    ctx: &mut CodegenContext<'_>,
    node_id: NodeId,
    status: NodeStatus,
) -> CodegenResult<()> {
    ctx.push_debug_scope(node_id, Phase::Execute);
    ctx.store_status_in_return(status);
    ctx.pop_debug_scope(node_id, Phase::Execute)?;
    Ok(())
}

/// Resolve a leaf's kind-specific status, used by callers that already
/// dispatched on `NodeKind::Succeed`/`NodeKind::Fail`.
pub fn constant_status(kind: &NodeKind) -> NodeStatus {
    match kind {
        NodeKind::Succeed => NodeStatus::Success,
        NodeKind::Fail => NodeStatus::Fail,
        other => unreachable!("constant_status called with non-constant kind {other:?}"),
    }
}
