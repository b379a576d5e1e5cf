//! Parallel emission: every child ticks every tick.

use btc_bytecode::{NodeStatus, Opcode, Phase};
use btc_ir::Node;

use crate::context::CodegenContext;
use crate::emit;
use crate::error::CodegenResult;
use crate::patch::PatchList;
use crate::scratch::GeneratorScratch;

/// Reserve the success counter slot.
pub fn setup(ctx: &mut CodegenContext<'_>, _node: &Node) -> CodegenResult<GeneratorScratch> {
    let success_counter = ctx.alloc_bss(4, 4)?;
    Ok(GeneratorScratch::Parallel { success_counter })
}

/// Construct every child in order; Parallel has no scratch of its own to
/// initialize (the success counter is reset each tick in `execute`).
pub fn emit_construct(ctx: &mut CodegenContext<'_>, node: &Node) -> CodegenResult<()> {
    ctx.with_debug_scope(node.id, Phase::Construct, |ctx| {
        for child in &node.children {
            emit::gen_construct(ctx, child)?;
        }
        Ok(())
    })
}

/// Tick every child regardless of earlier children's results this tick;
/// fail immediately if any child failed, otherwise succeed once every child
/// has (across however many ticks that takes), and run otherwise.
pub fn emit_execute(ctx: &mut CodegenContext<'_>, node: &Node) -> CodegenResult<()> {
    let GeneratorScratch::Parallel { success_counter } = ctx.scratch().get(node.id) else {
        unreachable!("parallel scratch must be Parallel")
    };

    ctx.with_debug_scope(node.id, Phase::Execute, |ctx| {
        ctx.store_const_in_bss(success_counter, 0);

        let mut exit_fail = PatchList::new();
        let child_count = node.children.len() as u32;

        for child in &node.children {
            emit::gen_execute(ctx, child)?;

            exit_fail.push(ctx.reserve_jump(Opcode::JabcREquaC, NodeStatus::Fail.as_u32(), 0));

            // Skip the counter increment unless this child just succeeded.
            let skip_increment = ctx.here() + 2;
            ctx.push(Opcode::JabcRDiffC, skip_increment, NodeStatus::Success.as_u32(), 0);

            ctx.push(Opcode::IncBss, success_counter, 1, 0);
        }

        ctx.store_status_in_return(NodeStatus::Running);

        // Skip the success store unless every child has now succeeded.
        let skip_success = ctx.here() + 2;
        ctx.push(Opcode::JabcCDiffB, skip_success, child_count, success_counter);
        ctx.store_status_in_return(NodeStatus::Success);

        let exit_point = ctx.here();
        for &index in &exit_fail {
            ctx.patch_a1(index, exit_point);
        }

        Ok(())
    })
}

/// Destruct every child in order.
pub fn emit_destruct(ctx: &mut CodegenContext<'_>, node: &Node) -> CodegenResult<()> {
    ctx.with_debug_scope(node.id, Phase::Destruct, |ctx| {
        for child in &node.children {
            emit::gen_destruct(ctx, child)?;
        }
        Ok(())
    })
}
