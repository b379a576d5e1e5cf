//! Shared Sequence/Selector emission.
//!
//! The original compiler duplicated this logic once per node kind with the
//! success/fail roles swapped (`nodes.cpp`'s `gen_*_sequence` and
//! `gen_*_selector` are near-identical). Per the spec's REDESIGN FLAGS, this
//! module unifies them behind one [`CompositePolicy`]: Sequence continues
//! while children return `Success` and short-circuits on `Fail`; Selector is
//! the mirror image.

use btc_bytecode::{NodeStatus, Opcode, Phase, UNINIT};
use btc_ir::Node;

use crate::context::CodegenContext;
use crate::emit;
use crate::error::CodegenResult;
use crate::patch::PatchList;
use crate::scratch::GeneratorScratch;

/// Which status continues the loop (and is the fallthrough result once every
/// child has produced it), and which status short-circuits the loop early
/// with that same status as the overall result.
#[derive(Debug, Clone, Copy)]
pub struct CompositePolicy {
    /// Status a child must return to proceed to the next child; the overall
    /// result if every child returns it.
    pub continue_status: NodeStatus,
    /// Status a child returns that aborts the loop immediately, becoming the
    /// overall result.
    pub short_circuit_status: NodeStatus,
}

/// Sequence: keep going while children succeed, fail as soon as one does.
pub const SEQUENCE: CompositePolicy = CompositePolicy {
    continue_status: NodeStatus::Success,
    short_circuit_status: NodeStatus::Fail,
};

/// Selector: keep going while children fail, succeed as soon as one does.
pub const SELECTOR: CompositePolicy = CompositePolicy {
    continue_status: NodeStatus::Fail,
    short_circuit_status: NodeStatus::Success,
};

/// Reserve the jump-back and re-entry BSS slots a composite needs.
pub fn setup(ctx: &mut CodegenContext<'_>, _node: &Node) -> CodegenResult<GeneratorScratch> {
    let jump_back_target = ctx.alloc_bss(4, 4)?;
    let re_entry = ctx.alloc_bss(4, 4)?;
    Ok(GeneratorScratch::SequenceLike {
        jump_back_target,
        re_entry,
    })
}

/// `B[jump_back_target] = UNINIT; B[re_entry] = UNINIT`
pub fn emit_construct(ctx: &mut CodegenContext<'_>, node: &Node) -> CodegenResult<()> {
    let GeneratorScratch::SequenceLike {
        jump_back_target,
        re_entry,
    } = ctx.scratch().get(node.id)
    else {
        unreachable!("composite scratch must be SequenceLike")
    };

    ctx.push_debug_scope(node.id, Phase::Construct);
    ctx.store_const_in_bss(jump_back_target, UNINIT);
    ctx.store_const_in_bss(re_entry, UNINIT);
    ctx.pop_debug_scope(node.id, Phase::Construct)?;
    Ok(())
}

/// The shared child-ticking loop, parameterized by [`CompositePolicy`].
pub fn emit_execute(
    ctx: &mut CodegenContext<'_>,
    node: &Node,
    policy: CompositePolicy,
) -> CodegenResult<()> {
    let GeneratorScratch::SequenceLike {
        jump_back_target,
        re_entry,
    } = ctx.scratch().get(node.id)
    else {
        unreachable!("composite scratch must be SequenceLike")
    };

    ctx.with_debug_scope(node.id, Phase::Execute, |ctx| {
        let mut exit_running = PatchList::new();
        let mut exit_short_circuit = PatchList::new();
        let mut dest_store_patches = PatchList::new();
        let mut dest_jump_patches = PatchList::new();

        // Resume at the saved re-entry point if one is set.
        ctx.push(Opcode::JabbCDiffB, re_entry, UNINIT, re_entry);

        for child in &node.children {
            emit::gen_construct(ctx, child)?;

            // Record where execution resumes if this child suspends.
            let next = ctx.here() + 1;
            ctx.store_const_in_bss(re_entry, next);

            emit::gen_execute(ctx, child)?;

            // Reuse the jump-back-target slot as this child's destruct return
            // address, patched once the destruct block's address is known.
            dest_store_patches.push(ctx.push(Opcode::StoreCInB, jump_back_target, UNINIT, 0));

            exit_running.push(ctx.reserve_jump(Opcode::JabcREquaC, NodeStatus::Running.as_u32(), 0));

            dest_jump_patches.push(ctx.reserve_jump(
                Opcode::JabcSCInB,
                jump_back_target,
                ctx.here() as u32 + 1,
            ));

            exit_short_circuit.push(ctx.reserve_jump(Opcode::JabcRDiffC, policy.continue_status.as_u32(), 0));
        }

        // All children returned `continue_status` — fall through to success.
        let jump_to_fallthrough = ctx.reserve_jump(Opcode::JabcConstant, 0, 0);

        for (i, child) in node.children.iter().enumerate() {
            let store_point = ctx.here();
            ctx.patch_a2(dest_store_patches[i], store_point);
            let jump_point = ctx.here();
            ctx.patch_a1(dest_jump_patches[i], jump_point);

            emit::gen_destruct(ctx, child)?;

            ctx.push(Opcode::JabbSCInB, jump_back_target, jump_back_target, UNINIT);
        }

        let short_circuit_point = ctx.here();
        ctx.store_status_in_return(policy.short_circuit_status);

        ctx.patch_a1(jump_to_fallthrough, ctx.here());

        ctx.store_const_in_bss(re_entry, UNINIT);

        for &index in &exit_short_circuit {
            ctx.patch_a1(index, short_circuit_point);
        }

        let running_point = ctx.here();
        for &index in &exit_running {
            ctx.patch_a1(index, running_point);
        }

        Ok(())
    })
}

/// Jump to the destruct block only if a child is mid-suspend.
pub fn emit_destruct(ctx: &mut CodegenContext<'_>, node: &Node) -> CodegenResult<()> {
    let GeneratorScratch::SequenceLike {
        jump_back_target, ..
    } = ctx.scratch().get(node.id)
    else {
        unreachable!("composite scratch must be SequenceLike")
    };

    ctx.push_debug_scope(node.id, Phase::Destruct);

    let skip_target = ctx.here() + 2;
    ctx.push(Opcode::JabcCEquaB, skip_target, UNINIT, jump_back_target);
    ctx.push(
        Opcode::JabbSCInB,
        jump_back_target,
        jump_back_target,
        ctx.here() as u32 + 1,
    );

    ctx.pop_debug_scope(node.id, Phase::Destruct)?;
    Ok(())
}
