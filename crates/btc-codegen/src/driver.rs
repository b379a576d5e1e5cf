//! Three-phase generation pipeline: `setup`, `generate`, `teardown`.
//!
//! Mirrors the call sequence in `main.cpp` (`setup(btc, &p); generate(&p);
//! teardown(&p);`): scratch is allocated for the whole tree before any code
//! is emitted, and released afterward regardless of whether setup or
//! generation succeeded, so a failed compile never leaks scratch-table
//! entries.

use btc_bytecode::{Opcode, Program};
use btc_ir::Node;

use crate::context::CodegenContext;
use crate::emit;
use crate::error::CodegenResult;
use crate::header;
use crate::options::TreeOptions;
use crate::scratch::ScratchTable;

/// Runs the setup/generate/teardown pipeline over a resolved tree.
#[derive(Default)]
pub struct Driver {
    scratch: ScratchTable,
}

impl Driver {
    /// Create a driver with an empty scratch table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate BSS scratch for every node in the tree.
    pub fn setup(&mut self, program: &mut Program, root: &Node) -> CodegenResult<()> {
        let mut ctx = CodegenContext::new(program, &mut self.scratch);
        emit::gen_setup(&mut ctx, root)
    }

    /// Emit construct/execute/destruct code for the whole tree and append
    /// the terminating `Halt` instruction. Must run after [`Driver::setup`].
    pub fn generate(&mut self, program: &mut Program, root: &Node) -> CodegenResult<()> {
        let mut ctx = CodegenContext::new(program, &mut self.scratch);
        emit::gen_construct(&mut ctx, root)?;
        emit::gen_execute(&mut ctx, root)?;
        emit::gen_destruct(&mut ctx, root)?;
        ctx.push(Opcode::Halt, 0, 0, 0);
        Ok(())
    }

    /// Release scratch for the whole tree. Always safe to call, even after a
    /// failed `setup` or `generate` — every node's entry is removed by id
    /// regardless of how much of the tree was actually allocated or emitted.
    pub fn teardown(&mut self, program: &mut Program, root: &Node) {
        let mut ctx = CodegenContext::new(program, &mut self.scratch);
        emit::gen_teardown(&mut ctx, root);
    }

    /// True once every `setup`-allocated scratch entry has been released.
    pub fn is_clean(&self) -> bool {
        self.scratch.is_empty()
    }

    /// Render the `-h` C header for `tree`, independent of whether `tree`
    /// compiled (a tree with an unsupported node kind can still export its
    /// Action/Decorator symbol ids).
    pub fn emit_header(&self, tree: &Node, options: &TreeOptions) -> String {
        header::emit_header(tree, options)
    }
}

/// Run the full setup → generate → teardown pipeline in one call, the way
/// the CLI driver needs it. Teardown always runs, whether `setup` or
/// `generate` is the phase that fails.
pub fn compile(root: &Node) -> CodegenResult<Program> {
    let mut program = Program::new();
    let mut driver = Driver::new();

    let result = match driver.setup(&mut program, root) {
        Ok(()) => driver.generate(&mut program, root),
        Err(err) => Err(err),
    };
    driver.teardown(&mut program, root);

    result?;
    Ok(program)
}
