//! Behavior tree VM bytecode definitions
//!
//! This crate provides the core instruction set, the persistent scratch
//! ("BSS") segment allocator, the debug scope stream, and the `Program`
//! container that the code generator (`btc-codegen`) emits into and the
//! CLI (`btc-cli`) serializes to disk.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod bss;
pub mod debug;
pub mod instruction;
pub mod opcode;
pub mod program;

pub use bss::{BssAllocator, BssError, DEFAULT_BSS_CAPACITY};
pub use debug::{DebugError, DebugScopeStream, Phase};
pub use instruction::{Instruction, InstructionStream, UNINIT};
pub use opcode::{NodeStatus, Opcode};
pub use program::{Program, ProgramError};
