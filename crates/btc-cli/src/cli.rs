//! Command-line flags.
//!
//! Mirrors `main.cpp`'s `getopt` surface one-for-one rather than adopting
//! clap's usual multi-subcommand shape (contrast
//! `raya-cli::Cli`/`Commands`) — this compiler has exactly one job, so one
//! flat flag set is what the teacher's own `getopt` loop amounts to.

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

/// Endianness for the emitted program's on-disk encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Endianness {
    /// Little-endian (default).
    Little,
    /// Big-endian.
    Big,
}

impl Endianness {
    /// Whether [`btc_bytecode::Program::encode`] should byte-swap.
    pub fn swap_endian(self) -> bool {
        self == Endianness::Big
    }
}

/// Behavior tree bytecode compiler.
///
/// `-h` is the header-output flag, not help — usage is printed with `-?` or
/// `--help` instead, matching `main.cpp`'s own `getopt` string.
#[derive(Debug, Parser)]
#[command(name = "btc", version, about, disable_help_flag = true)]
pub struct Args {
    /// Print usage and exit.
    #[arg(short = '?', long = "help", action = ArgAction::Help)]
    #[allow(dead_code)] // ArgAction::Help exits before this field is ever read
    pub help: Option<bool>,

    /// Input behavior tree source file.
    #[arg(short = 'i', value_name = "FILE")]
    pub input: PathBuf,

    /// Output compiled program file.
    #[arg(short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Emit a textual disassembly to FILE.
    #[arg(short = 'a', value_name = "FILE")]
    pub disassembly: Option<PathBuf>,

    /// Emit a C-compatible header of action/decorator id constants to FILE.
    #[arg(short = 'h', value_name = "FILE")]
    pub header: Option<PathBuf>,

    /// Endianness of the emitted program.
    #[arg(short = 'e', value_enum, default_value = "little")]
    pub endianness: Endianness,

    /// Print the input file's include dependency list and exit.
    #[arg(short = 'l')]
    pub list_dependencies: bool,
}
