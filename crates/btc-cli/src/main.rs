//! `btc`: the behavior tree bytecode compiler's command-line driver.
//!
//! Mirrors `main.cpp`'s `getopt` loop and its `returnCode` plumbing: setup
//! and generate failures, a missing input file, and a bad `-e` argument all
//! come back as `-1`; an output file that can't be opened for writing is
//! `-2`; a failed write of the finished program is `-5`.

mod cli;
mod output;
mod source;

use std::fs;
use std::io::Write;
use std::process::ExitCode;

use clap::{error::ErrorKind, Parser};

use btc_codegen::Driver;

use cli::Args;
use output::StyledOutput;
use source::TreeSource;

const EXIT_SUCCESS: u8 = 0;
const EXIT_ARGUMENT_ERROR: i8 = -1;
const EXIT_OUTPUT_OPEN_ERROR: i8 = -2;
const EXIT_OUTPUT_WRITE_ERROR: i8 = -5;

fn main() -> ExitCode {
    let mut out = StyledOutput::new();
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            print!("{err}");
            return ExitCode::from(EXIT_SUCCESS);
        }
        Err(err) => {
            out.error(&err.to_string());
            return exit_code(EXIT_ARGUMENT_ERROR);
        }
    };

    match run(args, &mut out) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(code) => exit_code(code),
    }
}

fn exit_code(code: i8) -> ExitCode {
    ExitCode::from(code as u8)
}

fn run(args: Args, out: &mut StyledOutput) -> Result<(), i8> {
    let text = fs::read_to_string(&args.input).map_err(|err| {
        out.error(&format!(
            "{}(0): error: unable to open input file \"{}\" for reading: {err}",
            args.input.display(),
            args.input.display()
        ));
        EXIT_ARGUMENT_ERROR
    })?;

    let source = TreeSource::from_json(&text).map_err(|err| {
        out.error(&format!("{}(0): error: {err}", args.input.display()));
        EXIT_ARGUMENT_ERROR
    })?;

    let (root, options) = source.into_ir().map_err(|err| {
        out.error(&format!("{}(0): error: {err}", args.input.display()));
        EXIT_ARGUMENT_ERROR
    })?;

    if args.list_dependencies {
        // The textual grammar's include resolution is out of scope for this
        // compiler (spec.md §1); a single JSON source file has no includes.
        println!("{}", args.input.display());
    }

    if let Some(header_path) = &args.header {
        let header_text = Driver::new().emit_header(&root, &options);
        write_output_file(header_path, header_text.as_bytes(), out)?;
    }

    let debug_info = options
        .get("debug_info")
        .map(|v| v.as_bool())
        .unwrap_or(false);

    let mut program = btc_bytecode::Program::new();
    program.debug().set_enabled(debug_info);
    let mut driver = Driver::new();
    // Teardown must run no matter which phase fails, so the phase that did
    // fail is carried alongside its error for the message below rather than
    // short-circuiting out via `?` before `teardown` is reached.
    let result = match driver.setup(&mut program, &root) {
        Ok(()) => driver.generate(&mut program, &root).map_err(|err| ("generate", err)),
        Err(err) => Err(("setup", err)),
    };
    driver.teardown(&mut program, &root);
    if let Err((phase, err)) = result {
        out.error(&format!(
            "{}(0): error: internal compiler error in {phase}: {err}",
            args.input.display()
        ));
        return Err(EXIT_ARGUMENT_ERROR);
    }

    if let Some(output_path) = &args.output {
        let bytes = program.encode(args.endianness.swap_endian());
        write_compiled_output(output_path, &bytes, out)?;

        let force_asm = options
            .get("force_asm")
            .map(|v| v.as_bool())
            .unwrap_or(false);
        let asm_path = args
            .disassembly
            .clone()
            .or_else(|| force_asm.then(|| output_path.with_extension("asm")));
        if let Some(asm_path) = asm_path {
            let mut buf = Vec::new();
            program
                .disassemble(&mut buf)
                .expect("disassembling into a Vec<u8> cannot fail");
            write_output_file(&asm_path, &buf, out)?;
        }
    } else if let Some(asm_path) = &args.disassembly {
        let mut buf = Vec::new();
        program
            .disassemble(&mut buf)
            .expect("disassembling into a Vec<u8> cannot fail");
        write_output_file(asm_path, &buf, out)?;
    }

    out.success(&format!(
        "compiled {} ({} instructions, {} bytes BSS)",
        args.input.display(),
        program.instructions_ref().count(),
        program.bss_ref().size()
    ));
    Ok(())
}

/// Open `path` for writing the finished program; an open failure is `-2`, a
/// write failure is `-5` (distinct from every other output file, which the
/// original treats both failure modes on as a plain argument error).
fn write_compiled_output(path: &std::path::Path, bytes: &[u8], out: &mut StyledOutput) -> Result<(), i8> {
    let mut file = fs::File::create(path).map_err(|err| {
        out.error(&format!(
            "error: unable to open output file {} for writing: {err}",
            path.display()
        ));
        EXIT_OUTPUT_OPEN_ERROR
    })?;
    file.write_all(bytes).map_err(|err| {
        out.error(&format!(
            "error: failed to write output file {}: {err}",
            path.display()
        ));
        EXIT_OUTPUT_WRITE_ERROR
    })
}

/// Open `path` for writing an auxiliary text output (header or disassembly);
/// both open and write failures here are plain argument errors, matching
/// `main.cpp`'s treatment of the header and `-a` files.
fn write_output_file(path: &std::path::Path, bytes: &[u8], out: &mut StyledOutput) -> Result<(), i8> {
    let mut file = fs::File::create(path).map_err(|err| {
        out.error(&format!(
            "error: unable to open output file {} for writing: {err}",
            path.display()
        ));
        EXIT_ARGUMENT_ERROR
    })?;
    file.write_all(bytes).map_err(|err| {
        out.error(&format!(
            "error: failed to write output file {}: {err}",
            path.display()
        ));
        EXIT_ARGUMENT_ERROR
    })
}
