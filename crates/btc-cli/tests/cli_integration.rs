//! End-to-end tests of the `btc` binary: spawns the compiled executable
//! against fixture tree sources and checks exit codes and output files.

use std::path::PathBuf;
use std::process::Command;

fn btc() -> Command {
    Command::new(env!("CARGO_BIN_EXE_btc"))
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

#[test]
fn compiles_a_simple_sequence_to_a_program_file() {
    let tmp = tempfile_path("simple.cbt");
    let status = btc()
        .args(["-i", fixture("sequence.json").to_str().unwrap(), "-o"])
        .arg(&tmp)
        .status()
        .expect("failed to run btc");
    assert!(status.success());
    let bytes = std::fs::read(&tmp).expect("output file was not written");
    assert_eq!(&bytes[0..4], b"CBTP");
    let _ = std::fs::remove_file(&tmp);
}

#[test]
fn missing_input_file_is_an_argument_error() {
    let status = btc()
        .args(["-i", "does-not-exist.json"])
        .status()
        .expect("failed to run btc");
    assert_eq!(status.code(), Some(255)); // -1 as an 8-bit exit status
}

#[test]
fn unsupported_decorator_node_is_an_argument_error() {
    let status = btc()
        .args(["-i", fixture("unsupported_decorator.json").to_str().unwrap()])
        .status()
        .expect("failed to run btc");
    assert_eq!(status.code(), Some(255));
}

#[test]
fn header_flag_emits_action_symbol_constants() {
    let tmp = tempfile_path("symbols.h");
    let status = btc()
        .args(["-i", fixture("sequence.json").to_str().unwrap(), "-h"])
        .arg(&tmp)
        .status()
        .expect("failed to run btc");
    assert!(status.success());
    let text = std::fs::read_to_string(&tmp).unwrap();
    assert!(text.contains("const unsigned int"));
    let _ = std::fs::remove_file(&tmp);
}

fn tempfile_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("btc-cli-test-{}-{}", std::process::id(), name))
}
