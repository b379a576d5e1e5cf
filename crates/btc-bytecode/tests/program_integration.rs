//! Integration tests for the compiled program container

use btc_bytecode::{DebugScopeStream, Opcode, Phase, Program};

#[test]
fn empty_program_encodes_and_decodes() {
    let program = Program::new();
    let bytes = program.encode(false);
    let decoded = Program::decode(&bytes, false).expect("decode failed");
    assert_eq!(decoded.instructions_ref().count(), 0);
    assert_eq!(decoded.bss_ref().size(), 0);
}

#[test]
fn save_and_load_round_trip_through_a_buffer() {
    let mut program = Program::new();
    program.instructions().push(Opcode::StoreCInR, 0, 0, 0);
    program.instructions().push(Opcode::Halt, 0, 0, 0);

    let mut buf = Vec::new();
    program.save(&mut buf, false).unwrap();

    let mut cursor = std::io::Cursor::new(buf);
    let loaded = Program::load(&mut cursor, false).unwrap();
    assert_eq!(loaded.instructions_ref().count(), 2);
    assert_eq!(program, loaded);
}

#[test]
fn debug_scopes_survive_a_round_trip() {
    let mut program = Program::new();
    program.debug().set_enabled(true);
    program.debug().push_debug_scope(42, Phase::Construct, 0);
    program.instructions().push(Opcode::StoreCInR, 0, 0, 0);
    let instruction_count = program.instructions_ref().count() as u32;
    program
        .debug()
        .pop_debug_scope(42, Phase::Construct, instruction_count)
        .unwrap();

    let bytes = program.encode(false);
    let decoded = Program::decode(&bytes, false).unwrap();
    assert_eq!(decoded.debug_ref().entries().len(), 1);
    assert_eq!(decoded.debug_ref().entries()[0].node_id, 42);
}

#[test]
fn debug_stream_disabled_by_default_leaves_scopes_unrecorded() {
    let stream = DebugScopeStream::new();
    assert!(!stream.is_enabled());
    assert!(stream.entries().is_empty());
}
