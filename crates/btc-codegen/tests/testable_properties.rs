//! The invariants and literal scenarios from the compiler's testable
//! properties: structural assertions over emitted instructions, since
//! actually ticking a program requires a host VM (out of scope here).

use btc_bytecode::{NodeStatus, Opcode, Program};
use btc_codegen::{compile, driver::Driver, CodegenError};
use btc_ir::{DecoratorPredicate, Node, NodeId, NodeKind};

fn action(name: &str) -> Node {
    Node::new(
        name,
        NodeKind::Action {
            callback_id: NodeId::from_name(name),
        },
    )
}

// --- Invariants -------------------------------------------------------

#[test]
fn no_dangling_patches_survive_generation() {
    let tree = Node::new("root", NodeKind::Sequence)
        .with_children([action("a"), action("b"), Node::new("c", NodeKind::Succeed)]);
    let program = compile(&tree).unwrap();
    assert_eq!(program.instructions_ref().find_dangling_patch(), None);
}

#[test]
fn bss_size_is_symmetric_across_setup_and_teardown() {
    let tree = Node::new("root", NodeKind::Parallel)
        .with_children([action("a"), action("b")]);
    let mut program = Program::new();
    let mut driver = Driver::new();
    driver.setup(&mut program, &tree).unwrap();
    let size_after_setup = program.bss_ref().size();
    driver.generate(&mut program, &tree).unwrap();
    driver.teardown(&mut program, &tree);
    assert_eq!(program.bss_ref().size(), size_after_setup);
}

#[test]
fn debug_scopes_are_balanced_when_enabled() {
    let tree = Node::new("root", NodeKind::Sequence).with_children([action("a")]);
    let mut program = Program::new();
    program.debug().set_enabled(true);
    let mut driver = Driver::new();
    driver.setup(&mut program, &tree).unwrap();
    driver.generate(&mut program, &tree).unwrap();
    driver.teardown(&mut program, &tree);
    assert!(program.debug_ref().is_balanced());
    for entry in program.debug_ref().entries() {
        assert!(entry.close >= entry.open);
    }
}

#[test]
fn generation_is_deterministic() {
    let tree = || {
        Node::new("root", NodeKind::Selector).with_children([
            Node::new("a", NodeKind::Fail),
            Node::new("b", NodeKind::Succeed),
        ])
    };
    let p1 = compile(&tree()).unwrap();
    let p2 = compile(&tree()).unwrap();
    assert_eq!(p1.encode(false), p2.encode(false));
}

// --- Literal scenarios --------------------------------------------------

#[test]
fn scenario_1_empty_sequence() {
    let tree = Node::new("root", NodeKind::Sequence);
    let program = compile(&tree).unwrap();
    let instructions = program.instructions_ref().as_slice();

    // construct: two STORE_C_IN_B initializers.
    assert_eq!(instructions[0].opcode, Opcode::StoreCInB);
    assert_eq!(instructions[1].opcode, Opcode::StoreCInB);
    assert_eq!(instructions[0].a2, btc_bytecode::UNINIT);
    assert_eq!(instructions[1].a2, btc_bytecode::UNINIT);

    // execute: re-entry test, then the unconditional jump to the tail.
    assert_eq!(instructions[2].opcode, Opcode::JabbCDiffB);
    assert_eq!(instructions[3].opcode, Opcode::JabcConstant);

    // a HALT terminates the program.
    assert_eq!(instructions.last().unwrap().opcode, Opcode::Halt);
}

#[test]
fn scenario_2_two_actions_emit_no_parallel_bookkeeping() {
    let tree = Node::new("root", NodeKind::Sequence).with_children([action("a"), action("b")]);
    let program = compile(&tree).unwrap();
    assert!(program
        .instructions_ref()
        .as_slice()
        .iter()
        .all(|i| i.opcode != Opcode::IncBss));
    let native_calls = program
        .instructions_ref()
        .as_slice()
        .iter()
        .filter(|i| i.opcode == Opcode::NativeCall)
        .count();
    assert_eq!(native_calls, 2);
}

#[test]
fn scenario_3_running_child_leaves_re_entry_pointing_past_its_construct() {
    let tree = Node::new("root", NodeKind::Sequence).with_children([action("a"), action("b")]);
    let program = compile(&tree).unwrap();
    // The re-entry store right after A's construct/execute records the
    // instruction index immediately following itself.
    let instructions = program.instructions_ref().as_slice();
    let store_re_entry = instructions
        .iter()
        .enumerate()
        .find(|(_, i)| i.opcode == Opcode::StoreCInB && i.a2 != btc_bytecode::UNINIT && i.a2 != 0)
        .expect("at least one re-entry store");
    assert_eq!(store_re_entry.1.a2 as usize, store_re_entry.0 + 1);
}

#[test]
fn scenario_4_selector_fail_then_success() {
    let tree = Node::new("root", NodeKind::Selector)
        .with_children([Node::new("a", NodeKind::Fail), Node::new("b", NodeKind::Succeed)]);
    let program = compile(&tree).unwrap();
    let instructions = program.instructions_ref().as_slice();
    // Selector short-circuits on Success: somewhere a JABC_R_DIFF_C checks
    // against Fail (the continue status), matching the shared composite
    // policy rather than a Sequence-shaped check against Success.
    assert!(instructions
        .iter()
        .any(|i| i.opcode == Opcode::JabcRDiffC && i.a2 == NodeStatus::Fail.as_u32()));
}

#[test]
fn scenario_5_parallel_three_children_counts_successes() {
    let tree = Node::new("root", NodeKind::Parallel).with_children([
        action("a"),
        action("b"),
        action("c"),
    ]);
    let program = compile(&tree).unwrap();
    let instructions = program.instructions_ref().as_slice();
    // The final compare is against the full child count (3).
    assert!(instructions
        .iter()
        .any(|i| i.opcode == Opcode::JabcCDiffB && i.a2 == 3));
    assert_eq!(
        instructions
            .iter()
            .filter(|i| i.opcode == Opcode::IncBss)
            .count(),
        3
    );
}

#[test]
fn scenario_6_unsupported_decorator_leaves_program_state_untouched() {
    let predicate = DecoratorPredicate {
        predicate_id: NodeId::from_name("is-alive"),
        invert: false,
    };
    let tree = Node::new("root", NodeKind::Sequence)
        .with_children([Node::new("guard", NodeKind::Decorator(predicate))]);

    let mut program = Program::new();
    program.debug().set_enabled(true);
    let mut driver = Driver::new();
    driver.setup(&mut program, &tree).unwrap();
    let bss_before = program.bss_ref().size();
    let debug_before = program.debug_ref().entries().len();

    let err = driver.generate(&mut program, &tree).unwrap_err();
    assert!(matches!(err, CodegenError::UnsupportedKind { .. }));
    assert!(
        program.debug_ref().is_balanced(),
        "a failed generate must not leave an ancestor's debug scope open"
    );

    driver.teardown(&mut program, &tree);
    assert_eq!(program.bss_ref().size(), bss_before);
    assert_eq!(program.debug_ref().entries().len(), debug_before);
}
