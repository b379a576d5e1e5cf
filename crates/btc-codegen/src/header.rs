//! C header emission for the `-h` CLI flag.
//!
//! Grounded on `main.cpp`'s `print_header`/`print_header_entry`: walks every
//! `Action`/`Decorator` symbol in the tree and renders one
//! `const unsigned int <symbol> = <id>;` line per symbol, bracketed by the
//! `ctc_h_header`/`ctc_h_footer` option strings.
//!
//! The original reads a Decorator's id through the wrong union arm
//! (`ns[i].m_Symbol.m_Action->m_Id.m_Hash` inside the `E_ST_DECORATOR`
//! branch) whenever its `id` option is absent or non-integer — REDESIGN
//! FLAGS calls this out, so here each branch reads its own node's id.
use std::fmt::Write as _;

use btc_ir::{Node, NodeKind};

use crate::options::TreeOptions;

/// Render the `-h` header for `tree`, consulting `options` for the
/// surrounding header/footer text and symbol prefix.
pub fn emit_header(tree: &Node, options: &TreeOptions) -> String {
    let prefix = options.get("ctc_h_symbol_prefix").and_then(|v| v.as_str()).unwrap_or("");
    let mut out = String::new();

    if let Some(header) = options.get("ctc_h_header").and_then(|v| v.as_str()) {
        let _ = writeln!(out, "{header}\n");
    }

    let mut symbols = Vec::new();
    collect_symbols(tree, &mut symbols);
    for (name, id) in symbols {
        let symbol = format!("{prefix}{name}");
        let _ = writeln!(out, "const unsigned int {symbol:<60} = {id:#010x};");
    }

    if let Some(footer) = options.get("ctc_h_footer").and_then(|v| v.as_str()) {
        let _ = writeln!(out, "\n{footer}");
    }

    out
}

fn collect_symbols(node: &Node, out: &mut Vec<(String, u32)>) {
    match &node.kind {
        NodeKind::Action { .. } => out.push((node.name.clone(), node.id.0)),
        NodeKind::Decorator(_) => out.push((node.name.clone(), node.id.0)),
        _ => {}
    }
    for child in &node.children {
        collect_symbols(child, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::OptionValue;
    use btc_ir::{DecoratorPredicate, NodeId};

    #[test]
    fn collects_action_and_decorator_symbols_with_their_own_ids() {
        let predicate = DecoratorPredicate {
            predicate_id: NodeId::from_name("is-alive"),
            invert: false,
        };
        let tree = Node::new("root", NodeKind::Sequence).with_children([
            Node::new(
                "shoot",
                NodeKind::Action {
                    callback_id: NodeId::from_name("shoot"),
                },
            ),
            Node::new("guard", NodeKind::Decorator(predicate)),
        ]);
        let options = TreeOptions::new();
        let header = emit_header(&tree, &options);
        assert!(header.contains("shoot"));
        assert!(header.contains("guard"));
        assert!(header.contains(&format!("{:#010x}", NodeId::from_name("guard").0)));
    }

    #[test]
    fn header_and_footer_bracket_the_symbol_list() {
        let tree = Node::new(
            "shoot",
            NodeKind::Action {
                callback_id: NodeId::from_name("shoot"),
            },
        );
        let mut options = TreeOptions::new();
        options.set("ctc_h_header", OptionValue::Str("// top".into()));
        options.set("ctc_h_footer", OptionValue::Str("// bottom".into()));
        let header = emit_header(&tree, &options);
        assert!(header.starts_with("// top"));
        assert!(header.trim_end().ends_with("// bottom"));
    }
}
