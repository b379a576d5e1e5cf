//! Minimal JSON tree description.
//!
//! The real front end — calltree's lex/yacc grammar, include resolution,
//! symbol tables — is out of scope for this compiler (`spec.md` §1). This
//! module is a stand-in just substantial enough to drive `-i`/`-o`/`-a`/`-h`
//! end-to-end: a `serde_json`-deserializable tree plus a flat option map,
//! converted into [`btc_ir::Node`].

use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

use btc_codegen::{OptionValue, TreeOptions};
use btc_ir::{DecoratorPredicate, Node, NodeId, NodeKind};

/// Errors converting a parsed [`TreeSource`] into IR.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The JSON document was not valid `TreeSource` shape.
    #[error("malformed tree description: {0}")]
    Parse(#[from] serde_json::Error),
    /// A decorator node spec had no predicate name.
    #[error("node {0:?} is a decorator but declares no predicate")]
    MissingPredicate(String),
    /// An action node spec had no callback name.
    #[error("node {0:?} is an action but declares no callback")]
    MissingCallback(String),
}

/// The declared shape of one node, as written in the JSON tree description.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeSpec {
    /// Sequence composite.
    Sequence {
        /// Declared name, hashed into the node's [`NodeId`].
        name: String,
        /// Ordered children.
        #[serde(default)]
        children: Vec<NodeSpec>,
    },
    /// Selector composite.
    Selector {
        /// Declared name.
        name: String,
        /// Ordered children.
        #[serde(default)]
        children: Vec<NodeSpec>,
    },
    /// Parallel composite.
    Parallel {
        /// Declared name.
        name: String,
        /// Ordered children.
        #[serde(default)]
        children: Vec<NodeSpec>,
    },
    /// Dynamic selector — declared but unsupported by the core generator.
    DynSelector {
        /// Declared name.
        name: String,
        /// Ordered children.
        #[serde(default)]
        children: Vec<NodeSpec>,
    },
    /// Predicate-gated single-child wrapper — declared but unsupported by
    /// the core generator.
    Decorator {
        /// Declared name.
        name: String,
        /// Host-resolved predicate name.
        predicate: Option<String>,
        /// Whether the predicate's result is inverted.
        #[serde(default)]
        invert: bool,
        /// The single wrapped child.
        child: Box<NodeSpec>,
    },
    /// Host callback dispatch leaf.
    Action {
        /// Declared name.
        name: String,
        /// Host-resolved callback name.
        callback: Option<String>,
    },
    /// Constant-success leaf.
    Succeed {
        /// Declared name.
        name: String,
    },
    /// Constant-failure leaf.
    Fail {
        /// Declared name.
        name: String,
    },
    /// Undetermined-semantics leaf — declared but unsupported by the core
    /// generator.
    Work {
        /// Declared name.
        name: String,
    },
    /// A node the front end failed to resolve; the generator refuses to
    /// emit code for it.
    Undeclared {
        /// Declared name.
        name: String,
    },
}

/// A parsed tree description: its root node plus tree-level options.
#[derive(Debug, Deserialize)]
pub struct TreeSource {
    /// The tree's root node.
    pub root: NodeSpec,
    /// Tree-level options (`debug_info`, `ctc_h_header`, ...), keyed by
    /// declared name exactly as the CLI looks them up.
    #[serde(default)]
    pub options: HashMap<String, OptionSpec>,
}

/// One option's JSON-representable value.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OptionSpec {
    /// Boolean option, e.g. `debug_info`.
    Bool(bool),
    /// Integer option.
    Int(i64),
    /// String option, e.g. `ctc_h_header`.
    Str(String),
}

impl TreeSource {
    /// Parse a tree description from JSON text.
    pub fn from_json(text: &str) -> Result<Self, SourceError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Convert this source into IR, and its options into a [`TreeOptions`].
    pub fn into_ir(self) -> Result<(Node, TreeOptions), SourceError> {
        let root = convert(self.root)?;
        let mut options = TreeOptions::new();
        for (name, value) in self.options {
            let value = match value {
                OptionSpec::Bool(b) => OptionValue::Bool(b),
                OptionSpec::Int(i) => OptionValue::Int(i),
                OptionSpec::Str(s) => OptionValue::Str(s),
            };
            options.set(&name, value);
        }
        Ok((root, options))
    }
}

fn convert(spec: NodeSpec) -> Result<Node, SourceError> {
    Ok(match spec {
        NodeSpec::Sequence { name, children } => {
            Node::new(&name, NodeKind::Sequence).with_children(convert_all(children)?)
        }
        NodeSpec::Selector { name, children } => {
            Node::new(&name, NodeKind::Selector).with_children(convert_all(children)?)
        }
        NodeSpec::Parallel { name, children } => {
            Node::new(&name, NodeKind::Parallel).with_children(convert_all(children)?)
        }
        NodeSpec::DynSelector { name, children } => {
            Node::new(&name, NodeKind::DynSelector).with_children(convert_all(children)?)
        }
        NodeSpec::Decorator {
            name,
            predicate,
            invert,
            child,
        } => {
            let predicate_name = predicate.ok_or_else(|| SourceError::MissingPredicate(name.clone()))?;
            let predicate = DecoratorPredicate {
                predicate_id: NodeId::from_name(&predicate_name),
                invert,
            };
            Node::new(&name, NodeKind::Decorator(predicate)).with_children([convert(*child)?])
        }
        NodeSpec::Action { name, callback } => {
            let callback_name = callback.ok_or_else(|| SourceError::MissingCallback(name.clone()))?;
            Node::new(
                &name,
                NodeKind::Action {
                    callback_id: NodeId::from_name(&callback_name),
                },
            )
        }
        NodeSpec::Succeed { name } => Node::new(&name, NodeKind::Succeed),
        NodeSpec::Fail { name } => Node::new(&name, NodeKind::Fail),
        NodeSpec::Work { name } => Node::new(&name, NodeKind::Work),
        NodeSpec::Undeclared { name } => Node::undeclared(&name, NodeKind::Succeed),
    })
}

fn convert_all(specs: Vec<NodeSpec>) -> Result<Vec<Node>, SourceError> {
    specs.into_iter().map(convert).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_sequence_of_actions() {
        let json = r#"{
            "root": {
                "kind": "sequence",
                "name": "root",
                "children": [
                    { "kind": "action", "name": "shoot", "callback": "shoot" },
                    { "kind": "succeed", "name": "done" }
                ]
            },
            "options": { "debug_info": true }
        }"#;
        let source = TreeSource::from_json(json).unwrap();
        let (root, options) = source.into_ir().unwrap();
        assert!(matches!(root.kind, NodeKind::Sequence));
        assert_eq!(root.children.len(), 2);
        assert_eq!(options.get("debug_info"), Some(&OptionValue::Bool(true)));
    }

    #[test]
    fn decorator_without_a_predicate_is_rejected() {
        let json = r#"{
            "root": {
                "kind": "decorator",
                "name": "guard",
                "child": { "kind": "succeed", "name": "leaf" }
            }
        }"#;
        let source = TreeSource::from_json(json).unwrap();
        assert!(matches!(
            source.into_ir(),
            Err(SourceError::MissingPredicate(_))
        ));
    }
}
