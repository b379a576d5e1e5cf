//! The BT node type and its kind enumeration

use std::fmt;

/// A stable node identifier, produced by hashing the node's declared name.
///
/// The original calltree compiler used `lookup3`/`hashlittle` for this
/// (`original_source/apps/ctc/source/main.cpp`'s `hashlittle("debug_info")`
/// hashes option names the same way); this crate uses `crc32fast` instead,
/// matching the hash `btc-bytecode::Program` already pulls in for its own
/// checksums, so the workspace needs only one hashing dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Hash a declared node name into a stable id.
    pub fn from_name(name: &str) -> Self {
        Self(crc32fast::hash(name.as_bytes()))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

/// Parameters attached to a [`NodeKind::Decorator`].
///
/// The predicate itself (a named, host-registered condition — "is this
/// blackboard key set", "is the timer expired", etc.) is out of scope for
/// this compiler the same way Action callback bodies are: both are resolved
/// and dispatched by the host VM at runtime, by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecoratorPredicate {
    /// Host-resolved predicate id, hashed from its declared name the same
    /// way node ids are.
    pub predicate_id: NodeId,
    /// Whether the predicate's result should be inverted before gating the
    /// wrapped child.
    pub invert: bool,
}

/// The kind of control-flow or leaf behavior a node implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Ticks children in order; fails or suspends on the first child that
    /// does, succeeds only if every child succeeds.
    Sequence,
    /// Ticks children in order; succeeds on the first child that does,
    /// fails only if every child fails.
    Selector,
    /// Ticks every child every tick; succeeds once all children have
    /// succeeded (across ticks), fails immediately if any child fails.
    Parallel,
    /// Re-evaluates children in priority order from the start every tick,
    /// unlike Selector's sticky re-entry. Declared as an extension point;
    /// the core generator does not implement its emission (`spec.md` §4.4.4).
    DynSelector,
    /// Wraps a single child with a predicate gate. Declared as an extension
    /// point; the core generator does not implement its emission — see
    /// `DESIGN.md` for why this is the literal unsupported-kind example in
    /// `spec.md` §8 Scenario 6 even though the kind itself is well-defined.
    Decorator(DecoratorPredicate),
    /// A leaf that dispatches a host callback, identified by `callback_id`,
    /// once per tick. The host VM is the sole writer of the return register
    /// after the dispatch instruction.
    Action {
        /// Host-resolved callback id, hashed from its declared name.
        callback_id: NodeId,
    },
    /// A leaf that always succeeds.
    Succeed,
    /// A leaf that always fails.
    Fail,
    /// A leaf whose semantics are, per `spec.md` §9's Open Questions, not
    /// yet determined. The core generator does not implement its emission.
    Work,
}

/// A node in the behavior tree IR, as handed to the code generator by the
/// (external, out-of-scope) parser.
#[derive(Debug, Clone)]
pub struct Node {
    /// Stable id, hashed from the node's declared name.
    pub id: NodeId,
    /// The declared name `id` was hashed from, kept around for diagnostics
    /// and header generation (the original compiler's `NamedSymbol` keeps
    /// both the hash and the source text for the same reason).
    pub name: String,
    /// What kind of control flow or leaf behavior this node implements.
    pub kind: NodeKind,
    /// Whether this node was successfully declared by the front end. The
    /// generator refuses to emit code for a node with `declared = false`.
    pub declared: bool,
    /// Ordered children. Populated for composites (Sequence, Selector,
    /// Parallel, DynSelector) and for Decorator (exactly one child);
    /// always empty for leaves (Action, Succeed, Fail, Work).
    pub children: Vec<Node>,
    /// Optional `(start_line, end_line)` debug span, attached to debug
    /// scopes in place of a source-level debugger (`spec.md` §1 Non-goals).
    pub source_span: Option<(u32, u32)>,
}

impl Node {
    /// Construct a declared node with no children and no debug span.
    pub fn new(name: &str, kind: NodeKind) -> Self {
        Self {
            id: NodeId::from_name(name),
            name: name.to_string(),
            kind,
            declared: true,
            children: Vec::new(),
            source_span: None,
        }
    }

    /// Construct a node that the front end failed to declare — the
    /// generator will refuse to emit code for it.
    pub fn undeclared(name: &str, kind: NodeKind) -> Self {
        Self {
            declared: false,
            ..Self::new(name, kind)
        }
    }

    /// Attach children, returning `self` for chained construction.
    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children = children.into_iter().collect();
        self
    }

    /// Attach a debug span, returning `self` for chained construction.
    pub fn with_span(mut self, start_line: u32, end_line: u32) -> Self {
        self.source_span = Some((start_line, end_line));
        self
    }

    /// Whether this node kind is expected to carry children (composites and
    /// the single-child Decorator), as opposed to a leaf.
    pub fn is_composite(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Sequence
                | NodeKind::Selector
                | NodeKind::Parallel
                | NodeKind::DynSelector
                | NodeKind::Decorator(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashing_is_deterministic() {
        assert_eq!(NodeId::from_name("guard"), NodeId::from_name("guard"));
        assert_ne!(NodeId::from_name("guard"), NodeId::from_name("attack"));
    }

    #[test]
    fn undeclared_node_defaults_declared_false() {
        let n = Node::undeclared("broken", NodeKind::Succeed);
        assert!(!n.declared);
    }

    #[test]
    fn composite_classification() {
        assert!(Node::new("seq", NodeKind::Sequence).is_composite());
        assert!(!Node::new("leaf", NodeKind::Succeed).is_composite());
        let predicate = DecoratorPredicate {
            predicate_id: NodeId::from_name("is-alive"),
            invert: false,
        };
        assert!(Node::new("dec", NodeKind::Decorator(predicate)).is_composite());
    }

    #[test]
    fn with_children_builds_a_tree() {
        let tree = Node::new("root", NodeKind::Sequence).with_children([
            Node::new("a", NodeKind::Succeed),
            Node::new("b", NodeKind::Fail),
        ]);
        assert_eq!(tree.children.len(), 2);
    }
}
