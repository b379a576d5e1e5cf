//! Tree-level options, looked up by hashed name.
//!
//! The original compiler stores per-tree key/value options as a generic
//! `Parameter` list and looks them up with `hashlittle(name)`
//! (`main.cpp`'s `hashlittle("debug_info")`, `hashlittle("ctc_h_header")`,
//! etc.). This crate keeps the same hashed-lookup shape but uses
//! `crc32fast`, matching [`btc_ir::NodeId`].

use rustc_hash::FxHashMap;

/// A tree-level option's value, as declared by the (out-of-scope) front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    /// e.g. `debug_info`, `force_asm`.
    Bool(bool),
    /// Reserved for future integer-valued options; unused by the options
    /// this crate currently reads.
    Int(i64),
    /// e.g. `ctc_h_header`, `ctc_h_footer`, `ctc_h_symbol_prefix`.
    Str(String),
}

impl OptionValue {
    /// Interpret this value as a boolean, `false` if it isn't one.
    pub fn as_bool(&self) -> bool {
        matches!(self, OptionValue::Bool(true))
    }

    /// Interpret this value as a string slice, if it is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// Hashed-name option table attached to a compiled tree.
#[derive(Debug, Clone, Default)]
pub struct TreeOptions {
    entries: FxHashMap<u32, OptionValue>,
}

impl TreeOptions {
    /// An empty option table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an option by name; the name is hashed immediately, matching
    /// `NodeId::from_name`'s hash so a header-generator bug like the
    /// original's can't resurface through a second hash function.
    pub fn set(&mut self, name: &str, value: OptionValue) {
        self.entries.insert(crc32fast::hash(name.as_bytes()), value);
    }

    /// Look up an option by name.
    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.entries.get(&crc32fast::hash(name.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_round_trips() {
        let mut opts = TreeOptions::new();
        opts.set("debug_info", OptionValue::Bool(true));
        assert_eq!(opts.get("debug_info"), Some(&OptionValue::Bool(true)));
        assert_eq!(opts.get("force_asm"), None);
    }
}
