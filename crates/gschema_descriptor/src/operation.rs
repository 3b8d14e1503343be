//! Persisted operation records emitted by the operation compiler.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Query,
    Mutation,
}

impl OperationKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
        }
    }

    /// Prefix of generated constant names.
    #[must_use]
    pub const fn constant_prefix(self) -> &'static str {
        match self {
            Self::Query => "QUERY_",
            Self::Mutation => "MUTATION_",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A compiled operation: printed body with inlined fragments and its hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationRecord {
    pub kind: OperationKind,
    pub operation_name: String,
    pub constant_name: String,
    pub hash: String,
    /// Printed body. `hash` covers its whitespace-normalized form.
    pub body: String,
    pub origin_file: String,
    pub origin_line: u32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub module: String,
}

/// All operations routed to one destination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationRegistry {
    pub destination: String,
    pub operations: Vec<OperationRecord>,
    /// Operation name to hash. A query and a mutation sharing a name map to
    /// the one pushed last.
    pub hashes: IndexMap<String, String>,
}

impl OperationRegistry {
    pub fn new(destination: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            operations: Vec::new(),
            hashes: IndexMap::new(),
        }
    }

    pub fn push(&mut self, record: OperationRecord) {
        self.hashes
            .insert(record.operation_name.clone(), record.hash.clone());
        self.operations.push(record);
    }

    #[must_use]
    pub fn get(&self, hash: &str) -> Option<&OperationRecord> {
        self.operations.iter().find(|op| op.hash == hash)
    }

    #[must_use]
    pub fn hash_for(&self, operation_name: &str) -> Option<&str> {
        self.hashes.get(operation_name).map(String::as_str)
    }

    /// Generated constant name to hash.
    #[must_use]
    pub fn constants(&self) -> IndexMap<&str, &str> {
        self.operations
            .iter()
            .map(|op| (op.constant_name.as_str(), op.hash.as_str()))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: OperationKind, name: &str, hash: &str) -> OperationRecord {
        OperationRecord {
            kind,
            operation_name: name.into(),
            constant_name: format!("{}{}", kind.constant_prefix(), name.to_uppercase()),
            hash: hash.into(),
            body: format!("{kind} {name} {{\n  a\n}}"),
            origin_file: "src/users/gql.ts".into(),
            origin_line: 3,
            module: "users".into(),
        }
    }

    #[test]
    fn side_maps_follow_push_order() {
        let mut registry = OperationRegistry::new("web");
        registry.push(record(OperationKind::Query, "Me", "aa"));
        registry.push(record(OperationKind::Mutation, "Save", "bb"));

        assert_eq!(registry.hash_for("Save"), Some("bb"));
        assert_eq!(registry.get("aa").map(|r| r.kind), Some(OperationKind::Query));
        let constants: Vec<_> = registry.constants().into_iter().collect();
        assert_eq!(constants, vec![("QUERY_ME", "aa"), ("MUTATION_SAVE", "bb")]);
    }

    #[test]
    fn json_round_trip() {
        let mut registry = OperationRegistry::new("default");
        registry.push(record(OperationKind::Query, "Me", "aa"));
        let json = registry.to_json().unwrap();
        assert_eq!(OperationRegistry::from_json(&json).unwrap(), registry);
    }
}
