//! Runtime schema configuration.

use serde::{Deserialize, Serialize};

/// Names of the root operation types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    pub query_type: String,
    /// `None` disables mutations even when a `Mutation` type is described.
    pub mutation_type: Option<String>,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            query_type: "Query".into(),
            mutation_type: Some("Mutation".into()),
        }
    }
}
