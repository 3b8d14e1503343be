//! Request-scoped context handed to resolvers and directive handlers.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Request-scoped data, e.g. the authenticated viewer.
    pub data: HashMap<String, Value>,
    /// Variables of the executing operation.
    pub variables: HashMap<String, Value>,
}

impl RequestContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_variables(variables: HashMap<String, Value>) -> Self {
        Self {
            data: HashMap::new(),
            variables,
        }
    }

    /// Stores `value` under `key`; values that fail to serialize are dropped.
    pub fn set<T: Serialize>(&mut self, key: impl Into<String>, value: T) {
        if let Ok(v) = serde_json::to_value(value) {
            self.data.insert(key.into(), v);
        }
    }

    pub fn get<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        self.data
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_round_trip() {
        let mut ctx = RequestContext::new();
        ctx.set("viewer", vec!["admin", "editor"]);
        assert_eq!(ctx.get::<Vec<String>>("viewer"), Some(vec!["admin".into(), "editor".into()]));
        assert_eq!(ctx.get::<u32>("viewer"), None);
        assert_eq!(ctx.get::<u32>("missing"), None);
    }
}
