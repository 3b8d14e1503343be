//! Compiler configuration.

use crate::module::ModuleLayout;
use serde::{Deserialize, Serialize};

/// Names of the directives that wire behavior instead of being forwarded
/// to the runtime middleware chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WiringDirectives {
    /// Per-field resolver (`@r`).
    pub field_resolver: String,
    /// Catch-all field resolver on an object type (`@f`).
    pub type_field_resolver: String,
    /// Scalar implementation class (`@scalar`).
    pub scalar: String,
    /// Interface/union type resolver (`@t`).
    pub type_resolver: String,
    /// Input object parse hook (`@v`).
    pub input_validator: String,
}

impl Default for WiringDirectives {
    fn default() -> Self {
        Self {
            field_resolver: "r".into(),
            type_field_resolver: "f".into(),
            scalar: "scalar".into(),
            type_resolver: "t".into(),
            input_validator: "v".into(),
        }
    }
}

impl WiringDirectives {
    /// Directives that are consumed by the compiler on fields.
    #[must_use]
    pub fn is_field_wiring(&self, name: &str) -> bool {
        name == self.field_resolver || name == self.type_field_resolver
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    pub wiring: WiringDirectives,
    /// Reference root naming the service locator (`Di->users`).
    pub locator_token: String,
    /// Method token marking a constructor reference (`Users::class`).
    pub constructor_marker: String,
    /// Interfaces allowed to omit a type resolver.
    pub type_resolver_exemptions: Vec<String>,
    /// Required prefix of every scalar implementation reference.
    pub scalar_prefix: Option<String>,
    pub module_layout: ModuleLayout,
    /// Destination of operations whose metadata names none.
    pub default_destination: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            wiring: WiringDirectives::default(),
            locator_token: "Di".into(),
            constructor_marker: "class".into(),
            type_resolver_exemptions: vec!["RecordSet".into()],
            scalar_prefix: None,
            module_layout: ModuleLayout::default(),
            default_destination: "default".into(),
        }
    }
}

impl CompilerConfig {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = CompilerConfig::from_json(
            r#"{
                "wiring": { "field_resolver": "resolve" },
                "scalar_prefix": "Scalar\\",
                "module_layout": { "kind": "nested", "root_marker": "application" }
            }"#,
        )
        .unwrap();

        assert_eq!(config.wiring.field_resolver, "resolve");
        assert_eq!(config.wiring.type_field_resolver, "f");
        assert_eq!(config.locator_token, "Di");
        assert_eq!(config.scalar_prefix.as_deref(), Some("Scalar\\"));
        assert_eq!(
            config.module_layout,
            ModuleLayout::Nested {
                root_marker: "application".into()
            }
        );
        assert_eq!(config.type_resolver_exemptions, vec!["RecordSet".to_string()]);
    }
}
