//! Resolver function shapes.

use crate::context::RequestContext;
use crate::error::ResolverError;
use gschema_descriptor::DirectiveInvocation;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Arguments of a field invocation.
#[derive(Debug, Clone, Default)]
pub struct ResolverArgs {
    args: HashMap<String, Value>,
}

impl ResolverArgs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, Value)>) -> Self {
        Self {
            args: pairs.into_iter().collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.args.get(name)
    }

    pub fn get_as<T: serde::de::DeserializeOwned>(&self, name: &str) -> Option<T> {
        self.args
            .get(name)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn require<T: serde::de::DeserializeOwned>(&self, name: &str) -> Result<T, ResolverError> {
        self.args
            .get(name)
            .ok_or_else(|| ResolverError::MissingArgument(name.to_string()))
            .and_then(|v| {
                serde_json::from_value(v.clone())
                    .map_err(|e| ResolverError::ArgumentParse(name.to_string(), e.to_string()))
            })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.args.insert(name.into(), value);
    }
}

/// Metadata about the field being resolved.
#[derive(Debug, Clone)]
pub struct ResolveInfo {
    pub field_name: String,
    pub parent_type: String,
    /// Printed return type, e.g. `[Post!]!`.
    pub return_type: String,
    /// Generic directives declared on the field, in declaration order.
    pub directives: Vec<DirectiveInvocation>,
}

impl ResolveInfo {
    pub fn new(field_name: impl Into<String>, parent_type: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            parent_type: parent_type.into(),
            return_type: String::new(),
            directives: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_return_type(mut self, ty: impl Into<String>) -> Self {
        self.return_type = ty.into();
        self
    }

    #[must_use]
    pub fn with_directives(mut self, directives: Vec<DirectiveInvocation>) -> Self {
        self.directives = directives;
        self
    }
}

pub type ResolverResult = Result<Value, ResolverError>;

/// A field resolver: `(parent, args, ctx, info) -> value`.
pub type FieldResolverFn =
    Arc<dyn Fn(&Value, &ResolverArgs, &RequestContext, &ResolveInfo) -> ResolverResult + Send + Sync>;

/// Field name to base resolver, as produced by a type's catch-all resolver.
pub type ResolverMap = HashMap<String, FieldResolverFn>;

/// Produces a [`ResolverMap`]; invoked at most once per type node.
pub type ResolverMapProducer = Arc<dyn Fn() -> ResolverMap + Send + Sync>;

/// Picks the concrete type name of an interface or union value.
pub type TypeResolverFn = Arc<dyn Fn(&Value, &RequestContext) -> Option<String> + Send + Sync>;

/// Scalar conversion or input parse hook.
pub type ValueFn = Arc<dyn Fn(&Value) -> ResolverResult + Send + Sync>;

/// Wraps a closure as a [`FieldResolverFn`].
pub fn resolver_fn<F>(f: F) -> FieldResolverFn
where
    F: Fn(&Value, &ResolverArgs, &RequestContext, &ResolveInfo) -> ResolverResult + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A resolver returning a fixed value.
pub fn constant(value: Value) -> FieldResolverFn {
    resolver_fn(move |_, _, _, _| Ok(value.clone()))
}

/// A resolver reading the field's own name from an object parent.
pub fn property() -> FieldResolverFn {
    resolver_fn(|parent, _, _, info| Ok(parent.get(&info.field_name).cloned().unwrap_or(Value::Null)))
}
