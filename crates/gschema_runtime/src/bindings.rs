//! Evaluation of compiled wiring references.
//!
//! The compiler turns `@r`, `@f`, `@t`, `@v` and `@scalar` strings into
//! [`CallableRef`]s. At assembly time [`Bindings`] maps each reference to the
//! host value it names: a class registered for construction, a static method,
//! or a member of the service locator.

use crate::error::{RuntimeError, RuntimeResult};
use crate::resolver::{FieldResolverFn, ResolverMapProducer, TypeResolverFn, ValueFn};
use gschema_descriptor::CallableRef;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// A host value a wiring reference can evaluate to.
#[derive(Clone)]
pub enum Binding {
    Resolver(FieldResolverFn),
    ResolverMap(ResolverMapProducer),
    TypeResolver(TypeResolverFn),
    Value(ValueFn),
}

impl Binding {
    #[must_use]
    pub const fn shape(&self) -> &'static str {
        match self {
            Self::Resolver(_) => "field resolver",
            Self::ResolverMap(_) => "resolver map",
            Self::TypeResolver(_) => "type resolver",
            Self::Value(_) => "value function",
        }
    }
}

impl std::fmt::Debug for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Binding({})", self.shape())
    }
}

/// The dependency container reachable through the locator token.
pub trait ServiceLocator: Send + Sync {
    fn service(&self, name: &str) -> Option<Binding>;
}

/// A locator backed by a plain map.
#[derive(Default, Clone)]
pub struct StaticLocator {
    services: FxHashMap<String, Binding>,
}

impl StaticLocator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_service(mut self, name: impl Into<String>, binding: Binding) -> Self {
        self.services.insert(name.into(), binding);
        self
    }
}

impl ServiceLocator for StaticLocator {
    fn service(&self, name: &str) -> Option<Binding> {
        self.services.get(name).cloned()
    }
}

/// Catalog of everything wiring references may name.
#[derive(Default, Clone)]
pub struct Bindings {
    constructors: FxHashMap<String, Binding>,
    methods: FxHashMap<(String, String), Binding>,
    locator: Option<Arc<dyn ServiceLocator>>,
}

impl Bindings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `Class::class`.
    #[must_use]
    pub fn with_constructor(mut self, class: impl Into<String>, binding: Binding) -> Self {
        self.constructors.insert(class.into(), binding);
        self
    }

    /// Binds `Class::method`.
    #[must_use]
    pub fn with_static(mut self, class: impl Into<String>, method: impl Into<String>, binding: Binding) -> Self {
        self.methods.insert((class.into(), method.into()), binding);
        self
    }

    /// Binds the three conversions a `@scalar` class is expected to provide.
    #[must_use]
    pub fn with_scalar_class(self, class: &str, serialize: ValueFn, parse_value: ValueFn, parse_literal: ValueFn) -> Self {
        self.with_static(class, "serialize", Binding::Value(serialize))
            .with_static(class, "parseValue", Binding::Value(parse_value))
            .with_static(class, "parseLiteral", Binding::Value(parse_literal))
    }

    #[must_use]
    pub fn with_locator(mut self, locator: Arc<dyn ServiceLocator>) -> Self {
        self.locator = Some(locator);
        self
    }

    pub fn resolve(&self, reference: &CallableRef) -> RuntimeResult<Binding> {
        let found = match reference {
            CallableRef::Service { name } => self.locator.as_ref().and_then(|l| l.service(name)),
            CallableRef::Constructor { class } => self.constructors.get(class).cloned(),
            CallableRef::StaticMethod { class, method } => {
                self.methods.get(&(class.clone(), method.clone())).cloned()
            }
        };
        found.ok_or_else(|| RuntimeError::UnresolvedBinding {
            reference: reference.to_string(),
        })
    }

    pub fn resolver(&self, reference: &CallableRef) -> RuntimeResult<FieldResolverFn> {
        match self.resolve(reference)? {
            Binding::Resolver(resolver) => Ok(resolver),
            other => Err(mismatch(reference, "field resolver", &other)),
        }
    }

    pub fn resolver_map(&self, reference: &CallableRef) -> RuntimeResult<ResolverMapProducer> {
        match self.resolve(reference)? {
            Binding::ResolverMap(producer) => Ok(producer),
            other => Err(mismatch(reference, "resolver map", &other)),
        }
    }

    pub fn type_resolver(&self, reference: &CallableRef) -> RuntimeResult<TypeResolverFn> {
        match self.resolve(reference)? {
            Binding::TypeResolver(resolver) => Ok(resolver),
            other => Err(mismatch(reference, "type resolver", &other)),
        }
    }

    pub fn value_fn(&self, reference: &CallableRef) -> RuntimeResult<ValueFn> {
        match self.resolve(reference)? {
            Binding::Value(f) => Ok(f),
            other => Err(mismatch(reference, "value function", &other)),
        }
    }
}

fn mismatch(reference: &CallableRef, expected: &'static str, found: &Binding) -> RuntimeError {
    RuntimeError::BindingMismatch {
        reference: reference.to_string(),
        expected,
        found: found.shape(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{constant, ResolverMap};
    use serde_json::json;

    #[test]
    fn references_resolve_by_kind() {
        let locator = StaticLocator::new().with_service("users", Binding::Resolver(constant(json!("svc"))));
        let bindings = Bindings::new()
            .with_constructor("Users\\Map", Binding::ResolverMap(Arc::new(ResolverMap::new)))
            .with_static("Users\\Resolver", "find", Binding::Resolver(constant(json!("static"))))
            .with_locator(Arc::new(locator));

        assert!(bindings.resolver(&CallableRef::service("users")).is_ok());
        assert!(bindings.resolver(&CallableRef::static_method("Users\\Resolver", "find")).is_ok());
        assert!(bindings.resolver_map(&CallableRef::constructor("Users\\Map")).is_ok());
    }

    #[test]
    fn failures_name_the_reference() {
        let bindings = Bindings::new().with_static("A", "b", Binding::Resolver(constant(json!(1))));
        assert_eq!(
            bindings.resolve(&CallableRef::service("mailer")).unwrap_err(),
            RuntimeError::UnresolvedBinding {
                reference: "service `mailer`".into()
            }
        );
        assert_eq!(
            bindings.type_resolver(&CallableRef::static_method("A", "b")).err(),
            Some(RuntimeError::BindingMismatch {
                reference: "`A::b`".into(),
                expected: "type resolver",
                found: "field resolver",
            })
        );
    }
}
