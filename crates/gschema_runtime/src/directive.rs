//! Directive middleware registry.
//!
//! A handler receives the directive's static arguments, the request context
//! and a [`Next`] continuation. Calling `next` runs the rest of the chain and
//! finally the field's base resolver; not calling it short-circuits.

use crate::context::RequestContext;
use crate::error::{RuntimeError, RuntimeResult};
use crate::resolver::{resolver_fn, FieldResolverFn, ResolverResult};
use gschema_descriptor::DirectiveInvocation;
use indexmap::IndexMap;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Static arguments of a directive invocation.
pub type DirectiveArgs = IndexMap<String, Value>;

/// Continuation into the remaining chain links.
pub struct Next<'a> {
    inner: &'a (dyn Fn() -> ResolverResult + 'a),
}

impl<'a> Next<'a> {
    pub fn new(inner: &'a (dyn Fn() -> ResolverResult + 'a)) -> Self {
        Self { inner }
    }

    /// Runs the remaining chain.
    pub fn run(&self) -> ResolverResult {
        (self.inner)()
    }
}

pub trait DirectiveHandler: Send + Sync {
    fn handle(&self, args: &DirectiveArgs, ctx: &RequestContext, next: Next<'_>) -> ResolverResult;
}

impl<F> DirectiveHandler for F
where
    F: Fn(&DirectiveArgs, &RequestContext, Next<'_>) -> ResolverResult + Send + Sync,
{
    fn handle(&self, args: &DirectiveArgs, ctx: &RequestContext, next: Next<'_>) -> ResolverResult {
        self(args, ctx, next)
    }
}

type HandlerFactory = Box<dyn Fn() -> Arc<dyn DirectiveHandler> + Send + Sync>;

/// Host catalog of handler classes registrable by name.
#[derive(Default)]
pub struct HandlerCatalog {
    classes: FxHashMap<String, HandlerFactory>,
}

impl HandlerCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_class<F>(mut self, class: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Arc<dyn DirectiveHandler> + Send + Sync + 'static,
    {
        self.classes.insert(class.into(), Box::new(factory));
        self
    }

    fn instantiate(&self, class: &str) -> Option<Arc<dyn DirectiveHandler>> {
        self.classes.get(class).map(|factory| factory())
    }
}

/// What [`DirectiveRegistry::register`] accepts.
pub enum HandlerSource {
    Callable(Arc<dyn DirectiveHandler>),
    /// Instantiated once through the registry's [`HandlerCatalog`].
    Class(String),
}

impl HandlerSource {
    pub fn callable<F>(handler: F) -> Self
    where
        F: Fn(&DirectiveArgs, &RequestContext, Next<'_>) -> ResolverResult + Send + Sync + 'static,
    {
        Self::Callable(Arc::new(handler))
    }
}

/// Process-wide table of directive handlers.
///
/// Handlers are registered during startup and looked up when resolver chains
/// are built; share the registry behind an `Arc`.
#[derive(Default)]
pub struct DirectiveRegistry {
    handlers: RwLock<FxHashMap<String, Arc<dyn DirectiveHandler>>>,
    catalog: HandlerCatalog,
}

impl DirectiveRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_catalog(catalog: HandlerCatalog) -> Self {
        Self {
            handlers: RwLock::default(),
            catalog,
        }
    }

    /// Registers `source` under `name`, replacing an earlier registration.
    pub fn register(&self, name: &str, source: HandlerSource) -> RuntimeResult<()> {
        if name.is_empty() {
            return Err(RuntimeError::InvalidDirectiveSetup {
                name: String::new(),
                reason: "directive name is empty".into(),
            });
        }
        let handler = match source {
            HandlerSource::Callable(handler) => handler,
            HandlerSource::Class(class) => {
                self.catalog
                    .instantiate(&class)
                    .ok_or_else(|| RuntimeError::InvalidDirectiveSetup {
                        name: name.to_string(),
                        reason: format!("unknown handler class `{class}`"),
                    })?
            }
        };
        debug!(directive = name, "registered directive handler");
        self.handlers.write().insert(name.to_string(), handler);
        Ok(())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.read().contains_key(name)
    }

    fn handler(&self, name: &str) -> RuntimeResult<Arc<dyn DirectiveHandler>> {
        self.handlers
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::UnknownDirective(name.to_string()))
    }

    /// Wraps `base` in one layer per directive; the first directive is the
    /// outermost layer.
    pub fn wrap_directives(
        &self,
        directives: &[DirectiveInvocation],
        base: FieldResolverFn,
    ) -> RuntimeResult<FieldResolverFn> {
        let layers = directives
            .iter()
            .map(|d| Ok((self.handler(&d.name)?, d.args.clone())))
            .collect::<RuntimeResult<Vec<_>>>()?;
        Ok(layers
            .into_iter()
            .rev()
            .fold(base, |inner, (handler, args)| layer(handler, args, inner)))
    }

    /// Wraps `base` in exactly one layer.
    pub fn wrap_single(
        &self,
        name: &str,
        args: DirectiveArgs,
        base: FieldResolverFn,
    ) -> RuntimeResult<FieldResolverFn> {
        Ok(layer(self.handler(name)?, args, base))
    }
}

fn layer(handler: Arc<dyn DirectiveHandler>, args: DirectiveArgs, inner: FieldResolverFn) -> FieldResolverFn {
    resolver_fn(move |parent, field_args, ctx, info| {
        let next = || inner(parent, field_args, ctx, info);
        handler.handle(&args, ctx, Next::new(&next))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{ResolveInfo, ResolverArgs};
    use parking_lot::Mutex;
    use serde_json::json;

    fn tracing_handler(log: Arc<Mutex<Vec<String>>>, label: &'static str) -> HandlerSource {
        HandlerSource::callable(move |_, _, next| {
            log.lock().push(label.to_string());
            next.run()
        })
    }

    fn invoke(resolver: &FieldResolverFn) -> ResolverResult {
        resolver(
            &Value::Null,
            &ResolverArgs::new(),
            &RequestContext::new(),
            &ResolveInfo::new("f", "T"),
        )
    }

    #[test]
    fn earlier_directives_are_outer_layers() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = DirectiveRegistry::new();
        registry.register("d1", tracing_handler(log.clone(), "d1")).unwrap();
        registry.register("d2", tracing_handler(log.clone(), "d2")).unwrap();

        let base_log = log.clone();
        let base = resolver_fn(move |_, _, _, _| {
            base_log.lock().push("base".into());
            Ok(json!(1))
        });
        let wrapped = registry
            .wrap_directives(&[DirectiveInvocation::new("d1"), DirectiveInvocation::new("d2")], base)
            .unwrap();

        assert_eq!(invoke(&wrapped), Ok(json!(1)));
        assert_eq!(*log.lock(), ["d1", "d2", "base"]);
    }

    #[test]
    fn handler_can_short_circuit() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = DirectiveRegistry::new();
        registry
            .register(
                "deny",
                HandlerSource::callable(|_, _, _| Ok(json!("denied"))),
            )
            .unwrap();
        registry.register("d2", tracing_handler(log.clone(), "d2")).unwrap();

        let base_log = log.clone();
        let base = resolver_fn(move |_, _, _, _| {
            base_log.lock().push("base".into());
            Ok(json!(1))
        });
        let wrapped = registry
            .wrap_directives(&[DirectiveInvocation::new("deny"), DirectiveInvocation::new("d2")], base)
            .unwrap();

        assert_eq!(invoke(&wrapped), Ok(json!("denied")));
        assert!(log.lock().is_empty());
    }

    #[test]
    fn static_args_reach_handler() {
        let registry = DirectiveRegistry::new();
        registry
            .register(
                "upper",
                HandlerSource::callable(|args, _, next| {
                    let value = next.run()?;
                    let suffix = args.get("suffix").and_then(Value::as_str).unwrap_or_default();
                    Ok(json!(format!("{}{suffix}", value.as_str().unwrap_or_default().to_uppercase())))
                }),
            )
            .unwrap();
        let args: DirectiveArgs = [("suffix".to_string(), json!("!"))].into_iter().collect();
        let wrapped = registry
            .wrap_single("upper", args, resolver_fn(|_, _, _, _| Ok(json!("hi"))))
            .unwrap();
        assert_eq!(invoke(&wrapped), Ok(json!("HI!")));
    }

    struct PassThrough;

    impl DirectiveHandler for PassThrough {
        fn handle(&self, _: &DirectiveArgs, _: &RequestContext, next: Next<'_>) -> ResolverResult {
            next.run()
        }
    }

    #[test]
    fn setup_errors() {
        let registry = DirectiveRegistry::with_catalog(
            HandlerCatalog::new().with_class("Auth", || Arc::new(PassThrough) as Arc<dyn DirectiveHandler>),
        );
        assert!(registry.register("auth", HandlerSource::Class("Auth".into())).is_ok());
        assert!(registry.contains("auth"));
        assert!(matches!(
            registry.register("cache", HandlerSource::Class("Cache".into())),
            Err(RuntimeError::InvalidDirectiveSetup { .. })
        ));
        assert!(registry.register("", HandlerSource::Class("Auth".into())).is_err());

        let base = resolver_fn(|_, _, _, _| Ok(Value::Null));
        assert_eq!(
            registry.wrap_directives(&[DirectiveInvocation::new("missing")], base).err(),
            Some(RuntimeError::UnknownDirective("missing".into()))
        );
    }
}
