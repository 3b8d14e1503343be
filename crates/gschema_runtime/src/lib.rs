//! Runtime half of gschema.
//!
//! Loads descriptor tables produced by the compiler and assembles the live
//! schema on demand:
//! - `graph`: lazily realized, case-insensitive type graph
//! - `directive`: directive middleware registry
//! - `middleware`: per-type resolver chains
//! - `bindings`: evaluation of wiring references
//! - `persisted`: persisted operation lookup

pub mod bindings;
pub mod config;
pub mod context;
pub mod directive;
pub mod error;
pub mod graph;
pub mod middleware;
pub mod persisted;
pub mod resolver;

pub use bindings::{Binding, Bindings, ServiceLocator, StaticLocator};
pub use config::SchemaConfig;
pub use context::RequestContext;
pub use directive::{DirectiveArgs, DirectiveHandler, DirectiveRegistry, HandlerCatalog, HandlerSource, Next};
pub use error::{ResolverError, RuntimeError, RuntimeResult};
pub use graph::{NodeId, NodeKind, Schema, TypeGraph, TypeNode};
pub use middleware::{ResolverChain, ResolverChains};
pub use persisted::PersistedQueries;
pub use resolver::{
    constant, property, resolver_fn, FieldResolverFn, ResolveInfo, ResolverArgs, ResolverMap,
    ResolverMapProducer, ResolverResult, TypeResolverFn, ValueFn,
};
