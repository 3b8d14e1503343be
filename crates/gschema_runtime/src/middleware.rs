//! Per-type field resolver chains.
//!
//! Each live type node owns one [`ResolverChain`]. The type's catch-all
//! resolver map is produced on the first field access and never again; a
//! field's resolver is wrapped in its directive layers once and the wrapped
//! resolver is what later accesses get.

use crate::bindings::Bindings;
use crate::directive::DirectiveRegistry;
use crate::error::{RuntimeError, RuntimeResult};
use crate::graph::{NodeId, TypeNode};
use crate::resolver::{FieldResolverFn, ResolverMap, ResolverMapProducer};
use gschema_descriptor::FieldDescriptor;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// Field resolvers of one type node.
///
/// A field's own `@r` reference wins over the type's resolver map. Fields
/// with directives are wrapped outermost-first, in declaration order.
pub struct ResolverChain {
    producer: Option<ResolverMapProducer>,
    base: OnceLock<ResolverMap>,
    resolvers: RwLock<FxHashMap<String, FieldResolverFn>>,
}

impl ResolverChain {
    /// `producer` builds the type-wide resolver map; `None` means every field
    /// needs its own reference.
    #[must_use]
    pub fn new(producer: Option<ResolverMapProducer>) -> Self {
        Self {
            producer,
            base: OnceLock::new(),
            resolvers: RwLock::default(),
        }
    }

    /// The resolver for `field` of `type_name`, built on first request.
    pub fn resolver(
        &self,
        type_name: &str,
        field: &FieldDescriptor,
        bindings: &Bindings,
        directives: &DirectiveRegistry,
    ) -> RuntimeResult<FieldResolverFn> {
        if let Some(resolver) = self.resolvers.read().get(&field.name) {
            return Ok(resolver.clone());
        }

        let base = match &field.resolver {
            Some(reference) => bindings.resolver(reference)?,
            None => self
                .base_map()
                .get(&field.name)
                .cloned()
                .ok_or_else(|| RuntimeError::MissingFieldResolver {
                    type_name: type_name.to_string(),
                    field: field.name.clone(),
                })?,
        };
        let resolver = if field.directives.is_empty() {
            base
        } else {
            directives.wrap_directives(&field.directives, base)?
        };

        debug!(
            type_name,
            field = %field.name,
            layers = field.directives.len(),
            "built field resolver"
        );
        Ok(self
            .resolvers
            .write()
            .entry(field.name.clone())
            .or_insert(resolver)
            .clone())
    }

    fn base_map(&self) -> &ResolverMap {
        self.base.get_or_init(|| match &self.producer {
            Some(produce) => produce(),
            None => ResolverMap::new(),
        })
    }
}

/// Resolver chains keyed by node identity.
#[derive(Default)]
pub struct ResolverChains {
    chains: RwLock<FxHashMap<NodeId, Arc<ResolverChain>>>,
}

impl ResolverChains {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The chain of `node`, created on first use.
    pub fn chain(&self, node: &TypeNode) -> Arc<ResolverChain> {
        if let Some(chain) = self.chains.read().get(&node.id()) {
            return chain.clone();
        }
        self.chains
            .write()
            .entry(node.id())
            .or_insert_with(|| Arc::new(ResolverChain::new(node.resolver_map_producer())))
            .clone()
    }

    /// Number of nodes that have a chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chains.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
