//! Lazily assembled type graph.
//!
//! Types are realized on first lookup from their partial descriptors and
//! cached for the lifetime of the graph. Lookups are case-insensitive. Cross
//! references between types stay names and are resolved on traversal, so
//! realizing one type never realizes another.

use crate::bindings::Bindings;
use crate::config::SchemaConfig;
use crate::context::RequestContext;
use crate::directive::DirectiveRegistry;
use crate::error::{RuntimeError, RuntimeResult};
use crate::middleware::ResolverChains;
use crate::resolver::{
    ResolveInfo, ResolverArgs, ResolverMapProducer, ResolverResult, TypeResolverFn, ValueFn,
};
use gschema_descriptor::{
    CallableRef, DescriptorSet, DirectiveInvocation, FieldDescriptor, TypeBody, TypeDescriptor,
    TypeKind,
};
use indexmap::IndexMap;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock, OnceLock};
use tracing::{debug, info};

/// Identity of a live type node within the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

const BUILTIN_NAMES: [&str; 5] = ["Boolean", "Float", "ID", "Int", "String"];

static BUILTINS: LazyLock<Vec<Arc<TypeNode>>> = LazyLock::new(|| {
    BUILTIN_NAMES
        .iter()
        .enumerate()
        .map(|(id, name)| {
            Arc::new(TypeNode {
                id: NodeId(id),
                name: (*name).to_string(),
                description: None,
                directives: Vec::new(),
                kind: NodeKind::Builtin,
            })
        })
        .collect()
});

fn builtin(key: &str) -> Option<Arc<TypeNode>> {
    BUILTINS
        .iter()
        .find(|node| node.name.eq_ignore_ascii_case(key))
        .cloned()
}

/// Field definitions of one type, merged from all partials on first use.
pub struct LazyFields {
    type_name: String,
    partials: Vec<Vec<FieldDescriptor>>,
    merged: OnceLock<RuntimeResult<IndexMap<String, FieldDescriptor>>>,
}

impl LazyFields {
    fn new(type_name: &str, partials: Vec<Vec<FieldDescriptor>>) -> Self {
        Self {
            type_name: type_name.to_string(),
            partials,
            merged: OnceLock::new(),
        }
    }

    fn get(&self) -> RuntimeResult<&IndexMap<String, FieldDescriptor>> {
        self.merged
            .get_or_init(|| {
                let mut merged = IndexMap::new();
                for field in self.partials.iter().flatten() {
                    if merged.insert(field.name.clone(), field.clone()).is_some() {
                        return Err(RuntimeError::DuplicateField {
                            type_name: self.type_name.clone(),
                            field: field.name.clone(),
                        });
                    }
                }
                Ok(merged)
            })
            .as_ref()
            .map_err(Clone::clone)
    }
}

/// What a realized type is, with the callables bound to it.
pub enum NodeKind {
    /// `Boolean`, `Float`, `ID`, `Int` or `String`.
    Builtin,
    /// A custom scalar and its three conversion hooks.
    Scalar {
        serialize: ValueFn,
        parse_value: ValueFn,
        parse_literal: ValueFn,
    },
    /// Object type. `field_resolver` is the type-wide resolver map, if any.
    Object {
        fields: LazyFields,
        field_resolver: Option<ResolverMapProducer>,
        interfaces: Vec<String>,
    },
    /// Input object, with the optional `@v` hook applied to parsed values.
    Input {
        fields: LazyFields,
        parse_value: Option<ValueFn>,
    },
    /// Enum members mapped to their internal values.
    Enum {
        values: IndexMap<String, String>,
    },
    Interface {
        fields: LazyFields,
        type_resolver: Option<TypeResolverFn>,
    },
    /// Union members by name, merged across partials without duplicates.
    Union {
        members: Vec<String>,
        type_resolver: TypeResolverFn,
    },
}

/// A realized type.
pub struct TypeNode {
    id: NodeId,
    name: String,
    description: Option<String>,
    directives: Vec<DirectiveInvocation>,
    kind: NodeKind,
}

impl TypeNode {
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn directives(&self) -> &[DirectiveInvocation] {
        &self.directives
    }

    #[must_use]
    pub const fn node_kind(&self) -> &NodeKind {
        &self.kind
    }

    #[must_use]
    pub const fn kind(&self) -> TypeKind {
        match self.kind {
            NodeKind::Builtin | NodeKind::Scalar { .. } => TypeKind::Scalar,
            NodeKind::Object { .. } => TypeKind::Object,
            NodeKind::Input { .. } => TypeKind::Input,
            NodeKind::Enum { .. } => TypeKind::Enum,
            NodeKind::Interface { .. } => TypeKind::Interface,
            NodeKind::Union { .. } => TypeKind::Union,
        }
    }

    fn lazy_fields(&self) -> Option<&LazyFields> {
        match &self.kind {
            NodeKind::Object { fields, .. }
            | NodeKind::Input { fields, .. }
            | NodeKind::Interface { fields, .. } => Some(fields),
            _ => None,
        }
    }

    /// Fields of the type, in contribution order.
    pub fn fields(&self) -> RuntimeResult<Vec<&FieldDescriptor>> {
        match self.lazy_fields() {
            Some(fields) => Ok(fields.get()?.values().collect()),
            None => Ok(Vec::new()),
        }
    }

    /// The field `name`; `None` when the type has no such field or no fields
    /// at all.
    pub fn field(&self, name: &str) -> RuntimeResult<Option<&FieldDescriptor>> {
        match self.lazy_fields() {
            Some(fields) => Ok(fields.get()?.get(name)),
            None => Ok(None),
        }
    }

    /// Interfaces implemented by an object type.
    #[must_use]
    pub fn interfaces(&self) -> &[String] {
        match &self.kind {
            NodeKind::Object { interfaces, .. } => interfaces,
            _ => &[],
        }
    }

    #[must_use]
    pub fn members(&self) -> &[String] {
        match &self.kind {
            NodeKind::Union { members, .. } => members,
            _ => &[],
        }
    }

    /// Value of the enum member `name`.
    #[must_use]
    pub fn enum_value(&self, name: &str) -> Option<&str> {
        match &self.kind {
            NodeKind::Enum { values } => values.get(name).map(String::as_str),
            _ => None,
        }
    }

    pub(crate) fn resolver_map_producer(&self) -> Option<ResolverMapProducer> {
        match &self.kind {
            NodeKind::Object { field_resolver, .. } => field_resolver.clone(),
            _ => None,
        }
    }

    /// Concrete type name of an interface or union value.
    #[must_use]
    pub fn resolve_type(&self, value: &Value, ctx: &RequestContext) -> Option<String> {
        match &self.kind {
            NodeKind::Interface {
                type_resolver: Some(resolve),
                ..
            }
            | NodeKind::Union {
                type_resolver: resolve,
                ..
            } => resolve(value, ctx),
            _ => None,
        }
    }

    /// Output conversion. Only custom scalars transform the value.
    pub fn serialize(&self, value: &Value) -> ResolverResult {
        match &self.kind {
            NodeKind::Scalar { serialize, .. } => serialize(value),
            _ => Ok(value.clone()),
        }
    }

    /// Parses a variable value; input objects run their `@v` hook.
    pub fn parse_value(&self, value: &Value) -> ResolverResult {
        match &self.kind {
            NodeKind::Scalar { parse_value, .. }
            | NodeKind::Input {
                parse_value: Some(parse_value),
                ..
            } => parse_value(value),
            _ => Ok(value.clone()),
        }
    }

    /// Parses an inline literal from a document.
    pub fn parse_literal(&self, value: &Value) -> ResolverResult {
        match &self.kind {
            NodeKind::Scalar { parse_literal, .. } => parse_literal(value),
            _ => Ok(value.clone()),
        }
    }
}

impl std::fmt::Debug for TypeNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeNode")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("kind", &self.kind())
            .finish_non_exhaustive()
    }
}

/// Root operation types of an assembled graph.
#[derive(Debug, Clone)]
pub struct Schema {
    pub query: Arc<TypeNode>,
    pub mutation: Option<Arc<TypeNode>>,
}

type Slot = Arc<OnceLock<RuntimeResult<Arc<TypeNode>>>>;

/// The runtime schema: descriptors, bound callables and the cache of
/// realized types.
///
/// Every name gets at most one slot, created on the first lookup of a type
/// that has descriptors. Concurrent lookups of the same name wait on that
/// slot and observe the same node.
pub struct TypeGraph {
    descriptors: DescriptorSet,
    bindings: Bindings,
    directives: Arc<DirectiveRegistry>,
    config: SchemaConfig,
    slots: RwLock<FxHashMap<String, Slot>>,
    next_id: AtomicUsize,
    created: AtomicUsize,
    chains: ResolverChains,
}

impl TypeGraph {
    #[must_use]
    pub fn new(descriptors: DescriptorSet, bindings: Bindings, directives: Arc<DirectiveRegistry>) -> Self {
        info!(types = descriptors.len(), "type graph ready");
        Self {
            descriptors,
            bindings,
            directives,
            config: SchemaConfig::default(),
            slots: RwLock::default(),
            next_id: AtomicUsize::new(BUILTIN_NAMES.len()),
            created: AtomicUsize::new(0),
            chains: ResolverChains::new(),
        }
    }

    /// Replaces the root type names.
    #[must_use]
    pub fn with_config(mut self, config: SchemaConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn directives(&self) -> &Arc<DirectiveRegistry> {
        &self.directives
    }

    /// Number of types realized so far, built-ins excluded.
    #[must_use]
    pub fn created_types(&self) -> usize {
        self.created.load(Ordering::Acquire)
    }

    /// Looks up `name` case-insensitively, realizing it on first use.
    ///
    /// Names without descriptors fail with `UnknownType` and are not cached.
    pub fn get_type(&self, name: &str) -> RuntimeResult<Arc<TypeNode>> {
        let key = name.to_ascii_lowercase();
        if let Some(node) = builtin(&key) {
            return Ok(node);
        }
        if self.descriptors.partials(name).is_empty() {
            return Err(RuntimeError::UnknownType(name.to_string()));
        }
        let slot = self.slot(&key);
        slot.get_or_init(|| self.create_type(name)).clone()
    }

    fn slot(&self, key: &str) -> Slot {
        if let Some(slot) = self.slots.read().get(key) {
            return slot.clone();
        }
        self.slots.write().entry(key.to_string()).or_default().clone()
    }

    fn create_type(&self, name: &str) -> RuntimeResult<Arc<TypeNode>> {
        let partials = self.descriptors.partials(name);
        let Some(first) = partials.first() else {
            return Err(RuntimeError::UnknownType(name.to_string()));
        };
        if let Some(other) = partials.iter().find(|p| p.kind() != first.kind()) {
            return Err(RuntimeError::KindMismatch {
                type_name: first.name.clone(),
                first: first.kind(),
                second: other.kind(),
            });
        }

        let kind = self.node_kind(&first.name, partials)?;
        let node = TypeNode {
            id: NodeId(self.next_id.fetch_add(1, Ordering::Relaxed)),
            name: first.name.clone(),
            description: partials.iter().rev().find_map(|p| p.description.clone()),
            directives: partials
                .iter()
                .rev()
                .find(|p| !p.directives.is_empty())
                .map(|p| p.directives.clone())
                .unwrap_or_default(),
            kind,
        };
        self.created.fetch_add(1, Ordering::AcqRel);
        debug!(type_name = %node.name, kind = %node.kind(), partials = partials.len(), "created type");
        Ok(Arc::new(node))
    }

    fn node_kind(&self, name: &str, partials: &[TypeDescriptor]) -> RuntimeResult<NodeKind> {
        let field_partials = || -> Vec<Vec<FieldDescriptor>> {
            partials.iter().map(|p| p.body.fields().to_vec()).collect()
        };

        Ok(match &partials[partials.len() - 1].body {
            TypeBody::Scalar {
                serialize,
                parse_value,
                parse_literal,
            } => NodeKind::Scalar {
                serialize: self.bindings.value_fn(serialize)?,
                parse_value: self.bindings.value_fn(parse_value)?,
                parse_literal: self.bindings.value_fn(parse_literal)?,
            },
            TypeBody::Object { .. } => NodeKind::Object {
                fields: LazyFields::new(name, field_partials()),
                field_resolver: last_ref(partials, |body| match body {
                    TypeBody::Object { field_resolver, .. } => field_resolver.as_ref(),
                    _ => None,
                })
                .map(|r| self.bindings.resolver_map(r))
                .transpose()?,
                interfaces: partials
                    .iter()
                    .rev()
                    .find_map(|p| match &p.body {
                        TypeBody::Object { interfaces, .. } if !interfaces.is_empty() => Some(interfaces.clone()),
                        _ => None,
                    })
                    .unwrap_or_default(),
            },
            TypeBody::Input { .. } => NodeKind::Input {
                fields: LazyFields::new(name, field_partials()),
                parse_value: last_ref(partials, |body| match body {
                    TypeBody::Input { parse_value, .. } => parse_value.as_ref(),
                    _ => None,
                })
                .map(|r| self.bindings.value_fn(r))
                .transpose()?,
            },
            TypeBody::Enum { .. } => NodeKind::Enum {
                values: partials
                    .iter()
                    .filter_map(|p| match &p.body {
                        TypeBody::Enum { values } => Some(values),
                        _ => None,
                    })
                    .flatten()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
            },
            TypeBody::Interface { .. } => NodeKind::Interface {
                fields: LazyFields::new(name, field_partials()),
                type_resolver: last_ref(partials, |body| match body {
                    TypeBody::Interface { type_resolver, .. } => type_resolver.as_ref(),
                    _ => None,
                })
                .map(|r| self.bindings.type_resolver(r))
                .transpose()?,
            },
            TypeBody::Union { type_resolver, .. } => {
                let mut members: Vec<String> = Vec::new();
                for p in partials {
                    if let TypeBody::Union { members: more, .. } = &p.body {
                        for member in more {
                            if !members.contains(member) {
                                members.push(member.clone());
                            }
                        }
                    }
                }
                NodeKind::Union {
                    members,
                    type_resolver: self.bindings.type_resolver(type_resolver)?,
                }
            }
        })
    }

    /// Root types: `Query`, plus `Mutation` when one is described.
    pub fn schema(&self) -> RuntimeResult<Schema> {
        let query = self.get_type(&self.config.query_type)?;
        let mutation = match &self.config.mutation_type {
            Some(name) if !self.descriptors.partials(name).is_empty() => Some(self.get_type(name)?),
            _ => None,
        };
        Ok(Schema { query, mutation })
    }

    /// Resolves `field` of `parent_type` for the execution engine.
    pub fn resolve_field(
        &self,
        parent_type: &str,
        field: &str,
        parent: &Value,
        args: &ResolverArgs,
        ctx: &RequestContext,
    ) -> ResolverResult {
        let node = self.get_type(parent_type)?;
        let descriptor = node
            .field(field)?
            .ok_or_else(|| RuntimeError::MissingFieldResolver {
                type_name: node.name().to_string(),
                field: field.to_string(),
            })?;
        let resolver = self
            .chains
            .chain(&node)
            .resolver(node.name(), descriptor, &self.bindings, &self.directives)?;
        let info = ResolveInfo::new(field, node.name())
            .with_return_type(descriptor.ty.to_string())
            .with_directives(descriptor.directives.clone());
        resolver(parent, args, ctx, &info)
    }

    /// Concrete type of `value` returned through the abstract type
    /// `abstract_type`; `None` when no type resolver applies.
    pub fn resolve_type(
        &self,
        abstract_type: &str,
        value: &Value,
        ctx: &RequestContext,
    ) -> RuntimeResult<Option<Arc<TypeNode>>> {
        let node = self.get_type(abstract_type)?;
        node.resolve_type(value, ctx)
            .map(|name| self.get_type(&name))
            .transpose()
    }

    /// [`TypeNode::parse_value`] of the named type.
    pub fn parse_value(&self, type_name: &str, value: &Value) -> ResolverResult {
        self.get_type(type_name)?.parse_value(value)
    }

    /// [`TypeNode::serialize`] of the named type.
    pub fn serialize(&self, type_name: &str, value: &Value) -> ResolverResult {
        self.get_type(type_name)?.serialize(value)
    }

    pub fn parse_literal(&self, type_name: &str, value: &Value) -> ResolverResult {
        self.get_type(type_name)?.parse_literal(value)
    }

    /// Value of enum member `name`, used for enum default literals.
    pub fn enum_value(&self, enum_type: &str, name: &str) -> RuntimeResult<Option<String>> {
        Ok(self.get_type(enum_type)?.enum_value(name).map(str::to_string))
    }
}

/// The reference picked from the last partial that has one.
fn last_ref<'a>(
    partials: &'a [TypeDescriptor],
    pick: impl Fn(&'a TypeBody) -> Option<&'a CallableRef>,
) -> Option<&'a CallableRef> {
    partials.iter().rev().find_map(|p| pick(&p.body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gschema_descriptor::{DescriptorTable, TypeRef};

    fn graph(descriptors: Vec<TypeDescriptor>) -> TypeGraph {
        let mut table = DescriptorTable::new("core");
        for descriptor in descriptors {
            table.push(descriptor);
        }
        TypeGraph::new(
            std::iter::once(table).collect(),
            Bindings::new(),
            Arc::new(DirectiveRegistry::new()),
        )
    }

    fn object(name: &str, module: &str, fields: &[&str]) -> TypeDescriptor {
        TypeDescriptor::new(
            name,
            module,
            TypeBody::Object {
                fields: fields
                    .iter()
                    .map(|f| FieldDescriptor::new(*f, TypeRef::named("String")))
                    .collect(),
                field_resolver: None,
                interfaces: Vec::new(),
            },
        )
    }

    #[test]
    fn builtins_are_shared_singletons() {
        let graph = graph(Vec::new());
        let a = graph.get_type("string").unwrap();
        let b = graph.get_type("String").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.name(), "String");
        assert_eq!(graph.created_types(), 0);
    }

    #[test]
    fn unknown_type_fails_on_use() {
        let graph = graph(Vec::new());
        assert_eq!(
            graph.get_type("Ghost").err().map(|e| e.to_string()),
            Some("unknown type `Ghost`".to_string())
        );
    }

    #[test]
    fn unknown_names_leave_no_slot() {
        let graph = graph(vec![object("User", "a", &["id"])]);
        graph.get_type("User").unwrap();
        for i in 0..100 {
            assert!(matches!(
                graph.get_type(&format!("Ghost{i}")),
                Err(RuntimeError::UnknownType(_))
            ));
        }
        assert!(graph.get_type("ghost0").is_err());
        assert_eq!(graph.slots.read().len(), 1);
        assert_eq!(graph.created_types(), 1);
    }

    #[test]
    fn kind_mismatch_is_reported() {
        let graph = graph(vec![
            object("Thing", "a", &["a"]),
            TypeDescriptor::new("Thing", "b", TypeBody::Enum { values: IndexMap::new() }),
        ]);
        assert!(matches!(
            graph.get_type("Thing"),
            Err(RuntimeError::KindMismatch {
                first: TypeKind::Object,
                second: TypeKind::Enum,
                ..
            })
        ));
    }

    #[test]
    fn enum_values_merge() {
        let values = |names: &[&str]| TypeBody::Enum {
            values: names.iter().map(|n| ((*n).to_string(), (*n).to_string())).collect(),
        };
        let graph = graph(vec![
            TypeDescriptor::new("Role", "a", values(&["ADMIN"])),
            TypeDescriptor::new("Role", "b", values(&["GUEST"])),
        ]);
        assert_eq!(graph.enum_value("role", "GUEST").unwrap().as_deref(), Some("GUEST"));
        assert_eq!(graph.enum_value("Role", "OWNER").unwrap(), None);
    }
}
