//! Type descriptors emitted by the schema compiler.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A wiring target parsed from a reference string such as `Users::find`,
/// `Di->users` or `Users\Resolver::class`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CallableRef {
    /// A member of the service locator.
    Service { name: String },
    /// A class instantiated to obtain the callable.
    Constructor { class: String },
    StaticMethod { class: String, method: String },
}

impl CallableRef {
    pub fn service(name: impl Into<String>) -> Self {
        Self::Service { name: name.into() }
    }

    pub fn constructor(class: impl Into<String>) -> Self {
        Self::Constructor {
            class: class.into(),
        }
    }

    pub fn static_method(class: impl Into<String>, method: impl Into<String>) -> Self {
        Self::StaticMethod {
            class: class.into(),
            method: method.into(),
        }
    }
}

impl fmt::Display for CallableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Service { name } => write!(f, "service `{name}`"),
            Self::Constructor { class } => write!(f, "new `{class}`"),
            Self::StaticMethod { class, method } => write!(f, "`{class}::{method}`"),
        }
    }
}

/// A field or argument type. Named types stay unresolved lookups by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    #[must_use]
    pub fn list(inner: TypeRef) -> Self {
        Self::List(Box::new(inner))
    }

    #[must_use]
    pub fn non_null(inner: TypeRef) -> Self {
        Self::NonNull(Box::new(inner))
    }

    /// The innermost named type.
    #[must_use]
    pub fn base_name(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::List(inner) | Self::NonNull(inner) => inner.base_name(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::List(inner) => write!(f, "[{inner}]"),
            Self::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

/// A default value literal. Enum values are resolved by the runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DefaultValue {
    String(String),
    Int(i64),
    Float(f64),
    Boolean(bool),
    Null,
    List(Vec<DefaultValue>),
    Enum(String),
}

/// A non-wiring directive attached to a type or field. Declaration order is
/// significant: it decides middleware nesting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectiveInvocation {
    pub name: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub args: IndexMap<String, serde_json::Value>,
}

impl DirectiveInvocation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn with_arg(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.args.insert(name.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<DefaultValue>,
}

/// An object, interface or input-object field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<DefaultValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolver: Option<CallableRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<DirectiveInvocation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<ArgumentDescriptor>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            description: None,
            default_value: None,
            resolver: None,
            directives: Vec::new(),
            arguments: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_resolver(mut self, resolver: CallableRef) -> Self {
        self.resolver = Some(resolver);
        self
    }

    #[must_use]
    pub fn with_directive(mut self, directive: DirectiveInvocation) -> Self {
        self.directives.push(directive);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Scalar,
    Object,
    Input,
    Enum,
    Interface,
    Union,
}

impl TypeKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Object => "object",
            Self::Input => "input",
            Self::Enum => "enum",
            Self::Interface => "interface",
            Self::Union => "union",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific part of a type descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeBody {
    Scalar {
        serialize: CallableRef,
        parse_value: CallableRef,
        parse_literal: CallableRef,
    },
    Object {
        fields: Vec<FieldDescriptor>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        field_resolver: Option<CallableRef>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        interfaces: Vec<String>,
    },
    Input {
        fields: Vec<FieldDescriptor>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parse_value: Option<CallableRef>,
    },
    Enum {
        values: IndexMap<String, String>,
    },
    Interface {
        fields: Vec<FieldDescriptor>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        type_resolver: Option<CallableRef>,
    },
    Union {
        members: Vec<String>,
        type_resolver: CallableRef,
    },
}

impl TypeBody {
    #[must_use]
    pub const fn kind(&self) -> TypeKind {
        match self {
            Self::Scalar { .. } => TypeKind::Scalar,
            Self::Object { .. } => TypeKind::Object,
            Self::Input { .. } => TypeKind::Input,
            Self::Enum { .. } => TypeKind::Enum,
            Self::Interface { .. } => TypeKind::Interface,
            Self::Union { .. } => TypeKind::Union,
        }
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        match self {
            Self::Object { fields, .. } | Self::Input { fields, .. } | Self::Interface { fields, .. } => {
                fields
            }
            _ => &[],
        }
    }
}

/// One module's contribution to a named type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub source_module: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<DirectiveInvocation>,
    #[serde(flatten)]
    pub body: TypeBody,
}

impl TypeDescriptor {
    pub fn new(name: impl Into<String>, source_module: impl Into<String>, body: TypeBody) -> Self {
        Self {
            name: name.into(),
            description: None,
            source_module: source_module.into(),
            directives: Vec::new(),
            body,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> TypeKind {
        self.body.kind()
    }
}

/// The descriptors emitted for one module: type name to ordered partials.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DescriptorTable {
    pub module: String,
    pub types: IndexMap<String, Vec<TypeDescriptor>>,
}

impl DescriptorTable {
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            types: IndexMap::new(),
        }
    }

    pub fn push(&mut self, descriptor: TypeDescriptor) {
        self.types
            .entry(descriptor.name.clone())
            .or_default()
            .push(descriptor);
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// All module tables loaded by one process, flattened by type name.
///
/// Partials keep the order in which their tables were added.
#[derive(Debug, Clone, Default)]
pub struct DescriptorSet {
    types: IndexMap<String, Vec<TypeDescriptor>>,
}

impl DescriptorSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_table(&mut self, table: DescriptorTable) {
        for (name, partials) in table.types {
            self.types.entry(name).or_default().extend(partials);
        }
    }

    /// Partials registered under `name`, matched case-insensitively.
    #[must_use]
    pub fn partials(&self, name: &str) -> &[TypeDescriptor] {
        if let Some(partials) = self.types.get(name) {
            return partials;
        }
        self.types
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map_or(&[], |(_, partials)| partials.as_slice())
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl FromIterator<DescriptorTable> for DescriptorSet {
    fn from_iter<I: IntoIterator<Item = DescriptorTable>>(iter: I) -> Self {
        let mut set = Self::new();
        for table in iter {
            set.add_table(table);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_partial(module: &str, fields: &[&str]) -> TypeDescriptor {
        TypeDescriptor::new(
            "User",
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
    fn set_concatenates_partials_in_table_order() {
        let mut users = DescriptorTable::new("users");
        users.push(user_partial("users", &["id", "name"]));
        let mut billing = DescriptorTable::new("billing");
        billing.push(user_partial("billing", &["plan"]));

        let set: DescriptorSet = [users, billing].into_iter().collect();
        let partials = set.partials("user");
        assert_eq!(partials.len(), 2);
        assert_eq!(partials[0].source_module, "users");
        assert_eq!(partials[1].body.fields()[0].name, "plan");
        assert!(set.partials("Missing").is_empty());
    }

    #[test]
    fn type_ref_display() {
        let ty = TypeRef::non_null(TypeRef::list(TypeRef::non_null(TypeRef::named("Post"))));
        assert_eq!(ty.to_string(), "[Post!]!");
        assert_eq!(ty.base_name(), "Post");
    }

    #[test]
    fn descriptor_json_shape() {
        let mut field = FieldDescriptor::new("posts", TypeRef::list(TypeRef::named("Post")))
            .with_resolver(CallableRef::service("posts"))
            .with_directive(DirectiveInvocation::new("auth").with_arg("role", "admin"));
        field.default_value = Some(DefaultValue::Enum("ASC".into()));

        let descriptor = TypeDescriptor::new(
            "User",
            "users",
            TypeBody::Object {
                fields: vec![field],
                field_resolver: Some(CallableRef::static_method("Users", "field")),
                interfaces: vec!["Node".into()],
            },
        );
        insta::assert_json_snapshot!(descriptor, @r#"
        {
          "name": "User",
          "source_module": "users",
          "kind": "object",
          "fields": [
            {
              "name": "posts",
              "type": {
                "list": {
                  "named": "Post"
                }
              },
              "default_value": {
                "kind": "enum",
                "value": "ASC"
              },
              "resolver": {
                "kind": "service",
                "name": "posts"
              },
              "directives": [
                {
                  "name": "auth",
                  "args": {
                    "role": "admin"
                  }
                }
              ]
            }
          ],
          "field_resolver": {
            "kind": "static_method",
            "class": "Users",
            "method": "field"
          },
          "interfaces": [
            "Node"
          ]
        }
        "#);
    }

    #[test]
    fn table_round_trips_through_json() {
        let mut table = DescriptorTable::new("users");
        table.push(user_partial("users", &["id"]));
        let json = table.to_json().unwrap();
        assert_eq!(DescriptorTable::from_json(&json).unwrap(), table);
    }
}
