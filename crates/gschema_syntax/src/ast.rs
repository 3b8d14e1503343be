//! Abstract syntax tree for GraphQL type-system and executable documents.

use crate::token::DirectiveLocation;
use gschema_core::{Span, Text};

/// A parsed document.
#[derive(Debug, Clone)]
pub struct Document {
    pub definitions: Vec<Definition>,
    pub span: Span,
}

impl Document {
    pub fn operations(&self) -> impl Iterator<Item = &OperationDefinition> {
        self.definitions.iter().filter_map(|def| match def {
            Definition::Operation(op) => Some(op),
            _ => None,
        })
    }

    pub fn fragments(&self) -> impl Iterator<Item = &FragmentDefinition> {
        self.definitions.iter().filter_map(|def| match def {
            Definition::Fragment(frag) => Some(frag),
            _ => None,
        })
    }
}

/// A top-level definition.
#[derive(Debug, Clone)]
pub enum Definition {
    Schema(SchemaDefinition),
    Type(TypeDefinition),
    /// `extend type ...` and the other extension forms.
    Extension(TypeDefinition),
    Directive(DirectiveDefinitionNode),
    Operation(OperationDefinition),
    Fragment(FragmentDefinition),
}

impl Definition {
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Schema(s) => s.span,
            Self::Type(t) | Self::Extension(t) => t.span(),
            Self::Directive(d) => d.span,
            Self::Operation(o) => o.span,
            Self::Fragment(f) => f.span,
        }
    }
}

/// An interned name with its location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Name {
    pub value: Text,
    pub span: Span,
}

impl Name {
    #[must_use]
    pub const fn new(value: Text, span: Span) -> Self {
        Self { value, span }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description {
    pub value: String,
    pub block: bool,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct SchemaDefinition {
    pub description: Option<Description>,
    pub directives: Vec<Directive>,
    pub operations: Vec<OperationTypeDefinition>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct OperationTypeDefinition {
    pub operation: OperationType,
    pub type_name: Name,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationType {
    Query,
    Mutation,
    Subscription,
}

impl OperationType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
            Self::Subscription => "subscription",
        }
    }
}

impl std::fmt::Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub enum TypeDefinition {
    Object(ObjectTypeDefinition),
    Interface(InterfaceTypeDefinition),
    Union(UnionTypeDefinition),
    Enum(EnumTypeDefinition),
    Input(InputObjectTypeDefinition),
    Scalar(ScalarTypeDefinition),
}

impl TypeDefinition {
    #[must_use]
    pub fn name(&self) -> Name {
        match self {
            Self::Object(t) => t.name,
            Self::Interface(t) => t.name,
            Self::Union(t) => t.name,
            Self::Enum(t) => t.name,
            Self::Input(t) => t.name,
            Self::Scalar(t) => t.name,
        }
    }

    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Object(t) => t.span,
            Self::Interface(t) => t.span,
            Self::Union(t) => t.span,
            Self::Enum(t) => t.span,
            Self::Input(t) => t.span,
            Self::Scalar(t) => t.span,
        }
    }

    #[must_use]
    pub fn description(&self) -> Option<&Description> {
        match self {
            Self::Object(t) => t.description.as_ref(),
            Self::Interface(t) => t.description.as_ref(),
            Self::Union(t) => t.description.as_ref(),
            Self::Enum(t) => t.description.as_ref(),
            Self::Input(t) => t.description.as_ref(),
            Self::Scalar(t) => t.description.as_ref(),
        }
    }

    #[must_use]
    pub fn directives(&self) -> &[Directive] {
        match self {
            Self::Object(t) => &t.directives,
            Self::Interface(t) => &t.directives,
            Self::Union(t) => &t.directives,
            Self::Enum(t) => &t.directives,
            Self::Input(t) => &t.directives,
            Self::Scalar(t) => &t.directives,
        }
    }

    /// The keyword introducing this definition.
    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Object(_) => "type",
            Self::Interface(_) => "interface",
            Self::Union(_) => "union",
            Self::Enum(_) => "enum",
            Self::Input(_) => "input",
            Self::Scalar(_) => "scalar",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ObjectTypeDefinition {
    pub description: Option<Description>,
    pub name: Name,
    pub implements: Vec<Name>,
    pub directives: Vec<Directive>,
    pub fields: Vec<FieldDefinition>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct InterfaceTypeDefinition {
    pub description: Option<Description>,
    pub name: Name,
    pub implements: Vec<Name>,
    pub directives: Vec<Directive>,
    pub fields: Vec<FieldDefinition>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct UnionTypeDefinition {
    pub description: Option<Description>,
    pub name: Name,
    pub directives: Vec<Directive>,
    pub members: Vec<Name>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct EnumTypeDefinition {
    pub description: Option<Description>,
    pub name: Name,
    pub directives: Vec<Directive>,
    pub values: Vec<EnumValueDefinition>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct EnumValueDefinition {
    pub description: Option<Description>,
    pub name: Name,
    pub directives: Vec<Directive>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct InputObjectTypeDefinition {
    pub description: Option<Description>,
    pub name: Name,
    pub directives: Vec<Directive>,
    pub fields: Vec<InputValueDefinition>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ScalarTypeDefinition {
    pub description: Option<Description>,
    pub name: Name,
    pub directives: Vec<Directive>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct FieldDefinition {
    pub description: Option<Description>,
    pub name: Name,
    pub arguments: Vec<InputValueDefinition>,
    pub ty: Type,
    pub directives: Vec<Directive>,
    pub span: Span,
}

/// An argument or input field definition.
#[derive(Debug, Clone)]
pub struct InputValueDefinition {
    pub description: Option<Description>,
    pub name: Name,
    pub ty: Type,
    pub default_value: Option<Value>,
    pub directives: Vec<Directive>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct DirectiveDefinitionNode {
    pub description: Option<Description>,
    pub name: Name,
    pub arguments: Vec<InputValueDefinition>,
    pub repeatable: bool,
    pub locations: Vec<DirectiveLocation>,
    pub span: Span,
}

/// A type reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Named(NamedType),
    List(Box<Type>, Span),
    NonNull(Box<Type>, Span),
}

impl Type {
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Named(n) => n.name.span,
            Self::List(_, span) | Self::NonNull(_, span) => *span,
        }
    }

    /// The innermost named type.
    #[must_use]
    pub fn named(&self) -> &NamedType {
        match self {
            Self::Named(n) => n,
            Self::List(inner, _) | Self::NonNull(inner, _) => inner.named(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamedType {
    pub name: Name,
}

#[derive(Debug, Clone)]
pub struct Directive {
    pub name: Name,
    pub arguments: Vec<Argument>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Argument {
    pub name: Name,
    pub value: Value,
    pub span: Span,
}

/// A literal or variable. Numbers keep their source text.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Variable(Name),
    Int(String, Span),
    Float(String, Span),
    String(StringValue),
    Boolean(bool, Span),
    Null(Span),
    Enum(Name),
    List(Vec<Value>, Span),
    Object(Vec<ObjectField>, Span),
}

impl Value {
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Variable(n) | Self::Enum(n) => n.span,
            Self::String(s) => s.span,
            Self::Int(_, span)
            | Self::Float(_, span)
            | Self::Boolean(_, span)
            | Self::Null(span)
            | Self::List(_, span)
            | Self::Object(_, span) => *span,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(&s.value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringValue {
    pub value: String,
    pub block: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectField {
    pub name: Name,
    pub value: Value,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct OperationDefinition {
    pub operation: OperationType,
    pub name: Option<Name>,
    pub variables: Vec<VariableDefinition>,
    pub directives: Vec<Directive>,
    pub selection_set: SelectionSet,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct VariableDefinition {
    pub variable: Name,
    pub ty: Type,
    pub default_value: Option<Value>,
    pub directives: Vec<Directive>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct FragmentDefinition {
    pub name: Name,
    pub type_condition: Name,
    pub directives: Vec<Directive>,
    pub selection_set: SelectionSet,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct SelectionSet {
    pub selections: Vec<Selection>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum Selection {
    Field(Field),
    FragmentSpread(FragmentSpread),
    InlineFragment(InlineFragment),
}

#[derive(Debug, Clone)]
pub struct Field {
    pub alias: Option<Name>,
    pub name: Name,
    pub arguments: Vec<Argument>,
    pub directives: Vec<Directive>,
    pub selection_set: Option<SelectionSet>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct FragmentSpread {
    pub name: Name,
    pub directives: Vec<Directive>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct InlineFragment {
    pub type_condition: Option<Name>,
    pub directives: Vec<Directive>,
    pub selection_set: SelectionSet,
    pub span: Span,
}

impl SelectionSet {
    /// Collects fragment spread names in this set and nested sets, in
    /// source order, without duplicates.
    #[must_use]
    pub fn fragment_spreads(&self) -> Vec<Text> {
        let mut out = Vec::new();
        self.collect_spreads(&mut out);
        out
    }

    fn collect_spreads(&self, out: &mut Vec<Text>) {
        for selection in &self.selections {
            match selection {
                Selection::Field(field) => {
                    if let Some(set) = &field.selection_set {
                        set.collect_spreads(out);
                    }
                }
                Selection::FragmentSpread(spread) => {
                    if !out.contains(&spread.name.value) {
                        out.push(spread.name.value);
                    }
                }
                Selection::InlineFragment(inline) => inline.selection_set.collect_spreads(out),
            }
        }
    }
}
