//! Schema definition compiler.
//!
//! Turns type-definition documents into one [`DescriptorTable`] per module.
//! Object types may be contributed to by several modules through
//! `extend type`; each contributing module receives a partial descriptor with
//! its own fields, and the owning module always receives one.

use crate::config::CompilerConfig;
use crate::error::{CompileError, CompileResult};
use crate::parse::parse_sources;
use crate::reference::{is_class_name, parse_reference, ReferenceSyntax};
use gschema_core::{Interner, Location, SourceFile};
use gschema_descriptor::{
    ArgumentDescriptor, CallableRef, DefaultValue, DescriptorTable, DirectiveInvocation,
    FieldDescriptor, TypeBody, TypeDescriptor, TypeRef,
};
use gschema_syntax::{
    Definition, Directive, Document, FieldDefinition, InputValueDefinition, Type, TypeDefinition,
    Value,
};
use indexmap::{IndexMap, IndexSet};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use tracing::{debug, info, warn};

/// Compiles schema documents into per-module descriptor tables.
pub struct SchemaCompiler<'c> {
    config: &'c CompilerConfig,
    interner: Interner,
}

/// One definition of a type, either the base or an extension.
#[derive(Clone, Copy)]
struct Contribution<'d> {
    source: usize,
    def: &'d TypeDefinition,
}

struct GatheredType<'d> {
    name: String,
    base: Contribution<'d>,
    extensions: Vec<Contribution<'d>>,
}

impl<'d> GatheredType<'d> {
    fn contributions(&self) -> impl Iterator<Item = Contribution<'d>> + '_ {
        std::iter::once(self.base).chain(self.extensions.iter().copied())
    }

    fn directives(&self) -> Vec<&'d Directive> {
        self.contributions()
            .flat_map(|c| c.def.directives().iter())
            .collect()
    }
}

/// Error context: the type (or `Type.field`) being compiled and where.
struct Scope {
    name: String,
    location: Location,
}

impl<'c> SchemaCompiler<'c> {
    #[must_use]
    pub fn new(config: &'c CompilerConfig) -> Self {
        Self {
            config,
            interner: Interner::new(),
        }
    }

    /// Compiles `sources`; tables come back in order of each module's first
    /// appearance.
    pub fn compile(&self, sources: &[SourceFile]) -> CompileResult<Vec<DescriptorTable>> {
        let documents = parse_sources(sources, &self.interner)?;
        let source_modules = sources
            .iter()
            .map(|source| self.config.module_layout.module_for(source.path()))
            .collect::<CompileResult<Vec<_>>>()?;
        let modules: Vec<&str> = source_modules
            .iter()
            .map(String::as_str)
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect();

        let types = self.gather(sources, &documents)?;

        let results: Vec<CompileResult<DescriptorTable>> = modules
            .par_iter()
            .map(|module| self.emit_module(module, &types, sources, &source_modules))
            .collect();
        let tables = results.into_iter().collect::<CompileResult<Vec<_>>>()?;

        self.check_field_disjointness(&types, sources, &source_modules)?;

        info!(
            modules = tables.len(),
            types = types.len(),
            "compiled schema"
        );
        Ok(tables)
    }

    fn location(&self, sources: &[SourceFile], contribution: Contribution<'_>) -> Location {
        sources[contribution.source].location(contribution.def.name().span)
    }

    fn gather<'d>(
        &self,
        sources: &[SourceFile],
        documents: &'d [Document],
    ) -> CompileResult<IndexMap<String, GatheredType<'d>>> {
        let mut types: IndexMap<String, GatheredType<'d>> = IndexMap::new();
        let mut extensions = Vec::new();

        for (source, document) in documents.iter().enumerate() {
            for definition in &document.definitions {
                match definition {
                    Definition::Type(def) => {
                        let contribution = Contribution { source, def };
                        let name = self.interner.get(def.name().value);
                        if let Some(existing) = types.get(&name) {
                            return Err(CompileError::DuplicateType {
                                type_name: name,
                                location: self.location(sources, contribution),
                                previous: self.location(sources, existing.base),
                            });
                        }
                        types.insert(
                            name.clone(),
                            GatheredType {
                                name,
                                base: contribution,
                                extensions: Vec::new(),
                            },
                        );
                    }
                    Definition::Extension(def) => extensions.push(Contribution { source, def }),
                    Definition::Operation(_) | Definition::Fragment(_) => {
                        warn!(
                            path = %sources[source].path().display(),
                            "ignoring executable definition in schema document"
                        );
                    }
                    Definition::Schema(_) | Definition::Directive(_) => {}
                }
            }
        }

        for extension in extensions {
            let name = self.interner.get(extension.def.name().value);
            match types.get_mut(&name) {
                Some(target)
                    if std::mem::discriminant(target.base.def)
                        == std::mem::discriminant(extension.def) =>
                {
                    target.extensions.push(extension);
                }
                _ => {
                    return Err(CompileError::UnknownExtensionTarget {
                        type_name: name,
                        keyword: extension.def.keyword().to_string(),
                        location: self.location(sources, extension),
                    });
                }
            }
        }

        Ok(types)
    }

    fn emit_module(
        &self,
        module: &str,
        types: &IndexMap<String, GatheredType<'_>>,
        sources: &[SourceFile],
        source_modules: &[String],
    ) -> CompileResult<DescriptorTable> {
        let mut table = DescriptorTable::new(module);

        for ty in types.values() {
            let owned = source_modules[ty.base.source] == module;
            if let TypeDefinition::Object(_) = ty.base.def {
                let fields: Vec<(usize, &FieldDefinition)> = ty
                    .contributions()
                    .filter(|c| source_modules[c.source] == module)
                    .flat_map(|c| object_fields(c.def).iter().map(move |f| (c.source, f)))
                    .collect();
                if owned || !fields.is_empty() {
                    table.push(self.object_descriptor(ty, module, &fields, sources)?);
                }
            } else if owned {
                table.push(self.type_descriptor(ty, module, sources)?);
            }
        }

        debug!(module, types = table.types.len(), "emitted module descriptors");
        Ok(table)
    }

    fn object_descriptor(
        &self,
        ty: &GatheredType<'_>,
        module: &str,
        fields: &[(usize, &FieldDefinition)],
        sources: &[SourceFile],
    ) -> CompileResult<TypeDescriptor> {
        let scope = self.type_scope(ty, sources);
        let directives = ty.directives();
        let wiring = &self.config.wiring;

        let fields = fields
            .iter()
            .map(|(source, field)| self.field_descriptor(&ty.name, field, &sources[*source]))
            .collect::<CompileResult<Vec<_>>>()?;

        let interfaces = ty
            .contributions()
            .filter_map(|c| match c.def {
                TypeDefinition::Object(o) => Some(&o.implements),
                _ => None,
            })
            .flatten()
            .map(|name| self.interner.get(name.value))
            .collect();

        let body = TypeBody::Object {
            fields,
            field_resolver: self.wiring_ref(&directives, &wiring.type_field_resolver, &scope)?,
            interfaces,
        };
        Ok(self.finish(ty, module, &directives, body))
    }

    fn type_descriptor(
        &self,
        ty: &GatheredType<'_>,
        module: &str,
        sources: &[SourceFile],
    ) -> CompileResult<TypeDescriptor> {
        let scope = self.type_scope(ty, sources);
        let directives = ty.directives();
        let wiring = &self.config.wiring;

        let body = match ty.base.def {
            TypeDefinition::Scalar(_) => {
                let class = self
                    .wiring_value(&directives, &wiring.scalar, &scope)?
                    .ok_or_else(|| missing_directive(&scope, &wiring.scalar))?;
                self.scalar_body(&class, &scope)?
            }
            TypeDefinition::Input(_) => {
                let fields = ty
                    .contributions()
                    .filter_map(|c| match c.def {
                        TypeDefinition::Input(input) => Some((c.source, &input.fields)),
                        _ => None,
                    })
                    .flat_map(|(source, fields)| fields.iter().map(move |f| (source, f)))
                    .map(|(source, field)| self.input_field_descriptor(&ty.name, field, &sources[source]))
                    .collect::<CompileResult<Vec<_>>>()?;
                TypeBody::Input {
                    fields,
                    parse_value: self.wiring_ref(&directives, &wiring.input_validator, &scope)?,
                }
            }
            TypeDefinition::Enum(_) => {
                let values = ty
                    .contributions()
                    .filter_map(|c| match c.def {
                        TypeDefinition::Enum(e) => Some(&e.values),
                        _ => None,
                    })
                    .flatten()
                    .map(|value| {
                        let name = self.interner.get(value.name.value);
                        (name.clone(), name)
                    })
                    .collect();
                TypeBody::Enum { values }
            }
            TypeDefinition::Interface(_) => {
                let fields = ty
                    .contributions()
                    .flat_map(|c| object_fields(c.def).iter().map(move |f| (c.source, f)))
                    .map(|(source, field)| self.field_descriptor(&ty.name, field, &sources[source]))
                    .collect::<CompileResult<Vec<_>>>()?;
                let type_resolver = self.wiring_ref(&directives, &wiring.type_resolver, &scope)?;
                if type_resolver.is_none()
                    && !self.config.type_resolver_exemptions.contains(&ty.name)
                {
                    return Err(missing_directive(&scope, &wiring.type_resolver));
                }
                TypeBody::Interface {
                    fields,
                    type_resolver,
                }
            }
            TypeDefinition::Union(_) => {
                let members = ty
                    .contributions()
                    .filter_map(|c| match c.def {
                        TypeDefinition::Union(u) => Some(&u.members),
                        _ => None,
                    })
                    .flatten()
                    .map(|name| self.interner.get(name.value))
                    .collect();
                let type_resolver = self
                    .wiring_ref(&directives, &wiring.type_resolver, &scope)?
                    .ok_or_else(|| missing_directive(&scope, &wiring.type_resolver))?;
                TypeBody::Union {
                    members,
                    type_resolver,
                }
            }
            TypeDefinition::Object(_) => {
                return self.object_descriptor(ty, module, &[], sources);
            }
        };

        debug!(type_name = %ty.name, kind = %body.kind(), "compiled type");
        Ok(self.finish(ty, module, &directives, body))
    }

    fn finish(
        &self,
        ty: &GatheredType<'_>,
        module: &str,
        directives: &[&Directive],
        body: TypeBody,
    ) -> TypeDescriptor {
        let mut descriptor = TypeDescriptor::new(ty.name.clone(), module, body);
        descriptor.description = ty.base.def.description().map(|d| d.value.clone());
        descriptor.directives = self.generic_directives(directives.iter().copied());
        descriptor
    }

    fn type_scope(&self, ty: &GatheredType<'_>, sources: &[SourceFile]) -> Scope {
        Scope {
            name: ty.name.clone(),
            location: self.location(sources, ty.base),
        }
    }

    fn scalar_body(&self, class: &str, scope: &Scope) -> CompileResult<TypeBody> {
        let class = class.trim();
        if let Some(prefix) = &self.config.scalar_prefix {
            if !class.starts_with(prefix.as_str()) {
                return Err(malformed(scope, class, format!("scalar implementations must start with `{prefix}`")));
            }
        }
        if !is_class_name(class) {
            return Err(malformed(scope, class, "expected a class name".to_string()));
        }
        Ok(TypeBody::Scalar {
            serialize: CallableRef::static_method(class, "serialize"),
            parse_value: CallableRef::static_method(class, "parseValue"),
            parse_literal: CallableRef::static_method(class, "parseLiteral"),
        })
    }

    fn field_descriptor(
        &self,
        type_name: &str,
        field: &FieldDefinition,
        source: &SourceFile,
    ) -> CompileResult<FieldDescriptor> {
        let name = self.interner.get(field.name.value);
        let scope = Scope {
            name: format!("{type_name}.{name}"),
            location: source.location(field.name.span),
        };
        let directives: Vec<&Directive> = field.directives.iter().collect();

        let arguments = field
            .arguments
            .iter()
            .map(|arg| {
                let arg_name = self.interner.get(arg.name.value);
                Ok(ArgumentDescriptor {
                    ty: self.type_ref(&arg.ty),
                    description: arg.description.as_ref().map(|d| d.value.clone()),
                    default_value: self.default_value(arg.default_value.as_ref(), &scope, &arg_name)?,
                    name: arg_name,
                })
            })
            .collect::<CompileResult<Vec<_>>>()?;

        Ok(FieldDescriptor {
            ty: self.type_ref(&field.ty),
            description: field.description.as_ref().map(|d| d.value.clone()),
            default_value: None,
            resolver: self.wiring_ref(&directives, &self.config.wiring.field_resolver, &scope)?,
            directives: self.generic_directives(directives.iter().copied()),
            arguments,
            name,
        })
    }

    fn input_field_descriptor(
        &self,
        type_name: &str,
        field: &InputValueDefinition,
        source: &SourceFile,
    ) -> CompileResult<FieldDescriptor> {
        let name = self.interner.get(field.name.value);
        let scope = Scope {
            name: type_name.to_string(),
            location: source.location(field.name.span),
        };
        let mut descriptor = FieldDescriptor::new(name.clone(), self.type_ref(&field.ty));
        descriptor.description = field.description.as_ref().map(|d| d.value.clone());
        descriptor.default_value = self.default_value(field.default_value.as_ref(), &scope, &name)?;
        descriptor.directives = self.generic_directives(field.directives.iter());
        Ok(descriptor)
    }

    fn type_ref(&self, ty: &Type) -> TypeRef {
        match ty {
            Type::Named(named) => TypeRef::Named(self.interner.get(named.name.value)),
            Type::List(inner, _) => TypeRef::list(self.type_ref(inner)),
            Type::NonNull(inner, _) => TypeRef::non_null(self.type_ref(inner)),
        }
    }

    fn default_value(
        &self,
        value: Option<&Value>,
        scope: &Scope,
        field: &str,
    ) -> CompileResult<Option<DefaultValue>> {
        value.map(|v| self.literal(v, scope, field)).transpose()
    }

    fn literal(&self, value: &Value, scope: &Scope, field: &str) -> CompileResult<DefaultValue> {
        let unsupported = |reason: &str| CompileError::UnsupportedDefault {
            type_name: scope.name.clone(),
            field: field.to_string(),
            reason: reason.to_string(),
            location: scope.location.clone(),
        };
        Ok(match value {
            Value::String(s) => DefaultValue::String(s.value.clone()),
            Value::Int(raw, _) => DefaultValue::Int(
                raw.parse()
                    .map_err(|_| unsupported("integer literal is out of range"))?,
            ),
            Value::Float(raw, _) => DefaultValue::Float(
                raw.parse()
                    .map_err(|_| unsupported("invalid float literal"))?,
            ),
            Value::Boolean(b, _) => DefaultValue::Boolean(*b),
            Value::Null(_) => DefaultValue::Null,
            Value::Enum(name) => DefaultValue::Enum(self.interner.get(name.value)),
            Value::List(items, _) => DefaultValue::List(
                items
                    .iter()
                    .map(|item| self.literal(item, scope, field))
                    .collect::<CompileResult<_>>()?,
            ),
            Value::Object(..) => return Err(unsupported("object literals are not supported")),
            Value::Variable(_) => return Err(unsupported("variables are not allowed here")),
        })
    }

    /// Directives other than the wiring ones, in declaration order.
    fn generic_directives<'d>(
        &self,
        directives: impl Iterator<Item = &'d Directive>,
    ) -> Vec<DirectiveInvocation> {
        let wiring = &self.config.wiring;
        directives
            .filter_map(|directive| {
                let name = self.interner.get(directive.name.value);
                let consumed = [
                    &wiring.field_resolver,
                    &wiring.type_field_resolver,
                    &wiring.scalar,
                    &wiring.type_resolver,
                    &wiring.input_validator,
                ]
                .iter()
                .any(|w| **w == name);
                if consumed {
                    return None;
                }
                let args = directive
                    .arguments
                    .iter()
                    .map(|arg| (self.interner.get(arg.name.value), self.json(&arg.value)))
                    .collect();
                Some(DirectiveInvocation { name, args })
            })
            .collect()
    }

    fn json(&self, value: &Value) -> serde_json::Value {
        use serde_json::Value as Json;
        match value {
            Value::String(s) => Json::String(s.value.clone()),
            Value::Int(raw, _) => raw
                .parse::<i64>()
                .map_or_else(|_| Json::String(raw.clone()), Json::from),
            Value::Float(raw, _) => raw
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map_or_else(|| Json::String(raw.clone()), Json::Number),
            Value::Boolean(b, _) => Json::Bool(*b),
            Value::Null(_) => Json::Null,
            Value::Enum(name) => Json::String(self.interner.get(name.value)),
            Value::Variable(name) => Json::String(format!("${}", self.interner.get(name.value))),
            Value::List(items, _) => Json::Array(items.iter().map(|v| self.json(v)).collect()),
            Value::Object(fields, _) => Json::Object(
                fields
                    .iter()
                    .map(|f| (self.interner.get(f.name.value), self.json(&f.value)))
                    .collect(),
            ),
        }
    }

    /// The string passed as the first argument of the first `@name`.
    fn wiring_value(
        &self,
        directives: &[&Directive],
        name: &str,
        scope: &Scope,
    ) -> CompileResult<Option<String>> {
        let Some(directive) = directives
            .iter()
            .find(|d| self.interner.resolve(d.name.value).as_deref() == Some(name))
        else {
            return Ok(None);
        };
        match directive.arguments.first().and_then(|arg| arg.value.as_str()) {
            Some(value) => Ok(Some(value.to_string())),
            None => Err(malformed(
                scope,
                &format!("@{name}"),
                "expected a string argument".to_string(),
            )),
        }
    }

    fn wiring_ref(
        &self,
        directives: &[&Directive],
        name: &str,
        scope: &Scope,
    ) -> CompileResult<Option<CallableRef>> {
        let Some(reference) = self.wiring_value(directives, name, scope)? else {
            return Ok(None);
        };
        let syntax = ReferenceSyntax {
            locator_token: &self.config.locator_token,
            constructor_marker: &self.config.constructor_marker,
        };
        parse_reference(&reference, syntax)
            .map(Some)
            .map_err(|reason| malformed(scope, &reference, reason))
    }

    /// Fields of one type contributed by different definitions must not
    /// overlap, within or across modules.
    fn check_field_disjointness(
        &self,
        types: &IndexMap<String, GatheredType<'_>>,
        sources: &[SourceFile],
        source_modules: &[String],
    ) -> CompileResult<()> {
        for ty in types.values() {
            let mut seen: FxHashMap<String, usize> = FxHashMap::default();
            for contribution in ty.contributions() {
                let names: Vec<_> = match contribution.def {
                    TypeDefinition::Object(_) | TypeDefinition::Interface(_) => object_fields(contribution.def)
                        .iter()
                        .map(|f| f.name)
                        .collect(),
                    TypeDefinition::Input(input) => input.fields.iter().map(|f| f.name).collect(),
                    _ => continue,
                };
                for name in names {
                    let field = self.interner.get(name.value);
                    if let Some(&other) = seen.get(&field) {
                        return Err(CompileError::DuplicateField {
                            type_name: ty.name.clone(),
                            field,
                            other_module: source_modules[other].clone(),
                            location: sources[contribution.source].location(name.span),
                        });
                    }
                    seen.insert(field, contribution.source);
                }
            }
        }
        Ok(())
    }
}

fn object_fields(def: &TypeDefinition) -> &[FieldDefinition] {
    match def {
        TypeDefinition::Object(o) => &o.fields,
        TypeDefinition::Interface(i) => &i.fields,
        _ => &[],
    }
}

fn missing_directive(scope: &Scope, directive: &str) -> CompileError {
    CompileError::MissingDirective {
        type_name: scope.name.clone(),
        directive: directive.to_string(),
        location: scope.location.clone(),
    }
}

fn malformed(scope: &Scope, reference: &str, reason: String) -> CompileError {
    CompileError::MalformedReference {
        type_name: scope.name.clone(),
        reference: reference.to_string(),
        reason,
        location: scope.location.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(files: &[(&str, &str)]) -> CompileResult<Vec<DescriptorTable>> {
        let config = CompilerConfig::default();
        let sources: Vec<_> = files
            .iter()
            .map(|(path, text)| SourceFile::new(*path, *text))
            .collect();
        SchemaCompiler::new(&config).compile(&sources)
    }

    fn body(tables: &[DescriptorTable], module: &str, ty: &str) -> TypeBody {
        tables
            .iter()
            .find(|t| t.module == module)
            .and_then(|t| t.types.get(ty))
            .map(|partials| partials[0].body.clone())
            .unwrap_or_else(|| panic!("no {ty} in {module}"))
    }

    #[test]
    fn scalar_requires_implementation() {
        let err = compile(&[("a/core.graphql", "scalar Date")]).unwrap_err();
        assert!(matches!(err, CompileError::MissingDirective { ref type_name, .. } if type_name == "Date"));

        let tables = compile(&[("a/core.graphql", r#"scalar Date @scalar(class: "Scalar\\Date")"#)]).unwrap();
        assert_eq!(
            body(&tables, "core", "Date"),
            TypeBody::Scalar {
                serialize: CallableRef::static_method("Scalar\\Date", "serialize"),
                parse_value: CallableRef::static_method("Scalar\\Date", "parseValue"),
                parse_literal: CallableRef::static_method("Scalar\\Date", "parseLiteral"),
            }
        );
    }

    #[test]
    fn scalar_prefix_is_enforced() {
        let config = CompilerConfig {
            scalar_prefix: Some("Scalar\\".into()),
            ..CompilerConfig::default()
        };
        let sources = [SourceFile::new("core.graphql", r#"scalar Date @scalar(class: "Dates\\Date")"#)];
        let err = SchemaCompiler::new(&config).compile(&sources).unwrap_err();
        assert_eq!(err.kind(), "malformed_reference");
    }

    #[test]
    fn interface_and_union_need_type_resolver() {
        let err = compile(&[("core.graphql", "interface Node { id: ID! }")]).unwrap_err();
        assert_eq!(err.kind(), "missing_directive");

        let tables = compile(&[("core.graphql", "interface RecordSet { total: Int }")]).unwrap();
        assert!(matches!(
            body(&tables, "core", "RecordSet"),
            TypeBody::Interface { type_resolver: None, .. }
        ));

        let err = compile(&[("core.graphql", "union U = A | B")]).unwrap_err();
        assert_eq!(err.kind(), "missing_directive");
    }

    #[test]
    fn defaults_are_translated() {
        let tables = compile(&[(
            "core.graphql",
            r#"input Filter { q: String = "x", n: Int = 3, r: Float = 1.5, on: Boolean = true, tags: [String] = ["a", null], order: Order = DESC }"#,
        )])
        .unwrap();
        let TypeBody::Input { fields, .. } = body(&tables, "core", "Filter") else {
            panic!("expected input");
        };
        let defaults: Vec<_> = fields.iter().map(|f| f.default_value.clone()).collect();
        assert_eq!(
            defaults,
            vec![
                Some(DefaultValue::String("x".into())),
                Some(DefaultValue::Int(3)),
                Some(DefaultValue::Float(1.5)),
                Some(DefaultValue::Boolean(true)),
                Some(DefaultValue::List(vec![DefaultValue::String("a".into()), DefaultValue::Null])),
                Some(DefaultValue::Enum("DESC".into())),
            ]
        );

        let err = compile(&[("core.graphql", "input F { o: Obj = { a: 1 } }")]).unwrap_err();
        assert!(matches!(err, CompileError::UnsupportedDefault { ref field, .. } if field == "o"));
    }

    #[test]
    fn malformed_reference_names_type() {
        let err = compile(&[(
            "users.graphql",
            r#"type User @f(resolver: "Users") { id: ID! }"#,
        )])
        .unwrap_err();
        match err {
            CompileError::MalformedReference {
                type_name,
                location,
                ..
            } => {
                assert_eq!(type_name, "User");
                assert_eq!(location.line, 1);
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn extension_of_unknown_type_fails() {
        let err = compile(&[("a.graphql", "extend type Ghost { a: Int }")]).unwrap_err();
        assert_eq!(err.kind(), "unknown_extension_target");

        let err = compile(&[("a.graphql", "enum Ghost { A }\nextend type Ghost { a: Int }")]).unwrap_err();
        assert_eq!(err.kind(), "unknown_extension_target");
    }

    #[test]
    fn duplicate_type_fails() {
        let err = compile(&[("a.graphql", "type A { a: Int }"), ("b.graphql", "type A { b: Int }")]).unwrap_err();
        match err {
            CompileError::DuplicateType { location, previous, .. } => {
                assert_eq!(location.path, "b.graphql");
                assert_eq!(previous.path, "a.graphql");
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn syntax_errors_carry_location() {
        let err = compile(&[("a.graphql", "type A {\n  a: \n}")]).unwrap_err();
        match err {
            CompileError::Syntax { location, .. } => assert_eq!(location.line, 3),
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn escape_at_end_of_file_is_a_syntax_error() {
        let err = compile(&[("a.graphql", "type A {\n  a: Int\n}\ntype B @d(x: \"a\\")]).unwrap_err();
        match err {
            CompileError::Syntax { location, message } => {
                assert_eq!((location.path.as_str(), location.line), ("a.graphql", 4));
                assert!(message.contains("string literal is not closed"));
            }
            other => panic!("unexpected error {other}"),
        }
    }
}
