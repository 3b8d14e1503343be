//! Operation compiler.
//!
//! Builds persisted-operation registries from client operation documents.
//! Each operation is printed with `__typename` injected into its composite
//! selection sets, the fragments it transitively uses are appended
//! deepest-dependency first, and the whitespace-normalized text is hashed
//! with SHA-256.

use crate::config::CompilerConfig;
use crate::error::{CompileError, CompileResult};
use crate::metadata::{synthesize_metadata, ExtractedFile, OperationMetadata};
use crate::module::operation_module_label;
use crate::parse::parse_sources;
use gschema_core::{Interner, Location, SourceFile, Span};
use gschema_descriptor::{OperationKind, OperationRecord, OperationRegistry};
use gschema_syntax::{
    Document, Field, FragmentDefinition, Name, OperationDefinition, OperationType, Printer,
    Selection, SelectionSet,
};
use indexmap::IndexMap;
use rayon::prelude::*;
use regex::Regex;
use rustc_hash::{FxHashMap, FxHashSet};
use sha2::{Digest, Sha256};
use std::sync::LazyLock;
use tracing::{debug, info, warn};

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\n\r]+").expect("Invalid whitespace regex"));

/// Collapses every run of spaces, tabs and line breaks into one space.
#[must_use]
pub fn normalize(body: &str) -> String {
    WHITESPACE_RUN.replace_all(body, " ").into_owned()
}

/// Lower-case hex SHA-256 of the normalized body.
#[must_use]
pub fn operation_hash(body: &str) -> String {
    hex::encode(Sha256::digest(normalize(body).as_bytes()))
}

/// The operation documents of one host file.
#[derive(Debug, Clone)]
pub struct OperationInput {
    pub documents: Vec<SourceFile>,
    /// `None` synthesizes metadata from the operation names.
    pub metadata: Option<Vec<OperationMetadata>>,
}

impl OperationInput {
    /// A plain operation document without explicit metadata.
    #[must_use]
    pub fn plain(source: SourceFile) -> Self {
        Self {
            documents: vec![source],
            metadata: None,
        }
    }
}

impl From<ExtractedFile> for OperationInput {
    fn from(file: ExtractedFile) -> Self {
        Self {
            documents: file.documents,
            metadata: Some(file.metadata),
        }
    }
}

/// An operation that passed validation, waiting to be rendered.
struct Pending<'d> {
    source: &'d SourceFile,
    operation: &'d OperationDefinition,
    kind: OperationKind,
    name: String,
    metadata: &'d OperationMetadata,
    fragments: Vec<String>,
}

pub struct OperationCompiler<'c> {
    config: &'c CompilerConfig,
    interner: Interner,
}

impl<'c> OperationCompiler<'c> {
    #[must_use]
    pub fn new(config: &'c CompilerConfig) -> Self {
        Self {
            config,
            interner: Interner::new(),
        }
    }

    /// Compiles `inputs` into one registry per destination, in order of each
    /// destination's first operation.
    pub fn compile(&self, inputs: &[OperationInput]) -> CompileResult<Vec<OperationRegistry>> {
        let sources: Vec<SourceFile> = inputs
            .iter()
            .flat_map(|input| input.documents.iter().cloned())
            .collect();
        let owners: Vec<usize> = inputs
            .iter()
            .enumerate()
            .flat_map(|(file, input)| std::iter::repeat(file).take(input.documents.len()))
            .collect();
        let documents = parse_sources(&sources, &self.interner)?;

        let metadata = self.file_metadata(inputs, &sources, &owners, &documents);
        let fragments = self.collect_fragments(&documents);

        let mut used: FxHashSet<(usize, usize)> = FxHashSet::default();
        let mut seen: FxHashMap<(OperationKind, String), Location> = FxHashMap::default();
        let mut pending = Vec::new();

        for ((source, document), &file) in sources.iter().zip(&documents).zip(&owners) {
            for operation in document.operations() {
                let location = source.location(operation_span(operation));
                let Some(name) = operation.name else {
                    return Err(CompileError::AnonymousOperation { location });
                };
                let name = self.interner.get(name.value);
                let kind = match operation.operation {
                    OperationType::Query => OperationKind::Query,
                    OperationType::Mutation => OperationKind::Mutation,
                    OperationType::Subscription => {
                        return Err(CompileError::MissingMetadata {
                            kind: OperationType::Subscription.as_str().to_string(),
                            name,
                            location,
                        });
                    }
                };

                let Some(index) = metadata[file]
                    .iter()
                    .position(|m| m.kind == kind && m.name == name)
                else {
                    return Err(CompileError::MissingMetadata {
                        kind: kind.as_str().to_string(),
                        name,
                        location,
                    });
                };
                used.insert((file, index));

                if let Some(previous) = seen.get(&(kind, name.clone())) {
                    return Err(CompileError::DuplicateOperation {
                        kind,
                        name,
                        location,
                        previous: previous.clone(),
                    });
                }
                seen.insert((kind, name.clone()), location.clone());

                let used_fragments = self.fragment_closure(operation, &name, &fragments, &location)?;
                pending.push(Pending {
                    source,
                    operation,
                    kind,
                    name,
                    metadata: &metadata[file][index],
                    fragments: used_fragments,
                });
            }
        }

        for (file, entries) in metadata.iter().enumerate() {
            for (index, entry) in entries.iter().enumerate() {
                if !used.contains(&(file, index)) {
                    warn!(
                        constant = %entry.constant_name,
                        operation = %entry.name,
                        "metadata entry has no matching operation"
                    );
                }
            }
        }

        let records: Vec<(String, OperationRecord)> = pending
            .par_iter()
            .map(|op| self.render(op, &fragments))
            .collect();

        let mut registries: IndexMap<String, OperationRegistry> = IndexMap::new();
        for (destination, record) in records {
            registries
                .entry(destination.clone())
                .or_insert_with(|| OperationRegistry::new(destination))
                .push(record);
        }

        info!(
            operations = pending.len(),
            fragments = fragments.len(),
            destinations = registries.len(),
            "compiled operations"
        );
        Ok(registries.into_values().collect())
    }

    fn file_metadata(
        &self,
        inputs: &[OperationInput],
        sources: &[SourceFile],
        owners: &[usize],
        documents: &[Document],
    ) -> Vec<Vec<OperationMetadata>> {
        inputs
            .iter()
            .enumerate()
            .map(|(file, input)| match &input.metadata {
                Some(metadata) => metadata.clone(),
                None => sources
                    .iter()
                    .zip(documents)
                    .zip(owners)
                    .filter(|(_, owner)| **owner == file)
                    .flat_map(|((source, document), _)| {
                        synthesize_metadata(source, document, &self.interner)
                    })
                    .collect(),
            })
            .collect()
    }

    fn collect_fragments<'d>(
        &self,
        documents: &'d [Document],
    ) -> FxHashMap<String, &'d FragmentDefinition> {
        let mut fragments = FxHashMap::default();
        for fragment in documents.iter().flat_map(Document::fragments) {
            let name = self.interner.get(fragment.name.value);
            if fragments.insert(name.clone(), fragment).is_some() {
                debug!(fragment = %name, "fragment redefined, keeping the later definition");
            }
        }
        fragments
    }

    /// Fragments reachable from `operation`, in discovery order.
    fn fragment_closure(
        &self,
        operation: &OperationDefinition,
        name: &str,
        fragments: &FxHashMap<String, &FragmentDefinition>,
        location: &Location,
    ) -> CompileResult<Vec<String>> {
        let mut used = self.spread_names(&operation.selection_set);
        loop {
            let mut next = used.clone();
            for fragment in &used {
                let definition = fragments.get(fragment).ok_or_else(|| CompileError::UnknownFragment {
                    fragment: fragment.clone(),
                    operation: name.to_string(),
                    location: location.clone(),
                })?;
                next.extend(self.spread_names(&definition.selection_set));
            }
            dedup_keep_first(&mut next);
            if next.len() == used.len() {
                return Ok(used);
            }
            used = next;
        }
    }

    fn spread_names(&self, set: &SelectionSet) -> Vec<String> {
        set.fragment_spreads()
            .into_iter()
            .map(|text| self.interner.get(text))
            .collect()
    }

    fn render(
        &self,
        op: &Pending<'_>,
        fragments: &FxHashMap<String, &FragmentDefinition>,
    ) -> (String, OperationRecord) {
        let typename = Name::new(self.interner.intern("__typename"), Span::default());
        let mut printer = Printer::new(&self.interner);

        let mut operation = op.operation.clone();
        for selection in &mut operation.selection_set.selections {
            self.add_typename_below(selection, typename);
        }
        let mut body = printer.print_operation(&operation);

        if !op.fragments.is_empty() {
            let printed: Vec<String> = op
                .fragments
                .iter()
                .rev()
                .filter_map(|name| fragments.get(name))
                .map(|fragment| {
                    let mut fragment = (*fragment).clone();
                    self.add_typename(&mut fragment.selection_set, typename);
                    printer.print_fragment(&fragment)
                })
                .collect();
            body.push('\n');
            body.push_str(&printed.join("\n"));
        }

        let hash = operation_hash(&body);
        debug!(operation = %op.name, hash = %hash, "hashed operation");

        let destination = op
            .metadata
            .destination
            .clone()
            .unwrap_or_else(|| self.config.default_destination.clone());
        let record = OperationRecord {
            kind: op.kind,
            operation_name: op.name.clone(),
            constant_name: op.metadata.constant_name.clone(),
            hash,
            body,
            origin_file: op.source.path().display().to_string(),
            origin_line: op.metadata.line,
            module: operation_module_label(op.source.path()),
        };
        (destination, record)
    }

    /// Appends `__typename` to `set` unless it already selects a `__` field,
    /// then recurses.
    fn add_typename(&self, set: &mut SelectionSet, typename: Name) {
        for selection in &mut set.selections {
            self.add_typename_below(selection, typename);
        }
        let introspects = set.selections.iter().any(|selection| match selection {
            Selection::Field(field) => self
                .interner
                .resolve(field.name.value)
                .is_some_and(|name| name.starts_with("__")),
            _ => false,
        });
        if !introspects {
            set.selections.push(Selection::Field(Field {
                alias: None,
                name: typename,
                arguments: Vec::new(),
                directives: Vec::new(),
                selection_set: None,
                span: Span::default(),
            }));
        }
    }

    fn add_typename_below(&self, selection: &mut Selection, typename: Name) {
        match selection {
            Selection::Field(field) => {
                if let Some(set) = &mut field.selection_set {
                    self.add_typename(set, typename);
                }
            }
            Selection::InlineFragment(inline) => self.add_typename(&mut inline.selection_set, typename),
            Selection::FragmentSpread(_) => {}
        }
    }
}

fn operation_span(operation: &OperationDefinition) -> Span {
    operation.name.map_or(operation.span, |name| name.span)
}

fn dedup_keep_first(names: &mut Vec<String>) {
    let mut seen = FxHashSet::default();
    names.retain(|name| seen.insert(name.clone()));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(files: &[(&str, &str)]) -> CompileResult<Vec<OperationRegistry>> {
        let config = CompilerConfig::default();
        let inputs: Vec<_> = files
            .iter()
            .map(|(path, text)| OperationInput::plain(SourceFile::new(*path, *text)))
            .collect();
        OperationCompiler::new(&config).compile(&inputs)
    }

    #[test]
    fn whitespace_is_normalized_before_hashing() {
        assert_eq!(normalize("query X {  a\n b }"), normalize("query X { a b }"));
        assert_eq!(
            operation_hash("query X {  a\n b }"),
            operation_hash("query X { a b }")
        );
        assert_eq!(operation_hash("x").len(), 64);
    }

    #[test]
    fn hash_covers_the_normalized_body() {
        let registries = compile(&[(
            "ops.graphql",
            "query Q { me { ...F } }\nfragment F on User {\n\n  id   name }",
        )])
        .unwrap();
        let record = &registries[0].operations[0];
        assert!(record.body.contains('\n'));
        assert_eq!(record.hash, hex::encode(Sha256::digest(normalize(&record.body).as_bytes())));
        assert_eq!(
            normalize(&record.body),
            "query Q { me { ...F __typename } } fragment F on User { id name __typename }"
        );
    }

    #[test]
    fn typename_skips_operation_root() {
        let registries = compile(&[("ops.graphql", "query Me { me { id } }")]).unwrap();
        assert_eq!(
            registries[0].operations[0].body,
            "query Me {\n  me {\n    id\n    __typename\n  }\n}"
        );
    }

    #[test]
    fn typename_not_duplicated() {
        let registries =
            compile(&[("ops.graphql", "query Me { me { __typename id } node { ... on User { name } } }")]).unwrap();
        assert_eq!(
            registries[0].operations[0].body,
            "query Me {\n  me {\n    __typename\n    id\n  }\n  node {\n    ... on User {\n      name\n      __typename\n    }\n    __typename\n  }\n}"
        );
    }

    #[test]
    fn fragments_are_appended_deepest_first() {
        let registries = compile(&[(
            "ops.graphql",
            "query Q { me { ...F1 } }\nfragment F1 on User { id ...F2 }\nfragment F2 on User { name }",
        )])
        .unwrap();
        let body = &registries[0].operations[0].body;
        let f1 = body.find("fragment F1").unwrap();
        let f2 = body.find("fragment F2").unwrap();
        assert!(f2 < f1);
        assert_eq!(body.matches("fragment F2").count(), 1);
    }

    #[test]
    fn unknown_fragment_fails() {
        let err = compile(&[("ops.graphql", "query Q { me { ...Missing } }")]).unwrap_err();
        assert!(matches!(err, CompileError::UnknownFragment { ref fragment, ref operation, .. }
            if fragment == "Missing" && operation == "Q"));
    }

    #[test]
    fn uniqueness_is_per_kind() {
        let err = compile(&[
            ("a.graphql", "query GetUser { me }"),
            ("b.graphql", "query GetUser { me }"),
        ])
        .unwrap_err();
        match err {
            CompileError::DuplicateOperation { location, previous, .. } => {
                assert_eq!(location.path, "b.graphql");
                assert_eq!(previous.path, "a.graphql");
            }
            other => panic!("unexpected error {other}"),
        }

        let registries = compile(&[
            ("a.graphql", "query GetUser { me }"),
            ("b.graphql", "mutation GetUser { save }"),
        ])
        .unwrap();
        assert_eq!(registries[0].len(), 2);
    }

    #[test]
    fn anonymous_operations_fail() {
        let err = compile(&[("a.graphql", "{ me }")]).unwrap_err();
        assert_eq!(err.kind(), "anonymous_operation");
    }

    #[test]
    fn explicit_metadata_must_match() {
        let config = CompilerConfig::default();
        let input = OperationInput {
            documents: vec![SourceFile::new("src/users/gql.ts", "query GetUser { me }")],
            metadata: Some(Vec::new()),
        };
        let err = OperationCompiler::new(&config).compile(&[input]).unwrap_err();
        assert_eq!(err.kind(), "missing_metadata");
    }
}
