//! Per-file operation metadata.
//!
//! Metadata ties an operation `(kind, name)` to the constant it is exported
//! as and the registry destination it belongs to. Host source files carry it
//! next to embedded documents:
//!
//! ```text
//! /** @mDest admin */
//! export const GET_USER = gql`
//!   query GetUser($id: ID!) { user(id: $id) { name } }
//! `;
//! ```
//!
//! Plain `.graphql` files get metadata synthesized from operation names.

use gschema_core::{Interner, SourceFile};
use gschema_descriptor::OperationKind;
use gschema_syntax::{parse, Document, OperationType};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// Metadata for one exported operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationMetadata {
    pub kind: OperationKind,
    pub name: String,
    pub constant_name: String,
    pub destination: Option<String>,
    /// 1-based line of the declaration in its host file.
    pub line: u32,
}

/// The operation documents found in one host file plus their metadata.
#[derive(Debug, Clone)]
pub struct ExtractedFile {
    pub documents: Vec<SourceFile>,
    pub metadata: Vec<OperationMetadata>,
}

static EXPORT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)(?:/\*\*(?P<doc>(?:[^*]|\*+[^*/])*)\*+/\s*)?export\s+const\s+(?P<name>[A-Za-z_$][A-Za-z0-9_$]*)\s*(?::[^=]+)?=\s*gql\s*`(?P<body>[^`]*)`",
    )
    .expect("Invalid export regex")
});

static DESTINATION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@mDest\s+(?P<dest>[^\s*]+)").expect("Invalid destination regex"));

static INTERPOLATION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{[^}]*\}").expect("Invalid interpolation regex"));

fn line_at(text: &str, offset: usize) -> u32 {
    text.as_bytes()[..offset].iter().filter(|&&b| b == b'\n').count() as u32 + 1
}

/// The first named query or mutation of a template body.
fn exported_operation(body: &str) -> Option<(OperationKind, String)> {
    let interner = Interner::new();
    let document = parse(body, &interner).document;
    let exported = document.operations().find_map(|op| {
        let kind = match op.operation {
            OperationType::Query => OperationKind::Query,
            OperationType::Mutation => OperationKind::Mutation,
            OperationType::Subscription => return None,
        };
        Some((kind, interner.get(op.name?.value)))
    });
    exported
}

/// Extracts `export const NAME = gql\`...\`` templates from a host file.
///
/// `${...}` interpolations are blanked out; fragments they reference must be
/// present among the compiled documents.
#[must_use]
pub fn extract_embedded(path: &Path, text: &str) -> ExtractedFile {
    let mut documents = Vec::new();
    let mut metadata = Vec::new();

    for caps in EXPORT_PATTERN.captures_iter(text) {
        let (Some(name), Some(body)) = (caps.name("name"), caps.name("body")) else {
            continue;
        };
        let destination = caps
            .name("doc")
            .and_then(|doc| DESTINATION_PATTERN.captures(doc.as_str()))
            .and_then(|c| c.name("dest"))
            .map(|d| d.as_str().to_string());

        let body_text = INTERPOLATION_PATTERN
            .replace_all(body.as_str(), |c: &regex::Captures<'_>| " ".repeat(c[0].len()))
            .into_owned();

        if let Some((kind, operation)) = exported_operation(&body_text) {
            metadata.push(OperationMetadata {
                kind,
                name: operation,
                constant_name: name.as_str().to_string(),
                destination,
                line: line_at(text, name.start()),
            });
        }

        documents.push(SourceFile::new(path, body_text).starting_at_line(line_at(text, body.start())));
    }

    ExtractedFile {
        documents,
        metadata,
    }
}

/// Synthesizes metadata for every named query and mutation of a plain
/// operation document.
#[must_use]
pub fn synthesize_metadata(
    source: &SourceFile,
    document: &Document,
    interner: &Interner,
) -> Vec<OperationMetadata> {
    document
        .operations()
        .filter_map(|op| {
            let kind = match op.operation {
                OperationType::Query => OperationKind::Query,
                OperationType::Mutation => OperationKind::Mutation,
                OperationType::Subscription => return None,
            };
            let name = interner.get(op.name?.value);
            Some(OperationMetadata {
                kind,
                constant_name: operation_constant_name(kind, &name),
                name,
                destination: None,
                line: source.line_of(op.span),
            })
        })
        .collect()
}

/// `GetUser` becomes `QUERY_GET_USER`; names already carrying the prefix
/// keep it once.
#[must_use]
pub fn operation_constant_name(kind: OperationKind, name: &str) -> String {
    let constant = constant_case(name);
    let prefix = kind.constant_prefix();
    if constant.starts_with(prefix) {
        constant
    } else {
        format!("{prefix}{constant}")
    }
}

/// Converts `getUserHTMLById` to `GET_USER_HTML_BY_ID`.
#[must_use]
pub fn constant_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_ascii_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_ascii_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(char::is_ascii_lowercase);
            if prev.is_ascii_lowercase() || prev.is_ascii_digit() || (prev.is_ascii_uppercase() && next_is_lower) {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c.to_ascii_uppercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words.join("_")
}
