//! Compile-time errors.

use gschema_core::{Diagnostic, Location, SourceFile};
use gschema_descriptor::OperationKind;
use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

pub type CompileResult<T> = Result<T, CompileError>;

/// A fatal schema or operation compilation error.
///
/// Every variant names the offending type or operation and where it was
/// found.
#[derive(Debug, Clone, Error, MietteDiagnostic)]
pub enum CompileError {
    #[error("{location}: {message}")]
    #[diagnostic(code(gschema::syntax))]
    Syntax {
        location: Location,
        message: String,
    },

    #[error("{location}: malformed reference `{reference}` on `{type_name}`: {reason}")]
    #[diagnostic(
        code(gschema::malformed_reference),
        help("use `Class::method`, `Class->method()`, `Class::class` or `Di->service`")
    )]
    MalformedReference {
        type_name: String,
        reference: String,
        reason: String,
        location: Location,
    },

    #[error("{location}: `{type_name}` requires the @{directive} directive")]
    #[diagnostic(code(gschema::missing_directive))]
    MissingDirective {
        type_name: String,
        directive: String,
        location: Location,
    },

    #[error("{location}: type `{type_name}` is already defined at {previous}")]
    #[diagnostic(code(gschema::duplicate_type))]
    DuplicateType {
        type_name: String,
        location: Location,
        previous: Location,
    },

    #[error("{location}: cannot extend `{type_name}`: no {keyword} with that name is defined")]
    #[diagnostic(code(gschema::unknown_extension_target))]
    UnknownExtensionTarget {
        type_name: String,
        keyword: String,
        location: Location,
    },

    #[error("{location}: field `{type_name}.{field}` is also defined by module `{other_module}`")]
    #[diagnostic(code(gschema::duplicate_field))]
    DuplicateField {
        type_name: String,
        field: String,
        other_module: String,
        location: Location,
    },

    #[error("{location}: {kind} `{name}` is not unique, it is already defined at {previous}")]
    #[diagnostic(code(gschema::duplicate_operation))]
    DuplicateOperation {
        kind: OperationKind,
        name: String,
        location: Location,
        previous: Location,
    },

    #[error("{location}: unknown fragment `{fragment}` used in operation `{operation}`")]
    #[diagnostic(code(gschema::unknown_fragment))]
    UnknownFragment {
        fragment: String,
        operation: String,
        location: Location,
    },

    #[error("{location}: operations without a name are not supported")]
    #[diagnostic(code(gschema::anonymous_operation))]
    AnonymousOperation { location: Location },

    #[error("{location}: no metadata entry matches {kind} `{name}` in this file")]
    #[diagnostic(code(gschema::missing_metadata))]
    MissingMetadata {
        kind: String,
        name: String,
        location: Location,
    },

    #[error("{location}: unsupported default value for `{type_name}.{field}`: {reason}")]
    #[diagnostic(code(gschema::unsupported_default))]
    UnsupportedDefault {
        type_name: String,
        field: String,
        reason: String,
        location: Location,
    },

    #[error("invalid module path `{path}`: {reason}")]
    #[diagnostic(code(gschema::invalid_module_path))]
    InvalidModulePath { path: String, reason: String },
}

impl CompileError {
    /// Converts the first parser diagnostic of `source` into a syntax error.
    #[must_use]
    pub fn from_diagnostic(source: &SourceFile, diagnostic: &Diagnostic) -> Self {
        let span = diagnostic.primary_span().unwrap_or_default();
        Self::Syntax {
            location: source.location(span),
            message: format!("{} ({})", diagnostic.message(), diagnostic.code),
        }
    }

    /// Short machine-readable name of the error class.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Syntax { .. } => "syntax",
            Self::MalformedReference { .. } => "malformed_reference",
            Self::MissingDirective { .. } => "missing_directive",
            Self::DuplicateType { .. } => "duplicate_type",
            Self::UnknownExtensionTarget { .. } => "unknown_extension_target",
            Self::DuplicateField { .. } => "duplicate_field",
            Self::DuplicateOperation { .. } => "duplicate_operation",
            Self::UnknownFragment { .. } => "unknown_fragment",
            Self::AnonymousOperation { .. } => "anonymous_operation",
            Self::MissingMetadata { .. } => "missing_metadata",
            Self::UnsupportedDefault { .. } => "unsupported_default",
            Self::InvalidModulePath { .. } => "invalid_module_path",
        }
    }
}
