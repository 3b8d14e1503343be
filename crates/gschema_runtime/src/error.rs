//! Runtime errors.

use gschema_descriptor::TypeKind;
use thiserror::Error;

/// Schema assembly failures. All of them are fatal for the request that hit
/// them; nothing is retried or substituted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("unknown type `{0}`")]
    UnknownType(String),

    #[error("no resolver for field `{type_name}.{field}`")]
    MissingFieldResolver { type_name: String, field: String },

    #[error("unknown directive `@{0}`")]
    UnknownDirective(String),

    #[error("invalid setup for directive `@{name}`: {reason}")]
    InvalidDirectiveSetup { name: String, reason: String },

    #[error("nothing is bound to {reference}")]
    UnresolvedBinding { reference: String },

    #[error("{reference} is bound to a {found}, expected a {expected}")]
    BindingMismatch {
        reference: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("field `{field}` of `{type_name}` is contributed by more than one module")]
    DuplicateField { type_name: String, field: String },

    #[error("partial descriptors of `{type_name}` disagree on kind ({first} and {second})")]
    KindMismatch {
        type_name: String,
        first: TypeKind,
        second: TypeKind,
    },
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Error surfaced to the execution engine from a field resolution.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolverError {
    #[error(transparent)]
    Schema(#[from] RuntimeError),

    #[error("missing required argument `{0}`")]
    MissingArgument(String),

    #[error("failed to parse argument `{0}`: {1}")]
    ArgumentParse(String, String),

    #[error("{0}")]
    Custom(String),
}

impl ResolverError {
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }
}
