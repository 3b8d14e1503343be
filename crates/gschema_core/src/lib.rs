//! Core utilities for gschema.
//!
//! - `span`: byte ranges inside a document
//! - `source`: source files, origin paths and line lookup
//! - `text`: string interning
//! - `diagnostics`: parser error reporting

pub mod diagnostics;
pub mod source;
pub mod span;
pub mod text;

pub use diagnostics::{Diagnostic, DiagnosticBag, DiagnosticSeverity, Label};
pub use source::{LineCol, LineIndex, Location, SourceFile};
pub use span::Span;
pub use text::{Interner, Text};
