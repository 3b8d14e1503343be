//! Build-time compilers for gschema.
//!
//! - `schema`: schema documents to per-module descriptor tables
//! - `operations`: operation documents to persisted-operation registries
//! - `reference`: wiring reference parsing (`Di->users`, `Users::find`)
//! - `metadata`: operation metadata extraction from host source files
//! - `module`: source path to module name mapping
//! - `config`: compiler configuration

pub mod config;
pub mod error;
pub mod metadata;
pub mod module;
pub mod operations;
mod parse;
pub mod reference;
pub mod schema;

pub use config::{CompilerConfig, WiringDirectives};
pub use error::{CompileError, CompileResult};
pub use metadata::{extract_embedded, operation_constant_name, synthesize_metadata, ExtractedFile, OperationMetadata};
pub use module::{operation_module_label, ModuleLayout};
pub use operations::{normalize, operation_hash, OperationCompiler, OperationInput};
pub use reference::{parse_reference, ReferenceSyntax};
pub use schema::SchemaCompiler;
