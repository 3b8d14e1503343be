//! Parsing of compiler inputs.

use crate::error::{CompileError, CompileResult};
use gschema_core::{Interner, SourceFile};
use gschema_syntax::{parse, Document};
use rayon::prelude::*;

/// Parses every source in parallel, failing with the first syntax error in
/// input order.
pub(crate) fn parse_sources(sources: &[SourceFile], interner: &Interner) -> CompileResult<Vec<Document>> {
    let results: Vec<_> = sources
        .par_iter()
        .map(|source| parse(source.text(), interner))
        .collect();

    results
        .into_iter()
        .zip(sources)
        .map(|(result, source)| match result.diagnostics.errors().next() {
            Some(diagnostic) => Err(CompileError::from_diagnostic(source, diagnostic)),
            None => Ok(result.document),
        })
        .collect()
}
