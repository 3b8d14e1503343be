//! Parsing of wiring reference strings.
//!
//! Accepted forms:
//! - `Class::method`, `Class->method`, `Class::method()`: static method
//! - `Class::class`: constructor (the marker is configurable)
//! - `Di->service`: service locator member (the root token is configurable)

use gschema_descriptor::CallableRef;

/// Tokens that give a reference its meaning.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceSyntax<'a> {
    pub locator_token: &'a str,
    pub constructor_marker: &'a str,
}

impl Default for ReferenceSyntax<'static> {
    fn default() -> Self {
        Self {
            locator_token: "Di",
            constructor_marker: "class",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Separator {
    Static,
    Arrow,
}

/// Parses `reference`, returning the reason on failure.
pub fn parse_reference(reference: &str, syntax: ReferenceSyntax<'_>) -> Result<CallableRef, String> {
    let text = strip_call_parens(reference.trim());
    let (segments, separators) = split_segments(text);

    if segments.len() < 2 {
        return Err("expected a `::` or `->` separator".into());
    }
    if let Some(empty) = segments.iter().position(|s| s.is_empty()) {
        return Err(format!("segment {} is empty", empty + 1));
    }

    let method = segments[segments.len() - 1];
    if !is_identifier(method) {
        return Err(format!("`{method}` is not a valid method name"));
    }

    if segments[0] == syntax.locator_token {
        if segments.len() > 2 {
            return Err("nested service locator access is not supported".into());
        }
        return Ok(CallableRef::service(method));
    }

    if separators[..separators.len() - 1].contains(&Separator::Arrow) {
        return Err(format!(
            "instance access is only allowed on `{}`",
            syntax.locator_token
        ));
    }

    let class = segments[..segments.len() - 1].join("::");
    if let Some(bad) = segments[..segments.len() - 1]
        .iter()
        .find(|s| !is_class_name(s))
    {
        return Err(format!("`{bad}` is not a valid class name"));
    }

    if method == syntax.constructor_marker {
        Ok(CallableRef::constructor(class))
    } else {
        Ok(CallableRef::static_method(class, method))
    }
}

fn strip_call_parens(text: &str) -> &str {
    text.strip_suffix(')')
        .map(str::trim_end)
        .and_then(|t| t.strip_suffix('('))
        .map_or(text, str::trim_end)
}

fn split_segments(text: &str) -> (Vec<&str>, Vec<Separator>) {
    let mut segments = Vec::new();
    let mut separators = Vec::new();
    let mut start = 0;
    let bytes = text.as_bytes();
    let mut i = 0;
    while i + 1 < bytes.len() {
        let sep = match (bytes[i], bytes[i + 1]) {
            (b':', b':') => Some(Separator::Static),
            (b'-', b'>') => Some(Separator::Arrow),
            _ => None,
        };
        if let Some(sep) = sep {
            segments.push(text[start..i].trim());
            separators.push(sep);
            i += 2;
            start = i;
        } else {
            i += 1;
        }
    }
    segments.push(text[start..].trim());
    (segments, separators)
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

pub(crate) fn is_class_name(s: &str) -> bool {
    let s = s.strip_prefix('\\').unwrap_or(s);
    !s.is_empty() && s.split('\\').all(is_identifier)
}
