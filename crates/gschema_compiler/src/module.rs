//! Mapping of source paths to module names.

use crate::error::{CompileError, CompileResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How schema document paths map to module names.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModuleLayout {
    /// The module is the file stem: `users/users.graphql` is `users`.
    #[default]
    FileStem,
    /// Documents live at `<root_marker>/<m>/<m>.graphql`.
    Nested { root_marker: String },
}

impl ModuleLayout {
    pub fn module_for(&self, path: &Path) -> CompileResult<String> {
        let display = normalize(path);
        match self {
            Self::FileStem => path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .filter(|stem| !stem.is_empty())
                .map(str::to_string)
                .ok_or_else(|| invalid(&display, "path has no file name")),
            Self::Nested { root_marker } => {
                let prefix = format!("{root_marker}/");
                let needle = format!("/{root_marker}/");
                let rest = if let Some(rest) = display.strip_prefix(&prefix) {
                    rest
                } else if let Some(pos) = display.find(&needle) {
                    &display[pos + needle.len()..]
                } else {
                    return Err(invalid(
                        &display,
                        &format!("expected a `{root_marker}/` directory in the path"),
                    ));
                };

                let rest = rest.strip_suffix(".graphql").unwrap_or(rest);
                let parts: Vec<&str> = rest.split('/').collect();
                match parts.as_slice() {
                    [dir, file] if !dir.is_empty() && dir == file => Ok((*dir).to_string()),
                    _ => Err(invalid(
                        &display,
                        &format!("expected `{root_marker}/<module>/<module>.graphql`"),
                    )),
                }
            }
        }
    }
}

fn invalid(path: &str, reason: &str) -> CompileError {
    CompileError::InvalidModulePath {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}

fn normalize(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Diagnostic label for an operation's host file: lower-cased, relative to
/// the last `src/` directory, with `/gql.ts` dropped, the first `/` turned
/// into `-` and a leading `components-` removed.
#[must_use]
pub fn operation_module_label(path: &Path) -> String {
    let mut label = normalize(path).to_lowercase();
    if let Some(pos) = label.rfind("/src/") {
        label = label[pos + "/src/".len()..].to_string();
    } else if let Some(rest) = label.strip_prefix("src/") {
        label = rest.to_string();
    }
    if let Some(stripped) = label.strip_suffix("/gql.ts") {
        label.truncate(stripped.len());
    }
    let label = label.replacen('/', "-", 1);
    match label.strip_prefix("components-") {
        Some(rest) => rest.to_string(),
        None => label,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_stem_layout() {
        let layout = ModuleLayout::FileStem;
        assert_eq!(layout.module_for(Path::new("schema/users/users.graphql")).unwrap(), "users");
        assert_eq!(layout.module_for(Path::new("billing.graphql")).unwrap(), "billing");
    }

    #[test]
    fn nested_layout() {
        let layout = ModuleLayout::Nested {
            root_marker: "application".into(),
        };
        assert_eq!(
            layout
                .module_for(Path::new("/srv/app/application/users/users.graphql"))
                .unwrap(),
            "users"
        );
        assert_eq!(
            layout.module_for(Path::new("application/orders/orders.graphql")).unwrap(),
            "orders"
        );

        for bad in [
            "/srv/app/application/users/accounts.graphql",
            "/srv/app/application/users.graphql",
            "/srv/app/lib/users/users.graphql",
            "/srv/app/application/a/b/b.graphql",
        ] {
            let err = layout.module_for(Path::new(bad)).unwrap_err();
            assert_eq!(err.kind(), "invalid_module_path", "{bad}");
        }
    }

    #[test]
    fn operation_labels() {
        assert_eq!(operation_module_label(Path::new("/web/src/Users/gql.ts")), "users");
        assert_eq!(
            operation_module_label(Path::new("/web/src/components/Cart/gql.ts")),
            "cart"
        );
        assert_eq!(
            operation_module_label(Path::new("/web/src/pages/Account/gql.ts")),
            "pages-account"
        );
        assert_eq!(operation_module_label(Path::new("ops/me.graphql")), "ops-me.graphql");
    }
}
