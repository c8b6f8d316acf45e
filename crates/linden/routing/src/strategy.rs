//! Path-to-URL resolution strategies.

use crate::RoutingError;
use std::fmt;
use std::sync::Arc;

/// Pure mapping from a resolver file path to its URL fragment. Invoked
/// exactly once per file at route-table construction time.
pub type CustomPathFn = dyn Fn(&str) -> String + Send + Sync;

/// How resolver file paths become URLs. Exactly one strategy is active for a
/// deployment, chosen at configuration time.
#[derive(Clone, Default)]
pub enum PathStrategy {
    /// Path relative to the nearest ancestor directory literally named
    /// `queries` or `mutations`, prefixed with `/api/rpc`.
    #[default]
    QueriesMutations,

    /// Path relative to the project root, extension stripped, no prefix.
    Root,

    /// Injected mapping. Must be deterministic and collision-free; duplicate
    /// outputs are rejected when the table is built.
    Custom(Arc<CustomPathFn>),
}

impl PathStrategy {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        PathStrategy::Custom(Arc::new(f))
    }

    /// Compute the URL for one resolver file path.
    pub fn resolve_url(&self, file_path: &str) -> Result<String, RoutingError> {
        let url = match self {
            PathStrategy::QueriesMutations => {
                let relative = after_convention_dir(file_path)
                    .ok_or_else(|| RoutingError::NoConventionDir(file_path.to_string()))?;
                format!("/api/rpc/{}", strip_extension(relative))
            }
            PathStrategy::Root => {
                let trimmed = file_path.trim_start_matches('/');
                format!("/{}", strip_extension(trimmed))
            }
            PathStrategy::Custom(f) => f(file_path),
        };

        if url.is_empty() || url == "/" || url == "/api/rpc/" {
            return Err(RoutingError::EmptyUrl(file_path.to_string()));
        }
        // The router mounts these verbatim; an unrooted path would only fail
        // later, inside the HTTP server, at startup.
        if !url.starts_with('/') {
            return Err(RoutingError::UnrootedUrl {
                url,
                file_path: file_path.to_string(),
            });
        }
        Ok(url)
    }
}

impl fmt::Debug for PathStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathStrategy::QueriesMutations => write!(f, "QueriesMutations"),
            PathStrategy::Root => write!(f, "Root"),
            PathStrategy::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// Everything after the deepest `queries` or `mutations` segment, or `None`
/// when the path has no such segment.
fn after_convention_dir(path: &str) -> Option<&str> {
    let segments: Vec<&str> = path.split('/').collect();
    let last = segments
        .iter()
        .rposition(|s| *s == "queries" || *s == "mutations")?;
    if last + 1 >= segments.len() {
        return None;
    }
    // Byte offset of the segment after the convention dir.
    let offset: usize = segments[..=last].iter().map(|s| s.len() + 1).sum();
    Some(&path[offset..])
}

/// Strip only the final extension: `a/b.test.ts` becomes `a/b.test`.
fn strip_extension(path: &str) -> &str {
    let file_start = path.rfind('/').map_or(0, |i| i + 1);
    match path[file_start..].rfind('.') {
        Some(dot) if dot > 0 => &path[..file_start + dot],
        _ => path,
    }
}
