#![deny(unsafe_code)]
//! Build-time mapping from resolver file paths to URLs.
//!
//! A deployment picks exactly one [`PathStrategy`]. The strategy is applied
//! once per discovered resolver file while the [`RouteTable`] is built;
//! request-time lookup is a plain hash-map read.

use linden_types::{Resolver, ResolverKind};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

mod strategy;

pub use strategy::PathStrategy;

/// Errors surfaced while building the route table. All of these are
/// configuration errors: they fire at startup, never per-request.
#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    /// Default strategy found no `queries` or `mutations` ancestor directory.
    #[error("no 'queries' or 'mutations' directory in resolver path: {0}")]
    NoConventionDir(String),

    /// Strategy produced an empty URL fragment.
    #[error("resolver path produced an empty URL: {0}")]
    EmptyUrl(String),

    /// Custom strategy produced a URL without a leading `/`.
    #[error("resolver URL {url} (from {file_path}) must start with '/'")]
    UnrootedUrl { url: String, file_path: String },

    /// Two resolver files mapped to the same URL.
    #[error("duplicate resolver URL {url} (from {first} and {second})")]
    DuplicateUrl {
        url: String,
        first: String,
        second: String,
    },
}

/// One registered resolver: its URL, where it came from, and the handle
/// invoked per request.
#[derive(Clone)]
pub struct RouteEntry {
    pub url: String,
    pub file_path: String,
    pub kind: ResolverKind,
    pub resolver: Arc<dyn Resolver>,
}

impl fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteEntry")
            .field("url", &self.url)
            .field("file_path", &self.file_path)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Immutable URL-to-resolver map, frozen at construction.
pub struct RouteTable {
    entries: HashMap<String, RouteEntry>,
}

impl RouteTable {
    pub fn builder(strategy: PathStrategy) -> RouteTableBuilder {
        RouteTableBuilder {
            strategy,
            pending: Vec::new(),
        }
    }

    pub fn get(&self, url: &str) -> Option<&RouteEntry> {
        self.entries.get(url)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RouteEntry> {
        self.entries.values()
    }
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTable")
            .field("routes", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Collects resolver registrations, then applies the strategy and freezes
/// the table.
pub struct RouteTableBuilder {
    strategy: PathStrategy,
    pending: Vec<(String, Arc<dyn Resolver>)>,
}

impl RouteTableBuilder {
    /// Register a resolver discovered at `file_path`. The path is an opaque
    /// build-relative string; no filesystem access happens here.
    pub fn register(mut self, file_path: impl Into<String>, resolver: Arc<dyn Resolver>) -> Self {
        self.pending.push((file_path.into(), resolver));
        self
    }

    /// Apply the strategy once per registered file and freeze the table.
    pub fn build(self) -> Result<RouteTable, RoutingError> {
        let mut entries: HashMap<String, RouteEntry> = HashMap::with_capacity(self.pending.len());

        for (file_path, resolver) in self.pending {
            let url = self.strategy.resolve_url(&file_path)?;

            if let Some(existing) = entries.get(&url) {
                return Err(RoutingError::DuplicateUrl {
                    url,
                    first: existing.file_path.clone(),
                    second: file_path,
                });
            }

            let kind = resolver.kind();
            entries.insert(
                url.clone(),
                RouteEntry {
                    url,
                    file_path,
                    kind,
                    resolver,
                },
            );
        }

        Ok(RouteTable { entries })
    }
}
