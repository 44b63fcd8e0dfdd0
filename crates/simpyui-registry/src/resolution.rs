//! Internal dependency resolution.
//!
//! Expands a set of requested component slugs into the closure of their
//! `internal` dependencies. Traversal is depth-first with post-order
//! insertion, so every component appears after everything it depends on.
//! A slug that is already resolved is not expanded again; a slug that is
//! reached while it is still being expanded is a cycle and fails loudly.

use std::collections::HashSet;

use tracing::debug;

use crate::entry::Registry;
use crate::error::{RegistryError, Result};

/// A resolved component in the dependency tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedComponent {
    /// Component slug.
    pub slug: String,
    /// Internal dependencies, expanded on first encounter only.
    pub internal: Vec<ResolvedComponent>,
    /// Whether this slug was already resolved earlier in the walk.
    pub shared: bool,
}

/// The result of dependency resolution.
#[derive(Debug, Clone, Default)]
pub struct ResolutionResult {
    /// One node per distinct requested slug, with nested internals.
    pub tree: Vec<ResolvedComponent>,
    /// Flat deduplicated slugs, dependencies before dependents.
    pub order: Vec<String>,
}

/// Resolve requested slugs to the ordered set of components to install.
pub fn resolve<S: AsRef<str>>(requested: &[S], registry: &Registry) -> Result<Vec<String>> {
    resolve_tree(requested, registry).map(|result| result.order)
}

/// Resolve requested slugs, keeping the nested tree for display.
pub fn resolve_tree<S: AsRef<str>>(
    requested: &[S],
    registry: &Registry,
) -> Result<ResolutionResult> {
    let mut resolver = Resolver {
        registry,
        resolved: HashSet::new(),
        visiting: Vec::new(),
        order: Vec::new(),
    };

    let mut seen_roots = HashSet::new();
    let mut tree = Vec::new();
    for slug in requested {
        let slug = slug.as_ref();
        if !seen_roots.insert(slug) {
            continue;
        }
        tree.push(resolver.visit(slug, None)?);
    }

    debug!(
        requested = requested.len(),
        resolved = resolver.order.len(),
        "resolved component set"
    );

    Ok(ResolutionResult {
        tree,
        order: resolver.order,
    })
}

struct Resolver<'a> {
    registry: &'a Registry,
    resolved: HashSet<String>,
    visiting: Vec<String>,
    order: Vec<String>,
}

impl Resolver<'_> {
    fn visit(&mut self, slug: &str, referrer: Option<&str>) -> Result<ResolvedComponent> {
        if self.resolved.contains(slug) {
            return Ok(ResolvedComponent {
                slug: slug.to_string(),
                internal: Vec::new(),
                shared: true,
            });
        }

        if let Some(pos) = self.visiting.iter().position(|s| s == slug) {
            let mut path = self.visiting[pos..].to_vec();
            path.push(slug.to_string());
            return Err(RegistryError::DependencyCycle { path });
        }

        let registry = self.registry;
        let entry = registry.get(slug).ok_or_else(|| match referrer {
            Some(referrer) => RegistryError::MissingInternal {
                referrer: referrer.to_string(),
                slug: slug.to_string(),
            },
            None => RegistryError::UnknownComponent {
                slug: slug.to_string(),
            },
        })?;

        self.visiting.push(slug.to_string());
        let mut internal = Vec::with_capacity(entry.internal.len());
        for dep in &entry.internal {
            internal.push(self.visit(dep, Some(slug))?);
        }
        self.visiting.pop();

        self.resolved.insert(slug.to_string());
        self.order.push(slug.to_string());

        Ok(ResolvedComponent {
            slug: slug.to_string(),
            internal,
            shared: false,
        })
    }
}
