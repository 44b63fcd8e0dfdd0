//! External package aggregation.
//!
//! Collects the npm packages needed by a resolved component set and removes
//! those the consumer project already declares.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use serde::Deserialize;

use crate::entry::Registry;
use crate::error::Result;

/// Packages required by the shared `cn` utility file.
pub const UTILITY_PACKAGES: &[&str] = &["clsx", "tailwind-merge"];

/// Package names already declared by the consumer's `package.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstalledPackages {
    names: HashSet<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageJson {
    #[serde(default)]
    dependencies: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    dev_dependencies: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    peer_dependencies: serde_json::Map<String, serde_json::Value>,
}

impl InstalledPackages {
    /// Read the snapshot from `<project_dir>/package.json`.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(project_dir.join("package.json"))?;
        Self::parse(&content)
    }

    /// Parse the snapshot from `package.json` text.
    pub fn parse(package_json: &str) -> Result<Self> {
        let manifest: PackageJson = serde_json::from_str(package_json)?;
        let names = manifest
            .dependencies
            .keys()
            .chain(manifest.dev_dependencies.keys())
            .chain(manifest.peer_dependencies.keys())
            .cloned()
            .collect();
        Ok(InstalledPackages { names })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for InstalledPackages {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        InstalledPackages {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Compute the packages that still need installing for `resolved`.
///
/// Slugs missing from the registry contribute nothing; the resolver has
/// already rejected them.
pub fn aggregate<S: AsRef<str>>(
    resolved: &[S],
    registry: &Registry,
    installed: &InstalledPackages,
) -> BTreeSet<String> {
    resolved
        .iter()
        .filter_map(|slug| registry.get(slug.as_ref()))
        .flat_map(|entry| entry.dependencies.iter().map(String::as_str))
        .chain(UTILITY_PACKAGES.iter().copied())
        .filter(|name| !installed.contains(name))
        .map(str::to_string)
        .collect()
}
