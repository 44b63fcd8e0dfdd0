//! Registry document parsing.
//!
//! The registry is a single JSON object keyed by component slug:
//!
//! ```json
//! {
//!   "animated-button": {
//!     "name": "Animated Button",
//!     "category": "Buttons",
//!     "description": "Button with a shimmer hover state",
//!     "files": ["src/registry/animated-button/animated-button.tsx"],
//!     "dependencies": ["framer-motion"],
//!     "internal": []
//!   }
//! }
//! ```
//!
//! Document order is preserved so that `--all` and `list` behave
//! deterministically.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, Result};

/// One installable component.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegistryEntry {
    /// Unique identifier; the key of the registry object.
    #[serde(skip)]
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Grouping label used by `list`.
    #[serde(default = "default_category")]
    pub category: String,
    /// Short description.
    #[serde(default)]
    pub description: String,
    /// Source files, relative to the registry base.
    #[serde(default)]
    pub files: Vec<String>,
    /// External npm packages.
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Other component slugs that must be installed alongside.
    #[serde(default)]
    pub internal: Vec<String>,
}

fn default_category() -> String {
    "Other".to_string()
}

impl RegistryEntry {
    /// Build an entry with no files or dependencies.
    pub fn new(slug: &str, name: &str, category: &str) -> Self {
        RegistryEntry {
            slug: slug.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            description: String::new(),
            files: Vec::new(),
            dependencies: Vec::new(),
            internal: Vec::new(),
        }
    }
}

/// The loaded component catalog. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: Vec<RegistryEntry>,
    index: HashMap<String, usize>,
}

impl Registry {
    /// Parse a registry document.
    pub fn parse(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let serde_json::Value::Object(doc) = value else {
            return Err(RegistryError::InvalidRegistry {
                detail: "top-level value must be an object keyed by slug".to_string(),
            });
        };

        let mut entries = Vec::with_capacity(doc.len());
        for (slug, body) in doc {
            let mut entry: RegistryEntry =
                serde_json::from_value(body).map_err(|e| RegistryError::InvalidRegistry {
                    detail: format!("entry '{slug}': {e}"),
                })?;
            entry.slug = slug;
            entries.push(entry);
        }

        Self::from_entries(entries)
    }

    /// Build a registry from already-constructed entries, keeping their order.
    pub fn from_entries(entries: Vec<RegistryEntry>) -> Result<Self> {
        let mut index = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            if entry.slug.trim().is_empty() {
                return Err(RegistryError::InvalidRegistry {
                    detail: format!("entry '{}' has an empty slug", entry.name),
                });
            }
            if index.insert(entry.slug.clone(), i).is_some() {
                return Err(RegistryError::InvalidRegistry {
                    detail: format!("duplicate slug '{}'", entry.slug),
                });
            }
        }
        Ok(Registry { entries, index })
    }

    /// Look up an entry by slug.
    pub fn get(&self, slug: &str) -> Option<&RegistryEntry> {
        self.index.get(slug).map(|&i| &self.entries[i])
    }

    /// Check whether a slug is defined.
    pub fn contains(&self, slug: &str) -> bool {
        self.index.contains_key(slug)
    }

    /// All entries in document order.
    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    /// All slugs in document order.
    pub fn slugs(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.slug.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Requested names that are not in the registry, in request order, without
    /// repeats.
    pub fn unknown<S: AsRef<str>>(&self, requested: &[S]) -> Vec<String> {
        let mut missing: Vec<String> = Vec::new();
        for name in requested {
            let name = name.as_ref();
            if !self.contains(name) && !missing.iter().any(|m| m == name) {
                missing.push(name.to_string());
            }
        }
        missing
    }

    /// Entries grouped by category. Categories appear in the order they are
    /// first seen.
    pub fn categories(&self) -> Vec<(&str, Vec<&RegistryEntry>)> {
        let mut groups: Vec<(&str, Vec<&RegistryEntry>)> = Vec::new();
        for entry in &self.entries {
            match groups.iter_mut().find(|(c, _)| *c == entry.category) {
                Some((_, members)) => members.push(entry),
                None => groups.push((entry.category.as_str(), vec![entry])),
            }
        }
        groups
    }
}
