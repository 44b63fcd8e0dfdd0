//! Registry error types.

use std::path::PathBuf;

/// Errors that can occur during registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Component slug not present in the registry.
    #[error("unknown component: {slug}")]
    UnknownComponent { slug: String },

    /// A component lists an internal dependency the registry does not define.
    #[error("component '{referrer}' depends on unknown component '{slug}'")]
    MissingInternal { referrer: String, slug: String },

    /// Internal dependencies form a cycle.
    #[error("dependency cycle detected: {}", path.join(" -> "))]
    DependencyCycle { path: Vec<String> },

    /// The registry document is structurally invalid.
    #[error("invalid registry: {detail}")]
    InvalidRegistry { detail: String },

    /// A remote or local source could not be read.
    #[error("failed to fetch {location}: {detail}")]
    Fetch { location: String, detail: String },

    /// A materialized file could not be written.
    #[error("failed to write {path}: {detail}")]
    Write { path: PathBuf, detail: String },

    /// HTTP client error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
