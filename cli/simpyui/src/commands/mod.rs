//! CLI command implementations.

pub mod add;
pub mod diff;
pub mod init;
pub mod list;

use std::path::Path;

use anyhow::{bail, Context, Result};
use simpyui_registry::{Registry, RegistrySource};

/// Fetch and parse the registry document. Failure here is fatal.
pub(crate) fn load_registry(source: &dyn RegistrySource) -> Result<Registry> {
    source
        .fetch_registry()
        .with_context(|| format!("could not load component registry from {}", source.location()))
}

/// Reject the request if any name is not in the registry.
pub(crate) fn require_known(registry: &Registry, names: &[String]) -> Result<()> {
    let unknown = registry.unknown(names);
    if !unknown.is_empty() {
        bail!(
            "unknown component(s): {}\n\nRun `simpyui list` to see available components.",
            unknown.join(", ")
        );
    }
    Ok(())
}

/// Display form of `path` relative to the project directory.
pub(crate) fn display_path(project_dir: &Path, path: &Path) -> String {
    path.strip_prefix(project_dir)
        .unwrap_or(path)
        .display()
        .to_string()
}
