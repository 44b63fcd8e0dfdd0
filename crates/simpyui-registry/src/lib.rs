//! Component registry for the SimpyUI CLI.
//!
//! Everything between "the user named some components" and "files are on
//! disk": loading the registry document, resolving internal dependencies,
//! aggregating npm packages, and materializing source files.
//!
//! # Pipeline
//!
//! 1. **Registry** — parsed once per run and passed by reference
//! 2. **Resolution** — requested slugs expanded to their internal closure,
//!    dependencies first
//! 3. **Aggregation** — external packages of the resolved set, minus what the
//!    project already declares
//! 4. **Materialization** — each file fetched from the registry source and
//!    written unless it already exists

pub mod client;
pub mod entry;
pub mod error;
pub mod materialize;
pub mod packages;
pub mod resolution;
pub mod transform;
pub mod tree;

// Re-exports for convenience.
pub use client::{open, HttpRegistry, LocalRegistry, RegistrySource, DEFAULT_REGISTRY_URL};
pub use entry::{Registry, RegistryEntry};
pub use error::{RegistryError, Result};
pub use materialize::{
    ensure_utility, materialize, plan, FileOutcome, MaterializeOptions, MaterializeReport,
    PlannedFile,
};
pub use packages::{aggregate, InstalledPackages, UTILITY_PACKAGES};
pub use resolution::{resolve, resolve_tree, ResolutionResult, ResolvedComponent};
pub use transform::strip_types;
pub use tree::{format_order, format_tree};
