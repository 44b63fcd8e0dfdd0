//! `simpyui add` — copy components and their dependencies into the project.

use std::path::Path;

use anyhow::{bail, Context, Result};
use simpyui_registry::{
    aggregate, materialize, resolve, FileOutcome, InstalledPackages, MaterializeReport, Registry,
    RegistrySource,
};
use tracing::info;

use super::{display_path, require_known};
use crate::config::{ensure_project, ProjectConfig};
use crate::installer;

/// Flags for `simpyui add`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddOptions {
    /// Add every component in the registry.
    pub all: bool,
    /// Print the install command instead of running it.
    pub skip_install: bool,
}

/// Fail fast, before any network access, when nothing was requested.
pub fn check_usage(names: &[String], all: bool) -> Result<()> {
    if names.is_empty() && !all {
        bail!(
            "no components specified\n\n\
             Usage: simpyui add <component...>\n       \
             simpyui add --all\n\n\
             Run `simpyui list` to see available components."
        );
    }
    Ok(())
}

/// Run `simpyui add <component...> [--all] [--skip-install]`.
///
/// Unknown names are rejected before anything is written. Otherwise the
/// request is expanded to its internal closure, missing npm packages are
/// computed against `package.json`, files are written (never overwriting),
/// and the package manager is invoked.
pub fn run(
    project_dir: &Path,
    source: &dyn RegistrySource,
    registry: &Registry,
    names: &[String],
    options: AddOptions,
) -> Result<()> {
    check_usage(names, options.all)?;
    ensure_project(project_dir)?;

    let requested = if options.all {
        registry.slugs()
    } else {
        names.to_vec()
    };
    require_known(registry, &requested)?;

    let config = ProjectConfig::load_or_create(project_dir)?;

    let resolved = resolve(&requested, registry)?;
    info!(requested = requested.len(), resolved = resolved.len(), "resolved components");
    println!("Resolved: {}", resolved.join(", "));
    let extra: Vec<&str> = resolved
        .iter()
        .filter(|slug| !requested.contains(slug))
        .map(String::as_str)
        .collect();
    if !extra.is_empty() {
        println!("  including internal dependencies: {}", extra.join(", "));
    }

    let installed = InstalledPackages::load(project_dir).context("reading package.json")?;
    let needed = aggregate(&resolved, registry, &installed);

    let options_on_disk = config.materialize_options(project_dir);
    let report = materialize(&resolved, registry, source, &options_on_disk)?;
    print!("{}", format_report(project_dir, &config, &report));

    installer::install_or_report(project_dir, &needed, options.skip_install);

    if report.failed() > 0 {
        println!();
        println!(
            "{} file(s) could not be fetched. Re-run the same command to retry; existing files are kept.",
            report.failed()
        );
    }
    Ok(())
}

fn format_report(project_dir: &Path, config: &ProjectConfig, report: &MaterializeReport) -> String {
    let mut out = String::new();
    if report.utility_created {
        let ext = if config.typescript { "ts" } else { "js" };
        out.push_str(&format!("Created {}/utils.{ext}\n", config.utils_dir));
    }
    if let Some(reason) = &report.utility_error {
        out.push_str(&format!("  failed  {}/utils helper: {reason}\n", config.utils_dir));
    }
    for file in &report.files {
        let path = display_path(project_dir, &file.destination);
        match &file.outcome {
            FileOutcome::Downloaded => out.push_str(&format!("  wrote   {path}\n")),
            FileOutcome::Skipped => out.push_str(&format!("  skipped {path} (already exists)\n")),
            FileOutcome::Failed(reason) => {
                out.push_str(&format!("  failed  {path}: {reason}\n"))
            }
        }
    }
    out.push_str(&format!(
        "Files: {} downloaded, {} skipped, {} failed\n",
        report.downloaded(),
        report.skipped(),
        report.failed()
    ));
    out
}
