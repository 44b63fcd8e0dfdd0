//! npm package installation through the project's package manager.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::process::Command;

use anyhow::{bail, Context, Result};
use tracing::{debug, warn};

/// Package manager in use by the consumer project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Bun,
    Pnpm,
    Yarn,
    Npm,
}

/// Lockfiles in priority order.
const LOCKFILES: &[(&str, PackageManager)] = &[
    ("bun.lockb", PackageManager::Bun),
    ("bun.lock", PackageManager::Bun),
    ("pnpm-lock.yaml", PackageManager::Pnpm),
    ("yarn.lock", PackageManager::Yarn),
];

impl PackageManager {
    /// Detect from the lockfile in `project_dir`, falling back to npm.
    pub fn detect(project_dir: &Path) -> Self {
        LOCKFILES
            .iter()
            .find(|(lockfile, _)| project_dir.join(lockfile).is_file())
            .map(|(_, manager)| *manager)
            .unwrap_or(PackageManager::Npm)
    }

    pub fn program(self) -> &'static str {
        match self {
            PackageManager::Bun => "bun",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Yarn => "yarn",
            PackageManager::Npm => "npm",
        }
    }

    fn install_verb(self) -> &'static str {
        match self {
            PackageManager::Npm => "install",
            _ => "add",
        }
    }

    /// Arguments for installing `packages`.
    pub fn install_args<'a>(self, packages: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        std::iter::once(self.install_verb().to_string())
            .chain(packages.into_iter().map(str::to_string))
            .collect()
    }

    /// The install command as the user would type it.
    pub fn command_line(self, packages: &BTreeSet<String>) -> String {
        let args = self.install_args(packages.iter().map(String::as_str));
        format!("{} {}", self.program(), args.join(" "))
    }

    // Package managers ship as .cmd shims on Windows.
    fn executable(self) -> String {
        if cfg!(windows) {
            format!("{}.cmd", self.program())
        } else {
            self.program().to_string()
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

/// Run the install command in `project_dir`, inheriting stdio.
pub fn install(project_dir: &Path, manager: PackageManager, packages: &BTreeSet<String>) -> Result<()> {
    if packages.is_empty() {
        return Ok(());
    }

    let args = manager.install_args(packages.iter().map(String::as_str));
    debug!(manager = %manager, ?args, dir = %project_dir.display(), "spawning installer");

    let status = Command::new(manager.executable())
        .args(&args)
        .current_dir(project_dir)
        .status()
        .with_context(|| format!("could not run {manager}"))?;

    if !status.success() {
        bail!("{manager} exited with {status}");
    }
    Ok(())
}

/// Install `packages`, or report that there is nothing to do.
///
/// A failed or skipped install never fails the command; the user is told
/// the exact command to run instead.
pub fn install_or_report(project_dir: &Path, packages: &BTreeSet<String>, skip: bool) {
    if packages.is_empty() {
        println!("All dependencies already installed");
        return;
    }

    let manager = PackageManager::detect(project_dir);
    let command = manager.command_line(packages);

    if skip {
        println!("Skipped installing dependencies. Run:");
        println!("  {command}");
        return;
    }

    println!("Installing dependencies with {manager}...");
    match install(project_dir, manager, packages) {
        Ok(()) => println!("Installed {} package(s)", packages.len()),
        Err(e) => {
            warn!(error = %format!("{e:#}"), "dependency install failed");
            println!("Could not install dependencies automatically. Run:");
            println!("  {command}");
        }
    }
}
