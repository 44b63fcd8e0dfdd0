//! `simpyui diff` — preview what `add` would do without writing anything.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use simpyui_registry::materialize::utility_path;
use simpyui_registry::{
    aggregate, format_tree, plan, resolve_tree, InstalledPackages, PlannedFile, Registry,
};

use super::{display_path, require_known};
use crate::config::{ensure_project, ProjectConfig};
use crate::installer::PackageManager;

/// Run `simpyui diff <component...>`.
pub fn run(project_dir: &Path, registry: &Registry, names: &[String]) -> Result<()> {
    if names.is_empty() {
        bail!("no components specified\n\nUsage: simpyui diff <component...>");
    }
    ensure_project(project_dir)?;
    require_known(registry, names)?;

    let config = ProjectConfig::load_or_create(project_dir)?;
    let resolution = resolve_tree(names, registry)?;
    let options = config.materialize_options(project_dir);
    let planned = plan(&resolution.order, registry, &options);

    let installed = InstalledPackages::load(project_dir).context("reading package.json")?;
    let needed = aggregate(&resolution.order, registry, &installed);

    print!("{}", format_tree(&resolution));
    println!();
    let utility = utility_path(&options);
    let utility = (!utility.exists()).then(|| display_path(project_dir, &utility));
    print!(
        "{}",
        format_changes(project_dir, utility.as_deref(), &planned, &needed, PackageManager::detect(project_dir))
    );
    Ok(())
}

fn format_changes(
    project_dir: &Path,
    utility: Option<&str>,
    planned: &[PlannedFile],
    needed: &BTreeSet<String>,
    manager: PackageManager,
) -> String {
    let mut out = String::from("Files:\n");
    if let Some(utility) = utility {
        out.push_str(&format!("  + {utility}\n"));
    }
    for file in planned {
        let path = display_path(project_dir, &file.destination);
        if file.exists {
            out.push_str(&format!("  = {path} (exists, would be skipped)\n"));
        } else {
            out.push_str(&format!("  + {path}\n"));
        }
    }

    out.push_str("\nPackages:\n");
    if needed.is_empty() {
        out.push_str("  All dependencies already installed\n");
    } else {
        for package in needed {
            out.push_str(&format!("  + {package}\n"));
        }
        out.push_str(&format!("\nWould run: {}\n", manager.command_line(needed)));
    }
    out
}
