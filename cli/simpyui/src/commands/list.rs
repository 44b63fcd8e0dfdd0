//! `simpyui list` — show the registry grouped by category.

use anyhow::Result;
use simpyui_registry::Registry;

/// Run `simpyui list`.
pub fn run(registry: &Registry) -> Result<()> {
    print!("{}", format_listing(registry));
    Ok(())
}

fn format_listing(registry: &Registry) -> String {
    if registry.is_empty() {
        return "No components in registry\n".to_string();
    }

    let width = registry
        .entries()
        .iter()
        .map(|entry| entry.slug.len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for (category, entries) in registry.categories() {
        out.push_str(&format!("{category}\n"));
        for entry in entries {
            if entry.description.is_empty() {
                out.push_str(&format!("  {}\n", entry.slug));
            } else {
                out.push_str(&format!("  {:<width$}  {}\n", entry.slug, entry.description));
            }
        }
        out.push('\n');
    }
    out.push_str(&format!(
        "{} components. Add one with: simpyui add <component>\n",
        registry.len()
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{fixtures, load_registry};

    #[test]
    fn listing_groups_by_category() {
        let root = tempfile::tempdir().unwrap();
        let registry = load_registry(&fixtures::registry_dir(root.path())).unwrap();

        let out = format_listing(&registry);
        let basics = out.find("Basics\n").unwrap();
        let layouts = out.find("Layouts\n").unwrap();
        let buttons = out.find("Buttons\n").unwrap();
        assert!(basics < layouts && layouts < buttons);
        assert!(out.contains("  a       Leaf component\n"));
        assert!(out.contains("4 components"));
    }

    #[test]
    fn listing_empty_registry() {
        let registry = Registry::parse("{}").unwrap();
        assert_eq!(format_listing(&registry), "No components in registry\n");
    }
}
