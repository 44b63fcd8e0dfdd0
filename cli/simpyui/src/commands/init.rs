//! `simpyui init` — write `components.json`.

use std::path::Path;

use anyhow::{Context, Result};
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use simpyui_registry::ensure_utility;

use crate::config::{ensure_project, ProjectConfig, CONFIG_FILE};

/// Run `simpyui init [--yes] [--force]`.
///
/// Prompts for each setting with the detected value as default. `--yes`
/// takes the defaults without prompting; `--force` overwrites an existing
/// config without asking.
pub fn run(project_dir: &Path, yes: bool, force: bool) -> Result<()> {
    ensure_project(project_dir)?;

    let theme = ColorfulTheme::default();
    let config_path = project_dir.join(CONFIG_FILE);
    if config_path.is_file() && !force {
        let overwrite = if yes {
            false
        } else {
            Confirm::with_theme(&theme)
                .with_prompt(format!("{CONFIG_FILE} already exists. Overwrite it?"))
                .default(false)
                .interact()
                .context("prompt failed (use --force to overwrite non-interactively)")?
        };
        if !overwrite {
            println!("Kept existing {CONFIG_FILE}; nothing changed");
            if yes {
                println!("Pass --force to overwrite it.");
            }
            return Ok(());
        }
    }

    let detected = ProjectConfig::detect(project_dir);
    let config = if yes {
        detected
    } else {
        prompt_config(&theme, detected).context("prompt failed (use --yes to accept defaults)")?
    };

    write_config(project_dir, &config)
}

fn prompt_config(theme: &ColorfulTheme, detected: ProjectConfig) -> dialoguer::Result<ProjectConfig> {
    let components_dir: String = Input::with_theme(theme)
        .with_prompt("Where should components be written?")
        .default(detected.components_dir)
        .interact_text()?;
    let utils_dir: String = Input::with_theme(theme)
        .with_prompt("Where should the utils helper be written?")
        .default(detected.utils_dir)
        .interact_text()?;
    let typescript = Confirm::with_theme(theme)
        .with_prompt("Use TypeScript?")
        .default(detected.typescript)
        .interact()?;

    Ok(ProjectConfig {
        components_dir,
        utils_dir,
        typescript,
    })
}

/// Persist `config` and create the utils helper it points at.
pub(crate) fn write_config(project_dir: &Path, config: &ProjectConfig) -> Result<()> {
    config.write(project_dir)?;
    let utility_created = ensure_utility(&config.materialize_options(project_dir))
        .context("writing utils helper")?;

    println!("Wrote {CONFIG_FILE}");
    println!("  componentsDir: {}", config.components_dir);
    println!("  utilsDir:      {}", config.utils_dir);
    println!("  typescript:    {}", config.typescript);
    if utility_created {
        let ext = if config.typescript { "ts" } else { "js" };
        println!("Created {}/utils.{ext}", config.utils_dir);
    }
    println!();
    println!("Add components with: simpyui add <component>");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigState;

    fn project() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("package.json"),
            r#"{ "dependencies": { "react": "^18" } }"#,
        )
        .unwrap();
        dir
    }

    #[test]
    fn init_with_defaults() {
        let dir = project();
        run(dir.path(), true, false).unwrap();

        let ConfigState::Loaded(config) = ProjectConfig::read(dir.path()).unwrap() else {
            panic!("config not written");
        };
        assert_eq!(config.components_dir, "src/components/ui");
        assert!(!config.typescript);
        assert!(dir.path().join("src/lib/utils.js").is_file());
    }

    #[test]
    fn init_keeps_existing_config_without_force() {
        let dir = project();
        let existing = r#"{ "componentsDir": "custom", "utilsDir": "helpers", "typescript": true }"#;
        std::fs::write(dir.path().join(CONFIG_FILE), existing).unwrap();

        run(dir.path(), true, false).unwrap();
        assert_eq!(
            std::fs::read_to_string(dir.path().join(CONFIG_FILE)).unwrap(),
            existing
        );
    }

    #[test]
    fn init_force_overwrites() {
        let dir = project();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{ "componentsDir": "custom", "utilsDir": "helpers", "typescript": true }"#,
        )
        .unwrap();

        run(dir.path(), true, true).unwrap();
        let ConfigState::Loaded(config) = ProjectConfig::read(dir.path()).unwrap() else {
            panic!("config not written");
        };
        assert_eq!(config.components_dir, "src/components/ui");
    }

    #[test]
    fn init_requires_package_json() {
        let dir = tempfile::tempdir().unwrap();
        assert!(run(dir.path(), true, false).is_err());
        assert!(!dir.path().join(CONFIG_FILE).exists());
    }

    #[test]
    fn write_config_keeps_existing_utils() {
        let dir = project();
        std::fs::create_dir_all(dir.path().join("lib")).unwrap();
        std::fs::write(dir.path().join("lib/utils.ts"), "// mine\n").unwrap();

        let config = ProjectConfig {
            components_dir: "components/ui".into(),
            utils_dir: "lib".into(),
            typescript: true,
        };
        write_config(dir.path(), &config).unwrap();
        assert_eq!(
            std::fs::read_to_string(dir.path().join("lib/utils.ts")).unwrap(),
            "// mine\n"
        );
    }
}
