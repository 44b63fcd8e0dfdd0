//! `components.json` project configuration.
//!
//! The file records where components and the utils helper are written and
//! whether the project uses TypeScript:
//!
//! ```json
//! {
//!   "componentsDir": "src/components/ui",
//!   "utilsDir": "src/lib",
//!   "typescript": true
//! }
//! ```
//!
//! Commands other than `init` create it with detected defaults when it is
//! missing. A file that no longer parses is moved aside to
//! `components.json.bak` and replaced with detected defaults.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use simpyui_registry::{InstalledPackages, MaterializeOptions};
use tracing::{info, warn};

/// Config file name, relative to the project directory.
pub const CONFIG_FILE: &str = "components.json";

/// Backup name for a config file that failed to parse.
pub const CONFIG_BACKUP: &str = "components.json.bak";

/// Resolved project configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    /// Component destination, relative to the project directory.
    pub components_dir: String,
    /// Utils helper destination, relative to the project directory.
    pub utils_dir: String,
    /// Whether sources are kept as TypeScript.
    pub typescript: bool,
}

/// On-disk shape. Older files lack `utilsDir`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredConfig {
    components_dir: String,
    #[serde(default)]
    utils_dir: Option<String>,
    #[serde(default)]
    typescript: Option<bool>,
}

/// What was found at `components.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigState {
    Absent,
    Loaded(ProjectConfig),
    Corrupt(String),
}

impl ProjectConfig {
    /// Defaults derived from the project layout.
    ///
    /// Next.js projects use `components/ui` and `lib`; everything else uses
    /// `src/components/ui` and `src/lib`. A Next.js project with a `src/`
    /// directory gets the `src/` prefix as well.
    pub fn detect(project_dir: &Path) -> Self {
        let is_next = InstalledPackages::load(project_dir)
            .map(|installed| installed.contains("next"))
            .unwrap_or(false);
        let has_src = project_dir.join("src").is_dir();

        let prefix = if !is_next || has_src { "src/" } else { "" };
        ProjectConfig {
            components_dir: format!("{prefix}components/ui"),
            utils_dir: format!("{prefix}lib"),
            typescript: project_dir.join("tsconfig.json").is_file(),
        }
    }

    /// Parse config text, backfilling missing fields from `defaults`.
    pub fn parse(content: &str, defaults: &ProjectConfig) -> Result<Self> {
        let stored: StoredConfig =
            serde_json::from_str(content).with_context(|| format!("parsing {CONFIG_FILE}"))?;
        Ok(ProjectConfig {
            components_dir: stored.components_dir,
            utils_dir: stored
                .utils_dir
                .unwrap_or_else(|| defaults.utils_dir.clone()),
            typescript: stored.typescript.unwrap_or(defaults.typescript),
        })
    }

    /// Inspect `components.json` in `project_dir`.
    pub fn read(project_dir: &Path) -> Result<ConfigState> {
        let path = project_dir.join(CONFIG_FILE);
        if !path.is_file() {
            return Ok(ConfigState::Absent);
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        match Self::parse(&content, &Self::detect(project_dir)) {
            Ok(config) => Ok(ConfigState::Loaded(config)),
            Err(e) => Ok(ConfigState::Corrupt(format!("{e:#}"))),
        }
    }

    /// Load the config, creating it from detected defaults when it is absent
    /// or corrupt.
    pub fn load_or_create(project_dir: &Path) -> Result<Self> {
        match Self::read(project_dir)? {
            ConfigState::Loaded(config) => Ok(config),
            ConfigState::Absent => {
                let config = Self::detect(project_dir);
                config.write(project_dir)?;
                info!(
                    components_dir = %config.components_dir,
                    utils_dir = %config.utils_dir,
                    typescript = config.typescript,
                    "created {CONFIG_FILE} with detected defaults"
                );
                println!("Created {CONFIG_FILE} with detected defaults");
                Ok(config)
            }
            ConfigState::Corrupt(reason) => {
                let path = project_dir.join(CONFIG_FILE);
                let backup = project_dir.join(CONFIG_BACKUP);
                std::fs::rename(&path, &backup).with_context(|| {
                    format!("moving {} to {}", path.display(), backup.display())
                })?;
                warn!(%reason, "{CONFIG_FILE} is invalid; saved as {CONFIG_BACKUP}");

                let config = Self::detect(project_dir);
                config.write(project_dir)?;
                println!(
                    "{CONFIG_FILE} could not be parsed; moved it to {CONFIG_BACKUP} and wrote defaults"
                );
                Ok(config)
            }
        }
    }

    /// Write as pretty-printed JSON.
    pub fn write(&self, project_dir: &Path) -> Result<()> {
        let path = project_dir.join(CONFIG_FILE);
        let mut content = serde_json::to_string_pretty(self).context("serializing config")?;
        content.push('\n');
        std::fs::write(&path, content).with_context(|| format!("writing {}", path.display()))
    }

    /// Absolute destinations for the materializer.
    pub fn materialize_options(&self, project_dir: &Path) -> MaterializeOptions {
        MaterializeOptions {
            components_dir: project_dir.join(&self.components_dir),
            utils_dir: project_dir.join(&self.utils_dir),
            typescript: self.typescript,
        }
    }
}

/// Require a `package.json` in the project directory.
pub fn ensure_project(project_dir: &Path) -> Result<PathBuf> {
    let manifest = project_dir.join("package.json");
    if !manifest.is_file() {
        bail!(
            "no package.json found in {}\n\n\
             Run this command from the root of your React project, or create one first:\n  \
             npm create vite@latest my-app -- --template react-ts",
            project_dir.display()
        );
    }
    Ok(manifest)
}
