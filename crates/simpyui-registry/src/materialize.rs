//! Writing component files into the consumer project.
//!
//! Materialization never overwrites: a destination that already exists is
//! skipped without fetching, so local edits survive re-running `add`. A file
//! that cannot be fetched or written is recorded as failed and the run
//! continues with the next file.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::client::RegistrySource;
use crate::entry::Registry;
use crate::error::{RegistryError, Result};
use crate::transform::strip_types;

/// The shared class-name helper every component imports from the utils
/// directory.
pub const UTILS_TEMPLATE: &str = r#"import { clsx, type ClassValue } from "clsx";
import { twMerge } from "tailwind-merge";

export function cn(...inputs: ClassValue[]) {
  return twMerge(clsx(inputs));
}
"#;

/// Where and how files are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializeOptions {
    /// Directory component files are written to.
    pub components_dir: PathBuf,
    /// Directory the `utils` helper is written to.
    pub utils_dir: PathBuf,
    /// Keep TypeScript sources; when false, strip types and rename to `.js`/`.jsx`.
    pub typescript: bool,
}

/// A component file and where it would land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    /// Owning component.
    pub slug: String,
    /// Registry-relative source path.
    pub source: String,
    /// Destination on disk.
    pub destination: PathBuf,
    /// Whether the destination already exists.
    pub exists: bool,
}

/// What happened to one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Downloaded,
    Skipped,
    Failed(String),
}

/// Per-file record of a materialization run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub slug: String,
    pub source: String,
    pub destination: PathBuf,
    pub outcome: FileOutcome,
}

/// Summary of a materialization run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterializeReport {
    /// Every component file, in resolution order.
    pub files: Vec<FileRecord>,
    /// Whether the utils helper was written during this run.
    pub utility_created: bool,
    /// Why the utils helper could not be written, if it failed.
    pub utility_error: Option<String>,
}

impl MaterializeReport {
    pub fn downloaded(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Downloaded))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Skipped))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&FileOutcome) -> bool) -> usize {
        self.files.iter().filter(|f| pred(&f.outcome)).count()
    }
}

/// Destination path for a registry file: its base name under the
/// components directory, with the extension swapped in JavaScript mode.
pub fn destination_for(file: &str, options: &MaterializeOptions) -> Option<PathBuf> {
    let name = Path::new(file).file_name()?.to_str()?;
    let name = if options.typescript {
        name.to_string()
    } else {
        javascript_name(name)
    };
    Some(options.components_dir.join(name))
}

/// Path of the utils helper for these options.
pub fn utility_path(options: &MaterializeOptions) -> PathBuf {
    let name = if options.typescript { "utils.ts" } else { "utils.js" };
    options.utils_dir.join(name)
}

fn javascript_name(name: &str) -> String {
    if let Some(stem) = name.strip_suffix(".tsx") {
        format!("{stem}.jsx")
    } else if let Some(stem) = name.strip_suffix(".ts") {
        format!("{stem}.js")
    } else {
        name.to_string()
    }
}

fn is_typescript_source(file: &str) -> bool {
    file.ends_with(".ts") || file.ends_with(".tsx")
}

/// List the files `resolved` would write, without touching the network.
///
/// A destination claimed by an earlier file in the plan counts as existing,
/// since that earlier file is written first.
pub fn plan<S: AsRef<str>>(
    resolved: &[S],
    registry: &Registry,
    options: &MaterializeOptions,
) -> Vec<PlannedFile> {
    let mut planned = Vec::new();
    let mut claimed = HashSet::new();
    for slug in resolved {
        let Some(entry) = registry.get(slug.as_ref()) else {
            continue;
        };
        for file in &entry.files {
            let Some(destination) = destination_for(file, options) else {
                warn!(slug = %entry.slug, file = %file, "registry file has no file name; ignoring");
                continue;
            };
            let exists = destination.exists() || !claimed.insert(destination.clone());
            planned.push(PlannedFile {
                slug: entry.slug.clone(),
                source: file.clone(),
                exists,
                destination,
            });
        }
    }
    planned
}

/// Write the utils helper unless it already exists. Returns whether it was
/// created.
pub fn ensure_utility(options: &MaterializeOptions) -> Result<bool> {
    let path = utility_path(options);
    if path.exists() {
        debug!(path = %path.display(), "utils helper already present");
        return Ok(false);
    }

    let content = if options.typescript {
        UTILS_TEMPLATE.to_string()
    } else {
        strip_types(UTILS_TEMPLATE)
    };
    write_file(&path, &content)?;
    info!(path = %path.display(), "created utils helper");
    Ok(true)
}

/// Fetch and write every file of the resolved components.
pub fn materialize<S: AsRef<str>>(
    resolved: &[S],
    registry: &Registry,
    source: &dyn RegistrySource,
    options: &MaterializeOptions,
) -> Result<MaterializeReport> {
    let (utility_created, utility_error) = match ensure_utility(options) {
        Ok(created) => (created, None),
        Err(e) => {
            warn!(error = %e, "utils helper failed");
            (false, Some(e.to_string()))
        }
    };

    let mut files = Vec::new();
    for planned in plan(resolved, registry, options) {
        // Re-checked here: an earlier file in this run may have taken the path.
        let outcome = if planned.destination.exists() {
            debug!(path = %planned.destination.display(), "exists, skipping");
            FileOutcome::Skipped
        } else {
            match fetch_and_write(&planned, source, options) {
                Ok(()) => {
                    info!(slug = %planned.slug, path = %planned.destination.display(), "wrote file");
                    FileOutcome::Downloaded
                }
                Err(e) => {
                    warn!(slug = %planned.slug, file = %planned.source, error = %e, "file failed");
                    FileOutcome::Failed(e.to_string())
                }
            }
        };
        files.push(FileRecord {
            slug: planned.slug,
            source: planned.source,
            destination: planned.destination,
            outcome,
        });
    }

    Ok(MaterializeReport {
        files,
        utility_created,
        utility_error,
    })
}

fn fetch_and_write(
    planned: &PlannedFile,
    source: &dyn RegistrySource,
    options: &MaterializeOptions,
) -> Result<()> {
    let text = source.fetch_file(&planned.source)?;
    let text = if !options.typescript && is_typescript_source(&planned.source) {
        strip_types(&text)
    } else {
        text
    };
    write_file(&planned.destination, &text)
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| RegistryError::Write {
            path: parent.to_path_buf(),
            detail: format!("creating directory: {e}"),
        })?;
    }
    std::fs::write(path, content).map_err(|e| RegistryError::Write {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::*;
    use crate::entry::RegistryEntry;

    /// In-memory source that records which files were requested.
    struct MemorySource {
        files: HashMap<String, String>,
        requested: RefCell<Vec<String>>,
    }

    impl MemorySource {
        fn new(files: &[(&str, &str)]) -> Self {
            MemorySource {
                files: files
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                requested: RefCell::new(Vec::new()),
            }
        }
    }

    impl RegistrySource for MemorySource {
        fn fetch_registry(&self) -> Result<Registry> {
            Ok(Registry::default())
        }

        fn fetch_file(&self, path: &str) -> Result<String> {
            self.requested.borrow_mut().push(path.to_string());
            self.files
                .get(path)
                .cloned()
                .ok_or_else(|| RegistryError::Fetch {
                    location: path.to_string(),
                    detail: "404".to_string(),
                })
        }

        fn location(&self) -> String {
            "memory".to_string()
        }
    }

    fn registry() -> Registry {
        let mut ripple = RegistryEntry::new("ripple", "Ripple", "Effects");
        ripple.files = vec!["src/registry/ripple/ripple.tsx".into()];
        let mut button = RegistryEntry::new("button", "Button", "Buttons");
        button.files = vec![
            "src/registry/button/button.tsx".into(),
            "src/registry/button/button-variants.ts".into(),
        ];
        button.internal = vec!["ripple".into()];
        Registry::from_entries(vec![ripple, button]).unwrap()
    }

    fn options(root: &Path, typescript: bool) -> MaterializeOptions {
        MaterializeOptions {
            components_dir: root.join("src/components/ui"),
            utils_dir: root.join("src/lib"),
            typescript,
        }
    }

    fn all_sources() -> MemorySource {
        MemorySource::new(&[
            ("src/registry/ripple/ripple.tsx", "export function Ripple(props: RippleProps) {}\n"),
            ("src/registry/button/button.tsx", "export const Button = () => null;\n"),
            ("src/registry/button/button-variants.ts", "export const variants: string[] = [];\n"),
        ])
    }

    #[test]
    fn writes_all_files_in_resolution_order() {
        let dir = tempfile::tempdir().unwrap();
        let opts = options(dir.path(), true);
        let source = all_sources();

        let report = materialize(&["ripple", "button"], &registry(), &source, &opts).unwrap();

        assert_eq!(report.downloaded(), 3);
        assert_eq!(report.skipped(), 0);
        assert!(report.utility_created);
        assert_eq!(report.files[0].slug, "ripple");
        assert!(dir.path().join("src/components/ui/button.tsx").is_file());
        assert!(dir.path().join("src/components/ui/button-variants.ts").is_file());
        assert!(dir.path().join("src/lib/utils.ts").is_file());
    }

    #[test]
    fn existing_files_are_skipped_and_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let opts = options(dir.path(), true);
        let existing = dir.path().join("src/components/ui/button.tsx");
        std::fs::create_dir_all(existing.parent().unwrap()).unwrap();
        std::fs::write(&existing, "// my local edits\n").unwrap();
        let source = all_sources();

        let report = materialize(&["ripple", "button"], &registry(), &source, &opts).unwrap();

        assert_eq!(report.skipped(), 1);
        assert_eq!(report.downloaded(), 2);
        assert_eq!(std::fs::read_to_string(&existing).unwrap(), "// my local edits\n");
        let skipped = report
            .files
            .iter()
            .find(|f| f.destination == existing)
            .unwrap();
        assert_eq!(skipped.outcome, FileOutcome::Skipped);
        assert!(!source
            .requested
            .borrow()
            .contains(&"src/registry/button/button.tsx".to_string()));
    }

    #[test]
    fn fetch_failure_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let opts = options(dir.path(), true);
        let source = MemorySource::new(&[(
            "src/registry/button/button.tsx",
            "export const Button = () => null;\n",
        )]);

        let report = materialize(&["ripple", "button"], &registry(), &source, &opts).unwrap();

        assert_eq!(report.failed(), 2);
        assert_eq!(report.downloaded(), 1);
        assert!(!dir.path().join("src/components/ui/ripple.tsx").exists());
        assert!(dir.path().join("src/components/ui/button.tsx").is_file());
    }

    #[test]
    fn shared_base_name_keeps_first_file() {
        let dir = tempfile::tempdir().unwrap();
        let opts = options(dir.path(), true);
        let mut a = RegistryEntry::new("a", "A", "Basics");
        a.files = vec!["src/registry/a/index.tsx".into()];
        let mut b = RegistryEntry::new("b", "B", "Basics");
        b.files = vec!["src/registry/b/index.tsx".into()];
        let registry = Registry::from_entries(vec![a, b]).unwrap();
        let source = MemorySource::new(&[
            ("src/registry/a/index.tsx", "// from a\n"),
            ("src/registry/b/index.tsx", "// from b\n"),
        ]);

        let report = materialize(&["a", "b"], &registry, &source, &opts).unwrap();

        assert_eq!(report.downloaded(), 1);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.files[1].outcome, FileOutcome::Skipped);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("src/components/ui/index.tsx")).unwrap(),
            "// from a\n"
        );
        assert!(!source
            .requested
            .borrow()
            .contains(&"src/registry/b/index.tsx".to_string()));
    }

    #[test]
    fn same_file_listed_twice_is_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let opts = options(dir.path(), true);
        let mut ripple = RegistryEntry::new("ripple", "Ripple", "Effects");
        ripple.files = vec!["src/registry/ripple/ripple.tsx".into()];
        let mut wave = RegistryEntry::new("wave", "Wave", "Effects");
        wave.files = vec!["src/registry/ripple/ripple.tsx".into()];
        let registry = Registry::from_entries(vec![ripple, wave]).unwrap();
        let source = all_sources();

        let report = materialize(&["ripple", "wave"], &registry, &source, &opts).unwrap();

        assert_eq!(report.downloaded(), 1);
        assert_eq!(report.skipped(), 1);
        assert_eq!(source.requested.borrow().len(), 1);
    }

    #[test]
    fn plan_marks_claimed_destinations() {
        let dir = tempfile::tempdir().unwrap();
        let opts = options(dir.path(), true);
        let mut a = RegistryEntry::new("a", "A", "Basics");
        a.files = vec!["src/registry/a/index.tsx".into()];
        let mut b = RegistryEntry::new("b", "B", "Basics");
        b.files = vec!["src/registry/b/index.tsx".into()];
        let registry = Registry::from_entries(vec![a, b]).unwrap();

        let planned = plan(&["a", "b"], &registry, &opts);
        assert!(!planned[0].exists);
        assert!(planned[1].exists);
    }

    #[test]
    fn utility_failure_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let opts = options(dir.path(), true);
        // A plain file where the utils directory should be.
        std::fs::create_dir_all(dir.path().join("src")).unwrap();
        std::fs::write(&opts.utils_dir, "").unwrap();
        let source = all_sources();

        let report = materialize(&["ripple"], &registry(), &source, &opts).unwrap();

        assert!(!report.utility_created);
        assert!(report.utility_error.is_some());
        assert_eq!(report.downloaded(), 1);
        assert!(dir.path().join("src/components/ui/ripple.tsx").is_file());
    }

    #[test]
    fn javascript_mode_renames_and_strips() {
        let dir = tempfile::tempdir().unwrap();
        let opts = options(dir.path(), false);
        let source = all_sources();

        let report = materialize(&["ripple", "button"], &registry(), &source, &opts).unwrap();
        assert_eq!(report.downloaded(), 3);

        let ripple = std::fs::read_to_string(dir.path().join("src/components/ui/ripple.jsx")).unwrap();
        assert_eq!(ripple, "export function Ripple(props) {}\n");
        let variants =
            std::fs::read_to_string(dir.path().join("src/components/ui/button-variants.js")).unwrap();
        assert_eq!(variants, "export const variants = [];\n");

        let utils = std::fs::read_to_string(dir.path().join("src/lib/utils.js")).unwrap();
        assert!(utils.contains("import { clsx } from \"clsx\";"));
        assert!(utils.contains("export function cn(...inputs) {"));
    }

    #[test]
    fn utility_not_recreated() {
        let dir = tempfile::tempdir().unwrap();
        let opts = options(dir.path(), true);
        std::fs::create_dir_all(&opts.utils_dir).unwrap();
        std::fs::write(utility_path(&opts), "// custom cn\n").unwrap();

        assert!(!ensure_utility(&opts).unwrap());
        assert_eq!(
            std::fs::read_to_string(utility_path(&opts)).unwrap(),
            "// custom cn\n"
        );
    }

    #[test]
    fn plan_reports_existing_destinations() {
        let dir = tempfile::tempdir().unwrap();
        let opts = options(dir.path(), true);
        std::fs::create_dir_all(&opts.components_dir).unwrap();
        std::fs::write(opts.components_dir.join("ripple.tsx"), "").unwrap();

        let planned = plan(&["ripple", "button"], &registry(), &opts);
        assert_eq!(planned.len(), 3);
        assert!(planned[0].exists);
        assert!(!planned[1].exists);
    }

    #[test]
    fn destination_swaps_extensions() {
        let opts = MaterializeOptions {
            components_dir: PathBuf::from("components/ui"),
            utils_dir: PathBuf::from("lib"),
            typescript: false,
        };
        assert_eq!(
            destination_for("src/registry/a/a.tsx", &opts).unwrap(),
            PathBuf::from("components/ui/a.jsx")
        );
        assert_eq!(
            destination_for("src/registry/a/hooks.ts", &opts).unwrap(),
            PathBuf::from("components/ui/hooks.js")
        );
        assert_eq!(
            destination_for("src/registry/a/a.css", &opts).unwrap(),
            PathBuf::from("components/ui/a.css")
        );
        assert_eq!(utility_path(&opts), PathBuf::from("lib/utils.js"));
    }
}
