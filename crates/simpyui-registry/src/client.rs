//! Registry sources: where the registry document and component files come from.
//!
//! The `RegistrySource` trait abstracts over the remote GitHub-hosted
//! registry (`HttpRegistry`) and a registry checked out on disk
//! (`LocalRegistry`), which is also what the tests use.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::entry::Registry;
use crate::error::{RegistryError, Result};

/// Default location of the published registry document.
pub const DEFAULT_REGISTRY_URL: &str =
    "https://raw.githubusercontent.com/simpyui/simpyui/main/registry.json";

/// Abstract registry source.
pub trait RegistrySource {
    /// Fetch and parse the registry document.
    fn fetch_registry(&self) -> Result<Registry>;

    /// Fetch the text of one component file, by its registry-relative path.
    fn fetch_file(&self, path: &str) -> Result<String>;

    /// Human-readable location, for messages.
    fn location(&self) -> String;
}

/// Pick a source for a `--registry` value: `http(s)://` URLs are fetched
/// remotely, anything else is a path to a registry file on disk.
pub fn open(location: &str) -> Result<Box<dyn RegistrySource>> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Ok(Box::new(HttpRegistry::new(location)?))
    } else {
        Ok(Box::new(LocalRegistry::new(PathBuf::from(location))))
    }
}

/// Registry served over HTTP, with component files next to the document.
pub struct HttpRegistry {
    client: reqwest::blocking::Client,
    registry_url: String,
    base_url: String,
}

impl HttpRegistry {
    /// Create a source for the registry document at `registry_url`.
    pub fn new(registry_url: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("simpyui-cli/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(HttpRegistry {
            client,
            registry_url: registry_url.to_string(),
            base_url: base_of(registry_url).to_string(),
        })
    }

    /// URL a registry-relative file path is fetched from.
    pub fn file_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn get_text(&self, url: &str) -> Result<String> {
        debug!(url, "GET");
        let response = self.client.get(url).send().map_err(|e| RegistryError::Fetch {
            location: url.to_string(),
            detail: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RegistryError::Fetch {
                location: url.to_string(),
                detail: format!("server returned {status}"),
            });
        }

        response.text().map_err(|e| RegistryError::Fetch {
            location: url.to_string(),
            detail: e.to_string(),
        })
    }
}

impl RegistrySource for HttpRegistry {
    fn fetch_registry(&self) -> Result<Registry> {
        info!(url = %self.registry_url, "fetching registry");
        let body = self.get_text(&self.registry_url)?;
        Registry::parse(&body)
    }

    fn fetch_file(&self, path: &str) -> Result<String> {
        self.get_text(&self.file_url(path))
    }

    fn location(&self) -> String {
        self.registry_url.clone()
    }
}

/// Strip the last path segment of a URL.
fn base_of(url: &str) -> &str {
    let trimmed = url.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(i) if i > "https://".len() => &trimmed[..i],
        _ => trimmed,
    }
}

/// A registry document on the local filesystem.
///
/// Component file paths are resolved relative to the directory holding the
/// document:
/// ```text
/// <root>/
///   registry.json
///   src/registry/<slug>/<file>.tsx
/// ```
pub struct LocalRegistry {
    registry_path: PathBuf,
    root: PathBuf,
}

impl LocalRegistry {
    /// Create a local source. `path` may be the registry file itself or the
    /// directory containing `registry.json`.
    pub fn new(path: PathBuf) -> Self {
        let registry_path = if path.is_dir() {
            path.join("registry.json")
        } else {
            path
        };
        let root = registry_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        LocalRegistry {
            registry_path,
            root,
        }
    }

    /// Get the root directory files are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl RegistrySource for LocalRegistry {
    fn fetch_registry(&self) -> Result<Registry> {
        info!(path = %self.registry_path.display(), "reading registry");
        let body =
            std::fs::read_to_string(&self.registry_path).map_err(|e| RegistryError::Fetch {
                location: self.registry_path.display().to_string(),
                detail: e.to_string(),
            })?;
        Registry::parse(&body)
    }

    fn fetch_file(&self, path: &str) -> Result<String> {
        let full = self.root.join(path.trim_start_matches('/'));
        std::fs::read_to_string(&full).map_err(|e| RegistryError::Fetch {
            location: full.display().to_string(),
            detail: e.to_string(),
        })
    }

    fn location(&self) -> String {
        self.registry_path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_registry(dir: &Path) {
        std::fs::write(
            dir.join("registry.json"),
            r#"{ "badge": { "name": "Badge", "category": "Display", "files": ["src/registry/badge/badge.tsx"] } }"#,
        )
        .unwrap();
        let component_dir = dir.join("src/registry/badge");
        std::fs::create_dir_all(&component_dir).unwrap();
        std::fs::write(component_dir.join("badge.tsx"), "export const Badge = () => null;\n")
            .unwrap();
    }

    #[test]
    fn local_registry_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        write_registry(dir.path());

        let source = LocalRegistry::new(dir.path().to_path_buf());
        let registry = source.fetch_registry().unwrap();
        assert!(registry.contains("badge"));
        assert_eq!(source.root(), dir.path());
    }

    #[test]
    fn local_registry_fetches_relative_files() {
        let dir = tempfile::tempdir().unwrap();
        write_registry(dir.path());

        let source = LocalRegistry::new(dir.path().join("registry.json"));
        let text = source.fetch_file("src/registry/badge/badge.tsx").unwrap();
        assert!(text.contains("Badge"));
    }

    #[test]
    fn local_registry_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        write_registry(dir.path());

        let source = LocalRegistry::new(dir.path().to_path_buf());
        let err = source.fetch_file("src/registry/nope.tsx").unwrap_err();
        assert!(matches!(err, RegistryError::Fetch { .. }));
    }

    #[test]
    fn local_registry_missing_document() {
        let dir = tempfile::tempdir().unwrap();
        let source = LocalRegistry::new(dir.path().join("absent.json"));
        assert!(source.fetch_registry().is_err());
    }

    #[test]
    fn http_file_urls_are_relative_to_document() {
        let source = HttpRegistry::new(DEFAULT_REGISTRY_URL).unwrap();
        assert_eq!(
            source.file_url("src/registry/button/button.tsx"),
            "https://raw.githubusercontent.com/simpyui/simpyui/main/src/registry/button/button.tsx"
        );
        assert_eq!(source.location(), DEFAULT_REGISTRY_URL);
    }

    #[test]
    fn base_of_bare_host() {
        assert_eq!(base_of("https://example.com"), "https://example.com");
        assert_eq!(base_of("https://example.com/r.json"), "https://example.com");
    }

    #[test]
    fn open_selects_backend() {
        let dir = tempfile::tempdir().unwrap();
        write_registry(dir.path());

        let local = open(dir.path().to_str().unwrap()).unwrap();
        assert!(local.location().ends_with("registry.json"));

        let remote = open("https://example.com/registry.json").unwrap();
        assert_eq!(remote.location(), "https://example.com/registry.json");
    }
}
