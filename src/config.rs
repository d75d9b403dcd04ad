use crate::error::{HelperError, Result};
use crate::ini::{Document, Section};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_DIR_NAME: &str = ".compose_helper";
pub const CONFIG_FILE_NAME: &str = "config";
pub const DEFAULT_ORCHESTRATOR: &str = "docker-compose";

pub const KEY_PROJECT_DIR: &str = "project_dir";
pub const KEY_DEFAULT_SERVICE: &str = "default_service";
pub const KEY_DEBUG: &str = "debug";

/// One `[app]` section of the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub app: String,
    pub project_dir: Option<PathBuf>,
    pub default_service: Option<String>,
    pub debug: bool,
}

impl AppConfig {
    /// Keys missing from `section` fall back to `defaults` (the `[DEFAULT]` section).
    fn from_section(section: &Section, defaults: Option<&Section>) -> Self {
        let lookup = |key: &str| {
            section
                .get(key)
                .or_else(|| defaults.and_then(|d| d.get(key)))
        };
        let non_empty = |key: &str| {
            lookup(key)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        AppConfig {
            app: section.name.clone(),
            project_dir: non_empty(KEY_PROJECT_DIR).map(PathBuf::from),
            default_service: non_empty(KEY_DEFAULT_SERVICE),
            debug: lookup(KEY_DEBUG).map(parse_bool).unwrap_or(false),
        }
    }

    /// The configured project directory, as written in the file.
    pub fn project_dir(&self) -> Result<&Path> {
        self.project_dir
            .as_deref()
            .ok_or_else(|| HelperError::MissingField {
                app: self.app.clone(),
                field: KEY_PROJECT_DIR,
            })
    }
}

pub fn parse_bool(raw: &str) -> bool {
    matches!(raw.trim().to_lowercase().as_str(), "true" | "t" | "1")
}

/// `$COMPOSE_HELPER_CONFIG`, or `~/.compose_helper/config`.
pub fn config_file_path() -> PathBuf {
    if let Some(p) = std::env::var_os("COMPOSE_HELPER_CONFIG").filter(|p| !p.is_empty()) {
        return PathBuf::from(p);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
        .join(CONFIG_FILE_NAME)
}

pub fn resolve_orchestrator_binary() -> String {
    std::env::var("COMPOSE_HELPER_ORCHESTRATOR")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_ORCHESTRATOR.to_string())
}

fn read_document(path: &Path) -> Result<Document> {
    let text = fs::read_to_string(path)?;
    Document::parse(&text)
}

pub fn load(path: &Path, app: &str) -> Result<AppConfig> {
    if !path.exists() {
        return Err(HelperError::ConfigNotFound(path.to_path_buf()));
    }

    let doc = read_document(path)?;
    let section = doc.section(app).ok_or_else(|| HelperError::AppNotRegistered {
        app: app.to_string(),
        path: path.to_path_buf(),
    })?;

    Ok(AppConfig::from_section(section, doc.defaults()))
}

/// Create or update the `[app]` section, keeping every other key and section.
pub fn upsert(
    path: &Path,
    app: &str,
    project_dir: &Path,
    default_service: &str,
) -> Result<AppConfig> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        ensure_dir_exists(dir)?;
    }

    let mut doc = if path.exists() {
        read_document(path)?
    } else {
        Document::default()
    };

    let section = doc.section_mut(app);
    section.set(KEY_PROJECT_DIR, &project_dir.to_string_lossy());
    section.set(KEY_DEFAULT_SERVICE, default_service);
    let cfg = match doc.section(app) {
        Some(section) => AppConfig::from_section(section, doc.defaults()),
        None => AppConfig::default(),
    };

    fs::write(path, doc.render())?;
    Ok(cfg)
}

/// Key/value pairs of a section in file order, for display.
pub fn section_entries(path: &Path, app: &str) -> Result<Vec<(String, String)>> {
    let doc = read_document(path)?;
    Ok(doc
        .section(app)
        .map(|s| s.entries().map(|(k, v)| (k.to_string(), v.to_string())).collect())
        .unwrap_or_default())
}

pub fn ensure_dir_exists(p: &Path) -> Result<()> {
    if !p.exists() {
        debug!(dir = %p.display(), "config directory not found, creating it");
        fs::create_dir_all(p)?;
    }
    Ok(())
}
