//! Registration of a new application: a symlink named after the app that
//! points at the dispatcher, plus the app's section in the config file.

use crate::config::{self, AppConfig};
use crate::dispatch;
use crate::error::{HelperError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info, warn};

pub const DISPATCHER_BIN_NAME: &str = "compose-helper";

#[derive(Debug, Clone)]
pub struct Registration {
    pub app: String,
    pub project_dir: PathBuf,
    pub default_service: String,
    pub bin_dir: PathBuf,
    pub target: PathBuf,
    pub config_path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    Created,
    AlreadyPresent,
}

#[derive(Debug, Clone)]
pub struct RegisterReport {
    pub link: PathBuf,
    pub link_outcome: LinkOutcome,
    pub config: AppConfig,
    pub entries: Vec<(String, String)>,
}

fn app_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").expect("valid app name regex"))
}

/// The name ends up as a file name and as a `[section]` header.
pub fn validate_app_name(app: &str) -> Result<()> {
    if app_name_re().is_match(app) {
        Ok(())
    } else {
        Err(HelperError::InvalidAppName(app.to_string()))
    }
}

/// `compose-helper` next to the running executable.
pub fn default_target() -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    Ok(exe.with_file_name(format!("{DISPATCHER_BIN_NAME}{}", std::env::consts::EXE_SUFFIX)))
}

#[cfg(unix)]
fn ensure_writable(dir: &Path) -> Result<()> {
    use nix::unistd::{access, AccessFlags};

    access(dir, AccessFlags::W_OK).map_err(|_| HelperError::PermissionDenied(dir.to_path_buf()))
}

#[cfg(not(unix))]
fn ensure_writable(dir: &Path) -> Result<()> {
    let meta = std::fs::metadata(dir).map_err(|_| HelperError::PermissionDenied(dir.to_path_buf()))?;
    if meta.permissions().readonly() {
        return Err(HelperError::PermissionDenied(dir.to_path_buf()));
    }
    Ok(())
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}

/// Create `<bin_dir>/<app>` pointing at the dispatcher, unless something is already there.
pub fn link_binary(app: &str, bin_dir: &Path, target: &Path) -> Result<(PathBuf, LinkOutcome)> {
    ensure_writable(bin_dir)?;

    let link = bin_dir.join(app);
    // symlink_metadata so a dangling link still counts as present
    if link.symlink_metadata().is_ok() {
        warn!("Binary already found at {}. Skipping...", link.display());
        return Ok((link, LinkOutcome::AlreadyPresent));
    }

    let target = std::path::absolute(target)?;
    symlink(&target, &link)?;
    info!("Linked {} -> {}", link.display(), target.display());
    Ok((link, LinkOutcome::Created))
}

pub fn register(reg: &Registration) -> Result<RegisterReport> {
    validate_app_name(&reg.app)?;

    let project_dir = std::path::absolute(&reg.project_dir)?;
    if !project_dir.is_dir() {
        warn!("Project directory {} does not exist yet", project_dir.display());
    } else if !dispatch::default_compose_file(&project_dir).exists() {
        warn!(
            "No {} found in {}",
            dispatch::COMPOSE_FILE_NAME,
            project_dir.display()
        );
    }

    let (link, link_outcome) = link_binary(&reg.app, &reg.bin_dir, &reg.target)?;

    debug!(config = %reg.config_path.display(), "writing app section");
    let config = config::upsert(&reg.config_path, &reg.app, &project_dir, &reg.default_service)?;
    let entries = config::section_entries(&reg.config_path, &reg.app)?;

    Ok(RegisterReport {
        link,
        link_outcome,
        config,
        entries,
    })
}
