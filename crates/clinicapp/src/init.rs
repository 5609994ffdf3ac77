//! # Locating the Data Directory
//!
//! All three record files live together in one directory. [`initialize`]
//! decides which one, first match wins:
//!
//! 1. `data_override`, the CLI's `--data` flag.
//! 2. `CLINIC_DATA_DIR` in the environment.
//! 3. `data_dir` in `clinic.toml`.
//! 4. The OS data directory (via the `directories` crate), e.g.
//!    `~/.local/share/miclinica` on Linux.
//!
//! `clinic.toml` itself is read from the OS config directory unless
//! `CLINIC_CONFIG_DIR` points elsewhere, which keeps tests isolated from the
//! user's real configuration.
//!
//! Nothing is created on disk here. The data directory appears on the first
//! write.

use crate::api::ClinicApi;
use crate::config::ClinicConfig;
use crate::error::{ClinicError, Result};
use crate::store::fs_backend::FsBackend;
use crate::store::RecordStore;
use directories::ProjectDirs;
use std::path::PathBuf;
use tracing::debug;

pub struct ClinicContext {
    pub api: ClinicApi<FsBackend>,
    pub config: ClinicConfig,
    pub data_dir: PathBuf,
    pub config_dir: PathBuf,
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "miclinica", "miclinica").ok_or_else(|| {
        ClinicError::Config("could not determine a home directory".to_string())
    })
}

/// Directory searched for `clinic.toml`.
pub fn config_dir() -> Result<PathBuf> {
    match std::env::var_os("CLINIC_CONFIG_DIR") {
        Some(dir) => Ok(PathBuf::from(dir)),
        None => Ok(project_dirs()?.config_dir().to_path_buf()),
    }
}

/// Load configuration and open the file-backed API.
///
/// # Examples
///
/// ```ignore
/// // Use configured or default location
/// let ctx = initialize(None)?;
///
/// // Point at an explicit data directory
/// let ctx = initialize(Some(PathBuf::from("/srv/clinic")))?;
/// ```
pub fn initialize(data_override: Option<PathBuf>) -> Result<ClinicContext> {
    let config_dir = config_dir()?;
    let config = ClinicConfig::load(&config_dir)?;

    let data_dir = match data_override.or_else(|| config.data_dir.clone()) {
        Some(dir) => dir,
        None => project_dirs()?.data_dir().to_path_buf(),
    };
    debug!(data_dir = %data_dir.display(), config_dir = %config_dir.display(), "initialized");

    let backend = FsBackend::new(data_dir.clone()).with_file_ext(&config.file_ext());
    let api = ClinicApi::new(RecordStore::with_backend(backend));

    Ok(ClinicContext {
        api,
        config,
        data_dir,
        config_dir,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_override_wins() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = initialize(Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(ctx.data_dir, dir.path());
        assert_eq!(ctx.api.store().backend().root(), dir.path());
        // nothing is written until the first insert
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }
}
