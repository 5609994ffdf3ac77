//! # Configuration
//!
//! Settings are derived with [`confique`] and loaded in layers, highest
//! priority first:
//! 1. **Environment variables**: `CLINIC_DATA_DIR`, `CLINIC_FILE_EXT`.
//! 2. **Config file**: `clinic.toml` in the OS config directory
//!    (or `$CLINIC_CONFIG_DIR/clinic.toml`).
//! 3. **Compiled defaults**: `#[config(default = ...)]`.
//!
//! A missing config file is not an error; a malformed one is.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `data_dir` | OS data directory | Where `centros`, `usuarios` and `expedientes` live |
//! | `file_ext` | `.dat` | Extension of the record files |
//!
//! The `--data` flag of the CLI overrides `data_dir` for a single run.

use crate::error::Result;
use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "clinic.toml";

/// Configuration for the clinic store, stored in `clinic.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ClinicConfig {
    /// Directory holding the record files.
    #[config(env = "CLINIC_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Extension for record files (e.g. ".dat", ".txt")
    #[config(env = "CLINIC_FILE_EXT", default = ".dat")]
    pub file_ext: String,
}

impl Default for ClinicConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            file_ext: ".dat".to_string(),
        }
    }
}

impl ClinicConfig {
    /// Load from the environment and `config_dir/clinic.toml`.
    pub fn load(config_dir: &Path) -> Result<Self> {
        let config = Self::builder()
            .env()
            .file(config_dir.join(CONFIG_FILE))
            .load()?;
        Ok(config)
    }

    /// Get the file extension, normalized to start with a dot.
    pub fn file_ext(&self) -> String {
        if self.file_ext.starts_with('.') {
            self.file_ext.clone()
        } else {
            format!(".{}", self.file_ext)
        }
    }
}
