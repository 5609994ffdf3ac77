use super::backend::StorageBackend;
use crate::error::{ClinicError, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability since the store is single-threaded,
/// which lets the `StorageBackend` trait use `&self` for all methods.
#[derive(Default)]
pub struct MemBackend {
    files: RefCell<HashMap<String, Vec<String>>>,
    simulate_write_error: RefCell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    /// Test helper to seed a file with raw lines, bypassing the store.
    pub fn seed(&self, file: &str, lines: &[&str]) {
        self.files.borrow_mut().insert(
            file.to_string(),
            lines.iter().map(|l| l.to_string()).collect(),
        );
    }

    /// Test helper returning the raw lines of a file.
    pub fn raw_lines(&self, file: &str) -> Option<Vec<String>> {
        self.files.borrow().get(file).cloned()
    }

    fn check_writable(&self) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(ClinicError::Io(std::io::Error::other("Simulated write error")));
        }
        Ok(())
    }
}

impl StorageBackend for MemBackend {
    fn read_lines(&self, file: &str) -> Result<Option<Vec<String>>> {
        Ok(self.files.borrow().get(file).cloned())
    }

    fn append_line(&self, file: &str, line: &str) -> Result<()> {
        self.check_writable()?;
        self.files
            .borrow_mut()
            .entry(file.to_string())
            .or_default()
            .push(line.to_string());
        Ok(())
    }

    fn write_lines(&self, file: &str, lines: &[String]) -> Result<()> {
        self.check_writable()?;
        self.files.borrow_mut().insert(file.to_string(), lines.to_vec());
        Ok(())
    }

    fn file_path(&self, file: &str) -> PathBuf {
        PathBuf::from(format!("memory://{}", file))
    }
}
