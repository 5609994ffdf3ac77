use crate::error::Result;
use std::path::PathBuf;

/// Abstract interface for raw line storage.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while RecordStore handles the "what" (ids, lookup, rewrite, search).
///
/// Files are addressed by a logical name (`centros`, `usuarios`, ...);
/// the backend decides where that name lives.
pub trait StorageBackend {
    /// Read every raw line of a file.
    /// Returns Ok(None) if the file does not exist.
    /// Returns Err only on actual I/O errors (permissions, disk failure).
    fn read_lines(&self, file: &str) -> Result<Option<Vec<String>>>;

    /// Append a single line, creating the file (and its directory) if needed.
    fn append_line(&self, file: &str, line: &str) -> Result<()>;

    /// Replace the whole file with the given lines.
    fn write_lines(&self, file: &str, lines: &[String]) -> Result<()>;

    /// Get the location of a file.
    /// For FsBackend, this is the real path. For MemBackend, a virtual path.
    fn file_path(&self, file: &str) -> PathBuf;
}
