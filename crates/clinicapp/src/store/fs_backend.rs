use super::backend::StorageBackend;
use crate::error::{ClinicError, Result};
use std::fs::{self, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub struct FsBackend {
    root: PathBuf,
    file_ext: String,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            file_ext: ".dat".to_string(),
        }
    }

    pub fn with_file_ext(mut self, ext: &str) -> Self {
        if ext.starts_with('.') {
            self.file_ext = ext.to_string();
        } else {
            self.file_ext = format!(".{}", ext);
        }
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn file_ext(&self) -> &str {
        &self.file_ext
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(ClinicError::Io)?;
        }
        Ok(())
    }
}

impl StorageBackend for FsBackend {
    fn read_lines(&self, file: &str) -> Result<Option<Vec<String>>> {
        let path = self.file_path(file);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path).map_err(ClinicError::Io)?;
        Ok(Some(content.lines().map(str::to_string).collect()))
    }

    fn append_line(&self, file: &str, line: &str) -> Result<()> {
        self.ensure_dir()?;
        let mut handle = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(self.file_path(file))
            .map_err(ClinicError::Io)?;
        if !ends_with_newline(&mut handle)? {
            handle.write_all(b"\n").map_err(ClinicError::Io)?;
        }
        writeln!(handle, "{}", line).map_err(ClinicError::Io)?;
        Ok(())
    }

    fn write_lines(&self, file: &str, lines: &[String]) -> Result<()> {
        self.ensure_dir()?;

        let mut content = String::new();
        for line in lines {
            content.push_str(line);
            content.push('\n');
        }

        // Atomic write: the previous file survives a failed rewrite
        let tmp_path = self.root.join(format!(".{}-{}.tmp", file, Uuid::new_v4()));
        if let Err(e) = fs::write(&tmp_path, content)
            .and_then(|_| fs::rename(&tmp_path, self.file_path(file)))
        {
            let _ = fs::remove_file(&tmp_path);
            return Err(ClinicError::Io(e));
        }

        Ok(())
    }

    fn file_path(&self, file: &str) -> PathBuf {
        self.root.join(format!("{}{}", file, self.file_ext))
    }
}

/// True for an empty file or one whose last byte is a newline, so the next
/// appended row starts on its own line.
fn ends_with_newline(handle: &mut fs::File) -> Result<bool> {
    let len = handle.metadata().map_err(ClinicError::Io)?.len();
    if len == 0 {
        return Ok(true);
    }
    let mut last = [0u8; 1];
    handle.seek(SeekFrom::End(-1)).map_err(ClinicError::Io)?;
    handle.read_exact(&mut last).map_err(ClinicError::Io)?;
    Ok(last[0] == b'\n')
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_reads_as_none() {
        let temp = tempdir().unwrap();
        let backend = FsBackend::new(temp.path().to_path_buf());
        assert!(backend.read_lines("centros").unwrap().is_none());
    }

    #[test]
    fn append_creates_directory_and_file() {
        let temp = tempdir().unwrap();
        let root = temp.path().join("nested").join("data");
        let backend = FsBackend::new(root.clone());

        backend.append_line("centros", "1|a").unwrap();
        backend.append_line("centros", "2|b").unwrap();

        let on_disk = fs::read_to_string(root.join("centros.dat")).unwrap();
        assert_eq!(on_disk, "1|a\n2|b\n");
    }

    #[test]
    fn extension_is_normalized() {
        let temp = tempdir().unwrap();
        let backend = FsBackend::new(temp.path().to_path_buf()).with_file_ext("txt");
        assert_eq!(backend.file_ext(), ".txt");
        assert_eq!(backend.file_path("usuarios"), temp.path().join("usuarios.txt"));
    }

    #[test]
    fn append_after_unterminated_last_line_starts_a_new_line() {
        let temp = tempdir().unwrap();
        let backend = FsBackend::new(temp.path().to_path_buf());
        fs::write(temp.path().join("centros.dat"), "1|a").unwrap();

        backend.append_line("centros", "2|b").unwrap();

        let on_disk = fs::read_to_string(temp.path().join("centros.dat")).unwrap();
        assert_eq!(on_disk, "1|a\n2|b\n");
    }

    #[test]
    fn failed_rewrite_leaves_no_tmp_file() {
        let temp = tempdir().unwrap();
        let backend = FsBackend::new(temp.path().to_path_buf());
        // a non-empty directory at the target path makes the rename fail
        let target = temp.path().join("centros.dat");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), "x").unwrap();

        assert!(backend.write_lines("centros", &["1|a".to_string()]).is_err());

        let leftovers: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
