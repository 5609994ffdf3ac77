use super::backend::StorageBackend;
use super::{Row, DELIMITER};
use crate::error::{ClinicError, Result};
use tracing::debug;

pub struct RecordStore<B: StorageBackend> {
    /// The underlying storage backend.
    /// Exposed as pub(crate) for testing and internal access only.
    pub(crate) backend: B,
}

impl<B: StorageBackend> RecordStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Append `fields` under a freshly assigned identifier and return it.
    ///
    /// The identifier is one more than the largest leading column in the file,
    /// or 1 for a missing/empty file. Reading the max and appending are two
    /// separate steps, so two processes inserting at once can both get the
    /// same id.
    pub fn insert(&self, file: &str, fields: &[String]) -> Result<u64> {
        let id = self.next_id(file)?;
        self.backend.append_line(file, &join_row(id, fields))?;
        debug!(file, id, "inserted record");
        Ok(id)
    }

    /// All rows in file order. A missing file has no rows.
    pub fn get_all(&self, file: &str) -> Result<Vec<Row>> {
        let lines = self.backend.read_lines(file)?.unwrap_or_default();
        let rows: Vec<Row> = lines
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .map(split_row)
            .collect();
        debug!(file, rows = rows.len(), "read records");
        Ok(rows)
    }

    /// First row whose leading column equals `id`.
    pub fn get_by_id(&self, file: &str, id: u64) -> Result<Option<Row>> {
        for row in self.get_all(file)? {
            if leading_id(file, &row)? == id {
                return Ok(Some(row));
            }
        }
        Ok(None)
    }

    /// Replace the row with identifier `id` by `[id] + fields` and rewrite the
    /// whole file, keeping every other row and the row order.
    ///
    /// Returns false without touching the file when no row matches.
    pub fn update(&self, file: &str, id: u64, fields: &[String]) -> Result<bool> {
        let mut rows = self.get_all(file)?;

        let mut found = false;
        for row in rows.iter_mut() {
            if leading_id(file, row)? == id {
                *row = split_row(&join_row(id, fields));
                found = true;
                break;
            }
        }

        if !found {
            debug!(file, id, "update target not found");
            return Ok(false);
        }

        let lines: Vec<String> = rows.iter().map(|row| row.join(&DELIMITER.to_string())).collect();
        self.backend.write_lines(file, &lines)?;
        debug!(file, id, rows = lines.len(), "rewrote file");
        Ok(true)
    }

    /// Rows whose `column` contains `term`, ignoring case.
    /// Rows too short to have that column are skipped.
    pub fn search(&self, file: &str, column: usize, term: &str) -> Result<Vec<Row>> {
        let needle = term.to_lowercase();
        let matches: Vec<Row> = self
            .get_all(file)?
            .into_iter()
            .filter(|row| {
                row.get(column)
                    .is_some_and(|field| field.to_lowercase().contains(&needle))
            })
            .collect();
        debug!(file, column, term, matches = matches.len(), "searched records");
        Ok(matches)
    }

    fn next_id(&self, file: &str) -> Result<u64> {
        let mut max = 0;
        for row in self.get_all(file)? {
            max = max.max(leading_id(file, &row)?);
        }
        Ok(max + 1)
    }
}

fn split_row(line: &str) -> Row {
    line.split(DELIMITER).map(str::to_string).collect()
}

fn join_row(id: u64, fields: &[String]) -> String {
    let mut line = id.to_string();
    for field in fields {
        line.push(DELIMITER);
        line.push_str(field);
    }
    line
}

fn leading_id(file: &str, row: &Row) -> Result<u64> {
    let raw = row.first().map(String::as_str).unwrap_or_default();
    raw.trim()
        .parse()
        .map_err(|_| ClinicError::MalformedRecord {
            file: file.to_string(),
            reason: format!("identifier {:?} is not an integer", raw),
        })
}
