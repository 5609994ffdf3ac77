//! # Data Access Objects
//!
//! A [`Dao`] binds the [`RecordStore`] to one entity kind through its
//! [`Record`] codec. The common surface (create, lookup, listing, update,
//! soft delete, free-text search) lives here; entity-specific filtered
//! queries are in [`user`] and [`case_file`].
//!
//! Listing and search only ever return *active* entities that decode cleanly.
//! `get_by_id` is the one way to see an archived entity.
//!
//! DAOs borrow the store, so any number of them can be alive at once:
//!
//! ```ignore
//! let store = RecordStore::with_backend(FsBackend::new(dir));
//! let centers = CenterDao::new(&store);
//! let users = UserDao::new(&store);
//! ```

use crate::codec::Record;
use crate::error::Result;
use crate::model::{CaseFile, Center, User};
use crate::store::backend::StorageBackend;
use crate::store::{RecordStore, Row};
use std::collections::HashSet;
use std::marker::PhantomData;
use tracing::warn;

pub mod case_file;
pub mod user;

pub type CenterDao<'a, B> = Dao<'a, B, Center>;
pub type UserDao<'a, B> = Dao<'a, B, User>;
pub type CaseFileDao<'a, B> = Dao<'a, B, CaseFile>;

pub struct Dao<'a, B: StorageBackend, R: Record> {
    store: &'a RecordStore<B>,
    _record: PhantomData<R>,
}

impl<'a, B: StorageBackend, R: Record> Dao<'a, B, R> {
    pub fn new(store: &'a RecordStore<B>) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }

    /// Insert a new entity and return its assigned identifier.
    /// The entity's own `id` is ignored.
    pub fn create(&self, record: &R) -> Result<u64> {
        let fields = record.encode()?;
        self.store.insert(R::FILE, &fields)
    }

    /// Look up an entity regardless of its active flag.
    pub fn get_by_id(&self, id: u64) -> Result<Option<R>> {
        match self.store.get_by_id(R::FILE, id)? {
            Some(row) => R::decode(&row),
            None => Ok(None),
        }
    }

    /// Every active entity, in file order.
    pub fn get_all(&self) -> Result<Vec<R>> {
        let rows = self.store.get_all(R::FILE)?;
        decode_active(rows)
    }

    /// Rewrite the stored entity with the same identifier.
    /// Runs the codec's `touch` hook first, so `record` reflects what was written.
    pub fn update(&self, record: &mut R) -> Result<bool> {
        record.touch();
        let fields = record.encode()?;
        self.store.update(R::FILE, record.id(), &fields)
    }

    /// Archive an entity by clearing its active flag. False when it does not exist.
    pub fn delete(&self, id: u64) -> Result<bool> {
        match self.get_by_id(id)? {
            Some(mut record) => {
                record.set_active(false);
                self.update(&mut record)
            }
            None => Ok(false),
        }
    }

    /// Active entities whose search columns contain `term`, ignoring case.
    ///
    /// Columns are scanned in order; an entity keeps the position of its first
    /// match and is never listed twice.
    pub fn search(&self, term: &str) -> Result<Vec<R>> {
        let mut seen = HashSet::new();
        let mut found = Vec::new();

        for &column in R::SEARCH_COLUMNS {
            let rows = self.store.search(R::FILE, column, term)?;
            for record in decode_active::<R>(rows)? {
                if seen.insert(record.id()) {
                    found.push(record);
                }
            }
        }

        Ok(found)
    }

    /// Active entities whose integer `column` equals `id`.
    ///
    /// The store search is a substring match (`1` also hits `12`), so every
    /// candidate is re-checked with `matches` after decoding.
    pub(crate) fn filter_by_key<F>(&self, column: usize, id: u64, matches: F) -> Result<Vec<R>>
    where
        F: Fn(&R) -> bool,
    {
        let rows = self.store.search(R::FILE, column, &id.to_string())?;
        Ok(decode_active(rows)?
            .into_iter()
            .filter(|record| matches(record))
            .collect())
    }

    /// Active entities accepted by `keep`.
    pub(crate) fn filter<F>(&self, keep: F) -> Result<Vec<R>>
    where
        F: Fn(&R) -> bool,
    {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|record| keep(record))
            .collect())
    }
}

fn decode_active<R: Record>(rows: Vec<Row>) -> Result<Vec<R>> {
    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        match R::decode(&row)? {
            Some(record) if record.is_active() => records.push(record),
            Some(_) => {}
            None => warn!(
                file = R::FILE,
                columns = row.len(),
                expected = R::FIELD_COUNT,
                "skipping short record"
            ),
        }
    }
    Ok(records)
}
