//! # Storage Layer
//!
//! Plain delimited text files, one entity kind per file, one record per line:
//!
//! ```text
//! <data dir>/
//! ├── centros.dat       # id|name|address|phone|active|created_at
//! ├── usuarios.dat      # id|first|last|email|role|password|center_id|active|registered_at
//! └── expedientes.dat   # id|patient|doctor|center|<11 clinical fields>|active|created_at|modified_at
//! ```
//!
//! The leading column is an integer identifier managed by the store. The store
//! knows nothing else about the columns; mapping them to entities is the job of
//! [`crate::codec`].
//!
//! ## Split
//!
//! - [`backend::StorageBackend`]: raw line I/O (read / append / rewrite).
//!   - [`fs_backend::FsBackend`]: production, files under a data directory.
//!   - [`mem_backend::MemBackend`]: for testing logic without filesystem I/O.
//! - [`record_store::RecordStore`]: id assignment, point lookup, update-in-place,
//!   substring search. Every call re-reads the whole file; there is no cache
//!   and no index.
//!
//! ## Limitations
//!
//! There is no locking. Two processes sharing a data directory can assign the
//! same identifier (read-max-then-append), observe each other's rewrites, or
//! lose updates. The store assumes one process, one user at a time.
//!
//! Rewrites go through a temporary file and a rename, so a failed `update`
//! leaves the previous file in place.

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;
pub mod record_store;

pub use record_store::RecordStore;

/// Column separator. Field values must never contain it.
pub const DELIMITER: char = '|';

/// One stored line split on [`DELIMITER`], identifier column included.
pub type Row = Vec<String>;
