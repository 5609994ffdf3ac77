use crate::dao::UserDao;
use crate::model::{Role, User};
use crate::session::Session;
use crate::store::fs_backend::FsBackend;
use crate::store::mem_backend::MemBackend;
use crate::store::RecordStore;
use std::path::PathBuf;
use tempfile::TempDir;

pub fn mem_store() -> RecordStore<MemBackend> {
    RecordStore::with_backend(MemBackend::new())
}

/// Register a user with `role` in `center_id` and sign them in.
pub fn session_for(store: &RecordStore<MemBackend>, role: Role, center_id: u64) -> Session {
    let user = User::new(
        "Test".to_string(),
        role.to_string(),
        format!("{}@clinic.test", role),
        role,
        "secret".to_string(),
        center_id,
    );
    let id = UserDao::new(store)
        .create(&user)
        .expect("failed to create session user");
    Session::new(User { id, ..user })
}

pub struct TestEnv {
    // We keep _temp_dir to ensure the directory is not dropped until the test is done
    pub _temp_dir: TempDir,
    pub store: RecordStore<FsBackend>,
    pub root: PathBuf,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
        let root = temp_dir.path().join("data");
        let store = RecordStore::with_backend(FsBackend::new(root.clone()));
        Self {
            _temp_dir: temp_dir,
            store,
            root,
        }
    }
}
