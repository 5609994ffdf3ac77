use crate::dao::{CaseFileDao, UserDao};
use crate::error::Result;
use crate::store::backend::StorageBackend;
use crate::store::RecordStore;
use serde::Serialize;

/// Head counts for one center, active records only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CenterStats {
    pub center_id: u64,
    pub total_users: usize,
    pub doctors: usize,
    pub patients: usize,
    pub administrators: usize,
    pub case_files: usize,
}

pub fn center_stats<B: StorageBackend>(
    store: &RecordStore<B>,
    center_id: u64,
) -> Result<CenterStats> {
    let users = UserDao::new(store).by_center(center_id)?;
    let case_files = CaseFileDao::new(store).by_center(center_id)?;

    Ok(CenterStats {
        center_id,
        total_users: users.len(),
        doctors: users.iter().filter(|u| u.is_doctor()).count(),
        patients: users.iter().filter(|u| u.is_patient()).count(),
        administrators: users.iter().filter(|u| u.is_administrator()).count(),
        case_files: case_files.len(),
    })
}
