use crate::commands::CmdResult;
use crate::error::{ClinicError, Result};
use crate::model::Role;
use crate::session::Session;
use crate::stats::center_stats;
use crate::store::backend::StorageBackend;
use crate::store::RecordStore;

/// Statistics for a center. An administrator always gets their own center;
/// anonymous callers must name one.
pub fn run<B: StorageBackend>(
    store: &RecordStore<B>,
    session: Option<&Session>,
    center_id: Option<u64>,
) -> Result<CmdResult> {
    let center_id = match (session, center_id) {
        (Some(session), requested) => {
            session.require(&[Role::Administrator], "view center statistics")?;
            if let Some(requested) = requested {
                session.require_center(requested, "view statistics")?;
            }
            session.center_id()
        }
        (None, Some(center_id)) => center_id,
        (None, None) => {
            return Err(ClinicError::Api(
                "a center id is required without a session".to_string(),
            ))
        }
    };

    Ok(CmdResult {
        stats: Some(center_stats(store, center_id)?),
        ..Default::default()
    })
}
