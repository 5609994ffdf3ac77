use crate::commands::{CmdMessage, CmdResult};
use crate::error::{ClinicError, Result};
use crate::session::{self, Session};
use crate::store::backend::StorageBackend;
use crate::store::RecordStore;

/// Authenticate and hand back the session. Wrong credentials are an
/// [`ClinicError::Auth`] so callers cannot proceed by accident.
pub fn login<B: StorageBackend>(
    store: &RecordStore<B>,
    email: &str,
    password: &str,
) -> Result<(Session, CmdResult)> {
    let session = session::login(store, email, password)?
        .ok_or_else(|| ClinicError::Auth("invalid email or password".to_string()))?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Welcome {} ({}, center {}).",
        session.user.full_name(),
        session.role(),
        session.center_id()
    )));
    let result = result.with_users(vec![session.user.clone()]);
    Ok((session, result))
}
