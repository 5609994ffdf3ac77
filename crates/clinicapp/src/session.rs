//! # Sessions
//!
//! A [`Session`] is the authenticated acting user. It is an ordinary value:
//! the caller obtains it from [`login`] and passes it into every API call that
//! depends on who is asking. Nothing in the library keeps a "current user".
//!
//! Operations that also work anonymously take an `Option<&Session>`. An
//! administrator's session confines them to the administrator's own center;
//! see [`admin_center`] and [`can_view_case`].
//!
//! Authentication compares email and password verbatim against active users.
//! Passwords are stored in plain text; there is no hashing, lockout or rate
//! limiting.

use crate::dao::UserDao;
use crate::error::{ClinicError, Result};
use crate::model::{CaseFile, Role, User};
use crate::store::backend::StorageBackend;
use crate::store::RecordStore;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub user: User,
}

impl Session {
    pub fn new(user: User) -> Self {
        Self { user }
    }

    pub fn user_id(&self) -> u64 {
        self.user.id
    }

    pub fn center_id(&self) -> u64 {
        self.user.center_id
    }

    pub fn role(&self) -> &Role {
        &self.user.role
    }

    /// Fails with [`ClinicError::Auth`] unless the session has one of `roles`.
    pub fn require(&self, roles: &[Role], action: &str) -> Result<()> {
        if roles.contains(&self.user.role) {
            Ok(())
        } else {
            Err(ClinicError::Auth(format!(
                "{} cannot {}",
                self.user.role, action
            )))
        }
    }

    /// Fails unless `center_id` is the session's own center.
    pub fn require_center(&self, center_id: u64, action: &str) -> Result<()> {
        if center_id == self.user.center_id {
            Ok(())
        } else {
            Err(ClinicError::Auth(format!(
                "cannot {} outside center {}",
                action, self.user.center_id
            )))
        }
    }
}

/// The center an optional caller is confined to. Only administrators are.
pub fn admin_center(session: Option<&Session>) -> Option<u64> {
    session
        .filter(|s| s.user.is_administrator())
        .map(Session::center_id)
}

/// Gate for registry edits (centers and users).
///
/// Anonymous callers are let through. Once someone is signed in, only an
/// administrator of `center_id` may proceed.
pub fn require_registry_admin(
    session: Option<&Session>,
    center_id: u64,
    action: &str,
) -> Result<()> {
    match session {
        None => Ok(()),
        Some(session) => {
            session.require(&[Role::Administrator], action)?;
            session.require_center(center_id, action)
        }
    }
}

/// Whether the caller may read `case`.
///
/// Anonymous callers see everything. Staff see their center's case files,
/// patients only their own.
pub fn can_view_case(session: Option<&Session>, case: &CaseFile) -> bool {
    let Some(session) = session else {
        return true;
    };
    match session.role() {
        Role::Administrator | Role::Doctor => case.center_id == session.center_id(),
        Role::Patient => case.patient_id == session.user_id(),
        Role::Other(_) => false,
    }
}

pub fn login<B: StorageBackend>(
    store: &RecordStore<B>,
    email: &str,
    password: &str,
) -> Result<Option<Session>> {
    Ok(UserDao::new(store).login(email, password)?.map(Session::new))
}
