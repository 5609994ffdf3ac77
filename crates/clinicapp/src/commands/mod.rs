//! # Command Layer
//!
//! This module contains the **business logic** of the clinic. Each command
//! module is a set of free functions over a [`RecordStore`](crate::store::RecordStore)
//! that return a structured [`CmdResult`].
//!
//! ## Role and Responsibilities
//!
//! Commands:
//! - Validate references before inserting (a case file's patient must exist and be a patient)
//! - Apply role rules for the acting [`Session`](crate::session::Session)
//! - Return the affected entities plus leveled messages
//!
//! Commands never print, parse arguments or pick exit codes. Not-found is
//! reported as a warning message, never as an error; errors are reserved for
//! I/O, corrupt data, invalid input and permission failures.
//!
//! ## Testing Strategy
//!
//! Command tests run against `MemBackend` and check `CmdResult` contents and
//! the error variants returned for forbidden calls.
//!
//! ## Command Modules
//!
//! - [`centers`]: Register, list, search, edit and archive centers
//! - [`users`]: Register, list, search, edit and archive users; role listings
//! - [`case_files`]: Case file lifecycle and the per-patient/doctor/center views
//! - [`session`]: Login
//! - [`stats`]: Per-center statistics

use crate::error::{ClinicError, Result};
use crate::model::{CaseFile, Center, User};
use crate::stats::CenterStats;
use serde::Serialize;

pub mod case_files;
pub mod centers;
pub mod session;
pub mod stats;
pub mod users;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct CmdResult {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub centers: Vec<Center>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<User>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub case_files: Vec<CaseFile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<CenterStats>,
    /// Identifier assigned by a create command.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_id: Option<u64>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_centers(mut self, centers: Vec<Center>) -> Self {
        self.centers = centers;
        self
    }

    pub fn with_users(mut self, users: Vec<User>) -> Self {
        self.users = users;
        self
    }

    pub fn with_case_files(mut self, case_files: Vec<CaseFile>) -> Self {
        self.case_files = case_files;
        self
    }

    /// A result carrying only a warning, used for lookups that found nothing.
    pub fn not_found(what: impl Into<String>) -> Self {
        let mut result = Self::default();
        result.add_message(CmdMessage::warning(what));
        result
    }
}

/// Field edits for a center. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct CenterUpdate {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

/// Field edits for a user. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

pub(crate) fn require_text(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ClinicError::Api(format!("{} must not be empty", name)));
    }
    Ok(())
}

/// Replace `target` with a non-blank edit, leaving it untouched otherwise.
pub(crate) fn apply_edit(target: &mut String, edit: Option<String>) -> bool {
    match edit {
        Some(value) if !value.trim().is_empty() => {
            *target = value.trim().to_string();
            true
        }
        _ => false,
    }
}
