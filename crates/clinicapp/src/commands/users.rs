use crate::commands::{apply_edit, require_text, CmdMessage, CmdResult, UserUpdate};
use crate::dao::{CenterDao, UserDao};
use crate::error::{ClinicError, Result};
use crate::model::{Role, User};
use crate::session::{admin_center, require_registry_admin, Session};
use crate::store::backend::StorageBackend;
use crate::store::RecordStore;

#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub password: String,
    pub center_id: u64,
}

/// Register a user in an active center.
pub fn create<B: StorageBackend>(store: &RecordStore<B>, new: NewUser) -> Result<CmdResult> {
    require_text("first name", &new.first_name)?;
    require_text("last name", &new.last_name)?;
    require_text("email", &new.email)?;
    if let Role::Other(raw) = &new.role {
        return Err(ClinicError::Api(format!(
            "unknown role {:?}; expected doctor, patient or administrator",
            raw
        )));
    }

    let center_active = CenterDao::new(store)
        .get_by_id(new.center_id)?
        .is_some_and(|center| center.active);
    if !center_active {
        return Err(ClinicError::Api(format!(
            "center {} is not an active center",
            new.center_id
        )));
    }

    let user = User::new(
        new.first_name.trim().to_string(),
        new.last_name.trim().to_string(),
        new.email.trim().to_string(),
        new.role,
        new.password,
        new.center_id,
    );
    let id = UserDao::new(store).create(&user)?;

    let mut result = CmdResult {
        created_id: Some(id),
        ..Default::default()
    };
    result.add_message(CmdMessage::success(format!(
        "User registered with id {}: {} ({})",
        id,
        user.full_name(),
        user.role
    )));
    Ok(result.with_users(vec![User { id, ..user }]))
}

/// All active users, or the administrator's own center.
pub fn list<B: StorageBackend>(
    store: &RecordStore<B>,
    session: Option<&Session>,
) -> Result<CmdResult> {
    let dao = UserDao::new(store);
    let users = match admin_center(session) {
        Some(center_id) => dao.by_center(center_id)?,
        None => dao.get_all()?,
    };
    let mut result = CmdResult::default();
    if users.is_empty() {
        result.add_message(CmdMessage::info("No users registered."));
    }
    Ok(result.with_users(users))
}

pub fn search<B: StorageBackend>(
    store: &RecordStore<B>,
    session: Option<&Session>,
    term: &str,
) -> Result<CmdResult> {
    let mut users = UserDao::new(store).search(term)?;
    if let Some(center_id) = admin_center(session) {
        users.retain(|user| user.center_id == center_id);
    }
    let mut result = CmdResult::default();
    if users.is_empty() {
        result.add_message(CmdMessage::info(format!("No users match \"{}\".", term)));
    }
    Ok(result.with_users(users))
}

/// Shows a user by id. Users of other centers look missing to administrators.
pub fn show<B: StorageBackend>(
    store: &RecordStore<B>,
    session: Option<&Session>,
    id: u64,
) -> Result<CmdResult> {
    let found = UserDao::new(store)
        .get_by_id(id)?
        .filter(|user| admin_center(session).map_or(true, |c| c == user.center_id));
    match found {
        Some(user) => Ok(CmdResult::default().with_users(vec![user])),
        None => Ok(CmdResult::not_found(format!("User {} not found.", id))),
    }
}

pub fn edit<B: StorageBackend>(
    store: &RecordStore<B>,
    session: Option<&Session>,
    id: u64,
    update: UserUpdate,
) -> Result<CmdResult> {
    let dao = UserDao::new(store);
    let Some(mut user) = dao.get_by_id(id)? else {
        return Ok(CmdResult::not_found(format!("User {} not found.", id)));
    };
    require_registry_admin(session, user.center_id, "edit users")?;

    let mut changed = apply_edit(&mut user.first_name, update.first_name);
    changed |= apply_edit(&mut user.last_name, update.last_name);
    changed |= apply_edit(&mut user.email, update.email);
    changed |= apply_edit(&mut user.password, update.password);

    let mut result = CmdResult::default();
    if !changed {
        result.add_message(CmdMessage::info("Nothing to change."));
        return Ok(result.with_users(vec![user]));
    }

    if dao.update(&mut user)? {
        result.add_message(CmdMessage::success(format!("User {} updated.", id)));
    } else {
        result.add_message(CmdMessage::error(format!("User {} could not be updated.", id)));
    }
    Ok(result.with_users(vec![user]))
}

/// Archive a user. Signed-in callers must administer the user's center.
pub fn archive<B: StorageBackend>(
    store: &RecordStore<B>,
    session: Option<&Session>,
    id: u64,
) -> Result<CmdResult> {
    let dao = UserDao::new(store);
    let Some(user) = dao.get_by_id(id)? else {
        return Ok(CmdResult::not_found(format!("User {} not found.", id)));
    };
    require_registry_admin(session, user.center_id, "archive users")?;

    let mut result = CmdResult::default();
    if dao.delete(id)? {
        result.add_message(CmdMessage::success(format!(
            "User {} archived: {}",
            id,
            user.full_name()
        )));
    } else {
        result.add_message(CmdMessage::error(format!("User {} could not be archived.", id)));
    }
    Ok(result)
}

pub fn doctors<B: StorageBackend>(
    store: &RecordStore<B>,
    session: Option<&Session>,
) -> Result<CmdResult> {
    let dao = UserDao::new(store);
    let users = match admin_center(session) {
        Some(center_id) => dao.doctors_by_center(center_id)?,
        None => dao.doctors()?,
    };
    let mut result = CmdResult::default();
    if users.is_empty() {
        result.add_message(CmdMessage::info("No doctors registered."));
    }
    Ok(result.with_users(users))
}

pub fn patients<B: StorageBackend>(
    store: &RecordStore<B>,
    session: Option<&Session>,
) -> Result<CmdResult> {
    let dao = UserDao::new(store);
    let users = match admin_center(session) {
        Some(center_id) => dao.patients_by_center(center_id)?,
        None => dao.patients()?,
    };
    let mut result = CmdResult::default();
    if users.is_empty() {
        result.add_message(CmdMessage::info("No patients registered."));
    }
    Ok(result.with_users(users))
}
