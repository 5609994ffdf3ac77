use crate::commands::{apply_edit, require_text, CenterUpdate, CmdMessage, CmdResult};
use crate::dao::CenterDao;
use crate::error::{ClinicError, Result};
use crate::model::Center;
use crate::session::{require_registry_admin, Session};
use crate::store::backend::StorageBackend;
use crate::store::RecordStore;

pub fn create<B: StorageBackend>(
    store: &RecordStore<B>,
    name: String,
    address: String,
    phone: String,
) -> Result<CmdResult> {
    require_text("name", &name)?;
    check_phone(phone.trim())?;
    let center = Center::new(
        name.trim().to_string(),
        address.trim().to_string(),
        phone.trim().to_string(),
    );
    let id = CenterDao::new(store).create(&center)?;

    let mut result = CmdResult {
        created_id: Some(id),
        ..Default::default()
    };
    result.add_message(CmdMessage::success(format!(
        "Center registered with id {}: {}",
        id, center.name
    )));
    Ok(result.with_centers(vec![Center { id, ..center }]))
}

pub fn list<B: StorageBackend>(store: &RecordStore<B>) -> Result<CmdResult> {
    let centers = CenterDao::new(store).get_all()?;
    let mut result = CmdResult::default();
    if centers.is_empty() {
        result.add_message(CmdMessage::info("No centers registered."));
    }
    Ok(result.with_centers(centers))
}

pub fn search<B: StorageBackend>(store: &RecordStore<B>, term: &str) -> Result<CmdResult> {
    let centers = CenterDao::new(store).search(term)?;
    let mut result = CmdResult::default();
    if centers.is_empty() {
        result.add_message(CmdMessage::info(format!("No centers match \"{}\".", term)));
    }
    Ok(result.with_centers(centers))
}

/// Shows a center by id, archived ones included.
pub fn show<B: StorageBackend>(store: &RecordStore<B>, id: u64) -> Result<CmdResult> {
    match CenterDao::new(store).get_by_id(id)? {
        Some(center) => Ok(CmdResult::default().with_centers(vec![center])),
        None => Ok(CmdResult::not_found(format!("Center {} not found.", id))),
    }
}

/// Signed-in callers must administer the center they edit.
pub fn edit<B: StorageBackend>(
    store: &RecordStore<B>,
    session: Option<&Session>,
    id: u64,
    update: CenterUpdate,
) -> Result<CmdResult> {
    require_registry_admin(session, id, "edit centers")?;

    let dao = CenterDao::new(store);
    let Some(mut center) = dao.get_by_id(id)? else {
        return Ok(CmdResult::not_found(format!("Center {} not found.", id)));
    };

    if let Some(phone) = update.phone.as_deref().map(str::trim) {
        if !phone.is_empty() {
            check_phone(phone)?;
        }
    }
    let mut changed = apply_edit(&mut center.name, update.name);
    changed |= apply_edit(&mut center.address, update.address);
    changed |= apply_edit(&mut center.phone, update.phone);

    let mut result = CmdResult::default();
    if !changed {
        result.add_message(CmdMessage::info("Nothing to change."));
        return Ok(result.with_centers(vec![center]));
    }

    if dao.update(&mut center)? {
        result.add_message(CmdMessage::success(format!("Center {} updated.", id)));
    } else {
        result.add_message(CmdMessage::error(format!("Center {} could not be updated.", id)));
    }
    Ok(result.with_centers(vec![center]))
}

/// Archive a center. Signed-in callers must administer it.
pub fn archive<B: StorageBackend>(
    store: &RecordStore<B>,
    session: Option<&Session>,
    id: u64,
) -> Result<CmdResult> {
    require_registry_admin(session, id, "archive centers")?;

    let mut result = CmdResult::default();
    if CenterDao::new(store).delete(id)? {
        result.add_message(CmdMessage::success(format!("Center {} archived.", id)));
    } else {
        result.add_message(CmdMessage::warning(format!("Center {} not found.", id)));
    }
    Ok(result)
}

/// Phone numbers are exactly eight digits.
pub fn check_phone(phone: &str) -> Result<()> {
    if phone.len() == 8 && phone.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ClinicError::Api(format!(
            "phone must be exactly 8 digits, got {:?}",
            phone
        )))
    }
}
