//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single
//! entry point for every clinic operation, whatever the UI.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Dispatches** to the matching command function
//! - **Normalizes inputs** (e.g. `field=value` pairs into [`ClinicalField`] edits)
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! Business rules, role checks included, live in `commands/*.rs`.
//!
//! ## Sessions
//!
//! Calls that depend on who is asking take the caller's [`Session`]:
//! `&Session` where signing in is mandatory, `Option<&Session>` where the
//! operation is also open to anonymous callers. The API never stores a
//! session between calls.
//!
//! ## Generic Over StorageBackend
//!
//! `ClinicApi<B: StorageBackend>` is generic over the storage backend:
//! - Production: `ClinicApi<FsBackend>`
//! - Testing: `ClinicApi<MemBackend>`

use crate::commands::case_files::NewCaseFile;
use crate::commands::users::NewUser;
use crate::commands::{self, CenterUpdate, CmdResult, UserUpdate};
use crate::error::{ClinicError, Result};
use crate::model::ClinicalField;
use crate::session::Session;
use crate::store::backend::StorageBackend;
use crate::store::RecordStore;

/// The main API facade for clinic operations.
pub struct ClinicApi<B: StorageBackend> {
    store: RecordStore<B>,
}

impl<B: StorageBackend> ClinicApi<B> {
    pub fn new(store: RecordStore<B>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &RecordStore<B> {
        &self.store
    }

    pub fn login(&self, email: &str, password: &str) -> Result<(Session, CmdResult)> {
        commands::session::login(&self.store, email, password)
    }

    // Centers

    pub fn create_center(&self, name: String, address: String, phone: String) -> Result<CmdResult> {
        commands::centers::create(&self.store, name, address, phone)
    }

    pub fn list_centers(&self) -> Result<CmdResult> {
        commands::centers::list(&self.store)
    }

    pub fn search_centers(&self, term: &str) -> Result<CmdResult> {
        commands::centers::search(&self.store, term)
    }

    pub fn get_center(&self, id: u64) -> Result<CmdResult> {
        commands::centers::show(&self.store, id)
    }

    pub fn update_center(
        &self,
        session: Option<&Session>,
        id: u64,
        update: CenterUpdate,
    ) -> Result<CmdResult> {
        commands::centers::edit(&self.store, session, id, update)
    }

    pub fn archive_center(&self, session: Option<&Session>, id: u64) -> Result<CmdResult> {
        commands::centers::archive(&self.store, session, id)
    }

    // Users

    pub fn create_user(&self, new: NewUser) -> Result<CmdResult> {
        commands::users::create(&self.store, new)
    }

    pub fn list_users(&self, session: Option<&Session>) -> Result<CmdResult> {
        commands::users::list(&self.store, session)
    }

    pub fn search_users(&self, session: Option<&Session>, term: &str) -> Result<CmdResult> {
        commands::users::search(&self.store, session, term)
    }

    pub fn get_user(&self, session: Option<&Session>, id: u64) -> Result<CmdResult> {
        commands::users::show(&self.store, session, id)
    }

    pub fn update_user(
        &self,
        session: Option<&Session>,
        id: u64,
        update: UserUpdate,
    ) -> Result<CmdResult> {
        commands::users::edit(&self.store, session, id, update)
    }

    pub fn archive_user(&self, session: Option<&Session>, id: u64) -> Result<CmdResult> {
        commands::users::archive(&self.store, session, id)
    }

    pub fn list_doctors(&self, session: Option<&Session>) -> Result<CmdResult> {
        commands::users::doctors(&self.store, session)
    }

    pub fn list_patients(&self, session: Option<&Session>) -> Result<CmdResult> {
        commands::users::patients(&self.store, session)
    }

    // Case files

    pub fn create_case_file<S: AsRef<str>>(
        &self,
        session: &Session,
        patient_id: u64,
        fields: &[S],
    ) -> Result<CmdResult> {
        let new = NewCaseFile {
            patient_id,
            fields: parse_field_edits(fields)?,
        };
        commands::case_files::create(&self.store, session, new)
    }

    pub fn list_case_files(&self, session: Option<&Session>) -> Result<CmdResult> {
        commands::case_files::list(&self.store, session)
    }

    pub fn search_case_files(&self, session: Option<&Session>, term: &str) -> Result<CmdResult> {
        commands::case_files::search(&self.store, session, term)
    }

    pub fn get_case_file(&self, session: Option<&Session>, id: u64) -> Result<CmdResult> {
        commands::case_files::show(&self.store, session, id)
    }

    pub fn update_case_file<S: AsRef<str>>(
        &self,
        session: &Session,
        id: u64,
        fields: &[S],
    ) -> Result<CmdResult> {
        let edits = parse_field_edits(fields)?;
        commands::case_files::edit(&self.store, session, id, edits)
    }

    pub fn archive_case_file(&self, session: &Session, id: u64) -> Result<CmdResult> {
        commands::case_files::archive(&self.store, session, id)
    }

    pub fn case_files_by_patient(
        &self,
        session: Option<&Session>,
        patient_id: u64,
    ) -> Result<CmdResult> {
        commands::case_files::by_patient(&self.store, session, patient_id)
    }

    pub fn case_files_by_doctor(
        &self,
        session: Option<&Session>,
        doctor_id: u64,
    ) -> Result<CmdResult> {
        commands::case_files::by_doctor(&self.store, session, doctor_id)
    }

    pub fn case_files_by_center(
        &self,
        session: Option<&Session>,
        center_id: u64,
    ) -> Result<CmdResult> {
        commands::case_files::by_center(&self.store, session, center_id)
    }

    pub fn my_case_files(&self, session: &Session) -> Result<CmdResult> {
        commands::case_files::mine(&self.store, session)
    }

    pub fn center_stats(
        &self,
        session: Option<&Session>,
        center_id: Option<u64>,
    ) -> Result<CmdResult> {
        commands::stats::run(&self.store, session, center_id)
    }
}

/// Parse `field=value` pairs such as `diagnosis=Flu` or `id_sheet=...`.
///
/// Only the first `=` splits, so values may contain `=` themselves.
pub fn parse_field_edits<S: AsRef<str>>(inputs: &[S]) -> Result<Vec<(ClinicalField, String)>> {
    inputs
        .iter()
        .map(|input| {
            let input = input.as_ref();
            let (key, value) = input.split_once('=').ok_or_else(|| {
                ClinicError::Api(format!("expected field=value, got {:?}", input))
            })?;
            let field = key.parse::<ClinicalField>().map_err(ClinicError::Api)?;
            Ok((field, value.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;
    use crate::store::mem_backend::MemBackend;
    use crate::test_utils::TestEnv;

    fn mem_api() -> ClinicApi<MemBackend> {
        ClinicApi::new(RecordStore::with_backend(MemBackend::new()))
    }

    fn user(first: &str, role: Role, center_id: u64) -> NewUser {
        NewUser {
            first_name: first.into(),
            last_name: "Ruiz".into(),
            email: format!("{}@clinic.test", first.to_lowercase()),
            role,
            password: "pw".into(),
            center_id,
        }
    }

    #[test]
    fn parse_field_edits_splits_on_first_equals() {
        let edits = parse_field_edits(&["diagnosis=Flu", "Id_Sheet=a=b"]).unwrap();
        assert_eq!(
            edits,
            vec![
                (ClinicalField::Diagnosis, "Flu".to_string()),
                (ClinicalField::IdSheet, "a=b".to_string()),
            ]
        );
    }

    #[test]
    fn parse_field_edits_rejects_bad_input() {
        assert!(matches!(
            parse_field_edits(&["diagnosis"]),
            Err(ClinicError::Api(_))
        ));
        assert!(matches!(
            parse_field_edits(&["blood=0+"]),
            Err(ClinicError::Api(_))
        ));
    }

    #[test]
    fn login_then_doctor_workflow() {
        let api = mem_api();
        api.create_center("Central".into(), "Calle 1".into(), "22223333".into())
            .unwrap();
        api.create_user(user("Ana", Role::Doctor, 1)).unwrap();
        api.create_user(user("Pablo", Role::Patient, 1)).unwrap();

        let (doctor, _) = api.login("ana@clinic.test", "pw").unwrap();
        let created = api
            .create_case_file(&doctor, 2, &["diagnosis=Flu", "treatment=Rest"])
            .unwrap();
        let id = created.created_id.unwrap();

        api.update_case_file(&doctor, id, &["observations=Better"])
            .unwrap();

        let (patient, _) = api.login("pablo@clinic.test", "pw").unwrap();
        let mine = api.my_case_files(&patient).unwrap();
        assert_eq!(mine.case_files.len(), 1);
        assert_eq!(mine.case_files[0].observations, "Better");
        assert_eq!(mine.case_files[0].treatment, "Rest");
    }

    #[test]
    fn file_backed_api_persists_across_instances() {
        let env = TestEnv::new();
        let api = ClinicApi::new(env.store);
        api.create_center("Central".into(), "Calle 1".into(), "22223333".into())
            .unwrap();

        let reopened = ClinicApi::new(RecordStore::with_backend(
            crate::store::fs_backend::FsBackend::new(env.root.clone()),
        ));
        let listed = reopened.list_centers().unwrap();
        assert_eq!(listed.centers.len(), 1);
        assert_eq!(listed.centers[0].name, "Central");
        assert!(env.root.join("centros.dat").exists());
    }
}
