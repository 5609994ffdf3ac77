use crate::commands::{CmdMessage, CmdResult};
use crate::dao::{CaseFileDao, CenterDao, UserDao};
use crate::error::{ClinicError, Result};
use crate::model::{CaseFile, ClinicalField, Role};
use crate::session::{can_view_case, Session};
use crate::store::backend::StorageBackend;
use crate::store::RecordStore;

#[derive(Debug, Clone, Default)]
pub struct NewCaseFile {
    pub patient_id: u64,
    pub fields: Vec<(ClinicalField, String)>,
}

/// Open a case file. The signed-in doctor becomes its author and their
/// center its owner; the patient must be an active patient of that center.
pub fn create<B: StorageBackend>(
    store: &RecordStore<B>,
    session: &Session,
    new: NewCaseFile,
) -> Result<CmdResult> {
    session.require(&[Role::Doctor], "create case files")?;

    let users = UserDao::new(store);
    let doctor_active = users
        .get_by_id(session.user_id())?
        .is_some_and(|user| user.active && user.is_doctor());
    if !doctor_active {
        return Err(ClinicError::Api(format!(
            "doctor {} is not an active doctor",
            session.user_id()
        )));
    }

    let center_active = CenterDao::new(store)
        .get_by_id(session.center_id())?
        .is_some_and(|center| center.active);
    if !center_active {
        return Err(ClinicError::Api(format!(
            "center {} is not an active center",
            session.center_id()
        )));
    }

    let in_center = users
        .patients_by_center(session.center_id())?
        .iter()
        .any(|patient| patient.id == new.patient_id);
    if !in_center {
        return Err(ClinicError::Api(format!(
            "user {} is not an active patient of center {}",
            new.patient_id,
            session.center_id()
        )));
    }

    let mut case = CaseFile::new(new.patient_id, session.user_id(), session.center_id());
    for (field, value) in new.fields {
        case.set_field(field, value.trim().to_string());
    }
    let id = CaseFileDao::new(store).create(&case)?;

    let mut result = CmdResult {
        created_id: Some(id),
        ..Default::default()
    };
    result.add_message(CmdMessage::success(format!(
        "Case file {} opened for patient {}.",
        id, case.patient_id
    )));
    Ok(result.with_case_files(vec![CaseFile { id, ..case }]))
}

/// Active case files the caller may see.
pub fn list<B: StorageBackend>(
    store: &RecordStore<B>,
    session: Option<&Session>,
) -> Result<CmdResult> {
    let cases = visible(session, CaseFileDao::new(store).get_all()?);
    Ok(listing(cases, "No case files registered."))
}

pub fn search<B: StorageBackend>(
    store: &RecordStore<B>,
    session: Option<&Session>,
    term: &str,
) -> Result<CmdResult> {
    let cases = visible(session, CaseFileDao::new(store).search(term)?);
    Ok(listing(cases, &format!("No case files match \"{}\".", term)))
}

/// Show one case file, archived ones included. Case files outside the
/// caller's reach are reported as missing.
pub fn show<B: StorageBackend>(
    store: &RecordStore<B>,
    session: Option<&Session>,
    id: u64,
) -> Result<CmdResult> {
    let found = CaseFileDao::new(store)
        .get_by_id(id)?
        .filter(|case| can_view_case(session, case));
    match found {
        Some(case) => Ok(CmdResult::default().with_case_files(vec![case])),
        None => Ok(CmdResult::not_found(format!("Case file {} not found.", id))),
    }
}

/// Rewrite clinical fields of a case file. Only its author may edit it.
/// Blank values keep the stored text.
pub fn edit<B: StorageBackend>(
    store: &RecordStore<B>,
    session: &Session,
    id: u64,
    edits: Vec<(ClinicalField, String)>,
) -> Result<CmdResult> {
    session.require(&[Role::Doctor], "edit case files")?;

    let dao = CaseFileDao::new(store);
    let Some(mut case) = dao.get_by_id(id)? else {
        return Ok(CmdResult::not_found(format!("Case file {} not found.", id)));
    };
    if case.doctor_id != session.user_id() {
        return Err(ClinicError::Auth(format!(
            "case file {} belongs to doctor {}",
            id, case.doctor_id
        )));
    }

    let mut changed = false;
    for (field, value) in edits {
        let value = value.trim();
        if !value.is_empty() {
            case.set_field(field, value.to_string());
            changed = true;
        }
    }

    let mut result = CmdResult::default();
    if !changed {
        result.add_message(CmdMessage::info("Nothing to change."));
        return Ok(result.with_case_files(vec![case]));
    }

    if dao.update(&mut case)? {
        result.add_message(CmdMessage::success(format!("Case file {} updated.", id)));
    } else {
        result.add_message(CmdMessage::error(format!(
            "Case file {} could not be updated.",
            id
        )));
    }
    Ok(result.with_case_files(vec![case]))
}

/// Archive a case file. Needs an administrator of the owning center.
pub fn archive<B: StorageBackend>(
    store: &RecordStore<B>,
    session: &Session,
    id: u64,
) -> Result<CmdResult> {
    session.require(&[Role::Administrator], "archive case files")?;

    let dao = CaseFileDao::new(store);
    let Some(case) = dao.get_by_id(id)? else {
        return Ok(CmdResult::not_found(format!("Case file {} not found.", id)));
    };
    session.require_center(case.center_id, "archive case files")?;

    let mut result = CmdResult::default();
    if dao.delete(id)? {
        result.add_message(CmdMessage::success(format!("Case file {} archived.", id)));
    } else {
        result.add_message(CmdMessage::error(format!(
            "Case file {} could not be archived.",
            id
        )));
    }
    Ok(result)
}

/// Case files of one patient.
///
/// Staff may only ask about active patients of their own center, and a
/// patient only about themselves.
pub fn by_patient<B: StorageBackend>(
    store: &RecordStore<B>,
    session: Option<&Session>,
    patient_id: u64,
) -> Result<CmdResult> {
    if let Some(session) = session {
        match session.role() {
            Role::Administrator | Role::Doctor => {
                let in_center = UserDao::new(store)
                    .patients_by_center(session.center_id())?
                    .iter()
                    .any(|patient| patient.id == patient_id);
                if !in_center {
                    return Err(ClinicError::Auth(format!(
                        "patient {} is not in center {}",
                        patient_id,
                        session.center_id()
                    )));
                }
            }
            Role::Patient if session.user_id() == patient_id => {}
            _ => {
                return Err(ClinicError::Auth(format!(
                    "{} cannot view case files of patient {}",
                    session.role(),
                    patient_id
                )))
            }
        }
    }

    let cases = CaseFileDao::new(store).by_patient(patient_id)?;
    Ok(listing(cases, &format!("Patient {} has no case files.", patient_id)))
}

/// Case files written by one doctor. Administrators are limited to the
/// doctors of their own center.
pub fn by_doctor<B: StorageBackend>(
    store: &RecordStore<B>,
    session: Option<&Session>,
    doctor_id: u64,
) -> Result<CmdResult> {
    if let Some(session) = session {
        session.require(&[Role::Administrator], "list case files by doctor")?;
        let in_center = UserDao::new(store)
            .doctors_by_center(session.center_id())?
            .iter()
            .any(|doctor| doctor.id == doctor_id);
        if !in_center {
            return Err(ClinicError::Auth(format!(
                "doctor {} is not in center {}",
                doctor_id,
                session.center_id()
            )));
        }
    }

    let cases = CaseFileDao::new(store).by_doctor(doctor_id)?;
    Ok(listing(cases, &format!("Doctor {} has no case files.", doctor_id)))
}

pub fn by_center<B: StorageBackend>(
    store: &RecordStore<B>,
    session: Option<&Session>,
    center_id: u64,
) -> Result<CmdResult> {
    if let Some(session) = session {
        session.require(&[Role::Administrator], "list case files by center")?;
        session.require_center(center_id, "list case files")?;
    }

    let cases = CaseFileDao::new(store).by_center(center_id)?;
    Ok(listing(cases, &format!("Center {} has no case files.", center_id)))
}

/// A doctor's authored case files, or a patient's own.
pub fn mine<B: StorageBackend>(store: &RecordStore<B>, session: &Session) -> Result<CmdResult> {
    let dao = CaseFileDao::new(store);
    let cases = match session.role() {
        Role::Doctor => dao.by_doctor(session.user_id())?,
        Role::Patient => dao.by_patient(session.user_id())?,
        role => {
            return Err(ClinicError::Auth(format!(
                "{} has no case files of their own",
                role
            )))
        }
    };
    Ok(listing(cases, "You have no case files."))
}

fn visible(session: Option<&Session>, cases: Vec<CaseFile>) -> Vec<CaseFile> {
    cases
        .into_iter()
        .filter(|case| can_view_case(session, case))
        .collect()
}

fn listing(cases: Vec<CaseFile>, empty: &str) -> CmdResult {
    let mut result = CmdResult::default();
    if cases.is_empty() {
        result.add_message(CmdMessage::info(empty));
    }
    result.with_case_files(cases)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::users::{self, NewUser};
    use crate::commands::{centers, MessageLevel};
    use crate::store::mem_backend::MemBackend;
    use crate::test_utils::{mem_store, session_for};

    struct Clinic {
        store: RecordStore<MemBackend>,
        admin: Session,
        doctor: Session,
        patient_id: u64,
    }

    fn register(store: &RecordStore<MemBackend>, first: &str, role: Role, center_id: u64) -> u64 {
        users::create(
            store,
            NewUser {
                first_name: first.into(),
                last_name: "Lopez".into(),
                email: format!("{}@clinic.test", first.to_lowercase()),
                role,
                password: "pw".into(),
                center_id,
            },
        )
        .unwrap()
        .created_id
        .unwrap()
    }

    /// Two centers; center 1 has an admin, a doctor and a patient.
    fn clinic() -> Clinic {
        let store = mem_store();
        centers::create(&store, "Norte".into(), "a".into(), "11112222".into()).unwrap();
        centers::create(&store, "Sur".into(), "b".into(), "33334444".into()).unwrap();
        let admin = session_for(&store, Role::Administrator, 1);
        let doctor = session_for(&store, Role::Doctor, 1);
        let patient_id = register(&store, "Pablo", Role::Patient, 1);
        Clinic {
            store,
            admin,
            doctor,
            patient_id,
        }
    }

    fn open_case(clinic: &Clinic, diagnosis: &str) -> u64 {
        create(
            &clinic.store,
            &clinic.doctor,
            NewCaseFile {
                patient_id: clinic.patient_id,
                fields: vec![(ClinicalField::Diagnosis, diagnosis.into())],
            },
        )
        .unwrap()
        .created_id
        .unwrap()
    }

    fn login(store: &RecordStore<MemBackend>, email: &str) -> Session {
        crate::session::login(store, email, "pw").unwrap().unwrap()
    }

    #[test]
    fn doctor_opens_case_in_own_center() {
        let clinic = clinic();
        let id = open_case(&clinic, "Flu");

        let shown = show(&clinic.store, None, id).unwrap();
        let case = &shown.case_files[0];
        assert_eq!(case.doctor_id, clinic.doctor.user_id());
        assert_eq!(case.center_id, 1);
        assert_eq!(case.patient_id, clinic.patient_id);
        assert_eq!(case.diagnosis, "Flu");
        assert_eq!(case.created_at, case.modified_at);
    }

    #[test]
    fn only_doctors_open_case_files() {
        let clinic = clinic();
        let result = create(
            &clinic.store,
            &clinic.admin,
            NewCaseFile {
                patient_id: clinic.patient_id,
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(ClinicError::Auth(_))));
    }

    #[test]
    fn patient_must_belong_to_the_doctor_center() {
        let clinic = clinic();
        let elsewhere = register(&clinic.store, "Sara", Role::Patient, 2);
        let not_a_patient = clinic.admin.user_id();

        for patient_id in [elsewhere, not_a_patient, 99] {
            let result = create(
                &clinic.store,
                &clinic.doctor,
                NewCaseFile {
                    patient_id,
                    ..Default::default()
                },
            );
            assert!(matches!(result, Err(ClinicError::Api(_))));
        }
        assert!(clinic.store.backend().raw_lines("expedientes").is_none());
    }

    #[test]
    fn archived_doctor_cannot_open_case_files() {
        let clinic = clinic();
        UserDao::new(&clinic.store)
            .delete(clinic.doctor.user_id())
            .unwrap();
        let result = create(
            &clinic.store,
            &clinic.doctor,
            NewCaseFile {
                patient_id: clinic.patient_id,
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(ClinicError::Api(_))));
    }

    #[test]
    fn only_the_author_edits() {
        let clinic = clinic();
        let id = open_case(&clinic, "Flu");
        let other = session_for(&clinic.store, Role::Doctor, 1);

        let edits = vec![
            (ClinicalField::Treatment, "Rest".to_string()),
            (ClinicalField::Observations, "  ".to_string()),
        ];
        assert!(matches!(
            edit(&clinic.store, &other, id, edits.clone()),
            Err(ClinicError::Auth(_))
        ));

        let edited = edit(&clinic.store, &clinic.doctor, id, edits).unwrap();
        let case = &edited.case_files[0];
        assert_eq!(case.treatment, "Rest");
        assert_eq!(case.observations, "");
        assert!(matches!(edited.messages[0].level, MessageLevel::Success));
    }

    #[test]
    fn edit_rejects_delimiter_in_clinical_text() {
        let clinic = clinic();
        let id = open_case(&clinic, "Flu");
        let result = edit(
            &clinic.store,
            &clinic.doctor,
            id,
            vec![(ClinicalField::Nursing, "a|b".into())],
        );
        assert!(matches!(result, Err(ClinicError::Validation(_))));
    }

    #[test]
    fn patients_only_see_their_own_case_files() {
        let clinic = clinic();
        open_case(&clinic, "Flu");
        let sara = register(&clinic.store, "Sara", Role::Patient, 1);
        let sara_session = login(&clinic.store, "sara@clinic.test");
        create(
            &clinic.store,
            &clinic.doctor,
            NewCaseFile {
                patient_id: sara,
                ..Default::default()
            },
        )
        .unwrap();

        let listed = list(&clinic.store, Some(&sara_session)).unwrap();
        assert_eq!(listed.case_files.len(), 1);
        assert_eq!(listed.case_files[0].patient_id, sara);

        let mine = mine(&clinic.store, &sara_session).unwrap();
        assert_eq!(mine.case_files.len(), 1);

        assert!(show(&clinic.store, Some(&sara_session), 1)
            .unwrap()
            .case_files
            .is_empty());
        assert!(matches!(
            by_patient(&clinic.store, Some(&sara_session), clinic.patient_id),
            Err(ClinicError::Auth(_))
        ));
        assert_eq!(
            by_patient(&clinic.store, Some(&sara_session), sara)
                .unwrap()
                .case_files
                .len(),
            1
        );
    }

    #[test]
    fn staff_queries_stay_inside_their_center() {
        let clinic = clinic();
        open_case(&clinic, "Flu");
        let outsider = register(&clinic.store, "Sara", Role::Patient, 2);

        let by_patient_result =
            by_patient(&clinic.store, Some(&clinic.doctor), clinic.patient_id).unwrap();
        assert_eq!(by_patient_result.case_files.len(), 1);
        assert!(matches!(
            by_patient(&clinic.store, Some(&clinic.doctor), outsider),
            Err(ClinicError::Auth(_))
        ));

        let doctor_id = clinic.doctor.user_id();
        assert_eq!(
            by_doctor(&clinic.store, Some(&clinic.admin), doctor_id)
                .unwrap()
                .case_files
                .len(),
            1
        );
        assert!(matches!(
            by_doctor(&clinic.store, Some(&clinic.doctor), doctor_id),
            Err(ClinicError::Auth(_))
        ));

        assert_eq!(
            by_center(&clinic.store, Some(&clinic.admin), 1)
                .unwrap()
                .case_files
                .len(),
            1
        );
        assert!(matches!(
            by_center(&clinic.store, Some(&clinic.admin), 2),
            Err(ClinicError::Auth(_))
        ));
    }

    #[test]
    fn anonymous_queries_are_unrestricted() {
        let clinic = clinic();
        open_case(&clinic, "Flu");
        assert_eq!(list(&clinic.store, None).unwrap().case_files.len(), 1);
        assert_eq!(search(&clinic.store, None, "flu").unwrap().case_files.len(), 1);
        assert_eq!(
            by_doctor(&clinic.store, None, clinic.doctor.user_id())
                .unwrap()
                .case_files
                .len(),
            1
        );
    }

    #[test]
    fn archive_hides_case_from_listings() {
        let clinic = clinic();
        let id = open_case(&clinic, "Flu");

        assert!(matches!(
            archive(&clinic.store, &clinic.doctor, id),
            Err(ClinicError::Auth(_))
        ));
        archive(&clinic.store, &clinic.admin, id).unwrap();

        assert!(list(&clinic.store, None).unwrap().case_files.is_empty());
        assert!(!show(&clinic.store, None, id).unwrap().case_files[0].active);
    }

    #[test]
    fn mine_is_for_doctors_and_patients() {
        let clinic = clinic();
        open_case(&clinic, "Flu");
        assert_eq!(
            mine(&clinic.store, &clinic.doctor).unwrap().case_files.len(),
            1
        );
        assert!(matches!(
            mine(&clinic.store, &clinic.admin),
            Err(ClinicError::Auth(_))
        ));
    }
}
