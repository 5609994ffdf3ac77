use super::CaseFileDao;
use crate::codec::{CASE_CENTER_COLUMN, CASE_DOCTOR_COLUMN, CASE_PATIENT_COLUMN};
use crate::error::Result;
use crate::model::CaseFile;
use crate::store::backend::StorageBackend;

impl<B: StorageBackend> CaseFileDao<'_, B> {
    pub fn by_patient(&self, patient_id: u64) -> Result<Vec<CaseFile>> {
        self.filter_by_key(CASE_PATIENT_COLUMN, patient_id, |case| {
            case.patient_id == patient_id
        })
    }

    pub fn by_doctor(&self, doctor_id: u64) -> Result<Vec<CaseFile>> {
        self.filter_by_key(CASE_DOCTOR_COLUMN, doctor_id, |case| {
            case.doctor_id == doctor_id
        })
    }

    pub fn by_center(&self, center_id: u64) -> Result<Vec<CaseFile>> {
        self.filter_by_key(CASE_CENTER_COLUMN, center_id, |case| {
            case.center_id == center_id
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Record;
    use crate::store::mem_backend::MemBackend;
    use crate::store::RecordStore;

    fn case(patient: u64, doctor: u64, center: u64, diagnosis: &str) -> CaseFile {
        let mut case = CaseFile::new(patient, doctor, center);
        case.diagnosis = diagnosis.into();
        case
    }

    fn ids(cases: &[CaseFile]) -> Vec<u64> {
        cases.iter().map(|c| c.id).collect()
    }

    #[test]
    fn foreign_key_queries_use_exact_equality() {
        let store = RecordStore::with_backend(MemBackend::new());
        let dao = CaseFileDao::new(&store);
        dao.create(&case(9, 1, 1, "Flu")).unwrap(); // 1
        dao.create(&case(19, 11, 1, "Cold")).unwrap(); // 2
        dao.create(&case(9, 11, 2, "Asthma")).unwrap(); // 3

        assert_eq!(ids(&dao.by_patient(9).unwrap()), vec![1, 3]);
        assert_eq!(ids(&dao.by_patient(19).unwrap()), vec![2]);
        assert_eq!(ids(&dao.by_doctor(1).unwrap()), vec![1]);
        assert_eq!(ids(&dao.by_doctor(11).unwrap()), vec![2, 3]);
        assert_eq!(ids(&dao.by_center(1).unwrap()), vec![1, 2]);
        assert!(dao.by_center(3).unwrap().is_empty());
    }

    #[test]
    fn archived_case_files_drop_out_of_queries() {
        let store = RecordStore::with_backend(MemBackend::new());
        let dao = CaseFileDao::new(&store);
        let id = dao.create(&case(9, 1, 1, "Flu")).unwrap();
        dao.delete(id).unwrap();

        assert!(dao.by_patient(9).unwrap().is_empty());
        assert!(!dao.get_by_id(id).unwrap().unwrap().is_active());
    }

    #[test]
    fn search_covers_diagnosis_treatment_and_observations() {
        let store = RecordStore::with_backend(MemBackend::new());
        let dao = CaseFileDao::new(&store);

        let mut by_treatment = case(1, 1, 1, "Migraine");
        by_treatment.treatment = "rest and fluids".into();
        dao.create(&by_treatment).unwrap(); // 1

        let mut by_observation = case(2, 1, 1, "Sprain");
        by_observation.observations = "Patient reports FLUID retention".into();
        dao.create(&by_observation).unwrap(); // 2

        dao.create(&case(3, 1, 1, "Fluid overload")).unwrap(); // 3

        let mut elsewhere = case(4, 1, 1, "Fracture");
        elsewhere.nursing = "fluids given".into();
        dao.create(&elsewhere).unwrap(); // 4

        // diagnosis column first, then treatment, then observations
        assert_eq!(ids(&dao.search("fluid").unwrap()), vec![3, 1, 2]);
    }

    #[test]
    fn update_refreshes_modification_time() {
        let store = RecordStore::with_backend(MemBackend::new());
        let dao = CaseFileDao::new(&store);
        let mut original = case(9, 1, 1, "Flu");
        original.modified_at = original.created_at - chrono::Duration::days(1);
        let id = dao.create(&original).unwrap();

        let mut loaded = dao.get_by_id(id).unwrap().unwrap();
        let before = loaded.modified_at;
        loaded.treatment = "Rest".into();
        assert!(dao.update(&mut loaded).unwrap());

        let stored = dao.get_by_id(id).unwrap().unwrap();
        assert!(stored.modified_at > before);
        assert_eq!(stored.created_at, original.created_at);
        assert_eq!(stored.treatment, "Rest");
    }
}
