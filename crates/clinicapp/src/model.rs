use chrono::{Local, NaiveDateTime, SubsecRound};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// On-disk timestamp layout, local wall-clock time.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current local time at second precision, so it survives a write/read cycle.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(0)
}

/// A medical facility; the tenancy boundary for its users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Center {
    pub id: u64,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub active: bool,
    pub created_at: NaiveDateTime,
}

impl Center {
    pub fn new(name: String, address: String, phone: String) -> Self {
        Self {
            id: 0,
            name,
            address,
            phone,
            active: true,
            created_at: now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Role {
    Doctor,
    Patient,
    Administrator,
    /// Unrecognized role strings are kept verbatim.
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::Doctor => "doctor",
            Role::Patient => "patient",
            Role::Administrator => "administrator",
            Role::Other(raw) => raw.as_str(),
        }
    }

    /// Parse a stored role. Accepts the legacy Spanish spellings too.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "doctor" | "medico" | "médico" => Role::Doctor,
            "patient" | "paciente" => Role::Patient,
            "administrator" | "administrador" => Role::Administrator,
            _ => Role::Other(raw.to_string()),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Role {
    fn from(raw: String) -> Self {
        Role::parse(&raw)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    /// Stored in plain text.
    #[serde(skip_serializing, default)]
    pub password: String,
    /// Owning center; 0 for legacy rows written before users had one.
    pub center_id: u64,
    pub active: bool,
    pub registered_at: NaiveDateTime,
}

impl User {
    pub fn new(
        first_name: String,
        last_name: String,
        email: String,
        role: Role,
        password: String,
        center_id: u64,
    ) -> Self {
        Self {
            id: 0,
            first_name,
            last_name,
            email,
            role,
            password,
            center_id,
            active: true,
            registered_at: now(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_doctor(&self) -> bool {
        self.role == Role::Doctor
    }

    pub fn is_patient(&self) -> bool {
        self.role == Role::Patient
    }

    pub fn is_administrator(&self) -> bool {
        self.role == Role::Administrator
    }
}

/// A patient's clinical record for one doctor/center encounter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseFile {
    pub id: u64,
    pub patient_id: u64,
    pub doctor_id: u64,
    pub center_id: u64,
    pub diagnosis: String,
    pub treatment: String,
    pub observations: String,
    pub referral: String,
    pub counter_referral: String,
    pub interconsult: String,
    pub nursing: String,
    pub clinical_history: String,
    pub consents: String,
    pub id_sheet: String,
    pub exam_report: String,
    pub active: bool,
    pub created_at: NaiveDateTime,
    pub modified_at: NaiveDateTime,
}

impl CaseFile {
    pub fn new(patient_id: u64, doctor_id: u64, center_id: u64) -> Self {
        let now = now();
        Self {
            id: 0,
            patient_id,
            doctor_id,
            center_id,
            diagnosis: String::new(),
            treatment: String::new(),
            observations: String::new(),
            referral: String::new(),
            counter_referral: String::new(),
            interconsult: String::new(),
            nursing: String::new(),
            clinical_history: String::new(),
            consents: String::new(),
            id_sheet: String::new(),
            exam_report: String::new(),
            active: true,
            created_at: now,
            modified_at: now,
        }
    }

    pub fn field(&self, field: ClinicalField) -> &str {
        match field {
            ClinicalField::Diagnosis => &self.diagnosis,
            ClinicalField::Treatment => &self.treatment,
            ClinicalField::Observations => &self.observations,
            ClinicalField::Referral => &self.referral,
            ClinicalField::CounterReferral => &self.counter_referral,
            ClinicalField::Interconsult => &self.interconsult,
            ClinicalField::Nursing => &self.nursing,
            ClinicalField::ClinicalHistory => &self.clinical_history,
            ClinicalField::Consents => &self.consents,
            ClinicalField::IdSheet => &self.id_sheet,
            ClinicalField::ExamReport => &self.exam_report,
        }
    }

    pub fn set_field(&mut self, field: ClinicalField, value: String) {
        let slot = match field {
            ClinicalField::Diagnosis => &mut self.diagnosis,
            ClinicalField::Treatment => &mut self.treatment,
            ClinicalField::Observations => &mut self.observations,
            ClinicalField::Referral => &mut self.referral,
            ClinicalField::CounterReferral => &mut self.counter_referral,
            ClinicalField::Interconsult => &mut self.interconsult,
            ClinicalField::Nursing => &mut self.nursing,
            ClinicalField::ClinicalHistory => &mut self.clinical_history,
            ClinicalField::Consents => &mut self.consents,
            ClinicalField::IdSheet => &mut self.id_sheet,
            ClinicalField::ExamReport => &mut self.exam_report,
        };
        *slot = value;
    }
}

/// The free-text clinical sections of a case file, in column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClinicalField {
    Diagnosis,
    Treatment,
    Observations,
    Referral,
    CounterReferral,
    Interconsult,
    Nursing,
    ClinicalHistory,
    Consents,
    IdSheet,
    ExamReport,
}

impl ClinicalField {
    pub const ALL: [ClinicalField; 11] = [
        ClinicalField::Diagnosis,
        ClinicalField::Treatment,
        ClinicalField::Observations,
        ClinicalField::Referral,
        ClinicalField::CounterReferral,
        ClinicalField::Interconsult,
        ClinicalField::Nursing,
        ClinicalField::ClinicalHistory,
        ClinicalField::Consents,
        ClinicalField::IdSheet,
        ClinicalField::ExamReport,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ClinicalField::Diagnosis => "diagnosis",
            ClinicalField::Treatment => "treatment",
            ClinicalField::Observations => "observations",
            ClinicalField::Referral => "referral",
            ClinicalField::CounterReferral => "counter-referral",
            ClinicalField::Interconsult => "interconsult",
            ClinicalField::Nursing => "nursing",
            ClinicalField::ClinicalHistory => "clinical-history",
            ClinicalField::Consents => "consents",
            ClinicalField::IdSheet => "id-sheet",
            ClinicalField::ExamReport => "exam-report",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ClinicalField::Diagnosis => "Diagnosis",
            ClinicalField::Treatment => "Treatment",
            ClinicalField::Observations => "Observations",
            ClinicalField::Referral => "Referral",
            ClinicalField::CounterReferral => "Counter-referral",
            ClinicalField::Interconsult => "Interconsult",
            ClinicalField::Nursing => "Nursing",
            ClinicalField::ClinicalHistory => "Clinical history",
            ClinicalField::Consents => "Consent forms",
            ClinicalField::IdSheet => "Identification sheet",
            ClinicalField::ExamReport => "Exam report",
        }
    }
}

impl FromStr for ClinicalField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        ClinicalField::ALL
            .into_iter()
            .find(|field| field.key() == wanted)
            .ok_or_else(|| format!("Unknown case file field: {}", s))
    }
}
