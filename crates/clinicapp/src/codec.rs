//! # Entity Codecs
//!
//! Each entity kind maps to an ordered list of text fields. [`Record::encode`]
//! produces the list without the identifier (the store prepends it);
//! [`Record::decode`] reads a full stored row, identifier included.
//!
//! | Value   | Stored as                                         |
//! |---------|---------------------------------------------------|
//! | bool    | `True` / `False`, read back case-insensitively    |
//! | time    | `YYYY-MM-DD HH:MM:SS`                             |
//! | role    | `doctor` / `patient` / `administrator` / verbatim |
//!
//! A row shorter than the entity's field count decodes to `None`. A column
//! that must be an integer or a timestamp and isn't is a
//! [`ClinicError::MalformedRecord`].
//!
//! Encoding refuses values containing the column delimiter or a line break,
//! since either would silently shift every later column of the row.

use crate::error::{ClinicError, Result};
use crate::model::{CaseFile, Center, Role, User, TIMESTAMP_FORMAT};
use crate::store::{Row, DELIMITER};
use chrono::NaiveDateTime;

/// An entity persisted as one delimited row in its own file.
pub trait Record: Sized + Clone {
    /// Logical file name handed to the store.
    const FILE: &'static str;

    /// Columns in a full row, identifier included.
    const FIELD_COUNT: usize;

    /// Text columns scanned by a free-text search, in priority order.
    const SEARCH_COLUMNS: &'static [usize];

    fn id(&self) -> u64;
    fn set_id(&mut self, id: u64);

    fn is_active(&self) -> bool;
    fn set_active(&mut self, active: bool);

    /// Fields in column order, identifier excluded.
    fn encode(&self) -> Result<Vec<String>>;

    /// Build the entity from a stored row, identifier included.
    fn decode(row: &[String]) -> Result<Option<Self>>;

    /// Called on every update before encoding.
    fn touch(&mut self) {}
}

pub fn encode_flag(flag: bool) -> String {
    let raw = if flag { "True" } else { "False" };
    raw.to_string()
}

pub fn decode_flag(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("true")
}

pub fn encode_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

fn decode_timestamp(file: &str, raw: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT).map_err(|_| {
        ClinicError::MalformedRecord {
            file: file.to_string(),
            reason: format!("timestamp {:?} is not {}", raw, TIMESTAMP_FORMAT),
        }
    })
}

fn decode_int(file: &str, raw: &str) -> Result<u64> {
    raw.trim()
        .parse()
        .map_err(|_| ClinicError::MalformedRecord {
            file: file.to_string(),
            reason: format!("{:?} is not an integer", raw),
        })
}

/// Reject values that would break the row layout.
pub fn check_field(name: &str, value: &str) -> Result<()> {
    if value.contains(DELIMITER) || value.contains('\n') || value.contains('\r') {
        return Err(ClinicError::Validation(format!(
            "{} must not contain '{}' or line breaks",
            name, DELIMITER
        )));
    }
    Ok(())
}

impl Record for Center {
    const FILE: &'static str = "centros";
    const FIELD_COUNT: usize = 6;
    const SEARCH_COLUMNS: &'static [usize] = &[1, 2];

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn encode(&self) -> Result<Vec<String>> {
        check_field("name", &self.name)?;
        check_field("address", &self.address)?;
        check_field("phone", &self.phone)?;
        Ok(vec![
            self.name.clone(),
            self.address.clone(),
            self.phone.clone(),
            encode_flag(self.active),
            encode_timestamp(&self.created_at),
        ])
    }

    fn decode(row: &[String]) -> Result<Option<Self>> {
        if row.len() < Self::FIELD_COUNT {
            return Ok(None);
        }
        Ok(Some(Center {
            id: decode_int(Self::FILE, &row[0])?,
            name: row[1].clone(),
            address: row[2].clone(),
            phone: row[3].clone(),
            active: decode_flag(&row[4]),
            created_at: decode_timestamp(Self::FILE, &row[5])?,
        }))
    }
}

/// Column of `center_id` in a user row.
pub const USER_CENTER_COLUMN: usize = 6;

/// Rows written before users carried a password and a center.
const LEGACY_USER_FIELD_COUNT: usize = 7;

impl Record for User {
    const FILE: &'static str = "usuarios";
    const FIELD_COUNT: usize = 9;
    const SEARCH_COLUMNS: &'static [usize] = &[1, 2, 3];

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn encode(&self) -> Result<Vec<String>> {
        check_field("first name", &self.first_name)?;
        check_field("last name", &self.last_name)?;
        check_field("email", &self.email)?;
        check_field("role", self.role.as_str())?;
        check_field("password", &self.password)?;
        Ok(vec![
            self.first_name.clone(),
            self.last_name.clone(),
            self.email.clone(),
            self.role.as_str().to_string(),
            self.password.clone(),
            self.center_id.to_string(),
            encode_flag(self.active),
            encode_timestamp(&self.registered_at),
        ])
    }

    fn decode(row: &[String]) -> Result<Option<Self>> {
        if row.len() >= Self::FIELD_COUNT {
            return Ok(Some(User {
                id: decode_int(Self::FILE, &row[0])?,
                first_name: row[1].clone(),
                last_name: row[2].clone(),
                email: row[3].clone(),
                role: Role::parse(&row[4]),
                password: row[5].clone(),
                center_id: decode_int(Self::FILE, &row[6])?,
                active: decode_flag(&row[7]),
                registered_at: decode_timestamp(Self::FILE, &row[8])?,
            }));
        }
        // a canonical row cut short has a center id where the legacy layout
        // keeps its timestamp; such a row is absent, not malformed
        if row.len() >= LEGACY_USER_FIELD_COUNT {
            let parsed = NaiveDateTime::parse_from_str(row[6].trim(), TIMESTAMP_FORMAT);
            let registered_at = match parsed {
                Ok(ts) => ts,
                Err(_) => return Ok(None),
            };
            return Ok(Some(User {
                id: decode_int(Self::FILE, &row[0])?,
                first_name: row[1].clone(),
                last_name: row[2].clone(),
                email: row[3].clone(),
                role: Role::parse(&row[4]),
                password: String::new(),
                center_id: 0,
                active: decode_flag(&row[5]),
                registered_at,
            }));
        }
        Ok(None)
    }
}

/// Columns of the foreign keys in a case file row.
pub const CASE_PATIENT_COLUMN: usize = 1;
pub const CASE_DOCTOR_COLUMN: usize = 2;
pub const CASE_CENTER_COLUMN: usize = 3;

impl Record for CaseFile {
    const FILE: &'static str = "expedientes";
    const FIELD_COUNT: usize = 18;
    const SEARCH_COLUMNS: &'static [usize] = &[4, 5, 6];

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn encode(&self) -> Result<Vec<String>> {
        let texts = [
            ("diagnosis", &self.diagnosis),
            ("treatment", &self.treatment),
            ("observations", &self.observations),
            ("referral", &self.referral),
            ("counter-referral", &self.counter_referral),
            ("interconsult", &self.interconsult),
            ("nursing", &self.nursing),
            ("clinical history", &self.clinical_history),
            ("consents", &self.consents),
            ("identification sheet", &self.id_sheet),
            ("exam report", &self.exam_report),
        ];

        let mut fields = Vec::with_capacity(Self::FIELD_COUNT - 1);
        fields.push(self.patient_id.to_string());
        fields.push(self.doctor_id.to_string());
        fields.push(self.center_id.to_string());
        for (name, value) in texts {
            check_field(name, value)?;
            fields.push(value.clone());
        }
        fields.push(encode_flag(self.active));
        fields.push(encode_timestamp(&self.created_at));
        fields.push(encode_timestamp(&self.modified_at));
        Ok(fields)
    }

    fn decode(row: &[String]) -> Result<Option<Self>> {
        if row.len() < Self::FIELD_COUNT {
            return Ok(None);
        }
        Ok(Some(CaseFile {
            id: decode_int(Self::FILE, &row[0])?,
            patient_id: decode_int(Self::FILE, &row[1])?,
            doctor_id: decode_int(Self::FILE, &row[2])?,
            center_id: decode_int(Self::FILE, &row[3])?,
            diagnosis: row[4].clone(),
            treatment: row[5].clone(),
            observations: row[6].clone(),
            referral: row[7].clone(),
            counter_referral: row[8].clone(),
            interconsult: row[9].clone(),
            nursing: row[10].clone(),
            clinical_history: row[11].clone(),
            consents: row[12].clone(),
            id_sheet: row[13].clone(),
            exam_report: row[14].clone(),
            active: decode_flag(&row[15]),
            created_at: decode_timestamp(Self::FILE, &row[16])?,
            modified_at: decode_timestamp(Self::FILE, &row[17])?,
        }))
    }

    fn touch(&mut self) {
        self.modified_at = crate::model::now();
    }
}

/// Prepend the identifier to an encoded entity, giving the full stored row.
pub fn to_row<R: Record>(record: &R) -> Result<Row> {
    let mut row = vec![record.id().to_string()];
    row.extend(record.encode()?);
    Ok(row)
}
