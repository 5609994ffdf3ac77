use super::UserDao;
use crate::codec::USER_CENTER_COLUMN;
use crate::error::Result;
use crate::model::{Role, User};
use crate::store::backend::StorageBackend;

impl<B: StorageBackend> UserDao<'_, B> {
    /// Active users belonging to `center_id`.
    pub fn by_center(&self, center_id: u64) -> Result<Vec<User>> {
        self.filter_by_key(USER_CENTER_COLUMN, center_id, |user| {
            user.center_id == center_id
        })
    }

    pub fn by_role(&self, role: &Role) -> Result<Vec<User>> {
        self.filter(|user| &user.role == role)
    }

    pub fn doctors(&self) -> Result<Vec<User>> {
        self.by_role(&Role::Doctor)
    }

    pub fn patients(&self) -> Result<Vec<User>> {
        self.by_role(&Role::Patient)
    }

    pub fn administrators(&self) -> Result<Vec<User>> {
        self.by_role(&Role::Administrator)
    }

    pub fn doctors_by_center(&self, center_id: u64) -> Result<Vec<User>> {
        Ok(self
            .by_center(center_id)?
            .into_iter()
            .filter(User::is_doctor)
            .collect())
    }

    pub fn patients_by_center(&self, center_id: u64) -> Result<Vec<User>> {
        Ok(self
            .by_center(center_id)?
            .into_iter()
            .filter(User::is_patient)
            .collect())
    }

    /// Active user with exactly this email and password, if any.
    pub fn login(&self, email: &str, password: &str) -> Result<Option<User>> {
        Ok(self
            .get_all()?
            .into_iter()
            .find(|user| user.email == email && user.password == password))
    }
}
