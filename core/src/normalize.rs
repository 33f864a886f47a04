//! Normalized equality used to detect near-duplicate employee records.
//!
//! Two records are equivalent only when name, email, department and phone
//! all match after normalization. Sharing an email alone is not enough.

use crate::types::{Employee, NewEmployee};

/// Lower-case and drop every whitespace character.
pub fn normalize_text(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Keep only ASCII digits.
pub fn normalize_phone(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// The fields that identify a person for the uniqueness check, trimmed but
/// otherwise as stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordKey {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub department: String,
}

impl RecordKey {
    pub fn is_equivalent(&self, other: &RecordKey) -> bool {
        normalize_text(&self.name) == normalize_text(&other.name)
            && normalize_text(&self.email) == normalize_text(&other.email)
            && normalize_text(&self.department) == normalize_text(&other.department)
            && normalize_phone(&self.phone) == normalize_phone(&other.phone)
    }
}

impl From<&Employee> for RecordKey {
    fn from(employee: &Employee) -> Self {
        Self {
            name: employee.name.trim().to_string(),
            email: employee.email.trim().to_string(),
            phone: employee.phone.trim().to_string(),
            department: employee.department.trim().to_string(),
        }
    }
}

impl From<&NewEmployee> for RecordKey {
    fn from(employee: &NewEmployee) -> Self {
        Self {
            name: employee.name.trim().to_string(),
            email: employee.email.trim().to_string(),
            phone: employee.phone.as_deref().unwrap_or_default().trim().to_string(),
            department: employee.department.trim().to_string(),
        }
    }
}
