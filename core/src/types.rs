//! Domain DTOs for the employee API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! Field names on the wire follow the backend (`joinDate`), while the Rust
//! side uses snake case. Integration tests catch any schema drift between the
//! two crates.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// A single employee record returned by the API.
///
/// Text fields missing from a stored record decode as empty strings, which is
/// how the backend stores an absent phone or join date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Employee {
    #[serde(deserialize_with = "id_from_number_or_string")]
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub department: String,
    #[serde(rename = "joinDate", default)]
    pub join_date: String,
}

impl Employee {
    /// Apply the fields present in `update` over this record.
    pub fn merged_with(&self, update: &EmployeeUpdate) -> Employee {
        let mut merged = self.clone();
        if let Some(name) = &update.name {
            merged.name = name.clone();
        }
        if let Some(email) = &update.email {
            merged.email = email.clone();
        }
        if let Some(phone) = &update.phone {
            merged.phone = phone.clone();
        }
        if let Some(department) = &update.department {
            merged.department = department.clone();
        }
        if let Some(join_date) = &update.join_date {
            merged.join_date = join_date.clone();
        }
        merged
    }
}

/// Request payload for creating a new employee. The repository assigns `id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewEmployee {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub department: String,
    #[serde(rename = "joinDate", default)]
    pub join_date: Option<String>,
}

impl NewEmployee {
    /// Trim every field and fill in a missing join date with `today`.
    pub fn normalized(&self, today: NaiveDate) -> NewEmployee {
        let phone = self.phone.as_deref().map(str::trim).unwrap_or_default();
        let join_date = match self.join_date.as_deref().map(str::trim) {
            Some(date) if !date.is_empty() => date.to_string(),
            _ => today.format("%Y-%m-%d").to_string(),
        };
        NewEmployee {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: Some(phone.to_string()),
            department: self.department.trim().to_string(),
            join_date: Some(join_date),
        }
    }

    /// The full record submitted to the backend once an id is known.
    pub fn with_id(self, id: u64) -> Employee {
        Employee {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone.unwrap_or_default(),
            department: self.department,
            join_date: self.join_date.unwrap_or_default(),
        }
    }
}

/// Request payload for a partial update. Only the fields present in the JSON
/// are applied; omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmployeeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(rename = "joinDate", skip_serializing_if = "Option::is_none")]
    pub join_date: Option<String>,
}

impl EmployeeUpdate {
    /// Trim every supplied field, leaving absent fields absent.
    pub fn sanitized(&self) -> EmployeeUpdate {
        let trim = |value: &Option<String>| value.as_deref().map(|v| v.trim().to_string());
        EmployeeUpdate {
            name: trim(&self.name),
            email: trim(&self.email),
            phone: trim(&self.phone),
            department: trim(&self.department),
            join_date: trim(&self.join_date),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.department.is_none()
            && self.join_date.is_none()
    }
}

/// One page of employees plus the total number of matching records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagedEmployees {
    pub data: Vec<Employee>,
    pub total: u64,
}

/// Fields the backend can sort by, spelled the way the backend names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortField {
    #[default]
    #[serde(rename = "id")]
    Id,
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "email")]
    Email,
    #[serde(rename = "phone")]
    Phone,
    #[serde(rename = "department")]
    Department,
    #[serde(rename = "joinDate")]
    JoinDate,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Name => "name",
            SortField::Email => "email",
            SortField::Phone => "phone",
            SortField::Department => "department",
            SortField::JoinDate => "joinDate",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn toggled(self) -> SortOrder {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

/// Department names offered by the entry forms. The data layer accepts any
/// non-empty department.
pub struct Department;

impl Department {
    pub const ALL: [&'static str; 6] = [
        "Engineering",
        "Sales",
        "Marketing",
        "Finance",
        "Human Resources",
        "Operations",
    ];

    pub fn is_known(name: &str) -> bool {
        Self::ALL.iter().any(|d| d.eq_ignore_ascii_case(name.trim()))
    }
}

/// Accept ids stored either as JSON numbers or as numeric strings.
fn id_from_number_or_string<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u64),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Number(n) => Ok(n),
        RawId::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid employee id: {s:?}"))),
    }
}
