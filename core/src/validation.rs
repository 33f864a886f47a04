//! Field-level validation for employee entry forms.
//!
//! # Design
//! Rules are plain data: each `FieldRule` names a field, a `Constraint`, and
//! the message reported when the constraint fails. `validate` evaluates a rule
//! set against anything implementing `FieldSource` and collects the first
//! failing message per field. Nothing here knows about a particular UI
//! binding; the presentation layer only maps field names to inputs.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ApiError;
use crate::types::{EmployeeUpdate, NewEmployee};

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid"));

static JOIN_DATE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("join date regex is valid"));

/// Permissive `local@domain.tld` shape check. Not RFC 5322.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    !email.is_empty() && EMAIL_REGEX.is_match(email)
}

/// True when exactly 10 digits remain after stripping everything else.
pub fn is_valid_phone(phone: &str) -> bool {
    if phone.trim().is_empty() {
        return false;
    }
    phone.chars().filter(char::is_ascii_digit).count() == 10
}

pub fn is_valid_join_date(date: &str) -> bool {
    JOIN_DATE_REGEX.is_match(date.trim())
}

/// A single check applied to a trimmed field value.
#[derive(Debug, Clone, Copy)]
pub enum Constraint {
    Required,
    /// Maximum length in characters.
    MaxLength(usize),
    /// Predicate applied only when the value is non-empty.
    Matches(fn(&str) -> bool),
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    pub constraint: Constraint,
    pub message: &'static str,
}

impl FieldRule {
    pub const fn new(field: &'static str, constraint: Constraint, message: &'static str) -> Self {
        Self {
            field,
            constraint,
            message,
        }
    }

    fn check(&self, value: &str) -> bool {
        match self.constraint {
            Constraint::Required => !value.is_empty(),
            Constraint::MaxLength(max) => value.chars().count() <= max,
            Constraint::Matches(predicate) => value.is_empty() || predicate(value),
        }
    }
}

/// Anything whose fields can be looked up by name for validation.
pub trait FieldSource {
    /// The raw value of `field`, or `None` when the field is absent.
    fn field(&self, field: &str) -> Option<&str>;
}

/// Field name to message, in field-name order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<&'static str, String>);

impl ValidationErrors {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

/// Evaluate `rules` in order, keeping the first failure for each field.
pub fn validate<S: FieldSource + ?Sized>(rules: &[FieldRule], source: &S) -> Result<(), ValidationErrors> {
    let mut errors = BTreeMap::new();
    for rule in rules {
        if errors.contains_key(rule.field) {
            continue;
        }
        let value = source.field(rule.field).unwrap_or_default().trim();
        if !rule.check(value) {
            errors.insert(rule.field, rule.message.to_string());
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(errors))
    }
}

pub const EMPLOYEE_RULES: &[FieldRule] = &[
    FieldRule::new("name", Constraint::Required, "name is required"),
    FieldRule::new("name", Constraint::MaxLength(100), "name must be at most 100 characters"),
    FieldRule::new("email", Constraint::Required, "email is required"),
    FieldRule::new("email", Constraint::MaxLength(120), "email must be at most 120 characters"),
    FieldRule::new("email", Constraint::Matches(is_valid_email), "email is not a valid address"),
    FieldRule::new("phone", Constraint::Matches(is_valid_phone), "phone must contain exactly 10 digits"),
    FieldRule::new("department", Constraint::Required, "department is required"),
    FieldRule::new("joinDate", Constraint::Matches(is_valid_join_date), "join date must be YYYY-MM-DD"),
];

/// Raw values as typed into the employee form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub department: String,
    pub join_date: String,
}

impl FieldSource for EmployeeForm {
    fn field(&self, field: &str) -> Option<&str> {
        match field {
            "name" => Some(&self.name),
            "email" => Some(&self.email),
            "phone" => Some(&self.phone),
            "department" => Some(&self.department),
            "joinDate" => Some(&self.join_date),
            _ => None,
        }
    }
}

impl EmployeeForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        validate(EMPLOYEE_RULES, self)
    }

    /// Validated payload for a create. Empty optional fields become `None`.
    pub fn into_new_employee(self) -> Result<NewEmployee, ApiError> {
        self.validate()?;
        Ok(NewEmployee {
            name: self.name,
            email: self.email,
            phone: non_empty(self.phone),
            department: self.department,
            join_date: non_empty(self.join_date),
        })
    }

    /// Validated payload for an edit. Every form field is submitted; the
    /// repository trims them and the backend applies the patch.
    pub fn into_update(self) -> Result<EmployeeUpdate, ApiError> {
        self.validate()?;
        Ok(EmployeeUpdate {
            name: Some(self.name),
            email: Some(self.email),
            phone: Some(self.phone),
            department: Some(self.department),
            join_date: non_empty(self.join_date),
        })
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
