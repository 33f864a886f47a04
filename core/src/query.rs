//! Query-string construction for the `/employees` collection.
//!
//! # Design
//! The backend speaks json-server conventions: `<field>_like` for substring
//! matches, `<field>=<value>` for exact matches, `_sort`/`_order` for
//! ordering and `_page`/`_limit` for paging. Filters whose value is empty
//! after trimming are never sent, so an untouched search box does not turn
//! into an `name_like=` filter.

use crate::normalize::RecordKey;
use crate::types::{SortField, SortOrder};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;

/// Parameters for one page of the employee list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeQuery {
    /// 1-based page; 0 is treated as the first page.
    pub page: u32,
    /// Page size; 0 falls back to the default.
    pub limit: u32,
    /// Substring match on name.
    pub name: Option<String>,
    /// Substring match on email.
    pub email: Option<String>,
    /// Exact match on department.
    pub department: Option<String>,
    pub sort: Option<SortField>,
    pub order: SortOrder,
}

impl Default for EmployeeQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            name: None,
            email: None,
            department: None,
            sort: None,
            order: SortOrder::Asc,
        }
    }
}

impl EmployeeQuery {
    pub fn effective_page(&self) -> u32 {
        if self.page > 0 {
            self.page
        } else {
            DEFAULT_PAGE
        }
    }

    pub fn effective_limit(&self) -> u32 {
        if self.limit > 0 {
            self.limit
        } else {
            DEFAULT_LIMIT
        }
    }

    fn filter_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_trimmed(&mut pairs, "name_like", self.name.as_deref());
        push_trimmed(&mut pairs, "email_like", self.email.as_deref());
        push_trimmed(&mut pairs, "department", self.department.as_deref());
        pairs
    }

    /// Filters, ordering and paging for the list request.
    pub fn to_query_string(&self) -> String {
        let mut pairs = self.filter_pairs();
        if let Some(sort) = self.sort {
            pairs.push(("_sort", sort.as_str().to_string()));
            pairs.push(("_order", self.order.as_str().to_string()));
        }
        pairs.push(("_page", self.effective_page().to_string()));
        pairs.push(("_limit", self.effective_limit().to_string()));
        encode(&pairs)
    }

    /// The same filters without ordering or paging, for counting matches.
    pub fn to_count_query_string(&self) -> String {
        encode(&self.filter_pairs())
    }
}

/// A narrow lookup for records that might duplicate a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateQuery {
    Email(String),
    Phone(String),
    NameDepartment { name: String, department: String },
}

impl CandidateQuery {
    /// Up to three lookups for `key`; a lookup whose fields are all empty is
    /// skipped.
    pub fn for_record(key: &RecordKey) -> Vec<CandidateQuery> {
        let mut queries = Vec::new();
        let email = key.email.trim();
        if !email.is_empty() {
            queries.push(CandidateQuery::Email(email.to_string()));
        }
        let phone = key.phone.trim();
        if !phone.is_empty() {
            queries.push(CandidateQuery::Phone(phone.to_string()));
        }
        let name = key.name.trim();
        let department = key.department.trim();
        if !name.is_empty() || !department.is_empty() {
            queries.push(CandidateQuery::NameDepartment {
                name: name.to_string(),
                department: department.to_string(),
            });
        }
        queries
    }

    pub fn to_query_string(&self) -> String {
        let mut pairs = Vec::new();
        match self {
            CandidateQuery::Email(email) => push_trimmed(&mut pairs, "email", Some(email.as_str())),
            CandidateQuery::Phone(phone) => push_trimmed(&mut pairs, "phone", Some(phone.as_str())),
            CandidateQuery::NameDepartment { name, department } => {
                push_trimmed(&mut pairs, "name", Some(name.as_str()));
                push_trimmed(&mut pairs, "department", Some(department.as_str()));
            }
        }
        encode(&pairs)
    }
}

/// Ask for the single record with the highest id.
pub fn max_id_query_string() -> String {
    encode(&[
        ("_sort", SortField::Id.as_str().to_string()),
        ("_order", SortOrder::Desc.as_str().to_string()),
        ("_limit", "1".to_string()),
    ])
}

fn push_trimmed(pairs: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<&str>) {
    if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
        pairs.push((key, value.to_string()));
    }
}

fn encode(pairs: &[(&'static str, String)]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}
