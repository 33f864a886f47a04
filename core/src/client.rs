//! Stateless HTTP request builder and response parser for the employee API.
//!
//! # Design
//! `EmployeeClient` holds only a `base_url` and carries no mutable state
//! between calls. Each backend call is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. The repository sequences these around a `Transport`, which
//! keeps every request shape testable without a network.

use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::{server_message, ApiError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::query::{max_id_query_string, CandidateQuery, EmployeeQuery};
use crate::types::{Employee, EmployeeUpdate};

pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

/// Synchronous, stateless client for the employee API.
#[derive(Debug, Clone)]
pub struct EmployeeClient {
    base_url: String,
}

impl EmployeeClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn collection(&self, query: &str) -> String {
        if query.is_empty() {
            format!("{}/employees", self.base_url)
        } else {
            format!("{}/employees?{query}", self.base_url)
        }
    }

    fn get(&self, path: String) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path,
            headers: Vec::new(),
            body: None,
        }
    }

    fn json(&self, method: HttpMethod, path: String, body: String) -> HttpRequest {
        HttpRequest {
            method,
            path,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        }
    }

    pub fn build_list_employees(&self, query: &EmployeeQuery) -> HttpRequest {
        self.get(self.collection(&query.to_query_string()))
    }

    /// Unpaged request with the same filters, used when the list response
    /// carries no usable total.
    pub fn build_count_employees(&self, query: &EmployeeQuery) -> HttpRequest {
        self.get(self.collection(&query.to_count_query_string()))
    }

    pub fn build_find_candidates(&self, query: &CandidateQuery) -> HttpRequest {
        self.get(self.collection(&query.to_query_string()))
    }

    pub fn build_max_id(&self) -> HttpRequest {
        self.get(self.collection(&max_id_query_string()))
    }

    pub fn build_get_employee(&self, id: u64) -> HttpRequest {
        self.get(format!("{}/employees/{id}", self.base_url))
    }

    pub fn build_create_employee(&self, employee: &Employee) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(employee).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(self.json(HttpMethod::Post, self.collection(""), body))
    }

    pub fn build_update_employee(&self, id: u64, update: &EmployeeUpdate) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(update).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(self.json(
            HttpMethod::Patch,
            format!("{}/employees/{id}", self.base_url),
            body,
        ))
    }

    pub fn build_delete_employee(&self, id: u64) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}/employees/{id}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    /// The total advertised by the count header, if any parses.
    pub fn total_count(response: &HttpResponse) -> Option<u64> {
        response
            .header(TOTAL_COUNT_HEADER)
            .and_then(|value| value.trim().parse().ok())
    }

    /// Records in a list response. Rows that do not decode as an employee,
    /// such as one with a non-numeric id, are skipped rather than failing the
    /// whole page, matching how `parse_max_id` treats such ids.
    pub fn parse_list_employees(&self, response: HttpResponse) -> Result<Vec<Employee>, ApiError> {
        check_status(&response, &[200])?;
        let rows: Vec<serde_json::Value> = decode(&response.body)?;
        Ok(rows
            .into_iter()
            .filter_map(|row| match serde_json::from_value::<Employee>(row) {
                Ok(employee) => Some(employee),
                Err(err) => {
                    warn!(error = %err, "skipping malformed employee row");
                    None
                }
            })
            .collect())
    }

    /// Number of records in an unpaged list response.
    pub fn parse_count_employees(&self, response: HttpResponse) -> Result<u64, ApiError> {
        check_status(&response, &[200])?;
        let records: Vec<serde_json::Value> = decode(&response.body)?;
        Ok(records.len() as u64)
    }

    /// Highest id in the collection, or 0 when it is empty or the stored id
    /// is not numeric.
    pub fn parse_max_id(&self, response: HttpResponse) -> Result<u64, ApiError> {
        check_status(&response, &[200])?;
        let records: Vec<serde_json::Value> = decode(&response.body)?;
        let max_id = records.first().and_then(|record| match record.get("id") {
            Some(serde_json::Value::Number(n)) => n.as_u64(),
            Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        });
        Ok(max_id.unwrap_or(0))
    }

    pub fn parse_get_employee(&self, response: HttpResponse) -> Result<Employee, ApiError> {
        check_status(&response, &[200])?;
        decode(&response.body)
    }

    pub fn parse_create_employee(&self, response: HttpResponse) -> Result<Employee, ApiError> {
        check_status(&response, &[200, 201])?;
        decode(&response.body)
    }

    pub fn parse_update_employee(&self, response: HttpResponse) -> Result<Employee, ApiError> {
        check_status(&response, &[200])?;
        decode(&response.body)
    }

    pub fn parse_delete_employee(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, &[200, 204])?;
        Ok(())
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: &[u16]) -> Result<(), ApiError> {
    if expected.contains(&response.status) {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::Server {
        status: response.status,
        message: server_message(&response.body),
    })
}
