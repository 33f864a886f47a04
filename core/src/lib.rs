//! Data-access core for the employee administration backend.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values for the
//! employee REST API, and sequences them into the operations an admin UI
//! needs: paged and filtered listing with a reliable total, detail fetch,
//! create with client-side id assignment, partial update, delete, and a
//! normalized duplicate check guarding every write.
//!
//! # Design
//! - `EmployeeClient` is stateless: it holds only `base_url` and splits each
//!   call into `build_*` / `parse_*`, so request shapes are testable as data.
//! - `Transport` is the single I/O seam. `RetryingTransport` adds bounded
//!   backoff for idempotent reads; `ReqwestTransport` does the real I/O.
//! - `EmployeeRepository` owns the multi-request flows.
//! - `QueryState` and the validation rules are plain values owned by the
//!   presentation layer and passed in explicitly.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod normalize;
pub mod query;
pub mod repository;
pub mod state;
pub mod transport;
pub mod types;
pub mod validation;

pub use client::EmployeeClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use normalize::RecordKey;
pub use query::{CandidateQuery, EmployeeQuery};
pub use repository::EmployeeRepository;
pub use state::{FilterUpdate, QueryState};
pub use transport::{ReqwestTransport, RetryPolicy, RetryingTransport, Transport, TransportError};
pub use types::{Department, Employee, EmployeeUpdate, NewEmployee, PagedEmployees, SortField, SortOrder};
pub use validation::{is_valid_email, is_valid_phone, EmployeeForm, ValidationErrors};
