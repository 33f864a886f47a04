//! Employee data access on top of `EmployeeClient` and a `Transport`.
//!
//! # Design
//! Each operation is a one-shot sequence of backend calls with no state kept
//! between calls. Create and update run a uniqueness pre-check before writing
//! and never write when it fails.
//!
//! Id assignment reads the current maximum id and submits `max + 1`, and the
//! uniqueness check reads before it writes. Neither is atomic: two clients
//! creating at the same moment can compute the same id or both pass the
//! check. The backend offers no unique index or sequence to close that
//! window, so this layer does not pretend to.

use chrono::Local;
use futures::future::try_join_all;
use tracing::{debug, info, warn};

use crate::client::EmployeeClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::normalize::RecordKey;
use crate::query::{CandidateQuery, EmployeeQuery};
use crate::transport::{ReqwestTransport, RetryingTransport, Transport};
use crate::types::{Employee, EmployeeUpdate, NewEmployee, PagedEmployees};

pub struct EmployeeRepository<T> {
    client: EmployeeClient,
    transport: T,
}

impl EmployeeRepository<RetryingTransport<ReqwestTransport>> {
    /// Repository over reqwest with the configured timeout and retry policy.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let transport = RetryingTransport::new(ReqwestTransport::new(config)?, config.retry);
        Ok(Self::new(EmployeeClient::new(&config.base_url), transport))
    }
}

impl<T: Transport> EmployeeRepository<T> {
    pub fn new(client: EmployeeClient, transport: T) -> Self {
        Self { client, transport }
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = request.method.as_str(), path = %request.path, "dispatching");
        Ok(self.transport.execute(&request).await?)
    }

    /// One page of employees plus the total number of matches.
    ///
    /// The total comes from the count header when it reports a positive
    /// number. Otherwise an unpaged request with the same filters is counted,
    /// and if that fails the length of the page itself is used.
    pub async fn list_employees(&self, query: &EmployeeQuery) -> Result<PagedEmployees, ApiError> {
        let response = self.send(self.client.build_list_employees(query)).await?;
        let header_total = EmployeeClient::total_count(&response);
        let data = self.client.parse_list_employees(response)?;

        let total = match header_total {
            Some(total) if total > 0 => total,
            _ => {
                debug!(?header_total, "no usable total count header, counting unpaged");
                match self.count_employees(query).await {
                    Ok(total) => total,
                    Err(err) => {
                        debug!(error = %err, "count request failed, using page length");
                        data.len() as u64
                    }
                }
            }
        };

        Ok(PagedEmployees { data, total })
    }

    async fn count_employees(&self, query: &EmployeeQuery) -> Result<u64, ApiError> {
        let response = self.send(self.client.build_count_employees(query)).await?;
        self.client.parse_count_employees(response)
    }

    pub async fn get_employee(&self, id: u64) -> Result<Employee, ApiError> {
        let response = self.send(self.client.build_get_employee(id)).await?;
        self.client.parse_get_employee(response)
    }

    /// Trim the payload, reject duplicates, assign the next id and submit.
    pub async fn create_employee(&self, payload: &NewEmployee) -> Result<Employee, ApiError> {
        let normalized = payload.normalized(Local::now().date_naive());

        if let Some(existing) = self.find_duplicate(&RecordKey::from(&normalized), None).await? {
            warn!(existing_id = existing.id, "rejecting duplicate employee");
            return Err(ApiError::DuplicateRecord {
                existing_id: existing.id,
            });
        }

        let id = self.next_id().await?;
        let request = self.client.build_create_employee(&normalized.with_id(id))?;
        let created = self.client.parse_create_employee(self.send(request).await?)?;
        info!(id = created.id, "employee created");
        Ok(created)
    }

    /// `max(id) + 1` over the current records.
    async fn next_id(&self) -> Result<u64, ApiError> {
        let response = self.send(self.client.build_max_id()).await?;
        let max_id = self.client.parse_max_id(response)?;
        Ok(max_id + 1)
    }

    /// Patch the supplied fields of employee `id`.
    ///
    /// The uniqueness check runs against the record as it would look after
    /// the patch, ignoring the record itself. Only the trimmed supplied
    /// fields are sent; an update with no fields returns the stored record.
    pub async fn update_employee(&self, id: u64, update: &EmployeeUpdate) -> Result<Employee, ApiError> {
        let existing = self.get_employee(id).await?;
        let sanitized = update.sanitized();
        if sanitized.is_empty() {
            debug!(id, "empty update, nothing to send");
            return Ok(existing);
        }
        let merged = existing.merged_with(&sanitized);

        if let Some(other) = self.find_duplicate(&RecordKey::from(&merged), Some(id)).await? {
            warn!(id, existing_id = other.id, "rejecting update that duplicates another employee");
            return Err(ApiError::DuplicateRecord {
                existing_id: other.id,
            });
        }

        let request = self.client.build_update_employee(id, &sanitized)?;
        let updated = self.client.parse_update_employee(self.send(request).await?)?;
        info!(id, "employee updated");
        Ok(updated)
    }

    /// Remove employee `id`. Whether deleting a missing id fails is up to the
    /// backend.
    pub async fn delete_employee(&self, id: u64) -> Result<(), ApiError> {
        let response = self.send(self.client.build_delete_employee(id)).await?;
        self.client.parse_delete_employee(response)?;
        info!(id, "employee deleted");
        Ok(())
    }

    /// First stored record equivalent to `key`, skipping `exclude_id`.
    ///
    /// Candidates are gathered by email, by phone and by name plus
    /// department, all issued concurrently, then compared with normalized
    /// equality.
    pub async fn find_duplicate(
        &self,
        key: &RecordKey,
        exclude_id: Option<u64>,
    ) -> Result<Option<Employee>, ApiError> {
        let queries = CandidateQuery::for_record(key);
        if queries.is_empty() {
            return Ok(None);
        }

        let batches = try_join_all(queries.iter().map(|query| self.fetch_candidates(query))).await?;

        let mut seen = Vec::new();
        for candidate in batches.into_iter().flatten() {
            if Some(candidate.id) == exclude_id || seen.contains(&candidate.id) {
                continue;
            }
            seen.push(candidate.id);
            if RecordKey::from(&candidate).is_equivalent(key) {
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }

    async fn fetch_candidates(&self, query: &CandidateQuery) -> Result<Vec<Employee>, ApiError> {
        let response = self.send(self.client.build_find_candidates(query)).await?;
        self.client.parse_list_employees(response)
    }
}
