use std::{
    cmp::Ordering,
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Path, Query, State},
    http::{header::HeaderName, HeaderMap, HeaderValue, StatusCode},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};

pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Employee {
    pub id: u64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub department: String,
    #[serde(rename = "joinDate", default)]
    pub join_date: String,
}

impl Employee {
    fn field(&self, name: &str) -> Option<String> {
        match name {
            "id" => Some(self.id.to_string()),
            "name" => Some(self.name.clone()),
            "email" => Some(self.email.clone()),
            "phone" => Some(self.phone.clone()),
            "department" => Some(self.department.clone()),
            "joinDate" => Some(self.join_date.clone()),
            _ => None,
        }
    }
}

/// POST body. Records without an id get `max + 1`.
#[derive(Deserialize)]
pub struct CreateEmployee {
    pub id: Option<u64>,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub department: String,
    #[serde(rename = "joinDate", default)]
    pub join_date: String,
}

#[derive(Deserialize)]
pub struct PatchEmployee {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    #[serde(rename = "joinDate")]
    pub join_date: Option<String>,
}

/// Behaviour switches for exercising clients against less capable backends.
#[derive(Clone, Debug)]
pub struct MockConfig {
    /// Send `X-Total-Count` on paged list responses.
    pub total_count_header: bool,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            total_count_header: true,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    db: Arc<RwLock<BTreeMap<u64, Employee>>>,
    config: MockConfig,
}

type ApiError = (StatusCode, Json<serde_json::Value>);

fn error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(json!({ "message": message.into() })))
}

pub fn app() -> Router {
    app_with(MockConfig::default(), Vec::new())
}

pub fn app_with(config: MockConfig, seed: Vec<Employee>) -> Router {
    let db = seed.into_iter().map(|e| (e.id, e)).collect();
    let state = AppState {
        db: Arc::new(RwLock::new(db)),
        config,
    };
    Router::new()
        .route("/employees", get(list_employees).post(create_employee))
        .route(
            "/employees/{id}",
            get(get_employee).patch(update_employee).delete(delete_employee),
        )
        .with_state(state)
}

pub async fn serve(
    listener: TcpListener,
    config: MockConfig,
    seed: Vec<Employee>,
) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(config, seed)).await
}

fn matches_filters(employee: &Employee, params: &HashMap<String, String>) -> bool {
    params.iter().all(|(key, expected)| {
        if key.starts_with('_') {
            return true;
        }
        if let Some(field) = key.strip_suffix("_like") {
            return employee
                .field(field)
                .is_some_and(|v| v.to_lowercase().contains(&expected.to_lowercase()));
        }
        employee.field(key).is_some_and(|v| v == *expected)
    })
}

fn compare_by(field: &str, a: &Employee, b: &Employee) -> Ordering {
    if field == "id" {
        return a.id.cmp(&b.id);
    }
    a.field(field).cmp(&b.field(field))
}

fn parse_param(params: &HashMap<String, String>, key: &str) -> Result<Option<usize>, ApiError> {
    params
        .get(key)
        .map(|v| {
            v.parse::<usize>()
                .map_err(|_| error(StatusCode::BAD_REQUEST, format!("invalid {key}: {v}")))
        })
        .transpose()
}

async fn list_employees(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<(HeaderMap, Json<Vec<Employee>>), ApiError> {
    let db = state.db.read().await;
    let mut rows: Vec<Employee> = db
        .values()
        .filter(|e| matches_filters(e, &params))
        .cloned()
        .collect();

    if let Some(field) = params.get("_sort") {
        rows.sort_by(|a, b| compare_by(field, a, b));
        if params.get("_order").is_some_and(|o| o == "desc") {
            rows.reverse();
        }
    }

    let total = rows.len();
    let page = parse_param(&params, "_page")?;
    let limit = parse_param(&params, "_limit")?;
    let rows = match (page, limit) {
        (None, None) => rows,
        (page, limit) => {
            let limit = limit.unwrap_or(10);
            let start = page.unwrap_or(1).max(1).saturating_sub(1) * limit;
            rows.into_iter().skip(start).take(limit).collect()
        }
    };

    let mut headers = HeaderMap::new();
    if state.config.total_count_header && page.is_some() {
        headers.insert(
            HeaderName::from_static(TOTAL_COUNT_HEADER),
            HeaderValue::from(total),
        );
    }
    tracing::debug!(total, returned = rows.len(), "list employees");
    Ok((headers, Json(rows)))
}

async fn create_employee(
    State(state): State<AppState>,
    Json(input): Json<CreateEmployee>,
) -> Result<(StatusCode, Json<Employee>), ApiError> {
    let mut db = state.db.write().await;
    let id = match input.id {
        Some(id) => id,
        None => db.keys().next_back().copied().unwrap_or(0) + 1,
    };
    if db.contains_key(&id) {
        return Err(error(StatusCode::CONFLICT, format!("employee {id} already exists")));
    }
    let employee = Employee {
        id,
        name: input.name,
        email: input.email,
        phone: input.phone,
        department: input.department,
        join_date: input.join_date,
    };
    db.insert(id, employee.clone());
    tracing::info!(id, "employee created");
    Ok((StatusCode::CREATED, Json(employee)))
}

async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Employee>, ApiError> {
    let db = state.db.read().await;
    db.get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, format!("employee {id} not found")))
}

async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(input): Json<PatchEmployee>,
) -> Result<Json<Employee>, ApiError> {
    let mut db = state.db.write().await;
    let employee = db
        .get_mut(&id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, format!("employee {id} not found")))?;
    if let Some(name) = input.name {
        employee.name = name;
    }
    if let Some(email) = input.email {
        employee.email = email;
    }
    if let Some(phone) = input.phone {
        employee.phone = phone;
    }
    if let Some(department) = input.department {
        employee.department = department;
    }
    if let Some(join_date) = input.join_date {
        employee.join_date = join_date;
    }
    tracing::info!(id, "employee updated");
    Ok(Json(employee.clone()))
}

async fn delete_employee(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut db = state.db.write().await;
    db.remove(&id)
        .map(|_| Json(json!({})))
        .ok_or_else(|| error(StatusCode::NOT_FOUND, format!("employee {id} not found")))
}
