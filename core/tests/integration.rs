//! Repository flows against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives `EmployeeRepository`
//! over real HTTP with the reqwest transport. Validates that request
//! building, response parsing and the multi-request flows work end-to-end
//! with the actual server, including a backend that omits the count header.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use employee_core::{
    ApiError, ClientConfig, EmployeeClient, EmployeeQuery, EmployeeRepository, EmployeeUpdate,
    NewEmployee, ReqwestTransport, RetryPolicy, RetryingTransport, SortField, SortOrder, Transport,
};
use mock_server::{Employee as Stored, MockConfig};

async fn start(config: MockConfig, seed: Vec<Stored>) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(mock_server::serve(listener, config, seed));
    format!("http://{addr}")
}

fn fast_config(base_url: &str) -> ClientConfig {
    ClientConfig::new(base_url)
        .with_timeout(Duration::from_millis(500))
        .with_retry_policy(RetryPolicy::new(1, Duration::from_millis(20)))
}

fn stored(id: u64, name: &str, email: &str, phone: &str, department: &str) -> Stored {
    Stored {
        id,
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        department: department.to_string(),
        join_date: "2024-01-15".to_string(),
    }
}

fn roster(count: u64) -> Vec<Stored> {
    (1..=count)
        .map(|id| stored(id, &format!("Employee {id}"), &format!("e{id}@x.com"), "", "Sales"))
        .collect()
}

fn nguyen() -> NewEmployee {
    NewEmployee {
        name: "Nguyen Van A".to_string(),
        email: "a@x.com".to_string(),
        phone: Some("0987123456".to_string()),
        department: "Sales".to_string(),
        join_date: None,
    }
}

#[tokio::test]
async fn crud_lifecycle() {
    let base = start(MockConfig::default(), Vec::new()).await;
    let repo = EmployeeRepository::from_config(&fast_config(&base)).unwrap();

    // Step 1: list: should be empty.
    let page = repo.list_employees(&EmployeeQuery::default()).await.unwrap();
    assert!(page.data.is_empty());
    assert_eq!(page.total, 0);

    // Step 2: create: first id is 1 and the join date defaults to today.
    let created = repo.create_employee(&nguyen()).await.unwrap();
    assert_eq!(created.id, 1);
    assert_eq!(created.join_date, chrono::Local::now().format("%Y-%m-%d").to_string());

    // Step 3: get the created employee.
    let fetched = repo.get_employee(created.id).await.unwrap();
    assert_eq!(fetched, created);

    // Step 4: update only the phone.
    let update = EmployeeUpdate {
        phone: Some("0900000000".to_string()),
        ..Default::default()
    };
    let updated = repo.update_employee(created.id, &update).await.unwrap();
    assert_eq!(updated.phone, "0900000000");
    assert_eq!(updated.name, created.name);
    assert_eq!(updated.join_date, created.join_date);

    // Step 5: delete.
    repo.delete_employee(created.id).await.unwrap();

    // Step 6: get after delete: NotFound.
    let err = repo.get_employee(created.id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound));

    // Step 7: delete again: the backend reports it.
    let err = repo.delete_employee(created.id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound));
}

#[tokio::test]
async fn create_assigns_next_id_after_max() {
    let seed = vec![
        stored(2, "B", "b@x.com", "", "HR"),
        stored(7, "C", "c@x.com", "", "HR"),
        stored(4, "D", "d@x.com", "", "HR"),
    ];
    let base = start(MockConfig::default(), seed).await;
    let repo = EmployeeRepository::from_config(&fast_config(&base)).unwrap();

    let created = repo.create_employee(&nguyen()).await.unwrap();
    assert_eq!(created.id, 8);
}

#[tokio::test]
async fn duplicate_create_is_rejected_and_nothing_is_written() {
    // Found through the exact email lookup, equal only after normalization.
    let seed = vec![stored(3, "NGUYEN VAN A ", "a@x.com", "098-712-3456", " sales")];
    let base = start(MockConfig::default(), seed).await;
    let repo = EmployeeRepository::from_config(&fast_config(&base)).unwrap();

    let err = repo.create_employee(&nguyen()).await.unwrap_err();
    assert!(matches!(err, ApiError::DuplicateRecord { existing_id: 3 }));

    let page = repo.list_employees(&EmployeeQuery::default()).await.unwrap();
    assert_eq!(page.total, 1);
}

#[tokio::test]
async fn same_person_in_another_department_is_allowed() {
    let seed = vec![stored(3, "Nguyen Van A", "a@x.com", "0987123456", "Finance")];
    let base = start(MockConfig::default(), seed).await;
    let repo = EmployeeRepository::from_config(&fast_config(&base)).unwrap();

    let created = repo.create_employee(&nguyen()).await.unwrap();
    assert_eq!(created.id, 4);
}

#[tokio::test]
async fn update_that_collides_is_rejected() {
    let seed = vec![
        stored(1, "Nguyen Van A", "a@x.com", "0987123456", "Sales"),
        stored(2, "Nguyen Van A", "a@x.com", "0900000000", "Sales"),
    ];
    let base = start(MockConfig::default(), seed).await;
    let repo = EmployeeRepository::from_config(&fast_config(&base)).unwrap();

    let update = EmployeeUpdate {
        phone: Some("0987123456".to_string()),
        ..Default::default()
    };
    let err = repo.update_employee(2, &update).await.unwrap_err();
    assert!(matches!(err, ApiError::DuplicateRecord { existing_id: 1 }));
    assert_eq!(repo.get_employee(2).await.unwrap().phone, "0900000000");

    // Re-saving a record unchanged is not a collision with itself.
    let update = EmployeeUpdate {
        name: Some(" Nguyen Van A ".to_string()),
        ..Default::default()
    };
    let saved = repo.update_employee(1, &update).await.unwrap();
    assert_eq!(saved.name, "Nguyen Van A");
}

#[tokio::test]
async fn total_comes_from_header_when_available() {
    let base = start(MockConfig::default(), roster(25)).await;
    let repo = EmployeeRepository::from_config(&fast_config(&base)).unwrap();

    let query = EmployeeQuery {
        page: 3,
        limit: 10,
        sort: Some(SortField::Id),
        order: SortOrder::Asc,
        ..Default::default()
    };
    let page = repo.list_employees(&query).await.unwrap();
    assert_eq!(page.total, 25);
    let ids: Vec<u64> = page.data.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![21, 22, 23, 24, 25]);
}

#[tokio::test]
async fn total_falls_back_to_unpaged_count_without_header() {
    let config = MockConfig {
        total_count_header: false,
    };
    let base = start(config, roster(25)).await;
    let repo = EmployeeRepository::from_config(&fast_config(&base)).unwrap();

    let query = EmployeeQuery {
        page: 1,
        limit: 10,
        ..Default::default()
    };
    let page = repo.list_employees(&query).await.unwrap();
    assert_eq!(page.total, 25);
    assert_eq!(page.data.len(), 10);

    let filtered = EmployeeQuery {
        name: Some("employee 2".to_string()),
        ..query
    };
    let page = repo.list_employees(&filtered).await.unwrap();
    // "Employee 2" and "Employee 20".."Employee 25"
    assert_eq!(page.total, 7);
}

#[tokio::test]
async fn unreachable_backend_surfaces_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let repo = EmployeeRepository::from_config(&fast_config(&format!("http://{addr}"))).unwrap();
    let err = repo.get_employee(1).await.unwrap_err();
    assert!(matches!(err, ApiError::Network(ref msg) if !msg.is_empty()));
}

/// Accepts connections and never answers, counting each one.
async fn silent_server() -> (String, Arc<AtomicUsize>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let accepted = Arc::new(AtomicUsize::new(0));
    let counter = accepted.clone();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            held.push(socket);
        }
    });
    (format!("http://{addr}"), accepted)
}

#[tokio::test]
async fn timed_out_get_is_retried_once() {
    let (base, accepted) = silent_server().await;
    let config = ClientConfig::new(&base)
        .with_timeout(Duration::from_millis(200))
        .with_retry_policy(RetryPolicy::new(1, Duration::from_millis(50)));
    let transport = RetryingTransport::new(ReqwestTransport::new(&config).unwrap(), config.retry);
    let client = EmployeeClient::new(&base);

    let err = transport.execute(&client.build_get_employee(1)).await.unwrap_err();
    assert_eq!(err, employee_core::TransportError::Timeout);
    assert_eq!(accepted.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn timed_out_post_is_not_retried() {
    let (base, accepted) = silent_server().await;
    let config = ClientConfig::new(&base)
        .with_timeout(Duration::from_millis(200))
        .with_retry_policy(RetryPolicy::new(1, Duration::from_millis(50)));
    let transport = RetryingTransport::new(ReqwestTransport::new(&config).unwrap(), config.retry);
    let client = EmployeeClient::new(&base);

    let request = client
        .build_create_employee(&nguyen().normalized(chrono::Local::now().date_naive()).with_id(1))
        .unwrap();
    let err = transport.execute(&request).await.unwrap_err();
    assert_eq!(err, employee_core::TransportError::Timeout);
    assert_eq!(accepted.load(Ordering::SeqCst), 1);
}
