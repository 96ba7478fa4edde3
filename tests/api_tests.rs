//! API integration tests
//!
//! These run against a live server with a fresh database and a seeded admin
//! account (admin@guichet.org / admin123). Run with: cargo test -- --ignored

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Helper to get an admin bearer token
async fn get_admin_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": "admin@guichet.org",
            "password": "admin123"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

/// Helper producing an email unlikely to collide across test runs
fn unique_email(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}+{}@guichet-tests.org", prefix, nanos)
}

/// Helper to create an institution, returning its ID
async fn create_institution(client: &Client, token: &str, category: &str) -> i64 {
    let response = client
        .post(format!("{}/institutions", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "name": format!("Test {}", unique_email(category)),
            "category": category,
            "location": "Dakar"
        }))
        .send()
        .await
        .expect("Failed to create institution");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse institution");
    body["id"].as_i64().expect("No institution ID")
}

/// Helper to take a ticket, returning the creation stats
async fn create_ticket(client: &Client, institution_id: i64) -> Value {
    let response = client
        .post(format!("{}/tickets", BASE_URL))
        .json(&json!({ "institution_id": institution_id }))
        .send()
        .await
        .expect("Failed to create ticket");

    assert_eq!(response.status(), 201);

    response.json().await.expect("Failed to parse ticket stats")
}

/// Helper to fetch ticket stats scoped to an institution
async fn ticket_stats(client: &Client, number: &str, institution_id: i64) -> Value {
    let response = client
        .get(format!(
            "{}/tickets/{}/stats?institution_id={}",
            BASE_URL, number, institution_id
        ))
        .send()
        .await
        .expect("Failed to fetch ticket stats");

    assert!(response.status().is_success());

    response.json().await.expect("Failed to parse ticket stats")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": "admin@guichet.org",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_signup_and_login() {
    let client = Client::new();
    let email = unique_email("citizen");

    let response = client
        .post(format!("{}/auth/signup", BASE_URL))
        .json(&json!({
            "name": "Aminata Fall",
            "email": email,
            "password": "secret123"
        }))
        .send()
        .await
        .expect("Failed to send signup request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse signup response");
    assert_eq!(body["role"], "citizen");
    assert!(body.get("password_hash").is_none(), "hash must never be serialized");

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": email, "password": "secret123" }))
        .send()
        .await
        .expect("Failed to send login request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse login response");
    assert!(body["token"].is_string());
    assert_eq!(body["token_type"], "Bearer");
}

#[tokio::test]
#[ignore]
async fn test_signup_duplicate_email_conflict() {
    let client = Client::new();
    let email = unique_email("duplicate");

    let payload = json!({
        "name": "Moussa Ndiaye",
        "email": email,
        "password": "secret123"
    });

    let response = client
        .post(format!("{}/auth/signup", BASE_URL))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send signup request");
    assert_eq!(response.status(), 201);

    let response = client
        .post(format!("{}/auth/signup", BASE_URL))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send signup request");
    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_operator_signup_rules() {
    let client = Client::new();

    // Anonymous callers cannot create operator accounts
    let response = client
        .post(format!("{}/auth/signup", BASE_URL))
        .json(&json!({
            "name": "Rogue Operator",
            "email": unique_email("rogue"),
            "password": "secret123",
            "role": "operator",
            "institution_id": 1
        }))
        .send()
        .await
        .expect("Failed to send signup request");
    assert_eq!(response.status(), 403);

    // Admins can, but the institution affiliation is mandatory
    let token = get_admin_token(&client).await;
    let response = client
        .post(format!("{}/auth/signup", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "name": "Desk Operator",
            "email": unique_email("operator"),
            "password": "secret123",
            "role": "operator"
        }))
        .send()
        .await
        .expect("Failed to send signup request");
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_create_ticket_unknown_institution() {
    let client = Client::new();

    let response = client
        .post(format!("{}/tickets", BASE_URL))
        .json(&json!({ "institution_id": 99999999 }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_call_next_on_empty_queue_is_not_an_error() {
    let client = Client::new();
    let token = get_admin_token(&client).await;
    let institution_id = create_institution(&client, &token, "bank").await;

    let response = client
        .post(format!("{}/operator/next", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "institution_id": institution_id }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["ticket"].is_null());
    assert_eq!(body["message"], "No ticket waiting");
}

#[tokio::test]
#[ignore]
async fn test_create_ticket_round_trip() {
    let client = Client::new();
    let token = get_admin_token(&client).await;
    let institution_id = create_institution(&client, &token, "municipal").await;

    let created = create_ticket(&client, institution_id).await;
    assert_eq!(created["ticket_number"], "M001");
    assert_eq!(created["queue_position"], 1);
    assert_eq!(created["people_ahead"], 0);
    assert_eq!(created["estimated_wait_time"], 0);

    // Fetching stats right after creation returns identical data
    let number = created["ticket_number"].as_str().unwrap();
    let stats = ticket_stats(&client, number, institution_id).await;
    assert_eq!(stats["queue_position"], created["queue_position"]);
    assert_eq!(stats["people_ahead"], created["people_ahead"]);
    assert_eq!(stats["institution_name"], created["institution_name"]);

    let response = client
        .get(format!(
            "{}/tickets/{}?institution_id={}",
            BASE_URL, number, institution_id
        ))
        .send()
        .await
        .expect("Failed to fetch ticket");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse ticket");
    assert_eq!(body["ticket"]["status"], "waiting");
    assert_eq!(body["ticket"]["ticket_number"], number);
    assert!(body["ticket"]["called_at"].is_null());
}

#[tokio::test]
#[ignore]
async fn test_ticket_queue_scenario() {
    let client = Client::new();
    let token = get_admin_token(&client).await;
    let institution_id = create_institution(&client, &token, "hospital").await;

    // Three tickets: H001, H002, H003 at positions 1, 2, 3
    for (expected_number, expected_position) in [("H001", 1), ("H002", 2), ("H003", 3)] {
        let stats = create_ticket(&client, institution_id).await;
        assert_eq!(stats["ticket_number"], expected_number);
        assert_eq!(stats["queue_position"], expected_position);
    }

    // Cancel H002: H003 moves up, H001 is untouched
    let response = client
        .post(format!(
            "{}/tickets/H002/cancel?institution_id={}",
            BASE_URL, institution_id
        ))
        .send()
        .await
        .expect("Failed to cancel ticket");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse ticket");
    assert_eq!(body["status"], "cancelled");

    let stats = ticket_stats(&client, "H001", institution_id).await;
    assert_eq!(stats["queue_position"], 1);
    let stats = ticket_stats(&client, "H003", institution_id).await;
    assert_eq!(stats["queue_position"], 2);
    assert_eq!(stats["people_ahead"], 1);

    // Call next: H001 is called, H003 fronts the queue
    let response = client
        .post(format!("{}/operator/next", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "institution_id": institution_id }))
        .send()
        .await
        .expect("Failed to call next");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["ticket"]["ticket_number"], "H001");
    assert_eq!(body["ticket"]["status"], "called");
    assert!(body["ticket"]["called_at"].is_string());

    let stats = ticket_stats(&client, "H003", institution_id).await;
    assert_eq!(stats["queue_position"], 1);
    assert_eq!(stats["people_ahead"], 0);

    // Queue summary reflects the call
    let response = client
        .get(format!("{}/queues/{}", BASE_URL, institution_id))
        .send()
        .await
        .expect("Failed to fetch queue info");
    let body: Value = response.json().await.expect("Failed to parse queue info");
    assert_eq!(body["current_ticket_number"], "H001");
    assert_eq!(body["people_waiting"], 1);

    // Complete H001
    let response = client
        .post(format!(
            "{}/operator/tickets/H001/complete?institution_id={}",
            BASE_URL, institution_id
        ))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to complete ticket");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse ticket");
    assert_eq!(body["status"], "completed");
    assert!(body["completed_at"].is_string());

    // A completed ticket cannot be cancelled
    let response = client
        .post(format!(
            "{}/tickets/H001/cancel?institution_id={}",
            BASE_URL, institution_id
        ))
        .send()
        .await
        .expect("Failed to send cancel request");
    assert_eq!(response.status(), 422);

    // Call and miss H003
    let response = client
        .post(format!("{}/operator/next", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "institution_id": institution_id }))
        .send()
        .await
        .expect("Failed to call next");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["ticket"]["ticket_number"], "H003");

    let response = client
        .post(format!(
            "{}/operator/tickets/H003/miss?institution_id={}",
            BASE_URL, institution_id
        ))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to miss ticket");
    assert!(response.status().is_success());

    // Queue drained: next call is an explicit empty result
    let response = client
        .post(format!("{}/operator/next", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "institution_id": institution_id }))
        .send()
        .await
        .expect("Failed to call next");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["ticket"].is_null());

    // Sequence numbers are never reused, even after cancellations
    let stats = create_ticket(&client, institution_id).await;
    assert_eq!(stats["ticket_number"], "H004");
    assert_eq!(stats["queue_position"], 1);
}

#[tokio::test]
#[ignore]
async fn test_service_queues_are_independent() {
    let client = Client::new();
    let token = get_admin_token(&client).await;
    let institution_id = create_institution(&client, &token, "hospital").await;

    let response = client
        .post(format!("{}/institutions/{}/services", BASE_URL, institution_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "name": "Urgences", "average_duration_minutes": 10 }))
        .send()
        .await
        .expect("Failed to create service");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse service");
    let service_id = body["id"].as_i64().expect("No service ID");

    // General queue and service queue number independently
    let general = create_ticket(&client, institution_id).await;
    assert_eq!(general["ticket_number"], "H001");

    let response = client
        .post(format!("{}/tickets", BASE_URL))
        .json(&json!({ "institution_id": institution_id, "service_id": service_id }))
        .send()
        .await
        .expect("Failed to create ticket");
    assert_eq!(response.status(), 201);

    let scoped: Value = response.json().await.expect("Failed to parse ticket stats");
    assert_eq!(scoped["ticket_number"], "H001");
    assert_eq!(scoped["queue_position"], 1);

    // The service's average duration drives its wait estimate
    let second = client
        .post(format!("{}/tickets", BASE_URL))
        .json(&json!({ "institution_id": institution_id, "service_id": service_id }))
        .send()
        .await
        .expect("Failed to create ticket")
        .json::<Value>()
        .await
        .expect("Failed to parse ticket stats");
    assert_eq!(second["ticket_number"], "H002");
    assert_eq!(second["queue_position"], 2);
    assert_eq!(second["people_ahead"], 1);
    assert_eq!(second["estimated_wait_time"], 10);

    let response = client
        .get(format!(
            "{}/queues/{}?service_id={}",
            BASE_URL, institution_id, service_id
        ))
        .send()
        .await
        .expect("Failed to fetch queue info");
    let body: Value = response.json().await.expect("Failed to parse queue info");
    assert_eq!(body["people_waiting"], 2);
    assert_eq!(body["average_service_time"], 10);
    assert_eq!(body["estimated_wait_time"], 20);

    // A service from another institution is rejected
    let other_institution = create_institution(&client, &token, "transport").await;
    let response = client
        .post(format!("{}/tickets", BASE_URL))
        .json(&json!({ "institution_id": other_institution, "service_id": service_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
}
