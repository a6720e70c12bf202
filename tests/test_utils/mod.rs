//! Test utilities for spinning up the API against an in-memory database.

use anyhow::Result;
use backoffice::config::AppConfig;
use backoffice::seeds;
use backoffice::server::{create_app, AppState};
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

/// Admin password wired into the test configuration.
#[allow(dead_code)]
pub const TEST_ADMIN_PASSWORD: &str = "test-admin-secret";

/// Sets up an in-memory SQLite database with all migrations and seeds applied.
#[allow(dead_code)]
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:").await?;
    Migrator::up(&db, None).await?;
    seeds::seed_database(&db).await?;
    Ok(db)
}

/// Configuration used by test servers: test profile, admin login enabled.
#[allow(dead_code)]
pub fn test_config() -> AppConfig {
    AppConfig {
        profile: "test".to_string(),
        admin_password: Some(TEST_ADMIN_PASSWORD.to_string()),
        ..AppConfig::default()
    }
}

/// Spawns the full application on a random port and returns its base URL
/// together with the underlying database connection.
#[allow(dead_code)]
pub async fn spawn_app() -> (String, DatabaseConnection) {
    let db = setup_test_db().await.expect("test db setup failed");
    let state = AppState::new(db.clone(), test_config());
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), db)
}

/// Logs in as the built-in administrator and returns the session token.
#[allow(dead_code)]
pub async fn admin_token(client: &reqwest::Client, base: &str) -> String {
    let response = client
        .post(format!("{}/admin-login", base))
        .json(&serde_json::json!({
            "admin_id": "admin",
            "admin_password": TEST_ADMIN_PASSWORD,
        }))
        .send()
        .await
        .expect("admin login request failed");
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true, "admin login rejected: {}", body);
    body["token"].as_str().unwrap().to_string()
}

/// Creates an employee account through the API and logs it in with the
/// default password. Returns the employee id and a session token.
#[allow(dead_code)]
pub async fn employee_session(
    client: &reqwest::Client,
    base: &str,
    admin_token: &str,
    name: &str,
    team: &str,
    role: &str,
) -> (i32, String) {
    let response = client
        .post(format!("{}/api/employees", base))
        .bearer_auth(admin_token)
        .json(&serde_json::json!({ "name": name, "team": team, "role": role }))
        .send()
        .await
        .expect("employee creation failed");
    assert_eq!(response.status(), 201);

    let body: serde_json::Value = response.json().await.unwrap();
    let id = body["employee"]["id"].as_i64().unwrap() as i32;

    let response = client
        .post(format!("{}/login", base))
        .json(&serde_json::json!({ "name": name, "password": "1234" }))
        .send()
        .await
        .expect("employee login failed");
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true, "employee login rejected: {}", body);

    (id, body["token"].as_str().unwrap().to_string())
}

/// Creates a customer owned by the given employee session and returns its id
/// and share handle.
#[allow(dead_code)]
pub async fn create_customer(
    client: &reqwest::Client,
    base: &str,
    token: &str,
    customer_name: &str,
) -> (i32, String) {
    let response = client
        .post(format!("{}/api/customers", base))
        .bearer_auth(token)
        .json(&serde_json::json!({ "customer_name": customer_name }))
        .send()
        .await
        .expect("customer creation failed");
    assert_eq!(response.status(), 201);

    let body: serde_json::Value = response.json().await.unwrap();
    let id = body["id"].as_i64().unwrap() as i32;
    let handle = body["customer"]["management_site_id"]
        .as_str()
        .unwrap()
        .to_string();
    (id, handle)
}
