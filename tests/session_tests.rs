//! Session lifecycle tests: login outcomes, logout, and revocation on
//! account deactivation.

use reqwest::Client;

#[path = "test_utils/mod.rs"]
mod test_utils;

#[tokio::test]
async fn test_failed_login_answers_success_false() {
    let (base, _db) = test_utils::spawn_app().await;
    let client = Client::new();

    let admin = test_utils::admin_token(&client, &base).await;
    test_utils::employee_session(&client, &base, &admin, "김대리", "빈시트", "employee").await;

    let response = client
        .post(format!("{}/login", base))
        .json(&serde_json::json!({ "name": "김대리", "password": "wrong" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body["token"].is_null());
}

#[tokio::test]
async fn test_login_sets_session_cookie() {
    let (base, _db) = test_utils::spawn_app().await;
    let client = Client::new();

    let admin = test_utils::admin_token(&client, &base).await;
    test_utils::employee_session(&client, &base, &admin, "김대리", "빈시트", "employee").await;

    let response = client
        .post(format!("{}/login", base))
        .json(&serde_json::json!({ "name": "김대리", "password": "1234" }))
        .send()
        .await
        .unwrap();
    let cookie = response
        .headers()
        .get("set-cookie")
        .expect("missing set-cookie header")
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("session_token="));
    assert!(cookie.contains("HttpOnly"));
}

#[tokio::test]
async fn test_logout_invalidates_token() {
    let (base, _db) = test_utils::spawn_app().await;
    let client = Client::new();

    let admin = test_utils::admin_token(&client, &base).await;
    let (_id, token) =
        test_utils::employee_session(&client, &base, &admin, "김대리", "빈시트", "employee").await;

    let response = client
        .post(format!("{}/logout", base))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let response = client
        .get(format!("{}/api/customers", base))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_deactivation_revokes_live_sessions() {
    let (base, _db) = test_utils::spawn_app().await;
    let client = Client::new();

    let admin = test_utils::admin_token(&client, &base).await;
    let (id, token) =
        test_utils::employee_session(&client, &base, &admin, "김대리", "빈시트", "employee").await;

    let response = client
        .put(format!("{}/api/employees/{}/deactivate", base, id))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    // The employee's session died with the account.
    let response = client
        .get(format!("{}/api/customers", base))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);

    // And logging back in is refused while inactive.
    let response = client
        .post(format!("{}/login", base))
        .json(&serde_json::json!({ "name": "김대리", "password": "1234" }))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("비활성화"));

    // Reactivation restores login.
    client
        .put(format!("{}/api/employees/{}/activate", base, id))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    let response = client
        .post(format!("{}/login", base))
        .json(&serde_json::json!({ "name": "김대리", "password": "1234" }))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_admin_login_rejects_bad_credentials() {
    let (base, _db) = test_utils::spawn_app().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/admin-login", base))
        .json(&serde_json::json!({ "admin_id": "admin", "admin_password": "nope" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_admin_only_endpoints_reject_employees() {
    let (base, _db) = test_utils::spawn_app().await;
    let client = Client::new();

    let admin = test_utils::admin_token(&client, &base).await;
    let (_id, token) =
        test_utils::employee_session(&client, &base, &admin, "김대리", "빈시트", "employee").await;

    let response = client
        .post(format!("{}/api/teams", base))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "name": "강남지점" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);

    let response = client
        .get(format!("{}/api/backup", base))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);
}
