//! Guarantee-insurance catalogue tests over the HTTP surface.

use reqwest::Client;

#[path = "test_utils/mod.rs"]
mod test_utils;

async fn post_pool_link(client: &Client, base: &str, token: &str, url: &str) -> i64 {
    let response = client
        .post(format!("{}/api/links", base))
        .bearer_auth(token)
        .json(&serde_json::json!({ "url": url, "platform": "직방" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    response.json::<serde_json::Value>().await.unwrap()["link"]["id"]
        .as_i64()
        .unwrap()
}

#[tokio::test]
async fn test_guarantee_flag_and_catalogue_listing() {
    let (base, _db) = test_utils::spawn_app().await;
    let client = Client::new();

    let admin = test_utils::admin_token(&client, &base).await;
    let (_id, token) =
        test_utils::employee_session(&client, &base, &admin, "김대리", "빈시트", "employee").await;

    let link_id = post_pool_link(&client, &base, &token, "https://a.example/1").await;
    post_pool_link(&client, &base, &token, "https://a.example/2").await;

    // Flagging requires a staff session.
    let response = client
        .put(format!("{}/api/links/{}", base, link_id))
        .json(&serde_json::json!({ "action": "guarantee", "guarantee": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);

    let response = client
        .put(format!("{}/api/links/{}", base, link_id))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "action": "guarantee", "guarantee": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let response = client
        .get(format!("{}/api/guarantee-list", base))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    let links = body["links"].as_array().unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0]["id"], link_id);
}

#[tokio::test]
async fn test_click_log_promotes_entry() {
    let (base, _db) = test_utils::spawn_app().await;
    let client = Client::new();

    let admin = test_utils::admin_token(&client, &base).await;
    let (_id, token) =
        test_utils::employee_session(&client, &base, &admin, "김대리", "빈시트", "employee").await;
    let link_id = post_pool_link(&client, &base, &token, "https://a.example/1").await;

    // Click logging is open to anonymous customers.
    let response = client
        .post(format!("{}/api/guarantee-log", base))
        .json(&serde_json::json!({ "link_id": link_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);

    let response = client
        .get(format!("{}/api/guarantee-list", base))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["links"].as_array().unwrap().len(), 1);

    // Unknown entries are rejected.
    let response = client
        .post(format!("{}/api/guarantee-log", base))
        .json(&serde_json::json!({ "link_id": 9999 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_admin_demotes_and_resets_catalogue() {
    let (base, _db) = test_utils::spawn_app().await;
    let client = Client::new();

    let admin = test_utils::admin_token(&client, &base).await;
    let (_id, token) =
        test_utils::employee_session(&client, &base, &admin, "김대리", "빈시트", "employee").await;

    let first = post_pool_link(&client, &base, &token, "https://a.example/1").await;
    let second = post_pool_link(&client, &base, &token, "https://a.example/2").await;
    for id in [first, second] {
        client
            .put(format!("{}/api/links/{}", base, id))
            .bearer_auth(&token)
            .json(&serde_json::json!({ "action": "guarantee", "guarantee": true }))
            .send()
            .await
            .unwrap();
    }

    // Demote one entry; the board row itself survives.
    let response = client
        .post(format!("{}/admin/guarantee-delete/{}", base, first))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let response = client
        .get(format!("{}/api/guarantee-list", base))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["links"].as_array().unwrap().len(), 1);

    let response = client
        .get(format!("{}/api/links", base))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["total"], 2);

    // Reset by staff member clears the rest.
    let response = client
        .post(format!("{}/api/guarantee-insurance-reset", base))
        .bearer_auth(&admin)
        .json(&serde_json::json!({ "employee_name": "김대리" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["affected"], 1);

    let response = client
        .get(format!("{}/api/guarantee-list", base))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["links"].as_array().unwrap().is_empty());
}
