//! Backup, restore and orphan-cleanup tests.

use reqwest::Client;

#[path = "test_utils/mod.rs"]
mod test_utils;

#[tokio::test]
async fn test_backup_restore_roundtrip_is_lossless() {
    let (base, _db) = test_utils::spawn_app().await;
    let client = Client::new();

    let admin = test_utils::admin_token(&client, &base).await;
    let (_id, token) =
        test_utils::employee_session(&client, &base, &admin, "김대리", "빈시트", "employee").await;
    let (_customer_id, handle) =
        test_utils::create_customer(&client, &base, &token, "홍길동").await;

    let response = client
        .post(format!("{}/api/links", base))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "url": "https://www.zigbang.com/home/12345",
            "platform": "직방",
            "management_site_id": handle,
        }))
        .send()
        .await
        .unwrap();
    let link_id = response.json::<serde_json::Value>().await.unwrap()["link"]["id"]
        .as_i64()
        .unwrap();
    client
        .put(format!("{}/api/links/{}", base, link_id))
        .json(&serde_json::json!({ "action": "like" }))
        .send()
        .await
        .unwrap();

    let response = client
        .get(format!("{}/api/backup", base))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let backup: serde_json::Value = response.json().await.unwrap();
    // Marker rows are part of the dump.
    assert_eq!(backup["links"].as_array().unwrap().len(), 2);
    assert_eq!(backup["office_links"].as_array().unwrap().len(), 1);
    assert_eq!(backup["customer_info"]["customer_name"], "제일좋은집 찾아드릴분");

    let response = client
        .post(format!("{}/api/restore", base))
        .bearer_auth(&admin)
        .json(&backup)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let response = client
        .get(format!("{}/api/backup", base))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    let after: serde_json::Value = response.json().await.unwrap();
    assert_eq!(after["links"], backup["links"]);
    assert_eq!(after["office_links"], backup["office_links"]);

    // Board state survived intact, like included.
    let response = client
        .get(format!("{}/api/links?management_site_id={}", base, handle))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["links"][0]["liked"], true);

    // Inserting after a restore must not collide with a restored id.
    let max_restored = backup["links"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["id"].as_i64().unwrap())
        .max()
        .unwrap();
    let response = client
        .post(format!("{}/api/links", base))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "url": "https://www.zigbang.com/home/999",
            "platform": "직방",
            "management_site_id": handle,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["link"]["id"].as_i64().unwrap() > max_restored);
}

#[tokio::test]
async fn test_cleanup_refuses_live_handle() {
    let (base, _db) = test_utils::spawn_app().await;
    let client = Client::new();

    let admin = test_utils::admin_token(&client, &base).await;
    let (_id, token) =
        test_utils::employee_session(&client, &base, &admin, "김대리", "빈시트", "employee").await;
    let (_customer_id, handle) =
        test_utils::create_customer(&client, &base, &token, "홍길동").await;

    let response = client
        .delete(format!(
            "{}/api/admin/cleanup-customer-links/{}",
            base, handle
        ))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_cleanup_purges_orphaned_rows() {
    let (base, db) = test_utils::spawn_app().await;
    let client = Client::new();

    let admin = test_utils::admin_token(&client, &base).await;

    // Plant board rows whose handle resolves to no customer.
    backoffice::repositories::board::insert_bootstrap_rows(&db, "0badf00d", "2025-01-10")
        .await
        .unwrap();

    let response = client
        .delete(format!(
            "{}/api/admin/cleanup-customer-links/0badf00d",
            base
        ))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["deleted"], 2);
}

#[tokio::test]
async fn test_banner_row_read_and_update() {
    let (base, _db) = test_utils::spawn_app().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/api/customer_info", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["customer_name"], "제일좋은집 찾아드릴분");

    let admin = test_utils::admin_token(&client, &base).await;
    let response = client
        .post(format!("{}/api/customer_info", base))
        .bearer_auth(&admin)
        .json(&serde_json::json!({ "move_in_date": "2025-03-01" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["customer_name"], "제일좋은집 찾아드릴분");
    assert_eq!(body["move_in_date"], "2025-03-01");
}
