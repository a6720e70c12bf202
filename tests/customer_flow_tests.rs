//! End-to-end flow: customer intake, link collection, reactions and the
//! unread-like lifecycle across the staff and customer surfaces.

use reqwest::Client;

#[path = "test_utils/mod.rs"]
mod test_utils;

#[tokio::test]
async fn test_customer_creation_yields_handle_and_empty_boards() {
    let (base, _db) = test_utils::spawn_app().await;
    let client = Client::new();

    let admin = test_utils::admin_token(&client, &base).await;
    let (_id, token) =
        test_utils::employee_session(&client, &base, &admin, "김대리", "빈시트", "employee").await;
    let (_customer_id, handle) =
        test_utils::create_customer(&client, &base, &token, "홍길동").await;

    assert_eq!(handle.len(), 8);
    assert!(handle.chars().all(|c| c.is_ascii_hexdigit()));

    // Both boards start empty despite the hidden marker rows.
    for path in ["/api/links", "/api/office-links"] {
        let response = client
            .get(format!("{}{}?management_site_id={}", base, path, handle))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["total"], 0);
    }
}

#[tokio::test]
async fn test_query_handle_selects_the_board_on_create() {
    let (base, _db) = test_utils::spawn_app().await;
    let client = Client::new();

    let admin = test_utils::admin_token(&client, &base).await;
    let (_id, token) =
        test_utils::employee_session(&client, &base, &admin, "김대리", "빈시트", "employee").await;
    let (_customer_id, handle) =
        test_utils::create_customer(&client, &base, &token, "홍길동").await;

    // Anonymous submission addressed purely by the query string.
    let response = client
        .post(format!("{}/api/links?management_site_id={}", base, handle))
        .json(&serde_json::json!({
            "url": "https://www.zigbang.com/home/777",
            "platform": "직방",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["link"]["added_by"], "중개사");
    assert_eq!(body["link"]["management_site_id"], handle.as_str());

    // Staff submission with the query handle lands on the customer's board,
    // not the shared pool.
    let response = client
        .post(format!(
            "{}/api/office-links?management_site_id={}",
            base, handle
        ))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "url": "https://www.zigbang.com/office/778",
            "platform": "직방",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["link"]["management_site_id"], handle.as_str());

    let response = client
        .get(format!("{}/api/links?management_site_id={}", base, handle))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn test_like_flow_updates_unread_counter() {
    let (base, _db) = test_utils::spawn_app().await;
    let client = Client::new();

    let admin = test_utils::admin_token(&client, &base).await;
    let (_id, token) =
        test_utils::employee_session(&client, &base, &admin, "김대리", "빈시트", "employee").await;
    let (_customer_id, handle) =
        test_utils::create_customer(&client, &base, &token, "홍길동").await;

    // Staff posts a link onto the customer's residential board.
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
    assert_eq!(response.status(), 201);
    let body: serde_json::Value = response.json().await.unwrap();
    let link_id = body["link"]["id"].as_i64().unwrap();
    assert_eq!(body["link"]["added_by"], "김대리");

    // The customer likes it anonymously.
    let response = client
        .put(format!("{}/api/links/{}", base, link_id))
        .json(&serde_json::json!({ "action": "like" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["link"]["liked"], true);
    assert_eq!(body["link"]["is_checked"], false);

    // Staff sees the unread badge, both live and in the list view.
    let response = client
        .get(format!(
            "{}/api/employee/unchecked-likes?management_site_id={}&type=residence",
            base, handle
        ))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["count"], 1);

    let response = client
        .get(format!("{}/api/customers", base))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["customers"][0]["unchecked_likes_residence"], 1);
    assert_eq!(body["customers"][0]["unchecked_likes_business"], 0);
}

#[tokio::test]
async fn test_page_visit_acknowledges_likes() {
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
    let link_id: i64 = response.json::<serde_json::Value>().await.unwrap()["link"]["id"]
        .as_i64()
        .unwrap();

    client
        .put(format!("{}/api/links/{}", base, link_id))
        .json(&serde_json::json!({ "action": "like" }))
        .send()
        .await
        .unwrap();

    // Opening the shared page returns the entries and clears the badge.
    let response = client
        .get(format!("{}/customer/{}", base, handle))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["customer"]["customer_name"], "홍길동");
    assert_eq!(body["links"].as_array().unwrap().len(), 1);

    let response = client
        .get(format!(
            "{}/api/employee/unchecked-likes?management_site_id={}&type=residence",
            base, handle
        ))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["count"], 0);

    // Re-liking reopens the badge.
    client
        .put(format!("{}/api/links/{}", base, link_id))
        .json(&serde_json::json!({ "action": "like" }))
        .send()
        .await
        .unwrap();
    let response = client
        .get(format!(
            "{}/api/employee/unchecked-likes?management_site_id={}&type=residence",
            base, handle
        ))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["count"], 1);
}

#[tokio::test]
async fn test_unknown_handle_reports_owner_gone() {
    let (base, _db) = test_utils::spawn_app().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/customer/deadbeef", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["code"], "OWNER_GONE");
    assert_eq!(body["details"]["management_site_id"], "deadbeef");
}

#[tokio::test]
async fn test_shared_pool_requires_staff_session() {
    let (base, _db) = test_utils::spawn_app().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/api/links", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);

    let admin = test_utils::admin_token(&client, &base).await;
    let (_id, token) =
        test_utils::employee_session(&client, &base, &admin, "김대리", "빈시트", "employee").await;

    let response = client
        .get(format!("{}/api/links", base))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_customer_delete_purges_boards() {
    let (base, _db) = test_utils::spawn_app().await;
    let client = Client::new();

    let admin = test_utils::admin_token(&client, &base).await;
    let (_id, token) =
        test_utils::employee_session(&client, &base, &admin, "김대리", "빈시트", "employee").await;
    let (customer_id, handle) =
        test_utils::create_customer(&client, &base, &token, "홍길동").await;

    client
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

    let response = client
        .delete(format!("{}/api/customers/{}", base, customer_id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    // Two marker rows plus the posted link.
    assert_eq!(body["purged_links"], 3);

    // The share page is gone.
    let response = client
        .get(format!("{}/customer/{}", base, handle))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_employee_cannot_touch_other_teams_customer() {
    let (base, _db) = test_utils::spawn_app().await;
    let client = Client::new();

    let admin = test_utils::admin_token(&client, &base).await;
    let (_a_id, a_token) =
        test_utils::employee_session(&client, &base, &admin, "김대리", "빈시트", "employee").await;
    let (_b_id, b_token) =
        test_utils::employee_session(&client, &base, &admin, "박사원", "위플러스", "employee")
            .await;
    let (customer_id, _handle) =
        test_utils::create_customer(&client, &base, &a_token, "홍길동").await;

    let response = client
        .put(format!("{}/api/customers/{}/memo", base, customer_id))
        .bearer_auth(&b_token)
        .json(&serde_json::json!({ "memo": "남의 고객" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);

    // Other employees do not even see it in their listing.
    let response = client
        .get(format!("{}/api/customers", base))
        .bearer_auth(&b_token)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["total"], 0);
}
