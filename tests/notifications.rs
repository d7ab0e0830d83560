mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use serde_json::json;

async fn app_with_deposits(count: usize) -> (TestApp, String) {
    let app = TestApp::new().await;
    let token = app.register("asha@example.com").await;
    for i in 0..count {
        let (status, _) = app
            .post(
                "/api/wallet/add-money",
                &token,
                json!({ "amount": 10 + i as i64 }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }
    (app, token)
}

#[tokio::test]
async fn list_is_paginated_with_unread_count() {
    let (app, token) = app_with_deposits(3).await;

    let (status, body) = app.get("/api/notifications?limit=2", &token).await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["unreadCount"], 3);
    assert_eq!(data["pagination"]["total"], 3);
    assert_eq!(data["pagination"]["totalPages"], 2);

    let notifications = data["notifications"].as_array().unwrap();
    assert_eq!(notifications.len(), 2);
    assert_eq!(notifications[0]["title"], "Money Added Successfully");
    // Newest first: the last deposit was ₹12
    assert!(
        notifications[0]["message"]
            .as_str()
            .unwrap()
            .starts_with("₹12.00")
    );
    assert_eq!(notifications[0]["read"], false);
}

#[tokio::test]
async fn mark_one_and_all_read() {
    let (app, token) = app_with_deposits(3).await;

    let (_, body) = app.get("/api/notifications", &token).await;
    let id = body["data"]["notifications"][0]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let (status, _) = app
        .send(
            Method::PUT,
            &format!("/api/notifications/{id}/read"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.get("/api/notifications", &token).await;
    assert_eq!(body["data"]["unreadCount"], 2);

    let (status, body) = app
        .send(
            Method::PUT,
            "/api/notifications/read-all",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["updatedCount"], 2);

    let (_, body) = app.get("/api/notifications", &token).await;
    assert_eq!(body["data"]["unreadCount"], 0);
}

#[tokio::test]
async fn delete_and_not_found() {
    let (app, token) = app_with_deposits(1).await;
    let other = app.register("ravi@example.com").await;

    let (_, body) = app.get("/api/notifications", &token).await;
    let id = body["data"]["notifications"][0]["id"]
        .as_str()
        .unwrap()
        .to_string();
    let uri = format!("/api/notifications/{id}");

    // Another user cannot touch it
    let (status, body) = app.send(Method::DELETE, &uri, Some(&other), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOTIFICATION_NOT_FOUND");

    let (status, _) = app.send(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.send(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send(
            Method::PUT,
            &format!("/api/notifications/{id}/read"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = app.get("/api/notifications", &token).await;
    assert_eq!(body["data"]["notifications"].as_array().unwrap().len(), 0);
}
