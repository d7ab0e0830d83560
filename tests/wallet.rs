mod common;

use axum::http::{Method, StatusCode};
use common::{TestApp, transfer_body};
use serde_json::json;

fn bank_account(number: &str, ifsc: &str) -> serde_json::Value {
    json!({
        "account_holder_name": "Asha Rao",
        "account_number": number,
        "ifsc_code": ifsc,
        "bank_name": "HDFC Bank",
        "account_type": "savings"
    })
}

#[tokio::test]
async fn add_money_credits_and_records_once() {
    let app = TestApp::new().await;
    let token = app.register("asha@example.com").await;

    let (status, body) = app
        .post("/api/wallet/add-money", &token, json!({ "amount": 1250.75 }))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["amountAdded"], 1250.75);
    assert_eq!(body["data"]["newBalance"], 11250.75);
    assert_eq!(body["data"]["currency"], "INR");

    assert_eq!(app.balance(&token).await, 11250.75);

    let (_, body) = app.get("/api/wallet/transactions", &token).await;
    let transactions = body["data"]["transactions"].as_array().unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0]["type"], "CREDIT");
    assert_eq!(transactions[0]["status"], "SUCCESS");
    assert_eq!(transactions[0]["transfer_mode"], "DEPOSIT");
    assert!(
        transactions[0]["transfer_id"]
            .as_str()
            .unwrap()
            .starts_with("DEP")
    );

    assert_eq!(
        app.notification_types(&token).await,
        vec!["DEPOSIT_SUCCESS".to_string()]
    );
}

#[tokio::test]
async fn add_money_bounds() {
    let app = TestApp::new().await;
    let token = app.register("asha@example.com").await;

    let (status, body) = app
        .post("/api/wallet/add-money", &token, json!({ "amount": 0 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert_eq!(body["message"], "Valid amount is required");

    let (status, body) = app.post("/api/wallet/add-money", &token, json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let (status, body) = app
        .post("/api/wallet/add-money", &token, json!({ "amount": 50000.01 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "AMOUNT_LIMIT_EXCEEDED");

    let (status, _) = app
        .post("/api/wallet/add-money", &token, json!({ "amount": 50000 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.balance(&token).await, 60000.0);
}

#[tokio::test]
async fn bank_account_lifecycle() {
    let app = TestApp::new().await;
    let token = app.register("asha@example.com").await;

    let (status, body) = app
        .post(
            "/api/wallet/bank-accounts",
            &token,
            bank_account("123456789", "HDFC0000123"),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let account = &body["data"]["account"];
    assert_eq!(account["account_number"], "XXXXX6789");
    assert_eq!(account["verified"], true);
    let id = account["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .post(
            "/api/wallet/bank-accounts",
            &token,
            bank_account("123456789", "HDFC0000123"),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "ACCOUNT_EXISTS");

    let (_, body) = app.get("/api/wallet/bank-accounts", &token).await;
    assert_eq!(body["data"]["accounts"].as_array().unwrap().len(), 1);

    let types = app.notification_types(&token).await;
    assert_eq!(types, vec!["ACCOUNT_ADDED".to_string()]);
    let (_, body) = app.get("/api/notifications", &token).await;
    assert_eq!(
        body["data"]["notifications"][0]["message"],
        "Your HDFC Bank account ending with 6789 has been successfully added."
    );

    let uri = format!("/api/wallet/bank-accounts/{id}");
    let (status, _) = app.send(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.send(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "ACCOUNT_NOT_FOUND");
}

#[tokio::test]
async fn bank_account_validation() {
    let app = TestApp::new().await;
    let token = app.register("asha@example.com").await;

    let (status, body) = app
        .post(
            "/api/wallet/bank-accounts",
            &token,
            bank_account("123456789", "hdfc0000123"),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid IFSC code format");

    let (status, _) = app
        .post(
            "/api/wallet/bank-accounts",
            &token,
            bank_account("12345678", "HDFC0000123"),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .post(
            "/api/wallet/bank-accounts",
            &token,
            json!({ "account_number": "123456789" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "All fields are required");

    let mut bad_type = bank_account("123456789", "HDFC0000123");
    bad_type["account_type"] = json!("fixed");
    let (status, _) = app.post("/api/wallet/bank-accounts", &token, bad_type).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn foreign_bank_account_cannot_be_deleted() {
    let app = TestApp::new().await;
    let asha = app.register("asha@example.com").await;
    let ravi = app.register("ravi@example.com").await;

    let (_, body) = app
        .post(
            "/api/wallet/bank-accounts",
            &asha,
            bank_account("123456789", "HDFC0000123"),
        )
        .await;
    let id = body["data"]["account"]["id"].as_str().unwrap();

    let uri = format!("/api/wallet/bank-accounts/{id}");
    let (status, _) = app.send(Method::DELETE, &uri, Some(&ravi), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send(
            Method::DELETE,
            "/api/wallet/bank-accounts/not-a-uuid",
            Some(&asha),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn history_is_paginated_newest_first_with_bank_details() {
    let app = TestApp::new().await;
    let token = app.register("asha@example.com").await;

    app.post(
        "/api/wallet/bank-accounts",
        &token,
        bank_account("123456789", "HDFC0000123"),
    )
    .await;
    app.post("/api/wallet/add-money", &token, json!({ "amount": 100 }))
        .await;
    app.post("/api/v1/transfer", &token, transfer_body("T1", json!(10)))
        .await;
    app.post("/api/v1/transfer", &token, transfer_body("T2", json!(20)))
        .await;

    let (_, body) = app
        .get("/api/wallet/transactions?page=1&limit=2", &token)
        .await;
    let data = &body["data"];
    assert_eq!(data["pagination"]["total"], 3);
    assert_eq!(data["pagination"]["totalPages"], 2);
    assert_eq!(data["pagination"]["limit"], 2);

    let page = data["transactions"].as_array().unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0]["transfer_id"], "T2");
    assert_eq!(page[0]["type"], "DEBIT");
    assert_eq!(page[0]["description"], "Withdrawal to HDFC Bank");
    assert_eq!(page[0]["bank_name"], "HDFC Bank");
    assert_eq!(page[0]["account_number"], "XXXXX6789");
    assert_eq!(page[1]["transfer_id"], "T1");

    let (_, body) = app
        .get("/api/wallet/transactions?page=2&limit=2", &token)
        .await;
    let page = body["data"]["transactions"].as_array().unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0]["type"], "CREDIT");
    assert_eq!(page[0]["description"], "Money added to wallet");
}

#[tokio::test]
async fn malformed_body_uses_generic_envelope() {
    let app = TestApp::new().await;
    let token = app.register("asha@example.com").await;

    let (status, body) = app
        .post("/api/wallet/add-money", &token, json!({ "amount": "abc" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let (status, body) = app
        .send_raw(
            Method::POST,
            "/api/wallet/bank-accounts",
            Some(&token),
            "not json",
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    assert_eq!(app.balance(&token).await, 10000.0);
}

#[tokio::test]
async fn far_away_page_is_empty() {
    let app = TestApp::new().await;
    let token = app.register("asha@example.com").await;
    app.post("/api/wallet/add-money", &token, json!({ "amount": 100 }))
        .await;

    let (status, body) = app
        .get(
            &format!("/api/wallet/transactions?page={}", i64::MAX),
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["transactions"].as_array().unwrap().len(), 0);
    assert_eq!(body["data"]["pagination"]["total"], 1);
}
