#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use chrono::Utc;
use mock_payout_gateway::{
    app::build_router,
    db::{self, DbPool},
    services::{
        auth_service::JwtKeys,
        settlement::{SettlementOracle, SettlementOutcome, SettlementWorker},
    },
    state::AppState,
};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

pub const JWT_SECRET: &str = "integration-test-secret";

/// Oracle with a fixed outcome and a fixed settlement delay.
#[derive(Clone, Copy)]
pub struct FixedOracle {
    pub outcome: SettlementOutcome,
    pub delay: Duration,
}

impl FixedOracle {
    pub fn immediate(outcome: SettlementOutcome) -> Self {
        Self {
            outcome,
            delay: Duration::ZERO,
        }
    }
}

impl SettlementOracle for FixedOracle {
    fn settlement_delay(&self) -> Duration {
        self.delay
    }

    fn decide(&self) -> SettlementOutcome {
        self.outcome
    }
}

pub struct TestApp {
    pub pool: DbPool,
    pub router: Router,
    pub worker: SettlementWorker,
    // Keeps an on-disk database alive for the test's duration
    _dir: Option<TempDir>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_outcome(SettlementOutcome::Success).await
    }

    pub async fn with_outcome(outcome: SettlementOutcome) -> Self {
        Self::with_oracle(FixedOracle::immediate(outcome)).await
    }

    pub async fn with_oracle(oracle: FixedOracle) -> Self {
        Self::build("sqlite::memory:", 1, oracle, None).await
    }

    /// App backed by a SQLite file, so several pooled connections share it.
    pub async fn on_disk(max_connections: u32) -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("wallet.db").display());
        Self::build(
            &url,
            max_connections,
            FixedOracle::immediate(SettlementOutcome::Success),
            Some(dir),
        )
        .await
    }

    async fn build(
        database_url: &str,
        max_connections: u32,
        oracle: FixedOracle,
        dir: Option<TempDir>,
    ) -> Self {
        let pool = db::create_pool(database_url, max_connections)
            .await
            .expect("pool");
        db::run_migrations(&pool).await.expect("migrations");

        let oracle: Arc<dyn SettlementOracle> = Arc::new(oracle);
        let state = AppState::new(pool.clone(), JwtKeys::new(JWT_SECRET, 24), oracle.clone());
        let worker = SettlementWorker::new(pool.clone(), oracle, Duration::from_millis(10));

        Self {
            pool,
            router: build_router(state),
            worker,
            _dir: dir,
        }
    }

    /// Send a request and decode the JSON body (`Null` when empty).
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        send_to(self.router.clone(), method, uri, token, body).await
    }

    /// Send a raw `application/json` body, valid JSON or not.
    pub async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: &str,
    ) -> (StatusCode, Value) {
        let request = request_builder(method, uri, token)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        dispatch(self.router.clone(), request).await
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(token), Some(body)).await
    }

    /// Register a user and return the bearer token.
    pub async fn register(&self, email: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({
                    "email": email,
                    "password": "password123",
                    "name": "Asha Rao",
                    "phone": "9876543210"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
        body["data"]["token"].as_str().unwrap().to_string()
    }

    /// Wallet balance in rupees from the generic endpoint.
    pub async fn balance(&self, token: &str) -> f64 {
        let (status, body) = self.get("/api/wallet/balance", token).await;
        assert_eq!(status, StatusCode::OK);
        body["data"]["availableBalance"].as_f64().unwrap()
    }

    /// Settle everything that is due, pretending the clock is an hour ahead.
    pub async fn settle_all(&self) -> usize {
        self.worker
            .settle_due(Utc::now() + chrono::Duration::hours(1))
            .await
            .unwrap()
    }

    pub async fn notification_types(&self, token: &str) -> Vec<String> {
        let (_, body) = self.get("/api/notifications", token).await;
        body["data"]["notifications"]
            .as_array()
            .unwrap()
            .iter()
            .map(|n| n["type"].as_str().unwrap().to_string())
            .collect()
    }
}

fn request_builder(method: Method, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match token {
        Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {token}")),
        None => builder,
    }
}

async fn dispatch(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

/// Like `TestApp::send`, but on an owned router so it can run in a spawned task.
pub async fn send_to(
    router: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = request_builder(method, uri, token);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    dispatch(router, request).await
}

pub fn transfer_body(transfer_id: &str, amount: Value) -> Value {
    json!({
        "transferId": transfer_id,
        "amount": amount,
        "transferMode": "banktransfer",
        "remarks": "",
        "beneDetails": {
            "name": "Ravi Kumar",
            "bankAccount": "123456789",
            "ifsc": "HDFC0000123"
        }
    })
}
