//! HTTP router assembly.

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{handlers, middleware, state::AppState};

/// Build the application router.
///
/// Public: `/`, `/health`, register and login. Everything else requires a
/// bearer token. Unknown paths get the JSON 404 envelope.
pub fn build_router(state: AppState) -> Router {
    // Create authenticated routes (API endpoints)
    let authenticated_routes = Router::new()
        // Profile
        .route(
            "/api/auth/profile",
            get(handlers::auth::get_profile).put(handlers::auth::update_profile),
        )
        // Wallet routes
        .route("/api/wallet/balance", get(handlers::wallet::get_balance))
        .route("/api/wallet/add-money", post(handlers::wallet::add_money))
        .route(
            "/api/wallet/bank-accounts",
            get(handlers::wallet::list_bank_accounts).post(handlers::wallet::add_bank_account),
        )
        .route(
            "/api/wallet/bank-accounts/{id}",
            delete(handlers::wallet::delete_bank_account),
        )
        .route(
            "/api/wallet/transactions",
            get(handlers::wallet::transaction_history),
        )
        // Provider-style payout routes
        .route("/api/v1/balance", get(handlers::payouts::get_balance))
        .route(
            "/api/v1/beneficiary",
            get(handlers::payouts::list_beneficiaries).post(handlers::payouts::add_beneficiary),
        )
        .route("/api/v1/transfer", post(handlers::payouts::create_transfer))
        .route(
            "/api/v1/transfer/{transfer_id}",
            get(handlers::payouts::get_transfer_status),
        )
        // Notification routes
        .route(
            "/api/notifications",
            get(handlers::notifications::list_notifications),
        )
        .route(
            "/api/notifications/read-all",
            put(handlers::notifications::mark_all_read),
        )
        .route(
            "/api/notifications/{id}/read",
            put(handlers::notifications::mark_read),
        )
        .route(
            "/api/notifications/{id}",
            delete(handlers::notifications::delete_notification),
        )
        // Apply authentication middleware to all routes in this group
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::auth_middleware,
        ));

    Router::new()
        // Public routes (no authentication required)
        .route("/", get(handlers::index::api_index))
        .route("/health", get(handlers::health::health_check))
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .merge(authenticated_routes)
        .fallback(handlers::index::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS policy for the configured origins. `*` allows any origin.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if origins.iter().any(|o| o == "*") {
        return cors.allow_origin(Any);
    }

    let origins = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect::<Vec<_>>();

    cors.allow_origin(origins)
}
