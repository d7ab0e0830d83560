//! Shared application state handed to every handler through axum's `State`.

use std::sync::Arc;

use crate::{db::DbPool, services::auth_service::JwtKeys, services::settlement::SettlementOracle};

/// Everything a request handler needs. Cloning is cheap: the pool and the
/// other members are reference counted.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub jwt: Arc<JwtKeys>,
    /// Source of settlement delays and outcomes for new payouts
    pub oracle: Arc<dyn SettlementOracle>,
}

impl AppState {
    pub fn new(pool: DbPool, jwt: JwtKeys, oracle: Arc<dyn SettlementOracle>) -> Self {
        Self {
            pool,
            jwt: Arc::new(jwt),
            oracle,
        }
    }
}
