use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/credits/balance", get(handlers::ledger::get_balance))
        .route("/api/credits/ledger", get(handlers::ledger::ledger_entries))
        .route("/api/tutor/earnings", get(handlers::ledger::get_earnings))
        .route("/api/admin/credits", post(handlers::ledger::add_credits))
}
