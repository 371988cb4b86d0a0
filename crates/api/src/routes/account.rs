use axum::{
    routing::{delete, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/auth/register", post(handlers::account::register))
        .route("/api/auth/login", post(handlers::account::login))
        .route("/api/auth/logout", post(handlers::account::logout))
        .route("/api/account", delete(handlers::account::delete_account))
}
