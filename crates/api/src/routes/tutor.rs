use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/tutor/profile", put(handlers::tutor::save_profile))
        .route("/api/tutors", get(handlers::tutor::search_tutors))
        .route("/api/tutors/:id", get(handlers::tutor::get_tutor))
        .route(
            "/api/admin/tutors/:id/status",
            put(handlers::tutor::set_status),
        )
}
