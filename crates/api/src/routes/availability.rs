use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/tutor/availability",
            get(handlers::availability::get_own_availability)
                .put(handlers::availability::save_availability),
        )
        .route(
            "/api/tutors/:id/availability",
            get(handlers::availability::get_tutor_availability),
        )
}
