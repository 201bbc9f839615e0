pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::search::handlers as search;
use crate::state::AppState;
use crate::verification::handlers as verification;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Job search
        .route("/api/v1/jobs", get(search::handle_search_jobs))
        .route(
            "/api/v1/companies/:company_id/jobs",
            get(search::handle_company_jobs),
        )
        // Email verification
        .route(
            "/api/v1/verification/send",
            post(verification::handle_send_code),
        )
        .route(
            "/api/v1/verification/verify",
            post(verification::handle_verify_code),
        )
        .with_state(state)
}
