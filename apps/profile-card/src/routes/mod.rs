pub mod health;
pub mod profile;

use axum::{routing::get, Router};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/", get(profile::handle_card_page))
        .route("/api/v1/profile", get(profile::handle_get_profile))
        .with_state(state)
}
