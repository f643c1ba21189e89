pub mod allowance;
pub mod categories;
pub mod oauth;
pub mod plans;
pub mod spends;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        // Allowance ledger
        .route("/api/allowance", get(allowance::month))
        .route("/api/allowance/day", get(allowance::day))
        // Monthly plan
        .route("/api/plan", get(plans::show).put(plans::save))
        // Categories
        .route("/api/categories", get(categories::index).post(categories::create))
        // Spend CRUD
        .route("/api/spends", post(spends::create))
        .route(
            "/api/spends/:id",
            get(spends::show).put(spends::update).delete(spends::delete),
        )
        // OAuth provider redirect
        .route("/api/oauth/naver/callback", get(oauth::naver_callback))
        // Health check
        .route("/health", get(health))
}

async fn health() -> &'static str {
    "OK"
}
