//! Route handlers for the Funsheets web service.

pub mod generator;
pub mod health;
pub mod kids;
pub mod me;
pub mod pages;
pub mod review;
pub mod worksheets;

use axum::http::Uri;
use axum::routing::{get, post, put};
use axum::Router;

use crate::error::WebError;
use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // HTML pages
        .route("/dashboard", get(pages::dashboard_page))
        .route("/history", get(pages::history_page))
        .route("/worksheets/:id/review", get(pages::review_page))
        // Health check
        .route("/health", get(health::health))
        // API endpoints
        .route("/api/me", get(me::me_api).patch(me::update_api))
        .route("/api/kids", get(kids::list_api).post(kids::create_api))
        .route("/api/kids/:id", put(kids::update_api).delete(kids::delete_api))
        .route("/api/subjects", get(generator::subjects_api))
        .route(
            "/api/worksheets",
            get(worksheets::list_api).post(generator::generate_api),
        )
        .route("/api/worksheets/:id", get(worksheets::get_api))
        .route("/api/worksheets/:id/download", get(worksheets::download_api))
        .route("/api/worksheets/:id/complete", post(worksheets::complete_api))
        .route("/api/worksheets/:id/regenerate", post(worksheets::regenerate_api))
        .route(
            "/api/worksheets/:id/review",
            get(review::get_api).put(review::put_api),
        )
        .fallback(not_found)
}

async fn not_found(uri: Uri) -> WebError {
    WebError::NotFound(format!("Route {}", uri.path()))
}
