// src/routes.rs

use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::{
    handlers::{admin, forms, generate, health, submissions},
    state::AppState,
};

/// Upper bound for uploaded question files and documents.
const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Assembles the main application router.
///
/// * Authentication is enforced per handler through the `CurrentUser` and
///   `MaybeUser` extractors.
/// * Applies global middleware (Trace, CORS, request timeout).
/// * Injects the shared state (store, identity provider, generator).
pub fn create_router(state: AppState) -> Router {
    let request_timeout = Duration::from_secs(state.config.request_timeout_secs);

    let form_routes = Router::new()
        .route("/forms", get(forms::list_forms))
        .route("/form/{form_name}", get(forms::get_form).delete(forms::delete_form))
        .route("/create-form", post(forms::create_form))
        .route("/my-forms", get(forms::my_forms))
        .merge(
            Router::new()
                .route("/upload-form", post(forms::upload_form))
                .route("/generate-form", post(generate::generate))
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        );

    let submission_routes = Router::new()
        .route("/submit", post(submissions::submit))
        .route("/submissions/{form_name}", get(submissions::list_submissions))
        .route(
            "/submissions/{form_name}/export",
            get(submissions::export_submissions),
        )
        .route("/my-submissions", get(submissions::my_submissions));

    Router::new()
        .route("/health", get(health::health))
        .route("/admin/stats", get(admin::admin_stats))
        .merge(form_routes)
        .merge(submission_routes)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(TimeoutLayer::new(request_timeout)),
        )
        .with_state(state)
}
