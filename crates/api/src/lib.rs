//! HTTP API for the Chemistry Expo voting service.
//!
//! Attendees walk through the review-then-vote ballot; admins log in to
//! manage exhibits and reviews and to read the recomputed results. Requests
//! are traced with `tracing` and counted in Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post, put};
use metrics_exporter_prometheus::PrometheusHandle;
use record_store::RecordStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use domain::AuthError;
pub use state::{AppState, BallotRegistry};

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: RecordStore + Clone + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/exhibits", get(routes::exhibits::list::<S>))
        .route("/ballots", post(routes::ballots::open::<S>))
        .route("/ballots/{id}", get(routes::ballots::get::<S>))
        .route("/ballots/{id}/review", post(routes::ballots::submit_review::<S>))
        .route("/ballots/{id}/back", post(routes::ballots::back::<S>))
        .route("/ballots/{id}/vote", post(routes::ballots::vote::<S>))
        .route("/admin/login", post(routes::admin::login::<S>))
        .route("/admin/logout", post(routes::admin::logout::<S>))
        .route("/admin/dashboard", get(routes::admin::dashboard::<S>))
        .route("/admin/report", get(routes::admin::report::<S>))
        .route(
            "/admin/exhibits",
            get(routes::exhibits::admin_list::<S>).post(routes::exhibits::create::<S>),
        )
        .route(
            "/admin/exhibits/{id}",
            put(routes::exhibits::update::<S>).delete(routes::exhibits::delete::<S>),
        )
        .route(
            "/admin/exhibits/{id}/reviews",
            get(routes::exhibits::reviews::<S>),
        )
        .route("/admin/reviews", get(routes::reviews::list::<S>))
        .route("/admin/reviews/{id}", delete(routes::reviews::delete::<S>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state from configuration.
///
/// Fails only if the admin allow-list cannot be parsed.
pub fn create_default_state<S: RecordStore + Clone + 'static>(
    store: S,
    config: &Config,
) -> Result<Arc<AppState<S>>, AuthError> {
    let credentials = config.credentials()?;
    if credentials.is_empty() {
        tracing::warn!("no admin accounts configured; every admin login will be rejected");
    }

    Ok(Arc::new(AppState::new(
        store,
        credentials,
        config.session_ttl(),
        config.ballot_ttl(),
        config.report_options(),
    )))
}
