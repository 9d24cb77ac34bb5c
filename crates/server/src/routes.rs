use axum::{middleware, routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use crate::observability;

pub mod auth;
pub mod persons;

pub use auth::ServerState;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn metrics() -> (axum::http::StatusCode, String) {
    observability::encode_metrics()
}

/// Build the full application router: public health/metrics plus the
/// credential-gated persons API.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics));

    // Every persons route runs the gate before its handler.
    let api = Router::new()
        .route("/api/persons", get(persons::list_persons).post(persons::create_person))
        .route(
            "/api/persons/:id",
            get(persons::get_person)
                .put(persons::update_person)
                .delete(persons::delete_person),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_basic_auth));

    public
        .merge(api)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
