use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use common::types::ErrorBody;
use service::{auth::CredentialGate, repository::PersonRepository};
use tracing::warn;

use crate::observability::{AUTH_REJECTIONS_TOTAL, REQUESTS_TOTAL};

pub const REALM_CHALLENGE: &str = "Basic realm=\"persons\"";

#[derive(Clone)]
pub struct ServerState {
    pub repo: Arc<dyn PersonRepository>,
    pub gate: Arc<CredentialGate>,
}

/// The one response every rejected request gets, whatever the reason.
pub fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, REALM_CHALLENGE)],
        Json(ErrorBody { error: "unauthorized".into() }),
    )
        .into_response()
}

/// Middleware: require valid Basic credentials; the reason for a rejection
/// only reaches the log, never the client.
pub async fn require_basic_auth(State(state): State<ServerState>, mut req: Request, next: Next) -> Response {
    REQUESTS_TOTAL.inc();
    let header = req.headers().get(header::AUTHORIZATION).map(|v| v.as_bytes());

    match state.gate.authorize(header) {
        Ok(identity) => {
            req.extensions_mut().insert(identity);
            next.run(req).await
        }
        Err(rejection) => {
            AUTH_REJECTIONS_TOTAL.inc();
            warn!(
                reason = %rejection,
                code = rejection.code(),
                method = %req.method(),
                path = %req.uri().path(),
                "request rejected by credential gate"
            );
            unauthorized()
        }
    }
}
