use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use models::{Person, PersonId, PersonInput};
use service::auth::AuthIdentity;
use tracing::info;

use crate::errors::JsonApiError;
use crate::routes::auth::ServerState;

/// List all persons
pub async fn list_persons(State(state): State<ServerState>) -> Json<Vec<Person>> {
    Json(state.repo.list().await)
}

/// Fetch one person; 404 when absent
pub async fn get_person(State(state): State<ServerState>, Path(id): Path<PersonId>) -> Result<Json<Person>, StatusCode> {
    match state.repo.get(id).await {
        Some(person) => Ok(Json(person)),
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// Create a person; any `id` in the body is ignored
pub async fn create_person(
    State(state): State<ServerState>,
    Extension(identity): Extension<AuthIdentity>,
    Json(input): Json<PersonInput>,
) -> Result<impl IntoResponse, JsonApiError> {
    let person = state.repo.create(input).await?;
    info!(id = person.id, actor = %identity.username, "person created via api");
    let location = format!("/api/persons/{}", person.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(person)))
}

/// Replace a person wholesale.
///
/// An unknown id still answers 204: the store treats it as a no-op.
pub async fn update_person(
    State(state): State<ServerState>,
    Extension(identity): Extension<AuthIdentity>,
    Path(id): Path<PersonId>,
    Json(person): Json<Person>,
) -> Result<StatusCode, JsonApiError> {
    person.ensure_id_matches(id)?;
    let matched = state.repo.update(person).await?;
    info!(id, matched, actor = %identity.username, "person update via api");
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a person; idempotent
pub async fn delete_person(
    State(state): State<ServerState>,
    Extension(identity): Extension<AuthIdentity>,
    Path(id): Path<PersonId>,
) -> Result<StatusCode, JsonApiError> {
    let existed = state.repo.delete(id).await?;
    info!(id, existed, actor = %identity.username, "person delete via api");
    Ok(StatusCode::NO_CONTENT)
}
