use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::state::AppState;
use crate::users::dto::UserPayload;
use crate::users::password::hash_password;
use crate::users::repo::User;

pub fn read_router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/:id", get(get_user))
}

pub fn write_router() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/:id", patch(update_user).delete(delete_user))
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let users = User::list(&state.db).await?;
    Ok(Json(users))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<UserPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let Json(payload) = payload?;
    let password_hash = hash_password(&payload.password)?;
    let user = User::create(&state.db, &payload, &password_hash).await?;
    info!(user_id = user.id, "user created");
    Ok((StatusCode::CREATED, Json(user)))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    let id = parse_id(&id)?;
    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(user))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UserPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let id = parse_id(&id)?;
    let Json(payload) = payload?;
    let password_hash = hash_password(&payload.password)?;
    let user = User::update(&state.db, id, &payload, &password_hash)
        .await?
        .ok_or(ApiError::NotFound)?;
    info!(user_id = user.id, "user replaced");
    // A successful replace reports 201, same as create.
    Ok((StatusCode::CREATED, Json(user)))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    let id = parse_id(&id)?;
    let user = User::delete(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    info!(user_id = user.id, "user deleted");
    Ok(Json(user))
}

/// Path ids arrive as raw strings so a bad value maps to the API's own
/// 400 body instead of the framework rejection.
fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse().map_err(|_| ApiError::InvalidParameter)
}
