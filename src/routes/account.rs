use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use tracing::{error, info};

use crate::errors::AppError;
use crate::extract::AppJson;
use crate::models::{LoginRequest, NewUserDto, RegisterRequest};
use crate::services::account_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

pub async fn register(
    State(state): State<AppState>,
    AppJson(data): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<NewUserDto>), AppError> {
    info!("POST /api/account/register - Registering {}", data.username);
    let user = account_service::register(state.users.as_ref(), &state.tokens, data)
        .await
        .map_err(|e| {
            error!("Registration failed: {}", e);
            e
        })?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn login(
    State(state): State<AppState>,
    AppJson(data): AppJson<LoginRequest>,
) -> Result<Json<NewUserDto>, AppError> {
    info!("POST /api/account/login - Login attempt for {}", data.username);
    let user = account_service::login(state.users.as_ref(), &state.tokens, data).await?;
    Ok(Json(user))
}
