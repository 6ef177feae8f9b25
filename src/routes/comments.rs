use axum::extract::{Path, State};
use axum::http::header::LOCATION;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use tracing::{error, info};

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::models::{CommentDto, CreateCommentRequest, UpdateCommentRequest};
use crate::services::comment_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_comments))
        // POST takes the parent stock id in the same path slot the other verbs use for the comment id.
        .route(
            "/:id",
            get(get_comment)
                .post(create_comment)
                .put(update_comment)
                .delete(delete_comment),
        )
}

pub async fn list_comments(State(state): State<AppState>) -> Result<Json<Vec<CommentDto>>, AppError> {
    info!("GET /api/comment - Listing comments");
    let comments = comment_service::list(state.comments.as_ref())
        .await
        .map_err(|e| {
            error!("Failed to list comments: {}", e);
            e
        })?;
    Ok(Json(comments))
}

pub async fn get_comment(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CommentDto>, AppError> {
    info!("GET /api/comment/{} - Fetching comment", id);
    let comment = comment_service::fetch_one(state.comments.as_ref(), id)
        .await
        .map_err(|e| {
            error!("Failed to fetch comment {}: {}", id, e);
            e
        })?;
    Ok(Json(comment))
}

pub async fn create_comment(
    State(state): State<AppState>,
    Path(stock_id): Path<i32>,
    author: AuthUser,
    AppJson(data): AppJson<CreateCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    info!("POST /api/comment/{} - Creating comment as {}", stock_id, author.username);
    let comment = comment_service::create(
        state.stocks.as_ref(),
        state.comments.as_ref(),
        stock_id,
        &author,
        data,
    )
    .await
    .map_err(|e| {
        error!("Failed to create comment on stock {}: {}", stock_id, e);
        e
    })?;
    let location = format!("/api/comment/{}", comment.id);
    Ok((StatusCode::CREATED, [(LOCATION, location)], Json(comment)))
}

pub async fn update_comment(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(data): AppJson<UpdateCommentRequest>,
) -> Result<Json<CommentDto>, AppError> {
    info!("PUT /api/comment/{} - Updating comment", id);
    let comment = comment_service::update(state.comments.as_ref(), id, data)
        .await
        .map_err(|e| {
            error!("Failed to update comment {}: {}", id, e);
            e
        })?;
    Ok(Json(comment))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    info!("DELETE /api/comment/{} - Deleting comment", id);
    comment_service::delete(state.comments.as_ref(), id)
        .await
        .map_err(|e| {
            error!("Failed to delete comment {}: {}", id, e);
            e
        })?;
    Ok(StatusCode::NO_CONTENT)
}
