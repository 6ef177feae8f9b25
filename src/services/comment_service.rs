use tracing::{info, warn};
use validator::Validate;

use crate::auth::AuthUser;
use crate::db::{CommentRepository, StockRepository};
use crate::errors::AppError;
use crate::models::{CommentDto, CreateCommentRequest, UpdateCommentRequest};

pub async fn list(repo: &dyn CommentRepository) -> Result<Vec<CommentDto>, AppError> {
    let comments = repo.get_all().await?;
    Ok(comments.into_iter().map(CommentDto::from).collect())
}

pub async fn fetch_one(repo: &dyn CommentRepository, id: i32) -> Result<CommentDto, AppError> {
    let comment = repo.get_by_id(id).await?.ok_or(AppError::NotFound)?;
    Ok(comment.into())
}

/// Posts a comment under `stock_id` authored by `author`. The stock must exist;
/// the foreign key on `comments.stock_id` covers a stock removed after the check.
pub async fn create(
    stocks: &dyn StockRepository,
    comments: &dyn CommentRepository,
    stock_id: i32,
    author: &AuthUser,
    input: CreateCommentRequest,
) -> Result<CommentDto, AppError> {
    input.validate()?;

    if !stocks.exists(stock_id).await? {
        warn!("Rejected comment on missing stock {}", stock_id);
        return Err(AppError::BadRequest("Stock does not exist".into()));
    }

    let comment = comments
        .create(input.into_new_comment(stock_id, author.id))
        .await?;
    info!("User {} commented on stock {} (comment {})", author.username, stock_id, comment.id);
    Ok(comment.into())
}

pub async fn update(
    repo: &dyn CommentRepository,
    id: i32,
    input: UpdateCommentRequest,
) -> Result<CommentDto, AppError> {
    input.validate()?;
    let comment = repo.update(id, input.into()).await?.ok_or(AppError::NotFound)?;
    Ok(comment.into())
}

/// Deleting is idempotent: `false` means there was nothing to remove.
pub async fn delete(repo: &dyn CommentRepository, id: i32) -> Result<bool, AppError> {
    match repo.delete(id).await? {
        Some(comment) => {
            info!("Deleted comment {} from stock {}", comment.id, comment.stock_id);
            Ok(true)
        }
        None => {
            info!("Comment {} was already absent", id);
            Ok(false)
        }
    }
}
