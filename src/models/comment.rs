use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::validation::not_blank;

// A note a user posted about one stock. `created_by` is the author's username,
// joined in from the users table.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Comment {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub created_on: DateTime<Utc>,
    pub stock_id: i32,
    pub app_user_id: Uuid,
    pub created_by: String,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub title: String,
    pub content: String,
    pub stock_id: i32,
    pub app_user_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct CommentChanges {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    #[validate(
        length(min = 5, max = 280, message = "Title must be between 5 and 280 characters"),
        custom(function = "not_blank")
    )]
    pub title: String,
    #[validate(
        length(min = 5, max = 280, message = "Content must be between 5 and 280 characters"),
        custom(function = "not_blank")
    )]
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCommentRequest {
    #[validate(
        length(min = 5, max = 280, message = "Title must be between 5 and 280 characters"),
        custom(function = "not_blank")
    )]
    pub title: String,
    #[validate(
        length(min = 5, max = 280, message = "Content must be between 5 and 280 characters"),
        custom(function = "not_blank")
    )]
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommentDto {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub created_on: DateTime<Utc>,
    pub created_by: String,
    pub stock_id: i32,
}

impl CreateCommentRequest {
    pub fn into_new_comment(self, stock_id: i32, app_user_id: Uuid) -> NewComment {
        NewComment {
            title: self.title,
            content: self.content,
            stock_id,
            app_user_id,
        }
    }
}

impl From<UpdateCommentRequest> for CommentChanges {
    fn from(req: UpdateCommentRequest) -> Self {
        Self {
            title: req.title,
            content: req.content,
        }
    }
}

impl From<Comment> for CommentDto {
    fn from(c: Comment) -> Self {
        Self {
            id: c.id,
            title: c.title,
            content: c.content,
            created_on: c.created_on,
            created_by: c.created_by,
            stock_id: c.stock_id,
        }
    }
}
