use async_trait::async_trait;
use sqlx::{PgExecutor, PgPool};

use crate::db::{foreign_key_violation, CommentRepository, StoreError};
use crate::models::{Comment, CommentChanges, NewComment};

// Every read joins the author so responses can show who wrote the comment.
const SELECT_WITH_AUTHOR: &str = "SELECT c.id, c.title, c.content, c.created_on, c.stock_id, c.app_user_id,
            u.username AS created_by
     FROM comments c
     JOIN users u ON u.id = c.app_user_id";

pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Comments of the given stocks, oldest first.
pub async fn fetch_for_stocks<'e, E>(executor: E, stock_ids: &[i32]) -> Result<Vec<Comment>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Comment>(&format!(
        "{SELECT_WITH_AUTHOR} WHERE c.stock_id = ANY($1) ORDER BY c.created_on ASC, c.id ASC"
    ))
    .bind(stock_ids)
    .fetch_all(executor)
    .await
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    async fn create(&self, comment: NewComment) -> Result<Comment, StoreError> {
        let result = sqlx::query_as::<_, Comment>(
            "WITH inserted AS (
                 INSERT INTO comments (title, content, stock_id, app_user_id)
                 VALUES ($1, $2, $3, $4)
                 RETURNING id, title, content, created_on, stock_id, app_user_id
             )
             SELECT i.id, i.title, i.content, i.created_on, i.stock_id, i.app_user_id,
                    u.username AS created_by
             FROM inserted i
             JOIN users u ON u.id = i.app_user_id",
        )
        .bind(comment.title)
        .bind(comment.content)
        .bind(comment.stock_id)
        .bind(comment.app_user_id)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(created) => Ok(created),
            Err(e) => match foreign_key_violation(&e) {
                Some(constraint) if constraint.contains("app_user_id") => {
                    Err(StoreError::MissingParent("user"))
                }
                Some(_) => Err(StoreError::MissingParent("stock")),
                None => Err(StoreError::Db(e)),
            },
        }
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<Comment>, StoreError> {
        let comment = sqlx::query_as::<_, Comment>(&format!("{SELECT_WITH_AUTHOR} WHERE c.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(comment)
    }

    async fn get_all(&self) -> Result<Vec<Comment>, StoreError> {
        let comments = sqlx::query_as::<_, Comment>(&format!("{SELECT_WITH_AUTHOR} ORDER BY c.id ASC"))
            .fetch_all(&self.pool)
            .await?;
        Ok(comments)
    }

    async fn update(&self, id: i32, changes: CommentChanges) -> Result<Option<Comment>, StoreError> {
        let comment = sqlx::query_as::<_, Comment>(
            "WITH updated AS (
                 UPDATE comments SET title = $1, content = $2
                 WHERE id = $3
                 RETURNING id, title, content, created_on, stock_id, app_user_id
             )
             SELECT d.id, d.title, d.content, d.created_on, d.stock_id, d.app_user_id,
                    u.username AS created_by
             FROM updated d
             JOIN users u ON u.id = d.app_user_id",
        )
        .bind(changes.title)
        .bind(changes.content)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(comment)
    }

    async fn delete(&self, id: i32) -> Result<Option<Comment>, StoreError> {
        let comment = sqlx::query_as::<_, Comment>(
            "WITH removed AS (
                 DELETE FROM comments WHERE id = $1
                 RETURNING id, title, content, created_on, stock_id, app_user_id
             )
             SELECT r.id, r.title, r.content, r.created_on, r.stock_id, r.app_user_id,
                    u.username AS created_by
             FROM removed r
             JOIN users u ON u.id = r.app_user_id",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(comment)
    }
}
