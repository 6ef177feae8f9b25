pub mod comment_queries;
pub mod stock_queries;
pub mod user_queries;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    AppUser, Comment, CommentChanges, NewComment, NewStock, NewUser, Role, Stock, StockChanges,
    StockQuery,
};

pub use comment_queries::PgCommentRepository;
pub use stock_queries::PgStockRepository;
pub use user_queries::PgUserRepository;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),

    /// An insert referenced a row that does not exist (foreign key violation).
    #[error("referenced {0} does not exist")]
    MissingParent(&'static str),

    /// An insert collided with a unique constraint.
    #[error("{0} already exists")]
    Duplicate(&'static str),
}

#[async_trait]
pub trait StockRepository: Send + Sync {
    async fn create(&self, stock: NewStock) -> Result<Stock, StoreError>;

    /// Fetches the stock together with its comments.
    async fn get_by_id(&self, id: i32) -> Result<Option<Stock>, StoreError>;

    /// Filters, sorts and paginates according to `query`. Each stock carries its comments.
    async fn get_all(&self, query: &StockQuery) -> Result<Vec<Stock>, StoreError>;

    async fn update(&self, id: i32, changes: StockChanges) -> Result<Option<Stock>, StoreError>;

    /// Removes the stock (its comments cascade) and returns what was removed.
    async fn delete(&self, id: i32) -> Result<Option<Stock>, StoreError>;

    async fn exists(&self, id: i32) -> Result<bool, StoreError>;

    async fn get_by_symbol(&self, symbol: &str) -> Result<Option<Stock>, StoreError>;
}

#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Callers check that the parent stock exists; a stock removed in the
    /// meantime surfaces as `StoreError::MissingParent`.
    async fn create(&self, comment: NewComment) -> Result<Comment, StoreError>;

    async fn get_by_id(&self, id: i32) -> Result<Option<Comment>, StoreError>;

    async fn get_all(&self) -> Result<Vec<Comment>, StoreError>;

    async fn update(&self, id: i32, changes: CommentChanges) -> Result<Option<Comment>, StoreError>;

    async fn delete(&self, id: i32) -> Result<Option<Comment>, StoreError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts the user and grants `role` in one transaction.
    async fn create(&self, user: NewUser, role: Role) -> Result<AppUser, StoreError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<AppUser>, StoreError>;

    async fn roles(&self, user_id: Uuid) -> Result<Vec<String>, StoreError>;
}

/// Name of the foreign key constraint behind a violation, if the error is one.
pub(crate) fn foreign_key_violation(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            Some(db.constraint().unwrap_or_default().to_string())
        }
        _ => None,
    }
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
