use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::TokenKeys;
use crate::db::{
    CommentRepository, PgCommentRepository, PgStockRepository, PgUserRepository, StockRepository,
    UserRepository,
};

#[derive(Clone)]
pub struct AppState {
    pub stocks: Arc<dyn StockRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub users: Arc<dyn UserRepository>,
    pub tokens: TokenKeys,
}

impl AppState {
    /// Wires the Postgres repositories onto one shared pool.
    pub fn from_pool(pool: PgPool, tokens: TokenKeys) -> Self {
        Self {
            stocks: Arc::new(PgStockRepository::new(pool.clone())),
            comments: Arc::new(PgCommentRepository::new(pool.clone())),
            users: Arc::new(PgUserRepository::new(pool)),
            tokens,
        }
    }
}
