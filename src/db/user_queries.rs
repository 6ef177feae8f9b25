use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{is_unique_violation, StoreError, UserRepository};
use crate::models::{AppUser, NewUser, Role};

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: NewUser, role: Role) -> Result<AppUser, StoreError> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, AppUser>(
            "INSERT INTO users (id, username, email, password_hash)
             VALUES ($1, $2, $3, $4)
             RETURNING id, username, email, password_hash, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(user.username)
        .bind(user.email)
        .bind(user.password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::Duplicate("username")
            } else {
                StoreError::Db(e)
            }
        })?;

        sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2)")
            .bind(created.id)
            .bind(role.id())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(created)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<AppUser>, StoreError> {
        let user = sqlx::query_as::<_, AppUser>(
            "SELECT id, username, email, password_hash, created_at
             FROM users
             WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn roles(&self, user_id: Uuid) -> Result<Vec<String>, StoreError> {
        let roles = sqlx::query_scalar::<_, String>(
            "SELECT r.name
             FROM roles r
             JOIN user_roles ur ON ur.role_id = r.id
             WHERE ur.user_id = $1
             ORDER BY r.name",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(roles)
    }
}
