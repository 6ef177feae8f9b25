use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::db::{comment_queries, StockRepository, StoreError};
use crate::models::{contains_pattern, NewStock, Stock, StockChanges, StockQuery};

const STOCK_COLUMNS: &str = "id, symbol, company_name, purchase, last_div, industry, market_cap";

pub struct PgStockRepository {
    pool: PgPool,
}

impl PgStockRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Translates a `StockQuery` into one `SELECT`. Filters are case-insensitive
/// substring matches; `id` is always the last ordering key so pages are stable.
pub fn build_list_query(query: &StockQuery) -> QueryBuilder<'static, Postgres> {
    let mut builder: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("SELECT {STOCK_COLUMNS} FROM stocks WHERE TRUE"));

    if let Some(name) = &query.company_name {
        builder.push(" AND company_name ILIKE ");
        builder.push_bind(contains_pattern(name));
    }

    if let Some(symbol) = &query.symbol {
        builder.push(" AND symbol ILIKE ");
        builder.push_bind(contains_pattern(symbol));
    }

    match query.sort {
        Some(sort) => {
            let direction = if sort.descending { "DESC" } else { "ASC" };
            builder.push(format!(" ORDER BY {} {direction}, id ASC", sort.field.column()));
        }
        None => {
            builder.push(" ORDER BY id ASC");
        }
    }

    builder.push(" LIMIT ");
    builder.push_bind(query.page.limit());
    builder.push(" OFFSET ");
    builder.push_bind(query.page.offset());

    builder
}

async fn attach_comments(pool: &PgPool, stocks: &mut [Stock]) -> Result<(), sqlx::Error> {
    if stocks.is_empty() {
        return Ok(());
    }
    let ids: Vec<i32> = stocks.iter().map(|s| s.id).collect();
    let comments = comment_queries::fetch_for_stocks(pool, &ids).await?;

    for comment in comments {
        if let Some(stock) = stocks.iter_mut().find(|s| s.id == comment.stock_id) {
            stock.comments.push(comment);
        }
    }
    Ok(())
}

#[async_trait]
impl StockRepository for PgStockRepository {
    async fn create(&self, stock: NewStock) -> Result<Stock, StoreError> {
        let created = sqlx::query_as::<_, Stock>(&format!(
            "INSERT INTO stocks (symbol, company_name, purchase, last_div, industry, market_cap)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {STOCK_COLUMNS}"
        ))
        .bind(stock.symbol)
        .bind(stock.company_name)
        .bind(stock.purchase)
        .bind(stock.last_div)
        .bind(stock.industry)
        .bind(stock.market_cap)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<Stock>, StoreError> {
        let stock = sqlx::query_as::<_, Stock>(&format!(
            "SELECT {STOCK_COLUMNS} FROM stocks WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match stock {
            Some(mut stock) => {
                stock.comments = comment_queries::fetch_for_stocks(&self.pool, &[stock.id]).await?;
                Ok(Some(stock))
            }
            None => Ok(None),
        }
    }

    async fn get_all(&self, query: &StockQuery) -> Result<Vec<Stock>, StoreError> {
        let mut stocks = build_list_query(query)
            .build_query_as::<Stock>()
            .fetch_all(&self.pool)
            .await?;
        attach_comments(&self.pool, &mut stocks).await?;
        Ok(stocks)
    }

    async fn update(&self, id: i32, changes: StockChanges) -> Result<Option<Stock>, StoreError> {
        let stock = sqlx::query_as::<_, Stock>(&format!(
            "UPDATE stocks
             SET symbol = $1, industry = $2, purchase = $3, market_cap = $4, company_name = $5
             WHERE id = $6
             RETURNING {STOCK_COLUMNS}"
        ))
        .bind(changes.symbol)
        .bind(changes.industry)
        .bind(changes.purchase)
        .bind(changes.market_cap)
        .bind(changes.company_name)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match stock {
            Some(mut stock) => {
                stock.comments = comment_queries::fetch_for_stocks(&self.pool, &[stock.id]).await?;
                Ok(Some(stock))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: i32) -> Result<Option<Stock>, StoreError> {
        let mut tx = self.pool.begin().await?;

        let comments = comment_queries::fetch_for_stocks(&mut *tx, &[id]).await?;
        let removed = sqlx::query_as::<_, Stock>(&format!(
            "DELETE FROM stocks WHERE id = $1 RETURNING {STOCK_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(removed.map(|mut stock| {
            stock.comments = comments;
            stock
        }))
    }

    async fn exists(&self, id: i32) -> Result<bool, StoreError> {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM stocks WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn get_by_symbol(&self, symbol: &str) -> Result<Option<Stock>, StoreError> {
        let stock = sqlx::query_as::<_, Stock>(&format!(
            "SELECT {STOCK_COLUMNS} FROM stocks WHERE symbol = $1 ORDER BY id LIMIT 1"
        ))
        .bind(symbol)
        .fetch_optional(&self.pool)
        .await?;
        Ok(stock)
    }
}
