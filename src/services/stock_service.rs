use tracing::info;
use validator::Validate;

use crate::db::StockRepository;
use crate::errors::AppError;
use crate::models::{CreateStockRequest, StockDto, StockQuery, StockQueryParams, UpdateStockRequest};

pub async fn list(repo: &dyn StockRepository, params: StockQueryParams) -> Result<Vec<StockDto>, AppError> {
    params.validate()?;
    let query = StockQuery::from(params);
    let stocks = repo.get_all(&query).await?;
    Ok(stocks.into_iter().map(StockDto::from).collect())
}

pub async fn fetch_one(repo: &dyn StockRepository, id: i32) -> Result<StockDto, AppError> {
    let stock = repo.get_by_id(id).await?.ok_or(AppError::NotFound)?;
    Ok(stock.into())
}

pub async fn fetch_by_symbol(repo: &dyn StockRepository, symbol: &str) -> Result<StockDto, AppError> {
    let stock = repo.get_by_symbol(symbol.trim()).await?.ok_or(AppError::NotFound)?;
    Ok(stock.into())
}

pub async fn create(repo: &dyn StockRepository, input: CreateStockRequest) -> Result<StockDto, AppError> {
    input.validate()?;
    let stock = repo.create(input.into()).await?;
    info!("Created stock {} ({})", stock.id, stock.symbol);
    Ok(stock.into())
}

pub async fn update(
    repo: &dyn StockRepository,
    id: i32,
    input: UpdateStockRequest,
) -> Result<StockDto, AppError> {
    input.validate()?;
    let stock = repo.update(id, input.into()).await?.ok_or(AppError::NotFound)?;
    Ok(stock.into())
}

/// Deleting is idempotent: `false` means there was nothing to remove.
pub async fn delete(repo: &dyn StockRepository, id: i32) -> Result<bool, AppError> {
    match repo.delete(id).await? {
        Some(stock) => {
            info!("Deleted stock {} with {} comment(s)", stock.id, stock.comments.len());
            Ok(true)
        }
        None => {
            info!("Stock {} was already absent", id);
            Ok(false)
        }
    }
}
