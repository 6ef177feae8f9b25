use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::comment::{Comment, CommentDto};
use super::validation::not_blank;

// A listed company tracked by the service, together with the comments posted about it.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Stock {
    pub id: i32,
    pub symbol: String,
    pub company_name: String,
    pub purchase: BigDecimal,
    pub last_div: BigDecimal,
    pub industry: String,
    pub market_cap: i64,
    #[sqlx(skip)]
    pub comments: Vec<Comment>,
}

/// Column values for a stock that has not been stored yet.
#[derive(Debug, Clone)]
pub struct NewStock {
    pub symbol: String,
    pub company_name: String,
    pub purchase: BigDecimal,
    pub last_div: BigDecimal,
    pub industry: String,
    pub market_cap: i64,
}

/// The columns an update overwrites. `last_div` and the comment
/// collection are left as stored.
#[derive(Debug, Clone)]
pub struct StockChanges {
    pub symbol: String,
    pub company_name: String,
    pub purchase: BigDecimal,
    pub industry: String,
    pub market_cap: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateStockRequest {
    #[validate(
        length(min = 1, max = 10, message = "Symbol cannot be over 10 characters"),
        custom(function = "not_blank")
    )]
    pub symbol: String,
    #[validate(
        length(min = 1, max = 100, message = "Company name cannot be over 100 characters"),
        custom(function = "not_blank")
    )]
    pub company_name: String,
    #[validate(range(min = 0.01, max = 1_000_000_000.0, message = "Purchase must be between 0.01 and 1000000000"))]
    pub purchase: f64,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 100.0, message = "Last dividend must be between 0 and 100"))]
    pub last_div: f64,
    #[serde(default)]
    #[validate(length(max = 50, message = "Industry cannot be over 50 characters"))]
    pub industry: String,
    #[validate(range(min = 0i64, max = 5_000_000_000_000i64, message = "Market cap must be between 0 and 5000000000000"))]
    pub market_cap: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStockRequest {
    #[validate(
        length(min = 1, max = 10, message = "Symbol cannot be over 10 characters"),
        custom(function = "not_blank")
    )]
    pub symbol: String,
    #[validate(
        length(min = 1, max = 100, message = "Company name cannot be over 100 characters"),
        custom(function = "not_blank")
    )]
    pub company_name: String,
    #[validate(range(min = 0.01, max = 1_000_000_000.0, message = "Purchase must be between 0.01 and 1000000000"))]
    pub purchase: f64,
    #[serde(default)]
    #[validate(length(max = 50, message = "Industry cannot be over 50 characters"))]
    pub industry: String,
    #[validate(range(min = 0i64, max = 5_000_000_000_000i64, message = "Market cap must be between 0 and 5000000000000"))]
    pub market_cap: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StockDto {
    pub id: i32,
    pub symbol: String,
    pub company_name: String,
    pub purchase: f64,
    pub last_div: f64,
    pub industry: String,
    pub market_cap: i64,
    pub comments: Vec<CommentDto>,
}

impl From<CreateStockRequest> for NewStock {
    fn from(req: CreateStockRequest) -> Self {
        Self {
            symbol: req.symbol.trim().to_string(),
            company_name: req.company_name.trim().to_string(),
            purchase: to_decimal(req.purchase),
            last_div: to_decimal(req.last_div),
            industry: req.industry.trim().to_string(),
            market_cap: req.market_cap,
        }
    }
}

impl From<UpdateStockRequest> for StockChanges {
    fn from(req: UpdateStockRequest) -> Self {
        Self {
            symbol: req.symbol.trim().to_string(),
            company_name: req.company_name.trim().to_string(),
            purchase: to_decimal(req.purchase),
            industry: req.industry.trim().to_string(),
            market_cap: req.market_cap,
        }
    }
}

impl From<Stock> for StockDto {
    fn from(s: Stock) -> Self {
        Self {
            id: s.id,
            symbol: s.symbol,
            company_name: s.company_name,
            purchase: to_number(&s.purchase),
            last_div: to_number(&s.last_div),
            industry: s.industry,
            market_cap: s.market_cap,
            comments: s.comments.into_iter().map(CommentDto::from).collect(),
        }
    }
}

impl Stock {
    pub fn from_new(id: i32, new: NewStock) -> Self {
        Self {
            id,
            symbol: new.symbol,
            company_name: new.company_name,
            purchase: new.purchase,
            last_div: new.last_div,
            industry: new.industry,
            market_cap: new.market_cap,
            comments: Vec::new(),
        }
    }

    /// Overwrites the mutable columns in place; id, last dividend and comments are kept.
    pub fn apply(&mut self, changes: StockChanges) {
        self.symbol = changes.symbol;
        self.company_name = changes.company_name;
        self.purchase = changes.purchase;
        self.industry = changes.industry;
        self.market_cap = changes.market_cap;
    }
}

// Payload values arrive as JSON numbers; store them with cent precision.
fn to_decimal(value: f64) -> BigDecimal {
    BigDecimal::from_str(&format!("{value:.2}")).unwrap_or_default()
}

fn to_number(value: &BigDecimal) -> f64 {
    value.to_string().parse().unwrap_or_default()
}
