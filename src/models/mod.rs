mod comment;
mod query;
mod stock;
mod user;
pub mod validation;

pub use comment::{Comment, CommentChanges, CommentDto, CreateCommentRequest, NewComment, UpdateCommentRequest};
pub use query::{contains_pattern, Page, SortField, StockQuery, StockQueryParams, StockSort, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use stock::{CreateStockRequest, NewStock, Stock, StockChanges, StockDto, UpdateStockRequest};
pub use user::{AppUser, LoginRequest, NewUser, NewUserDto, RegisterRequest, Role};
