pub mod account_service;
pub mod comment_service;
pub mod stock_service;
