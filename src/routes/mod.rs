pub(crate) mod account;
pub(crate) mod comments;
pub(crate) mod health;
pub(crate) mod stocks;
