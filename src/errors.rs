use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

use crate::db::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Db(sqlx::Error),
    #[error("Invalid payload: {0}")]
    InvalidPayload(ValidationErrors),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Not found")]
    NotFound,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidPayload(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Db(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            AppError::NotFound => status.into_response(),
            AppError::InvalidPayload(errors) => (
                status,
                Json(json!({
                    "title": "One or more validation errors occurred.",
                    "status": status.as_u16(),
                    "errors": field_messages(&errors),
                })),
            )
                .into_response(),
            AppError::BadRequest(msg) => (status, msg).into_response(),
            AppError::Unauthorized => (status, "Unauthorized").into_response(),
            AppError::Db(_) | AppError::Internal(_) => {
                (status, "Internal server error").into_response()
            }
        }
    }
}

/// Flattens validator output into `{ "fieldName": ["message", ...] }`.
pub fn field_messages(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (camel_case(&field), messages)
        })
        .collect()
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for ch in field.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}

impl From<sqlx::Error> for AppError {
    fn from(value: sqlx::Error) -> Self {
        AppError::Db(value)
    }
}

impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Db(e) => AppError::Db(e),
            StoreError::MissingParent("stock") => AppError::BadRequest("Stock does not exist".into()),
            StoreError::MissingParent("user") => AppError::Unauthorized,
            StoreError::MissingParent(what) => AppError::BadRequest(format!("{what} does not exist")),
            StoreError::Duplicate(what) => AppError::BadRequest(format!("{what} is already taken")),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(value: ValidationErrors) -> Self {
        AppError::InvalidPayload(value)
    }
}
