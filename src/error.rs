use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::response::{ApiResponse, Meta};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Shipping address not found")]
    AddressNotFound,

    #[error("Item not found")]
    ItemNotFound,

    #[error("Item spec not found")]
    SpecNotFound,

    #[error("Order not found")]
    OrderNotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("Spec {0} is not in the cart")]
    CartLineMissing(Uuid),

    #[error("Insufficient stock for spec {0}")]
    InsufficientStock(Uuid),

    #[error("Order status changed concurrently")]
    StatusConflict,

    #[error("Invalid submission: {0}")]
    InvalidSubmission(String),

    #[error("Database error")]
    DbError(#[from] sqlx::Error),

    #[error("ORM error")]
    OrmError(#[from] sea_orm::DbErr),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorData {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::AddressNotFound
            | AppError::ItemNotFound
            | AppError::SpecNotFound
            | AppError::OrderNotFound
            | AppError::UserNotFound => StatusCode::NOT_FOUND,
            AppError::CartLineMissing(_)
            | AppError::InsufficientStock(_)
            | AppError::StatusConflict => StatusCode::CONFLICT,
            AppError::InvalidSubmission(_) => StatusCode::BAD_REQUEST,
            AppError::DbError(_) | AppError::OrmError(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // Internal faults stay generic; callers only ever see the typed reason.
        let body = ApiResponse {
            message: self.to_string(),
            data: Some(ErrorData {
                error: self.to_string(),
            }),
            meta: Some(Meta::empty()),
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
