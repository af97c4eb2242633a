use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use sea_orm::error::DbErr;
use serde::{Deserialize, Serialize};

/// Body returned for every failed HTTP request.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// HTTP status category (e.g., "Not Found", "Bad Request")
    pub error: String,
    /// Machine-readable error kind (e.g., "unknown_item")
    pub code: String,
    /// Human-readable reason
    pub message: String,
    /// ISO 8601 timestamp when the error occurred
    pub timestamp: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Invalid quantity {quantity} for item {item_id}: quantity must be greater than 0")]
    InvalidQuantity { item_id: i32, quantity: i64 },

    #[error("Discount cannot be negative")]
    NegativeDiscount,

    #[error("Apply either a percentage discount or a fixed amount discount, not both")]
    AmbiguousDiscountMode,

    #[error("Discount amount {amount} exceeds the bill total {subtotal}")]
    DiscountExceedsTotal { amount: Decimal, subtotal: Decimal },

    #[error("Item {0} not found in catalog")]
    UnknownItem(i32),

    #[error("No order reference supplied")]
    NoOrderReference,

    #[error("No items in the bill")]
    EmptyBillCommit,

    #[error("Order {0} not found")]
    OrderNotFound(i32),

    #[error("Held order {0} not found")]
    HeldOrderNotFound(i32),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] DbErr),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

impl ServiceError {
    /// True for commands rejected before any durable write began.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidQuantity { .. }
                | Self::NegativeDiscount
                | Self::AmbiguousDiscountMode
                | Self::DiscountExceedsTotal { .. }
                | Self::UnknownItem(_)
                | Self::NoOrderReference
                | Self::EmptyBillCommit
                | Self::OrderNotFound(_)
                | Self::HeldOrderNotFound(_)
                | Self::ValidationError(_)
        )
    }

    /// True for storage faults. The caller decides whether to retry the whole operation.
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::DatabaseError(_))
    }

    /// Stable machine-readable kind, used in HTTP error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidQuantity { .. } => "invalid_quantity",
            Self::NegativeDiscount => "negative_discount",
            Self::AmbiguousDiscountMode => "ambiguous_discount_mode",
            Self::DiscountExceedsTotal { .. } => "discount_exceeds_total",
            Self::UnknownItem(_) => "unknown_item",
            Self::NoOrderReference => "no_order_reference",
            Self::EmptyBillCommit => "empty_bill",
            Self::OrderNotFound(_) => "order_not_found",
            Self::HeldOrderNotFound(_) => "held_order_not_found",
            Self::ValidationError(_) => "validation_error",
            Self::DatabaseError(_) => "persistence_error",
        }
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidQuantity { .. }
            | Self::NegativeDiscount
            | Self::AmbiguousDiscountMode
            | Self::DiscountExceedsTotal { .. }
            | Self::NoOrderReference
            | Self::EmptyBillCommit
            | Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::UnknownItem(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::OrderNotFound(_) | Self::HeldOrderNotFound(_) => StatusCode::NOT_FOUND,
            Self::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error message suitable for HTTP responses.
    /// Storage faults get a generic message so driver details do not leak.
    pub fn response_message(&self) -> String {
        match self {
            Self::DatabaseError(_) => "Database error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let err = ErrorResponse {
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            code: self.code().to_string(),
            message: self.response_message(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, Json(err)).into_response()
    }
}

/// API Error type for HTTP responses
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Service error: {0}")]
    ServiceError(#[from] ServiceError),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::ServiceError(err) => err.into_response(),
            ApiError::ValidationError(msg) => {
                ServiceError::ValidationError(msg).into_response()
            }
        }
    }
}
