use crate::errors::{ApiError, ServiceError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Standard success response
pub fn success_response<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(data)).into_response()
}

/// Standard created response
pub fn created_response<T: Serialize>(data: T) -> Response {
    (StatusCode::CREATED, Json(data)).into_response()
}

/// Standard no content response
pub fn no_content_response() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

/// Validate request input
pub fn validate_input<T: Validate>(input: &T) -> Result<(), ApiError> {
    input
        .validate()
        .map_err(|e| ApiError::ValidationError(format!("Validation failed: {}", e)))
}

/// Map service errors to API errors
pub fn map_service_error(err: ServiceError) -> ApiError {
    ApiError::ServiceError(err)
}

/// Business day used when a request does not name one.
pub fn business_day(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| Local::now().date_naive())
}

/// Inclusive date range for listings; both ends default to today.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DateRangeQuery {
    pub date: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRangeQuery {
    pub fn bounds(&self) -> Result<(NaiveDate, NaiveDate), ApiError> {
        let start = business_day(self.date);
        let end = self.end.unwrap_or(start);
        if end < start {
            return Err(ApiError::ValidationError(
                "end must not be before date".to_string(),
            ));
        }
        Ok((start, end))
    }
}
