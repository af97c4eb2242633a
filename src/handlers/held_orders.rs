use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{delete, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::{
    errors::ApiError,
    handlers::common::{
        business_day, created_response, map_service_error, no_content_response,
        success_response, validate_input,
    },
    models::OrderLine,
    services::HoldBillInput,
    AppState,
};

#[derive(Debug, Deserialize, Validate)]
pub struct HoldBillRequest {
    #[validate(range(min = 1))]
    pub cashier_id: i32,
    pub date: Option<NaiveDate>,
    pub lines: Vec<OrderLine>,
}

async fn hold_bill(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<HoldBillRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let held = state
        .services
        .held_orders
        .hold(HoldBillInput {
            cashier_id: payload.cashier_id,
            date: business_day(payload.date),
            lines: payload.lines,
        })
        .await
        .map_err(map_service_error)?;
    Ok(created_response(held))
}

async fn list_held_orders(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let held = state
        .services
        .held_orders
        .list()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(held))
}

async fn resume_held_order(
    State(state): State<Arc<AppState>>,
    Path(held_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let lines = state
        .services
        .held_orders
        .resume(held_id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(lines))
}

async fn delete_held_order(
    State(state): State<Arc<AppState>>,
    Path(held_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .held_orders
        .delete(held_id)
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}

pub fn held_order_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/held-orders", post(hold_bill).get(list_held_orders))
        .route("/held-orders/:id/resume", post(resume_held_order))
        .route("/held-orders/:id", delete(delete_held_order))
}
