use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::{
    errors::ApiError,
    handlers::common::{
        business_day, created_response, map_service_error, success_response, validate_input,
        DateRangeQuery,
    },
    models::{DiscountSpec, OrderLine},
    services::{discount, receipt, CommitOrderInput},
    AppState,
};

#[derive(Debug, Deserialize, Validate)]
pub struct CommitOrderRequest {
    #[validate(range(min = 1))]
    pub cashier_id: i32,
    pub date: Option<NaiveDate>,
    pub lines: Vec<OrderLine>,
    pub final_total: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
pub struct OrderLinesRequest {
    pub lines: Vec<OrderLine>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct DeleteOrderRequest {
    #[validate(length(min = 1, max = 255))]
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct DiscountPreviewRequest {
    pub subtotal: Decimal,
    #[serde(default)]
    pub percentage: Decimal,
    #[serde(default)]
    pub fixed_amount: Decimal,
}

#[derive(Debug, Serialize)]
pub struct ReceiptResponse {
    pub payload: receipt::ReceiptPayload,
    pub text: String,
}

async fn commit_order(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CommitOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let order = state
        .services
        .orders
        .commit(CommitOrderInput {
            cashier_id: payload.cashier_id,
            date: business_day(payload.date),
            lines: payload.lines,
            final_total: payload.final_total,
        })
        .await
        .map_err(map_service_error)?;
    Ok(created_response(order))
}

async fn list_orders(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DateRangeQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (start, end) = query.bounds()?;
    let orders = state
        .services
        .orders
        .orders_between(start, end)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(orders))
}

async fn get_order(
    State(state): State<Arc<AppState>>,
    Path(bill_number): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let details = state
        .services
        .orders
        .order_details(bill_number)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(details))
}

async fn get_receipt(
    State(state): State<Arc<AppState>>,
    Path(bill_number): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = state
        .services
        .orders
        .receipt(bill_number)
        .await
        .map_err(map_service_error)?;
    let text = receipt::render_text(&payload, &state.config.receipt);
    Ok(success_response(ReceiptResponse { payload, text }))
}

async fn merge_items(
    State(state): State<Arc<AppState>>,
    Path(bill_number): Path<i32>,
    Json(payload): Json<OrderLinesRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state
        .services
        .orders
        .merge_into(bill_number, &payload.lines)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(order))
}

async fn replace_items(
    State(state): State<Arc<AppState>>,
    Path(bill_number): Path<i32>,
    Json(payload): Json<OrderLinesRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state
        .services
        .orders
        .replace(Some(bill_number), &payload.lines)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(order))
}

async fn delete_order(
    State(state): State<Arc<AppState>>,
    Path(bill_number): Path<i32>,
    Json(payload): Json<DeleteOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let archived = state
        .services
        .orders
        .delete_order(bill_number, &payload.reason)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(archived))
}

async fn list_deleted_orders(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DateRangeQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (start, end) = query.bounds()?;
    let archived = state
        .services
        .orders
        .deleted_orders_between(start, end)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(archived))
}

async fn list_discounts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DateRangeQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (start, end) = query.bounds()?;
    let records = state
        .services
        .orders
        .discounted_orders_between(start, end)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(records))
}

async fn preview_discount(
    Json(payload): Json<DiscountPreviewRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let spec = DiscountSpec {
        percentage: payload.percentage,
        fixed_amount: payload.fixed_amount,
    };
    let outcome = discount::apply(payload.subtotal, &spec).map_err(map_service_error)?;
    Ok(success_response(outcome))
}

pub fn order_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/orders", post(commit_order).get(list_orders))
        .route("/orders/deleted", get(list_deleted_orders))
        .route("/orders/:id", get(get_order).delete(delete_order))
        .route("/orders/:id/receipt", get(get_receipt))
        .route("/orders/:id/items", post(merge_items).put(replace_items))
        .route("/discounts", get(list_discounts))
        .route("/discounts/preview", post(preview_discount))
}
