use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};

use crate::{
    dto::orders::{OrderConfirmation, OrderList, OrderWithItems, SubmitOrderRequest, UpdateOrderStatusRequest},
    error::{AppError, AppResult},
    models::OrderStatusInfo,
    response::{ApiResponse, Meta},
    routes::params::OrderListQuery,
    services::{cart_service, order_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_order).get(list_orders))
        .route("/{id}", get(get_order))
        .route("/{id}/status", get(order_status).put(update_order_status))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = SubmitOrderRequest,
    responses(
        (status = 200, description = "Order created", body = ApiResponse<OrderConfirmation>),
        (status = 404, description = "Address, item or spec not found"),
        (status = 409, description = "Missing cart line or insufficient stock"),
    ),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<SubmitOrderRequest>,
) -> AppResult<Json<ApiResponse<OrderConfirmation>>> {
    let cart_lines = cart_service::list_cart_lines(&state.pool, payload.user_id).await?;
    let confirmation = order_service::create_order(&state, &cart_lines, &payload).await?;

    // The order is committed; clear the consumed cart rows on its behalf.
    let removed = cart_service::remove_cart_lines(
        &state.pool,
        payload.user_id,
        &confirmation.removed_cart_lines,
    )
    .await?;
    tracing::debug!(order_id = %confirmation.order_id, removed, "cart lines cleared");

    Ok(Json(ApiResponse::success(
        "Order created",
        confirmation,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    params(
        ("user_id" = uuid::Uuid, Query, description = "Owner of the orders"),
        ("status" = Option<i16>, Query, description = "Status code filter"),
        ("page" = Option<i64>, Query, description = "Page number"),
        ("per_page" = Option<i64>, Query, description = "Page size"),
    ),
    responses((status = 200, description = "Orders", body = ApiResponse<OrderList>)),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let response = order_service::list_user_orders(&state, query.user_id, &query).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    responses(
        (status = 200, description = "Order with line items", body = ApiResponse<OrderWithItems>),
        (status = 404, description = "Order not found"),
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let data = order_service::get_order(&state, &id).await?;
    Ok(Json(ApiResponse::success("OK", data, Some(Meta::empty()))))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}/status",
    responses(
        (status = 200, description = "Order status", body = ApiResponse<OrderStatusInfo>),
        (status = 404, description = "Order not found"),
    ),
    tag = "Orders"
)]
pub async fn order_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<OrderStatusInfo>>> {
    let status = order_service::query_order_status_info(&state, &id)
        .await?
        .ok_or(AppError::OrderNotFound)?;
    Ok(Json(ApiResponse::success("OK", status, Some(Meta::empty()))))
}

#[utoipa::path(
    put,
    path = "/api/orders/{id}/status",
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Status updated"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order status changed concurrently"),
    ),
    tag = "Orders"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    order_service::update_order_status(&state, &id, payload.status).await?;
    Ok(Json(ApiResponse::success(
        "Status updated",
        serde_json::json!({}),
        Some(Meta::empty()),
    )))
}
