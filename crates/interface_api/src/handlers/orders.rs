//! Order handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use core_kernel::{OrderId, UserId};
use domain_catalog::Job;
use domain_rental::{Order, OrderDraft, OrderQuery, OrderQuote};

use crate::auth::Claims;
use crate::dto::orders::*;
use crate::{error::ApiError, AppState};

/// Loads an order the caller is allowed to see
///
/// Orders of other users are reported as missing rather than forbidden.
async fn load_owned(state: &AppState, claims: &Claims, id: Uuid) -> Result<Order, ApiError> {
    let order = state.orders.get(OrderId::from(id)).await?;
    if !claims.can_access(order.user_id) {
        return Err(ApiError::NotFound(format!("Order not found: {}", order.id)));
    }
    Ok(order)
}

pub async fn list_orders(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<OrderListParams>,
) -> Result<Json<Vec<Order>>, ApiError> {
    let user_id = match params.user_id {
        Some(user) if claims.is_admin() => Some(UserId::from(user)),
        None if claims.is_admin() => None,
        _ => Some(claims.user_id()),
    };
    let query = OrderQuery {
        user_id,
        status: params.status,
        start_from: params.start_from,
        start_to: params.start_to,
        limit: params.limit,
        offset: params.offset,
    };
    Ok(Json(state.orders.list(query).await?))
}

pub async fn create_order(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(draft): Json<OrderDraft>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let order = state.orders.create(claims.user_id(), draft).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn get_order(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<Order>, ApiError> {
    Ok(Json(load_owned(&state, &claims, id).await?))
}

/// Replaces an order's fields; the price is recomputed on write
pub async fn update_order(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(draft): Json<OrderDraft>,
) -> Result<Json<Order>, ApiError> {
    let order = load_owned(&state, &claims, id).await?;
    Ok(Json(state.orders.update(order.id, draft).await?))
}

pub async fn update_status(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(request): Json<StatusRequest>,
) -> Result<Json<Order>, ApiError> {
    let order = load_owned(&state, &claims, id).await?;
    Ok(Json(state.orders.set_status(order.id, request.status).await?))
}

pub async fn delete_order(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let order = load_owned(&state, &claims, id).await?;
    state.orders.delete(order.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Prices a prospective order without saving it
pub async fn quote_order(
    State(state): State<AppState>,
    Json(request): Json<OrderQuoteRequest>,
) -> Result<Json<OrderQuote>, ApiError> {
    let quote = state
        .orders
        .quote(
            request.equipment_id,
            request.job_id,
            request.pending_date,
            request.completed_date,
        )
        .await?;
    Ok(Json(quote))
}

/// Jobs that can be attached to an order
pub async fn orderable_jobs(State(state): State<AppState>) -> Result<Json<Vec<Job>>, ApiError> {
    Ok(Json(state.orders.orderable_jobs().await?))
}
