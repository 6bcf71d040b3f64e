//! Driver log and timer handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use core_kernel::{DriverLogId, UserId};
use domain_fieldlog::{DriverLog, LogEntryRequest, TimerState, TimerStop};

use crate::auth::{roles, Claims};
use crate::dto::logs::*;
use crate::{error::ApiError, AppState};

async fn load_owned(state: &AppState, claims: &Claims, id: Uuid) -> Result<DriverLog, ApiError> {
    let log = state.logs.get(DriverLogId::from(id)).await?;
    if !claims.can_access(log.driver_id) {
        return Err(ApiError::NotFound(format!("DriverLog not found: {}", log.id)));
    }
    Ok(log)
}

/// A driver's logs; `?day=YYYY-MM-DD` narrows to one calendar day
pub async fn list_logs(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<LogListParams>,
) -> Result<Json<Vec<DriverLog>>, ApiError> {
    let driver = match params.driver_id {
        Some(driver) if claims.is_admin() => UserId::from(driver),
        _ => claims.user_id(),
    };
    Ok(Json(state.logs.list_for_driver(driver, params.day).await?))
}

pub async fn create_log(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<LogEntryRequest>,
) -> Result<(StatusCode, Json<DriverLog>), ApiError> {
    claims.require(roles::DRIVER)?;
    let log = state.logs.record(claims.user_id(), request).await?;
    Ok((StatusCode::CREATED, Json(log)))
}

pub async fn get_log(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<DriverLog>, ApiError> {
    Ok(Json(load_owned(&state, &claims, id).await?))
}

pub async fn update_log(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(request): Json<LogEntryRequest>,
) -> Result<Json<DriverLog>, ApiError> {
    let log = load_owned(&state, &claims, id).await?;
    Ok(Json(state.logs.edit(log.id, request).await?))
}

/// Prices a log entry without recording it
pub async fn quote_log(
    State(state): State<AppState>,
    Json(request): Json<LogEntryRequest>,
) -> Result<Json<LogQuoteResponse>, ApiError> {
    let Some(action_id) = request.action_id else {
        return Err(ApiError::BadRequest("Missing required fields: action_id".to_string()));
    };
    let total_price = state.logs.quote(action_id, &request).await?;
    Ok(Json(LogQuoteResponse { total_price }))
}

pub async fn timer_status(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Json<TimerState> {
    Json(state.logs.timer_status(claims.user_id()).await)
}

/// Starts the caller's timer and returns the state it was in before
pub async fn start_timer(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<TimerState>, ApiError> {
    claims.require(roles::DRIVER)?;
    Ok(Json(state.logs.start_timer(claims.user_id()).await))
}

pub async fn stop_timer(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<TimerStop>, ApiError> {
    claims.require(roles::DRIVER)?;
    Ok(Json(state.logs.stop_timer(claims.user_id()).await))
}
