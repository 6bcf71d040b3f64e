//! Catalog handlers
//!
//! Reads are open to every authenticated user; writes need the admin role.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use core_kernel::{ActionId, ContactId, EquipmentId, JobId};
use domain_catalog::{Action, Contact, Equipment, Job};

use crate::auth::{roles, Claims};
use crate::dto::catalog::*;
use crate::{error::ApiError, AppState};

// ----------------------------------------------------------------------------
// Equipment
// ----------------------------------------------------------------------------

pub async fn list_equipment(State(state): State<AppState>) -> Result<Json<Vec<Equipment>>, ApiError> {
    Ok(Json(state.catalog.list_equipment().await?))
}

pub async fn get_equipment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Equipment>, ApiError> {
    Ok(Json(state.catalog.get_equipment(EquipmentId::from(id)).await?))
}

pub async fn create_equipment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<EquipmentRequest>,
) -> Result<(StatusCode, Json<Equipment>), ApiError> {
    claims.require(roles::ADMIN)?;
    request.validate()?;

    let mut equipment = request.into_equipment();
    equipment.validate()?;
    let uploads = equipment.assign_image_paths(Utc::now().timestamp_millis());
    debug!(pending_uploads = uploads.len(), "Assigned equipment image paths");

    let equipment = state.catalog.save_equipment(equipment).await?;
    info!(equipment_id = %equipment.id, "Equipment created");
    Ok((StatusCode::CREATED, Json(equipment)))
}

pub async fn update_equipment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(request): Json<EquipmentRequest>,
) -> Result<Json<Equipment>, ApiError> {
    claims.require(roles::ADMIN)?;
    request.validate()?;

    let existing = state.catalog.get_equipment(EquipmentId::from(id)).await?;
    let mut equipment = request.into_equipment();
    equipment.id = existing.id;
    equipment.created_at = existing.created_at;
    equipment.validate()?;
    equipment.assign_image_paths(Utc::now().timestamp_millis());

    Ok(Json(state.catalog.save_equipment(equipment).await?))
}

pub async fn delete_equipment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    claims.require(roles::ADMIN)?;
    state.catalog.delete_equipment(EquipmentId::from(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ----------------------------------------------------------------------------
// Jobs
// ----------------------------------------------------------------------------

/// Lists jobs; `?equipment_man=true` gives the jobs offered on new orders
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(params): Query<JobListParams>,
) -> Result<Json<Vec<Job>>, ApiError> {
    Ok(Json(state.catalog.list_jobs(params.into()).await?))
}

pub async fn get_job(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Job>, ApiError> {
    Ok(Json(state.catalog.get_job(JobId::from(id)).await?))
}

pub async fn create_job(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<JobRequest>,
) -> Result<(StatusCode, Json<Job>), ApiError> {
    claims.require(roles::ADMIN)?;
    request.validate()?;
    let job = request.into_job();
    job.validate()?;
    Ok((StatusCode::CREATED, Json(state.catalog.save_job(job).await?)))
}

pub async fn update_job(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(request): Json<JobRequest>,
) -> Result<Json<Job>, ApiError> {
    claims.require(roles::ADMIN)?;
    request.validate()?;
    let existing = state.catalog.get_job(JobId::from(id)).await?;
    let mut job = request.into_job();
    job.id = existing.id;
    job.created_at = existing.created_at;
    job.validate()?;
    Ok(Json(state.catalog.save_job(job).await?))
}

pub async fn delete_job(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    claims.require(roles::ADMIN)?;
    state.catalog.delete_job(JobId::from(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ----------------------------------------------------------------------------
// Actions
// ----------------------------------------------------------------------------

pub async fn list_actions(State(state): State<AppState>) -> Result<Json<Vec<Action>>, ApiError> {
    Ok(Json(state.catalog.list_actions().await?))
}

pub async fn get_action(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Action>, ApiError> {
    Ok(Json(state.catalog.get_action(ActionId::from(id)).await?))
}

pub async fn create_action(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<ActionRequest>,
) -> Result<(StatusCode, Json<Action>), ApiError> {
    claims.require(roles::ADMIN)?;
    request.validate()?;
    let action = request.into_action();
    action.validate()?;
    Ok((StatusCode::CREATED, Json(state.catalog.save_action(action).await?)))
}

pub async fn update_action(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(request): Json<ActionRequest>,
) -> Result<Json<Action>, ApiError> {
    claims.require(roles::ADMIN)?;
    request.validate()?;
    let existing = state.catalog.get_action(ActionId::from(id)).await?;
    let mut action = request.into_action();
    action.id = existing.id;
    action.created_at = existing.created_at;
    action.validate()?;
    Ok(Json(state.catalog.save_action(action).await?))
}

pub async fn delete_action(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    claims.require(roles::ADMIN)?;
    state.catalog.delete_action(ActionId::from(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ----------------------------------------------------------------------------
// Contacts
// ----------------------------------------------------------------------------

pub async fn list_contacts(State(state): State<AppState>) -> Result<Json<Vec<Contact>>, ApiError> {
    Ok(Json(state.catalog.list_contacts().await?))
}

pub async fn get_contact(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Contact>, ApiError> {
    Ok(Json(state.catalog.get_contact(ContactId::from(id)).await?))
}

/// Drivers may add contacts while logging work, so this is not admin-only
pub async fn create_contact(
    State(state): State<AppState>,
    Json(request): Json<ContactRequest>,
) -> Result<(StatusCode, Json<Contact>), ApiError> {
    let contact = request.into_contact();
    contact.check()?;
    Ok((StatusCode::CREATED, Json(state.catalog.save_contact(contact).await?)))
}

pub async fn update_contact(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ContactRequest>,
) -> Result<Json<Contact>, ApiError> {
    let existing = state.catalog.get_contact(ContactId::from(id)).await?;
    let mut contact = request.into_contact();
    contact.id = existing.id;
    contact.created_at = existing.created_at;
    contact.check()?;
    Ok(Json(state.catalog.save_contact(contact).await?))
}

pub async fn delete_contact(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    claims.require(roles::ADMIN)?;
    state.catalog.delete_contact(ContactId::from(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
