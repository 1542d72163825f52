use std::sync::Arc;

use axum::{
    extract::{Path, Query, RawQuery, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use shared_models::error::AppError;

use crate::models::{DoctorDetail, FilterState};
use crate::services::directory::DoctorDirectory;
use crate::services::filters::{self, DEFAULT_SUGGESTION_LIMIT};

pub const MAX_SUGGESTION_LIMIT: usize = 10;

#[derive(Debug, Deserialize)]
pub struct SuggestionQuery {
    pub q: Option<String>,
    pub limit: Option<usize>,
}

// ==============================================================================
// PUBLIC HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_doctors(
    State(directory): State<Arc<DoctorDirectory>>,
    RawQuery(query): RawQuery,
) -> Result<Json<Value>, AppError> {
    let filter_state = FilterState::from_query_string(query.as_deref().unwrap_or_default());
    debug!("Listing doctors with filters: {:?}", filter_state);

    let doctors = directory.doctors().await?;
    let results = filters::apply_filters(&doctors, &filter_state);

    info!("{} of {} doctors match", results.len(), doctors.len());

    Ok(Json(json!({
        "doctors": results,
        "total": results.len(),
        "filters": filter_state,
        "query": filter_state.to_query_string(),
        "has_active_filters": filter_state.has_active_filters(),
        "active_filters": filter_state.active_filter_labels(),
    })))
}

#[axum::debug_handler]
pub async fn list_specialties(
    State(directory): State<Arc<DoctorDirectory>>,
) -> Result<Json<Value>, AppError> {
    let doctors = directory.doctors().await?;
    let specialties = filters::extract_specialties(&doctors);

    Ok(Json(json!({
        "specialties": specialties,
        "total": specialties.len()
    })))
}

#[axum::debug_handler]
pub async fn suggest_doctors(
    State(directory): State<Arc<DoctorDirectory>>,
    Query(query): Query<SuggestionQuery>,
) -> Result<Json<Value>, AppError> {
    let limit = match query.limit {
        Some(0) => return Err(AppError::BadRequest("limit must be at least 1".to_string())),
        Some(limit) => limit.min(MAX_SUGGESTION_LIMIT),
        None => DEFAULT_SUGGESTION_LIMIT,
    };

    let doctors = directory.doctors().await?;
    let suggestions = filters::suggest(&doctors, query.q.as_deref().unwrap_or_default(), limit);

    Ok(Json(json!({
        "suggestions": suggestions,
        "total": suggestions.len()
    })))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(directory): State<Arc<DoctorDirectory>>,
    Path(doctor_id): Path<String>,
) -> Result<Json<DoctorDetail>, AppError> {
    let doctor = directory.get_doctor_by_id(&doctor_id).await?;
    Ok(Json(DoctorDetail::from(doctor)))
}
