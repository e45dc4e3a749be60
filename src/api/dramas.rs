//! Drama collection API endpoints.
//!
//! Handlers only map HTTP/JSON onto the collection and the derive engine.
//! The collection sits behind one lock, so each request sees and changes it
//! atomically.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use std::sync::Arc;

use super::{
    ApiError, ApiResponse, AppState, ChoiceDto, DramaListDto, OptionsDto, RemoveResultDto,
};
use crate::api::validation::validate_drama_id;
use crate::domain::{Rating, WatchStatus};
use crate::models::{Drama, DramaForm, DramaFormInput};
use crate::services::validation::{YearRange, check_submission};
use crate::services::DramaError;
use crate::services::view::{
    FilterCriteria, RawCriteria, SummaryStats, derive_view, filter_options, rating_filter_label,
};

/// Lists dramas matching the query criteria.
///
/// # Endpoint
/// `GET /api/dramas?search=&status=&year=&rating=&country=&genre=`
///
/// Each parameter may be omitted, empty or `all` to leave it unset.
pub async fn list_dramas(
    State(state): State<Arc<AppState>>,
    Query(raw): Query<RawCriteria>,
) -> Result<Json<ApiResponse<DramaListDto>>, ApiError> {
    let criteria = FilterCriteria::from_raw(&raw).map_err(ApiError::InvalidForm)?;

    let dramas = state.dramas.read().await;
    let view = derive_view(dramas.records(), &criteria);
    let empty_state = view.empty_state();

    Ok(Json(ApiResponse::success(DramaListDto {
        count: view.dramas.len(),
        total: view.total,
        stats: view.stats,
        has_active_filters: criteria.has_active_filters(),
        empty_state,
        dramas: view.dramas,
    })))
}

pub async fn create_drama(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<DramaFormInput>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Drama>>), ApiError> {
    let Json(input) = payload?;
    let form = validate(&state, &input)?;
    let drama = state.dramas.write().await.insert(form);
    Ok((StatusCode::CREATED, Json(ApiResponse::success(drama))))
}

pub async fn get_drama(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Drama>>, ApiError> {
    let id = validate_drama_id(&id)?;
    let dramas = state.dramas.read().await;
    let drama = dramas.get(id).cloned().ok_or(DramaError::NotFound(id))?;
    Ok(Json(ApiResponse::success(drama)))
}

/// Replaces every field of an existing drama.
///
/// # Errors
/// Returns 404 when the drama does not exist (it may have been removed
/// since the form was opened) and 400 with field errors on invalid input.
pub async fn update_drama(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<DramaFormInput>, JsonRejection>,
) -> Result<Json<ApiResponse<Drama>>, ApiError> {
    let id = validate_drama_id(&id)?;
    let Json(input) = payload?;
    let form = validate(&state, &input)?;
    let drama = state.dramas.write().await.update(id, form)?;
    Ok(Json(ApiResponse::success(drama)))
}

/// Removing an unknown id succeeds with `removed: false`.
pub async fn remove_drama(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<RemoveResultDto>>, ApiError> {
    let id = validate_drama_id(&id)?;
    let removed = state.dramas.write().await.remove(id).is_some();
    Ok(Json(ApiResponse::success(RemoveResultDto { removed })))
}

pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<ApiResponse<SummaryStats>> {
    let dramas = state.dramas.read().await;
    Json(ApiResponse::success(SummaryStats::compute(dramas.records())))
}

pub async fn get_options(State(state): State<Arc<AppState>>) -> Json<ApiResponse<OptionsDto>> {
    let present = filter_options(state.dramas.read().await.records());
    let catalog = &state.config.catalog;
    let years = YearRange::from_catalog(catalog);

    let statuses = WatchStatus::ALL
        .into_iter()
        .map(|status| ChoiceDto {
            value: status,
            label: status.label().to_string(),
        })
        .collect();

    let ratings = (1..=Rating::MAX.value())
        .rev()
        .filter_map(Rating::new)
        .map(|rating| ChoiceDto {
            value: rating.value(),
            label: rating_filter_label(rating),
        })
        .collect();

    Json(ApiResponse::success(OptionsDto {
        present,
        statuses,
        ratings,
        catalog_countries: catalog.countries.clone(),
        catalog_genres: catalog.genres.clone(),
        min_year: years.min,
        max_year: years.max,
    }))
}

fn validate(state: &AppState, input: &DramaFormInput) -> Result<DramaForm, ApiError> {
    check_submission(input, YearRange::from_catalog(&state.config.catalog))
        .map_err(ApiError::InvalidForm)
}
