//! Feature flag endpoint handlers.
//!
//! Evaluation endpoints are public; administration endpoints sit behind
//! `require_admin`.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use domain::models::{
    CreateFeatureFlagRequest, EvaluateFlagsResponse, FeatureFlag, FeatureFlagContext,
    FeatureFlagsResponse, UpdateFeatureFlagRequest,
};
use domain::services::{evaluate_all, evaluate_flag};
use persistence::repositories::FeatureFlagRepository;
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_flag_evaluation;
use crate::middleware::RequestId;

async fn load_flag(repo: &FeatureFlagRepository, flag_key: &str) -> Result<FeatureFlag, ApiError> {
    repo.find_by_key(flag_key)
        .await?
        .map(FeatureFlag::from)
        .ok_or_else(|| ApiError::NotFound(format!("Feature flag '{}' not found", flag_key)))
}

/// Evaluate every flag for the caller.
///
/// GET /api/v1/feature-flags/evaluate?user_id=...&user_role=...
pub async fn evaluate_flags(
    State(state): State<AppState>,
    Query(ctx): Query<FeatureFlagContext>,
) -> Result<Json<EvaluateFlagsResponse>, ApiError> {
    let repo = FeatureFlagRepository::new(state.pool.clone());
    let flags: Vec<FeatureFlag> = repo.list().await?.into_iter().map(Into::into).collect();

    let results = evaluate_all(&flags, &ctx);
    for (flag_key, enabled) in &results {
        record_flag_evaluation(flag_key, *enabled);
    }

    Ok(Json(EvaluateFlagsResponse { flags: results }))
}

/// Evaluate one flag for the caller, including the deciding rule.
///
/// GET /api/v1/feature-flags/:flag_key/evaluate?user_id=...&user_role=...
pub async fn evaluate_single_flag(
    State(state): State<AppState>,
    Path(flag_key): Path<String>,
    Query(ctx): Query<FeatureFlagContext>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = FeatureFlagRepository::new(state.pool.clone());
    let flag = load_flag(&repo, &flag_key).await?;

    let evaluation = evaluate_flag(&flag, &ctx);
    record_flag_evaluation(&evaluation.flag_key, evaluation.enabled);

    Ok(Json(evaluation))
}

/// List all feature flags.
///
/// GET /api/v1/admin/feature-flags
pub async fn list_flags(
    State(state): State<AppState>,
) -> Result<Json<FeatureFlagsResponse>, ApiError> {
    let repo = FeatureFlagRepository::new(state.pool.clone());
    let flags: Vec<FeatureFlag> = repo.list().await?.into_iter().map(Into::into).collect();
    let total = flags.len() as i64;

    Ok(Json(FeatureFlagsResponse { flags, total }))
}

/// Create a feature flag.
///
/// POST /api/v1/admin/feature-flags
pub async fn create_flag(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<CreateFeatureFlagRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let repo = FeatureFlagRepository::new(state.pool.clone());
    let flag: FeatureFlag = repo
        .create(&request)
        .await
        .map_err(|e| match ApiError::from(e) {
            ApiError::Conflict(_) => ApiError::Conflict(format!(
                "Feature flag '{}' already exists",
                request.flag_key
            )),
            other => other,
        })?
        .into();

    info!(
        request_id = %request_id.0,
        flag_key = %flag.flag_key,
        is_enabled = flag.is_enabled,
        rollout_percentage = flag.rollout_percentage,
        "Feature flag created"
    );

    Ok((StatusCode::CREATED, Json(flag)))
}

/// Get a feature flag by key.
///
/// GET /api/v1/admin/feature-flags/:flag_key
pub async fn get_flag(
    State(state): State<AppState>,
    Path(flag_key): Path<String>,
) -> Result<Json<FeatureFlag>, ApiError> {
    let repo = FeatureFlagRepository::new(state.pool.clone());
    Ok(Json(load_flag(&repo, &flag_key).await?))
}

/// Partially update a feature flag.
///
/// PATCH /api/v1/admin/feature-flags/:flag_key
pub async fn update_flag(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(flag_key): Path<String>,
    Json(request): Json<UpdateFeatureFlagRequest>,
) -> Result<Json<FeatureFlag>, ApiError> {
    request.validate()?;

    let repo = FeatureFlagRepository::new(state.pool.clone());
    let current = load_flag(&repo, &flag_key).await?;
    let merged = request.apply_to(&current)?;

    let updated: FeatureFlag = repo.update(&merged).await?.into();

    info!(
        request_id = %request_id.0,
        flag_key = %updated.flag_key,
        is_enabled = updated.is_enabled,
        rollout_percentage = updated.rollout_percentage,
        "Feature flag updated"
    );

    Ok(Json(updated))
}

/// Delete a feature flag.
///
/// DELETE /api/v1/admin/feature-flags/:flag_key
pub async fn delete_flag(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(flag_key): Path<String>,
) -> Result<StatusCode, ApiError> {
    let repo = FeatureFlagRepository::new(state.pool.clone());
    if repo.delete(&flag_key).await? == 0 {
        return Err(ApiError::NotFound(format!(
            "Feature flag '{}' not found",
            flag_key
        )));
    }

    info!(request_id = %request_id.0, flag_key = %flag_key, "Feature flag deleted");

    Ok(StatusCode::NO_CONTENT)
}
