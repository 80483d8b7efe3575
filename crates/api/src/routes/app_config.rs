//! Runtime configuration endpoint handlers.
//!
//! Records are scoped to an environment (`all` is the wildcard). Sensitive
//! values never leave the service unless an admin explicitly asks for them.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use domain::models::{
    ConfigEnvironment, ConfigRecord, ConfigRecordQuery, ConfigRecordResponse,
    ConfigRecordsResponse, ListConfigQuery, ResolvedConfigResponse, UpsertConfigRequest,
};
use domain::services::{filter_by_environment, filter_sensitive, resolve_config};
use persistence::repositories::ConfigRecordRepository;
use shared::validation::validate_key;
use tracing::{info, warn};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::RequestId;

async fn load_records(repo: &ConfigRecordRepository) -> Result<Vec<ConfigRecord>, ApiError> {
    Ok(repo.list().await?.into_iter().map(Into::into).collect())
}

/// Effective non-sensitive config for the environment this server runs in.
///
/// GET /api/v1/config
pub async fn public_config(
    State(state): State<AppState>,
) -> Result<Json<ResolvedConfigResponse>, ApiError> {
    let repo = ConfigRecordRepository::new(state.pool.clone());
    let records = load_records(&repo).await?;
    let environment = state.config.app.environment;

    Ok(Json(ResolvedConfigResponse {
        environment,
        values: resolve_config(&records, environment),
    }))
}

/// List config records.
///
/// GET /api/v1/admin/config?environment=production&include_sensitive=false
///
/// With `environment`, only records tagged with it or `all` are returned.
/// Sensitive records are omitted unless `include_sensitive=true`.
pub async fn list_config(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(query): Query<ListConfigQuery>,
) -> Result<Json<ConfigRecordsResponse>, ApiError> {
    let repo = ConfigRecordRepository::new(state.pool.clone());
    let mut records = load_records(&repo).await?;

    if let Some(environment) = query.environment {
        records = filter_by_environment(&records, environment);
    }
    let records = filter_sensitive(&records, query.include_sensitive);

    if query.include_sensitive {
        warn!(
            request_id = %request_id.0,
            environment = ?query.environment,
            "Config listing includes sensitive records"
        );
    }

    let total = records.len();
    Ok(Json(ConfigRecordsResponse { records, total }))
}

/// Get one config record.
///
/// GET /api/v1/admin/config/:config_key?environment=staging&reveal=false
///
/// `environment` defaults to `all`. Sensitive values are redacted unless
/// `reveal=true`.
pub async fn get_config(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(config_key): Path<String>,
    Query(query): Query<ConfigRecordQuery>,
) -> Result<Json<ConfigRecordResponse>, ApiError> {
    let environment = query.environment.unwrap_or(ConfigEnvironment::All);
    let repo = ConfigRecordRepository::new(state.pool.clone());

    let record: ConfigRecord = repo
        .find(&config_key, environment)
        .await?
        .map(Into::into)
        .ok_or_else(|| not_found(&config_key, environment))?;

    if record.is_sensitive && query.reveal {
        warn!(
            request_id = %request_id.0,
            config_key = %config_key,
            environment = %environment,
            "Sensitive config value revealed"
        );
    }

    Ok(Json(ConfigRecordResponse::from_record(record, query.reveal)))
}

/// Create or replace a config record.
///
/// PUT /api/v1/admin/config/:config_key
///
/// The response never carries a sensitive value back.
pub async fn upsert_config(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(config_key): Path<String>,
    Json(request): Json<UpsertConfigRequest>,
) -> Result<Json<ConfigRecordResponse>, ApiError> {
    validate_key(&config_key)?;
    request.validate()?;

    let repo = ConfigRecordRepository::new(state.pool.clone());
    let record: ConfigRecord = repo.upsert(&config_key, &request).await?.into();

    info!(
        request_id = %request_id.0,
        config_key = %record.config_key,
        environment = %record.environment,
        is_sensitive = record.is_sensitive,
        "Config record saved"
    );

    Ok(Json(ConfigRecordResponse::from_record(record, false)))
}

/// Delete a config record.
///
/// DELETE /api/v1/admin/config/:config_key?environment=production
pub async fn delete_config(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(config_key): Path<String>,
    Query(query): Query<ConfigRecordQuery>,
) -> Result<StatusCode, ApiError> {
    let environment = query.environment.unwrap_or(ConfigEnvironment::All);
    let repo = ConfigRecordRepository::new(state.pool.clone());

    if repo.delete(&config_key, environment).await? == 0 {
        return Err(not_found(&config_key, environment));
    }

    info!(
        request_id = %request_id.0,
        config_key = %config_key,
        environment = %environment,
        "Config record deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}

fn not_found(config_key: &str, environment: ConfigEnvironment) -> ApiError {
    ApiError::NotFound(format!(
        "Config '{}' not found for environment '{}'",
        config_key, environment
    ))
}
