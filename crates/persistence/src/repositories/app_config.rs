//! Repository for config record database operations.

use domain::models::{ConfigEnvironment, UpsertConfigRequest};
use sqlx::PgPool;

use crate::entities::{ConfigEnvironmentDb, ConfigRecordEntity};
use crate::metrics::QueryTimer;

const CONFIG_COLUMNS: &str = "id, config_key, config_value, environment, is_sensitive, \
     description, updated_by, created_at, updated_at";

/// Repository for config record operations.
///
/// Rows are returned unfiltered; environment and sensitivity filtering is
/// applied by `domain::services::config_filter` before anything leaves the API.
#[derive(Clone)]
pub struct ConfigRecordRepository {
    pool: PgPool,
}

impl ConfigRecordRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get all config records ordered by key, then environment.
    pub async fn list(&self) -> Result<Vec<ConfigRecordEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_config_records");
        let result = sqlx::query_as::<_, ConfigRecordEntity>(&format!(
            "SELECT {CONFIG_COLUMNS} FROM app_config ORDER BY config_key, environment"
        ))
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Get the record for `config_key` tagged exactly `environment`.
    pub async fn find(
        &self,
        config_key: &str,
        environment: ConfigEnvironment,
    ) -> Result<Option<ConfigRecordEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_config_record");
        let result = sqlx::query_as::<_, ConfigRecordEntity>(&format!(
            "SELECT {CONFIG_COLUMNS} FROM app_config WHERE config_key = $1 AND environment = $2"
        ))
        .bind(config_key)
        .bind(ConfigEnvironmentDb::from(environment))
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Insert or replace the record for `(config_key, request.environment)`.
    pub async fn upsert(
        &self,
        config_key: &str,
        request: &UpsertConfigRequest,
    ) -> Result<ConfigRecordEntity, sqlx::Error> {
        let timer = QueryTimer::new("upsert_config_record");
        let result = sqlx::query_as::<_, ConfigRecordEntity>(&format!(
            r#"
            INSERT INTO app_config (config_key, config_value, environment, is_sensitive,
                                    description, updated_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (config_key, environment) DO UPDATE
            SET config_value = $2, is_sensitive = $4,
                description = COALESCE($5, app_config.description),
                updated_by = $6, updated_at = NOW()
            RETURNING {CONFIG_COLUMNS}
            "#
        ))
        .bind(config_key)
        .bind(&request.config_value)
        .bind(ConfigEnvironmentDb::from(request.environment))
        .bind(request.is_sensitive)
        .bind(&request.description)
        .bind(&request.updated_by)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete the record for `(config_key, environment)`. Returns rows removed.
    pub async fn delete(
        &self,
        config_key: &str,
        environment: ConfigEnvironment,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_config_record");
        let result =
            sqlx::query("DELETE FROM app_config WHERE config_key = $1 AND environment = $2")
                .bind(config_key)
                .bind(ConfigEnvironmentDb::from(environment))
                .execute(&self.pool)
                .await;
        timer.record();
        Ok(result?.rows_affected())
    }
}
