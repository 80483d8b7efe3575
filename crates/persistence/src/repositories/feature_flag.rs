//! Repository for feature flag database operations.

use domain::models::{CreateFeatureFlagRequest, FeatureFlag};
use sqlx::PgPool;

use crate::entities::FeatureFlagEntity;
use crate::metrics::QueryTimer;

const FLAG_COLUMNS: &str = "id, flag_key, name, description, is_enabled, target_users, \
     target_roles, rollout_percentage, enable_at, disable_at, created_at, updated_at";

/// Repository for feature flag operations.
#[derive(Clone)]
pub struct FeatureFlagRepository {
    pool: PgPool,
}

impl FeatureFlagRepository {
    /// Creates a new feature flag repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get all feature flags ordered by key.
    pub async fn list(&self) -> Result<Vec<FeatureFlagEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_feature_flags");
        let result = sqlx::query_as::<_, FeatureFlagEntity>(&format!(
            "SELECT {FLAG_COLUMNS} FROM feature_flags ORDER BY flag_key"
        ))
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Get a feature flag by key.
    pub async fn find_by_key(
        &self,
        flag_key: &str,
    ) -> Result<Option<FeatureFlagEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_feature_flag_by_key");
        let result = sqlx::query_as::<_, FeatureFlagEntity>(&format!(
            "SELECT {FLAG_COLUMNS} FROM feature_flags WHERE flag_key = $1"
        ))
        .bind(flag_key)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Insert a new feature flag.
    ///
    /// Fails with a unique violation if the key already exists.
    pub async fn create(
        &self,
        request: &CreateFeatureFlagRequest,
    ) -> Result<FeatureFlagEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_feature_flag");
        let result = sqlx::query_as::<_, FeatureFlagEntity>(&format!(
            r#"
            INSERT INTO feature_flags (flag_key, name, description, is_enabled, target_users,
                                       target_roles, rollout_percentage, enable_at, disable_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {FLAG_COLUMNS}
            "#
        ))
        .bind(&request.flag_key)
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.is_enabled)
        .bind(&request.target_users)
        .bind(&request.target_roles)
        .bind(request.rollout_percentage)
        .bind(request.enable_at)
        .bind(request.disable_at)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Persist every mutable field of `flag`, matched by key.
    pub async fn update(&self, flag: &FeatureFlag) -> Result<FeatureFlagEntity, sqlx::Error> {
        let timer = QueryTimer::new("update_feature_flag");
        let result = sqlx::query_as::<_, FeatureFlagEntity>(&format!(
            r#"
            UPDATE feature_flags
            SET name = $2, description = $3, is_enabled = $4, target_users = $5,
                target_roles = $6, rollout_percentage = $7, enable_at = $8,
                disable_at = $9, updated_at = NOW()
            WHERE flag_key = $1
            RETURNING {FLAG_COLUMNS}
            "#
        ))
        .bind(&flag.flag_key)
        .bind(&flag.name)
        .bind(&flag.description)
        .bind(flag.is_enabled)
        .bind(&flag.target_users)
        .bind(&flag.target_roles)
        .bind(flag.rollout_percentage)
        .bind(flag.enable_at)
        .bind(flag.disable_at)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a feature flag. Returns the number of rows removed.
    pub async fn delete(&self, flag_key: &str) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_feature_flag");
        let result = sqlx::query("DELETE FROM feature_flags WHERE flag_key = $1")
            .bind(flag_key)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected())
    }
}
