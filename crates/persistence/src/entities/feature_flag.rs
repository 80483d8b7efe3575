//! Feature flag entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::FeatureFlag;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the feature_flags table.
#[derive(Debug, Clone, FromRow)]
pub struct FeatureFlagEntity {
    pub id: Uuid,
    pub flag_key: String,
    pub name: String,
    pub description: Option<String>,
    pub is_enabled: bool,
    pub target_users: Vec<String>,
    pub target_roles: Vec<String>,
    pub rollout_percentage: i32,
    pub enable_at: Option<DateTime<Utc>>,
    pub disable_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<FeatureFlagEntity> for FeatureFlag {
    fn from(entity: FeatureFlagEntity) -> Self {
        Self {
            id: entity.id,
            flag_key: entity.flag_key,
            name: entity.name,
            description: entity.description,
            is_enabled: entity.is_enabled,
            target_users: entity.target_users,
            target_roles: entity.target_roles,
            rollout_percentage: entity.rollout_percentage,
            enable_at: entity.enable_at,
            disable_at: entity.disable_at,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
