//! Config record entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{ConfigEnvironment, ConfigRecord};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for config_environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "config_environment", rename_all = "lowercase")]
pub enum ConfigEnvironmentDb {
    All,
    Development,
    Staging,
    Production,
}

impl From<ConfigEnvironmentDb> for ConfigEnvironment {
    fn from(db: ConfigEnvironmentDb) -> Self {
        match db {
            ConfigEnvironmentDb::All => ConfigEnvironment::All,
            ConfigEnvironmentDb::Development => ConfigEnvironment::Development,
            ConfigEnvironmentDb::Staging => ConfigEnvironment::Staging,
            ConfigEnvironmentDb::Production => ConfigEnvironment::Production,
        }
    }
}

impl From<ConfigEnvironment> for ConfigEnvironmentDb {
    fn from(env: ConfigEnvironment) -> Self {
        match env {
            ConfigEnvironment::All => ConfigEnvironmentDb::All,
            ConfigEnvironment::Development => ConfigEnvironmentDb::Development,
            ConfigEnvironment::Staging => ConfigEnvironmentDb::Staging,
            ConfigEnvironment::Production => ConfigEnvironmentDb::Production,
        }
    }
}

/// Database row mapping for the app_config table.
#[derive(Debug, Clone, FromRow)]
pub struct ConfigRecordEntity {
    pub id: Uuid,
    pub config_key: String,
    pub config_value: serde_json::Value,
    pub environment: ConfigEnvironmentDb,
    pub is_sensitive: bool,
    pub description: Option<String>,
    pub updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ConfigRecordEntity> for ConfigRecord {
    fn from(entity: ConfigRecordEntity) -> Self {
        Self {
            id: entity.id,
            config_key: entity.config_key,
            config_value: entity.config_value,
            environment: entity.environment.into(),
            is_sensitive: entity.is_sensitive,
            description: entity.description,
            updated_by: entity.updated_by,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
