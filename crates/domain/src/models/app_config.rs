//! Application configuration records.
//!
//! Config records are key/value pairs scoped to a deployment environment.
//! Sensitive records hold credentials for integration connectors (accounting,
//! messaging, storage providers) and are never listed unless asked for.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Deployment tier a config record applies to. `All` is the wildcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigEnvironment {
    All,
    Development,
    Staging,
    Production,
}

impl ConfigEnvironment {
    /// Whether a record tagged with `self` applies in `target`.
    pub fn applies_to(&self, target: ConfigEnvironment) -> bool {
        *self == ConfigEnvironment::All || *self == target
    }
}

impl FromStr for ConfigEnvironment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(ConfigEnvironment::All),
            "development" | "dev" => Ok(ConfigEnvironment::Development),
            "staging" => Ok(ConfigEnvironment::Staging),
            "production" | "prod" => Ok(ConfigEnvironment::Production),
            _ => Err(format!("Unknown environment: {}", s)),
        }
    }
}

impl std::fmt::Display for ConfigEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigEnvironment::All => write!(f, "all"),
            ConfigEnvironment::Development => write!(f, "development"),
            ConfigEnvironment::Staging => write!(f, "staging"),
            ConfigEnvironment::Production => write!(f, "production"),
        }
    }
}

/// Config record domain model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ConfigRecord {
    pub id: Uuid,
    pub config_key: String,
    pub config_value: JsonValue,
    pub environment: ConfigEnvironment,
    pub is_sensitive: bool,
    pub description: Option<String>,
    pub updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConfigRecord {
    pub fn new(
        config_key: impl Into<String>,
        config_value: JsonValue,
        environment: ConfigEnvironment,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            config_key: config_key.into(),
            config_value,
            environment,
            is_sensitive: false,
            description: None,
            updated_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn sensitive(mut self) -> Self {
        self.is_sensitive = true;
        self
    }
}

/// Single-record view that hides sensitive values unless revealed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ConfigRecordResponse {
    pub id: Uuid,
    pub config_key: String,
    pub config_value: Option<JsonValue>,
    pub environment: ConfigEnvironment,
    pub is_sensitive: bool,
    /// True when `config_value` was withheld.
    pub redacted: bool,
    pub description: Option<String>,
    pub updated_by: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl ConfigRecordResponse {
    pub fn from_record(record: ConfigRecord, reveal: bool) -> Self {
        let redacted = record.is_sensitive && !reveal;
        Self {
            id: record.id,
            config_key: record.config_key,
            config_value: if redacted {
                None
            } else {
                Some(record.config_value)
            },
            environment: record.environment,
            is_sensitive: record.is_sensitive,
            redacted,
            description: record.description,
            updated_by: record.updated_by,
            updated_at: record.updated_at,
        }
    }
}

/// Response for list config records.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ConfigRecordsResponse {
    pub records: Vec<ConfigRecord>,
    pub total: usize,
}

/// Effective config for one environment.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ResolvedConfigResponse {
    pub environment: ConfigEnvironment,
    pub values: std::collections::BTreeMap<String, JsonValue>,
}

/// Query parameters for listing config records.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ListConfigQuery {
    #[serde(default, deserialize_with = "environment_alias")]
    pub environment: Option<ConfigEnvironment>,
    #[serde(default)]
    pub include_sensitive: bool,
}

/// Query parameters addressing a single config record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ConfigRecordQuery {
    #[serde(default, deserialize_with = "environment_alias")]
    pub environment: Option<ConfigEnvironment>,
    #[serde(default)]
    pub reveal: bool,
}

/// Query strings accept the same aliases as `FromStr` ("prod", "dev").
fn environment_alias<'de, D>(deserializer: D) -> Result<Option<ConfigEnvironment>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|s| ConfigEnvironment::from_str(&s).map_err(serde::de::Error::custom))
        .transpose()
}

/// PUT request to create or replace a config record.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpsertConfigRequest {
    pub config_value: JsonValue,
    #[serde(default = "default_environment")]
    pub environment: ConfigEnvironment,
    #[serde(default)]
    pub is_sensitive: bool,
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 100, message = "updated_by must be 1-100 characters"))]
    pub updated_by: Option<String>,
}

fn default_environment() -> ConfigEnvironment {
    ConfigEnvironment::All
}
