//! Feature flag domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;
use shared::validation::KEY_REGEX;
use validator::{Validate, ValidationError};

/// Feature flag definition as stored and administered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FeatureFlag {
    pub id: Uuid,
    pub flag_key: String,
    pub name: String,
    pub description: Option<String>,
    pub is_enabled: bool,
    pub target_users: Vec<String>,
    pub target_roles: Vec<String>,
    /// Share of users (0-100) the flag is rolled out to.
    pub rollout_percentage: i32,
    pub enable_at: Option<DateTime<Utc>>,
    pub disable_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FeatureFlag {
    /// Create an enabled flag with no schedule, no targeting and 0% rollout.
    pub fn new(flag_key: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            flag_key: flag_key.into(),
            name: name.into(),
            description: None,
            is_enabled: true,
            target_users: Vec::new(),
            target_roles: Vec::new(),
            rollout_percentage: 0,
            enable_at: None,
            disable_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Who a flag is being evaluated for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FeatureFlagContext {
    pub user_id: Option<String>,
    pub user_role: Option<String>,
}

impl FeatureFlagContext {
    /// Context for an anonymous caller.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            user_role: None,
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.user_role = Some(role.into());
        self
    }
}

/// Which rule decided a flag evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationReason {
    Disabled,
    NotYetActive,
    Expired,
    TargetUser,
    TargetRole,
    FullRollout,
    ZeroRollout,
    RolloutBucket,
    NoUserForRollout,
}

impl std::fmt::Display for EvaluationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disabled => write!(f, "disabled"),
            Self::NotYetActive => write!(f, "not_yet_active"),
            Self::Expired => write!(f, "expired"),
            Self::TargetUser => write!(f, "target_user"),
            Self::TargetRole => write!(f, "target_role"),
            Self::FullRollout => write!(f, "full_rollout"),
            Self::ZeroRollout => write!(f, "zero_rollout"),
            Self::RolloutBucket => write!(f, "rollout_bucket"),
            Self::NoUserForRollout => write!(f, "no_user_for_rollout"),
        }
    }
}

/// Outcome of evaluating one flag for one context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FlagEvaluation {
    pub flag_key: String,
    pub enabled: bool,
    pub reason: EvaluationReason,
}

/// Response for bulk flag evaluation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EvaluateFlagsResponse {
    pub flags: BTreeMap<String, bool>,
}

/// Request to create a feature flag.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
#[validate(schema(function = "validate_create_schedule"))]
pub struct CreateFeatureFlagRequest {
    #[validate(length(min = 1, max = 100, message = "Flag key must be 1-100 characters"))]
    #[validate(regex(
        path = *KEY_REGEX,
        message = "Flag key must be lowercase alphanumeric and may contain '_', '.' or '-'"
    ))]
    pub flag_key: String,
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
    #[serde(default)]
    pub is_enabled: bool,
    #[validate(length(max = 1000, message = "At most 1000 target users"))]
    #[serde(default)]
    pub target_users: Vec<String>,
    #[validate(length(max = 50, message = "At most 50 target roles"))]
    #[serde(default)]
    pub target_roles: Vec<String>,
    #[validate(range(min = 0, max = 100, message = "Rollout percentage must be between 0 and 100"))]
    #[serde(default)]
    pub rollout_percentage: i32,
    pub enable_at: Option<DateTime<Utc>>,
    pub disable_at: Option<DateTime<Utc>>,
}

fn validate_create_schedule(request: &CreateFeatureFlagRequest) -> Result<(), ValidationError> {
    shared::validation::validate_schedule_window(request.enable_at, request.disable_at)
}

/// PATCH request to update a feature flag. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateFeatureFlagRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
    pub is_enabled: Option<bool>,
    #[validate(length(max = 1000, message = "At most 1000 target users"))]
    pub target_users: Option<Vec<String>>,
    #[validate(length(max = 50, message = "At most 50 target roles"))]
    pub target_roles: Option<Vec<String>>,
    #[validate(range(min = 0, max = 100, message = "Rollout percentage must be between 0 and 100"))]
    pub rollout_percentage: Option<i32>,
    pub enable_at: Option<DateTime<Utc>>,
    pub disable_at: Option<DateTime<Utc>>,
    /// Remove the existing enable_at (ignores enable_at if true)
    #[serde(default)]
    pub clear_enable_at: bool,
    /// Remove the existing disable_at (ignores disable_at if true)
    #[serde(default)]
    pub clear_disable_at: bool,
}

impl UpdateFeatureFlagRequest {
    /// Apply the update onto `flag`, returning the merged flag.
    ///
    /// The merged rollout and schedule window are re-validated; either end of
    /// the window may come from the stored flag.
    pub fn apply_to(&self, flag: &FeatureFlag) -> Result<FeatureFlag, ValidationError> {
        let mut merged = flag.clone();

        if let Some(name) = &self.name {
            merged.name = name.clone();
        }
        if let Some(description) = &self.description {
            merged.description = Some(description.clone());
        }
        if let Some(is_enabled) = self.is_enabled {
            merged.is_enabled = is_enabled;
        }
        if let Some(users) = &self.target_users {
            merged.target_users = users.clone();
        }
        if let Some(roles) = &self.target_roles {
            merged.target_roles = roles.clone();
        }
        if let Some(pct) = self.rollout_percentage {
            merged.rollout_percentage = pct;
        }

        merged.enable_at = if self.clear_enable_at {
            None
        } else {
            self.enable_at.or(flag.enable_at)
        };
        merged.disable_at = if self.clear_disable_at {
            None
        } else {
            self.disable_at.or(flag.disable_at)
        };

        shared::validation::validate_rollout_percentage(merged.rollout_percentage)?;
        shared::validation::validate_schedule_window(merged.enable_at, merged.disable_at)?;
        Ok(merged)
    }
}

/// Response for list feature flags.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FeatureFlagsResponse {
    pub flags: Vec<FeatureFlag>,
    pub total: i64,
}
