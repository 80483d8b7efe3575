//! Domain models for the Freight ERP platform core.

pub mod app_config;
pub mod feature_flag;
pub mod health;

pub use app_config::{
    ConfigEnvironment, ConfigRecord, ConfigRecordQuery, ConfigRecordResponse,
    ConfigRecordsResponse, ListConfigQuery, ResolvedConfigResponse, UpsertConfigRequest,
};
pub use feature_flag::{
    CreateFeatureFlagRequest, EvaluateFlagsResponse, EvaluationReason, FeatureFlag,
    FeatureFlagContext, FeatureFlagsResponse, FlagEvaluation, UpdateFeatureFlagRequest,
};
pub use health::{ComponentStatus, HealthCheckResponse, HealthStatus};
