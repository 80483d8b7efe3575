//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod app_config;
pub mod feature_flag;

pub use app_config::{ConfigEnvironmentDb, ConfigRecordEntity};
pub use feature_flag::FeatureFlagEntity;
