//! Repository implementations for database operations.

pub mod app_config;
pub mod feature_flag;

pub use app_config::ConfigRecordRepository;
pub use feature_flag::FeatureFlagRepository;
