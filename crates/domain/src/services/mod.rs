//! Domain services for the Freight ERP platform core.
//!
//! Services are pure functions over domain models; callers load the models
//! and pass them in explicitly.

pub mod config_filter;
pub mod feature_flags;
pub mod health;

pub use config_filter::{filter_by_environment, filter_sensitive, resolve_config};
pub use feature_flags::{
    evaluate_all, evaluate_all_at, evaluate_flag, evaluate_flag_at, is_feature_enabled,
    is_feature_enabled_at,
};
pub use health::{aggregate_health_status, classify_latency};
