//! Domain layer for the Freight ERP platform core.
//!
//! This crate contains:
//! - Domain models (ComponentStatus, FeatureFlag, ConfigRecord)
//! - Pure evaluation services (health aggregation, flag evaluation, config filtering)

pub mod models;
pub mod services;
