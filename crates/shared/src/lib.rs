//! Shared utilities and common types for the Freight ERP platform core.
//!
//! This crate provides common functionality used across all other crates:
//! - Hashing utilities (API key digests, rollout bucketing)
//! - Common validation logic

pub mod crypto;
pub mod validation;
