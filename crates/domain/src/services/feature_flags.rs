//! Feature flag evaluation.
//!
//! Rules are applied in order and the first match decides:
//! 1. Disabled flags are off.
//! 2. Outside the `enable_at`/`disable_at` window the flag is off.
//! 3. Users listed in `target_users` get the flag.
//! 4. Roles listed in `target_roles` get the flag.
//! 5. A rollout of 100% (or more) is on for everyone, 0% (or less) for nobody.
//! 6. Otherwise the user's rollout bucket must fall below the percentage.
//!    Callers without a user id never land in a partial rollout.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::models::{EvaluationReason, FeatureFlag, FeatureFlagContext, FlagEvaluation};
use shared::crypto::rollout_bucket;

/// Evaluate `flag` for `ctx` at time `now`, reporting which rule decided.
pub fn evaluate_flag_at(
    flag: &FeatureFlag,
    ctx: &FeatureFlagContext,
    now: DateTime<Utc>,
) -> FlagEvaluation {
    let (enabled, reason) = decide(flag, ctx, now);

    tracing::trace!(
        flag_key = %flag.flag_key,
        enabled = enabled,
        reason = %reason,
        "Feature flag evaluated"
    );

    FlagEvaluation {
        flag_key: flag.flag_key.clone(),
        enabled,
        reason,
    }
}

fn decide(
    flag: &FeatureFlag,
    ctx: &FeatureFlagContext,
    now: DateTime<Utc>,
) -> (bool, EvaluationReason) {
    if !flag.is_enabled {
        return (false, EvaluationReason::Disabled);
    }

    if flag.enable_at.is_some_and(|start| now < start) {
        return (false, EvaluationReason::NotYetActive);
    }
    if flag.disable_at.is_some_and(|end| now > end) {
        return (false, EvaluationReason::Expired);
    }

    let user_id = present(&ctx.user_id);

    if let Some(user_id) = user_id {
        if flag.target_users.iter().any(|u| u == user_id) {
            return (true, EvaluationReason::TargetUser);
        }
    }

    if let Some(role) = present(&ctx.user_role) {
        if flag.target_roles.iter().any(|r| r == role) {
            return (true, EvaluationReason::TargetRole);
        }
    }

    if flag.rollout_percentage >= 100 {
        return (true, EvaluationReason::FullRollout);
    }
    if flag.rollout_percentage <= 0 {
        return (false, EvaluationReason::ZeroRollout);
    }

    match user_id {
        Some(user_id) => {
            let bucket = i32::from(rollout_bucket(user_id, &flag.flag_key));
            (bucket < flag.rollout_percentage, EvaluationReason::RolloutBucket)
        }
        None => (false, EvaluationReason::NoUserForRollout),
    }
}

/// Blank values (e.g. `?user_id=`) count as absent.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Evaluate `flag` for `ctx` now.
pub fn evaluate_flag(flag: &FeatureFlag, ctx: &FeatureFlagContext) -> FlagEvaluation {
    evaluate_flag_at(flag, ctx, Utc::now())
}

/// Whether `flag` is on for `ctx` at time `now`.
pub fn is_feature_enabled_at(
    flag: &FeatureFlag,
    ctx: &FeatureFlagContext,
    now: DateTime<Utc>,
) -> bool {
    decide(flag, ctx, now).0
}

/// Whether `flag` is on for `ctx` now.
pub fn is_feature_enabled(flag: &FeatureFlag, ctx: &FeatureFlagContext) -> bool {
    is_feature_enabled_at(flag, ctx, Utc::now())
}

/// Evaluate every flag for one context, keyed by flag key.
pub fn evaluate_all_at(
    flags: &[FeatureFlag],
    ctx: &FeatureFlagContext,
    now: DateTime<Utc>,
) -> BTreeMap<String, bool> {
    flags
        .iter()
        .map(|flag| (flag.flag_key.clone(), is_feature_enabled_at(flag, ctx, now)))
        .collect()
}

/// Evaluate every flag for one context now.
pub fn evaluate_all(flags: &[FeatureFlag], ctx: &FeatureFlagContext) -> BTreeMap<String, bool> {
    evaluate_all_at(flags, ctx, Utc::now())
}
