use chrono::{Duration, TimeZone, Utc};
use domain::models::{
    ComponentStatus, ConfigEnvironment, ConfigRecord, FeatureFlag, FeatureFlagContext,
    HealthStatus,
};
use domain::services::{
    aggregate_health_status, filter_by_environment, filter_sensitive, is_feature_enabled_at,
};
use proptest::prelude::*;
use serde_json::json;

// ── Strategies ─────────────────────────────────────────────────────────────

fn health_status() -> impl Strategy<Value = HealthStatus> {
    prop_oneof![
        Just(HealthStatus::Healthy),
        Just(HealthStatus::Degraded),
        Just(HealthStatus::Unhealthy),
    ]
}

fn components(statuses: Vec<HealthStatus>) -> Vec<ComponentStatus> {
    statuses
        .into_iter()
        .enumerate()
        .map(|(i, s)| ComponentStatus::new(format!("component-{i}"), s))
        .collect()
}

fn environment() -> impl Strategy<Value = ConfigEnvironment> {
    prop_oneof![
        Just(ConfigEnvironment::All),
        Just(ConfigEnvironment::Development),
        Just(ConfigEnvironment::Staging),
        Just(ConfigEnvironment::Production),
    ]
}

fn config_record() -> impl Strategy<Value = ConfigRecord> {
    (
        "[a-z]{1,8}\\.[a-z]{1,8}",
        "[A-Za-z0-9]{12,24}",
        environment(),
        any::<bool>(),
    )
        .prop_map(|(key, value, env, sensitive)| {
            let record = ConfigRecord::new(key, json!(format!("val_{value}")), env);
            if sensitive {
                record.sensitive()
            } else {
                record
            }
        })
}

fn feature_flag() -> impl Strategy<Value = FeatureFlag> {
    (
        "[a-z][a-z_]{0,15}",
        any::<bool>(),
        prop::collection::vec("u[0-9]{1,4}", 0..5),
        prop::collection::vec(prop_oneof![Just("owner"), Just("ops"), Just("finance")], 0..3),
        0i32..=100,
    )
        .prop_map(|(key, enabled, users, roles, pct)| {
            let mut flag = FeatureFlag::new(key.clone(), key);
            flag.is_enabled = enabled;
            flag.target_users = users;
            flag.target_roles = roles.into_iter().map(String::from).collect();
            flag.rollout_percentage = pct;
            flag
        })
}

fn context() -> impl Strategy<Value = FeatureFlagContext> {
    (
        prop::option::of("u[0-9]{1,4}"),
        prop::option::of(prop_oneof![Just("owner"), Just("ops"), Just("sales")]),
    )
        .prop_map(|(user_id, role)| FeatureFlagContext {
            user_id,
            user_role: role.map(String::from),
        })
}

// ── Health aggregation ─────────────────────────────────────────────────────

proptest! {
    #[test]
    fn any_unhealthy_component_makes_service_unhealthy(
        mut statuses in prop::collection::vec(health_status(), 0..20),
        position in any::<prop::sample::Index>()
    ) {
        let at = position.index(statuses.len() + 1);
        statuses.insert(at, HealthStatus::Unhealthy);
        prop_assert_eq!(aggregate_health_status(&components(statuses)), HealthStatus::Unhealthy);
    }

    #[test]
    fn degraded_without_unhealthy_is_degraded(
        mut statuses in prop::collection::vec(
            prop_oneof![Just(HealthStatus::Healthy), Just(HealthStatus::Degraded)],
            0..20
        ),
        position in any::<prop::sample::Index>()
    ) {
        let at = position.index(statuses.len() + 1);
        statuses.insert(at, HealthStatus::Degraded);
        prop_assert_eq!(aggregate_health_status(&components(statuses)), HealthStatus::Degraded);
    }

    #[test]
    fn all_healthy_is_healthy(count in 0usize..20) {
        let statuses = vec![HealthStatus::Healthy; count];
        prop_assert_eq!(aggregate_health_status(&components(statuses)), HealthStatus::Healthy);
    }
}

// ── Feature flag evaluation ────────────────────────────────────────────────

proptest! {
    #[test]
    fn disabled_flag_is_off_for_every_context(mut flag in feature_flag(), ctx in context()) {
        flag.is_enabled = false;
        prop_assert!(!is_feature_enabled_at(&flag, &ctx, Utc::now()));
    }

    #[test]
    fn future_enable_at_is_off(
        mut flag in feature_flag(),
        ctx in context(),
        hours_ahead in 1i64..10_000
    ) {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        flag.enable_at = Some(now + Duration::hours(hours_ahead));
        prop_assert!(!is_feature_enabled_at(&flag, &ctx, now));
    }

    #[test]
    fn targeted_user_is_on_at_zero_rollout(
        mut flag in feature_flag(),
        user_id in "u[0-9]{1,4}",
        role in prop::option::of("[a-z]{3,8}")
    ) {
        flag.is_enabled = true;
        flag.rollout_percentage = 0;
        flag.target_users.push(user_id.clone());
        let ctx = FeatureFlagContext { user_id: Some(user_id), user_role: role };
        prop_assert!(is_feature_enabled_at(&flag, &ctx, Utc::now()));
    }

    #[test]
    fn full_rollout_is_on_regardless_of_targeting(mut flag in feature_flag(), ctx in context()) {
        flag.is_enabled = true;
        flag.rollout_percentage = 100;
        prop_assert!(is_feature_enabled_at(&flag, &ctx, Utc::now()));
    }

    #[test]
    fn evaluation_is_deterministic_with_user_id(
        flag in feature_flag(),
        user_id in "[a-zA-Z0-9-]{1,36}",
        role in prop::option::of("[a-z]{3,8}")
    ) {
        let now = Utc::now();
        let ctx = FeatureFlagContext { user_id: Some(user_id), user_role: role };
        let first = is_feature_enabled_at(&flag, &ctx, now);
        for _ in 0..5 {
            prop_assert_eq!(is_feature_enabled_at(&flag, &ctx, now), first);
        }
    }
}

// ── Config filtering ───────────────────────────────────────────────────────

proptest! {
    #[test]
    fn production_filter_is_production_plus_all(
        records in prop::collection::vec(config_record(), 0..30)
    ) {
        let filtered = filter_by_environment(&records, ConfigEnvironment::Production);
        let expected: Vec<_> = records
            .iter()
            .filter(|r| matches!(r.environment, ConfigEnvironment::Production | ConfigEnvironment::All))
            .cloned()
            .collect();
        prop_assert_eq!(&filtered, &expected);
        prop_assert!(filtered.iter().all(|r| !matches!(
            r.environment,
            ConfigEnvironment::Development | ConfigEnvironment::Staging
        )));
    }

    #[test]
    fn non_sensitive_listing_never_leaks_values(
        records in prop::collection::vec(config_record(), 0..30)
    ) {
        let visible = filter_sensitive(&records, false);
        prop_assert!(visible.iter().all(|r| !r.is_sensitive));

        let body = serde_json::to_string(&visible).unwrap();
        for record in records.iter().filter(|r| r.is_sensitive) {
            let secret = record.config_value.as_str().unwrap();
            // A visible record may legitimately share the generated value.
            let shared = visible.iter().any(|v| v.config_value.as_str() == Some(secret));
            prop_assert!(shared || !body.contains(secret));
        }
    }

    #[test]
    fn include_sensitive_keeps_everything_in_order(
        records in prop::collection::vec(config_record(), 0..30)
    ) {
        prop_assert_eq!(filter_sensitive(&records, true), records);
    }
}
