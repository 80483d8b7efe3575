//! Health aggregation.

use crate::models::{ComponentStatus, HealthStatus};

/// Reduce component statuses to one overall status.
///
/// Any `unhealthy` component makes the whole service unhealthy, otherwise any
/// `degraded` component degrades it. An empty list is healthy.
pub fn aggregate_health_status(components: &[ComponentStatus]) -> HealthStatus {
    components
        .iter()
        .map(|c| c.status)
        .max()
        .unwrap_or(HealthStatus::Healthy)
}

/// Status of a probe that succeeded in `response_time_ms`.
///
/// Probes slower than `degraded_threshold_ms` count as degraded.
pub fn classify_latency(response_time_ms: u64, degraded_threshold_ms: u64) -> HealthStatus {
    if response_time_ms > degraded_threshold_ms {
        HealthStatus::Degraded
    } else {
        HealthStatus::Healthy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(status: HealthStatus) -> ComponentStatus {
        ComponentStatus::new("component", status)
    }

    #[test]
    fn test_empty_is_healthy() {
        assert_eq!(aggregate_health_status(&[]), HealthStatus::Healthy);
    }

    #[test]
    fn test_all_healthy() {
        let components = vec![
            component(HealthStatus::Healthy),
            component(HealthStatus::Healthy),
        ];
        assert_eq!(aggregate_health_status(&components), HealthStatus::Healthy);
    }

    #[test]
    fn test_degraded_wins_over_healthy() {
        let components = vec![
            component(HealthStatus::Healthy),
            component(HealthStatus::Degraded),
            component(HealthStatus::Healthy),
        ];
        assert_eq!(aggregate_health_status(&components), HealthStatus::Degraded);
    }

    #[test]
    fn test_unhealthy_wins_over_everything() {
        let components = vec![
            component(HealthStatus::Degraded),
            component(HealthStatus::Unhealthy),
            component(HealthStatus::Healthy),
        ];
        assert_eq!(aggregate_health_status(&components), HealthStatus::Unhealthy);
    }

    #[test]
    fn test_classify_latency() {
        assert_eq!(classify_latency(10, 1000), HealthStatus::Healthy);
        assert_eq!(classify_latency(1000, 1000), HealthStatus::Healthy);
        assert_eq!(classify_latency(1001, 1000), HealthStatus::Degraded);
    }
}
