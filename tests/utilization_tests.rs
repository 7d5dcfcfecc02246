use resourceflow::{STATUS_THRESHOLDS, UtilizationStatus, classify_utilization};

const EPS: f64 = 1e-9;

#[test]
fn percentage_is_hours_over_capacity() {
    for (capacity, hours) in [(40.0, 0.0), (40.0, 13.0), (37.5, 30.0), (20.0, 55.5), (8.0, 8.0)] {
        let result = classify_utilization(capacity, hours, true);
        assert!((result.percentage - hours / capacity * 100.0).abs() < EPS);
    }
}

#[test]
fn inactive_wins_regardless_of_hours() {
    for capacity in [0.0, 10.0, 40.0, 100.0] {
        assert_eq!(
            classify_utilization(capacity, 0.0, false).status,
            UtilizationStatus::Inactive
        );
        assert_eq!(
            classify_utilization(capacity, 80.0, false).status,
            UtilizationStatus::Inactive
        );
    }
}

#[test]
fn zero_hours_is_unassigned() {
    for capacity in [1.0, 20.0, 40.0, 168.0] {
        let result = classify_utilization(capacity, 0.0, true);
        assert_eq!(result.status, UtilizationStatus::Unassigned);
        assert_eq!(result.percentage, 0.0);
    }
}

#[test]
fn buckets_for_forty_hour_week() {
    let cases = [
        (20.0, UtilizationStatus::UnderUtilized),
        (30.0, UtilizationStatus::Optimal),
        (36.0, UtilizationStatus::NearCapacity),
        (40.0, UtilizationStatus::NearCapacity),
        (44.0, UtilizationStatus::OverCapacity),
        (48.0, UtilizationStatus::OverCapacity),
        (60.0, UtilizationStatus::Critical),
    ];
    for (hours, expected) in cases {
        assert_eq!(
            classify_utilization(40.0, hours, true).status,
            expected,
            "{hours}h of 40h"
        );
    }
}

#[test]
fn half_capacity_is_under_utilized() {
    let result = classify_utilization(40.0, 20.0, true);
    assert_eq!(result.percentage, 50.0);
    assert_eq!(result.status, UtilizationStatus::UnderUtilized);

    assert_eq!(
        classify_utilization(40.0, 20.04, true).status,
        UtilizationStatus::Optimal
    );
    assert_eq!(
        classify_utilization(40.0, 35.96, true).status,
        UtilizationStatus::Optimal
    );
}

#[test]
fn every_threshold_bound_lands_per_its_inclusive_flag() {
    for (idx, threshold) in STATUS_THRESHOLDS.iter().enumerate() {
        let at_bound = classify_utilization(100.0, threshold.max_percentage, true).status;
        let next = STATUS_THRESHOLDS
            .get(idx + 1)
            .map(|t| t.status)
            .unwrap_or(UtilizationStatus::Critical);
        if threshold.inclusive {
            assert_eq!(at_bound, threshold.status, "{}%", threshold.max_percentage);
        } else {
            assert_eq!(at_bound, next, "{}%", threshold.max_percentage);
        }
    }
}

#[test]
fn zero_capacity_reports_zero_percent() {
    let result = classify_utilization(0.0, 12.0, true);
    assert_eq!(result.percentage, 0.0);
    assert_eq!(result.status, UtilizationStatus::UnderUtilized);
}

#[test]
fn percentage_is_not_clamped() {
    let result = classify_utilization(10.0, 30.0, true);
    assert!((result.percentage - 300.0).abs() < EPS);
    assert_eq!(result.status, UtilizationStatus::Critical);
}

#[test]
fn style_follows_status() {
    let result = classify_utilization(40.0, 60.0, true);
    assert_eq!(result.style, UtilizationStatus::Critical.style());
    assert_eq!(result.style.label, "Critical");

    let json = serde_json::to_value(result).unwrap();
    assert_eq!(json["status"], "critical");
    assert_eq!(json["style"]["color_class"], "bg-red-600");
}
