use chrono::NaiveDate;
use client_utilization::models::AccountingMode;
use client_utilization::status::{
    calculate_utilization, whole_months_between, PacingStatus, ProgressGeometry,
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn test_linear_pacing_scenario() {
    // Contract start 2023-01-01, annual quantity 1,200,000, as of 2023-07-01:
    // 6 whole months elapsed, expected 600,000.
    let result = calculate_utilization(
        650_000,
        1_200_000,
        Some(d(2023, 1, 1)),
        Some(d(2023, 7, 1)),
        AccountingMode::Annual,
        None,
    );
    assert_eq!(result.months_elapsed, 6);
    assert_eq!(result.expected_amount, 600_000.0);
    assert_eq!(result.status, PacingStatus::OverPace);

    // 550,000 is more than 2% under the expected 600,000, so Under Pace.
    let result = calculate_utilization(
        550_000,
        1_200_000,
        Some(d(2023, 1, 1)),
        Some(d(2023, 7, 1)),
        AccountingMode::Annual,
        None,
    );
    assert_eq!(result.status, PacingStatus::UnderPace);

    // Inside the 2% band (>= 588,000) reads On Target.
    let result = calculate_utilization(
        590_000,
        1_200_000,
        Some(d(2023, 1, 1)),
        Some(d(2023, 7, 1)),
        AccountingMode::Annual,
        None,
    );
    assert_eq!(result.status, PacingStatus::OnTarget);
}

#[test]
fn test_over_contract_dominates_pacing() {
    // current >= contracted is Currently Over no matter how early it is.
    for month in 1..=12u32 {
        let result = calculate_utilization(
            1_200_000,
            1_200_000,
            Some(d(2023, 1, 1)),
            Some(d(2023, month, 15)),
            AccountingMode::Annual,
            None,
        );
        assert_eq!(result.status, PacingStatus::CurrentlyOver);
        assert!(result.is_over_contract);
    }
}

#[test]
fn test_degenerate_inputs_return_neutral() {
    let cases = [
        calculate_utilization(100, 0, Some(d(2023, 1, 1)), Some(d(2023, 7, 1)), AccountingMode::Annual, None),
        calculate_utilization(100, -5, Some(d(2023, 1, 1)), Some(d(2023, 7, 1)), AccountingMode::Cumulative, None),
        calculate_utilization(100, 1000, None, Some(d(2023, 7, 1)), AccountingMode::Annual, None),
        calculate_utilization(100, 1000, Some(d(2023, 1, 1)), None, AccountingMode::Annual, None),
        // Zero-length contract term.
        calculate_utilization(
            100,
            1000,
            Some(d(2023, 1, 1)),
            Some(d(2023, 7, 1)),
            AccountingMode::Cumulative,
            Some(d(2023, 1, 1)),
        ),
    ];

    for result in cases {
        assert_eq!(result.status, PacingStatus::OnTarget);
        assert_eq!(result.expected_amount, 0.0);
        assert_eq!(result.months_elapsed, 0);
        assert!(!result.is_over_contract);
    }
}

#[test]
fn test_annual_months_monotonic_within_period() {
    let start = d(2023, 3, 10);
    let mut previous = -1;
    for offset in 0..365u64 {
        let as_of = d(2023, 3, 10) + chrono::Days::new(offset);
        let result = calculate_utilization(
            0,
            1_200_000,
            Some(start),
            Some(as_of),
            AccountingMode::Annual,
            None,
        );
        assert!(
            result.months_elapsed >= previous,
            "months decreased at {}",
            as_of
        );
        previous = result.months_elapsed;
    }
}

#[test]
fn test_annual_reset_at_anniversary() {
    let start = d(2022, 3, 10);

    // Last day of the first cycle.
    let before = calculate_utilization(
        0,
        1_200_000,
        Some(start),
        Some(d(2023, 3, 9)),
        AccountingMode::Annual,
        None,
    );
    assert_eq!(before.months_elapsed, 11);
    assert_eq!(before.period_start, Some(d(2022, 3, 10)));

    // Anniversary: a fresh cycle, 12 fewer months than the old anchor would give.
    let after = calculate_utilization(
        0,
        1_200_000,
        Some(start),
        Some(d(2023, 3, 10)),
        AccountingMode::Annual,
        None,
    );
    assert_eq!(after.months_elapsed, 0);
    assert_eq!(after.period_start, Some(d(2023, 3, 10)));
    assert_eq!(
        whole_months_between(d(2022, 3, 10), d(2023, 3, 10)) - after.months_elapsed,
        12
    );
}

#[test]
fn test_cumulative_full_accrual_at_contract_end() {
    let result = calculate_utilization(
        0,
        2_400_000,
        Some(d(2023, 1, 1)),
        Some(d(2025, 1, 1)),
        AccountingMode::Cumulative,
        Some(d(2025, 1, 1)),
    );
    assert_eq!(result.expected_amount, 2_400_000.0);
    assert_eq!(result.months_elapsed, 24);
}

#[test]
fn test_cumulative_usage_past_contract_end() {
    // Usage dated after the nominal end keeps accruing expectation.
    let result = calculate_utilization(
        0,
        2_400_000,
        Some(d(2023, 1, 1)),
        Some(d(2025, 4, 1)),
        AccountingMode::Cumulative,
        Some(d(2025, 1, 1)),
    );
    assert_eq!(result.months_elapsed, 27);
    assert!(result.expected_amount > 2_400_000.0);
}

#[test]
fn test_cumulative_end_defaults_to_one_year() {
    let result = calculate_utilization(
        0,
        1_200_000,
        Some(d(2023, 1, 1)),
        Some(d(2023, 7, 1)),
        AccountingMode::Cumulative,
        None,
    );
    assert_eq!(result.period_end, Some(d(2024, 1, 1)));
    assert_eq!(result.expected_amount, 600_000.0);
}

#[test]
fn test_as_of_before_contract_start() {
    let result = calculate_utilization(
        0,
        1_200_000,
        Some(d(2023, 6, 1)),
        Some(d(2023, 2, 1)),
        AccountingMode::Cumulative,
        Some(d(2024, 6, 1)),
    );
    assert_eq!(result.months_elapsed, 0);
    assert_eq!(result.expected_amount, 0.0);
    assert_eq!(result.status, PacingStatus::OnTarget);
}

#[test]
fn test_geometry_under_cap() {
    let geometry =
        ProgressGeometry::compute(600_000, 1_200_000, 0, AccountingMode::Annual);
    assert!(!geometry.is_overage);
    assert_eq!(geometry.percent_used, 50.0);
    assert_eq!(geometry.filled_width, 50.0);
    assert_eq!(geometry.cap_marker, 100.0);
    assert!(geometry.annual_breakpoints.is_empty());
}

#[test]
fn test_geometry_overage_rescales_bar() {
    let geometry =
        ProgressGeometry::compute(1_500_000, 1_200_000, 0, AccountingMode::Annual);
    assert!(geometry.is_overage);
    assert_eq!(geometry.percent_used, 125.0);
    assert_eq!(geometry.filled_width, 80.0);
    assert_eq!(geometry.cap_marker, 80.0);
}

#[test]
fn test_geometry_annual_breakpoints_in_cumulative() {
    // Term cap of 3 annual quantities: marks at 1/3 and 2/3.
    let geometry =
        ProgressGeometry::compute(0, 3_000_000, 1_000_000, AccountingMode::Cumulative);
    assert_eq!(geometry.annual_breakpoints.len(), 2);
    assert!((geometry.annual_breakpoints[0] - 100.0 / 3.0).abs() < 1e-9);
    assert!((geometry.annual_breakpoints[1] - 200.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_geometry_percent_label_caps_extremes() {
    let geometry = ProgressGeometry::compute(10_000, 1, 0, AccountingMode::Annual);
    assert_eq!(geometry.percent_label(), "999+");
}
