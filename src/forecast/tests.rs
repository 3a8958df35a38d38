#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::models::{MonthKey, Sale};

fn month(year: i32, m: u32) -> MonthKey {
    MonthKey::new(year, m).unwrap()
}

fn date(year: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, m, d).unwrap()
}

fn sale(year: i32, m: u32, d: u32, amount: Decimal) -> Sale {
    Sale::new(
        date(year, m, d).and_hms_opt(12, 0, 0).unwrap(),
        amount,
        "General".into(),
        "Default".into(),
    )
}

/// Consecutive months starting at January 2024.
fn series_from(totals: &[Decimal]) -> MonthlySeries {
    MonthlySeries::from_totals(
        totals
            .iter()
            .enumerate()
            .map(|(i, t)| (month(2024, 1).add_months(i as i32), *t)),
    )
    .unwrap()
}

fn amounts(points: &[ForecastPoint]) -> Vec<Decimal> {
    points.iter().map(|p| p.predicted_amount).collect()
}

// ── aggregate_monthly ─────────────────────────────────────────

#[test]
fn test_aggregate_sums_per_month() {
    let sales = vec![
        sale(2024, 2, 3, dec!(10.10)),
        sale(2024, 1, 31, dec!(5.00)),
        sale(2024, 2, 28, dec!(0.20)),
        sale(2024, 1, 1, dec!(2.50)),
    ];
    let series = aggregate_monthly(&sales).unwrap();
    let pairs: Vec<_> = series.iter().collect();
    assert_eq!(
        pairs,
        vec![(month(2024, 1), dec!(7.50)), (month(2024, 2), dec!(10.30))]
    );
}

#[test]
fn test_aggregate_sorted_across_years() {
    let sales = vec![
        sale(2025, 1, 5, dec!(1)),
        sale(2023, 12, 5, dec!(1)),
        sale(2024, 6, 5, dec!(1)),
        sale(2024, 1, 5, dec!(1)),
    ];
    let series = aggregate_monthly(&sales).unwrap();
    let keys: Vec<MonthKey> = series.iter().map(|(k, _)| k).collect();
    assert_eq!(
        keys,
        vec![month(2023, 12), month(2024, 1), month(2024, 6), month(2025, 1)]
    );
    assert!(keys.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_aggregate_does_not_fill_gaps() {
    let sales = vec![sale(2024, 1, 1, dec!(100)), sale(2024, 4, 1, dec!(200))];
    let series = aggregate_monthly(&sales).unwrap();
    assert_eq!(series.len(), 2);
    assert_eq!(series.get(&month(2024, 2)), None);
}

#[test]
fn test_aggregate_keeps_exact_decimals() {
    let sales = vec![
        sale(2024, 1, 1, dec!(0.10)),
        sale(2024, 1, 2, dec!(0.20)),
        sale(2024, 1, 3, dec!(0.30)),
    ];
    let series = aggregate_monthly(&sales).unwrap();
    assert_eq!(series.get(&month(2024, 1)), Some(dec!(0.60)));
}

#[test]
fn test_aggregate_rejects_fewer_than_two_sales() {
    assert_eq!(
        aggregate_monthly(&[]).unwrap_err(),
        ForecastError::InsufficientData {
            unit: "transactions",
            found: 0
        }
    );
    let one = vec![sale(2024, 1, 1, dec!(100))];
    assert!(matches!(
        aggregate_monthly(&one),
        Err(ForecastError::InsufficientData { found: 1, .. })
    ));
}

#[test]
fn test_aggregate_overflow_is_an_error() {
    let half = Decimal::MAX / dec!(2) + Decimal::ONE;
    let sales = vec![sale(2024, 1, 1, half), sale(2024, 1, 2, half)];
    assert_eq!(aggregate_monthly(&sales).unwrap_err(), ForecastError::Overflow);
}

#[test]
fn test_aggregate_is_idempotent() {
    let sales = vec![
        sale(2024, 3, 9, dec!(42.42)),
        sale(2024, 1, 2, dec!(7)),
        sale(2024, 3, 1, dec!(0.58)),
    ];
    assert_eq!(
        aggregate_monthly(&sales).unwrap(),
        aggregate_monthly(&sales).unwrap()
    );
}

// ── generate_forecast: shared contract ────────────────────────

#[test]
fn test_every_method_returns_horizon_points() {
    let series = series_from(&[dec!(100), dec!(200), dec!(300)]);
    for method in ForecastMethod::all() {
        for horizon in [1, 7, 24] {
            let points = generate_forecast(&series, horizon, *method).unwrap();
            assert_eq!(points.len(), horizon as usize, "{method} h={horizon}");
            assert!(points.iter().all(|p| p.model_name == method.model_name()));
            assert!(points.iter().all(|p| p.predicted_amount >= Decimal::ZERO));
        }
    }
}

#[test]
fn test_dates_continue_after_last_month() {
    let series = MonthlySeries::from_totals([
        (month(2024, 10), dec!(50)),
        (month(2024, 11), dec!(60)),
    ])
    .unwrap();
    let points = generate_forecast(&series, 3, ForecastMethod::MovingAverage).unwrap();
    let dates: Vec<NaiveDate> = points.iter().map(|p| p.forecast_date).collect();
    assert_eq!(
        dates,
        vec![date(2024, 12, 1), date(2025, 1, 1), date(2025, 2, 1)]
    );
}

#[test]
fn test_gapped_series_dates_follow_last_observed_month() {
    let sales = vec![
        sale(2024, 1, 5, dec!(100)),
        sale(2024, 2, 5, dec!(200)),
        sale(2024, 4, 5, dec!(300)),
    ];
    let series = aggregate_monthly(&sales).unwrap();
    for method in ForecastMethod::all() {
        let points = generate_forecast(&series, 2, *method).unwrap();
        assert_eq!(points[0].forecast_date, date(2024, 5, 1), "{method}");
        assert_eq!(points[1].forecast_date, date(2024, 6, 1), "{method}");
    }
}

#[test]
fn test_horizon_out_of_range() {
    let series = series_from(&[dec!(100), dec!(200)]);
    assert_eq!(
        generate_forecast(&series, 0, ForecastMethod::Regression).unwrap_err(),
        ForecastError::InvalidHorizon(0)
    );
    assert_eq!(
        generate_forecast(&series, 25, ForecastMethod::Regression).unwrap_err(),
        ForecastError::InvalidHorizon(25)
    );
}

#[test]
fn test_single_month_rejected_for_every_method() {
    let series = series_from(&[dec!(500)]);
    for method in ForecastMethod::all() {
        assert_eq!(
            generate_forecast(&series, 3, *method).unwrap_err(),
            ForecastError::InsufficientData {
                unit: "months",
                found: 1
            }
        );
    }
}

#[test]
fn test_empty_series_rejected() {
    let series = MonthlySeries::default();
    assert!(matches!(
        generate_forecast(&series, 1, ForecastMethod::SeasonalNaive),
        Err(ForecastError::InsufficientData { found: 0, .. })
    ));
}

#[test]
fn test_two_sales_in_one_month_cannot_be_projected() {
    let sales = vec![sale(2024, 5, 1, dec!(10)), sale(2024, 5, 20, dec!(15))];
    let series = aggregate_monthly(&sales).unwrap();
    assert!(generate_forecast(&series, 1, ForecastMethod::Regression).is_err());
}

// ── regression ────────────────────────────────────────────────

#[test]
fn test_regression_linear_series() {
    let series = series_from(&[dec!(100), dec!(200), dec!(300)]);
    let points = generate_forecast(&series, 1, ForecastMethod::Regression).unwrap();
    assert_eq!(points[0].predicted_amount, dec!(400.00));
    assert_eq!(points[0].forecast_date, date(2024, 4, 1));
    assert_eq!(points[0].model_name, "Linear Regression");
}

#[test]
fn test_regression_fit_coefficients() {
    let fit = LinearFit::fit(&[dec!(100), dec!(200), dec!(300)]).unwrap();
    assert_eq!(fit.slope, dec!(100));
    assert_eq!(fit.intercept, dec!(100));
    assert_eq!(fit.predict(3).unwrap(), dec!(400));
}

#[test]
fn test_regression_noisy_series() {
    // slope 50, intercept 150
    let series = series_from(&[dec!(100), dec!(300), dec!(200)]);
    let points = generate_forecast(&series, 2, ForecastMethod::Regression).unwrap();
    assert_eq!(amounts(&points), vec![dec!(300.00), dec!(350.00)]);
}

#[test]
fn test_regression_rounds_to_cents() {
    // slope 0.5, intercept 99.8333..
    let series = series_from(&[dec!(100), dec!(100), dec!(101)]);
    let points = generate_forecast(&series, 1, ForecastMethod::Regression).unwrap();
    assert_eq!(points[0].predicted_amount, dec!(101.33));
}

#[test]
fn test_regression_clamps_negative_trend() {
    let series = series_from(&[dec!(300), dec!(200), dec!(100)]);
    let points = generate_forecast(&series, 3, ForecastMethod::Regression).unwrap();
    assert_eq!(amounts(&points), vec![dec!(0), dec!(0), dec!(0)]);
}

#[test]
fn test_regression_fit_rejects_single_point() {
    assert!(matches!(
        LinearFit::fit(&[dec!(250)]),
        Err(ForecastError::DegenerateInput(_))
    ));
    assert!(matches!(
        LinearFit::fit(&[]),
        Err(ForecastError::DegenerateInput(_))
    ));
}

#[test]
fn test_regression_indexes_observed_months_only() {
    // Jan, Feb, Apr sit at x = 0, 1, 2; March is not filled with zero
    let sales = vec![
        sale(2024, 1, 5, dec!(100)),
        sale(2024, 2, 5, dec!(200)),
        sale(2024, 4, 5, dec!(300)),
    ];
    let series = aggregate_monthly(&sales).unwrap();
    assert_eq!(series.values(), vec![dec!(100), dec!(200), dec!(300)]);
    let points = generate_forecast(&series, 1, ForecastMethod::Regression).unwrap();
    assert_eq!(points[0].predicted_amount, dec!(400.00));
    assert_eq!(points[0].forecast_date, date(2024, 5, 1));
}

#[test]
fn test_regression_overflow_is_an_error() {
    let huge = Decimal::from_i128_with_scale(10_i128.pow(27), 0);
    let series = series_from(&[huge; 12]);
    assert_eq!(
        generate_forecast(&series, 1, ForecastMethod::Regression).unwrap_err(),
        ForecastError::Overflow
    );
}

// ── moving average ────────────────────────────────────────────

#[test]
fn test_moving_average_two_steps() {
    let series = series_from(&[dec!(100), dec!(200), dec!(300)]);
    let points = generate_forecast(&series, 2, ForecastMethod::MovingAverage).unwrap();
    assert_eq!(amounts(&points), vec![dec!(200.00), dec!(233.33)]);
    assert_eq!(points[0].forecast_date, date(2024, 4, 1));
    assert_eq!(points[1].forecast_date, date(2024, 5, 1));
}

#[test]
fn test_moving_average_feeds_back_unrounded_predictions() {
    let series = series_from(&[dec!(100), dec!(200), dec!(300)]);
    let points = generate_forecast(&series, 4, ForecastMethod::MovingAverage).unwrap();
    assert_eq!(
        amounts(&points),
        vec![dec!(200.00), dec!(233.33), dec!(244.44), dec!(225.93)]
    );
}

#[test]
fn test_moving_average_short_history_uses_all_months() {
    let series = series_from(&[dec!(100), dec!(201)]);
    let points = generate_forecast(&series, 1, ForecastMethod::MovingAverage).unwrap();
    assert_eq!(points[0].predicted_amount, dec!(150.50));
}

#[test]
fn test_moving_average_window_is_three() {
    let series = series_from(&[dec!(1000), dec!(10), dec!(20), dec!(30)]);
    let points = generate_forecast(&series, 1, ForecastMethod::MovingAverage).unwrap();
    assert_eq!(points[0].predicted_amount, dec!(20.00));
}

// ── seasonal naive ────────────────────────────────────────────

#[test]
fn test_seasonal_naive_uses_same_month_last_year() {
    let series = MonthlySeries::from_totals([
        (month(2023, 6), dec!(500)),
        (month(2024, 5), dec!(900)),
    ])
    .unwrap();
    let points = generate_forecast(&series, 1, ForecastMethod::SeasonalNaive).unwrap();
    assert_eq!(points[0].predicted_amount, dec!(500.00));
    assert_eq!(points[0].forecast_date, date(2024, 6, 1));
    assert_eq!(points[0].model_name, "Seasonal Naive");
}

#[test]
fn test_seasonal_naive_falls_back_to_latest_month() {
    let series = MonthlySeries::from_totals([
        (month(2023, 6), dec!(500)),
        (month(2024, 5), dec!(900)),
    ])
    .unwrap();
    let points = generate_forecast(&series, 2, ForecastMethod::SeasonalNaive).unwrap();
    // 2024-07 has no 2023-07 counterpart
    assert_eq!(amounts(&points), vec![dec!(500.00), dec!(900.00)]);
}

#[test]
fn test_seasonal_naive_recorded_zero_is_not_a_gap() {
    let series = MonthlySeries::from_totals([
        (month(2023, 6), Decimal::ZERO),
        (month(2024, 5), dec!(900)),
    ])
    .unwrap();
    let points = generate_forecast(&series, 1, ForecastMethod::SeasonalNaive).unwrap();
    assert_eq!(points[0].predicted_amount, Decimal::ZERO);
}

#[test]
fn test_seasonal_naive_full_year_repeats_pattern() {
    let totals: Vec<Decimal> = (1..=12).map(|m| Decimal::from(m * 10)).collect();
    let series = series_from(&totals);
    let points = generate_forecast(&series, 12, ForecastMethod::SeasonalNaive).unwrap();
    assert_eq!(amounts(&points), totals);
    assert_eq!(points[0].forecast_date, date(2025, 1, 1));
}

// ── method parsing ────────────────────────────────────────────

#[test]
fn test_method_from_str() {
    assert_eq!(
        "moving_average".parse::<ForecastMethod>().unwrap(),
        ForecastMethod::MovingAverage
    );
    assert_eq!(
        "holt-winters".parse::<ForecastMethod>().unwrap_err(),
        ForecastError::UnknownMethod("holt-winters".into())
    );
}

#[test]
fn test_validate_horizon_bounds() {
    assert_eq!(validate_horizon(1), Ok(1));
    assert_eq!(validate_horizon(24), Ok(24));
    assert!(validate_horizon(0).is_err());
    assert!(validate_horizon(100).is_err());
}
