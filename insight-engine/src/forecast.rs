//! Sold-out date forecasting for a single SKU.
//!
//! Fits a least-squares line through the SKU's (snapshot date, on-hand
//! units) history, projects it over the requested horizon one calendar day
//! at a time, and reports the first day the clamped projection reaches zero.
//! Deliberately minimal: one regressor, no seasonality, no confidence
//! intervals beyond the fit's R².

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::regression::fit_line;

/// Minimum number of distinct-date points required to attempt a fit.
/// A 2-point line is a perfect but meaningless fit; 3 is the minimum that
/// can express a trend with residual.
const MIN_HISTORY_POINTS: usize = 3;

/// Outcome of a sold-out forecast.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ForecastStatus {
    /// Fewer than three distinct-date history points; no fit attempted.
    InsufficientData,
    /// First day within the horizon whose predicted on-hand units hit zero.
    SoldOut { date: NaiveDate },
    /// No day in the horizon reaches zero; stock outlasts the horizon.
    Sufficient { horizon_days: u32 },
}

/// One projected day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub predicted_units: u64,
}

/// Forecast result: the status plus the full projected series so the
/// caller can chart it alongside the history.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Forecast {
    pub status: ForecastStatus,
    pub series: Vec<ForecastPoint>,
    /// R² of the underlying fit, 0 when no fit was attempted.
    pub confidence: f64,
}

impl Forecast {
    fn insufficient() -> Self {
        Self {
            status: ForecastStatus::InsufficientData,
            series: Vec::new(),
            confidence: 0.0,
        }
    }
}

/// Forecast the first sold-out date for one SKU's on-hand history.
///
/// `history` is the SKU's (snapshot date, available units) series. Duplicate
/// dates keep the first occurrence in source order; upstream ETL can emit
/// two snapshots for one day and double-weighting that day would skew the
/// fit. Fewer than three distinct dates yields
/// [`ForecastStatus::InsufficientData`] rather than an error; callers must
/// treat it as "cannot forecast", never as "zero stock".
///
/// Each projected day is clamped to `max(0, round(prediction))`; physical
/// stock cannot be negative. A `horizon_days` of zero produces an empty
/// series and `Sufficient { horizon_days: 0 }`.
pub fn forecast_sold_out(history: &[(NaiveDate, f64)], horizon_days: u32) -> Forecast {
    // First-seen-per-date dedup, then sort. Input is normally already
    // ascending; sorting keeps the contract honest for unordered callers.
    let mut points: Vec<(NaiveDate, f64)> = Vec::with_capacity(history.len());
    for &(date, units) in history {
        if !points.iter().any(|&(d, _)| d == date) {
            points.push((date, units));
        }
    }
    points.sort_by_key(|&(d, _)| d);

    if points.len() < MIN_HISTORY_POINTS {
        return Forecast::insufficient();
    }

    let samples: Vec<(f64, f64)> = points
        .iter()
        .map(|&(d, units)| (f64::from(d.num_days_from_ce()), units))
        .collect();

    let Some(fit) = fit_line(&samples) else {
        // Unreachable with >=3 distinct dates, but never panic over it.
        return Forecast::insufficient();
    };

    let last_date = points[points.len() - 1].0;
    let mut series = Vec::with_capacity(horizon_days as usize);
    for offset in 1..=i64::from(horizon_days) {
        let date = last_date + Duration::days(offset);
        let raw = fit.predict(f64::from(date.num_days_from_ce()));
        let predicted_units = raw.round().max(0.0) as u64;
        series.push(ForecastPoint {
            date,
            predicted_units,
        });
    }

    // First zero in chronological order wins.
    let status = match series.iter().find(|p| p.predicted_units == 0) {
        Some(p) => ForecastStatus::SoldOut { date: p.date },
        None => ForecastStatus::Sufficient { horizon_days },
    };

    Forecast {
        status,
        series,
        confidence: fit.r_squared,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, n).unwrap()
    }

    #[test]
    fn two_points_is_insufficient_regardless_of_values() {
        let history = [(day(1), 1_000_000.0), (day(2), 0.0)];
        let forecast = forecast_sold_out(&history, 30);
        assert_eq!(forecast.status, ForecastStatus::InsufficientData);
        assert!(forecast.series.is_empty());
    }

    #[test]
    fn three_distinct_dates_always_attempt_a_fit() {
        let history = [(day(1), 10.0), (day(2), 10.0), (day(3), 10.0)];
        let forecast = forecast_sold_out(&history, 5);
        assert_ne!(forecast.status, ForecastStatus::InsufficientData);
        assert_eq!(forecast.series.len(), 5);
    }

    #[test]
    fn linear_decline_sells_out_on_the_expected_day() {
        // 100, 90, 80 on days 1-3: slope -10/day, so day 11 is the first
        // projection at 0 (day 4 = 70 ... day 10 = 10, day 11 = 0).
        let history = [(day(1), 100.0), (day(2), 90.0), (day(3), 80.0)];
        let forecast = forecast_sold_out(&history, 10);
        assert_eq!(forecast.status, ForecastStatus::SoldOut { date: day(11) });
        assert_eq!(forecast.series.len(), 10);
        assert_eq!(forecast.series[0].predicted_units, 70);
        assert_eq!(forecast.series[9].predicted_units, 0);
        assert!((forecast.confidence - 1.0).abs() < 1e-9);
    }

    #[test]
    fn increasing_stock_never_sells_out() {
        let history = [(day(1), 50.0), (day(2), 55.0), (day(3), 60.0)];
        let forecast = forecast_sold_out(&history, 30);
        assert_eq!(
            forecast.status,
            ForecastStatus::Sufficient { horizon_days: 30 }
        );
        assert!(forecast.series.iter().all(|p| p.predicted_units > 0));
    }

    #[test]
    fn sold_out_date_is_the_first_zero_not_a_later_one() {
        // Steep decline: zero from day 5 onward. The reported date must be
        // the earliest zero even though every later day is also zero.
        let history = [(day(1), 30.0), (day(2), 20.0), (day(3), 10.0)];
        let forecast = forecast_sold_out(&history, 20);
        let first_zero = forecast
            .series
            .iter()
            .find(|p| p.predicted_units == 0)
            .unwrap();
        assert_eq!(
            forecast.status,
            ForecastStatus::SoldOut {
                date: first_zero.date
            }
        );
        assert_eq!(first_zero.date, day(4));
    }

    #[test]
    fn clamped_series_never_goes_negative() {
        let history = [(day(1), 5.0), (day(2), 3.0), (day(3), 1.0)];
        let forecast = forecast_sold_out(&history, 60);
        // u64 already forbids negatives; assert the clamp produced a long
        // tail of zeros instead of wrapping.
        let zeros = forecast
            .series
            .iter()
            .filter(|p| p.predicted_units == 0)
            .count();
        assert!(zeros > 50);
    }

    #[test]
    fn duplicate_dates_keep_the_first_occurrence() {
        // The second day-2 row (with a wild value) must be ignored, leaving
        // the clean -10/day decline.
        let history = [
            (day(1), 100.0),
            (day(2), 90.0),
            (day(2), 500.0),
            (day(3), 80.0),
        ];
        let forecast = forecast_sold_out(&history, 10);
        assert_eq!(forecast.status, ForecastStatus::SoldOut { date: day(11) });
    }

    #[test]
    fn duplicate_dates_do_not_count_toward_the_minimum() {
        let history = [(day(1), 10.0), (day(1), 9.0), (day(2), 8.0)];
        let forecast = forecast_sold_out(&history, 10);
        assert_eq!(forecast.status, ForecastStatus::InsufficientData);
    }

    #[test]
    fn zero_horizon_is_an_empty_sufficient_forecast() {
        let history = [(day(1), 100.0), (day(2), 90.0), (day(3), 80.0)];
        let forecast = forecast_sold_out(&history, 0);
        assert_eq!(
            forecast.status,
            ForecastStatus::Sufficient { horizon_days: 0 }
        );
        assert!(forecast.series.is_empty());
    }

    #[test]
    fn unordered_history_is_sorted_before_fitting() {
        let history = [(day(3), 80.0), (day(1), 100.0), (day(2), 90.0)];
        let forecast = forecast_sold_out(&history, 10);
        assert_eq!(forecast.status, ForecastStatus::SoldOut { date: day(11) });
    }
}
