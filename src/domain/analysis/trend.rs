//! Trend statistics over a metric's historical values.
//!
//! All functions use population statistics and closed-form sums so results
//! are deterministic for a given series. Series order is collection
//! timestamp ascending.

use serde::{Deserialize, Serialize};

use crate::domain::decision::TrendDirection;

/// Coefficient-of-variation ceiling above which a slope is not trusted.
const VOLATILITY_CEILING: f64 = 0.3;

/// Slope magnitude below which a series counts as stable.
const STABLE_SLOPE_EPSILON: f64 = 0.01;

/// Minimum points for the lag-7 seasonality test. Series of 8–13 points
/// always report no seasonality; shortening the lag instead would change
/// observable classification behavior.
const SEASONALITY_MIN_POINTS: usize = 14;

/// Lag used by the autocorrelation test (one week of daily samples).
const SEASONALITY_LAG: usize = 7;

/// Autocorrelation magnitude that counts as a repeating pattern.
const SEASONALITY_CORR_THRESHOLD: f64 = 0.3;

/// Computed trend signal for one metric. Never persisted; always
/// recomputed from the stored collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendAnalysis {
    /// Human-readable metric name.
    pub metric: String,
    pub period: String,
    pub trend: TrendDirection,
    pub change_percentage: f64,
    pub data_points: usize,
    pub confidence: u8,
    pub anomalies_detected: usize,
    pub seasonality_detected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast: Option<f64>,
}

/// Arithmetic mean; 0 for an empty series.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation; 0 for series shorter than two points.
pub fn population_stdev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mu = mean(values);
    let variance =
        values.iter().map(|v| (v - mu) * (v - mu)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Coefficient of variation. A zero mean with spread counts as infinitely
/// volatile; a flat zero series has no variation at all.
pub fn coefficient_of_variation(values: &[f64]) -> f64 {
    let mu = mean(values);
    let sd = population_stdev(values);
    if mu == 0.0 {
        if sd == 0.0 {
            0.0
        } else {
            f64::INFINITY
        }
    } else {
        sd / mu.abs()
    }
}

/// OLS slope of value vs. sequence index `0..n-1`, closed form.
pub fn ols_slope(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let nf = n as f64;
    let sum_x: f64 = (0..n).map(|i| i as f64).sum();
    let sum_y: f64 = values.iter().sum();
    let sum_xy: f64 = values.iter().enumerate().map(|(i, v)| i as f64 * v).sum();
    let sum_xx: f64 = (0..n).map(|i| (i * i) as f64).sum();

    let denominator = nf * sum_xx - sum_x * sum_x;
    if denominator == 0.0 {
        return 0.0;
    }
    (nf * sum_xy - sum_x * sum_y) / denominator
}

/// Percent change from first to last value; 0 when the first value is 0.
pub fn change_percentage(values: &[f64]) -> f64 {
    match (values.first(), values.last()) {
        (Some(first), Some(last)) if *first != 0.0 => (last - first) / first * 100.0,
        _ => 0.0,
    }
}

/// Count of values deviating more than two standard deviations from the
/// series mean.
pub fn anomaly_count(values: &[f64]) -> usize {
    let sd = population_stdev(values);
    if sd == 0.0 {
        return 0;
    }
    let mu = mean(values);
    values.iter().filter(|v| (*v - mu).abs() > 2.0 * sd).count()
}

/// Lag-7 autocorrelation using one shared mean/variance over the whole
/// series. Returns 0 when the series has no spread.
pub fn lag7_autocorrelation(values: &[f64]) -> f64 {
    let n = values.len();
    if n <= SEASONALITY_LAG {
        return 0.0;
    }
    let mu = mean(values);
    let denominator: f64 = values.iter().map(|v| (v - mu) * (v - mu)).sum();
    if denominator == 0.0 {
        return 0.0;
    }
    let numerator: f64 = (0..n - SEASONALITY_LAG)
        .map(|i| (values[i] - mu) * (values[i + SEASONALITY_LAG] - mu))
        .sum();
    numerator / denominator
}

/// Whether the series shows a weekly repeating pattern.
///
/// Fewer than 8 points: never. 8 to 13 points: also never, because the
/// lag-7 window does not fit and substituting a shorter lag would change
/// the classification contract. 14 or more: |lag-7 autocorrelation| > 0.3.
pub fn seasonality_detected(values: &[f64]) -> bool {
    if values.len() < SEASONALITY_MIN_POINTS {
        return false;
    }
    lag7_autocorrelation(values).abs() > SEASONALITY_CORR_THRESHOLD
}

/// Classifies the direction of a series.
///
/// A series with CV above 0.3 is too volatile to trust a slope and reports
/// `Unknown`. Otherwise a slope within ±0.01 is `Stable`, and the sign
/// decides between `Improving` and `Degrading`.
pub fn classify(values: &[f64]) -> TrendDirection {
    if coefficient_of_variation(values) > VOLATILITY_CEILING {
        return TrendDirection::Unknown;
    }
    let slope = ols_slope(values);
    if slope.abs() < STABLE_SLOPE_EPSILON {
        TrendDirection::Stable
    } else if slope > 0.0 {
        TrendDirection::Improving
    } else {
        TrendDirection::Degrading
    }
}

/// Runs the full battery over one metric's series.
pub fn analyze_series(metric: impl Into<String>, period: impl Into<String>, values: &[f64]) -> TrendAnalysis {
    let trend = classify(values);
    let forecast = match (trend, values.last()) {
        (TrendDirection::Unknown, _) | (_, None) => None,
        (_, Some(last)) => Some(last + ols_slope(values)),
    };
    TrendAnalysis {
        metric: metric.into(),
        period: period.into(),
        trend,
        change_percentage: change_percentage(values),
        data_points: values.len(),
        confidence: (values.len() * 10).min(100) as u8,
        anomalies_detected: anomaly_count(values),
        seasonality_detected: seasonality_detected(values),
        forecast,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slope_of_linear_series_is_exact() {
        assert!((ols_slope(&[10.0, 20.0, 30.0, 40.0]) - 10.0).abs() < 1e-9);
        assert!((ols_slope(&[100.0, 101.0, 102.0, 103.0]) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn population_stdev_matches_hand_computation() {
        // [10,20,30,40]: mean 25, variance (225+25+25+225)/4 = 125
        let sd = population_stdev(&[10.0, 20.0, 30.0, 40.0]);
        assert!((sd - 125.0_f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn steep_relative_spread_is_unknown() {
        // CV = sqrt(125)/25 ≈ 0.447 > 0.3, so the slope is not trusted.
        assert_eq!(classify(&[10.0, 20.0, 30.0, 40.0]), TrendDirection::Unknown);
    }

    #[test]
    fn low_variance_increasing_series_improves() {
        assert_eq!(
            classify(&[100.0, 101.0, 102.0, 103.0]),
            TrendDirection::Improving
        );
    }

    #[test]
    fn low_variance_decreasing_series_degrades() {
        assert_eq!(
            classify(&[103.0, 102.0, 101.0, 100.0]),
            TrendDirection::Degrading
        );
    }

    #[test]
    fn constant_series_is_stable() {
        assert_eq!(classify(&[50.0, 50.0, 50.0, 50.0]), TrendDirection::Stable);
    }

    #[test]
    fn change_percentage_is_first_to_last() {
        assert!((change_percentage(&[100.0, 101.0, 102.0, 103.0]) - 3.0).abs() < 1e-9);
        assert_eq!(change_percentage(&[0.0, 50.0]), 0.0);
        assert_eq!(change_percentage(&[]), 0.0);
    }

    #[test]
    fn single_spike_counts_one_anomaly() {
        // At n=7 the spike clears the 2-sigma bar; at n=4 the spike itself
        // inflates sigma enough that nothing does.
        let series = [50.0, 51.0, 49.0, 52.0, 200.0, 50.0, 51.0];
        assert_eq!(anomaly_count(&series), 1);
    }

    #[test]
    fn flat_series_has_no_anomalies() {
        assert_eq!(anomaly_count(&[5.0, 5.0, 5.0, 5.0]), 0);
    }

    #[test]
    fn seasonality_never_reported_below_fourteen_points() {
        // A clean period-7 pattern at 7 and 13 points still reports false.
        let one_period = [10.0, 15.0, 20.0, 15.0, 10.0, 5.0, 2.0];
        assert!(!seasonality_detected(&one_period));

        let thirteen: Vec<f64> = one_period
            .iter()
            .chain(one_period.iter().take(6))
            .copied()
            .collect();
        assert_eq!(thirteen.len(), 13);
        assert!(!seasonality_detected(&thirteen));
    }

    #[test]
    fn fourteen_point_weekly_pattern_is_seasonal() {
        let one_period = [10.0, 15.0, 20.0, 15.0, 10.0, 5.0, 2.0];
        let two_periods: Vec<f64> = one_period
            .iter()
            .chain(one_period.iter())
            .copied()
            .collect();
        assert_eq!(two_periods.len(), 14);
        // Two identical periods give lag-7 correlation of exactly 0.5.
        assert!((lag7_autocorrelation(&two_periods) - 0.5).abs() < 1e-9);
        assert!(seasonality_detected(&two_periods));
    }

    #[test]
    fn confidence_saturates_at_one_hundred() {
        let short = analyze_series("m", "30d", &[1.0, 1.0, 1.0]);
        assert_eq!(short.confidence, 30);

        let values = vec![1.0; 20];
        let long = analyze_series("m", "30d", &values);
        assert_eq!(long.confidence, 100);
    }

    #[test]
    fn analyze_series_carries_forecast_for_trusted_trends() {
        let improving = analyze_series("m", "30d", &[100.0, 101.0, 102.0, 103.0]);
        assert_eq!(improving.trend, TrendDirection::Improving);
        assert!((improving.forecast.unwrap() - 104.0).abs() < 1e-9);

        let volatile = analyze_series("m", "30d", &[10.0, 20.0, 30.0, 40.0]);
        assert_eq!(volatile.trend, TrendDirection::Unknown);
        assert!(volatile.forecast.is_none());
    }

    #[test]
    fn zero_mean_with_spread_is_unknown() {
        assert_eq!(classify(&[-5.0, 5.0, -5.0, 5.0]), TrendDirection::Unknown);
    }
}
