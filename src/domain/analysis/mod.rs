//! Pure analysis calculators: health scoring and trend statistics.

mod health;
mod trend;

pub use health::HealthScorer;
pub use trend::{
    analyze_series, anomaly_count, change_percentage, classify, coefficient_of_variation,
    lag7_autocorrelation, mean, ols_slope, population_stdev, seasonality_detected, TrendAnalysis,
};
