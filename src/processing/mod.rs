//! The telemetry statistics engine. Everything here is a pure function of its
//! inputs: no I/O, no shared state, inputs are never mutated.

pub mod forecast;
pub mod metrics;
pub mod statistics;
pub mod trend;

pub use forecast::{group_forecasts_by_target, summarize_forecast_group, ForecastGroups, ForecastSummary};
pub use metrics::{analyze, dashboard_metrics, AnalysisMetrics, DashboardMetrics};
pub use statistics::StatsSummary;
pub use trend::{compute_trend, Trend};

/// `StatsSummary::compute` under its dashboard name.
pub fn compute_stats(values: &[f64]) -> StatsSummary {
    StatsSummary::compute(values)
}
