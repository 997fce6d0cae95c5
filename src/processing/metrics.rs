//! View models the dashboard builds from a silo's readings.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::processing::statistics::{fmt_opt, mean, StatsSummary};
use crate::processing::trend::{split_windows, trend_of, Trend};
use crate::state::reading::{Quantity, Reading};

/// Display values of `quantity`, in reading order, skipping readings without it.
pub fn values_of(readings: &[Reading], quantity: Quantity) -> Vec<f64> {
    readings.iter().filter_map(|r| r.value(quantity)).collect()
}

/// Readings whose timestamp falls in `[start, end]`. Undated readings are dropped.
pub fn readings_in_range(readings: &[Reading], start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<Reading> {
    readings
        .iter()
        .filter(|r| r.timestamp.is_some_and(|ts| ts >= start && ts <= end))
        .cloned()
        .collect()
}

/// Readings from the last `days` days up to `now`.
pub fn recent_readings(readings: &[Reading], days: i64, now: DateTime<Utc>) -> Vec<Reading> {
    readings_in_range(readings, now - Duration::days(days), now)
}

pub fn readings_for_silo(readings: &[Reading], silo_id: &str) -> Vec<Reading> {
    readings
        .iter()
        .filter(|r| r.silo_id.as_deref() == Some(silo_id))
        .cloned()
        .collect()
}

/// Per-quantity statistics shown on the analysis card.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisMetrics {
    pub temperature: StatsSummary,
    pub humidity: StatsSummary,
    pub gas: StatsSummary,
}

impl AnalysisMetrics {
    /// Each quantity is filtered on its own, so a reading without humidity
    /// still contributes its temperature.
    pub fn compute(readings: &[Reading]) -> Self {
        AnalysisMetrics {
            temperature: StatsSummary::compute(&values_of(readings, Quantity::Temperature)),
            humidity: StatsSummary::compute(&values_of(readings, Quantity::Humidity)),
            gas: StatsSummary::compute(&values_of(readings, Quantity::Gas)),
        }
    }

    pub fn report(&self) -> String {
        [
            (Quantity::Temperature, &self.temperature),
            (Quantity::Humidity, &self.humidity),
            (Quantity::Gas, &self.gas),
        ]
        .iter()
        .map(|(q, s)| s.report(q.label(), q.unit()))
        .collect()
    }
}

pub fn analyze(readings: &[Reading]) -> AnalysisMetrics {
    AnalysisMetrics::compute(readings)
}

/// Headline numbers: recent averages and their direction.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DashboardMetrics {
    pub avg_temperature: Option<f64>,
    pub avg_humidity: Option<f64>,
    pub temperature_trend: Trend,
    pub humidity_trend: Trend,
}

impl DashboardMetrics {
    /// Averages cover the last `window` samples of each quantity. Trends
    /// compare that window to the one before it. Both read normalized values,
    /// so the field name a sample arrived under never moves the trend.
    pub fn compute(readings: &[Reading], window: usize) -> Self {
        let temperature = values_of(readings, Quantity::Temperature);
        let humidity = values_of(readings, Quantity::Humidity);

        DashboardMetrics {
            avg_temperature: mean(split_windows(&temperature, window).0),
            avg_humidity: mean(split_windows(&humidity, window).0),
            temperature_trend: trend_of(&temperature, window),
            humidity_trend: trend_of(&humidity, window),
        }
    }

    pub fn report(&self) -> String {
        format!(
            "Recent averages:\n  Temperature: {} {} ({})\n  Humidity: {} {} ({})\n",
            fmt_opt(self.avg_temperature, Quantity::Temperature.unit()),
            self.temperature_trend.arrow(),
            self.temperature_trend.label(),
            fmt_opt(self.avg_humidity, Quantity::Humidity.unit()),
            self.humidity_trend.arrow(),
            self.humidity_trend.label(),
        )
    }
}

pub fn dashboard_metrics(readings: &[Reading], window: usize) -> DashboardMetrics {
    DashboardMetrics::compute(readings, window)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::normalize::normalize_reading;
    use crate::data::units::UnitScale;
    use crate::processing::trend::DEFAULT_TREND_WINDOW;
    use serde_json::json;

    fn reading(temp_c: Option<f64>, rh_pct: Option<f64>) -> Reading {
        let mut record = serde_json::Map::new();
        if let Some(t) = temp_c {
            record.insert("temp_C".into(), json!(t));
        }
        if let Some(h) = rh_pct {
            record.insert("rh_pct".into(), json!(h));
        }
        normalize_reading(&record, UnitScale::Tenths)
    }

    fn dated(silo: &str, ts: &str) -> Reading {
        let record = json!({"silo_id": silo, "timestamp": ts, "temp_C": 250});
        normalize_reading(record.as_object().unwrap(), UnitScale::Tenths)
    }

    #[test]
    fn quantities_are_filtered_independently() {
        let readings = vec![
            reading(Some(250.0), None),
            reading(None, Some(600.0)),
            reading(Some(270.0), Some(620.0)),
        ];
        let m = analyze(&readings);
        assert_eq!(m.temperature.count, 2);
        assert_eq!(m.temperature.avg, Some(26.0));
        assert_eq!(m.humidity.count, 2);
        assert_eq!(m.gas.count, 0);
        assert_eq!(m.gas.avg, None);
    }

    #[test]
    fn dashboard_averages_the_last_window() {
        // 10 older samples at 20.0 C, 10 recent at 30.0 C.
        let readings: Vec<Reading> = (0..20)
            .map(|i| reading(Some(if i < 10 { 200.0 } else { 300.0 }), Some(500.0)))
            .collect();
        let m = dashboard_metrics(&readings, DEFAULT_TREND_WINDOW);
        assert_eq!(m.avg_temperature, Some(30.0));
        assert_eq!(m.temperature_trend, Trend::Up);
        assert_eq!(m.avg_humidity, Some(50.0));
        assert_eq!(m.humidity_trend, Trend::Stable);
    }

    #[test]
    fn alias_switch_between_windows_is_stable() {
        // Older samples use the friendly field in C, recent ones the device
        // field in tenths. Same temperature throughout.
        let readings: Vec<Reading> = (0..20)
            .map(|i| {
                let record = if i < 10 { json!({"temperature": 25.0}) } else { json!({"temp_C": 250}) };
                normalize_reading(record.as_object().unwrap(), UnitScale::Tenths)
            })
            .collect();
        let m = dashboard_metrics(&readings, DEFAULT_TREND_WINDOW);
        assert_eq!(m.avg_temperature, Some(25.0));
        assert_eq!(m.temperature_trend, Trend::Stable);
    }

    #[test]
    fn dashboard_without_readings() {
        let m = dashboard_metrics(&[], DEFAULT_TREND_WINDOW);
        assert_eq!(m, DashboardMetrics::default());
        assert!(m.report().contains("stable"));
    }

    #[test]
    fn short_history_is_stable() {
        let readings: Vec<Reading> = [250.0, 260.0, 270.0].iter().map(|&t| reading(Some(t), None)).collect();
        let m = dashboard_metrics(&readings, DEFAULT_TREND_WINDOW);
        assert_eq!(m.temperature_trend, Trend::Stable);
        assert_eq!(m.avg_temperature, Some(26.0));
    }

    #[test]
    fn range_and_silo_filters() {
        let readings = vec![
            dated("a", "2025-03-01T00:00:00Z"),
            dated("b", "2025-03-20T00:00:00Z"),
            dated("a", "2025-03-30T12:00:00Z"),
            reading(Some(1.0), None),
        ];
        let now = "2025-03-31T00:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let recent = recent_readings(&readings, 14, now);
        assert_eq!(recent.len(), 2);

        let silo_a = readings_for_silo(&recent, "a");
        assert_eq!(silo_a.len(), 1);
        assert_eq!(silo_a[0].silo_id.as_deref(), Some("a"));
    }
}
