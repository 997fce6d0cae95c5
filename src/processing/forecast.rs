use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::processing::statistics::{fmt_opt, lower_median, mean, sorted_copy};
use crate::state::forecast::ForecastPoint;

/// Group key for forecast points without a target.
pub const UNKNOWN_TARGET: &str = "unknown";

/// Forecast points partitioned by target. Groups keep first-appearance order
/// and points keep their input order within a group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastGroups {
    groups: Vec<(String, Vec<ForecastPoint>)>,
}

impl ForecastGroups {
    pub fn get(&self, target: &str) -> Option<&[ForecastPoint]> {
        self.groups
            .iter()
            .find(|(t, _)| t == target)
            .map(|(_, points)| points.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ForecastPoint])> {
        self.groups.iter().map(|(t, p)| (t.as_str(), p.as_slice()))
    }

    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(t, _)| t.as_str())
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Summarize every group, in group order.
    pub fn summaries(&self) -> Vec<(String, ForecastSummary)> {
        self.iter()
            .map(|(t, points)| (t.to_string(), ForecastSummary::compute(points)))
            .collect()
    }
}

impl Serialize for ForecastGroups {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for (target, points) in &self.groups {
            map.serialize_entry(target, points)?;
        }
        map.end()
    }
}

/// Partition forecasts by `target`. A missing or blank target goes under
/// `UNKNOWN_TARGET`.
pub fn group_forecasts_by_target(forecasts: &[ForecastPoint]) -> ForecastGroups {
    let mut groups: Vec<(String, Vec<ForecastPoint>)> = Vec::new();

    for point in forecasts {
        let key = match point.target.as_deref() {
            Some(t) if !t.is_empty() => t,
            _ => UNKNOWN_TARGET,
        };
        match groups.iter_mut().find(|(t, _)| t == key) {
            Some((_, points)) => points.push(point.clone()),
            None => groups.push((key.to_string(), vec![point.clone()])),
        }
    }

    ForecastGroups { groups }
}

/// Aggregates over the predicted values of one forecast group.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ForecastSummary {
    pub avg: Option<f64>,
    pub median: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Number of points in the group, including those without a value.
    pub count: usize,
}

impl ForecastSummary {
    pub fn compute(group: &[ForecastPoint]) -> Self {
        let values: Vec<f64> = group.iter().filter_map(|p| p.value_predicted).collect();
        let sorted = sorted_copy(&values);

        ForecastSummary {
            avg: mean(&values),
            median: lower_median(&sorted),
            min: sorted.first().copied(),
            max: sorted.last().copied(),
            count: group.len(),
        }
    }

    pub fn report(&self, target: &str) -> String {
        format!(
            "{}:\n  Predicted mean: {}\n  Median: {}\n  Range: {} to {}\n  Forecasts: {}\n",
            target.to_uppercase(),
            fmt_opt(self.avg, ""),
            fmt_opt(self.median, ""),
            fmt_opt(self.min, ""),
            fmt_opt(self.max, ""),
            self.count,
        )
    }
}

pub fn summarize_forecast_group(group: &[ForecastPoint]) -> ForecastSummary {
    ForecastSummary::compute(group)
}
