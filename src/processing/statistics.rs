use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Summary statistics for a numeric sequence. Every field except `count` is
/// `None` for an empty sequence.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StatsSummary {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub avg: Option<f64>,
    /// Sorted element at index `count / 2`, see `lower_median`.
    pub p50: Option<f64>,
    pub count: usize,
    /// Population standard deviation.
    pub stddev: Option<f64>,
}

impl StatsSummary {
    /// Compute statistics over `values`. Callers drop missing samples
    /// beforehand; the input slice is never reordered.
    pub fn compute(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let sorted = sorted_copy(values);
        let count = sorted.len();
        let avg = sorted.iter().sum::<f64>() / count as f64;
        let variance = sorted.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / count as f64;

        StatsSummary {
            min: sorted.first().copied(),
            max: sorted.last().copied(),
            avg: Some(avg),
            p50: lower_median(&sorted),
            count,
            stddev: Some(variance.sqrt()),
        }
    }

    /// Format as a multi-line report string.
    pub fn report(&self, label: &str, unit: &str) -> String {
        format!(
            "{}:\n  Count: {}\n  Min: {}\n  Max: {}\n  Mean: {}\n  Median: {}\n  Std Dev: {}\n",
            label,
            self.count,
            fmt_opt(self.min, unit),
            fmt_opt(self.max, unit),
            fmt_opt(self.avg, unit),
            fmt_opt(self.p50, unit),
            fmt_opt(self.stddev, unit),
        )
    }
}

/// Ascending copy using ordinary numeric comparison. The sort is stable.
pub fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    sorted
}

/// Element at index `len / 2` of an already sorted slice. For even lengths
/// this is the upper of the two middle elements, not their average; every
/// median in the dashboard uses this convention.
pub fn lower_median(sorted: &[f64]) -> Option<f64> {
    sorted.get(sorted.len() / 2).copied()
}

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

pub(crate) fn fmt_opt(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) if unit.is_empty() => format!("{v:.2}"),
        Some(v) => format!("{v:.2} {unit}"),
        None => "\u{2014}".to_string(),
    }
}
