use serde::{Deserialize, Serialize};

use crate::processing::statistics::mean;

/// Samples per trend window unless configured otherwise.
pub const DEFAULT_TREND_WINDOW: usize = 10;

/// Direction of a recent-vs-older average comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    #[default]
    Stable,
}

impl Trend {
    pub fn label(&self) -> &'static str {
        match self {
            Trend::Up => "up",
            Trend::Down => "down",
            Trend::Stable => "stable",
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            Trend::Up => "\u{2191}",
            Trend::Down => "\u{2193}",
            Trend::Stable => "\u{2192}",
        }
    }
}

/// Compare the means of two windows. An empty older window compares the
/// recent mean against itself, so the result is `Stable`.
pub fn compute_trend(recent: &[f64], older: &[f64]) -> Trend {
    let Some(avg_recent) = mean(recent) else {
        return Trend::Stable;
    };
    let avg_older = mean(older).unwrap_or(avg_recent);

    if avg_recent > avg_older {
        Trend::Up
    } else if avg_recent < avg_older {
        Trend::Down
    } else {
        Trend::Stable
    }
}

/// Split a chronological series into (recent, older): the last `window`
/// samples and the `window` samples before them. Either may be short.
pub fn split_windows(values: &[f64], window: usize) -> (&[f64], &[f64]) {
    let n = values.len();
    let recent_start = n.saturating_sub(window);
    let older_start = recent_start.saturating_sub(window);
    (&values[recent_start..], &values[older_start..recent_start])
}

/// Trend of a chronological series using `split_windows`.
pub fn trend_of(values: &[f64], window: usize) -> Trend {
    let (recent, older) = split_windows(values, window);
    compute_trend(recent, older)
}
