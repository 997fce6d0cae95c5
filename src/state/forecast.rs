use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::data::datetime;
use crate::state::{lenient_f64, lenient_string};

/// One predicted future value for a target quantity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    #[serde(default, deserialize_with = "lenient_string")]
    pub target: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub horizon_hours: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub value_predicted: Option<f64>,
    #[serde(default, deserialize_with = "datetime::deserialize_opt")]
    pub timestamp_forecast: Option<DateTime<Utc>>,
}

impl ForecastPoint {
    pub fn new(target: Option<&str>, value_predicted: Option<f64>) -> Self {
        Self {
            target: target.map(str::to_string),
            value_predicted,
            ..Self::default()
        }
    }
}
