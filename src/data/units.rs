use serde::{Deserialize, Serialize};

use crate::state::reading::FieldAlias;

/// How device fields (`temp_C`, `rh_pct`) are stored by a deployment.
/// Pick one per deployment; it applies to every record uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitScale {
    /// Stored as tenths: 253 means 25.3.
    #[default]
    Tenths,
    /// Stored in plain units.
    Plain,
}

impl UnitScale {
    /// Convert a raw value found under `alias` to display units.
    /// Friendly field names are always plain.
    pub fn apply(&self, alias: &FieldAlias, raw: f64) -> f64 {
        match self {
            UnitScale::Tenths if alias.device_encoded => raw / 10.0,
            _ => raw,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UnitScale::Tenths => "tenths",
            UnitScale::Plain => "plain",
        }
    }
}
