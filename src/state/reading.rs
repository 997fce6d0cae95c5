use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A field name a quantity may be exported under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldAlias {
    pub name: &'static str,
    /// Device fields may be stored in tenths (see `UnitScale`).
    pub device_encoded: bool,
}

const fn friendly(name: &'static str) -> FieldAlias {
    FieldAlias { name, device_encoded: false }
}

const fn device(name: &'static str, device_encoded: bool) -> FieldAlias {
    FieldAlias { name, device_encoded }
}

const TEMPERATURE: &[FieldAlias] = &[friendly("temperature"), device("temp_C", true)];
const HUMIDITY: &[FieldAlias] = &[friendly("humidity"), device("rh_pct", true)];
const GAS: &[FieldAlias] = &[friendly("gas"), device("mq2_raw", false)];
const CO2: &[FieldAlias] = &[friendly("co2"), device("co2_ppm_est", false)];
const LUMINOSITY: &[FieldAlias] = &[friendly("luminosity"), device("lux", false)];

/// A tracked sensor quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quantity {
    Temperature,
    Humidity,
    Gas,
    Co2,
    Luminosity,
}

impl Quantity {
    pub const ALL: [Quantity; 5] = [
        Quantity::Temperature,
        Quantity::Humidity,
        Quantity::Gas,
        Quantity::Co2,
        Quantity::Luminosity,
    ];

    /// Field names in priority order. The first one holding a number wins.
    pub fn aliases(&self) -> &'static [FieldAlias] {
        match self {
            Quantity::Temperature => TEMPERATURE,
            Quantity::Humidity => HUMIDITY,
            Quantity::Gas => GAS,
            Quantity::Co2 => CO2,
            Quantity::Luminosity => LUMINOSITY,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Quantity::Temperature => "Temperature",
            Quantity::Humidity => "Humidity",
            Quantity::Gas => "Gas",
            Quantity::Co2 => "CO2",
            Quantity::Luminosity => "Luminosity",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Quantity::Temperature => "\u{00B0}C",
            Quantity::Humidity => "%",
            Quantity::Gas => "ppm",
            Quantity::Co2 => "ppm",
            Quantity::Luminosity => "lx",
        }
    }
}

/// One resolved sensor value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Value in display units, after unit scaling.
    pub value: f64,
    /// Value exactly as found in the record.
    pub raw: f64,
}

/// A normalized reading. Every quantity has been resolved from its aliases
/// exactly once, so downstream code never looks at field names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub silo_id: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub measurements: BTreeMap<Quantity, Measurement>,
}

impl Reading {
    pub fn value(&self, quantity: Quantity) -> Option<f64> {
        self.measurements.get(&quantity).map(|m| m.value)
    }

    pub fn raw(&self, quantity: Quantity) -> Option<f64> {
        self.measurements.get(&quantity).map(|m| m.raw)
    }

    pub fn has(&self, quantity: Quantity) -> bool {
        self.measurements.contains_key(&quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn friendly_names_come_first() {
        for q in Quantity::ALL {
            let aliases = q.aliases();
            assert!(!aliases[0].device_encoded, "{q:?}");
            assert_eq!(aliases.len(), 2);
        }
    }

    #[test]
    fn only_temperature_and_humidity_are_tenths_encoded() {
        let encoded: Vec<&str> = Quantity::ALL
            .iter()
            .flat_map(|q| q.aliases())
            .filter(|a| a.device_encoded)
            .map(|a| a.name)
            .collect();
        assert_eq!(encoded, vec!["temp_C", "rh_pct"]);
    }
}
