use serde_json::{Map, Value};

use crate::data::datetime::parse_timestamp;
use crate::data::units::UnitScale;
use crate::state::reading::{FieldAlias, Measurement, Quantity, Reading};
use crate::state::value_as_f64;

/// A loose record as it arrives from JSON or a spreadsheet row.
pub type Record = Map<String, Value>;

/// Resolve `quantity` from its aliases in priority order. An alias holding
/// null or a non-numeric value is skipped, not treated as the answer.
pub fn resolve(record: &Record, quantity: Quantity) -> Option<(&'static FieldAlias, f64)> {
    quantity
        .aliases()
        .iter()
        .find_map(|alias| record.get(alias.name).and_then(value_as_f64).map(|v| (alias, v)))
}

fn text_field(record: &Record, name: &str) -> Option<String> {
    match record.get(name)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Normalize one record. Runs once per record, before any statistics.
pub fn normalize_reading(record: &Record, scale: UnitScale) -> Reading {
    let timestamp = text_field(record, "timestamp").and_then(|s| {
        let parsed = parse_timestamp(&s);
        if parsed.is_none() {
            tracing::debug!("Reading has unparseable timestamp {s:?}");
        }
        parsed
    });

    let measurements = Quantity::ALL
        .iter()
        .filter_map(|&q| {
            resolve(record, q).map(|(alias, raw)| {
                (q, Measurement { value: scale.apply(alias, raw), raw })
            })
        })
        .collect();

    Reading {
        silo_id: text_field(record, "silo_id"),
        timestamp,
        measurements,
    }
}

pub fn normalize_readings(records: &[Record], scale: UnitScale) -> Vec<Reading> {
    records.iter().map(|r| normalize_reading(r, scale)).collect()
}
