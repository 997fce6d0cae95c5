pub mod chat;
pub mod forecast;
pub mod reading;
pub mod silo;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accept a string, a number or null where the backend is loose about ids and
/// target names. Numbers are rendered with their JSON text.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Like `lenient_string`, but for numeric fields: numbers pass through and
/// strings holding a number are parsed. Anything else is missing.
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .as_ref()
        .and_then(value_as_f64))
}

/// Numeric view of a loose JSON value. Non-finite results count as missing.
pub fn value_as_f64(value: &Value) -> Option<f64> {
    let v = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    v.is_finite().then_some(v)
}
