use serde::{Deserialize, Serialize};

use crate::state::{lenient_f64, lenient_string};

/// Where a silo stands. The backend stores either coordinates or whatever the
/// operator typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Location {
    Coordinates {
        #[serde(alias = "latitude")]
        lat: f64,
        #[serde(alias = "longitude", alias = "lon")]
        lng: f64,
    },
    Text(String),
}

impl Location {
    pub fn describe(&self) -> String {
        match self {
            Location::Coordinates { lat, lng } => format!("{lat:.5}, {lng:.5}"),
            Location::Text(s) => s.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Silo {
    #[serde(rename = "_id", alias = "id", default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub device_id: Option<String>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub capacity: Option<f64>,
}

impl Silo {
    /// Name shown to operators, falling back to the id.
    pub fn display_name(&self) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self.id.clone().unwrap_or_else(|| "(unnamed silo)".to_string()),
        }
    }
}

/// Look a silo up by id. Readings only hold a weak reference.
pub fn find_silo<'a>(silos: &'a [Silo], id: &str) -> Option<&'a Silo> {
    silos.iter().find(|s| s.id.as_deref() == Some(id))
}
