use crate::error::Result;
use crate::state::chat::WeatherLocation;
use crate::store::KeyValueStore;

pub const LOCATION_KEY: &str = "weather_location";

/// Remembers the last location a weather forecast was requested for.
pub struct LocationCache;

impl LocationCache {
    pub fn load(store: &dyn KeyValueStore) -> Option<WeatherLocation> {
        let raw = store.get(LOCATION_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(loc) => loc,
            Err(e) => {
                tracing::warn!("Discarding unreadable cached location: {e}");
                None
            }
        }
    }

    pub fn save(store: &mut dyn KeyValueStore, location: &WeatherLocation) -> Result<()> {
        store.set(LOCATION_KEY, serde_json::to_string(location)?)
    }

    pub fn clear(store: &mut dyn KeyValueStore) -> Result<()> {
        store.remove(LOCATION_KEY)
    }
}
