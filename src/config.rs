use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::units::UnitScale;
use crate::error::Result;
use crate::processing::trend::DEFAULT_TREND_WINDOW;
use crate::render::markup::MarkupOptions;

/// Engine settings for one deployment. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Encoding of the device fields `temp_C` and `rh_pct`.
    pub unit_scale: UnitScale,
    /// Samples per trend window.
    pub trend_window: usize,
    /// Look-back for the analysis view.
    pub analysis_days: i64,
    pub markup: MarkupOptions,
    /// Keep the chat transcript in the key-value store.
    pub persist_chat: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            unit_scale: UnitScale::default(),
            trend_window: DEFAULT_TREND_WINDOW,
            analysis_days: 30,
            markup: MarkupOptions::default(),
            persist_chat: true,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&text)?;
        tracing::info!("Settings loaded from {:?}", path);
        Ok(settings)
    }

    /// Settings from `path` when given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        tracing::info!("Settings saved to {:?}", path);
        Ok(())
    }
}
