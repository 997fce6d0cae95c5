//! Statistics engine behind the SiloScope silo-monitoring dashboard.
//!
//! Readings and forecasts come in as loose records, are normalized once
//! (`data`), and are turned into summaries, trends and grouped forecast
//! views by the pure functions in `processing`. Chat messages are rendered
//! through a small escaped Markdown subset in `render`.

pub mod config;
pub mod data;
pub mod error;
pub mod processing;
pub mod render;
pub mod state;
pub mod store;

pub use config::Settings;
pub use error::{Error, Result};
