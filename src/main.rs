use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use siloscope::data::loader;
use siloscope::processing::metrics::{readings_for_silo, recent_readings};
use siloscope::processing::{
    analyze, dashboard_metrics, group_forecasts_by_target, AnalysisMetrics, DashboardMetrics, ForecastSummary,
};
use siloscope::render::{render_inline_markup, MarkupOptions};
use siloscope::state::chat::ChatRole;
use siloscope::state::silo::find_silo;
use siloscope::store::{ChatTranscript, JsonFileStore};
use siloscope::Settings;

#[derive(Parser)]
#[command(name = "siloscope")]
#[command(about = "Silo telemetry statistics and forecast summaries", long_about = None)]
#[command(version)]
struct Cli {
    /// Settings file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize a readings export (.json, .csv, .xlsx)
    Stats {
        readings: PathBuf,

        /// Only readings from this silo
        #[arg(long)]
        silo: Option<String>,

        /// Silo list, used to show the silo name
        #[arg(long)]
        silos: Option<PathBuf>,

        /// Look-back in days (defaults to the configured analysis window)
        #[arg(long)]
        days: Option<i64>,

        /// Ignore timestamps and use every reading
        #[arg(long)]
        all: bool,

        #[arg(long)]
        json: bool,
    },

    /// Group a forecast export by target and summarize each group
    Forecast {
        forecasts: PathBuf,

        #[arg(long)]
        json: bool,
    },

    /// Render chat text to markup
    Render {
        text: String,

        /// Leave *x* and _x_ untouched
        #[arg(long)]
        no_italics: bool,
    },

    /// Show the chat transcript kept in a store file
    History {
        store: PathBuf,

        /// Forget the stored transcript
        #[arg(long)]
        clear: bool,
    },
}

#[derive(Serialize)]
struct StatsView {
    silo: Option<String>,
    readings: usize,
    analysis: AnalysisMetrics,
    dashboard: DashboardMetrics,
}

#[derive(Serialize)]
struct ForecastView {
    target: String,
    #[serde(flatten)]
    summary: ForecastSummary,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::load_or_default(cli.config.as_deref())
        .with_context(|| format!("Cannot load settings from {:?}", cli.config))?;

    match cli.command {
        Commands::Stats { readings, silo, silos, days, all, json } => {
            stats(&settings, &readings, silo, silos.as_deref(), days, all, json)
        }
        Commands::Forecast { forecasts, json } => forecast(&forecasts, json),
        Commands::Render { text, no_italics } => {
            let options = MarkupOptions { italics: settings.markup.italics && !no_italics };
            println!("{}", render_inline_markup(&text, options));
            Ok(())
        }
        Commands::History { store, clear } => history(&settings, &store, clear),
    }
}

fn stats(
    settings: &Settings,
    path: &Path,
    silo: Option<String>,
    silos: Option<&Path>,
    days: Option<i64>,
    all: bool,
    json: bool,
) -> Result<()> {
    let mut readings = loader::load_readings(path, settings.unit_scale)
        .with_context(|| format!("Cannot load readings from {path:?}"))?;

    if let Some(id) = &silo {
        readings = readings_for_silo(&readings, id);
    }
    if !all {
        readings = recent_readings(&readings, days.unwrap_or(settings.analysis_days), Utc::now());
    }

    let silo_name = match (&silo, silos) {
        (Some(id), Some(list)) => {
            let list = loader::load_silos(list).with_context(|| format!("Cannot load silos from {list:?}"))?;
            Some(find_silo(&list, id).map(|s| s.display_name()).unwrap_or_else(|| id.clone()))
        }
        (Some(id), None) => Some(id.clone()),
        _ => None,
    };

    let view = StatsView {
        silo: silo_name,
        readings: readings.len(),
        analysis: analyze(&readings),
        dashboard: dashboard_metrics(&readings, settings.trend_window),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        if let Some(name) = &view.silo {
            println!("Silo: {name}");
        }
        println!("Readings: {}\n", view.readings);
        print!("{}", view.analysis.report());
        print!("\n{}", view.dashboard.report());
    }
    Ok(())
}

fn forecast(path: &Path, json: bool) -> Result<()> {
    let forecasts = loader::load_forecasts(path).with_context(|| format!("Cannot load forecasts from {path:?}"))?;
    let groups = group_forecasts_by_target(&forecasts);

    if json {
        let views: Vec<ForecastView> = groups
            .summaries()
            .into_iter()
            .map(|(target, summary)| ForecastView { target, summary })
            .collect();
        println!("{}", serde_json::to_string_pretty(&views)?);
    } else if groups.is_empty() {
        println!("No forecasts.");
    } else {
        for (target, summary) in groups.summaries() {
            print!("{}", summary.report(&target));
        }
    }
    Ok(())
}

fn history(settings: &Settings, path: &Path, clear: bool) -> Result<()> {
    let mut store = JsonFileStore::open(path).with_context(|| format!("Cannot open store {path:?}"))?;
    let mut transcript = ChatTranscript::load(&store, settings.persist_chat);

    if clear {
        transcript.clear(&mut store)?;
        println!("Chat history cleared.");
        return Ok(());
    }

    for message in transcript.messages() {
        let who = match message.role {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        };
        println!("[{who}] {}", render_inline_markup(&message.content, settings.markup));
    }
    Ok(())
}
