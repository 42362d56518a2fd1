mod app;
mod chart;
mod color;
mod config;
mod data;
mod export;
mod state;
mod ui;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use app::MovieChartsApp;
use clap::Parser;
use eframe::egui;

use config::Config;
use data::aggregate::Analysis;
use data::loader::{self, DataSource};
use state::AppState;

/// Box-office revenue by year and top directors by score.
#[derive(Debug, Parser)]
#[command(name = "movie-charts", version, about)]
struct Cli {
    /// Movie table: a path or http(s) URL ending in .csv, .tsv, .json or .parquet
    source: Option<String>,

    /// JSON file overriding column names, analysis window and chart layout
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write both charts as SVG into DIR instead of opening the viewer
    #[arg(long, value_name = "DIR", requires = "source")]
    export: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_json_file(path)?,
        None => Config::default(),
    };
    let source = cli.source.as_deref().map(DataSource::parse);

    match (&cli.export, source) {
        (Some(dir), Some(source)) => export_svgs(&source, &config, dir),
        (Some(_), None) => anyhow::bail!("--export needs a SOURCE to load"),
        (None, source) => run_viewer(config, source),
    }
}

fn export_svgs(source: &DataSource, config: &Config, dir: &Path) -> Result<()> {
    let dataset =
        loader::load(source, &config.columns).with_context(|| format!("loading {source}"))?;
    let analysis = Analysis::compute(&dataset, &config.analysis);
    export::export_charts(&analysis, &config.layout, dir)?;
    Ok(())
}

fn run_viewer(config: Config, source: Option<DataSource>) -> Result<()> {
    let mut state = AppState::new(config);
    if let Some(source) = source {
        state.start_loading(source);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 1000.0])
            .with_min_inner_size([500.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Movie Charts",
        options,
        Box::new(|_cc| Ok(Box::new(MovieChartsApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running viewer: {e}"))
}
