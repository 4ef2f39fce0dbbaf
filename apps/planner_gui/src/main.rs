use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use client_core::{config::normalize_base_url, itinerary::ItineraryStore, load_settings};
use crossbeam_channel::bounded;
use eframe::egui;

mod backend_bridge;
mod controller;
mod map_canvas;
mod ui;

use backend_bridge::{
    commands::BackendCommand,
    runtime::{spawn_backend_thread, BackendConfig},
};
use controller::events::UiEvent;
use ui::{PlannerApp, StartupConfig};

#[derive(Debug, Parser)]
#[command(name = "planner_gui", about = "Trip planner desktop shell")]
struct Cli {
    /// Overrides the planner backend base url from settings.
    #[arg(long)]
    api_base_url: Option<String>,
    /// Directory holding the persisted itinerary.
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Copies a JSON itinerary into the data directory before starting.
    #[arg(long)]
    import_itinerary: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let cli = Cli::parse();

    let mut settings = load_settings();
    if let Some(url) = cli.api_base_url {
        settings.api_base_url = url;
    }
    if let Some(dir) = cli.data_dir {
        settings.data_dir = Some(dir);
    }
    settings.api_base_url = normalize_base_url(&settings.api_base_url)?;
    let data_dir = settings.resolve_data_dir()?;
    let store = ItineraryStore::new(data_dir);

    if let Some(path) = cli.import_itinerary {
        let itinerary = store
            .import_file(&path)
            .with_context(|| format!("failed to import itinerary from {}", path.display()))?;
        tracing::info!(
            days = itinerary.day_count(),
            path = %store.path().display(),
            "imported itinerary"
        );
    }

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    let startup = StartupConfig {
        default_city: settings.default_city.clone(),
        map_configured: settings.map_credentials().is_some(),
    };
    spawn_backend_thread(cmd_rx, ui_tx, BackendConfig { settings, store });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Trip Planner")
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([980.0, 640.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Trip Planner",
        options,
        Box::new(move |_cc| Ok(Box::new(PlannerApp::new(cmd_tx, ui_rx, startup)))),
    )
    .map_err(|err| anyhow::anyhow!("desktop shell exited with an error: {err}"))
}
