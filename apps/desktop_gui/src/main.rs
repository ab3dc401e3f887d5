use std::path::PathBuf;

mod backend_bridge;
mod controller;
mod ui;

use clap::Parser;
use client_core::load_settings;
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use backend_bridge::commands::BackendCommand;
use controller::events::UiEvent;
use ui::{app::DRAFT_STORAGE_KEY, form::FormDraft, PredictorApp};

#[derive(Parser, Debug)]
struct StartupArgs {
    /// Prediction endpoint; overrides the settings file and environment.
    #[arg(long)]
    endpoint: Option<String>,
    /// Pause before each request, in milliseconds.
    #[arg(long)]
    delay_ms: Option<u64>,
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = StartupArgs::parse();

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(endpoint) = args.endpoint {
        settings.endpoint = endpoint;
        settings.validate()?;
    }
    if let Some(delay_ms) = args.delay_ms {
        settings.submit_delay_ms = delay_ms;
    }

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    backend_bridge::runtime::launch(settings, cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("CO2 Emissions Predictor")
            .with_inner_size([900.0, 820.0])
            .with_min_inner_size([560.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "CO2 Emissions Predictor",
        options,
        Box::new(|cc| {
            let persisted_draft = cc.storage.and_then(|storage| {
                storage
                    .get_string(DRAFT_STORAGE_KEY)
                    .and_then(|text| serde_json::from_str::<FormDraft>(&text).ok())
            });
            Ok(Box::new(PredictorApp::new(cmd_tx, ui_rx, persisted_draft)))
        }),
    )
    .map_err(|err| anyhow::anyhow!("failed to run desktop GUI: {err}"))
}
