use std::{path::PathBuf, process::ExitCode, sync::Arc, time::Duration};

use anyhow::Result;
use clap::Parser;
use client_core::{
    load_settings, ClientSettings, PredictionClient, PredictionController, PredictionState,
};
use shared::domain::{optional_field, PredictionResult, VehicleAttributes};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Estimate a vehicle's CO2 emissions. Every vehicle field is optional.
#[derive(Parser, Debug)]
#[command(name = "co2-predict")]
struct Args {
    #[arg(long)]
    make: Option<String>,
    #[arg(long)]
    vehicle_class: Option<String>,
    /// Litres.
    #[arg(long)]
    engine_size: Option<String>,
    #[arg(long)]
    cylinders: Option<String>,
    #[arg(long)]
    transmission: Option<String>,
    #[arg(long)]
    fuel_type: Option<String>,
    /// L/100km.
    #[arg(long)]
    fuel_city: Option<String>,
    /// L/100km.
    #[arg(long)]
    fuel_hwy: Option<String>,
    /// L/100km.
    #[arg(long)]
    fuel_comb: Option<String>,
    /// Prediction endpoint; overrides the settings file and environment.
    #[arg(long)]
    endpoint: Option<String>,
    /// Pause before sending, in milliseconds.
    #[arg(long)]
    delay_ms: Option<u64>,
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print the settled state as JSON instead of text.
    #[arg(long)]
    json: bool,
}

impl Args {
    fn attributes(&self) -> VehicleAttributes {
        let field = |value: &Option<String>| value.as_deref().and_then(optional_field);
        VehicleAttributes {
            make: field(&self.make),
            vehicle_class: field(&self.vehicle_class),
            engine_size: field(&self.engine_size),
            cylinders: field(&self.cylinders),
            transmission: field(&self.transmission),
            fuel_type: field(&self.fuel_type),
            fuel_consumption_city: field(&self.fuel_city),
            fuel_consumption_hwy: field(&self.fuel_hwy),
            fuel_consumption_comb: field(&self.fuel_comb),
        }
    }
}

fn render_result(result: &PredictionResult) -> String {
    let mut out = format!(
        "Estimated CO2 emissions: {:.2} g/km\n",
        result.co2_emissions_prediction
    );
    if !result.reduction_tips.is_empty() {
        out.push_str("Reduction tips:\n");
        for (index, tip) in result.reduction_tips.iter().enumerate() {
            out.push_str(&format!("  {}. {tip}\n", index + 1));
        }
    }
    out
}

fn render_state(state: &PredictionState) -> String {
    match state {
        PredictionState::Succeeded(result) => render_result(result),
        PredictionState::Failed(message) => format!("Error: {message}\n"),
        PredictionState::Idle | PredictionState::Submitting => String::new(),
    }
}

fn state_json(state: &PredictionState) -> serde_json::Value {
    match state {
        PredictionState::Succeeded(result) => serde_json::json!({ "result": result, "error": null }),
        PredictionState::Failed(message) => serde_json::json!({ "result": null, "error": message }),
        PredictionState::Idle | PredictionState::Submitting => {
            serde_json::json!({ "result": null, "error": null })
        }
    }
}

/// Settings file and environment first, then flags.
fn resolve_settings(args: &Args) -> Result<ClientSettings> {
    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(endpoint) = &args.endpoint {
        settings.endpoint = endpoint.clone();
        settings.validate()?;
    }
    if let Some(delay_ms) = args.delay_ms {
        settings.submit_delay_ms = delay_ms;
    }
    info!(
        endpoint = %settings.endpoint,
        submit_delay_ms = settings.submit_delay_ms,
        provided = args.attributes().provided_count(),
        "submitting prediction"
    );
    Ok(settings)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let settings = resolve_settings(&args)?;
    let controller = PredictionController::with_submit_delay(
        Arc::new(PredictionClient::new(settings.endpoint.clone())),
        Duration::from_millis(settings.submit_delay_ms),
    );
    let settlement = controller.submit(args.attributes()).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&state_json(&settlement.state))?);
    } else {
        print!("{}", render_state(&settlement.state));
    }

    Ok(match settlement.state {
        PredictionState::Succeeded(_) => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    })
}
