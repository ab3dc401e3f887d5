use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use shared::{
    domain::{PredictionResult, VehicleAttributes},
    error::{ApiError, ErrorCode},
    protocol::{health_route, predict_route},
};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod config;

use api::ApiContext;
use config::load_settings;

#[derive(Clone)]
struct AppState {
    api: ApiContext,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings();
    let state = AppState {
        api: ApiContext::default(),
    };
    let app = build_router(Arc::new(state), settings.max_body_bytes);

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "prediction service listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    Router::new()
        .route(health_route(), get(healthz))
        .route(predict_route(), post(http_predict))
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

fn status_for(code: &ErrorCode) -> StatusCode {
    match code {
        ErrorCode::Validation => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

async fn http_predict(
    State(state): State<Arc<AppState>>,
    Json(attributes): Json<VehicleAttributes>,
) -> Result<Json<PredictionResult>, (StatusCode, Json<ApiError>)> {
    let provided = attributes.provided_count();
    match api::predict(&state.api, &attributes) {
        Ok(result) => {
            info!(
                provided,
                co2_emissions_prediction = result.co2_emissions_prediction,
                tips = result.reduction_tips.len(),
                "prediction served"
            );
            Ok(Json(result))
        }
        Err(err) => {
            warn!(provided, error = %err, "prediction rejected");
            let body = ApiError::from(err);
            Err((status_for(&body.code), Json(body)))
        }
    }
}
