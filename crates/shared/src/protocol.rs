//! Routes and fixed endpoints shared by the client and the prediction service.

/// Hosted prediction service used when no endpoint is configured.
pub const DEFAULT_PREDICTION_ENDPOINT: &str =
    "https://underlying-tiffany-ziad-2007-547ae087.koyeb.app/co2_predict";

pub fn predict_route() -> &'static str {
    "/co2_predict"
}

pub fn health_route() -> &'static str {
    "/healthz"
}

/// Builds the prediction endpoint for a service rooted at `base_url`.
pub fn prediction_endpoint(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), predict_route())
}
