use async_trait::async_trait;
use reqwest::Client;
use shared::domain::{PredictionResult, VehicleAttributes};
use tracing::warn;

use crate::error::PredictionError;

#[async_trait]
pub trait PredictionTransport: Send + Sync {
    async fn predict(
        &self,
        attributes: &VehicleAttributes,
    ) -> Result<PredictionResult, PredictionError>;
}

/// Posts vehicle attributes to the prediction service. One request per call,
/// no retries and no timeout.
pub struct PredictionClient {
    http: Client,
    endpoint: String,
}

impl PredictionClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_http_client(Client::new(), endpoint)
    }

    pub fn with_http_client(http: Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl PredictionTransport for PredictionClient {
    async fn predict(
        &self,
        attributes: &VehicleAttributes,
    ) -> Result<PredictionResult, PredictionError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(attributes)
            .send()
            .await
            .map_err(|err| PredictionError::from_reqwest(&err))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                status = status.as_u16(),
                %body,
                endpoint = %self.endpoint,
                "prediction service rejected request"
            );
            return Err(PredictionError::RequestFailed {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| PredictionError::from_reqwest(&err))?;
        decode_prediction(&body)
    }
}

/// Parses a 2xx body and checks it has the prediction shape.
pub fn decode_prediction(body: &[u8]) -> Result<PredictionResult, PredictionError> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|err| PredictionError::Decode(err.to_string()))?;
    if !value.is_object() {
        return Err(PredictionError::MalformedResponse(format!(
            "expected a JSON object, got {value}"
        )));
    }
    serde_json::from_value(value).map_err(|err| PredictionError::MalformedResponse(err.to_string()))
}
