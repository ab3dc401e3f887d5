use thiserror::Error;

pub const REQUEST_FAILED_MESSAGE: &str = "Failed to get prediction. Please try again.";
pub const UNKNOWN_FAILURE_MESSAGE: &str = "An unknown error occurred";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredictionError {
    /// The service answered with a non-2xx status. The status is kept for
    /// logging only; users see the fixed message.
    #[error("Failed to get prediction. Please try again.")]
    RequestFailed { status: u16 },
    #[error("{0}")]
    Network(String),
    /// The 2xx body was not JSON at all.
    #[error("{0}")]
    Decode(String),
    /// The 2xx body was JSON but not a prediction.
    #[error("malformed prediction response: {0}")]
    MalformedResponse(String),
    #[error("An unknown error occurred")]
    Unknown,
}

impl PredictionError {
    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        Self::Network(innermost_message(err))
    }

    /// Text shown in the page's alert region.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(message) | Self::Decode(message) if message.trim().is_empty() => {
                UNKNOWN_FAILURE_MESSAGE.to_string()
            }
            other => other.to_string(),
        }
    }
}

/// reqwest wraps the interesting part ("Connection refused", DNS failures)
/// a few sources deep.
fn innermost_message(err: &(dyn std::error::Error + 'static)) -> String {
    let mut current = err;
    while let Some(source) = current.source() {
        current = source;
    }
    current.to_string()
}
