//! Folds backend events into the page model the UI renders from.

use client_core::PredictionState;
use shared::domain::PredictionResult;

use crate::controller::events::{UiErrorContext, UiEvent};

#[derive(Debug, Default)]
pub struct PageModel {
    pub prediction: PredictionState,
    pub status: String,
    /// App-level failure (backend never started). Not the prediction alert.
    pub banner: Option<String>,
    pub backend_ready: bool,
}

impl PageModel {
    pub fn new() -> Self {
        Self {
            status: "Starting backend worker...".to_string(),
            ..Self::default()
        }
    }

    pub fn is_loading(&self) -> bool {
        self.prediction.is_loading()
    }

    /// The form stays usable while idle or settled; it is disabled while a
    /// request is in flight or when there is no backend to send to.
    pub fn can_submit(&self) -> bool {
        self.backend_ready && !self.is_loading()
    }

    pub fn alert(&self) -> Option<&str> {
        self.prediction.error()
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        self.prediction.result()
    }

    pub fn apply(&mut self, event: UiEvent) {
        match event {
            UiEvent::Info(message) => {
                self.backend_ready = true;
                self.status = message;
            }
            UiEvent::StateChanged(state) => {
                self.status = match &state {
                    PredictionState::Idle => "Ready".to_string(),
                    PredictionState::Submitting => "Predicting...".to_string(),
                    PredictionState::Succeeded(_) => "Prediction received".to_string(),
                    PredictionState::Failed(_) => "Prediction failed".to_string(),
                };
                self.prediction = state;
            }
            UiEvent::Error(err) => {
                if err.disables_form() {
                    self.backend_ready = false;
                    self.banner = Some(match err.context() {
                        UiErrorContext::BackendStartup => err.message().to_string(),
                        UiErrorContext::Dispatch => {
                            format!("Lost the backend worker: {}", err.message())
                        }
                    });
                }
                self.status = err.message().to_string();
            }
        }
    }
}
