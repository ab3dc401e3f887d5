//! Submission lifecycle for the prediction page.
//!
//! The controller owns a single [`PredictionState`] snapshot published through a
//! `watch` channel. Every submission takes a token from a monotonically
//! increasing counter; only the holder of the latest token may publish, so an
//! older request that settles late can never overwrite a newer one.

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use shared::domain::{PredictionResult, VehicleAttributes};
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::{error::UNKNOWN_FAILURE_MESSAGE, transport::PredictionTransport};

pub const DEFAULT_SUBMIT_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Default, PartialEq)]
pub enum PredictionState {
    #[default]
    Idle,
    Submitting,
    Succeeded(PredictionResult),
    Failed(String),
}

impl PredictionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Submitting)
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        match self {
            Self::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Succeeded(_) | Self::Failed(_))
    }
}

/// What one submission settled into.
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    pub token: u64,
    pub state: PredictionState,
    /// A newer submission (or a reset) took over before this one settled, so
    /// `state` was not published.
    pub superseded: bool,
}

pub struct PredictionController {
    transport: Arc<dyn PredictionTransport>,
    submit_delay: Duration,
    latest_token: AtomicU64,
    state: watch::Sender<PredictionState>,
}

impl PredictionController {
    pub fn new(transport: Arc<dyn PredictionTransport>) -> Arc<Self> {
        Self::with_submit_delay(transport, DEFAULT_SUBMIT_DELAY)
    }

    pub fn with_submit_delay(
        transport: Arc<dyn PredictionTransport>,
        submit_delay: Duration,
    ) -> Arc<Self> {
        let (state, _) = watch::channel(PredictionState::Idle);
        Arc::new(Self {
            transport,
            submit_delay,
            latest_token: AtomicU64::new(0),
            state,
        })
    }

    pub fn submit_delay(&self) -> Duration {
        self.submit_delay
    }

    pub fn state(&self) -> PredictionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PredictionState> {
        self.state.subscribe()
    }

    /// Back to `Idle`. Anything still in flight keeps running but its outcome
    /// is dropped.
    pub fn reset(&self) {
        let token = self.next_token();
        debug!(token, "prediction state reset");
        self.state.send_replace(PredictionState::Idle);
    }

    pub async fn submit(&self, attributes: VehicleAttributes) -> Settlement {
        let token = self.next_token();

        if !self.submit_delay.is_zero() {
            tokio::time::sleep(self.submit_delay).await;
        }

        match serde_json::to_string(&attributes) {
            Ok(payload) => info!(token, %payload, "sending prediction request"),
            Err(_) => info!(token, ?attributes, "sending prediction request"),
        }

        self.publish(token, PredictionState::Submitting);
        let mut guard = SubmittingGuard {
            controller: self,
            token,
            armed: true,
        };

        let state = match self.transport.predict(&attributes).await {
            Ok(result) => {
                info!(
                    token,
                    co2_emissions_prediction = result.co2_emissions_prediction,
                    reduction_tips = result.reduction_tips.len(),
                    "received prediction"
                );
                PredictionState::Succeeded(result)
            }
            Err(err) => {
                warn!(token, error = %err, "prediction request failed");
                PredictionState::Failed(err.user_message())
            }
        };

        guard.armed = false;
        let published = self.publish(token, state.clone());
        if !published {
            debug!(token, "discarding outcome of superseded submission");
        }

        Settlement {
            token,
            state,
            superseded: !published,
        }
    }

    /// Runs [`submit`](Self::submit) on the current runtime. Overlapping
    /// submissions are allowed; the latest one wins.
    pub fn spawn_submit(self: &Arc<Self>, attributes: VehicleAttributes) -> JoinHandle<Settlement> {
        let controller = Arc::clone(self);
        tokio::spawn(async move { controller.submit(attributes).await })
    }

    fn next_token(&self) -> u64 {
        self.latest_token.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn publish(&self, token: u64, next: PredictionState) -> bool {
        self.state.send_if_modified(|current| {
            if self.latest_token.load(Ordering::SeqCst) != token {
                return false;
            }
            *current = next;
            true
        })
    }
}

/// Leaves `Submitting` if the submission future is dropped or unwinds before
/// it settles.
struct SubmittingGuard<'a> {
    controller: &'a PredictionController,
    token: u64,
    armed: bool,
}

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            warn!(token = self.token, "prediction submission ended without settling");
            self.controller.publish(
                self.token,
                PredictionState::Failed(UNKNOWN_FAILURE_MESSAGE.to_string()),
            );
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
