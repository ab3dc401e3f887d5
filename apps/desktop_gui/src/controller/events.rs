//! UI/backend events and error modeling for desktop GUI controller.

use client_core::PredictionState;

pub enum UiEvent {
    Info(String),
    StateChanged(PredictionState),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Startup,
    Transport,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Dispatch,
}

/// Failures of the app itself. Prediction failures are not `UiError`s; they
/// arrive as `PredictionState::Failed` and render in the page's alert region.
#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if context == UiErrorContext::BackendStartup
            || message_lower.contains("startup failure")
        {
            UiErrorCategory::Startup
        } else if message_lower.contains("timeout")
            || message_lower.contains("connection")
            || message_lower.contains("network")
            || message_lower.contains("disconnect")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    /// Startup failures and a lost backend leave nothing to submit to.
    pub fn disables_form(&self) -> bool {
        matches!(
            self.category(),
            UiErrorCategory::Startup | UiErrorCategory::Transport
        )
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
