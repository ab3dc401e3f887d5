//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{ClientSettings, PredictionClient, PredictionController};
use crossbeam_channel::{Receiver, Sender};
use futures::StreamExt;
use tokio_stream::wrappers::WatchStream;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

/// Starts the backend worker thread. It owns the tokio runtime and the
/// prediction controller, turns commands into submissions and forwards every
/// state snapshot back to the UI.
pub fn launch(settings: ClientSettings, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let controller = PredictionController::with_submit_delay(
                Arc::new(PredictionClient::new(settings.endpoint.clone())),
                settings.submit_delay(),
            );

            let mut states = WatchStream::new(controller.subscribe());
            let state_tx = ui_tx.clone();
            tokio::spawn(async move {
                while let Some(state) = states.next().await {
                    if state_tx.send(UiEvent::StateChanged(state)).is_err() {
                        break;
                    }
                }
            });

            let _ = ui_tx.try_send(UiEvent::Info(format!(
                "Ready. Predictions are sent to {}",
                settings.endpoint
            )));
            tracing::info!(endpoint = %settings.endpoint, "backend worker ready");

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::Submit { attributes } => {
                        controller.spawn_submit(attributes);
                    }
                    BackendCommand::Reset => controller.reset(),
                }
            }
            tracing::debug!("ui command channel closed; backend worker exiting");
        });
    });
}
