use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use shared::domain::{PredictionResult, VehicleAttributes};
use tokio::sync::{mpsc, oneshot};

use super::*;
use crate::error::{PredictionError, REQUEST_FAILED_MESSAGE, UNKNOWN_FAILURE_MESSAGE};

type Outcome = Result<PredictionResult, PredictionError>;

/// Each call waits on the next queued gate; the test decides when and how it
/// settles.
struct ScriptedTransport {
    gates: Mutex<VecDeque<oneshot::Receiver<Outcome>>>,
    calls: AtomicUsize,
    started: mpsc::UnboundedSender<usize>,
}

impl ScriptedTransport {
    fn new(gate_count: usize) -> (Arc<Self>, Vec<oneshot::Sender<Outcome>>, mpsc::UnboundedReceiver<usize>) {
        let mut senders = Vec::with_capacity(gate_count);
        let mut gates = VecDeque::with_capacity(gate_count);
        for _ in 0..gate_count {
            let (tx, rx) = oneshot::channel();
            senders.push(tx);
            gates.push_back(rx);
        }
        let (started, started_rx) = mpsc::unbounded_channel();
        let transport = Arc::new(Self {
            gates: Mutex::new(gates),
            calls: AtomicUsize::new(0),
            started,
        });
        (transport, senders, started_rx)
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PredictionTransport for ScriptedTransport {
    async fn predict(&self, _attributes: &VehicleAttributes) -> Outcome {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gates.lock().expect("gates").pop_front();
        let _ = self.started.send(call);
        match gate {
            Some(gate) => gate.await.unwrap_or(Err(PredictionError::Unknown)),
            None => Err(PredictionError::Unknown),
        }
    }
}

struct FixedTransport(Outcome);

#[async_trait]
impl PredictionTransport for FixedTransport {
    async fn predict(&self, _attributes: &VehicleAttributes) -> Outcome {
        self.0.clone()
    }
}

struct PanickingTransport;

#[async_trait]
impl PredictionTransport for PanickingTransport {
    async fn predict(&self, _attributes: &VehicleAttributes) -> Outcome {
        panic!("transport blew up");
    }
}

fn prediction(value: f64, tips: &[&str]) -> PredictionResult {
    PredictionResult {
        co2_emissions_prediction: value,
        reduction_tips: tips.iter().map(|tip| tip.to_string()).collect(),
    }
}

fn toyota() -> VehicleAttributes {
    VehicleAttributes {
        make: Some("Toyota".to_string()),
        fuel_type: Some("Gasoline".to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn loading_only_while_request_is_in_flight() {
    let (transport, mut gates, mut started) = ScriptedTransport::new(1);
    let controller = PredictionController::with_submit_delay(transport, Duration::ZERO);
    assert!(!controller.state().is_loading());

    let handle = controller.spawn_submit(toyota());
    started.recv().await.expect("request started");
    assert_eq!(controller.state(), PredictionState::Submitting);
    assert!(controller.state().is_loading());

    let expected = prediction(180.5, &["Reduce idling", "Maintain tire pressure"]);
    gates
        .remove(0)
        .send(Ok(expected.clone()))
        .expect("settle request");
    let settlement = handle.await.expect("join");

    assert!(!settlement.superseded);
    let state = controller.state();
    assert!(!state.is_loading());
    assert_eq!(state.result(), Some(&expected));
    assert_eq!(state.error(), None);
}

#[tokio::test]
async fn subscribers_see_submitting_then_outcome() {
    let controller = PredictionController::with_submit_delay(
        Arc::new(FixedTransport(Err(PredictionError::RequestFailed {
            status: 500,
        }))),
        Duration::ZERO,
    );
    let mut updates = controller.subscribe();

    let handle = controller.spawn_submit(VehicleAttributes::default());
    let mut seen = Vec::new();
    while updates.changed().await.is_ok() {
        let state = updates.borrow_and_update().clone();
        let settled = state.is_settled();
        seen.push(state);
        if settled {
            break;
        }
    }
    handle.await.expect("join");

    assert_eq!(
        seen.last(),
        Some(&PredictionState::Failed(REQUEST_FAILED_MESSAGE.to_string()))
    );
    assert!(seen
        .iter()
        .all(|state| *state == PredictionState::Submitting || state.is_settled()));
}

#[tokio::test]
async fn connection_error_text_becomes_the_error() {
    let controller = PredictionController::with_submit_delay(
        Arc::new(FixedTransport(Err(PredictionError::Network(
            "ECONNREFUSED".to_string(),
        )))),
        Duration::ZERO,
    );

    let settlement = controller.submit(toyota()).await;

    assert_eq!(
        settlement.state,
        PredictionState::Failed("ECONNREFUSED".to_string())
    );
    assert_eq!(controller.state().error(), Some("ECONNREFUSED"));
    assert!(!controller.state().is_loading());
}

#[tokio::test]
async fn failure_without_text_uses_unknown_message() {
    let controller = PredictionController::with_submit_delay(
        Arc::new(FixedTransport(Err(PredictionError::Network(String::new())))),
        Duration::ZERO,
    );

    controller.submit(toyota()).await;

    assert_eq!(controller.state().error(), Some(UNKNOWN_FAILURE_MESSAGE));
}

#[tokio::test]
async fn stale_outcome_is_discarded_when_newer_submission_settled_first() {
    let (transport, mut gates, mut started) = ScriptedTransport::new(2);
    let controller = PredictionController::with_submit_delay(transport.clone(), Duration::ZERO);

    let first = controller.spawn_submit(toyota());
    started.recv().await.expect("first started");
    let second = controller.spawn_submit(VehicleAttributes::default());
    started.recv().await.expect("second started");
    assert_eq!(transport.calls(), 2);

    let second_gate = gates.remove(1);
    let first_gate = gates.remove(0);

    let newest = prediction(120.0, &["Keep it up"]);
    second_gate
        .send(Ok(newest.clone()))
        .expect("settle second");
    let second = second.await.expect("join second");
    assert!(!second.superseded);
    assert_eq!(controller.state(), PredictionState::Succeeded(newest.clone()));

    first_gate
        .send(Err(PredictionError::RequestFailed { status: 500 }))
        .expect("settle first");
    let first = first.await.expect("join first");
    assert!(first.superseded);
    assert_eq!(
        first.state,
        PredictionState::Failed(REQUEST_FAILED_MESSAGE.to_string())
    );

    assert_eq!(controller.state(), PredictionState::Succeeded(newest));
}

#[tokio::test]
async fn older_submission_settling_first_leaves_newer_one_loading() {
    let (transport, mut gates, mut started) = ScriptedTransport::new(2);
    let controller = PredictionController::with_submit_delay(transport, Duration::ZERO);

    let first = controller.spawn_submit(toyota());
    started.recv().await.expect("first started");
    let second = controller.spawn_submit(toyota());
    started.recv().await.expect("second started");

    let second_gate = gates.remove(1);
    let first_gate = gates.remove(0);

    first_gate
        .send(Ok(prediction(1.0, &[])))
        .expect("settle first");
    assert!(first.await.expect("join first").superseded);
    assert!(controller.state().is_loading());

    second_gate
        .send(Ok(prediction(2.0, &[])))
        .expect("settle second");
    second.await.expect("join second");
    assert_eq!(
        controller.state().result().map(|r| r.co2_emissions_prediction),
        Some(2.0)
    );
}

#[tokio::test]
async fn new_submission_clears_previous_error() {
    let (transport, mut gates, mut started) = ScriptedTransport::new(2);
    let controller = PredictionController::with_submit_delay(transport, Duration::ZERO);

    let first = controller.spawn_submit(toyota());
    started.recv().await.expect("first started");
    gates
        .remove(0)
        .send(Err(PredictionError::RequestFailed { status: 502 }))
        .expect("settle first");
    first.await.expect("join first");
    assert_eq!(controller.state().error(), Some(REQUEST_FAILED_MESSAGE));

    let second = controller.spawn_submit(toyota());
    started.recv().await.expect("second started");
    assert_eq!(controller.state().error(), None);
    assert!(controller.state().is_loading());

    gates
        .remove(0)
        .send(Ok(prediction(95.0, &[])))
        .expect("settle second");
    second.await.expect("join second");
    assert_eq!(controller.state().error(), None);
}

#[tokio::test]
async fn reset_discards_in_flight_outcome() {
    let (transport, mut gates, mut started) = ScriptedTransport::new(1);
    let controller = PredictionController::with_submit_delay(transport, Duration::ZERO);

    let handle = controller.spawn_submit(toyota());
    started.recv().await.expect("started");
    controller.reset();
    assert_eq!(controller.state(), PredictionState::Idle);

    gates
        .remove(0)
        .send(Ok(prediction(200.0, &[])))
        .expect("settle");
    let settlement = handle.await.expect("join");

    assert!(settlement.superseded);
    assert_eq!(controller.state(), PredictionState::Idle);
}

#[tokio::test(start_paused = true)]
async fn request_waits_for_submit_delay() {
    let (transport, mut gates, _started) = ScriptedTransport::new(1);
    let controller = PredictionController::new(transport.clone());
    assert_eq!(controller.submit_delay(), DEFAULT_SUBMIT_DELAY);

    let handle = controller.spawn_submit(toyota());
    tokio::time::sleep(Duration::from_millis(999)).await;
    assert_eq!(transport.calls(), 0);
    assert_eq!(controller.state(), PredictionState::Idle);

    tokio::time::sleep(Duration::from_millis(2)).await;
    assert_eq!(transport.calls(), 1);
    assert!(controller.state().is_loading());

    gates
        .remove(0)
        .send(Ok(prediction(150.0, &[])))
        .expect("settle");
    handle.await.expect("join");
    assert!(!controller.state().is_loading());
}

#[tokio::test]
async fn unexpected_failure_still_leaves_loading_state() {
    let controller =
        PredictionController::with_submit_delay(Arc::new(PanickingTransport), Duration::ZERO);

    let joined = controller.spawn_submit(toyota()).await;

    assert!(joined.is_err());
    let state = controller.state();
    assert!(!state.is_loading());
    assert_eq!(state.error(), Some(UNKNOWN_FAILURE_MESSAGE));
}
