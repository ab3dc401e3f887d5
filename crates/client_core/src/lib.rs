//! Client side of the CO2 predictor: the HTTP transport to the prediction
//! service and the controller that drives one page's submission lifecycle.

pub mod controller;
pub mod error;
pub mod settings;
pub mod transport;

pub use controller::{PredictionController, PredictionState, Settlement, DEFAULT_SUBMIT_DELAY};
pub use error::{PredictionError, REQUEST_FAILED_MESSAGE, UNKNOWN_FAILURE_MESSAGE};
pub use settings::{load_settings, ClientSettings};
pub use transport::{PredictionClient, PredictionTransport};

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
