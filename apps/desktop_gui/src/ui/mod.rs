//! UI layer for desktop GUI: page shell, vehicle form and results panel.

pub mod app;
pub mod form;
pub mod results;

pub use app::PredictorApp;
