//! Bridge between the egui thread and the async prediction controller.

pub mod commands;
pub mod runtime;
