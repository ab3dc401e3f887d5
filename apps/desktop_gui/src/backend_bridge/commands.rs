//! Backend commands queued from UI to backend worker.

use shared::domain::VehicleAttributes;

pub enum BackendCommand {
    Submit { attributes: VehicleAttributes },
    Reset,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Submit { .. } => "submit",
            Self::Reset => "reset",
        }
    }
}
