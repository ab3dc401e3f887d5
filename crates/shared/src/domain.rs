use serde::{Deserialize, Serialize};

/// Vehicle description submitted for a prediction.
///
/// Every field is optional free text exactly as the user typed it; absent
/// fields are left out of the JSON body entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleAttributes {
    #[serde(rename = "Make", default, skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    #[serde(
        rename = "Vehicle_Class",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub vehicle_class: Option<String>,
    #[serde(
        rename = "Engine_Size",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub engine_size: Option<String>,
    #[serde(rename = "Cylinders", default, skip_serializing_if = "Option::is_none")]
    pub cylinders: Option<String>,
    #[serde(
        rename = "Transmission",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub transmission: Option<String>,
    #[serde(rename = "Fuel_Type", default, skip_serializing_if = "Option::is_none")]
    pub fuel_type: Option<String>,
    #[serde(
        rename = "Fuel_Consumption_City",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub fuel_consumption_city: Option<String>,
    #[serde(
        rename = "Fuel_Consumption_Hwy",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub fuel_consumption_hwy: Option<String>,
    #[serde(
        rename = "Fuel_Consumption_Comb",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub fuel_consumption_comb: Option<String>,
}

impl VehicleAttributes {
    /// Wire name and value of every attribute, in form order.
    pub fn entries(&self) -> [(&'static str, Option<&str>); 9] {
        [
            ("Make", self.make.as_deref()),
            ("Vehicle_Class", self.vehicle_class.as_deref()),
            ("Engine_Size", self.engine_size.as_deref()),
            ("Cylinders", self.cylinders.as_deref()),
            ("Transmission", self.transmission.as_deref()),
            ("Fuel_Type", self.fuel_type.as_deref()),
            ("Fuel_Consumption_City", self.fuel_consumption_city.as_deref()),
            ("Fuel_Consumption_Hwy", self.fuel_consumption_hwy.as_deref()),
            ("Fuel_Consumption_Comb", self.fuel_consumption_comb.as_deref()),
        ]
    }

    pub fn provided_count(&self) -> usize {
        self.entries()
            .iter()
            .filter(|(_, value)| value.is_some())
            .count()
    }
}

/// Normalizes raw form input: blank text means "not provided".
pub fn optional_field(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Estimated emissions in g/km.
    #[serde(rename = "CO2_Emissions_Prediction")]
    pub co2_emissions_prediction: f64,
    /// Display order matters.
    #[serde(rename = "Reduction_Tips")]
    pub reduction_tips: Vec<String>,
}
