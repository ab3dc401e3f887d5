//! Prediction logic behind `POST /co2_predict`: request coercion, the
//! emissions estimate and the reduction-tip rules.

use std::sync::Arc;

use shared::{
    domain::{PredictionResult, VehicleAttributes},
    error::{ApiException, ErrorCode},
};

pub const LOW_EMISSIONS_TIP: &str =
    "Your car already has relatively low CO₂ emissions. Keep maintaining it for optimal performance!";

/// A fully specified vehicle, with numeric fields coerced from their text form.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleFeatures {
    pub make: String,
    pub vehicle_class: String,
    pub engine_size: f64,
    pub cylinders: i64,
    pub transmission: String,
    pub fuel_type: String,
    pub fuel_consumption_city: f64,
    pub fuel_consumption_hwy: f64,
    pub fuel_consumption_comb: f64,
}

impl TryFrom<&VehicleAttributes> for VehicleFeatures {
    type Error = ApiException;

    fn try_from(attributes: &VehicleAttributes) -> Result<Self, Self::Error> {
        let mut problems = Vec::new();

        let missing: Vec<&str> = attributes
            .entries()
            .iter()
            .filter(|(_, value)| value.map(str::trim).map_or(true, str::is_empty))
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            problems.push(format!("missing fields: {}", missing.join(", ")));
        }

        let engine_size = parse_float("Engine_Size", &attributes.engine_size, &mut problems);
        let cylinders = parse_int("Cylinders", &attributes.cylinders, &mut problems);
        let fuel_consumption_city = parse_float(
            "Fuel_Consumption_City",
            &attributes.fuel_consumption_city,
            &mut problems,
        );
        let fuel_consumption_hwy = parse_float(
            "Fuel_Consumption_Hwy",
            &attributes.fuel_consumption_hwy,
            &mut problems,
        );
        let fuel_consumption_comb = parse_float(
            "Fuel_Consumption_Comb",
            &attributes.fuel_consumption_comb,
            &mut problems,
        );

        if !problems.is_empty() {
            return Err(ApiException::new(
                ErrorCode::Validation,
                problems.join("; "),
            ));
        }

        Ok(Self {
            make: text(&attributes.make),
            vehicle_class: text(&attributes.vehicle_class),
            engine_size,
            cylinders,
            transmission: text(&attributes.transmission),
            fuel_type: text(&attributes.fuel_type),
            fuel_consumption_city,
            fuel_consumption_hwy,
            fuel_consumption_comb,
        })
    }
}

fn text(value: &Option<String>) -> String {
    value.as_deref().unwrap_or_default().trim().to_string()
}

// Missing values are reported once, by the missing-field check.
fn parse_float(name: &str, value: &Option<String>, problems: &mut Vec<String>) -> f64 {
    let Some(raw) = value.as_deref().map(str::trim).filter(|raw| !raw.is_empty()) else {
        return 0.0;
    };
    match raw.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() && parsed >= 0.0 => parsed,
        Ok(parsed) if parsed.is_finite() => {
            problems.push(format!("{name} must not be negative, got '{raw}'"));
            0.0
        }
        _ => {
            problems.push(format!("{name} must be a number, got '{raw}'"));
            0.0
        }
    }
}

fn parse_int(name: &str, value: &Option<String>, problems: &mut Vec<String>) -> i64 {
    let Some(raw) = value.as_deref().map(str::trim).filter(|raw| !raw.is_empty()) else {
        return 0;
    };
    if let Ok(parsed) = raw.parse::<i64>() {
        return parsed;
    }
    match raw.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() && parsed.fract() == 0.0 => parsed as i64,
        _ => {
            problems.push(format!("{name} must be a whole number, got '{raw}'"));
            0
        }
    }
}

pub trait EmissionsEstimator: Send + Sync {
    /// Estimated tailpipe CO2 in g/km.
    fn estimate(&self, features: &VehicleFeatures) -> Result<f64, ApiException>;
}

/// Combined consumption (L/100km) times the CO2 released per litre of fuel.
pub struct FuelFactorEstimator;

impl FuelFactorEstimator {
    /// g/km per L/100km, keyed by the fuel codes the service accepts.
    pub fn factor(fuel_type: &str) -> f64 {
        match fuel_type.trim().to_ascii_uppercase().as_str() {
            "D" => 26.8,
            "E" => 16.1,
            "N" => 16.5,
            _ => 23.2,
        }
    }
}

impl EmissionsEstimator for FuelFactorEstimator {
    fn estimate(&self, features: &VehicleFeatures) -> Result<f64, ApiException> {
        let estimate = features.fuel_consumption_comb * Self::factor(&features.fuel_type);
        if !estimate.is_finite() || estimate < 0.0 {
            return Err(ApiException::new(
                ErrorCode::Internal,
                format!("estimate out of range: {estimate}"),
            ));
        }
        Ok(estimate)
    }
}

pub fn reduction_tips(features: &VehicleFeatures) -> Vec<String> {
    let mut tips = Vec::new();

    if features.engine_size > 2.5 {
        tips.push(
            "Consider a smaller engine size or a hybrid vehicle to reduce CO₂ emissions."
                .to_string(),
        );
    }
    if features.cylinders > 4 {
        tips.push(
            "Opt for a car with fewer cylinders, as higher-cylinder engines consume more fuel."
                .to_string(),
        );
    }
    if features.transmission.starts_with('M') {
        tips.push(
            "Manual transmissions can sometimes be more fuel-efficient, but modern automatic cars may offer better efficiency."
                .to_string(),
        );
    }
    if matches!(features.fuel_type.as_str(), "Z" | "D") {
        tips.push(
            "Consider switching to an electric or hybrid vehicle to drastically lower emissions."
                .to_string(),
        );
    }
    if features.fuel_consumption_comb > 8.0 {
        tips.push(
            "Improve fuel efficiency by maintaining steady speeds and reducing unnecessary acceleration."
                .to_string(),
        );
    }

    if tips.is_empty() {
        tips.push(LOW_EMISSIONS_TIP.to_string());
    }
    tips
}

#[derive(Clone)]
pub struct ApiContext {
    pub estimator: Arc<dyn EmissionsEstimator>,
}

impl Default for ApiContext {
    fn default() -> Self {
        Self {
            estimator: Arc::new(FuelFactorEstimator),
        }
    }
}

pub fn predict(
    ctx: &ApiContext,
    attributes: &VehicleAttributes,
) -> Result<PredictionResult, ApiException> {
    let features = VehicleFeatures::try_from(attributes)?;
    let co2_emissions_prediction = ctx.estimator.estimate(&features)?;
    Ok(PredictionResult {
        co2_emissions_prediction,
        reduction_tips: reduction_tips(&features),
    })
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
