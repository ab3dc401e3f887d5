//! Vehicle form. Every field is optional free text.

use eframe::egui;
use serde::{Deserialize, Serialize};
use shared::domain::{optional_field, VehicleAttributes};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormDraft {
    pub make: String,
    pub vehicle_class: String,
    pub engine_size: String,
    pub cylinders: String,
    pub transmission: String,
    pub fuel_type: String,
    pub fuel_consumption_city: String,
    pub fuel_consumption_hwy: String,
    pub fuel_consumption_comb: String,
}

impl FormDraft {
    pub fn to_attributes(&self) -> VehicleAttributes {
        VehicleAttributes {
            make: optional_field(&self.make),
            vehicle_class: optional_field(&self.vehicle_class),
            engine_size: optional_field(&self.engine_size),
            cylinders: optional_field(&self.cylinders),
            transmission: optional_field(&self.transmission),
            fuel_type: optional_field(&self.fuel_type),
            fuel_consumption_city: optional_field(&self.fuel_consumption_city),
            fuel_consumption_hwy: optional_field(&self.fuel_consumption_hwy),
            fuel_consumption_comb: optional_field(&self.fuel_consumption_comb),
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn fields_mut(&mut self) -> [(&'static str, &'static str, &mut String); 9] {
        [
            ("Make", "e.g. Toyota", &mut self.make),
            ("Vehicle class", "e.g. COMPACT", &mut self.vehicle_class),
            ("Engine size (L)", "e.g. 2.0", &mut self.engine_size),
            ("Cylinders", "e.g. 4", &mut self.cylinders),
            ("Transmission", "e.g. AS6", &mut self.transmission),
            ("Fuel type", "X, Z, D, E or N", &mut self.fuel_type),
            (
                "Fuel consumption city (L/100 km)",
                "e.g. 9.9",
                &mut self.fuel_consumption_city,
            ),
            (
                "Fuel consumption highway (L/100 km)",
                "e.g. 6.7",
                &mut self.fuel_consumption_hwy,
            ),
            (
                "Fuel consumption combined (L/100 km)",
                "e.g. 8.5",
                &mut self.fuel_consumption_comb,
            ),
        ]
    }
}

pub enum FormAction {
    None,
    Submit,
    Clear,
}

pub fn show_vehicle_form(
    ui: &mut egui::Ui,
    draft: &mut FormDraft,
    enabled: bool,
    loading: bool,
) -> FormAction {
    let mut enter_pressed = false;

    ui.add_enabled_ui(enabled, |ui| {
        egui::Grid::new("vehicle_form")
            .num_columns(2)
            .spacing([16.0, 8.0])
            .striped(false)
            .show(ui, |ui| {
                for (label, hint, value) in draft.fields_mut() {
                    ui.label(label);
                    let response = ui.add(
                        egui::TextEdit::singleline(value)
                            .hint_text(hint)
                            .desired_width(260.0),
                    );
                    if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        enter_pressed = true;
                    }
                    ui.end_row();
                }
            });
    });

    ui.add_space(12.0);

    let mut action = FormAction::None;
    ui.horizontal(|ui| {
        let label = if loading { "Predicting..." } else { "Predict emissions" };
        let predict = egui::Button::new(egui::RichText::new(label).strong())
            .min_size(egui::vec2(180.0, 32.0));
        if ui.add_enabled(enabled, predict).clicked() || (enabled && enter_pressed) {
            action = FormAction::Submit;
        }
        if loading {
            ui.spinner();
        }
        if ui.add_enabled(enabled, egui::Button::new("Clear")).clicked() {
            action = FormAction::Clear;
        }
    });
    action
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_fields_become_absent_attributes() {
        let draft = FormDraft {
            make: "  Toyota ".to_string(),
            fuel_type: "   ".to_string(),
            engine_size: "2.5".to_string(),
            ..FormDraft::default()
        };
        let attributes = draft.to_attributes();
        assert_eq!(attributes.make.as_deref(), Some("Toyota"));
        assert_eq!(attributes.fuel_type, None);
        assert_eq!(attributes.engine_size.as_deref(), Some("2.5"));
        assert_eq!(attributes.provided_count(), 2);
    }

    #[test]
    fn empty_draft_submits_empty_record() {
        assert_eq!(FormDraft::default().to_attributes(), VehicleAttributes::default());
    }

    #[test]
    fn persisted_draft_tolerates_missing_fields() {
        let draft: FormDraft = serde_json::from_str(r#"{"make":"Honda"}"#).expect("decode");
        assert_eq!(draft.make, "Honda");
        assert!(draft.cylinders.is_empty());
    }

    #[test]
    fn clear_resets_every_field() {
        let mut draft = FormDraft {
            make: "Kia".to_string(),
            cylinders: "4".to_string(),
            ..FormDraft::default()
        };
        draft.clear();
        assert_eq!(draft, FormDraft::default());
    }
}
