use eframe::egui;
use shared::domain::PredictionResult;

const ALERT_FILL: egui::Color32 = egui::Color32::from_rgb(254, 242, 242);
const ALERT_STROKE: egui::Color32 = egui::Color32::from_rgb(254, 202, 202);
const ALERT_TEXT: egui::Color32 = egui::Color32::from_rgb(185, 28, 28);
const ACCENT: egui::Color32 = egui::Color32::from_rgb(21, 128, 61);

pub fn format_emissions(value: f64) -> String {
    format!("{value:.2} g/km")
}

/// Inline alert. No dismiss and no retry; resubmitting the form is the retry.
pub fn show_alert(ui: &mut egui::Ui, message: &str) {
    egui::Frame::new()
        .fill(ALERT_FILL)
        .stroke(egui::Stroke::new(1.0, ALERT_STROKE))
        .corner_radius(6)
        .inner_margin(12)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.colored_label(ALERT_TEXT, message);
        });
}

pub fn show_results(ui: &mut egui::Ui, result: &PredictionResult) {
    egui::Frame::group(ui.style())
        .inner_margin(16)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(egui::RichText::new("Estimated CO2 emissions").strong());
            ui.label(
                egui::RichText::new(format_emissions(result.co2_emissions_prediction))
                    .size(32.0)
                    .color(ACCENT)
                    .strong(),
            );

            if !result.reduction_tips.is_empty() {
                ui.add_space(10.0);
                ui.label(egui::RichText::new("Reduction tips").strong());
                for (index, tip) in result.reduction_tips.iter().enumerate() {
                    ui.horizontal_wrapped(|ui| {
                        ui.label(format!("{}.", index + 1));
                        ui.label(tip.as_str());
                    });
                }
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emissions_use_two_decimals() {
        assert_eq!(format_emissions(180.5), "180.50 g/km");
        assert_eq!(format_emissions(153.123), "153.12 g/km");
    }
}
