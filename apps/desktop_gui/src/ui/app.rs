use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use eframe::egui;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::{UiError, UiErrorContext, UiEvent},
    orchestration::dispatch_backend_command,
    reducer::PageModel,
};
use crate::ui::{
    form::{show_vehicle_form, FormAction, FormDraft},
    results::{show_alert, show_results},
};

pub const DRAFT_STORAGE_KEY: &str = "co2_predictor.form_draft";

const INTRO: &str = "Enter your vehicle details below to get an estimate of CO2 emissions and \
personalized suggestions for reducing your carbon footprint. All fields are optional, but \
providing more information will result in a more accurate prediction.";

pub struct PredictorApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    draft: FormDraft,
    model: PageModel,
}

impl PredictorApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        persisted_draft: Option<FormDraft>,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            draft: persisted_draft.unwrap_or_default(),
            model: PageModel::new(),
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            self.model.apply(event);
        }
    }

    fn dispatch(&mut self, cmd: BackendCommand) {
        if !dispatch_backend_command(&self.cmd_tx, cmd, &mut self.model.status) {
            let err = UiError::from_message(UiErrorContext::Dispatch, self.model.status.clone());
            self.model.apply(UiEvent::Error(err));
        }
    }

    fn submit(&mut self) {
        let attributes = self.draft.to_attributes();
        self.dispatch(BackendCommand::Submit { attributes });
    }

    fn clear(&mut self) {
        self.draft.clear();
        self.dispatch(BackendCommand::Reset);
    }

    fn show_page(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.small("Status:");
                ui.small(egui::RichText::new(&self.model.status).weak());
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.heading(
                        egui::RichText::new("CO2 Emissions Predictor")
                            .size(30.0)
                            .strong(),
                    );
                });
                ui.add_space(16.0);

                if let Some(banner) = &self.model.banner {
                    show_alert(ui, banner);
                    ui.add_space(12.0);
                }

                egui::Frame::group(ui.style())
                    .inner_margin(18)
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.label(egui::RichText::new("Vehicle Information").size(20.0).strong());
                        ui.add_space(4.0);
                        ui.label(egui::RichText::new(INTRO).weak());
                        ui.add_space(12.0);

                        let action = show_vehicle_form(
                            ui,
                            &mut self.draft,
                            self.model.can_submit(),
                            self.model.is_loading(),
                        );
                        match action {
                            FormAction::Submit => self.submit(),
                            FormAction::Clear => self.clear(),
                            FormAction::None => {}
                        }
                    });

                ui.add_space(16.0);

                if let Some(message) = self.model.alert() {
                    show_alert(ui, message);
                    ui.add_space(12.0);
                }

                if let Some(result) = self.model.result() {
                    show_results(ui, result);
                }
            });
        });
    }
}

impl eframe::App for PredictorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.show_page(ctx);

        if self.model.is_loading() {
            ctx.request_repaint_after(Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        if let Ok(serialized) = serde_json::to_string(&self.draft) {
            storage.set_string(DRAFT_STORAGE_KEY, serialized);
        }
    }
}
