//! Patient profile form
//!
//! All four fields are mandatory; validation errors keep the form open.

use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, RichText, Vec2};

pub struct PatientFormView<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> PatientFormView<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        let text = self.state.language.ui();
        ui.vertical_centered(|ui| {
            ui.add_space(80.0);

            ui.label(
                RichText::new(text.patient_profile_title)
                    .size(24.0)
                    .strong()
                    .color(self.theme.text_primary),
            );

            ui.label(
                RichText::new(text.patient_profile_hint)
                    .size(13.0)
                    .color(self.theme.text_muted),
            );

            ui.add_space(self.theme.spacing_lg);

            egui::Frame::none()
                .fill(self.theme.bg_secondary)
                .rounding(self.theme.card_rounding)
                .inner_margin(self.theme.spacing_lg)
                .show(ui, |ui| {
                    ui.set_width(360.0);

                    let form = &mut self.state.patient_form;
                    Self::field(ui, text.field_name, &mut form.name);
                    Self::field(ui, text.field_age, &mut form.age);
                    Self::field(ui, text.field_gender, &mut form.gender);
                    Self::field(ui, text.field_phone, &mut form.phone);

                    if let Some(error) = &form.error {
                        ui.add_space(self.theme.spacing_sm);
                        ui.label(RichText::new(error).size(12.0).color(self.theme.error));
                    }

                    ui.add_space(self.theme.spacing);

                    ui.horizontal(|ui| {
                        let submit = egui::Button::new(
                            RichText::new(text.continue_button).color(egui::Color32::WHITE),
                        )
                        .min_size(Vec2::new(120.0, 36.0))
                        .rounding(self.theme.button_rounding)
                        .fill(self.theme.primary);

                        if ui.add(submit).clicked() {
                            self.state.submit_patient_form();
                        }
                    });
                });
        });
    }

    fn field(ui: &mut egui::Ui, label: &str, value: &mut String) {
        ui.horizontal(|ui| {
            ui.label(RichText::new(label).size(13.0));
        });
        ui.add(
            egui::TextEdit::singleline(value)
                .desired_width(f32::INFINITY)
                .margin(egui::Margin::symmetric(8.0, 6.0)),
        );
        ui.add_space(6.0);
    }
}
