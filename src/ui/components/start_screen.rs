//! Landing screen
//!
//! Language selection and the entry point into a consultation. Starting is
//! blocked with a visible notice when no API key was resolved at startup.

use crate::language::Language;
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, RichText, Vec2};

pub struct StartScreen<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> StartScreen<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        let text = self.state.language.ui();
        ui.vertical_centered(|ui| {
            ui.add_space(120.0);

            ui.label(
                RichText::new("MedGrid")
                    .size(32.0)
                    .strong()
                    .color(self.theme.text_primary),
            );

            ui.label(
                RichText::new(text.subtitle)
                    .size(16.0)
                    .color(self.theme.text_muted),
            );

            ui.add_space(self.theme.spacing_lg);

            // Language selection
            ui.horizontal(|ui| {
                ui.with_layout(
                    egui::Layout::top_down(egui::Align::Center),
                    |ui| {
                        ui.horizontal(|ui| {
                            self.language_button(ui, Language::En, "English");
                            self.language_button(ui, Language::Zh, "中文");
                        });
                    },
                );
            });

            ui.add_space(self.theme.spacing_lg);

            if !self.state.config.can_start() {
                ui.label(
                    RichText::new(text.missing_key_hint)
                        .size(13.0)
                        .color(self.theme.warning),
                );
                ui.add_space(self.theme.spacing);
            }

            let start = egui::Button::new(
                RichText::new(text.begin_consultation)
                    .size(16.0)
                    .color(egui::Color32::WHITE),
            )
            .min_size(Vec2::new(220.0, 44.0))
            .rounding(self.theme.button_rounding)
            .fill(self.theme.primary);

            if ui.add_enabled(self.state.config.can_start(), start).clicked() {
                self.state.begin_session();
            }
        });
    }

    fn language_button(&mut self, ui: &mut egui::Ui, language: Language, label: &str) {
        let selected = self.state.language == language;
        let fill = if selected {
            self.theme.primary
        } else {
            self.theme.bg_tertiary
        };

        let button = egui::Button::new(
            RichText::new(label).size(14.0).color(self.theme.text_primary),
        )
        .min_size(Vec2::new(90.0, 32.0))
        .rounding(self.theme.button_rounding)
        .fill(fill);

        if ui.add(button).clicked() {
            self.state.set_language(language);
        }
    }
}
