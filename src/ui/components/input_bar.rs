//! Input bar component
//!
//! Draft text entry with speech capture, the staged image indicator, the
//! structured data buttons, and the formal document request.

use crate::session::DataCategory;
use crate::speech::ListeningState;
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, Key, RichText, Vec2};

pub struct InputBar<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> InputBar<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing)
            .show(ui, |ui| {
                ui.vertical(|ui| {
                    self.show_action_row(ui);
                    ui.add_space(self.theme.spacing_sm);

                    if self.state.staged_attachment.is_some() {
                        self.show_attachment_row(ui);
                        ui.add_space(self.theme.spacing_sm);
                    }

                    ui.horizontal(|ui| {
                        self.show_capture_button(ui);
                        ui.add_space(self.theme.spacing_sm);
                        self.show_text_input(ui);
                        ui.add_space(self.theme.spacing_sm);
                        self.show_send_button(ui);
                    });
                });
            });
    }

    /// Structured data categories and the document request
    fn show_action_row(&mut self, ui: &mut egui::Ui) {
        let language = self.state.language;
        ui.horizontal(|ui| {
            for category in DataCategory::ALL {
                let button = egui::Button::new(
                    RichText::new(category.label(language))
                        .size(12.0)
                        .color(self.theme.text_secondary),
                )
                .rounding(self.theme.button_rounding)
                .fill(self.theme.bg_tertiary);

                if ui.add_enabled(!self.state.is_loading, button).clicked() {
                    self.state.open_data_entry(category);
                }
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let button = egui::Button::new(
                    RichText::new(language.ui().report_button)
                        .size(12.0)
                        .color(self.theme.text_secondary),
                )
                .rounding(self.theme.button_rounding)
                .fill(self.theme.bg_tertiary);

                if ui
                    .add_enabled(!self.state.is_loading, button)
                    .on_hover_text(language.ui().report_tooltip)
                    .clicked()
                {
                    self.state.request_document();
                }
            });
        });
    }

    fn show_attachment_row(&mut self, ui: &mut egui::Ui) {
        let text = self.state.language.ui();
        let mime = self
            .state
            .staged_attachment
            .as_ref()
            .map(|a| a.mime_type.clone())
            .unwrap_or_default();

        ui.horizontal(|ui| {
            ui.label(RichText::new("🖼").size(16.0));
            ui.label(
                RichText::new(format!("{} ({})", text.attached_scan, mime))
                    .size(12.0)
                    .color(self.theme.text_secondary),
            );
            if ui
                .small_button("✕")
                .on_hover_text(text.remove_attachment)
                .clicked()
            {
                self.state.staged_attachment = None;
            }
        });
    }

    fn show_capture_button(&mut self, ui: &mut egui::Ui) {
        let text = self.state.language.ui();
        let listening = self.state.listening == ListeningState::Listening;
        let (icon, tooltip, color) = if listening {
            ("⏹", text.stop_listening_tooltip, self.theme.listening)
        } else {
            ("🎤", text.dictate_tooltip, self.theme.text_secondary)
        };

        let button = egui::Button::new(RichText::new(icon).size(20.0).color(color))
            .min_size(Vec2::splat(44.0))
            .rounding(self.theme.button_rounding);

        let button = if listening {
            button.fill(self.theme.listening.gamma_multiply(0.2))
        } else {
            button
        };

        if ui.add(button).on_hover_text(tooltip).clicked() {
            self.state.toggle_capture();
        }

        if listening {
            ui.ctx().request_repaint();
        }
    }

    fn show_text_input(&mut self, ui: &mut egui::Ui) {
        let available_width = ui.available_width() - 60.0;
        let hint = self.state.language.ui().input_hint;

        let text_edit = egui::TextEdit::singleline(&mut self.state.input_text)
            .hint_text(hint)
            .desired_width(available_width)
            .font(egui::TextStyle::Body)
            .margin(egui::Margin::symmetric(12.0, 8.0));

        let response = ui.add_enabled(!self.state.is_loading, text_edit);

        if response.has_focus() {
            let enter_pressed = ui.input(|i| i.key_pressed(Key::Enter));
            if enter_pressed {
                self.state.send_message();
            }
        }
    }

    fn show_send_button(&mut self, ui: &mut egui::Ui) {
        let can_send = !self.state.is_loading
            && (!self.state.input_text.trim().is_empty()
                || self.state.staged_attachment.is_some());

        let button_color = if can_send {
            self.theme.primary
        } else {
            self.theme.text_muted
        };

        let button = egui::Button::new(
            RichText::new("➤").size(18.0).color(egui::Color32::WHITE),
        )
        .min_size(Vec2::splat(44.0))
        .rounding(self.theme.button_rounding)
        .fill(button_color);

        if ui
            .add_enabled(can_send, button)
            .on_hover_text(self.state.language.ui().send_tooltip)
            .clicked()
        {
            self.state.send_message();
        }
    }
}
