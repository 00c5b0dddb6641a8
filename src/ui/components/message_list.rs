//! Message list component
//!
//! Renders the conversation log with per-message playback controls on
//! assistant turns and a typing indicator while a request is in flight.

use crate::messages::{Message, Role};
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, Align, Color32, RichText, Vec2};

pub struct MessageList<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> MessageList<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        let messages = self
            .state
            .log
            .as_ref()
            .map(|log| log.get_all())
            .unwrap_or_default();

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                ui.vertical(|ui| {
                    ui.add_space(self.theme.spacing);

                    for message in &messages {
                        self.show_message(ui, message);
                        ui.add_space(self.theme.spacing_sm);
                    }

                    if self.state.is_loading {
                        self.show_typing_indicator(ui);
                    }

                    ui.add_space(self.theme.spacing);
                });
            });
    }

    fn show_message(&mut self, ui: &mut egui::Ui, message: &Message) {
        let is_user = message.role == Role::User;
        let bubble_color = if is_user {
            self.theme.user_bubble
        } else {
            self.theme.assistant_bubble
        };
        let text_color = if is_user {
            Color32::WHITE
        } else {
            self.theme.text_primary
        };
        let align = if is_user { Align::RIGHT } else { Align::LEFT };

        let text = self.state.language.ui();

        ui.with_layout(egui::Layout::top_down(align), |ui| {
            ui.label(
                RichText::new(if is_user { text.you_label } else { text.doctor_name })
                    .size(12.0)
                    .color(self.theme.text_muted),
            );

            ui.add_space(2.0);

            let max_width = ui.available_width() * 0.75;

            egui::Frame::none()
                .fill(bubble_color)
                .rounding(self.theme.bubble_rounding)
                .inner_margin(egui::Margin::symmetric(12.0, 8.0))
                .show(ui, |ui| {
                    ui.set_max_width(max_width);

                    if let Some(attachment) = &message.attachment {
                        ui.horizontal(|ui| {
                            ui.label(RichText::new("🖼").size(20.0));
                            ui.label(
                                RichText::new(&attachment.mime_type)
                                    .size(11.0)
                                    .color(text_color.gamma_multiply(0.8)),
                            );
                        });
                        ui.add_space(4.0);
                    }

                    if !message.text.is_empty() {
                        ui.label(RichText::new(&message.text).color(text_color));
                    }

                    if !is_user && !message.text.is_empty() {
                        ui.add_space(4.0);
                        self.show_play_button(ui, message);
                    }
                });

            let time_str = message.timestamp.format("%H:%M").to_string();
            ui.label(
                RichText::new(time_str)
                    .size(10.0)
                    .color(self.theme.text_muted),
            );
        });
    }

    fn show_play_button(&mut self, ui: &mut egui::Ui, message: &Message) {
        let text = self.state.language.ui();
        let playing = self.state.playing_id() == Some(message.id);
        let (icon, tooltip) = if playing {
            ("⏹", text.stop_playback_tooltip)
        } else {
            ("🔊", text.read_aloud_tooltip)
        };

        let button = egui::Button::new(
            RichText::new(icon).size(14.0).color(self.theme.text_secondary),
        )
        .min_size(Vec2::splat(26.0))
        .rounding(self.theme.button_rounding)
        .fill(self.theme.bg_tertiary);

        if ui.add(button).on_hover_text(tooltip).clicked() {
            self.state.toggle_play(message.id, &message.text);
        }
    }

    fn show_typing_indicator(&self, ui: &mut egui::Ui) {
        let text = self.state.language.ui();
        ui.with_layout(egui::Layout::top_down(Align::LEFT), |ui| {
            ui.label(
                RichText::new(text.doctor_name)
                    .size(12.0)
                    .color(self.theme.text_muted),
            );

            ui.add_space(2.0);

            egui::Frame::none()
                .fill(self.theme.assistant_bubble)
                .rounding(self.theme.bubble_rounding)
                .inner_margin(egui::Margin::symmetric(12.0, 8.0))
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        for i in 0..3 {
                            let t = ui.ctx().input(|input| input.time);
                            let alpha = ((t * 3.0 + i as f64 * 0.5).sin() * 0.5 + 0.5) as f32;
                            ui.label(
                                RichText::new("●")
                                    .size(10.0)
                                    .color(self.theme.text_muted.gamma_multiply(alpha)),
                            );
                        }
                    });
                });
        });

        ui.ctx().request_repaint();
    }
}
