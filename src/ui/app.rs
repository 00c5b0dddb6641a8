//! Main application struct and eframe integration

use crate::language::Language;
use crate::messages::ImageAttachment;
use crate::speech::ListeningState;
use crate::ui::components::{InputBar, MessageList, PatientFormView, StartScreen};
use crate::ui::state::{AppState, Screen};
use crate::ui::theme::Theme;
use egui::{self, CentralPanel, RichText, TopBottomPanel, Vec2};
use tracing::warn;

/// Main diagnostic interface application
pub struct MedGridApp {
    state: AppState,
    theme: Theme,
}

impl MedGridApp {
    pub fn new(cc: &eframe::CreationContext<'_>, state: AppState) -> Self {
        let theme = Theme::dark();
        theme.apply(&cc.egui_ctx);
        Self { state, theme }
    }

    /// Stage a dropped image file as the next message's attachment
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        if self.state.screen != Screen::Chat {
            return;
        }

        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        for file in dropped {
            let attachment = if let Some(path) = &file.path {
                ImageAttachment::from_file(path)
            } else if let Some(bytes) = &file.bytes {
                Ok(ImageAttachment::from_bytes(bytes, "image/png"))
            } else {
                continue;
            };

            match attachment {
                Ok(attachment) => {
                    self.state.staged_attachment = Some(attachment);
                }
                Err(e) => {
                    warn!("Ignoring dropped file: {}", e);
                    self.state.last_error =
                        Some(e.user_message(self.state.language).to_string());
                }
            }
        }
    }

    fn show_header(&mut self, ctx: &egui::Context) {
        TopBottomPanel::top("header")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_secondary)
                    .inner_margin(12.0),
            )
            .show(ctx, |ui| {
                let text = self.state.language.ui();
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new("MedGrid")
                            .size(20.0)
                            .strong()
                            .color(self.theme.text_primary),
                    );
                    ui.label(
                        RichText::new(text.subtitle)
                            .size(14.0)
                            .color(self.theme.text_muted),
                    );

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if self.state.screen == Screen::Chat {
                            if ui
                                .button("🗑")
                                .on_hover_text(text.end_consultation_tooltip)
                                .clicked()
                            {
                                self.state.confirm_end = true;
                            }
                        }

                        let other = match self.state.language {
                            Language::En => (Language::Zh, "中文"),
                            Language::Zh => (Language::En, "English"),
                        };
                        if ui
                            .button(other.1)
                            .on_hover_text(text.switch_language_tooltip)
                            .clicked()
                        {
                            self.state.set_language(other.0);
                        }
                    });
                });
            });
    }

    fn show_content(&mut self, ctx: &egui::Context) {
        match self.state.screen {
            Screen::Start => {
                CentralPanel::default()
                    .frame(egui::Frame::none().fill(self.theme.bg_primary))
                    .show(ctx, |ui| {
                        StartScreen::new(&mut self.state, &self.theme).show(ui);
                    });
            }
            Screen::PatientForm => {
                CentralPanel::default()
                    .frame(egui::Frame::none().fill(self.theme.bg_primary))
                    .show(ctx, |ui| {
                        PatientFormView::new(&mut self.state, &self.theme).show(ui);
                    });
            }
            Screen::Chat => {
                TopBottomPanel::bottom("input_area")
                    .frame(
                        egui::Frame::none()
                            .fill(self.theme.bg_primary)
                            .inner_margin(self.theme.spacing),
                    )
                    .show(ctx, |ui| {
                        InputBar::new(&mut self.state, &self.theme).show(ui);
                    });

                CentralPanel::default()
                    .frame(egui::Frame::none().fill(self.theme.bg_primary))
                    .show(ctx, |ui| {
                        MessageList::new(&mut self.state, &self.theme).show(ui);
                    });
            }
        }
    }

    fn show_data_entry_dialog(&mut self, ctx: &egui::Context) {
        let text = self.state.language.ui();
        let Some(entry) = &mut self.state.data_entry else {
            return;
        };
        let title = entry.category.label(self.state.language).to_string();

        let mut open = true;
        let mut submit = false;
        let mut cancel = false;

        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .anchor(egui::Align2::CENTER_CENTER, Vec2::ZERO)
            .show(ctx, |ui| {
                ui.add(
                    egui::TextEdit::multiline(&mut entry.value)
                        .hint_text(text.data_entry_hint)
                        .desired_rows(4)
                        .desired_width(320.0),
                );
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button(text.submit_button).clicked() {
                        submit = true;
                    }
                    if ui.button(text.cancel_button).clicked() {
                        cancel = true;
                    }
                });
            });

        if submit {
            self.state.submit_data_entry();
        } else if cancel || !open {
            self.state.data_entry = None;
        }
    }

    fn show_confirm_end_dialog(&mut self, ctx: &egui::Context) {
        if !self.state.confirm_end {
            return;
        }

        let text = self.state.language.ui();
        egui::Window::new(text.confirm_end_title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(text.confirm_end_body);
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button(text.end_session_button).clicked() {
                        self.state.end_session();
                    }
                    if ui.button(text.keep_going_button).clicked() {
                        self.state.confirm_end = false;
                    }
                });
            });
    }

    fn show_capture_notice(&mut self, ctx: &egui::Context) {
        if !self.state.capture_notice {
            return;
        }

        let text = self.state.language.ui();
        egui::Window::new(text.capture_notice_title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(text.capture_notice_body);
                ui.add_space(8.0);
                if ui.button(text.ok_button).clicked() {
                    self.state.capture_notice = false;
                }
            });
    }

    fn show_error_toast(&mut self, ctx: &egui::Context) {
        let Some(message) = self.state.last_error.clone() else {
            return;
        };

        let text = self.state.language.ui();
        egui::Window::new(text.error_title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_BOTTOM, Vec2::new(0.0, -24.0))
            .show(ctx, |ui| {
                ui.label(RichText::new(message).color(self.theme.error));
                if ui.button(text.dismiss_button).clicked() {
                    self.state.last_error = None;
                }
            });
    }
}

impl eframe::App for MedGridApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll_events();
        self.handle_dropped_files(ctx);

        self.show_header(ctx);
        self.show_content(ctx);
        self.show_data_entry_dialog(ctx);
        self.show_confirm_end_dialog(ctx);
        self.show_capture_notice(ctx);
        self.show_error_toast(ctx);

        // Keep polling worker events while anything is in motion
        if self.state.is_loading
            || self.state.playing_id().is_some()
            || self.state.listening == ListeningState::Listening
        {
            ctx.request_repaint_after(std::time::Duration::from_millis(50));
        } else {
            ctx.request_repaint_after(std::time::Duration::from_millis(250));
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.state.shutdown();
    }
}
