//! Visual theme
//!
//! Dark clinical palette applied once at startup.

use egui::{Color32, Rounding};

/// Colors and spacing shared by every component
#[derive(Clone)]
pub struct Theme {
    pub bg_primary: Color32,
    pub bg_secondary: Color32,
    pub bg_tertiary: Color32,

    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_muted: Color32,

    /// Accent color for primary actions
    pub primary: Color32,
    /// Bubble fill for user messages
    pub user_bubble: Color32,
    /// Bubble fill for assistant messages
    pub assistant_bubble: Color32,
    /// Active speech-capture indicator
    pub listening: Color32,
    pub warning: Color32,
    pub error: Color32,

    pub spacing: f32,
    pub spacing_sm: f32,
    pub spacing_lg: f32,

    pub card_rounding: Rounding,
    pub bubble_rounding: Rounding,
    pub button_rounding: Rounding,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            bg_primary: Color32::from_rgb(16, 20, 26),
            bg_secondary: Color32::from_rgb(24, 30, 38),
            bg_tertiary: Color32::from_rgb(34, 42, 52),

            text_primary: Color32::from_rgb(226, 232, 240),
            text_secondary: Color32::from_rgb(170, 180, 192),
            text_muted: Color32::from_rgb(110, 120, 134),

            primary: Color32::from_rgb(45, 156, 219),
            user_bubble: Color32::from_rgb(36, 99, 160),
            assistant_bubble: Color32::from_rgb(30, 38, 48),
            listening: Color32::from_rgb(220, 70, 70),
            warning: Color32::from_rgb(222, 170, 60),
            error: Color32::from_rgb(220, 70, 70),

            spacing: 12.0,
            spacing_sm: 6.0,
            spacing_lg: 24.0,

            card_rounding: Rounding::same(8.0),
            bubble_rounding: Rounding::same(10.0),
            button_rounding: Rounding::same(6.0),
        }
    }

    /// Apply the theme to the egui context
    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = egui::Visuals::dark();
        visuals.panel_fill = self.bg_primary;
        visuals.window_fill = self.bg_secondary;
        visuals.override_text_color = Some(self.text_primary);
        ctx.set_visuals(visuals);
    }
}
