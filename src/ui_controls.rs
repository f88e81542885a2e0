use egui::{Color32, Frame, Margin, RichText, Rounding, Stroke, Ui, Vec2};

use crate::theme::AppTheme;

pub fn action_bar_frame(theme: &AppTheme) -> Frame {
    Frame::none()
        .fill(theme.surfaces.panel_bg)
        .rounding(Rounding::ZERO)
        .inner_margin(Margin::symmetric(
            theme.layout.panel_padding_x,
            theme.layout.panel_padding_y,
        ))
}

pub fn snippet_frame(theme: &AppTheme) -> Frame {
    Frame::none()
        .fill(theme.surfaces.card_bg_alt)
        .rounding(Rounding::same(theme.controls.panel_rounding))
        .stroke(Stroke::new(1.0, theme.surfaces.stroke_soft))
        .inner_margin(Margin::symmetric(
            theme.layout.space_3,
            theme.layout.space_2,
        ))
}

pub fn primary_button(
    ui: &mut Ui,
    theme: &AppTheme,
    label: &str,
    min_size: Vec2,
) -> egui::Response {
    ui.add(
        egui::Button::new(RichText::new(label).strong().color(theme.text.primary))
            .min_size(min_size)
            .fill(theme.surfaces.accent_soft)
            .stroke(Stroke::new(1.0, theme.surfaces.accent))
            .rounding(Rounding::same(theme.controls.button_rounding)),
    )
}

pub fn ghost_button(ui: &mut Ui, theme: &AppTheme, label: &str, min_size: Vec2) -> egui::Response {
    ui.add(
        egui::Button::new(RichText::new(label).color(theme.text.secondary))
            .min_size(min_size)
            .fill(theme.surfaces.card_bg_alt)
            .stroke(Stroke::new(1.0, theme.surfaces.stroke_soft))
            .rounding(Rounding::same(theme.controls.button_rounding)),
    )
}

pub fn subtle_badge(ui: &mut Ui, theme: &AppTheme, text: &str) {
    let label = RichText::new(text)
        .size(12.0)
        .color(theme.text.accent)
        .strong();
    Frame::none()
        .fill(Color32::from_rgba_unmultiplied(
            theme.surfaces.accent.r(),
            theme.surfaces.accent.g(),
            theme.surfaces.accent.b(),
            34,
        ))
        .rounding(Rounding::same(10.0))
        .stroke(Stroke::new(1.0, theme.surfaces.accent_soft))
        .inner_margin(Margin::symmetric(8.0, 4.0))
        .show(ui, |ui| {
            ui.label(label);
        });
}

pub fn keycap(ui: &mut Ui, theme: &AppTheme, label: &str) {
    Frame::none()
        .fill(Color32::from_rgba_unmultiplied(255, 255, 255, 18))
        .stroke(Stroke::new(
            1.0,
            Color32::from_rgba_unmultiplied(255, 255, 255, 40),
        ))
        .rounding(Rounding::same(5.0))
        .inner_margin(Margin::symmetric(6.0, 2.0))
        .show(ui, |ui| {
            ui.label(
                RichText::new(label)
                    .size(11.0)
                    .strong()
                    .color(theme.text.secondary),
            );
        });
}
