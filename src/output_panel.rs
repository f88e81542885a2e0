use egui::{vec2, Align, Layout, RichText, Ui};

use crate::state::EditorState;
use crate::theme::AppTheme;
use crate::ui_controls;

pub struct OutputPanelAction {
    pub copy: bool,
    pub symmetric: bool,
    pub clear: bool,
    pub fit: bool,
}

pub fn zoom_label(scale: f32) -> String {
    format!("{:.0}%", scale * 100.0)
}

/// Bottom bar: the serialized watermark area (re-rendered every frame from the
/// current quad) plus the actions that operate on it.
pub fn show_output_panel(
    ui: &mut Ui,
    state: &EditorState,
    snippet: &str,
    copied_feedback: bool,
    theme: &AppTheme,
) -> OutputPanelAction {
    let mut out = OutputPanelAction {
        copy: false,
        symmetric: false,
        clear: false,
        fit: false,
    };

    let action_h = theme.controls.action_height;

    ui.vertical(|ui| {
        ui_controls::snippet_frame(theme).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.add(
                egui::Label::new(RichText::new(snippet).monospace().color(theme.text.primary))
                    .selectable(true),
            );
        });

        ui.add_space(theme.layout.space_2);

        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing = vec2(theme.layout.space_2, 0.0);

            let quad_closed = state.markers.is_complete();
            let square_button = ui.add_enabled_ui(quad_closed, |ui| {
                ui_controls::ghost_button(ui, theme, "Square up", vec2(104.0, action_h))
            });
            if square_button.inner.clicked() {
                out.symmetric = true;
            }

            let clear_button = ui.add_enabled_ui(!state.markers.is_empty(), |ui| {
                ui_controls::ghost_button(ui, theme, "Clear", vec2(80.0, action_h))
            });
            if clear_button.inner.clicked() {
                out.clear = true;
            }

            let fit_button = ui.add_enabled_ui(state.image.is_some(), |ui| {
                ui_controls::ghost_button(ui, theme, "Fit", vec2(64.0, action_h))
            });
            if fit_button.inner.clicked() {
                out.fit = true;
            }

            ui.add_space(theme.layout.space_3);
            ui.label(
                RichText::new(zoom_label(state.camera.scale))
                    .size(12.0)
                    .color(theme.text.muted),
            );

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                ui.add_space(theme.layout.space_1);
                ui_controls::keycap(ui, theme, "C");
                ui.add_space(theme.layout.space_1);
                ui_controls::keycap(ui, theme, "⌘");
                ui.add_space(theme.layout.space_3);

                // Copy always sends exactly what the preview shows, including
                // the empty rectangle before the quad is closed.
                let copy_text = if copied_feedback { "Copied" } else { "Copy" };
                if ui_controls::primary_button(ui, theme, copy_text, vec2(96.0, action_h)).clicked()
                {
                    out.copy = true;
                }

                if copied_feedback {
                    ui.add_space(theme.layout.space_2);
                    ui_controls::subtle_badge(ui, theme, "clipboard updated");
                }
            });
        });
    });

    out
}

#[cfg(test)]
mod tests {
    use super::zoom_label;

    #[test]
    fn zoom_label_rounds_to_whole_percent() {
        assert_eq!(zoom_label(1.0), "100%");
        assert_eq!(zoom_label(0.374), "37%");
        assert_eq!(zoom_label(2.5), "250%");
    }
}
