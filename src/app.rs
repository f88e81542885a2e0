use anyhow::Result;
use eframe::egui::{self, Context as EguiContext, Key, TopBottomPanel};
use eframe::{App, Frame};

use crate::canvas;
use crate::clipboard::{self, DecodeEvent, PasteDecoder};
use crate::export;
use crate::output_panel;
use crate::state::EditorState;
use crate::theme::{self, AppTheme};
use crate::ui_controls;

pub struct QuadMarkApp {
    pub state: EditorState,
    decoder: PasteDecoder,
    copy_feedback_until: Option<f64>,
    theme: AppTheme,
}

impl QuadMarkApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let theme = theme::dark_theme();
        theme::apply_theme(&cc.egui_ctx, &theme);

        Self {
            state: EditorState::default(),
            decoder: PasteDecoder::default(),
            copy_feedback_until: None,
            theme,
        }
    }

    /// Applies finished clipboard decodes. Failures leave the session exactly
    /// as it was: the previous image, markers and camera all stay live.
    fn process_decode_events(&mut self) {
        while let Some(event) = self.decoder.poll() {
            match event {
                DecodeEvent::Ready { image, .. } => {
                    self.state.reset_for_new_image(image);
                }
                DecodeEvent::Failed { error, .. } => {
                    log::warn!("clipboard paste ignored: {error}");
                }
            }
        }
    }

    fn handle_shortcuts(&mut self, ctx: &EguiContext) {
        if ctx.wants_keyboard_input() {
            return;
        }

        let cmd = ctx.input(|input| input.modifiers.command || input.modifiers.ctrl);

        if cmd {
            if ctx.input(|input| input.key_pressed(Key::V)) {
                self.decoder.request_paste();
            }
            if ctx.input(|input| input.key_pressed(Key::C)) {
                self.copy_snippet(ctx);
            }
            if ctx.input(|input| input.key_pressed(Key::Num0)) {
                self.state.fit_view_request = true;
            }
            return;
        }

        if ctx.input(|input| input.key_pressed(Key::Delete) || input.key_pressed(Key::Backspace)) {
            self.state.clear_markers();
        }
    }

    /// Copies the displayed snippet verbatim. A clipboard failure is logged
    /// and otherwise invisible: the output text and session are untouched.
    fn copy_snippet(&mut self, ctx: &EguiContext) {
        match self.try_copy_snippet() {
            Ok(()) => {
                self.copy_feedback_until = Some(ctx.input(|input| input.time) + 1.5);
            }
            Err(err) => {
                log::warn!("cannot copy snippet to clipboard: {err:#}");
            }
        }
    }

    fn try_copy_snippet(&self) -> Result<()> {
        let snippet = export::watermark_snippet(&self.state.watermark_rect());
        clipboard::write_text(&snippet)
    }
}

impl App for QuadMarkApp {
    fn update(&mut self, ctx: &EguiContext, _frame: &mut Frame) {
        // Decode completions land before any input handling, so a fresh image
        // is fully installed (markers cleared, refit pending) by the time this
        // frame's pointer events run.
        self.process_decode_events();
        self.handle_shortcuts(ctx);

        let snippet = export::watermark_snippet(&self.state.watermark_rect());
        let copied_feedback = self
            .copy_feedback_until
            .is_some_and(|deadline| ctx.input(|input| input.time) <= deadline);

        let action = TopBottomPanel::bottom("output_panel")
            .exact_height(self.theme.layout.action_bar_height)
            .frame(ui_controls::action_bar_frame(&self.theme))
            .show(ctx, |ui| {
                output_panel::show_output_panel(ui, &self.state, &snippet, copied_feedback, &self.theme)
            })
            .inner;

        egui::CentralPanel::default()
            .frame(
                egui::Frame::none()
                    .fill(self.theme.surfaces.app_bg)
                    .inner_margin(egui::Margin::symmetric(
                        self.theme.layout.panel_padding_x,
                        self.theme.layout.panel_padding_y,
                    )),
            )
            .show(ctx, |ui| {
                canvas::show_canvas(ui, ctx, &mut self.state, &self.theme);
            });

        // Copy first: it must send the snippet as displayed this frame.
        if action.copy {
            self.copy_snippet(ctx);
        }
        if action.symmetric {
            self.state.apply_symmetric();
        }
        if action.clear {
            self.state.clear_markers();
        }
        if action.fit {
            self.state.fit_view_request = true;
        }

        // A paste decode may finish while no input arrives; keep polling.
        ctx.request_repaint_after(std::time::Duration::from_millis(120));
    }
}
