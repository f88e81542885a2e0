use egui::{
    vec2, Align2, Color32, Context, CursorIcon, Event, FontId, Key, MouseWheelUnit, Painter, Pos2,
    Rect, Response, Sense, Shape, Stroke, Ui,
};

use crate::geometry::Point;
use crate::state::{EditorState, Interaction};
use crate::theme::AppTheme;

const MARKER_RADIUS: f32 = 5.0;
const POINTS_PER_SCROLL_LINE: f32 = 16.0;

/// Draws the current session (image under the camera, quad, markers, export
/// rectangle) after applying this frame's input, so the frame always shows the
/// fully applied result of the latest event.
pub fn show_canvas(ui: &mut Ui, ctx: &Context, state: &mut EditorState, theme: &AppTheme) {
    if state.image.is_none() {
        empty_canvas(ui, theme);
        return;
    }

    let available = ui.available_size();
    let (canvas_rect, response) = ui.allocate_exact_size(available, Sense::click_and_drag());

    // New image or resized viewport: back to fit-to-view.
    if state.fit_view_request || state.viewport != canvas_rect.size() {
        state.fit_camera(canvas_rect.size());
    }

    handle_input(ctx, state, &response, canvas_rect);

    let (texture_id, image_size) = {
        let image = state.image.as_mut().expect("image checked above");
        image.ensure_texture(ctx);
        (
            image.texture.as_ref().expect("texture was just created").id(),
            image.size_vec2(),
        )
    };

    let painter = ui.painter_at(canvas_rect);
    painter.rect_filled(canvas_rect, 0.0, theme.surfaces.canvas_bg);

    let image_min = canvas_rect.min + state.camera.offset;
    let image_rect = Rect::from_min_size(image_min, image_size * state.camera.scale);
    painter.image(
        texture_id,
        image_rect,
        Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
        Color32::WHITE,
    );

    draw_quad(&painter, state, canvas_rect, theme);
    draw_watermark_overlay(&painter, state, canvas_rect, theme);
    draw_markers(&painter, state, canvas_rect, theme);
}

fn empty_canvas(ui: &mut Ui, theme: &AppTheme) {
    let (rect, _) = ui.allocate_exact_size(ui.available_size(), Sense::hover());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 16.0, theme.surfaces.canvas_bg);
    painter.rect_stroke(rect, 16.0, Stroke::new(1.0, theme.surfaces.stroke_soft));
    painter.text(
        rect.center(),
        Align2::CENTER_CENTER,
        "Paste an image (Cmd+V)",
        FontId::proportional(19.0),
        theme.text.secondary,
    );
}

fn handle_input(ctx: &Context, state: &mut EditorState, response: &Response, canvas_rect: Rect) {
    // Space is the pan modifier, unless some text widget owns the keyboard.
    let pan_modifier =
        !ctx.wants_keyboard_input() && ctx.input(|input| input.key_down(Key::Space));

    let pointer = ctx.input(|input| input.pointer.clone());

    if pointer.primary_pressed() && response.hovered() {
        if let Some(pos) = pointer.interact_pos() {
            if canvas_rect.contains(pos) {
                state.pointer_pressed(to_local(pos, canvas_rect), pan_modifier);
            }
        }
    }

    // Active drags and pans keep following the pointer outside the canvas.
    if state.interaction != Interaction::Idle {
        if let Some(pos) = pointer.latest_pos() {
            state.pointer_moved(to_local(pos, canvas_rect));
        }
    }

    // A release, or a lost one (focus change, pointer cancel), ends the
    // gesture either way.
    if pointer.primary_released() || (!pointer.any_down() && state.interaction != Interaction::Idle)
    {
        state.pointer_released();
    }

    let scroll = ctx.input(|input| {
        input
            .events
            .iter()
            .map(|event| match event {
                Event::MouseWheel { unit, delta, .. } => {
                    scroll_points(*unit, delta.y, canvas_rect.height())
                }
                _ => 0.0,
            })
            .sum::<f32>()
    });
    if scroll != 0.0 && response.hovered() {
        if let Some(pos) = pointer.latest_pos() {
            state.camera.zoom_at(to_local(pos, canvas_rect), scroll);
        }
    }

    if matches!(state.interaction, Interaction::Panning { .. }) {
        ctx.set_cursor_icon(CursorIcon::Grabbing);
    } else if pan_modifier && response.hovered() {
        ctx.set_cursor_icon(CursorIcon::Grab);
    }
}

/// Normalizes a wheel delta to scroll points: lines are 16 points each, a page
/// is one viewport height.
fn scroll_points(unit: MouseWheelUnit, delta_y: f32, page_height: f32) -> f32 {
    match unit {
        MouseWheelUnit::Point => delta_y,
        MouseWheelUnit::Line => delta_y * POINTS_PER_SCROLL_LINE,
        MouseWheelUnit::Page => delta_y * page_height,
    }
}

fn to_local(pos: Pos2, canvas_rect: Rect) -> Pos2 {
    Pos2::new(pos.x - canvas_rect.min.x, pos.y - canvas_rect.min.y)
}

fn to_canvas(state: &EditorState, canvas_rect: Rect, point: Point) -> Pos2 {
    canvas_rect.min + state.camera.image_to_screen(point).to_vec2()
}

fn draw_quad(painter: &Painter, state: &EditorState, canvas_rect: Rect, theme: &AppTheme) {
    let screen_points: Vec<Pos2> = state
        .markers
        .points()
        .iter()
        .map(|point| to_canvas(state, canvas_rect, *point))
        .collect();

    if screen_points.len() < 2 {
        return;
    }

    let stroke = Stroke::new(1.5, theme.overlay.polygon_stroke);
    if state.markers.is_complete() {
        painter.add(Shape::closed_line(screen_points, stroke));
    } else {
        painter.add(Shape::line(screen_points, stroke));
    }
}

fn draw_watermark_overlay(
    painter: &Painter,
    state: &EditorState,
    canvas_rect: Rect,
    theme: &AppTheme,
) {
    if !state.markers.is_complete() {
        return;
    }

    let rect = state.watermark_rect();
    let corners = rect.corners();
    let min = to_canvas(state, canvas_rect, corners[0]);
    let max = to_canvas(state, canvas_rect, corners[2]);
    painter.rect_stroke(
        Rect::from_min_max(min, max),
        0.0,
        Stroke::new(2.0, theme.overlay.watermark_stroke),
    );
}

fn draw_markers(painter: &Painter, state: &EditorState, canvas_rect: Rect, theme: &AppTheme) {
    for (index, point) in state.markers.points().iter().enumerate() {
        let center = to_canvas(state, canvas_rect, *point);
        painter.circle_filled(center, MARKER_RADIUS, theme.overlay.marker_fill);
        painter.circle_stroke(center, MARKER_RADIUS, Stroke::new(1.5, theme.overlay.marker_ring));
        painter.text(
            center + vec2(8.0, -8.0),
            Align2::LEFT_BOTTOM,
            (index + 1).to_string(),
            FontId::proportional(13.0),
            theme.overlay.marker_label,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::scroll_points;
    use egui::MouseWheelUnit;

    #[test]
    fn wheel_units_normalize_to_points() {
        assert_eq!(scroll_points(MouseWheelUnit::Point, 40.0, 600.0), 40.0);
        assert_eq!(scroll_points(MouseWheelUnit::Line, 3.0, 600.0), 48.0);
        assert_eq!(scroll_points(MouseWheelUnit::Page, -1.0, 600.0), -600.0);
    }
}
