use egui::{ColorImage, Context as EguiContext, Pos2, TextureHandle, TextureOptions, Vec2};
use image::DynamicImage;

use crate::camera::Camera;
use crate::geometry::{self, WatermarkRect};
use crate::markers::{MarkerSet, HIT_RADIUS};

pub struct EditorImage {
    pub dynamic: DynamicImage,
    pub texture: Option<TextureHandle>,
}

impl EditorImage {
    pub fn size_vec2(&self) -> Vec2 {
        Vec2::new(self.dynamic.width() as f32, self.dynamic.height() as f32)
    }

    pub fn ensure_texture(&mut self, ctx: &EguiContext) {
        if self.texture.is_some() {
            return;
        }
        let rgba = self.dynamic.to_rgba8();
        let size = [rgba.width() as usize, rgba.height() as usize];
        let color = ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
        let texture = ctx.load_texture("pasted_image", color, TextureOptions::LINEAR);
        self.texture = Some(texture);
    }
}

/// What the pointer is currently doing. A pan gesture remembers where it
/// started, both on screen and in camera offset, so motion is applied as a
/// delta from the anchor rather than accumulated per event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Interaction {
    Idle,
    DraggingPoint(usize),
    Panning { pointer: Pos2, offset: Vec2 },
}

pub struct EditorState {
    pub image: Option<EditorImage>,
    pub markers: MarkerSet,
    pub camera: Camera,
    pub interaction: Interaction,
    /// Canvas size from the last frame; a change triggers a refit.
    pub viewport: Vec2,
    pub fit_view_request: bool,
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            image: None,
            markers: MarkerSet::default(),
            camera: Camera::default(),
            interaction: Interaction::Idle,
            viewport: Vec2::ZERO,
            fit_view_request: false,
        }
    }
}

impl EditorState {
    /// Installs a freshly decoded image and resets everything derived from the
    /// previous one. Runs before any pointer input of the same frame, so no
    /// marker can be placed against a half-replaced session.
    pub fn reset_for_new_image(&mut self, image: DynamicImage) {
        self.image = Some(EditorImage {
            dynamic: image,
            texture: None,
        });
        self.markers.clear();
        self.interaction = Interaction::Idle;
        self.fit_view_request = true;
    }

    pub fn fit_camera(&mut self, viewport: Vec2) {
        self.viewport = viewport;
        self.fit_view_request = false;
        if let Some(image) = &self.image {
            self.camera.fit_to_view(image.size_vec2(), viewport);
        }
    }

    /// Bounding box of the closed quad, or the empty rectangle while fewer
    /// than four corners exist.
    pub fn watermark_rect(&self) -> WatermarkRect {
        match self.markers.corners() {
            Some(corners) => geometry::bounding_box(&corners),
            None => WatermarkRect::EMPTY,
        }
    }

    /// Replaces the picked quad with its centroid-symmetric rectangle, so the
    /// displayed corners match the export exactly.
    pub fn apply_symmetric(&mut self) {
        if let Some(corners) = self.markers.corners() {
            let rect = geometry::symmetric_box(&corners);
            self.markers.set_from_rect(&rect);
        }
    }

    pub fn clear_markers(&mut self) {
        self.markers.clear();
        self.interaction = Interaction::Idle;
    }

    /// Pointer-down in canvas-local coordinates. Pan modifier wins, then an
    /// existing marker grab, then placing a new corner; a full quad with no
    /// hit is a no-op, so the fourth corner stays grabbable after the cap.
    pub fn pointer_pressed(&mut self, screen: Pos2, pan_modifier: bool) {
        if self.image.is_none() || self.interaction != Interaction::Idle {
            return;
        }

        if pan_modifier {
            self.interaction = Interaction::Panning {
                pointer: screen,
                offset: self.camera.offset,
            };
            return;
        }

        if let Some(index) = self.markers.hit_test(screen, &self.camera, HIT_RADIUS) {
            self.interaction = Interaction::DraggingPoint(index);
            return;
        }

        if !self.markers.is_complete() {
            self.markers.add(self.camera.screen_to_image(screen));
        }
    }

    pub fn pointer_moved(&mut self, screen: Pos2) {
        match self.interaction {
            Interaction::Idle => {}
            Interaction::DraggingPoint(index) => {
                let point = self.camera.screen_to_image(screen);
                self.markers.update(index, point);
            }
            Interaction::Panning { pointer, offset } => {
                self.camera.offset = offset + (screen - pointer);
            }
        }
    }

    pub fn pointer_released(&mut self) {
        self.interaction = Interaction::Idle;
    }
}
