use egui::{Pos2, Vec2};

use crate::geometry::Point;

pub const MIN_SCALE: f32 = 0.05;
pub const MAX_SCALE: f32 = 40.0;

/// Multiplicative zoom per scroll point. Scroll direction maps to a factor
/// through `exp`, so any delta magnitude zooms smoothly and a full notch of a
/// line-mode wheel (16 points) changes the scale by roughly 8%.
const WHEEL_ZOOM_RATE: f32 = 0.005;

/// Affine view transform between image space and canvas-local screen space:
/// `screen = image * scale + offset`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub scale: f32,
    pub offset: Vec2,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Vec2::ZERO,
        }
    }
}

impl Camera {
    /// Scale the image to fit the viewport and center it.
    pub fn fit_to_view(&mut self, image_size: Vec2, viewport: Vec2) {
        let width_scale = viewport.x / image_size.x.max(1.0);
        let height_scale = viewport.y / image_size.y.max(1.0);
        self.scale = width_scale.min(height_scale).clamp(MIN_SCALE, MAX_SCALE);
        self.offset = (viewport - image_size * self.scale) * 0.5;
    }

    pub fn image_to_screen(&self, point: Point) -> Pos2 {
        Pos2::new(
            point.x * self.scale + self.offset.x,
            point.y * self.scale + self.offset.y,
        )
    }

    pub fn screen_to_image(&self, screen: Pos2) -> Point {
        Point::new(
            (screen.x - self.offset.x) / self.scale,
            (screen.y - self.offset.y) / self.scale,
        )
    }

    /// Zoom by a wheel delta (in scroll points, positive = zoom in), keeping
    /// the image point under `cursor` fixed on screen.
    pub fn zoom_at(&mut self, cursor: Pos2, scroll_points: f32) {
        let before = self.screen_to_image(cursor);
        let factor = (scroll_points * WHEEL_ZOOM_RATE).exp();
        self.scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        self.offset = Vec2::new(
            cursor.x - before.x * self.scale,
            cursor.y - before.y * self.scale,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{Camera, MAX_SCALE, MIN_SCALE};
    use crate::geometry::Point;
    use egui::{vec2, Pos2, Vec2};

    #[test]
    fn screen_to_image_matches_known_transform() {
        let camera = Camera {
            scale: 2.0,
            offset: vec2(100.0, 50.0),
        };

        let image = camera.screen_to_image(Pos2::new(300.0, 150.0));
        assert_eq!(image, Point::new(100.0, 50.0));
    }

    #[test]
    fn transforms_round_trip() {
        let camera = Camera {
            scale: 3.7,
            offset: vec2(-42.5, 17.25),
        };

        for point in [
            Point::new(0.0, 0.0),
            Point::new(123.5, 88.25),
            Point::new(-40.0, 999.0),
        ] {
            let back = camera.screen_to_image(camera.image_to_screen(point));
            assert!((back.x - point.x).abs() < 1e-3);
            assert!((back.y - point.y).abs() < 1e-3);
        }
    }

    #[test]
    fn fit_to_view_centers_the_image() {
        let mut camera = Camera::default();
        camera.fit_to_view(vec2(200.0, 100.0), vec2(400.0, 400.0));

        // Width-limited: scale 2, image 400x200 centered in 400x400.
        assert_eq!(camera.scale, 2.0);
        assert_eq!(camera.offset, vec2(0.0, 100.0));

        let center = camera.image_to_screen(Point::new(100.0, 50.0));
        assert_eq!(center, Pos2::new(200.0, 200.0));
    }

    #[test]
    fn zoom_keeps_cursor_point_fixed() {
        let mut camera = Camera {
            scale: 1.5,
            offset: vec2(30.0, -12.0),
        };
        let cursor = Pos2::new(240.0, 180.0);
        let before = camera.screen_to_image(cursor);

        camera.zoom_at(cursor, 120.0);
        assert!(camera.scale > 1.5);

        let after = camera.image_to_screen(before);
        assert!((after.x - cursor.x).abs() < 1e-3);
        assert!((after.y - cursor.y).abs() < 1e-3);
    }

    #[test]
    fn zoom_scale_stays_in_bounds() {
        let mut camera = Camera::default();
        camera.zoom_at(Pos2::ZERO, 1.0e5);
        assert_eq!(camera.scale, MAX_SCALE);

        camera.zoom_at(Pos2::ZERO, -1.0e5);
        assert_eq!(camera.scale, MIN_SCALE);
    }

    #[test]
    fn panning_is_a_pure_translation() {
        let mut camera = Camera {
            scale: 2.0,
            offset: Vec2::ZERO,
        };
        let anchor_offset = camera.offset;
        camera.offset = anchor_offset + vec2(25.0, -10.0);

        assert_eq!(camera.scale, 2.0);
        let moved = camera.image_to_screen(Point::new(0.0, 0.0));
        assert_eq!(moved, Pos2::new(25.0, -10.0));
    }
}
