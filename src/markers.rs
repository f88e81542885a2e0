use egui::Pos2;

use crate::camera::Camera;
use crate::geometry::{Point, WatermarkRect};

pub const MAX_CORNERS: usize = 4;

/// Screen-space grab radius for a corner marker, independent of zoom.
pub const HIT_RADIUS: f32 = 10.0;

/// The ordered set of up to four corner markers, in image space. Order defines
/// the displayed polygon winding but carries no corner semantics.
#[derive(Clone, Debug, Default)]
pub struct MarkerSet {
    points: Vec<Point>,
}

impl MarkerSet {
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The quad is treated as closed once all four corners are placed.
    pub fn is_complete(&self) -> bool {
        self.points.len() == MAX_CORNERS
    }

    pub fn corners(&self) -> Option<[Point; 4]> {
        if self.is_complete() {
            Some([self.points[0], self.points[1], self.points[2], self.points[3]])
        } else {
            None
        }
    }

    /// Appends a corner; refuses once the quad is complete.
    pub fn add(&mut self, point: Point) -> bool {
        if self.points.len() >= MAX_CORNERS {
            return false;
        }
        self.points.push(point);
        true
    }

    pub fn update(&mut self, index: usize, point: Point) {
        if let Some(slot) = self.points.get_mut(index) {
            *slot = point;
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Replaces the set with the four corners of `rect`, so the displayed quad
    /// matches an exported rectangle exactly.
    pub fn set_from_rect(&mut self, rect: &WatermarkRect) {
        self.points.clear();
        self.points.extend(rect.corners());
    }

    /// Finds the lowest-index marker within `radius` screen pixels of
    /// `screen`, regardless of zoom.
    pub fn hit_test(&self, screen: Pos2, camera: &Camera, radius: f32) -> Option<usize> {
        let radius_sq = radius * radius;
        self.points.iter().position(|point| {
            let marker = camera.image_to_screen(*point);
            (marker - screen).length_sq() <= radius_sq
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{MarkerSet, HIT_RADIUS};
    use crate::camera::Camera;
    use crate::geometry::{Point, WatermarkRect};
    use egui::{vec2, Pos2};

    #[test]
    fn fifth_corner_is_refused() {
        let mut markers = MarkerSet::default();
        for i in 0..4 {
            assert!(markers.add(Point::new(i as f32, 0.0)));
        }
        assert!(markers.is_complete());

        assert!(!markers.add(Point::new(99.0, 99.0)));
        assert_eq!(markers.len(), 4);
        assert_eq!(markers.points()[3], Point::new(3.0, 0.0));
    }

    #[test]
    fn hit_test_prefers_lowest_index() {
        let mut markers = MarkerSet::default();
        markers.add(Point::new(50.0, 50.0));
        markers.add(Point::new(52.0, 50.0));

        let camera = Camera::default();
        let hit = markers.hit_test(Pos2::new(51.0, 50.0), &camera, HIT_RADIUS);
        assert_eq!(hit, Some(0));
    }

    #[test]
    fn hit_radius_is_screen_space() {
        let mut markers = MarkerSet::default();
        markers.add(Point::new(100.0, 100.0));

        // Zoomed far out, 8 image pixels collapse to under one screen pixel.
        let camera = Camera {
            scale: 0.05,
            offset: vec2(0.0, 0.0),
        };
        let on_screen = camera.image_to_screen(Point::new(108.0, 100.0));
        assert_eq!(markers.hit_test(on_screen, &camera, HIT_RADIUS), Some(0));

        // Zoomed in, the same 8 image pixels are far outside the radius.
        let camera = Camera {
            scale: 10.0,
            offset: vec2(0.0, 0.0),
        };
        let on_screen = camera.image_to_screen(Point::new(108.0, 100.0));
        assert_eq!(markers.hit_test(on_screen, &camera, HIT_RADIUS), None);
    }

    #[test]
    fn set_from_rect_overwrites_all_corners() {
        let mut markers = MarkerSet::default();
        markers.add(Point::new(1.0, 1.0));

        let rect = WatermarkRect {
            x: 10,
            y: 20,
            width: 30,
            height: 40,
        };
        markers.set_from_rect(&rect);

        assert!(markers.is_complete());
        assert_eq!(markers.corners().unwrap(), rect.corners());
    }

    #[test]
    fn update_out_of_range_is_ignored() {
        let mut markers = MarkerSet::default();
        markers.add(Point::new(0.0, 0.0));
        markers.update(3, Point::new(9.0, 9.0));
        assert_eq!(markers.len(), 1);
        assert_eq!(markers.points()[0], Point::new(0.0, 0.0));
    }
}
