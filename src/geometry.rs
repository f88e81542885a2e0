/// A corner marker in image-space pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// The exported watermark area, in whole image pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WatermarkRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl WatermarkRect {
    /// Published while fewer than four corners exist.
    pub const EMPTY: Self = Self {
        x: 0,
        y: 0,
        width: 0,
        height: 0,
    };

    /// Corners in top-left, top-right, bottom-right, bottom-left order.
    pub fn corners(&self) -> [Point; 4] {
        let x = self.x as f32;
        let y = self.y as f32;
        let w = self.width as f32;
        let h = self.height as f32;
        [
            Point::new(x, y),
            Point::new(x + w, y),
            Point::new(x + w, y + h),
            Point::new(x, y + h),
        ]
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x as f32
            && point.x <= (self.x + self.width) as f32
            && point.y >= self.y as f32
            && point.y <= (self.y + self.height) as f32
    }
}

/// Minimal axis-aligned rectangle covering all four corners, snapped outward
/// to whole pixels.
pub fn bounding_box(points: &[Point; 4]) -> WatermarkRect {
    let mut min_x = f32::MAX;
    let mut min_y = f32::MAX;
    let mut max_x = f32::MIN;
    let mut max_y = f32::MIN;

    for point in points {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }

    let x = min_x.floor() as i32;
    let y = min_y.floor() as i32;
    WatermarkRect {
        x,
        y,
        width: max_x.ceil() as i32 - x,
        height: max_y.ceil() as i32 - y,
    }
}

/// Rectangle centered on the centroid of the four corners, with half-extents
/// taken from the farthest corner on each axis. Turns an imprecisely picked
/// quad into a symmetric rectangle instead of a lopsided bounding box.
pub fn symmetric_box(points: &[Point; 4]) -> WatermarkRect {
    let cx = points.iter().map(|p| p.x).sum::<f32>() / 4.0;
    let cy = points.iter().map(|p| p.y).sum::<f32>() / 4.0;

    let mut half_w = 0.0f32;
    let mut half_h = 0.0f32;
    for point in points {
        half_w = half_w.max((point.x - cx).abs());
        half_h = half_h.max((point.y - cy).abs());
    }
    let half_w = half_w.ceil();
    let half_h = half_h.ceil();

    WatermarkRect {
        x: (cx - half_w).floor() as i32,
        y: (cy - half_h).floor() as i32,
        width: (2.0 * half_w).ceil() as i32,
        height: (2.0 * half_h).ceil() as i32,
    }
}

#[cfg(test)]
mod tests {
    use super::{bounding_box, symmetric_box, Point, WatermarkRect};

    #[test]
    fn bounding_box_of_axis_aligned_quad() {
        let points = [
            Point::new(10.0, 10.0),
            Point::new(50.0, 10.0),
            Point::new(50.0, 40.0),
            Point::new(10.0, 40.0),
        ];

        assert_eq!(
            bounding_box(&points),
            WatermarkRect {
                x: 10,
                y: 10,
                width: 40,
                height: 30,
            }
        );
    }

    #[test]
    fn bounding_box_snaps_outward_and_covers_every_corner() {
        let points = [
            Point::new(10.4, 9.7),
            Point::new(49.2, 10.1),
            Point::new(50.8, 39.6),
            Point::new(9.9, 40.3),
        ];

        let rect = bounding_box(&points);
        assert!(rect.width >= 0 && rect.height >= 0);
        for point in &points {
            assert!(rect.contains(*point), "corner {point:?} outside {rect:?}");
        }
    }

    #[test]
    fn symmetric_box_centers_on_centroid() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 1.0),
            Point::new(11.0, 10.0),
            Point::new(-1.0, 9.0),
        ];

        // Centroid (5, 5); farthest x deviation 6 (x = 11 and x = -1),
        // farthest y deviation 5.
        let rect = symmetric_box(&points);
        assert_eq!(
            rect,
            WatermarkRect {
                x: -1,
                y: 0,
                width: 12,
                height: 10,
            }
        );
        assert_eq!(rect.x * 2 + rect.width, 10);
        for point in &points {
            assert!(rect.contains(*point), "corner {point:?} outside {rect:?}");
        }
    }

    #[test]
    fn symmetric_box_of_exact_rectangle_reproduces_it() {
        let rect = WatermarkRect {
            x: 4,
            y: 6,
            width: 20,
            height: 10,
        };
        assert_eq!(symmetric_box(&rect.corners()), rect);
    }

    #[test]
    fn corners_are_in_clockwise_order_from_top_left() {
        let rect = WatermarkRect {
            x: 1,
            y: 2,
            width: 10,
            height: 20,
        };
        let corners = rect.corners();
        assert_eq!(corners[0], Point::new(1.0, 2.0));
        assert_eq!(corners[1], Point::new(11.0, 2.0));
        assert_eq!(corners[2], Point::new(11.0, 22.0));
        assert_eq!(corners[3], Point::new(1.0, 22.0));
    }
}
