//! Circle shape, positioned by the top-left of its bounding box.

use super::{ShapeStyle, ShapeTrait};
use kurbo::{Affine, BezPath, Circle as KurboCircle, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    /// Top-left corner of the bounding box.
    pub position: Point,
    pub radius: f64,
    pub style: ShapeStyle,
}

impl Circle {
    pub fn new(position: Point, radius: f64) -> Self {
        Self {
            position,
            radius,
            style: ShapeStyle::default(),
        }
    }

    /// Create a circle whose bounding box is centered on `center`.
    pub fn centered(center: Point, radius: f64) -> Self {
        Self::new(Point::new(center.x - radius, center.y - radius), radius)
    }

    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn center(&self) -> Point {
        Point::new(self.position.x + self.radius, self.position.y + self.radius)
    }

    pub fn as_kurbo(&self) -> KurboCircle {
        KurboCircle::new(self.center(), self.radius)
    }
}

impl ShapeTrait for Circle {
    fn bounds(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + 2.0 * self.radius,
            self.position.y + 2.0 * self.radius,
        )
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let half_sw = self.style.stroke_width / 2.0;
        point.distance(self.center()) <= self.radius + half_sw + tolerance
    }

    fn to_path(&self) -> BezPath {
        self.as_kurbo().to_path(0.1)
    }

    fn transform(&mut self, affine: Affine) {
        let center = affine * self.center();
        let scale = affine.as_coeffs();
        self.radius *= scale[0].abs().max(scale[3].abs());
        self.position = Point::new(center.x - self.radius, center.y - self.radius);
    }
}
