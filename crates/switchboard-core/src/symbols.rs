//! Pre-built switchboard symbols, placed as opaque groups.

use crate::shapes::{
    Circle, Group, Line, Rectangle, SceneObject, SerializableColor, Shape, ShapeStyle, ShapeTrait,
    Text,
};
use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Base symbol size in scene units.
pub const SYMBOL_SIZE: f64 = 40.0;

/// Decorative switchboard symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Switch,
    Breaker,
    Outlet,
}

impl SymbolKind {
    pub fn all() -> &'static [SymbolKind] {
        &[SymbolKind::Switch, SymbolKind::Breaker, SymbolKind::Outlet]
    }

    pub fn name(&self) -> &'static str {
        match self {
            SymbolKind::Switch => "switch",
            SymbolKind::Breaker => "breaker",
            SymbolKind::Outlet => "outlet",
        }
    }

    /// Footprint of the symbol (width, height).
    pub fn size(&self) -> (f64, f64) {
        match self {
            SymbolKind::Breaker => (SYMBOL_SIZE * 1.5, SYMBOL_SIZE),
            SymbolKind::Switch | SymbolKind::Outlet => (SYMBOL_SIZE, SYMBOL_SIZE),
        }
    }

    /// Build the symbol group centered on `center`.
    pub fn build(&self, center: Point) -> SceneObject {
        let children = match self {
            SymbolKind::Switch => switch_parts(),
            SymbolKind::Breaker => breaker_parts(),
            SymbolKind::Outlet => outlet_parts(),
        };
        let (width, height) = self.size();
        let origin = Vec2::new(center.x - width / 2.0, center.y - height / 2.0);

        let mut group = Group::new(children.into_iter().map(SceneObject::new).collect());
        group.transform(Affine::translate(origin));
        SceneObject::new(Shape::Group(group))
    }
}

fn hex(color: &str) -> SerializableColor {
    SerializableColor::from_hex(color).unwrap_or_else(SerializableColor::black)
}

fn switch_parts() -> Vec<Shape> {
    let cross = ShapeStyle::stroked(SerializableColor::white(), 3.0);
    vec![
        Shape::Rect(
            Rectangle::new(Point::ZERO, SYMBOL_SIZE, SYMBOL_SIZE)
                .with_corner_radius(5.0)
                .with_style(ShapeStyle::stroked(hex("#1e8e3e"), 2.0).with_fill(hex("#34a853"))),
        ),
        Shape::Line(
            Line::new(Point::new(10.0, 10.0), Point::new(30.0, 30.0)).with_style(cross.clone()),
        ),
        Shape::Line(Line::new(Point::new(30.0, 10.0), Point::new(10.0, 30.0)).with_style(cross)),
    ]
}

fn breaker_parts() -> Vec<Shape> {
    vec![
        Shape::Rect(
            Rectangle::new(Point::ZERO, SYMBOL_SIZE * 1.5, SYMBOL_SIZE)
                .with_corner_radius(3.0)
                .with_style(ShapeStyle::stroked(hex("#c5221f"), 2.0).with_fill(hex("#ea4335"))),
        ),
        Shape::Text(
            Text::new(Point::new(SYMBOL_SIZE * 0.35, SYMBOL_SIZE * 0.3), "CB")
                .with_fill(SerializableColor::white())
                .bold(),
        ),
    ]
}

fn outlet_parts() -> Vec<Shape> {
    let half = SYMBOL_SIZE / 2.0;
    let dot = |x: f64| {
        Shape::Circle(Circle::new(Point::new(x, half - 3.0), 3.0).with_style(ShapeStyle {
            stroke_color: SerializableColor::transparent(),
            stroke_width: 0.0,
            fill_color: Some(SerializableColor::white()),
        }))
    };
    vec![
        Shape::Circle(
            Circle::new(Point::ZERO, half)
                .with_style(ShapeStyle::stroked(hex("#f29900"), 2.0).with_fill(hex("#fbbc04"))),
        ),
        dot(half - 8.0),
        dot(half + 2.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Rect;

    #[test]
    fn test_symbols_centered_on_pointer() {
        let center = Point::new(200.0, 150.0);
        for kind in SymbolKind::all() {
            let symbol = kind.build(center);
            let bounds = symbol.bounds();
            assert!((bounds.center().x - center.x).abs() < 1e-9, "{}", kind.name());
            assert!((bounds.center().y - center.y).abs() < 1e-9, "{}", kind.name());
        }
    }

    #[test]
    fn test_breaker_footprint() {
        let breaker = SymbolKind::Breaker.build(Point::new(30.0, 20.0));
        assert_eq!(breaker.bounds(), Rect::new(0.0, 0.0, 60.0, 40.0));
        let group = breaker.as_group().unwrap();
        assert_eq!(group.children.len(), 2);
        assert!(matches!(&group.children[1].shape, Shape::Text(t) if t.content == "CB"));
    }

    #[test]
    fn test_switch_has_cross() {
        let switch = SymbolKind::Switch.build(Point::new(20.0, 20.0));
        let group = switch.as_group().unwrap();
        let lines = group
            .children
            .iter()
            .filter(|c| matches!(c.shape, Shape::Line(_)))
            .count();
        assert_eq!(lines, 2);
    }

    #[test]
    fn test_outlet_dots_inside_body() {
        let outlet = SymbolKind::Outlet.build(Point::new(100.0, 100.0));
        let group = outlet.as_group().unwrap();
        let body = group.children[0].bounds();
        for dot in &group.children[1..] {
            let b = dot.bounds();
            assert!(body.contains(b.origin()));
            assert!((b.width() - 6.0).abs() < f64::EPSILON);
        }
    }
}
