//! Scene object definitions for the schematic editor.

mod circle;
mod group;
mod line;
mod rectangle;
mod text;

pub use circle::Circle;
pub use group::Group;
pub use line::Line;
pub use rectangle::Rectangle;
pub use text::Text;

use kurbo::{Affine, BezPath, Point, Rect, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse a CSS-style color: `#rgb`, `#rrggbb`, `#rrggbbaa`, `white`, `black`
    /// or `transparent`. Returns `None` for anything else.
    pub fn from_hex(color: &str) -> Option<Self> {
        let color = color.trim();
        match color {
            "transparent" => return Some(Self::transparent()),
            "white" => return Some(Self::white()),
            "black" => return Some(Self::black()),
            _ => {}
        }

        let hex = color.strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => {
                // #rgb -> #rrggbb
                let r = channel(&hex[0..1])? * 17;
                let g = channel(&hex[1..2])? * 17;
                let b = channel(&hex[2..3])? * 17;
                Some(Self::new(r, g, b, 255))
            }
            6 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                255,
            )),
            8 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                channel(&hex[6..8])?,
            )),
            _ => None,
        }
    }

    /// Format as `#rrggbb` (or `#rrggbbaa` when not fully opaque).
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Stroke and fill properties shared by primitive shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Stroke color.
    pub stroke_color: SerializableColor,
    /// Stroke width.
    pub stroke_width: f64,
    /// Fill color (None = transparent).
    #[serde(default)]
    pub fill_color: Option<SerializableColor>,
}

impl ShapeStyle {
    /// Create a stroke-only style.
    pub fn stroked(stroke_color: SerializableColor, stroke_width: f64) -> Self {
        Self {
            stroke_color,
            stroke_width,
            fill_color: None,
        }
    }

    /// Builder-style fill setter.
    pub fn with_fill(mut self, fill: SerializableColor) -> Self {
        self.fill_color = Some(fill);
        self
    }

    /// Get the stroke color as a peniko Color.
    pub fn stroke(&self) -> Color {
        self.stroke_color.into()
    }

    /// Get the fill color as a peniko Color.
    pub fn fill(&self) -> Option<Color> {
        self.fill_color.map(|c| c.into())
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self::stroked(SerializableColor::black(), 1.0)
    }
}

/// Unique identifier for scene objects.
pub type ObjectId = Uuid;

/// Object kind, mirrored from the shape variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Line,
    Rect,
    Circle,
    Text,
    Group,
}

/// Editable attribute families an object may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Width,
    Height,
    Radius,
    Stroke,
    Fill,
    Text,
}

/// Common trait for all shape geometries.
pub trait ShapeTrait {
    /// Get the bounding box in scene coordinates (unrotated).
    fn bounds(&self) -> Rect;

    /// Check if a point (in scene coordinates) hits this shape.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool;

    /// Get the path representation for rendering.
    fn to_path(&self) -> BezPath;

    /// Apply a transform to this shape.
    fn transform(&mut self, affine: Affine);
}

/// Geometry variant of a scene object. Each variant carries only the
/// attributes that apply to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    Line(Line),
    Rect(Rectangle),
    Circle(Circle),
    Text(Text),
    Group(Group),
}

impl Shape {
    pub fn kind(&self) -> ObjectKind {
        match self {
            Shape::Line(_) => ObjectKind::Line,
            Shape::Rect(_) => ObjectKind::Rect,
            Shape::Circle(_) => ObjectKind::Circle,
            Shape::Text(_) => ObjectKind::Text,
            Shape::Group(_) => ObjectKind::Group,
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Line(s) => s.bounds(),
            Shape::Rect(s) => s.bounds(),
            Shape::Circle(s) => s.bounds(),
            Shape::Text(s) => s.bounds(),
            Shape::Group(s) => s.bounds(),
        }
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        match self {
            Shape::Line(s) => s.hit_test(point, tolerance),
            Shape::Rect(s) => s.hit_test(point, tolerance),
            Shape::Circle(s) => s.hit_test(point, tolerance),
            Shape::Text(s) => s.hit_test(point, tolerance),
            Shape::Group(s) => s.hit_test(point, tolerance),
        }
    }

    pub fn to_path(&self) -> BezPath {
        match self {
            Shape::Line(s) => s.to_path(),
            Shape::Rect(s) => s.to_path(),
            Shape::Circle(s) => s.to_path(),
            Shape::Text(s) => s.to_path(),
            Shape::Group(s) => s.to_path(),
        }
    }

    pub fn transform(&mut self, affine: Affine) {
        match self {
            Shape::Line(s) => s.transform(affine),
            Shape::Rect(s) => s.transform(affine),
            Shape::Circle(s) => s.transform(affine),
            Shape::Text(s) => s.transform(affine),
            Shape::Group(s) => s.transform(affine),
        }
    }

    /// Stroke/fill style, for the variants that have one.
    pub fn style(&self) -> Option<&ShapeStyle> {
        match self {
            Shape::Line(s) => Some(&s.style),
            Shape::Rect(s) => Some(&s.style),
            Shape::Circle(s) => Some(&s.style),
            Shape::Text(_) | Shape::Group(_) => None,
        }
    }

    pub fn style_mut(&mut self) -> Option<&mut ShapeStyle> {
        match self {
            Shape::Line(s) => Some(&mut s.style),
            Shape::Rect(s) => Some(&mut s.style),
            Shape::Circle(s) => Some(&mut s.style),
            Shape::Text(_) | Shape::Group(_) => None,
        }
    }

    /// Capability query replacing runtime property probing.
    pub fn has(&self, capability: Capability) -> bool {
        use Capability as C;
        match self {
            Shape::Line(_) => matches!(capability, C::Stroke),
            Shape::Rect(_) => matches!(capability, C::Width | C::Height | C::Stroke | C::Fill),
            Shape::Circle(_) => matches!(capability, C::Radius | C::Stroke | C::Fill),
            Shape::Text(_) => matches!(capability, C::Fill | C::Text),
            Shape::Group(_) => false,
        }
    }
}

/// A single attribute edit, applied only if the object has the matching capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "property", content = "value", rename_all = "snake_case")]
pub enum ObjectProperty {
    Width(f64),
    Height(f64),
    Radius(f64),
    Stroke(SerializableColor),
    StrokeWidth(f64),
    Fill(Option<SerializableColor>),
    Opacity(f64),
    Angle(f64),
    Text(String),
}

impl ObjectProperty {
    /// Capability the target object must have, if any.
    pub fn capability(&self) -> Option<Capability> {
        match self {
            ObjectProperty::Width(_) => Some(Capability::Width),
            ObjectProperty::Height(_) => Some(Capability::Height),
            ObjectProperty::Radius(_) => Some(Capability::Radius),
            ObjectProperty::Stroke(_) | ObjectProperty::StrokeWidth(_) => Some(Capability::Stroke),
            ObjectProperty::Fill(_) => Some(Capability::Fill),
            ObjectProperty::Text(_) => Some(Capability::Text),
            ObjectProperty::Opacity(_) | ObjectProperty::Angle(_) => None,
        }
    }
}

/// A drawable object owned by the scene graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub id: ObjectId,
    pub shape: Shape,
    /// Rotation in degrees around the bounds center.
    #[serde(default)]
    pub angle: f64,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default = "default_true")]
    pub selectable: bool,
    #[serde(default = "default_true")]
    pub evented: bool,
    #[serde(default = "default_true")]
    pub has_controls: bool,
    #[serde(default = "default_true")]
    pub has_borders: bool,
}

fn default_opacity() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

impl SceneObject {
    /// Wrap a shape with a fresh id and default attributes.
    pub fn new(shape: Shape) -> Self {
        Self {
            id: Uuid::new_v4(),
            shape,
            angle: 0.0,
            opacity: 1.0,
            selectable: true,
            evented: true,
            has_controls: true,
            has_borders: true,
        }
    }

    pub fn kind(&self) -> ObjectKind {
        self.shape.kind()
    }

    pub fn has(&self, capability: Capability) -> bool {
        self.shape.has(capability)
    }

    /// Axis-aligned bounds including rotation.
    pub fn bounds(&self) -> Rect {
        let bounds = self.shape.bounds();
        if self.angle == 0.0 {
            return bounds;
        }
        Affine::rotate_about(self.angle.to_radians(), bounds.center()).transform_rect_bbox(bounds)
    }

    pub fn left(&self) -> f64 {
        self.shape.bounds().x0
    }

    pub fn top(&self) -> f64 {
        self.shape.bounds().y0
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        if self.angle == 0.0 {
            return self.shape.hit_test(point, tolerance);
        }
        // Undo the rotation on the probe point instead of the shape.
        let center = self.shape.bounds().center();
        let local = Affine::rotate_about(-self.angle.to_radians(), center) * point;
        self.shape.hit_test(local, tolerance)
    }

    /// Move the object by a delta in scene units.
    pub fn translate(&mut self, delta: Vec2) {
        self.shape.transform(Affine::translate(delta));
    }

    /// Move the object so its unrotated top-left corner lands on `position`.
    pub fn set_position(&mut self, position: Point) {
        let bounds = self.shape.bounds();
        self.translate(Vec2::new(position.x - bounds.x0, position.y - bounds.y0));
    }

    /// Apply a property edit. Returns false when the object lacks the
    /// capability or the value is out of range.
    pub fn apply(&mut self, property: ObjectProperty) -> bool {
        if let Some(capability) = property.capability() {
            if !self.has(capability) {
                return false;
            }
        }
        let non_negative = |v: f64| v.is_finite() && v >= 0.0;
        match (property, &mut self.shape) {
            (ObjectProperty::Width(w), Shape::Rect(rect)) if non_negative(w) => rect.width = w,
            (ObjectProperty::Height(h), Shape::Rect(rect)) if non_negative(h) => rect.height = h,
            (ObjectProperty::Radius(r), Shape::Circle(circle)) if non_negative(r) => {
                circle.radius = r
            }
            (ObjectProperty::Stroke(color), shape) => match shape.style_mut() {
                Some(style) => style.stroke_color = color,
                None => return false,
            },
            (ObjectProperty::StrokeWidth(w), shape) if non_negative(w) => match shape.style_mut() {
                Some(style) => style.stroke_width = w,
                None => return false,
            },
            (ObjectProperty::Fill(color), Shape::Text(text)) => {
                text.fill = color.unwrap_or_else(SerializableColor::transparent)
            }
            (ObjectProperty::Fill(color), shape) => match shape.style_mut() {
                Some(style) => style.fill_color = color,
                None => return false,
            },
            (ObjectProperty::Text(content), Shape::Text(text)) => text.content = content,
            (ObjectProperty::Opacity(o), _) if o.is_finite() => self.opacity = o.clamp(0.0, 1.0),
            (ObjectProperty::Angle(a), _) if a.is_finite() => self.angle = a.rem_euclid(360.0),
            _ => return false,
        }
        true
    }

    /// Get the group if this object is a group.
    pub fn as_group(&self) -> Option<&Group> {
        match &self.shape {
            Shape::Group(g) => Some(g),
            _ => None,
        }
    }

    /// Regenerate this object's ID (and its children's) with fresh identifiers.
    /// Used when duplicating or pasting so copies never share ids with their source.
    pub fn regenerate_ids(&mut self) {
        self.id = Uuid::new_v4();
        if let Shape::Group(group) = &mut self.shape {
            for child in &mut group.children {
                child.regenerate_ids();
            }
        }
    }
}

/// Distance from a point to a line segment (a->b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = Vec2::new(b.x - a.x, b.y - a.y);
    let pv = Vec2::new(point.x - a.x, point.y - a.y);
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * seg.x, a.y + t * seg.y);
    ((point.x - proj.x).powi(2) + (point.y - proj.y).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_hex() {
        assert_eq!(
            SerializableColor::from_hex("#4285f4"),
            Some(SerializableColor::new(0x42, 0x85, 0xf4, 255))
        );
        assert_eq!(
            SerializableColor::from_hex("#fff"),
            Some(SerializableColor::white())
        );
        assert_eq!(
            SerializableColor::from_hex("transparent"),
            Some(SerializableColor::transparent())
        );
        assert_eq!(SerializableColor::from_hex("#12"), None);
        assert_eq!(SerializableColor::from_hex("blue"), None);
    }

    #[test]
    fn test_color_from_hex_non_ascii() {
        // "é" is two bytes, so these have valid lengths but no char boundaries
        assert_eq!(SerializableColor::from_hex("#é1"), None);
        assert_eq!(SerializableColor::from_hex("#ééé"), None);
        assert_eq!(SerializableColor::from_hex("#1234é"), None);
    }

    #[test]
    fn test_color_hex_roundtrip() {
        let color = SerializableColor::new(0x00, 0xff, 0x88, 255);
        assert_eq!(color.to_hex(), "#00ff88");
        assert_eq!(SerializableColor::from_hex(&color.to_hex()), Some(color));
    }

    #[test]
    fn test_capabilities() {
        let line = SceneObject::new(Shape::Line(Line::new(Point::ZERO, Point::new(10.0, 0.0))));
        assert!(line.has(Capability::Stroke));
        assert!(!line.has(Capability::Width));
        assert!(!line.has(Capability::Fill));

        let rect = SceneObject::new(Shape::Rect(Rectangle::new(Point::ZERO, 10.0, 10.0)));
        assert!(rect.has(Capability::Width));
        assert!(rect.has(Capability::Height));
        assert!(!rect.has(Capability::Radius));

        let circle = SceneObject::new(Shape::Circle(Circle::new(Point::ZERO, 5.0)));
        assert!(circle.has(Capability::Radius));
        assert!(!circle.has(Capability::Width));

        let text = SceneObject::new(Shape::Text(Text::new(Point::ZERO, "Label")));
        assert!(text.has(Capability::Text));
        assert!(!text.has(Capability::Stroke));
    }

    #[test]
    fn test_apply_gated_by_capability() {
        let mut line = SceneObject::new(Shape::Line(Line::new(Point::ZERO, Point::new(10.0, 0.0))));
        assert!(!line.apply(ObjectProperty::Width(50.0)));
        assert!(!line.apply(ObjectProperty::Fill(Some(SerializableColor::white()))));
        assert!(line.apply(ObjectProperty::StrokeWidth(6.0)));
        assert!(line.apply(ObjectProperty::Opacity(2.0)));
        assert!((line.opacity - 1.0).abs() < f64::EPSILON);

        let mut circle = SceneObject::new(Shape::Circle(Circle::new(Point::ZERO, 5.0)));
        assert!(circle.apply(ObjectProperty::Radius(12.0)));
        assert!(!circle.apply(ObjectProperty::Radius(-1.0)));
        assert!(!circle.apply(ObjectProperty::Text("x".to_string())));
        assert!((circle.bounds().width() - 24.0).abs() < f64::EPSILON);

        let mut text = SceneObject::new(Shape::Text(Text::new(Point::ZERO, "Label")));
        assert!(text.apply(ObjectProperty::Text("Main".to_string())));
        assert!(text.apply(ObjectProperty::Fill(None)));
        assert!(!text.apply(ObjectProperty::Stroke(SerializableColor::black())));
        assert!(text.apply(ObjectProperty::Angle(-90.0)));
        assert!((text.angle - 270.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rotated_bounds() {
        let mut rect = SceneObject::new(Shape::Rect(Rectangle::new(Point::ZERO, 20.0, 10.0)));
        rect.angle = 90.0;
        let bounds = rect.bounds();
        assert!((bounds.width() - 10.0).abs() < 1e-9);
        assert!((bounds.height() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_set_position() {
        let mut circle = SceneObject::new(Shape::Circle(Circle::new(Point::new(5.0, 5.0), 10.0)));
        circle.set_position(Point::new(100.0, 50.0));
        assert!((circle.left() - 100.0).abs() < f64::EPSILON);
        assert!((circle.top() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_regenerate_ids_recurses() {
        let child = SceneObject::new(Shape::Rect(Rectangle::new(Point::ZERO, 10.0, 10.0)));
        let child_id = child.id;
        let mut group = SceneObject::new(Shape::Group(Group::new(vec![child])));
        let group_id = group.id;

        group.regenerate_ids();

        assert_ne!(group.id, group_id);
        let new_child = &group.as_group().map(|g| g.children[0].id);
        assert_ne!(*new_child, Some(child_id));
    }

    #[test]
    fn test_serde_tagged_variant() {
        let rect = SceneObject::new(Shape::Rect(Rectangle::new(Point::ZERO, 10.0, 10.0)));
        let json = serde_json::to_string(&rect).unwrap();
        assert!(json.contains("\"type\":\"rect\""));
        let back: SceneObject = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rect);
    }
}
