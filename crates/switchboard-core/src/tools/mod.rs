//! Drawing-mode state machine and gesture geometry.

use crate::selection::MoveState;
use crate::shapes::{
    Circle, Line, ObjectId, Rectangle, SerializableColor, Shape, ShapeStyle, Text,
};
use crate::snap::snap_line_endpoint;
use crate::symbols::SymbolKind;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Position of labels inserted by the add-text command.
pub const DEFAULT_LABEL_POSITION: Point = Point::new(100.0, 100.0);
/// Content of inserted labels.
pub const DEFAULT_LABEL_TEXT: &str = "Label";

/// Available drawing modes. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DrawingMode {
    #[default]
    Select,
    Line,
    Rect,
    Circle,
    Text,
    Switch,
    Breaker,
    Outlet,
}

impl DrawingMode {
    pub fn all() -> &'static [DrawingMode] {
        &[
            DrawingMode::Select,
            DrawingMode::Line,
            DrawingMode::Rect,
            DrawingMode::Circle,
            DrawingMode::Text,
            DrawingMode::Switch,
            DrawingMode::Breaker,
            DrawingMode::Outlet,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            DrawingMode::Select => "select",
            DrawingMode::Line => "line",
            DrawingMode::Rect => "rect",
            DrawingMode::Circle => "circle",
            DrawingMode::Text => "text",
            DrawingMode::Switch => "switch",
            DrawingMode::Breaker => "breaker",
            DrawingMode::Outlet => "outlet",
        }
    }

    /// Modes that create a primitive through a down/move/up gesture.
    pub fn is_gesture(&self) -> bool {
        matches!(self, DrawingMode::Line | DrawingMode::Rect | DrawingMode::Circle)
    }

    /// Symbol placed by one-shot symbol modes.
    pub fn symbol(&self) -> Option<SymbolKind> {
        match self {
            DrawingMode::Switch => Some(SymbolKind::Switch),
            DrawingMode::Breaker => Some(SymbolKind::Breaker),
            DrawingMode::Outlet => Some(SymbolKind::Outlet),
            _ => None,
        }
    }

    pub fn cursor(&self) -> Cursor {
        match self {
            DrawingMode::Select => Cursor::Default,
            _ => Cursor::Crosshair,
        }
    }
}

impl std::str::FromStr for DrawingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DrawingMode::all()
            .iter()
            .copied()
            .find(|mode| mode.name() == s)
            .ok_or_else(|| format!("unknown drawing mode '{s}'"))
    }
}

/// Pointer cursor the host should display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cursor {
    Default,
    Crosshair,
    Move,
    Grabbing,
}

/// In-progress shape creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Gesture {
    /// Scene point where the gesture started.
    pub anchor: Point,
    /// The live shape in the scene.
    pub object_id: ObjectId,
    pub mode: DrawingMode,
}

/// Rubber-band selection dragged out from empty canvas, in scene coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marquee {
    pub origin: Point,
    pub current: Point,
    /// Shift was held: add to the existing selection instead of replacing it.
    pub additive: bool,
}

impl Marquee {
    pub fn rect(&self) -> Rect {
        Rect::from_points(self.origin, self.current)
    }

    /// A press and release without movement.
    pub fn is_click(&self) -> bool {
        self.origin == self.current
    }

    /// Whether `bounds` touches the marquee. Edges count, so zero-height
    /// lines are picked up.
    pub fn touches(&self, bounds: Rect) -> bool {
        let rect = self.rect();
        bounds.x0 <= rect.x1
            && rect.x0 <= bounds.x1
            && bounds.y0 <= rect.y1
            && rect.y0 <= bounds.y1
    }
}

/// What the pointer is currently doing.
#[derive(Debug, Clone, Default)]
pub enum ToolState {
    #[default]
    Idle,
    /// Creating a primitive.
    Drawing(Gesture),
    /// Dragging the active selection in select mode.
    Moving(MoveState),
    /// Dragging a selection marquee in select mode.
    Selecting(Marquee),
}

/// Manages the current drawing mode, the live gesture and the panning flag.
#[derive(Debug, Clone, Default)]
pub struct ToolManager {
    pub mode: DrawingMode,
    pub state: ToolState,
    /// Last screen point while panning.
    panning: Option<Point>,
}

impl ToolManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current mode. Returns the gesture that was interrupted, if any.
    pub fn set_mode(&mut self, mode: DrawingMode) -> Option<Gesture> {
        self.mode = mode;
        match std::mem::take(&mut self.state) {
            ToolState::Drawing(gesture) => Some(gesture),
            _ => None,
        }
    }

    pub fn begin_gesture(&mut self, anchor: Point, object_id: ObjectId) {
        self.state = ToolState::Drawing(Gesture {
            anchor,
            object_id,
            mode: self.mode,
        });
    }

    pub fn begin_move(&mut self, state: MoveState) {
        self.state = ToolState::Moving(state);
    }

    pub fn begin_marquee(&mut self, origin: Point, additive: bool) {
        self.state = ToolState::Selecting(Marquee {
            origin,
            current: origin,
            additive,
        });
    }

    /// End the current interaction and hand back its state.
    pub fn finish(&mut self) -> ToolState {
        std::mem::take(&mut self.state)
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.state, ToolState::Idle)
    }

    pub fn begin_pan(&mut self, screen_point: Point) {
        self.panning = Some(screen_point);
    }

    /// Screen delta since the last pan point, or `None` when not panning.
    pub fn pan_to(&mut self, screen_point: Point) -> Option<Vec2> {
        let last = self.panning.replace(screen_point)?;
        Some(screen_point - last)
    }

    /// Leave panning. Returns false if not panning.
    pub fn end_pan(&mut self) -> bool {
        self.panning.take().is_some()
    }

    pub fn is_panning(&self) -> bool {
        self.panning.is_some()
    }
}

pub fn line_style() -> ShapeStyle {
    ShapeStyle::stroked(SerializableColor::new(0x00, 0xff, 0x88, 255), 3.0)
}

pub fn rect_style() -> ShapeStyle {
    ShapeStyle::stroked(SerializableColor::new(0x42, 0x85, 0xf4, 255), 2.0)
}

pub fn circle_style() -> ShapeStyle {
    ShapeStyle::stroked(SerializableColor::new(0xf4, 0xb4, 0x00, 255), 2.0)
}

/// The default text label.
pub fn label(position: Point) -> Text {
    Text::new(position, DEFAULT_LABEL_TEXT)
        .with_font_size(16.0)
        .with_fill(SerializableColor::white())
}

/// Zero-size primitive anchored at `anchor` for a gesture mode.
pub fn gesture_shape(mode: DrawingMode, anchor: Point) -> Option<Shape> {
    match mode {
        DrawingMode::Line => Some(Shape::Line(Line::new(anchor, anchor).with_style(line_style()))),
        DrawingMode::Rect => Some(Shape::Rect(
            Rectangle::new(anchor, 0.0, 0.0).with_style(rect_style()),
        )),
        DrawingMode::Circle => Some(Shape::Circle(
            Circle::new(anchor, 0.0).with_style(circle_style()),
        )),
        _ => None,
    }
}

/// Rectangle spanned by a drag. The anchor stays a fixed corner whichever
/// way the pointer crosses it. Constrained drags make a square whose side is
/// the larger axis delta, extending toward the pointer on each axis.
pub fn drag_rect(anchor: Point, current: Point, constrain: bool) -> Rect {
    let dx = current.x - anchor.x;
    let dy = current.y - anchor.y;
    let (width, height) = if constrain {
        let side = dx.abs().max(dy.abs());
        (side, side)
    } else {
        (dx.abs(), dy.abs())
    };
    let x0 = if dx < 0.0 { anchor.x - width } else { anchor.x };
    let y0 = if dy < 0.0 { anchor.y - height } else { anchor.y };
    Rect::new(x0, y0, x0 + width, y0 + height)
}

/// Recompute the live gesture shape from its anchor to the current point.
pub fn update_gesture_shape(
    shape: &mut Shape,
    anchor: Point,
    current: Point,
    constrain: bool,
    angle_increment: f64,
) {
    match shape {
        Shape::Line(line) => {
            line.start = anchor;
            line.end = if constrain {
                snap_line_endpoint(anchor, current, angle_increment).point
            } else {
                current
            };
        }
        Shape::Rect(rect) => {
            let r = drag_rect(anchor, current, constrain);
            rect.position = r.origin();
            rect.width = r.width();
            rect.height = r.height();
        }
        Shape::Circle(circle) => {
            circle.position = anchor;
            circle.radius = anchor.distance(current);
        }
        Shape::Text(_) | Shape::Group(_) => {}
    }
}
