//! Active selection and move-drag state.

use crate::shapes::{ObjectId, SceneObject};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// The scene's active handle: one object, or a composite over several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActiveSelection {
    Single(ObjectId),
    Composite(Vec<ObjectId>),
}

impl ActiveSelection {
    /// Build a selection from ids; `None` when empty, `Single` for one id.
    pub fn from_ids(mut ids: Vec<ObjectId>) -> Option<Self> {
        match ids.len() {
            0 => None,
            1 => ids.pop().map(Self::Single),
            _ => Some(Self::Composite(ids)),
        }
    }

    /// All object ids covered by this selection.
    pub fn ids(&self) -> Vec<ObjectId> {
        match self {
            Self::Single(id) => vec![*id],
            Self::Composite(ids) => ids.clone(),
        }
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        match self {
            Self::Single(single) => *single == id,
            Self::Composite(ids) => ids.contains(&id),
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Composite(_))
    }

    /// The object that z-order and property edits act on.
    pub fn primary(&self) -> Option<ObjectId> {
        match self {
            Self::Single(id) => Some(*id),
            Self::Composite(ids) => ids.first().copied(),
        }
    }

    /// Drop an id; returns the remaining selection, if any.
    pub fn without(&self, id: ObjectId) -> Option<Self> {
        let remaining: Vec<ObjectId> = self.ids().into_iter().filter(|&i| i != id).collect();
        Self::from_ids(remaining)
    }
}

/// Observable selection slot mirrored from the scene's active handle.
#[derive(Debug, Clone, Default)]
pub struct SelectionSlot {
    active: Option<ActiveSelection>,
}

impl SelectionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<&ActiveSelection> {
        self.active.as_ref()
    }

    /// Replace the slot contents. Returns true if the value changed.
    pub fn set(&mut self, active: Option<ActiveSelection>) -> bool {
        if self.active == active {
            return false;
        }
        self.active = active;
        true
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_none()
    }
}

/// State of a select-mode drag moving the active object(s).
#[derive(Debug, Clone)]
pub struct MoveState {
    /// Scene point where the drag started.
    pub start_point: Point,
    /// Scene point of the latest move tick.
    pub current_point: Point,
    /// Top-left of each moved object when the drag started.
    pub original_positions: Vec<(ObjectId, Point)>,
    /// Union bounds of the moved objects when the drag started.
    pub original_bounds: Rect,
}

impl MoveState {
    pub fn new(start_point: Point, objects: &[&SceneObject]) -> Self {
        let original_positions = objects
            .iter()
            .map(|o| (o.id, Point::new(o.left(), o.top())))
            .collect();
        let original_bounds = union_bounds(objects.iter().copied()).unwrap_or(Rect::ZERO);
        Self {
            start_point,
            current_point: start_point,
            original_positions,
            original_bounds,
        }
    }

    /// Get the drag delta.
    pub fn delta(&self) -> Vec2 {
        self.current_point - self.start_point
    }

    /// Ids of the objects being moved.
    pub fn ids(&self) -> Vec<ObjectId> {
        self.original_positions.iter().map(|(id, _)| *id).collect()
    }
}

/// Union of the bounds of a set of objects.
pub fn union_bounds<'a>(objects: impl IntoIterator<Item = &'a SceneObject>) -> Option<Rect> {
    objects
        .into_iter()
        .map(SceneObject::bounds)
        .reduce(|acc, b| acc.union(b))
}
