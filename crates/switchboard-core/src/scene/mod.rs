//! Contract over the external 2-D scene graph the engine drives.
//!
//! The engine never renders. It adds, removes and mutates [`SceneObject`]s
//! through a [`SceneAdapter`], asks the adapter for hit-testing and
//! serialization, and reacts to the [`SceneEvent`]s the adapter reports.

mod memory;

pub use memory::MemoryScene;

use crate::selection::ActiveSelection;
use crate::shapes::{ObjectId, SceneObject};
use kurbo::{Affine, Point, Size};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Scene adapter errors.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("Malformed snapshot: {0}")]
    Deserialize(#[source] serde_json::Error),
    #[error("Failed to serialize scene: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("Unsupported by this scene: {0}")]
    Unsupported(&'static str),
}

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;

/// Boxed future for async scene operations (single-threaded hosts).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Notifications raised by the scene graph, drained by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneEvent {
    ObjectAdded(ObjectId),
    ObjectRemoved(ObjectId),
    /// An object settled after an interactive change (drag end, property edit).
    ObjectModified(ObjectId),
    SelectionCreated,
    SelectionUpdated,
    SelectionCleared,
}

impl SceneEvent {
    /// Whether this event is a candidate history save point.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::ObjectAdded(_) | Self::ObjectRemoved(_) | Self::ObjectModified(_)
        )
    }

    pub fn is_selection(&self) -> bool {
        matches!(
            self,
            Self::SelectionCreated | Self::SelectionUpdated | Self::SelectionCleared
        )
    }
}

/// The object graph a rendering backend exposes to the engine.
pub trait SceneAdapter {
    /// Add an object on top of the z-order.
    fn add(&mut self, object: SceneObject);

    /// Remove an object, dropping it from the active selection too.
    fn remove(&mut self, id: ObjectId) -> Option<SceneObject>;

    fn get(&self, id: ObjectId) -> Option<&SceneObject>;

    /// Mutable access without raising a modification event.
    fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject>;

    /// Report that an object settled after a change.
    fn mark_modified(&mut self, id: ObjectId);

    /// All objects, bottom of the z-order first.
    fn objects(&self) -> Vec<&SceneObject>;

    /// Remove every object.
    fn clear(&mut self);

    /// Topmost selectable object under a scene point.
    fn hit_test(&self, point: Point, tolerance: f64) -> Option<ObjectId>;

    fn active(&self) -> Option<&ActiveSelection>;

    fn set_active(&mut self, selection: Option<ActiveSelection>);

    fn bring_to_front(&mut self, id: ObjectId) -> bool;
    fn bring_forward(&mut self, id: ObjectId) -> bool;
    fn send_backward(&mut self, id: ObjectId) -> bool;
    fn send_to_back(&mut self, id: ObjectId) -> bool;

    /// Scene-wide toggle of object selectability and pointer events.
    fn set_interactive(&mut self, interactive: bool);

    fn is_interactive(&self) -> bool;

    fn viewport_transform(&self) -> Affine;

    fn set_viewport_transform(&mut self, transform: Affine);

    /// Visible canvas size in screen pixels.
    fn dimensions(&self) -> Size;

    fn set_dimensions(&mut self, size: Size);

    /// Serialize the whole graph. The viewport is not part of a snapshot.
    fn serialize(&self) -> SceneResult<String>;

    /// Replace the whole graph from a snapshot. On error the scene is untouched.
    fn deserialize(&mut self, snapshot: &str) -> SceneResult<()>;

    /// Render to an image data URI.
    fn export_raster(&self) -> SceneResult<String>;

    /// Deep-clone an object with fresh ids. May resolve resources, so it is async.
    fn clone_object(&self, object: &SceneObject) -> BoxFuture<'static, SceneResult<SceneObject>>;

    /// Take the notifications raised since the last drain.
    fn drain_events(&mut self) -> Vec<SceneEvent>;
}
