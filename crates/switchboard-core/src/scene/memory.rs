//! In-memory scene graph, used by headless hosts and tests.

use super::{BoxFuture, SceneAdapter, SceneError, SceneEvent, SceneResult};
use crate::selection::ActiveSelection;
use crate::shapes::{ObjectId, SceneObject};
use kurbo::{Affine, Point, Size};
use serde::{Deserialize, Serialize};

const SNAPSHOT_VERSION: u32 = 1;

/// Serialized form of the scene graph.
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    objects: Vec<SceneObject>,
}

#[derive(Debug, Serialize)]
struct SnapshotRef<'a> {
    version: u32,
    objects: &'a [SceneObject],
}

/// Scene graph kept in a plain vector, bottom of the z-order first.
#[derive(Debug)]
pub struct MemoryScene {
    objects: Vec<SceneObject>,
    active: Option<ActiveSelection>,
    interactive: bool,
    transform: Affine,
    size: Size,
    events: Vec<SceneEvent>,
}

impl Default for MemoryScene {
    fn default() -> Self {
        Self::new(Size::new(1200.0, 700.0))
    }
}

impl MemoryScene {
    pub fn new(size: Size) -> Self {
        Self {
            objects: Vec::new(),
            active: None,
            interactive: true,
            transform: Affine::IDENTITY,
            size,
            events: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    fn index_of(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|o| o.id == id)
    }

    fn set_active_quiet(&mut self, selection: Option<ActiveSelection>) {
        let event = match (&self.active, &selection) {
            (None, None) => None,
            (None, Some(_)) => Some(SceneEvent::SelectionCreated),
            (Some(_), None) => Some(SceneEvent::SelectionCleared),
            (Some(old), Some(new)) if old != new => Some(SceneEvent::SelectionUpdated),
            (Some(_), Some(_)) => None,
        };
        self.active = selection;
        if let Some(event) = event {
            self.events.push(event);
        }
    }
}

impl SceneAdapter for MemoryScene {
    fn add(&mut self, object: SceneObject) {
        let id = object.id;
        self.objects.push(object);
        self.events.push(SceneEvent::ObjectAdded(id));
    }

    fn remove(&mut self, id: ObjectId) -> Option<SceneObject> {
        let index = self.index_of(id)?;
        let object = self.objects.remove(index);
        self.events.push(SceneEvent::ObjectRemoved(id));
        if let Some(active) = self.active.clone() {
            if active.contains(id) {
                self.set_active_quiet(active.without(id));
            }
        }
        Some(object)
    }

    fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    fn mark_modified(&mut self, id: ObjectId) {
        if self.index_of(id).is_some() {
            self.events.push(SceneEvent::ObjectModified(id));
        }
    }

    fn objects(&self) -> Vec<&SceneObject> {
        self.objects.iter().collect()
    }

    fn clear(&mut self) {
        self.set_active_quiet(None);
        for object in self.objects.drain(..) {
            self.events.push(SceneEvent::ObjectRemoved(object.id));
        }
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> Option<ObjectId> {
        if !self.interactive {
            return None;
        }
        self.objects
            .iter()
            .rev()
            .filter(|o| o.selectable && o.evented)
            .find(|o| o.hit_test(point, tolerance))
            .map(|o| o.id)
    }

    fn active(&self) -> Option<&ActiveSelection> {
        self.active.as_ref()
    }

    fn set_active(&mut self, selection: Option<ActiveSelection>) {
        // Drop ids that are not in the scene.
        let selection = selection.and_then(|s| {
            let ids = s
                .ids()
                .into_iter()
                .filter(|&id| self.index_of(id).is_some())
                .collect();
            match s {
                ActiveSelection::Composite(_) => match ActiveSelection::from_ids(ids) {
                    Some(ActiveSelection::Single(id)) => Some(ActiveSelection::Composite(vec![id])),
                    other => other,
                },
                ActiveSelection::Single(_) => ActiveSelection::from_ids(ids),
            }
        });
        self.set_active_quiet(selection);
    }

    fn bring_to_front(&mut self, id: ObjectId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let object = self.objects.remove(index);
        self.objects.push(object);
        true
    }

    fn bring_forward(&mut self, id: ObjectId) -> bool {
        match self.index_of(id) {
            Some(index) if index + 1 < self.objects.len() => {
                self.objects.swap(index, index + 1);
                true
            }
            _ => false,
        }
    }

    fn send_backward(&mut self, id: ObjectId) -> bool {
        match self.index_of(id) {
            Some(index) if index > 0 => {
                self.objects.swap(index, index - 1);
                true
            }
            _ => false,
        }
    }

    fn send_to_back(&mut self, id: ObjectId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let object = self.objects.remove(index);
        self.objects.insert(0, object);
        true
    }

    fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn viewport_transform(&self) -> Affine {
        self.transform
    }

    fn set_viewport_transform(&mut self, transform: Affine) {
        self.transform = transform;
    }

    fn dimensions(&self) -> Size {
        self.size
    }

    fn set_dimensions(&mut self, size: Size) {
        self.size = size;
    }

    fn serialize(&self) -> SceneResult<String> {
        serde_json::to_string(&SnapshotRef {
            version: SNAPSHOT_VERSION,
            objects: &self.objects,
        })
        .map_err(SceneError::Serialize)
    }

    fn deserialize(&mut self, snapshot: &str) -> SceneResult<()> {
        let parsed: Snapshot = serde_json::from_str(snapshot).map_err(SceneError::Deserialize)?;
        if parsed.version > SNAPSHOT_VERSION {
            log::warn!(
                "Loading snapshot version {} with reader version {}",
                parsed.version,
                SNAPSHOT_VERSION
            );
        }
        self.clear();
        for object in parsed.objects {
            self.add(object);
        }
        Ok(())
    }

    fn export_raster(&self) -> SceneResult<String> {
        Err(SceneError::Unsupported("raster export"))
    }

    fn clone_object(&self, object: &SceneObject) -> BoxFuture<'static, SceneResult<SceneObject>> {
        let mut copy = object.clone();
        Box::pin(async move {
            copy.regenerate_ids();
            Ok(copy)
        })
    }

    fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }
}
