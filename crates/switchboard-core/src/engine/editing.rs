//! Selection-driven edits: delete, select all, z-order, nudging, property
//! edits, text labels, and the clipboard's two-phase clone protocol.

use super::EditorEngine;
use crate::clipboard::{ClipboardEntry, ClonePurpose, CloneRequest, ResolvedClone};
use crate::scene::SceneAdapter;
use crate::selection::ActiveSelection;
use crate::shapes::{Group, ObjectId, ObjectProperty, SceneObject, Shape};
use crate::tools::{DEFAULT_LABEL_POSITION, label};
use kurbo::Vec2;

impl<S: SceneAdapter> EditorEngine<S> {
    /// Remove every object in the active selection.
    pub fn delete_selected(&mut self) -> bool {
        let Some(scene) = self.scene.as_mut() else {
            return false;
        };
        let Some(active) = scene.active().cloned() else {
            return false;
        };
        for id in active.ids() {
            scene.remove(id);
        }
        scene.set_active(None);
        log::debug!("Deleted {} object(s)", active.ids().len());
        self.sync();
        true
    }

    /// Select every object as one composite. No-op on an empty scene.
    pub fn select_all(&mut self) -> bool {
        let Some(scene) = self.scene.as_mut() else {
            return false;
        };
        let ids: Vec<ObjectId> = scene.objects().iter().map(|o| o.id).collect();
        if ids.is_empty() {
            return false;
        }
        scene.set_active(Some(ActiveSelection::Composite(ids)));
        self.sync();
        true
    }

    pub fn bring_to_front(&mut self) -> bool {
        self.reorder(|scene, id| scene.bring_to_front(id))
    }

    pub fn bring_forward(&mut self) -> bool {
        self.reorder(|scene, id| scene.bring_forward(id))
    }

    pub fn send_backward(&mut self) -> bool {
        self.reorder(|scene, id| scene.send_backward(id))
    }

    pub fn send_to_back(&mut self) -> bool {
        self.reorder(|scene, id| scene.send_to_back(id))
    }

    /// Reorder the primary selected object.
    fn reorder(&mut self, op: impl FnOnce(&mut S, ObjectId) -> bool) -> bool {
        let Some(scene) = self.scene.as_mut() else {
            return false;
        };
        let Some(id) = scene.active().and_then(ActiveSelection::primary) else {
            return false;
        };
        if !op(scene, id) {
            return false;
        }
        scene.mark_modified(id);
        self.sync();
        true
    }

    /// Nudge the selection by a delta in scene units.
    pub fn move_selected(&mut self, dx: f64, dy: f64) -> bool {
        let Some(scene) = self.scene.as_mut() else {
            return false;
        };
        let Some(active) = scene.active().cloned() else {
            return false;
        };
        let delta = Vec2::new(dx, dy);
        for id in active.ids() {
            if let Some(object) = scene.get_mut(id) {
                object.translate(delta);
                scene.mark_modified(id);
            }
        }
        self.sync();
        true
    }

    /// Apply a property edit to each selected object that supports it.
    /// Returns false when no object accepted the edit.
    pub fn update_object_property(&mut self, property: ObjectProperty) -> bool {
        let Some(scene) = self.scene.as_mut() else {
            return false;
        };
        let Some(active) = scene.active().cloned() else {
            return false;
        };
        let mut applied = false;
        for id in active.ids() {
            let accepted = scene
                .get_mut(id)
                .is_some_and(|object| object.apply(property.clone()));
            if accepted {
                scene.mark_modified(id);
                applied = true;
            }
        }
        if !applied {
            log::debug!("Property {:?} not applicable to selection", property);
        }
        self.sync();
        applied
    }

    /// Insert the default text label and select it.
    pub fn add_text(&mut self) -> Option<ObjectId> {
        let scene = self.scene.as_mut()?;
        let object = SceneObject::new(Shape::Text(label(DEFAULT_LABEL_POSITION)));
        let id = object.id;
        scene.add(object);
        scene.set_active(Some(ActiveSelection::Single(id)));
        self.sync();
        Some(id)
    }

    /// Remove every object. The clipboard contents survive.
    pub fn clear_scene(&mut self) -> bool {
        if self.scene.is_none() {
            return false;
        }
        self.abandon_interaction();
        self.clipboard.cancel();
        let Some(scene) = self.scene.as_mut() else {
            return false;
        };
        scene.clear();
        log::info!("Scene cleared");
        self.sync();
        true
    }

    /// First phase of copy/cut/paste/duplicate: start cloning and return
    /// the pending request. `None` if there is nothing to clone or another
    /// clone is still in flight. A cut removes its sources right away.
    pub fn request_clone(&mut self, purpose: ClonePurpose) -> Option<CloneRequest> {
        let scene = self.scene.as_mut()?;
        if self.clipboard.is_busy() {
            log::debug!("{:?} ignored: clone already in flight", purpose);
            return None;
        }

        let request = match purpose {
            ClonePurpose::Paste => {
                let entry = self.clipboard.entry()?;
                let future = scene.clone_object(&entry.object);
                let composite = entry.composite;
                self.clipboard.begin(purpose, composite, Vec::new(), future)?
            }
            ClonePurpose::Copy | ClonePurpose::Cut | ClonePurpose::Duplicate => {
                let active = scene.active()?.clone();
                let ids = active.ids();
                let objects: Vec<SceneObject> =
                    ids.iter().filter_map(|&id| scene.get(id).cloned()).collect();
                if objects.is_empty() {
                    return None;
                }
                // A multi-object selection travels as one temporary group
                let source = if active.is_composite() {
                    SceneObject::new(Shape::Group(Group::new(objects)))
                } else {
                    objects.into_iter().next()?
                };
                let future = scene.clone_object(&source);
                self.clipboard
                    .begin(purpose, active.is_composite(), ids, future)?
            }
        };

        if purpose == ClonePurpose::Cut {
            for &id in &request.sources {
                scene.remove(id);
            }
            scene.set_active(None);
            self.sync();
        }
        log::debug!("Clone #{} requested for {:?}", request.ticket, purpose);
        Some(request)
    }

    /// Second phase: store or insert a finished clone. Completions for a
    /// cancelled or superseded request are dropped.
    pub fn complete_clone(&mut self, resolved: ResolvedClone) -> bool {
        if !self.clipboard.finish(resolved.ticket) {
            log::warn!("Dropping stale clone completion #{}", resolved.ticket);
            return false;
        }
        let object = match resolved.result {
            Ok(object) => object,
            Err(e) => {
                log::warn!("Clone #{} failed: {}", resolved.ticket, e);
                return false;
            }
        };
        let mut entry = ClipboardEntry {
            object,
            composite: resolved.composite,
        };
        let offset = Vec2::new(self.config.paste_offset, self.config.paste_offset);

        match resolved.purpose {
            ClonePurpose::Copy | ClonePurpose::Cut => {
                self.clipboard.store(entry);
                true
            }
            ClonePurpose::Paste => {
                entry.advance(offset);
                let inserted = self.insert_entry(entry);
                // Later pastes of the same entry land further down-right
                self.clipboard.advance(offset);
                inserted
            }
            ClonePurpose::Duplicate => {
                entry.advance(offset);
                self.insert_entry(entry)
            }
        }
    }

    fn insert_entry(&mut self, entry: ClipboardEntry) -> bool {
        let Some(scene) = self.scene.as_mut() else {
            return false;
        };
        let composite = entry.composite;
        let objects = entry.into_objects();
        let ids: Vec<ObjectId> = objects.iter().map(|o| o.id).collect();
        for object in objects {
            scene.add(object);
        }
        let selection = if composite {
            Some(ActiveSelection::Composite(ids))
        } else {
            ActiveSelection::from_ids(ids)
        };
        scene.set_active(selection);
        self.sync();
        true
    }

    /// Run both clone phases to completion on the current thread.
    fn clone_now(&mut self, purpose: ClonePurpose) -> bool {
        let Some(request) = self.request_clone(purpose) else {
            return false;
        };
        let resolved = pollster::block_on(request.resolve());
        self.complete_clone(resolved)
    }

    pub fn copy(&mut self) -> bool {
        self.clone_now(ClonePurpose::Copy)
    }

    pub fn cut(&mut self) -> bool {
        self.clone_now(ClonePurpose::Cut)
    }

    pub fn paste(&mut self) -> bool {
        self.clone_now(ClonePurpose::Paste)
    }

    pub fn duplicate(&mut self) -> bool {
        self.clone_now(ClonePurpose::Duplicate)
    }
}
