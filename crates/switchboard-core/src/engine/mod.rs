//! The diagram-editing engine.
//!
//! [`EditorEngine`] owns everything a single editor session needs: the
//! viewport, the drawing-mode state machine, the undo history, the
//! clipboard and the transient alignment guides. It drives an attached
//! [`SceneAdapter`] and never renders anything itself. Hosts feed it input
//! through `on_pointer_down`/`on_pointer_move`/`on_pointer_up`, `on_wheel`
//! and `on_key`, and drain [`EngineEvent`]s to learn what to redraw.
//!
//! Every operation is a silent no-op while no scene is attached.

mod editing;
mod gesture;

use crate::clipboard::Clipboard;
use crate::config::EngineConfig;
use crate::history::History;
use crate::input::KeyInput;
use crate::scene::{SceneAdapter, SceneError, SceneEvent, SceneResult};
use crate::selection::{ActiveSelection, SelectionSlot};
use crate::shortcuts::{EditorCommand, ShortcutRegistry};
use crate::snap::GuideLine;
use crate::tools::{Cursor, DrawingMode, ToolManager, ToolState};
use crate::viewport::Viewport;
use kurbo::{Rect, Size};

/// Notifications for the host, drained with [`EditorEngine::take_events`].
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    ModeChanged(DrawingMode),
    SelectionChanged(Option<ActiveSelection>),
    HistoryChanged { can_undo: bool, can_redo: bool },
    /// The full current guide set (empty when cleared).
    GuidesChanged(Vec<GuideLine>),
    CursorChanged(Cursor),
    /// The scene or viewport changed and should be redrawn.
    RenderRequested,
}

/// An editor session over a scene graph.
pub struct EditorEngine<S: SceneAdapter> {
    config: EngineConfig,
    viewport: Viewport,
    tools: ToolManager,
    history: History,
    selection: SelectionSlot,
    clipboard: Clipboard,
    guides: Vec<GuideLine>,
    cursor: Cursor,
    events: Vec<EngineEvent>,
    scene: Option<S>,
}

impl<S: SceneAdapter> Default for EditorEngine<S> {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl<S: SceneAdapter> EditorEngine<S> {
    /// Create a detached engine.
    ///
    /// Out-of-range zoom settings in an unvalidated config are replaced by
    /// the defaults; see [`Viewport::from_config`].
    pub fn new(config: EngineConfig) -> Self {
        if let Err(e) = config.validate() {
            log::warn!("{}; falling back to default viewport bounds", e);
        }
        Self {
            viewport: Viewport::from_config(&config),
            history: History::with_depth(config.max_history),
            tools: ToolManager::new(),
            selection: SelectionSlot::new(),
            clipboard: Clipboard::new(),
            guides: Vec::new(),
            cursor: Cursor::Default,
            events: Vec::new(),
            scene: None,
            config,
        }
    }

    /// Attach a scene, replacing any previously attached one.
    ///
    /// The scene's current contents become the single history baseline.
    pub fn attach(&mut self, mut scene: S) {
        if self.scene.is_some() {
            self.detach();
        }
        scene.drain_events();

        let size = self.viewport.resize(scene.dimensions(), self.config.min_viewport);
        scene.set_dimensions(size);
        scene.set_viewport_transform(self.viewport.transform());
        scene.set_interactive(self.tools.mode == DrawingMode::Select);

        self.history = History::with_depth(self.config.max_history);
        match scene.serialize() {
            Ok(baseline) => self.history.reset(baseline),
            Err(e) => log::warn!("Failed to record history baseline: {}", e),
        }
        if self.selection.set(scene.active().cloned()) {
            self.events
                .push(EngineEvent::SelectionChanged(self.selection.get().cloned()));
        }
        log::info!(
            "Attached scene ({} objects, {}x{})",
            scene.objects().len(),
            size.width,
            size.height
        );
        self.scene = Some(scene);
        self.push_history_changed();
        self.request_render();
    }

    /// Detach and return the scene. Gesture, guides, history and any
    /// in-flight clone are dropped; the clipboard contents are kept.
    pub fn detach(&mut self) -> Option<S> {
        let mut scene = self.scene.take()?;
        if let ToolState::Drawing(gesture) = self.tools.finish() {
            scene.remove(gesture.object_id);
        }
        self.tools.end_pan();
        self.clipboard.cancel();
        self.set_guides(Vec::new());
        self.history = History::with_depth(self.config.max_history);
        if self.selection.set(None) {
            self.events.push(EngineEvent::SelectionChanged(None));
        }
        scene.drain_events();
        self.push_history_changed();
        log::info!("Detached scene");
        Some(scene)
    }

    pub fn is_attached(&self) -> bool {
        self.scene.is_some()
    }

    pub fn scene(&self) -> Option<&S> {
        self.scene.as_ref()
    }

    /// Direct scene access. Changes made here are recorded on the next
    /// [`sync`](Self::sync) or engine operation.
    pub fn scene_mut(&mut self) -> Option<&mut S> {
        self.scene.as_mut()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn mode(&self) -> DrawingMode {
        self.tools.mode
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Guide lines from the latest move tick.
    pub fn guides(&self) -> &[GuideLine] {
        &self.guides
    }

    pub fn selection(&self) -> Option<&ActiveSelection> {
        self.selection.get()
    }

    pub fn can_delete(&self) -> bool {
        !self.selection.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn is_panning(&self) -> bool {
        self.tools.is_panning()
    }

    /// Whether a gesture, drag or marquee is in progress.
    pub fn is_interacting(&self) -> bool {
        self.tools.is_active()
    }

    /// The selection marquee being dragged, in scene coordinates.
    pub fn marquee(&self) -> Option<Rect> {
        match &self.tools.state {
            ToolState::Selecting(marquee) => Some(marquee.rect()),
            _ => None,
        }
    }

    /// Take the notifications raised since the last call.
    pub fn take_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    /// Switch drawing mode.
    ///
    /// Objects are selectable only in select mode. An interrupted gesture
    /// has its partial shape removed; an interrupted drag is committed. A
    /// pan in progress keeps the scene inert until the button is released.
    pub fn set_mode(&mut self, mode: DrawingMode) {
        self.settle_move();
        let interrupted = self.tools.set_mode(mode);
        let panning = self.tools.is_panning();
        if let Some(scene) = self.scene.as_mut() {
            if let Some(gesture) = interrupted {
                log::debug!("Discarding {} gesture on mode change", gesture.mode.name());
                scene.remove(gesture.object_id);
            }
            scene.set_interactive(mode == DrawingMode::Select && !panning);
        }
        self.events.push(EngineEvent::ModeChanged(mode));
        self.set_cursor(if panning { Cursor::Grabbing } else { mode.cursor() });
        self.sync();
    }

    /// Step back one history entry.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo_snapshot().map(str::to_owned) else {
            return false;
        };
        if !self.replay(&snapshot) {
            return false;
        }
        self.history.undo();
        log::debug!("Undo to step {}", self.history.step());
        self.push_history_changed();
        true
    }

    /// Step forward one history entry.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo_snapshot().map(str::to_owned) else {
            return false;
        };
        if !self.replay(&snapshot) {
            return false;
        }
        self.history.redo();
        log::debug!("Redo to step {}", self.history.step());
        self.push_history_changed();
        true
    }

    /// Rebuild the scene from a snapshot with history recording suspended.
    fn replay(&mut self, snapshot: &str) -> bool {
        if self.scene.is_none() {
            return false;
        }
        self.abandon_interaction();
        let Some(scene) = self.scene.as_mut() else {
            return false;
        };
        self.history.begin_replay();
        let result = scene.deserialize(snapshot);
        if result.is_ok() {
            scene.set_active(None);
        }
        self.sync();
        self.history.end_replay();
        if let Err(e) = result {
            log::warn!("Failed to replay history entry: {}", e);
            return false;
        }
        true
    }

    /// Serialize the current scene.
    pub fn export_snapshot(&self) -> Option<String> {
        let scene = self.scene.as_ref()?;
        match scene.serialize() {
            Ok(snapshot) => {
                log::info!("Exported snapshot ({} bytes)", snapshot.len());
                Some(snapshot)
            }
            Err(e) => {
                log::warn!("Failed to export snapshot: {}", e);
                None
            }
        }
    }

    /// Replace the scene with a snapshot. On error the current scene is
    /// left untouched and the error is returned as reported by the scene.
    /// A successful import is recorded as a new history entry.
    pub fn import_snapshot(&mut self, snapshot: &str) -> Result<(), SceneError> {
        if self.scene.is_none() {
            return Ok(());
        }
        self.abandon_interaction();
        self.clipboard.cancel();
        let Some(scene) = self.scene.as_mut() else {
            return Ok(());
        };
        if let Err(e) = scene.deserialize(snapshot) {
            log::warn!("Snapshot import failed: {}", e);
            return Err(e);
        }
        scene.set_active(None);
        log::info!("Imported snapshot ({} objects)", scene.objects().len());
        self.sync();
        Ok(())
    }

    /// Render the scene to an image data URI. `None` while detached.
    pub fn export_raster(&self) -> Option<SceneResult<String>> {
        self.scene.as_ref().map(|scene| scene.export_raster())
    }

    /// Resize the visible canvas, clamped to the configured minimum.
    /// Pan and zoom are preserved.
    pub fn resize_viewport(&mut self, width: f64, height: f64) -> Option<Size> {
        let scene = self.scene.as_mut()?;
        let size = self
            .viewport
            .resize(Size::new(width, height), self.config.min_viewport);
        scene.set_dimensions(size);
        log::debug!("Viewport resized to {}x{}", size.width, size.height);
        self.request_render();
        Some(size)
    }

    pub fn zoom_in(&mut self) -> bool {
        if self.scene.is_none() {
            return false;
        }
        let changed = self.viewport.zoom_in();
        self.viewport_changed(changed)
    }

    pub fn zoom_out(&mut self) -> bool {
        if self.scene.is_none() {
            return false;
        }
        let changed = self.viewport.zoom_out();
        self.viewport_changed(changed)
    }

    /// Back to the identity transform.
    pub fn reset_zoom(&mut self) -> bool {
        if self.scene.is_none() {
            return false;
        }
        self.viewport.reset();
        self.viewport_changed(true)
    }

    /// Run a discrete command. Returns whether it had any effect.
    pub fn execute(&mut self, command: EditorCommand) -> bool {
        log::debug!("Executing {:?}", command);
        match command {
            EditorCommand::SetMode { mode } => {
                self.set_mode(mode);
                true
            }
            EditorCommand::Undo => self.undo(),
            EditorCommand::Redo => self.redo(),
            EditorCommand::SelectAll => self.select_all(),
            EditorCommand::Copy => self.copy(),
            EditorCommand::Paste => self.paste(),
            EditorCommand::Cut => self.cut(),
            EditorCommand::Duplicate => self.duplicate(),
            EditorCommand::AddText => self.add_text().is_some(),
            EditorCommand::DeleteSelected => self.delete_selected(),
            EditorCommand::ZoomIn => self.zoom_in(),
            EditorCommand::ZoomOut => self.zoom_out(),
            EditorCommand::ResetZoom => self.reset_zoom(),
            EditorCommand::MoveSelected { dx, dy } => self.move_selected(dx, dy),
            EditorCommand::BringToFront => self.bring_to_front(),
            EditorCommand::BringForward => self.bring_forward(),
            EditorCommand::SendBackward => self.send_backward(),
            EditorCommand::SendToBack => self.send_to_back(),
            EditorCommand::ClearScene => self.clear_scene(),
            EditorCommand::UpdateProperty { property } => self.update_object_property(property),
        }
    }

    /// Dispatch a key press through the shortcut map.
    pub fn on_key(&mut self, key: &KeyInput) -> bool {
        if self.tools.is_active() {
            return false;
        }
        match ShortcutRegistry::resolve(key, self.config.nudge_step, self.config.nudge_step_large) {
            Some(command) => self.execute(command),
            None => false,
        }
    }

    /// Drain scene notifications: mirror the selection and record a
    /// history entry for mutations, unless a replay or an interaction
    /// is in progress.
    pub fn sync(&mut self) {
        let Some(scene) = self.scene.as_mut() else {
            return;
        };
        let events = scene.drain_events();
        if events.iter().any(SceneEvent::is_selection) {
            let active = scene.active().cloned();
            if self.selection.set(active) {
                self.events
                    .push(EngineEvent::SelectionChanged(self.selection.get().cloned()));
            }
        }
        if !events.iter().any(SceneEvent::is_mutation) {
            return;
        }
        self.request_render();
        if self.history.is_replaying() || self.tools.is_active() {
            return;
        }
        self.save_state();
    }

    fn save_state(&mut self) {
        let Some(scene) = self.scene.as_ref() else {
            return;
        };
        match scene.serialize() {
            Ok(snapshot) => {
                if self.history.save(snapshot) {
                    self.push_history_changed();
                }
            }
            Err(e) => log::warn!("Failed to snapshot scene for history: {}", e),
        }
    }

    /// Drop any gesture (removing its partial shape), drag, marquee or pan.
    fn abandon_interaction(&mut self) {
        let state = self.tools.finish();
        let was_panning = self.tools.end_pan();
        let interactive = self.tools.mode == DrawingMode::Select;
        if let Some(scene) = self.scene.as_mut() {
            if let ToolState::Drawing(gesture) = state {
                scene.remove(gesture.object_id);
                scene.drain_events();
            }
            if was_panning {
                log::debug!("Pan abandoned");
                scene.set_interactive(interactive);
            }
        }
        self.set_guides(Vec::new());
        self.set_cursor(self.tools.mode.cursor());
    }

    fn viewport_changed(&mut self, changed: bool) -> bool {
        if !changed {
            return false;
        }
        if let Some(scene) = self.scene.as_mut() {
            scene.set_viewport_transform(self.viewport.transform());
        }
        log::debug!(
            "Viewport: zoom {:.3}, pan ({:.1}, {:.1})",
            self.viewport.zoom,
            self.viewport.pan.x,
            self.viewport.pan.y
        );
        self.request_render();
        true
    }

    fn set_guides(&mut self, guides: Vec<GuideLine>) {
        if self.guides.is_empty() && guides.is_empty() {
            return;
        }
        self.guides = guides;
        self.events.push(EngineEvent::GuidesChanged(self.guides.clone()));
        self.request_render();
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        if self.cursor != cursor {
            self.cursor = cursor;
            self.events.push(EngineEvent::CursorChanged(cursor));
        }
    }

    fn push_history_changed(&mut self) {
        self.events.push(EngineEvent::HistoryChanged {
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        });
    }

    fn request_render(&mut self) {
        if self.events.last() != Some(&EngineEvent::RenderRequested) {
            self.events.push(EngineEvent::RenderRequested);
        }
    }
}
