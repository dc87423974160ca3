//! Pointer and wheel handling: panning, shape gestures, symbol placement,
//! select-mode dragging with equal-gap guides, shift-click and marquee
//! multi-selection.

use super::EditorEngine;
use crate::input::{PointerInput, WheelInput};
use crate::scene::SceneAdapter;
use crate::selection::{ActiveSelection, MoveState};
use crate::shapes::{ObjectId, SceneObject, Shape};
use crate::snap::detect_equal_spacing;
use crate::tools::{Cursor, DrawingMode, ToolState, gesture_shape, label, update_gesture_shape};
use kurbo::{Point, Rect};

impl<S: SceneAdapter> EditorEngine<S> {
    pub fn on_pointer_down(&mut self, input: &PointerInput) {
        if self.scene.is_none() {
            return;
        }
        // Pick up changes made directly on the scene
        self.sync();

        // Panning never starts on top of a gesture or drag
        if input.is_pan_trigger() {
            if !self.tools.is_active() {
                self.tools.begin_pan(input.position);
                if let Some(scene) = self.scene.as_mut() {
                    scene.set_interactive(false);
                }
                self.set_cursor(Cursor::Grabbing);
                log::debug!("Pan started at {:?}", input.position);
            }
            return;
        }
        if self.tools.is_active() || self.tools.is_panning() {
            return;
        }

        let point = self.viewport.to_scene_point(input.position);
        match self.tools.mode {
            DrawingMode::Select => self.press_select(point, input.modifiers.shift),
            DrawingMode::Line | DrawingMode::Rect | DrawingMode::Circle => {
                self.start_gesture(point)
            }
            DrawingMode::Text => {
                let object = SceneObject::new(Shape::Text(label(point)));
                self.place(object);
            }
            DrawingMode::Switch | DrawingMode::Breaker | DrawingMode::Outlet => {
                if let Some(symbol) = self.tools.mode.symbol() {
                    log::debug!("Placing {} at {:?}", symbol.name(), point);
                    self.place(symbol.build(point));
                }
            }
        }
        self.sync();
    }

    pub fn on_pointer_move(&mut self, input: &PointerInput) {
        if self.scene.is_none() {
            return;
        }
        if let Some(delta) = self.tools.pan_to(input.position) {
            self.viewport.pan(delta);
            self.viewport_changed(true);
            return;
        }

        let point = self.viewport.to_scene_point(input.position);
        match &mut self.tools.state {
            ToolState::Drawing(gesture) => {
                let (anchor, id) = (gesture.anchor, gesture.object_id);
                if let Some(object) = self.scene.as_mut().and_then(|s| s.get_mut(id)) {
                    update_gesture_shape(
                        &mut object.shape,
                        anchor,
                        point,
                        input.modifiers.shift,
                        self.config.angle_snap_increment,
                    );
                }
                self.request_render();
            }
            ToolState::Moving(state) => {
                state.current_point = point;
                self.drag_selection();
            }
            ToolState::Selecting(marquee) => {
                marquee.current = point;
                self.request_render();
            }
            ToolState::Idle => {}
        }
    }

    pub fn on_pointer_up(&mut self, _input: &PointerInput) {
        if self.scene.is_none() {
            return;
        }
        if self.tools.end_pan() {
            let mode = self.tools.mode;
            if let Some(scene) = self.scene.as_mut() {
                scene.set_interactive(mode == DrawingMode::Select);
            }
            self.set_cursor(mode.cursor());
            log::debug!("Pan ended");
            return;
        }

        match self.tools.state {
            ToolState::Moving(_) => {
                self.settle_move();
                return;
            }
            ToolState::Selecting(_) => {
                self.finish_marquee();
                return;
            }
            _ => {}
        }
        let ToolState::Drawing(gesture) = self.tools.finish() else {
            return;
        };
        if let Some(scene) = self.scene.as_mut() {
            if let Some(object) = scene.get_mut(gesture.object_id) {
                object.selectable = true;
                object.evented = true;
                object.has_controls = true;
                object.has_borders = true;
                log::debug!(
                    "Finished {} gesture: {:?}",
                    gesture.mode.name(),
                    object.bounds()
                );
            }
            scene.mark_modified(gesture.object_id);
        }
        self.sync();
        if self.tools.mode != DrawingMode::Select {
            self.set_mode(DrawingMode::Select);
        }
    }

    pub fn on_wheel(&mut self, input: &WheelInput) {
        if self.scene.is_none() {
            return;
        }
        if let Some(action) =
            self.viewport
                .apply_wheel(input.position, input.delta_y, input.modifiers, &self.config)
        {
            log::debug!("Wheel: {:?}", action);
            self.viewport_changed(true);
        }
    }

    /// Select-mode press. A hit starts dragging the selection; with Shift
    /// it toggles the object in or out of the selection instead. Empty
    /// canvas starts a marquee, clearing the selection unless Shift is held.
    fn press_select(&mut self, point: Point, additive: bool) {
        let tolerance = self
            .viewport
            .screen_to_scene_distance(self.config.hit_tolerance_px);
        let Some(scene) = self.scene.as_mut() else {
            return;
        };
        let Some(hit) = scene.hit_test(point, tolerance) else {
            if !additive {
                scene.set_active(None);
            }
            self.tools.begin_marquee(point, additive);
            return;
        };

        if additive {
            let selection = match scene.active() {
                Some(active) if active.contains(hit) => active.without(hit),
                Some(active) => {
                    let mut ids = active.ids();
                    ids.push(hit);
                    ActiveSelection::from_ids(ids)
                }
                None => Some(ActiveSelection::Single(hit)),
            };
            scene.set_active(selection);
            return;
        }

        // Pressing inside a composite keeps it, so the whole group drags
        let keep = scene
            .active()
            .is_some_and(|active| active.is_composite() && active.contains(hit));
        if !keep {
            scene.set_active(Some(ActiveSelection::Single(hit)));
        }
        let ids = scene.active().map(ActiveSelection::ids).unwrap_or_default();
        let objects: Vec<&SceneObject> = ids.iter().filter_map(|&id| scene.get(id)).collect();
        self.tools.begin_move(MoveState::new(point, &objects));
        self.set_cursor(Cursor::Move);
    }

    /// Select every selectable object the marquee touches. A click without
    /// movement leaves the selection as the press left it.
    fn finish_marquee(&mut self) {
        let ToolState::Selecting(marquee) = self.tools.finish() else {
            return;
        };
        self.request_render();
        if marquee.is_click() {
            return;
        }
        let Some(scene) = self.scene.as_mut() else {
            return;
        };
        let mut ids: Vec<ObjectId> = if marquee.additive {
            scene.active().map(ActiveSelection::ids).unwrap_or_default()
        } else {
            Vec::new()
        };
        for object in scene.objects() {
            if object.selectable
                && object.evented
                && marquee.touches(object.bounds())
                && !ids.contains(&object.id)
            {
                ids.push(object.id);
            }
        }
        log::debug!("Marquee {:?} selected {} object(s)", marquee.rect(), ids.len());
        scene.set_active(ActiveSelection::from_ids(ids));
        self.sync();
    }

    /// Add the zero-size primitive for the current mode. It stays out of
    /// hit-testing until the gesture finishes.
    fn start_gesture(&mut self, point: Point) {
        let mode = self.tools.mode;
        let (Some(shape), Some(scene)) = (gesture_shape(mode, point), self.scene.as_mut()) else {
            return;
        };
        let mut object = SceneObject::new(shape);
        object.selectable = false;
        object.evented = false;
        object.has_controls = false;
        object.has_borders = false;
        let id = object.id;
        scene.add(object);
        self.tools.begin_gesture(point, id);
        log::debug!("Started {} gesture at {:?}", mode.name(), point);
    }

    /// One-shot placement: insert, select, and return to select mode.
    fn place(&mut self, object: SceneObject) {
        let Some(scene) = self.scene.as_mut() else {
            return;
        };
        let id = object.id;
        scene.add(object);
        scene.set_active(Some(ActiveSelection::Single(id)));
        self.sync();
        self.set_mode(DrawingMode::Select);
    }

    /// Apply the current drag delta plus any equal-gap correction.
    fn drag_selection(&mut self) {
        let threshold = self
            .viewport
            .screen_to_scene_distance(self.config.snap_threshold_px);
        let extent = self.viewport.visible_scene_rect();
        let (Some(scene), ToolState::Moving(state)) = (self.scene.as_mut(), &self.tools.state) else {
            return;
        };

        let delta = state.delta();
        let moving = state.original_bounds + delta;
        let ids = state.ids();
        let others: Vec<Rect> = scene
            .objects()
            .into_iter()
            .filter(|o| !ids.contains(&o.id))
            .map(SceneObject::bounds)
            .collect();
        let snap = detect_equal_spacing(moving, &others, threshold, extent);
        let delta = delta + snap.offset;

        for &(id, origin) in &state.original_positions {
            if let Some(object) = scene.get_mut(id) {
                object.set_position(origin + delta);
            }
        }
        if snap.is_snapped() {
            log::debug!("Equal-gap snap by {:?}", snap.offset);
        }
        self.set_guides(snap.guides);
        self.request_render();
    }

    /// End a select-mode drag: clear guides, and report moved objects so
    /// the drag becomes one history entry.
    pub(super) fn settle_move(&mut self) {
        let ToolState::Moving(state) = std::mem::take(&mut self.tools.state) else {
            return;
        };
        self.set_guides(Vec::new());
        self.set_cursor(self.tools.mode.cursor());

        let Some(scene) = self.scene.as_mut() else {
            return;
        };
        let mut moved = false;
        for &(id, origin) in &state.original_positions {
            let Some(object) = scene.get(id) else {
                continue;
            };
            if Point::new(object.left(), object.top()) != origin {
                scene.mark_modified(id);
                moved = true;
            }
        }
        if moved {
            log::debug!("Moved {} object(s)", state.original_positions.len());
        }
        self.request_render();
        self.sync();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{KeyInput, Modifiers, MouseButton};
    use crate::scene::MemoryScene;
    use crate::shapes::Rectangle;
    use crate::snap::GuideAxis;
    use kurbo::Vec2;

    fn engine() -> EditorEngine<MemoryScene> {
        let mut engine = EditorEngine::default();
        engine.attach(MemoryScene::default());
        engine
    }

    fn press(engine: &mut EditorEngine<MemoryScene>, x: f64, y: f64) {
        engine.on_pointer_down(&PointerInput::new(Point::new(x, y)));
    }

    fn drag_to(engine: &mut EditorEngine<MemoryScene>, x: f64, y: f64) {
        engine.on_pointer_move(&PointerInput::new(Point::new(x, y)));
    }

    fn release(engine: &mut EditorEngine<MemoryScene>, x: f64, y: f64) {
        engine.on_pointer_up(&PointerInput::new(Point::new(x, y)));
    }

    fn shift() -> Modifiers {
        Modifiers {
            shift: true,
            ..Default::default()
        }
    }

    fn shift_press(engine: &mut EditorEngine<MemoryScene>, x: f64, y: f64) {
        engine.on_pointer_down(&PointerInput::new(Point::new(x, y)).with_modifiers(shift()));
    }

    fn middle(x: f64, y: f64) -> PointerInput {
        PointerInput::new(Point::new(x, y)).with_button(MouseButton::Middle)
    }

    fn only_object(engine: &EditorEngine<MemoryScene>) -> SceneObject {
        let objects = engine.scene().unwrap().objects();
        assert_eq!(objects.len(), 1);
        objects[0].clone()
    }

    fn add_rect(engine: &mut EditorEngine<MemoryScene>, x: f64, y: f64, w: f64, h: f64) -> uuid::Uuid {
        let object = SceneObject::new(Shape::Rect(Rectangle::new(Point::new(x, y), w, h)));
        let id = object.id;
        engine.scene_mut().unwrap().add(object);
        id
    }

    #[test]
    fn test_rect_gesture() {
        let mut engine = engine();
        engine.set_mode(DrawingMode::Rect);
        press(&mut engine, 100.0, 100.0);
        drag_to(&mut engine, 40.0, 130.0);
        release(&mut engine, 40.0, 130.0);

        let object = only_object(&engine);
        assert_eq!(object.bounds(), Rect::new(40.0, 100.0, 100.0, 130.0));
        assert!(object.selectable && object.evented && object.has_controls);
        assert_eq!(engine.mode(), DrawingMode::Select);
        assert!(engine.selection().is_none());
    }

    #[test]
    fn test_live_shape_not_hit_testable() {
        let mut engine = engine();
        engine.set_mode(DrawingMode::Circle);
        press(&mut engine, 100.0, 100.0);
        drag_to(&mut engine, 130.0, 140.0);
        let object = only_object(&engine);
        assert!(!object.selectable);
        if let Shape::Circle(circle) = &object.shape {
            assert!((circle.radius - 50.0).abs() < 1e-9);
            assert_eq!(circle.position, Point::new(100.0, 100.0));
        } else {
            panic!("expected a circle");
        }
    }

    #[test]
    fn test_line_shift_snaps_angle() {
        let mut engine = engine();
        engine.set_mode(DrawingMode::Line);
        press(&mut engine, 0.0, 0.0);
        let shift = Modifiers {
            shift: true,
            ..Default::default()
        };
        engine.on_pointer_move(&PointerInput::new(Point::new(100.0, 90.0)).with_modifiers(shift));
        release(&mut engine, 100.0, 90.0);

        let Shape::Line(line) = only_object(&engine).shape else {
            panic!("expected a line");
        };
        assert!((line.end.x - line.end.y).abs() < 1e-9);
        assert!((line.length() - Point::ZERO.distance(Point::new(100.0, 90.0))).abs() < 1e-9);
    }

    #[test]
    fn test_zero_movement_gesture_accepted() {
        let mut engine = engine();
        engine.set_mode(DrawingMode::Rect);
        press(&mut engine, 10.0, 10.0);
        release(&mut engine, 10.0, 10.0);
        let object = only_object(&engine);
        assert_eq!(object.bounds().size(), kurbo::Size::ZERO);
        assert_eq!(engine.history().len(), 2);
    }

    #[test]
    fn test_symbol_placement_is_one_shot() {
        let mut engine = engine();
        engine.set_mode(DrawingMode::Breaker);
        press(&mut engine, 200.0, 200.0);

        let object = only_object(&engine);
        assert_eq!(object.bounds().center(), Point::new(200.0, 200.0));
        assert_eq!(engine.selection(), Some(&ActiveSelection::Single(object.id)));
        assert_eq!(engine.mode(), DrawingMode::Select);
        assert!(!engine.is_interacting());
        release(&mut engine, 200.0, 200.0);
        assert_eq!(engine.history().len(), 2);
    }

    #[test]
    fn test_text_mode_places_label() {
        let mut engine = engine();
        engine.set_mode(DrawingMode::Text);
        press(&mut engine, 30.0, 40.0);
        let object = only_object(&engine);
        assert!(matches!(object.shape, Shape::Text(_)));
        assert_eq!((object.left(), object.top()), (30.0, 40.0));
        assert_eq!(engine.mode(), DrawingMode::Select);
    }

    #[test]
    fn test_pan_with_middle_button() {
        let mut engine = engine();
        let pointer = PointerInput::new(Point::new(100.0, 100.0)).with_button(MouseButton::Middle);
        engine.on_pointer_down(&pointer);
        assert!(engine.is_panning());
        assert!(!engine.scene().unwrap().is_interactive());

        engine.on_pointer_move(&PointerInput::new(Point::new(130.0, 90.0)));
        engine.on_pointer_move(&PointerInput::new(Point::new(140.0, 80.0)));
        assert_eq!(engine.viewport().pan, Vec2::new(40.0, -20.0));

        engine.on_pointer_up(&PointerInput::new(Point::new(140.0, 80.0)));
        assert!(!engine.is_panning());
        assert!(engine.scene().unwrap().is_interactive());
        assert!(engine.scene().unwrap().is_empty());
        assert_eq!(engine.history().len(), 1);
    }

    #[test]
    fn test_undo_during_pan_restores_interactivity() {
        let mut engine = engine();
        let id = engine.add_text().unwrap();
        engine.on_pointer_down(&middle(0.0, 0.0));
        assert!(!engine.scene().unwrap().is_interactive());

        assert!(engine.on_key(&KeyInput::ctrl("z")));
        assert!(!engine.is_panning());
        assert!(engine.scene().unwrap().is_interactive());
        assert_eq!(engine.cursor(), Cursor::Default);
        engine.on_pointer_up(&middle(0.0, 0.0));
        assert!(engine.scene().unwrap().is_interactive());

        assert!(engine.redo());
        press(&mut engine, 105.0, 105.0);
        release(&mut engine, 105.0, 105.0);
        assert_eq!(engine.selection(), Some(&ActiveSelection::Single(id)));
    }

    #[test]
    fn test_import_during_pan_restores_interactivity() {
        let mut engine = engine();
        let snapshot = engine.export_snapshot().unwrap();
        engine.on_pointer_down(&middle(0.0, 0.0));
        engine.import_snapshot(&snapshot).unwrap();
        assert!(!engine.is_panning());
        assert!(engine.scene().unwrap().is_interactive());

        engine.on_pointer_down(&middle(0.0, 0.0));
        assert!(engine.clear_scene());
        assert!(!engine.is_panning());
        assert!(engine.scene().unwrap().is_interactive());
    }

    #[test]
    fn test_mode_key_during_pan() {
        let mut engine = engine();
        engine.on_pointer_down(&middle(0.0, 0.0));
        assert!(engine.on_key(&KeyInput::new("r")));
        assert_eq!(engine.mode(), DrawingMode::Rect);
        assert!(engine.is_panning());
        assert!(!engine.scene().unwrap().is_interactive());
        assert_eq!(engine.cursor(), Cursor::Grabbing);

        assert!(engine.on_key(&KeyInput::new("Escape")));
        assert!(!engine.scene().unwrap().is_interactive());
        engine.on_pointer_move(&middle(30.0, 0.0));
        assert_eq!(engine.viewport().pan, Vec2::new(30.0, 0.0));

        engine.on_pointer_up(&middle(30.0, 0.0));
        assert!(engine.scene().unwrap().is_interactive());
        assert_eq!(engine.cursor(), Cursor::Default);
    }

    #[test]
    fn test_undo_during_drag_clears_guides() {
        let mut engine = engine();
        add_rect(&mut engine, 0.0, 0.0, 10.0, 10.0);
        add_rect(&mut engine, 50.0, 0.0, 10.0, 10.0);
        let moving = add_rect(&mut engine, 300.0, 0.0, 10.0, 10.0);
        press(&mut engine, 305.0, 5.0);
        drag_to(&mut engine, 108.0, 5.0);
        assert_eq!(engine.guides().len(), 3);

        // Shortcuts wait for the drag to end; a direct call does not
        assert!(!engine.on_key(&KeyInput::ctrl("z")));
        assert!(engine.undo());
        assert!(engine.guides().is_empty());
        assert!(!engine.is_interacting());
        assert!(engine.scene().unwrap().is_empty());
        assert!(engine.scene().unwrap().is_interactive());
        assert_eq!(engine.cursor(), Cursor::Default);

        assert!(engine.redo());
        let left = engine.scene().unwrap().get(moving).unwrap().left();
        assert!((left - 300.0).abs() < 1e-9);
        release(&mut engine, 108.0, 5.0);
        assert_eq!(engine.history().len(), 2);
    }

    #[test]
    fn test_ctrl_wheel_pans_vertically() {
        let mut engine = engine();
        let ctrl = Modifiers {
            ctrl: true,
            ..Default::default()
        };
        engine.on_wheel(&WheelInput {
            position: Point::new(300.0, 300.0),
            delta_y: 4.0,
            modifiers: ctrl,
        });
        assert_eq!(engine.viewport().pan, Vec2::new(0.0, -50.0));
        assert!((engine.viewport().zoom - 1.0).abs() < f64::EPSILON);
        assert_eq!(
            engine.scene().unwrap().viewport_transform(),
            kurbo::Affine::translate(Vec2::new(0.0, -50.0))
        );
    }

    #[test]
    fn test_shift_click_toggles_composite() {
        let mut engine = engine();
        let a = add_rect(&mut engine, 0.0, 0.0, 20.0, 20.0);
        let b = add_rect(&mut engine, 50.0, 0.0, 20.0, 20.0);
        press(&mut engine, 10.0, 10.0);
        release(&mut engine, 10.0, 10.0);

        shift_press(&mut engine, 60.0, 10.0);
        assert!(!engine.is_interacting());
        release(&mut engine, 60.0, 10.0);
        assert_eq!(engine.selection(), Some(&ActiveSelection::Composite(vec![a, b])));

        shift_press(&mut engine, 10.0, 10.0);
        assert_eq!(engine.selection(), Some(&ActiveSelection::Single(b)));
        shift_press(&mut engine, 60.0, 10.0);
        assert!(engine.selection().is_none());
        assert_eq!(engine.history().len(), 2);
    }

    #[test]
    fn test_marquee_selects_and_drags_composite() {
        let mut engine = engine();
        let a = add_rect(&mut engine, 0.0, 0.0, 20.0, 20.0);
        let b = add_rect(&mut engine, 50.0, 0.0, 20.0, 20.0);
        let far = add_rect(&mut engine, 300.0, 300.0, 20.0, 20.0);
        engine.sync();
        let history_len = engine.history().len();

        press(&mut engine, -10.0, -10.0);
        drag_to(&mut engine, 60.0, 30.0);
        assert_eq!(engine.marquee(), Some(Rect::new(-10.0, -10.0, 60.0, 30.0)));
        release(&mut engine, 60.0, 30.0);
        assert!(engine.marquee().is_none());
        assert_eq!(engine.selection(), Some(&ActiveSelection::Composite(vec![a, b])));
        assert_eq!(engine.history().len(), history_len);

        press(&mut engine, 10.0, 10.0);
        drag_to(&mut engine, 20.0, 30.0);
        release(&mut engine, 20.0, 30.0);
        let scene = engine.scene().unwrap();
        assert_eq!(scene.get(a).unwrap().left(), 10.0);
        assert_eq!(scene.get(b).unwrap().top(), 20.0);
        assert_eq!(scene.get(far).unwrap().left(), 300.0);
        assert_eq!(engine.history().len(), history_len + 1);

        assert!(engine.delete_selected());
        assert_eq!(engine.scene().unwrap().len(), 1);
    }

    #[test]
    fn test_shift_marquee_extends_selection() {
        let mut engine = engine();
        let a = add_rect(&mut engine, 0.0, 0.0, 20.0, 20.0);
        let b = add_rect(&mut engine, 200.0, 0.0, 20.0, 20.0);
        press(&mut engine, 10.0, 10.0);
        release(&mut engine, 10.0, 10.0);

        shift_press(&mut engine, 150.0, -10.0);
        drag_to(&mut engine, 250.0, 50.0);
        release(&mut engine, 250.0, 50.0);
        assert_eq!(engine.selection(), Some(&ActiveSelection::Composite(vec![a, b])));

        // A plain click on empty canvas clears
        press(&mut engine, 500.0, 500.0);
        release(&mut engine, 500.0, 500.0);
        assert!(engine.selection().is_none());
    }

    #[test]
    fn test_gesture_in_panned_view() {
        let mut engine = engine();
        let alt = Modifiers {
            alt: true,
            ..Default::default()
        };
        engine.on_pointer_down(&PointerInput::new(Point::ZERO).with_modifiers(alt));
        engine.on_pointer_move(&PointerInput::new(Point::new(100.0, 100.0)));
        engine.on_pointer_up(&PointerInput::new(Point::new(100.0, 100.0)));

        engine.set_mode(DrawingMode::Rect);
        press(&mut engine, 100.0, 100.0);
        drag_to(&mut engine, 150.0, 120.0);
        release(&mut engine, 150.0, 120.0);
        assert_eq!(only_object(&engine).bounds(), Rect::new(0.0, 0.0, 50.0, 20.0));
    }

    #[test]
    fn test_drag_moves_and_records_once() {
        let mut engine = engine();
        let id = add_rect(&mut engine, 0.0, 0.0, 20.0, 20.0);
        press(&mut engine, 10.0, 10.0);
        assert_eq!(engine.selection(), Some(&ActiveSelection::Single(id)));
        assert_eq!(engine.cursor(), Cursor::Move);
        let history_len = engine.history().len();

        drag_to(&mut engine, 50.0, 30.0);
        drag_to(&mut engine, 110.0, 210.0);
        assert_eq!(engine.history().len(), history_len);
        release(&mut engine, 110.0, 210.0);

        let object = engine.scene().unwrap().get(id).unwrap().clone();
        assert_eq!((object.left(), object.top()), (100.0, 200.0));
        assert_eq!(engine.history().len(), history_len + 1);
        assert_eq!(engine.cursor(), Cursor::Default);
    }

    #[test]
    fn test_click_without_drag_records_nothing() {
        let mut engine = engine();
        add_rect(&mut engine, 0.0, 0.0, 20.0, 20.0);
        press(&mut engine, 10.0, 10.0);
        let history_len = engine.history().len();
        release(&mut engine, 10.0, 10.0);
        assert_eq!(engine.history().len(), history_len);
    }

    #[test]
    fn test_press_on_empty_canvas_clears_selection() {
        let mut engine = engine();
        add_rect(&mut engine, 0.0, 0.0, 20.0, 20.0);
        press(&mut engine, 10.0, 10.0);
        release(&mut engine, 10.0, 10.0);
        assert!(engine.can_delete());
        press(&mut engine, 500.0, 500.0);
        assert!(!engine.can_delete());
    }

    #[test]
    fn test_drag_snaps_to_equal_gap() {
        let mut engine = engine();
        add_rect(&mut engine, 0.0, 0.0, 10.0, 10.0);
        add_rect(&mut engine, 50.0, 0.0, 10.0, 10.0);
        let moving = add_rect(&mut engine, 300.0, 0.0, 10.0, 10.0);

        press(&mut engine, 305.0, 5.0);
        // Moving left edge lands at 103: gap 43 to O2, within threshold of 40
        drag_to(&mut engine, 108.0, 5.0);
        assert_eq!(engine.guides().len(), 3);
        assert!(engine.guides().iter().all(|g| g.axis == GuideAxis::Vertical));
        let left = engine.scene().unwrap().get(moving).unwrap().left();
        assert!((left - 100.0).abs() < 1e-9);

        drag_to(&mut engine, 505.0, 5.0);
        assert!(engine.guides().is_empty());

        drag_to(&mut engine, 108.0, 5.0);
        release(&mut engine, 108.0, 5.0);
        assert!(engine.guides().is_empty());
        let left = engine.scene().unwrap().get(moving).unwrap().left();
        assert!((left - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_wheel_zoom_and_pan() {
        let mut engine = engine();
        engine.on_wheel(&WheelInput {
            position: Point::new(200.0, 100.0),
            delta_y: -100.0,
            modifiers: Modifiers::default(),
        });
        assert!(engine.viewport().zoom > 1.0);
        let anchor = engine.viewport().to_scene_point(Point::new(200.0, 100.0));
        assert!((anchor - Point::new(200.0, 100.0)).hypot() < 1e-9);

        engine.reset_zoom();
        engine.on_wheel(&WheelInput {
            position: Point::ZERO,
            delta_y: 3.0,
            modifiers: Modifiers {
                shift: true,
                ..Default::default()
            },
        });
        assert_eq!(engine.viewport().pan, Vec2::new(-50.0, 0.0));
        assert!((engine.viewport().zoom - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pan_ignored_mid_gesture() {
        let mut engine = engine();
        engine.set_mode(DrawingMode::Rect);
        press(&mut engine, 0.0, 0.0);
        engine.on_pointer_down(&PointerInput::new(Point::ZERO).with_button(MouseButton::Middle));
        assert!(!engine.is_panning());
        assert!(engine.is_interacting());
    }
}
