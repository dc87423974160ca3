//! Replays scripts against an engine attached to an in-memory scene.

use switchboard_core::{
    EditorEngine, EngineConfig, EngineEvent, MemoryScene, SceneAdapter, SceneError,
};

use crate::script::{Script, ScriptStep};

/// Counters collected while a script runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    pub steps: usize,
    /// Key and command steps the engine acted on.
    pub handled: usize,
    pub renders: usize,
    pub objects: usize,
}

/// A headless editing session.
pub struct Session {
    engine: EditorEngine<MemoryScene>,
}

impl Session {
    pub fn new(config: EngineConfig) -> Self {
        let mut engine = EditorEngine::new(config);
        engine.attach(MemoryScene::default());
        engine.take_events();
        Self { engine }
    }

    /// Starts from a saved snapshot. The history baseline is the loaded scene.
    pub fn with_snapshot(config: EngineConfig, snapshot: &str) -> Result<Self, SceneError> {
        let mut scene = MemoryScene::default();
        scene.deserialize(snapshot)?;
        let mut engine = EditorEngine::new(config);
        engine.attach(scene);
        engine.take_events();
        Ok(Self { engine })
    }

    pub fn engine(&self) -> &EditorEngine<MemoryScene> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut EditorEngine<MemoryScene> {
        &mut self.engine
    }

    /// Applies one step. Returns whether a key or command did anything;
    /// pointer, wheel and resize steps always report `true`.
    pub fn apply(&mut self, step: &ScriptStep) -> bool {
        match step {
            ScriptStep::PointerDown(input) => self.engine.on_pointer_down(input),
            ScriptStep::PointerMove(input) => self.engine.on_pointer_move(input),
            ScriptStep::PointerUp(input) => self.engine.on_pointer_up(input),
            ScriptStep::Wheel(input) => self.engine.on_wheel(input),
            ScriptStep::Key(key) => return self.engine.on_key(key),
            ScriptStep::Command(command) => return self.engine.execute(command.clone()),
            ScriptStep::Resize { width, height } => {
                self.engine.resize_viewport(*width, *height);
            }
        }
        true
    }

    pub fn run(&mut self, script: &Script) -> RunReport {
        let mut report = RunReport::default();
        for (index, step) in script.steps.iter().enumerate() {
            let handled = self.apply(step);
            if !handled {
                log::debug!("Step {} ({}) had no effect", index, step.name());
            }
            if handled && matches!(step, ScriptStep::Key(_) | ScriptStep::Command(_)) {
                report.handled += 1;
            }
            report.renders += self
                .engine
                .take_events()
                .iter()
                .filter(|event| **event == EngineEvent::RenderRequested)
                .count();
            report.steps += 1;
        }
        report.objects = self.engine.scene().map_or(0, |scene| scene.len());
        report
    }

    pub fn snapshot(&self) -> Option<String> {
        self.engine.export_snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;
    use switchboard_core::{DrawingMode, EditorCommand, KeyInput, PointerInput};

    fn draw_rect() -> Script {
        Script {
            steps: vec![
                ScriptStep::Command(EditorCommand::SetMode {
                    mode: DrawingMode::Rect,
                }),
                ScriptStep::PointerDown(PointerInput::new(Point::new(10.0, 10.0))),
                ScriptStep::PointerMove(PointerInput::new(Point::new(90.0, 50.0))),
                ScriptStep::PointerUp(PointerInput::new(Point::new(90.0, 50.0))),
            ],
        }
    }

    #[test]
    fn test_run_draws_shape() {
        let mut session = Session::new(EngineConfig::default());
        let report = session.run(&draw_rect());
        assert_eq!(report.steps, 4);
        assert_eq!(report.handled, 1);
        assert_eq!(report.objects, 1);
        assert!(report.renders > 0);
        assert_eq!(session.engine().mode(), DrawingMode::Select);
        assert!(session.engine().can_undo());
    }

    #[test]
    fn test_unhandled_key_not_counted() {
        let mut session = Session::new(EngineConfig::default());
        let script = Script {
            steps: vec![
                ScriptStep::Key(KeyInput::ctrl("z")),
                ScriptStep::Key(KeyInput::new("F13")),
            ],
        };
        let report = session.run(&script);
        assert_eq!(report.steps, 2);
        assert_eq!(report.handled, 0);
    }

    #[test]
    fn test_resume_from_snapshot() {
        let mut first = Session::new(EngineConfig::default());
        first.run(&draw_rect());
        let saved = first.snapshot().unwrap();

        let mut resumed = Session::with_snapshot(EngineConfig::default(), &saved).unwrap();
        assert_eq!(resumed.snapshot().unwrap(), saved);
        assert!(!resumed.engine().can_undo());

        let report = resumed.run(&Script {
            steps: vec![ScriptStep::Command(EditorCommand::AddText)],
        });
        assert_eq!(report.objects, 2);
        assert!(resumed.engine_mut().undo());
        assert_eq!(resumed.snapshot().unwrap(), saved);
        assert_eq!(resumed.engine().scene().unwrap().len(), 1);
    }

    #[test]
    fn test_bad_snapshot_rejected() {
        assert!(Session::with_snapshot(EngineConfig::default(), "{not json").is_err());
    }
}
