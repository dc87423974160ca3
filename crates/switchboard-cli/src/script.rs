//! Input scripts: a JSON list of pointer, wheel, key and command steps.

use serde::{Deserialize, Serialize};
use switchboard_core::{EditorCommand, KeyInput, PointerInput, WheelInput};

/// One recorded input or command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ScriptStep {
    PointerDown(PointerInput),
    PointerMove(PointerInput),
    PointerUp(PointerInput),
    Wheel(WheelInput),
    Key(KeyInput),
    Command(EditorCommand),
    Resize { width: f64, height: f64 },
}

impl ScriptStep {
    pub fn name(&self) -> &'static str {
        match self {
            ScriptStep::PointerDown(_) => "pointer_down",
            ScriptStep::PointerMove(_) => "pointer_move",
            ScriptStep::PointerUp(_) => "pointer_up",
            ScriptStep::Wheel(_) => "wheel",
            ScriptStep::Key(_) => "key",
            ScriptStep::Command(_) => "command",
            ScriptStep::Resize { .. } => "resize",
        }
    }
}

/// An ordered list of steps. Serialized as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Script {
    pub steps: Vec<ScriptStep>,
}

impl Script {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;
    use switchboard_core::{DrawingMode, MouseButton};

    #[test]
    fn test_parse_steps() {
        let script = Script::from_json(
            r#"[
                {"step": "command", "command": "set_mode", "mode": "rect"},
                {"step": "pointer_down", "position": {"x": 10.0, "y": 20.0}},
                {"step": "pointer_move", "position": {"x": 60.0, "y": 80.0}, "modifiers": {"shift": true}},
                {"step": "pointer_up", "position": {"x": 60.0, "y": 80.0}, "button": "middle"},
                {"step": "wheel", "position": {"x": 0.0, "y": 0.0}, "delta_y": -120.0},
                {"step": "key", "key": "z", "modifiers": {"ctrl": true}},
                {"step": "resize", "width": 640.0, "height": 480.0}
            ]"#,
        )
        .unwrap();

        assert_eq!(script.len(), 7);
        assert_eq!(
            script.steps[0],
            ScriptStep::Command(EditorCommand::SetMode {
                mode: DrawingMode::Rect
            })
        );
        let ScriptStep::PointerDown(down) = &script.steps[1] else {
            panic!("expected pointer_down");
        };
        assert_eq!(down.position, Point::new(10.0, 20.0));
        assert_eq!(down.button, MouseButton::Left);
        let ScriptStep::PointerMove(moved) = &script.steps[2] else {
            panic!("expected pointer_move");
        };
        assert!(moved.modifiers.shift);
        let ScriptStep::PointerUp(up) = &script.steps[3] else {
            panic!("expected pointer_up");
        };
        assert_eq!(up.button, MouseButton::Middle);
        assert_eq!(script.steps[5], ScriptStep::Key(KeyInput::ctrl("z")));
        assert_eq!(
            script.steps[6],
            ScriptStep::Resize {
                width: 640.0,
                height: 480.0
            }
        );
    }

    #[test]
    fn test_unknown_step_rejected() {
        assert!(Script::from_json(r#"[{"step": "teleport"}]"#).is_err());
        assert!(Script::from_json(r#"{"steps": []}"#).is_err());
    }

    #[test]
    fn test_step_names() {
        let script = Script::from_json(r#"[{"step": "command", "command": "undo"}]"#).unwrap();
        assert_eq!(script.steps[0].name(), "command");
        assert!(Script::default().is_empty());
    }
}
