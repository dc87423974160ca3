//! Switchboard Core Library
//!
//! Interactive diagram-editing engine for switchboard schematics: drawing
//! tools, pan/zoom viewport, equal-gap alignment guides, snapshot undo/redo
//! and a clipboard, driven through an abstract scene graph.

pub mod clipboard;
pub mod config;
pub mod engine;
pub mod history;
pub mod input;
pub mod scene;
pub mod selection;
pub mod shapes;
pub mod shortcuts;
pub mod snap;
pub mod storage;
pub mod symbols;
pub mod tools;
pub mod viewport;

pub use clipboard::{Clipboard, ClonePurpose, CloneRequest, ResolvedClone};
pub use config::{ConfigError, EngineConfig};
pub use engine::{EditorEngine, EngineEvent};
pub use history::History;
pub use input::{KeyInput, Modifiers, MouseButton, PointerInput, WheelInput};
pub use scene::{MemoryScene, SceneAdapter, SceneError, SceneEvent};
pub use selection::ActiveSelection;
pub use shapes::{Capability, ObjectId, ObjectProperty, SceneObject, Shape};
pub use shortcuts::{EditorCommand, ShortcutRegistry};
pub use snap::{AlignmentSnap, GuideAxis, GuideLine, detect_equal_spacing};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
pub use symbols::SymbolKind;
pub use tools::{Cursor, DrawingMode};
pub use viewport::Viewport;
