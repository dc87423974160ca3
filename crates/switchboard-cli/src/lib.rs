//! Switchboard CLI
//!
//! Drives the editing engine headlessly: input scripts are replayed against
//! an in-memory scene and the resulting snapshot is printed or stored.

pub mod script;
pub mod session;

pub use script::{Script, ScriptStep};
pub use session::{RunReport, Session};

use switchboard_core::{ConfigError, SceneError, StorageError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid script: {0}")]
    Script(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("No scene attached")]
    Detached,
}
