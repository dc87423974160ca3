//! Engine configuration.

use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid JSON config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Tunables for the editing engine. Missing fields fall back to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum number of history snapshots kept.
    pub max_history: usize,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Factor for zoom in/out commands.
    pub zoom_step: f64,
    /// Wheel zoom factor is `wheel_zoom_base ^ delta_y`.
    pub wheel_zoom_base: f64,
    /// Screen pixels panned per modified wheel event.
    pub wheel_pan_step: f64,
    /// Equal-gap snap threshold in screen pixels.
    pub snap_threshold_px: f64,
    /// Offset applied to pasted and duplicated objects.
    pub paste_offset: f64,
    pub nudge_step: f64,
    pub nudge_step_large: f64,
    /// Line angle snap increment in degrees.
    pub angle_snap_increment: f64,
    pub min_viewport: Size,
    pub default_viewport: Size,
    /// Hit-test tolerance in screen pixels.
    pub hit_tolerance_px: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_history: 50,
            min_zoom: 0.2,
            max_zoom: 5.0,
            zoom_step: 1.2,
            wheel_zoom_base: 0.999,
            wheel_pan_step: 50.0,
            snap_threshold_px: 5.0,
            paste_offset: 20.0,
            nudge_step: 1.0,
            nudge_step_large: 10.0,
            angle_snap_increment: 45.0,
            min_viewport: Size::new(800.0, 500.0),
            default_viewport: Size::new(1200.0, 700.0),
            hit_tolerance_px: 4.0,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_history == 0 {
            return Err(ConfigError::Invalid("max_history must be >= 1".to_string()));
        }
        if !(self.min_zoom > 0.0 && self.min_zoom <= 1.0 && self.max_zoom >= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "zoom bounds must satisfy 0 < min_zoom <= 1 <= max_zoom, got [{}, {}]",
                self.min_zoom, self.max_zoom
            )));
        }
        if !(self.zoom_step.is_finite() && self.zoom_step > 1.0) {
            return Err(ConfigError::Invalid("zoom_step must be > 1".to_string()));
        }
        if !(self.wheel_zoom_base > 0.0 && self.wheel_zoom_base < 1.0) {
            return Err(ConfigError::Invalid(
                "wheel_zoom_base must be in (0, 1)".to_string(),
            ));
        }
        let positive = [
            ("wheel_pan_step", self.wheel_pan_step),
            ("snap_threshold_px", self.snap_threshold_px),
            ("paste_offset", self.paste_offset),
            ("nudge_step", self.nudge_step),
            ("nudge_step_large", self.nudge_step_large),
            ("angle_snap_increment", self.angle_snap_increment),
            ("hit_tolerance_px", self.hit_tolerance_px),
            ("min_viewport.width", self.min_viewport.width),
            ("min_viewport.height", self.min_viewport.height),
            ("default_viewport.width", self.default_viewport.width),
            ("default_viewport.height", self.default_viewport.height),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EngineConfig::from_json(r#"{"max_history": 10}"#).unwrap();
        assert_eq!(config.max_history, 10);
        assert!((config.max_zoom - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_zoom_bounds() {
        let result = EngineConfig::from_json(r#"{"min_zoom": 0.0}"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
        let result = EngineConfig::from_json(r#"{"max_zoom": 0.5}"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_zero_history_rejected() {
        let result = EngineConfig::from_json(r#"{"max_history": 0}"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            EngineConfig::from_json("{"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"paste_offset": 30}}"#).unwrap();
        let config = EngineConfig::load_from_file(file.path()).unwrap();
        assert!((config.paste_offset - 30.0).abs() < f64::EPSILON);
    }
}
