//! Viewport controller for pan/zoom transforms.

use crate::config::EngineConfig;
use crate::input::Modifiers;
use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// What a single wheel event did to the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WheelAction {
    PanHorizontal(f64),
    PanVertical(f64),
    Zoom { anchor: Point, zoom: f64 },
}

/// Scene-to-screen transform: `screen = scene * zoom + pan`.
///
/// Zoom is always kept inside `[min_zoom, max_zoom]`, and `min_zoom` is
/// strictly positive, so the transform stays invertible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Viewport {
    /// Current translation offset in screen pixels.
    pub pan: Vec2,
    /// Current zoom level (1.0 = 100%).
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Factor applied by `zoom_in`/`zoom_out`.
    pub zoom_step: f64,
    /// Visible canvas size in screen pixels.
    pub size: Size,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl Viewport {
    /// Out-of-range zoom settings fall back to the defaults so that
    /// `0 < min_zoom <= 1 <= max_zoom` and `zoom_step > 1` always hold.
    pub fn from_config(config: &EngineConfig) -> Self {
        let defaults = EngineConfig::default();
        let min_zoom = if config.min_zoom.is_finite() && config.min_zoom > 0.0 {
            config.min_zoom.min(1.0)
        } else {
            defaults.min_zoom
        };
        let max_zoom = if config.max_zoom.is_finite() {
            config.max_zoom.max(1.0)
        } else {
            defaults.max_zoom
        };
        let zoom_step = if config.zoom_step.is_finite() && config.zoom_step > 1.0 {
            config.zoom_step
        } else {
            defaults.zoom_step
        };
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
            min_zoom,
            max_zoom,
            zoom_step,
            size: config.default_viewport,
        }
    }

    /// Transform converting scene coordinates to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.pan) * Affine::scale(self.zoom)
    }

    /// Transform converting screen coordinates to scene coordinates.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.pan)
    }

    pub fn to_scene_point(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    pub fn to_screen_point(&self, scene_point: Point) -> Point {
        self.transform() * scene_point
    }

    /// Convert a screen-pixel distance to scene units at the current zoom.
    pub fn screen_to_scene_distance(&self, pixels: f64) -> f64 {
        pixels / self.zoom
    }

    /// Pan by a delta in screen coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    /// Set the zoom, keeping `scene_point` fixed on screen. Returns false
    /// if the clamped zoom equals the current one.
    pub fn zoom_at(&mut self, scene_point: Point, target_zoom: f64) -> bool {
        let new_zoom = target_zoom.clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return false;
        }
        let screen_point = self.to_screen_point(scene_point);
        self.zoom = new_zoom;
        self.pan = Vec2::new(
            screen_point.x - scene_point.x * new_zoom,
            screen_point.y - scene_point.y * new_zoom,
        );
        true
    }

    /// Scene point under the middle of the visible canvas.
    pub fn center_scene_point(&self) -> Point {
        self.to_scene_point(Point::new(self.size.width / 2.0, self.size.height / 2.0))
    }

    pub fn zoom_in(&mut self) -> bool {
        let anchor = self.center_scene_point();
        self.zoom_at(anchor, self.zoom * self.zoom_step)
    }

    pub fn zoom_out(&mut self) -> bool {
        let anchor = self.center_scene_point();
        self.zoom_at(anchor, self.zoom / self.zoom_step)
    }

    /// Reset to the identity transform.
    pub fn reset(&mut self) {
        self.pan = Vec2::ZERO;
        self.zoom = 1.0;
    }

    /// Resize the visible canvas, clamped to `min_size`. Pan and zoom are kept.
    pub fn resize(&mut self, size: Size, min_size: Size) -> Size {
        self.size = Size::new(
            size.width.max(min_size.width),
            size.height.max(min_size.height),
        );
        self.size
    }

    /// Visible canvas extent in scene coordinates.
    pub fn visible_scene_rect(&self) -> Rect {
        let top_left = self.to_scene_point(Point::ZERO);
        let bottom_right = self.to_scene_point(Point::new(self.size.width, self.size.height));
        Rect::from_points(top_left, bottom_right)
    }

    /// Apply a wheel event. Exactly one behavior fires, chosen by modifier:
    /// Shift pans horizontally, Ctrl pans vertically, otherwise zoom at the pointer.
    pub fn apply_wheel(
        &mut self,
        screen_point: Point,
        delta_y: f64,
        modifiers: Modifiers,
        config: &EngineConfig,
    ) -> Option<WheelAction> {
        if delta_y == 0.0 || !delta_y.is_finite() {
            return None;
        }
        let step = config.wheel_pan_step * delta_y.signum();
        if modifiers.shift {
            self.pan(Vec2::new(-step, 0.0));
            Some(WheelAction::PanHorizontal(-step))
        } else if modifiers.ctrl {
            self.pan(Vec2::new(0.0, -step));
            Some(WheelAction::PanVertical(-step))
        } else {
            let anchor = self.to_scene_point(screen_point);
            let target = self.zoom * config.wheel_zoom_base.powf(delta_y);
            self.zoom_at(anchor, target).then_some(WheelAction::Zoom {
                anchor,
                zoom: self.zoom,
            })
        }
    }
}
