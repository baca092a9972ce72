//! Smoothed viewport that follows the player.

use std::time::Duration;

use glam::Vec2;

/// Viewport origin expressed in tile units.
///
/// The origin eases toward a target that centres the focus point and never
/// leaves the maze bounds. When the maze is smaller than the viewport along an
/// axis the origin stays at zero on that axis.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    position: Vec2,
    viewport: Vec2,
    bounds: Vec2,
    smoothing: f32,
}

impl Camera {
    /// Creates a camera already snapped onto `focus`.
    #[must_use]
    pub fn new(viewport: Vec2, bounds: Vec2, smoothing: f32, focus: Vec2) -> Self {
        let mut camera = Self {
            position: Vec2::ZERO,
            viewport: viewport.max(Vec2::ZERO),
            bounds: bounds.max(Vec2::ZERO),
            smoothing,
        };
        camera.position = camera.target_for(focus);
        camera
    }

    /// Top-left corner of the visible region.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Clamped origin that would centre `focus`.
    #[must_use]
    pub fn target_for(&self, focus: Vec2) -> Vec2 {
        let max = (self.bounds - self.viewport).max(Vec2::ZERO);
        (focus - self.viewport * 0.5).clamp(Vec2::ZERO, max)
    }

    /// Eases toward the target for `focus` using exponential smoothing.
    pub fn follow(&mut self, focus: Vec2, dt: Duration) {
        let target = self.target_for(focus);
        if !self.smoothing.is_finite() || self.smoothing <= 0.0 {
            self.position = target;
            return;
        }
        let blend = 1.0 - (-self.smoothing * dt.as_secs_f32()).exp();
        self.position += (target - self.position) * blend;
    }
}
