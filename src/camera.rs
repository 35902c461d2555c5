// camera.rs: orbit/pan camera around a movable target

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, FRAC_PI_6, TAU};

/// Closest the camera may get to its target.
pub const MIN_RADIUS: f32 = 3.0;

/// Elevation is clamped to `[-ELEVATION_LIMIT, ELEVATION_LIMIT]`.
pub const ELEVATION_LIMIT: f32 = FRAC_PI_2 - 0.01;

const WORLD_UP: Vec3 = Vec3::Y;
const DEGENERATE_EPS: f32 = 1e-3;

/// Orbit parameters that `reset` restores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraState {
    pub radius: f32,
    /// Radians, wrapped to `[0, 2π)`.
    pub azimuth: f32,
    /// Radians, clamped to `ELEVATION_LIMIT`.
    pub elevation: f32,
    /// Look-at point, moved by panning.
    pub target: Vec3,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            radius: 20.0,
            azimuth: FRAC_PI_4,
            elevation: FRAC_PI_6,
            target: Vec3::ZERO,
        }
    }
}

impl CameraState {
    /// Same state with radius and elevation pulled back inside their limits.
    pub fn clamped(mut self) -> Self {
        if !self.radius.is_finite() {
            self.radius = MIN_RADIUS;
        }
        self.radius = self.radius.max(MIN_RADIUS);
        if !self.elevation.is_finite() {
            self.elevation = 0.0;
        }
        self.elevation = self.elevation.clamp(-ELEVATION_LIMIT, ELEVATION_LIMIT);
        self.azimuth = if self.azimuth.is_finite() {
            wrap_azimuth(self.azimuth)
        } else {
            0.0
        };
        if !self.target.is_finite() {
            self.target = Vec3::ZERO;
        }
        self
    }

    /// Eye position relative to the target.
    pub fn relative_position(&self) -> Vec3 {
        let (sin_el, cos_el) = self.elevation.sin_cos();
        let (sin_az, cos_az) = self.azimuth.sin_cos();
        self.radius * Vec3::new(cos_el * sin_az, sin_el, cos_el * cos_az)
    }
}

/// Keeps azimuth small so per-frame steps stay representable in `f32`.
fn wrap_azimuth(azimuth: f32) -> f32 {
    let wrapped = azimuth.rem_euclid(TAU);
    // rem_euclid can round up to TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Input sensitivities and auto-rotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Radians per pixel of rotate drag.
    pub rotate_sensitivity: f32,
    /// World units per pixel of pan drag.
    pub pan_sensitivity: f32,
    /// World units per scroll step.
    pub zoom_sensitivity: f32,
    pub auto_rotate: bool,
    /// Radians per second while idle.
    pub auto_rotate_speed: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            rotate_sensitivity: 0.005,
            pan_sensitivity: 0.01,
            zoom_sensitivity: 1.0,
            auto_rotate: true,
            auto_rotate_speed: 0.03,
        }
    }
}

/// Everything the shader needs to place the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    pub position: Vec3,
    pub look_at: Vec3,
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
    /// The view direction was parallel to world up and `right` came from azimuth alone.
    pub fallback_basis: bool,
}

impl CameraView {
    /// Derive position and basis from an orbit state.
    ///
    /// When the view direction lines up with world up the cross product is
    /// degenerate, so `right` falls back to `(cos az, 0, -sin az)`.
    pub fn from_state(state: &CameraState) -> Self {
        let relative = state.relative_position();
        let position = relative + state.target;

        let mut forward = -relative;
        let len = forward.length();
        if len > DEGENERATE_EPS {
            forward /= len;
        }

        let cross = forward.cross(WORLD_UP);
        let cross_len = cross.length();
        let (right, fallback_basis) = if cross_len < DEGENERATE_EPS {
            let (sin_az, cos_az) = state.azimuth.sin_cos();
            (Vec3::new(cos_az, 0.0, -sin_az), true)
        } else {
            (cross / cross_len, false)
        };

        let up = right.cross(forward);

        Self {
            position,
            look_at: state.target,
            forward,
            right,
            up,
            fallback_basis,
        }
    }
}

/// What the pointer is currently doing to the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    Idle,
    Rotating,
    Panning,
    RotatingAndPanning,
}

pub struct OrbitPanCamera {
    state: CameraState,
    defaults: CameraState,
    pub settings: CameraSettings,
    right: Vec3,
    up: Vec3,
    rotating: bool,
    panning: bool,
}

impl Default for OrbitPanCamera {
    fn default() -> Self {
        Self::new(CameraState::default(), CameraSettings::default())
    }
}

impl OrbitPanCamera {
    /// `initial` is clamped and remembered as the reset state.
    pub fn new(initial: CameraState, settings: CameraSettings) -> Self {
        let initial = initial.clamped();
        let view = CameraView::from_state(&initial);
        Self {
            state: initial,
            defaults: initial,
            settings,
            right: view.right,
            up: view.up,
            rotating: false,
            panning: false,
        }
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    #[cfg(test)]
    pub fn defaults(&self) -> &CameraState {
        &self.defaults
    }

    pub fn mode(&self) -> CameraMode {
        match (self.rotating, self.panning) {
            (false, false) => CameraMode::Idle,
            (true, false) => CameraMode::Rotating,
            (false, true) => CameraMode::Panning,
            (true, true) => CameraMode::RotatingAndPanning,
        }
    }

    pub fn is_rotating(&self) -> bool {
        self.rotating
    }

    pub fn is_panning(&self) -> bool {
        self.panning
    }

    pub fn is_auto_rotating(&self) -> bool {
        self.settings.auto_rotate && !self.is_rotating() && !self.is_panning()
    }

    pub fn begin_rotate(&mut self) {
        self.rotating = true;
    }

    pub fn end_rotate(&mut self) {
        self.rotating = false;
    }

    pub fn begin_pan(&mut self) {
        self.panning = true;
    }

    pub fn end_pan(&mut self) {
        self.panning = false;
    }

    /// Pointer drag in pixels, `dy` positive upwards.
    pub fn on_drag(&mut self, dx: f32, dy: f32) {
        if !dx.is_finite() || !dy.is_finite() {
            return;
        }

        if self.rotating {
            let s = self.settings.rotate_sensitivity;
            self.state.azimuth = wrap_azimuth(self.state.azimuth + dx * s);
            self.state.elevation =
                (self.state.elevation - dy * s).clamp(-ELEVATION_LIMIT, ELEVATION_LIMIT);
        }

        if self.panning {
            let s = self.settings.pan_sensitivity;
            self.state.target -= self.right * dx * s;
            self.state.target += self.up * dy * s;
        }
    }

    /// Positive `scroll_y` zooms in.
    pub fn on_scroll(&mut self, scroll_y: f32) {
        if !scroll_y.is_finite() {
            return;
        }
        self.state.radius =
            (self.state.radius - scroll_y * self.settings.zoom_sensitivity).max(MIN_RADIUS);
    }

    /// Back to the state captured at construction. The basis catches up on the next frame.
    pub fn reset(&mut self) {
        self.state = self.defaults;
    }

    /// Per-frame update; `dt` in seconds.
    pub fn tick(&mut self, dt: f32) {
        if !self.is_auto_rotating() || !dt.is_finite() || dt <= 0.0 {
            return;
        }
        self.state.azimuth =
            wrap_azimuth(self.state.azimuth + self.settings.auto_rotate_speed * dt);
    }

    pub fn compute_view(&mut self) -> CameraView {
        let view = CameraView::from_state(&self.state);
        self.right = view.right;
        self.up = view.up;
        view
    }
}
