// input.rs: window events to camera operations

use crate::camera::OrbitPanCamera;
use std::path::PathBuf;
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, VirtualKeyCode, WindowEvent};

/// Pixel scroll deltas are divided by this to match one wheel line.
const PIXELS_PER_LINE: f32 = 20.0;

/// Requests the event loop has to act on.
#[derive(Debug, Clone, PartialEq)]
pub enum InputAction {
    None,
    Quit,
    ToggleFullscreen,
    ToggleHud,
    OpenSkyboxDialog,
    LoadSkybox(PathBuf),
}

#[derive(Default)]
pub struct InputHandler {
    last_cursor: Option<PhysicalPosition<f64>>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_event(
        &mut self,
        camera: &mut OrbitPanCamera,
        event: &WindowEvent<'_>,
    ) -> InputAction {
        match event {
            WindowEvent::CloseRequested => InputAction::Quit,
            WindowEvent::MouseInput { state, button, .. } => {
                self.on_button(camera, *button, *state == ElementState::Pressed);
                InputAction::None
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.on_cursor(camera, *position);
                InputAction::None
            }
            WindowEvent::CursorLeft { .. } => {
                self.last_cursor = None;
                InputAction::None
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.on_wheel(camera, *delta);
                InputAction::None
            }
            WindowEvent::KeyboardInput { input, .. } if input.state == ElementState::Pressed => {
                match input.virtual_keycode {
                    Some(key) => self.on_key(camera, key),
                    None => InputAction::None,
                }
            }
            WindowEvent::DroppedFile(path) => InputAction::LoadSkybox(path.clone()),
            _ => InputAction::None,
        }
    }

    pub fn on_button(&mut self, camera: &mut OrbitPanCamera, button: MouseButton, pressed: bool) {
        match (button, pressed) {
            (MouseButton::Left, true) => camera.begin_rotate(),
            (MouseButton::Left, false) => camera.end_rotate(),
            (MouseButton::Right, true) => camera.begin_pan(),
            (MouseButton::Right, false) => camera.end_pan(),
            _ => return,
        }
        if !pressed {
            self.last_cursor = None;
        }
    }

    /// Window y grows downwards; the camera wants y-up deltas.
    pub fn on_cursor(&mut self, camera: &mut OrbitPanCamera, position: PhysicalPosition<f64>) {
        if let Some(last) = self.last_cursor {
            let dx = (position.x - last.x) as f32;
            let dy = (last.y - position.y) as f32;
            camera.on_drag(dx, dy);
        }
        self.last_cursor = Some(position);
    }

    pub fn on_wheel(&mut self, camera: &mut OrbitPanCamera, delta: MouseScrollDelta) {
        let scroll = match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
        };
        camera.on_scroll(scroll);
    }

    pub fn on_key(&mut self, camera: &mut OrbitPanCamera, key: VirtualKeyCode) -> InputAction {
        match key {
            VirtualKeyCode::Escape => InputAction::Quit,
            VirtualKeyCode::Space => {
                camera.reset();
                InputAction::None
            }
            VirtualKeyCode::F11 => InputAction::ToggleFullscreen,
            VirtualKeyCode::H => InputAction::ToggleHud,
            VirtualKeyCode::O => InputAction::OpenSkyboxDialog,
            _ => InputAction::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraState;

    fn at(x: f64, y: f64) -> PhysicalPosition<f64> {
        PhysicalPosition::new(x, y)
    }

    #[test]
    fn left_drag_rotates_with_flipped_y() {
        let mut camera = OrbitPanCamera::default();
        let mut input = InputHandler::new();
        let start = *camera.state();

        input.on_button(&mut camera, MouseButton::Left, true);
        input.on_cursor(&mut camera, at(100.0, 100.0));
        input.on_cursor(&mut camera, at(110.0, 90.0));

        // moved right and up: azimuth grows, elevation drops
        let s = camera.settings.rotate_sensitivity;
        assert!((camera.state().azimuth - (start.azimuth + 10.0 * s)).abs() < 1e-6);
        assert!((camera.state().elevation - (start.elevation - 10.0 * s)).abs() < 1e-6);
    }

    #[test]
    fn release_forgets_cursor() {
        let mut camera = OrbitPanCamera::default();
        let mut input = InputHandler::new();

        input.on_button(&mut camera, MouseButton::Left, true);
        input.on_cursor(&mut camera, at(0.0, 0.0));
        input.on_button(&mut camera, MouseButton::Left, false);
        input.on_button(&mut camera, MouseButton::Left, true);
        let before = *camera.state();

        // first move after a new press only records the position
        input.on_cursor(&mut camera, at(500.0, 500.0));
        assert_eq!(*camera.state(), before);
    }

    #[test]
    fn right_button_pans() {
        let mut camera = OrbitPanCamera::default();
        camera.compute_view();
        let mut input = InputHandler::new();

        input.on_button(&mut camera, MouseButton::Right, true);
        assert!(camera.is_panning());
        input.on_cursor(&mut camera, at(0.0, 0.0));
        input.on_cursor(&mut camera, at(50.0, 0.0));
        assert!(camera.state().target.length() > 0.0);
        assert_eq!(camera.state().azimuth, CameraState::default().azimuth);

        input.on_button(&mut camera, MouseButton::Right, false);
        assert!(!camera.is_panning());
    }

    #[test]
    fn middle_button_is_ignored() {
        let mut camera = OrbitPanCamera::default();
        let mut input = InputHandler::new();
        input.on_button(&mut camera, MouseButton::Middle, true);
        assert!(!camera.is_rotating() && !camera.is_panning());
    }

    #[test]
    fn wheel_lines_and_pixels() {
        let mut camera = OrbitPanCamera::default();
        let mut input = InputHandler::new();

        input.on_wheel(&mut camera, MouseScrollDelta::LineDelta(0.0, 2.0));
        assert_eq!(camera.state().radius, 18.0);

        input.on_wheel(&mut camera, MouseScrollDelta::PixelDelta(at(0.0, 40.0)));
        assert_eq!(camera.state().radius, 16.0);
    }

    #[test]
    fn keys_map_to_actions() {
        let mut camera = OrbitPanCamera::default();
        let mut input = InputHandler::new();

        camera.on_scroll(10.0);
        assert_eq!(input.on_key(&mut camera, VirtualKeyCode::Space), InputAction::None);
        assert_eq!(*camera.state(), CameraState::default());

        assert_eq!(input.on_key(&mut camera, VirtualKeyCode::Escape), InputAction::Quit);
        assert_eq!(
            input.on_key(&mut camera, VirtualKeyCode::F11),
            InputAction::ToggleFullscreen
        );
        assert_eq!(input.on_key(&mut camera, VirtualKeyCode::H), InputAction::ToggleHud);
        assert_eq!(
            input.on_key(&mut camera, VirtualKeyCode::O),
            InputAction::OpenSkyboxDialog
        );
        assert_eq!(input.on_key(&mut camera, VirtualKeyCode::A), InputAction::None);
    }
}
