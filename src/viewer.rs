// viewer.rs: per-frame camera and parameter update

use crate::camera::{CameraView, OrbitPanCamera};
use crate::config::ViewerConfig;
use crate::params::{
    ParamValue, ShaderBackend, U_CAM_LOOKAT, U_CAM_POS, U_CAM_RIGHT, U_CAM_UP, U_RESOLUTION,
    U_TIME,
};

pub struct Viewer {
    pub camera: OrbitPanCamera,
    pub time_scale: f32,
    shader_time: f32,
}

impl Viewer {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            camera: OrbitPanCamera::new(config.camera, config.controls),
            time_scale: config.time_scale,
            shader_time: 0.0,
        }
    }

    #[cfg(test)]
    pub fn shader_time(&self) -> f32 {
        self.shader_time
    }

    /// Advance by `dt` seconds and push time, resolution and camera to `backend`.
    pub fn frame(
        &mut self,
        backend: &mut impl ShaderBackend,
        dt: f32,
        resolution: [f32; 2],
    ) -> CameraView {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        backend.set_param(U_TIME, ParamValue::Float(self.shader_time));
        self.shader_time += dt * self.time_scale;

        self.camera.tick(dt);
        let view = self.camera.compute_view();

        backend.set_param(U_RESOLUTION, ParamValue::Vec2(resolution));
        backend.set_param(U_CAM_POS, view.position.into());
        backend.set_param(U_CAM_LOOKAT, view.look_at.into());
        backend.set_param(U_CAM_RIGHT, view.right.into());
        backend.set_param(U_CAM_UP, view.up.into());

        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ShaderParams;
    use std::collections::HashMap;

    /// Records every write the way a backend with all parameters would.
    #[derive(Default)]
    struct Recorder {
        missing: Vec<&'static str>,
        writes: HashMap<String, ParamValue>,
        rejected: Vec<String>,
    }

    impl ShaderBackend for Recorder {
        fn has_param(&self, name: &str) -> bool {
            !self.missing.iter().any(|m| *m == name)
        }

        fn set_param(&mut self, name: &str, value: ParamValue) -> bool {
            if !self.has_param(name) {
                self.rejected.push(name.to_string());
                return false;
            }
            self.writes.insert(name.to_string(), value);
            true
        }
    }

    #[test]
    fn frame_writes_camera_params() {
        let mut viewer = Viewer::new(&ViewerConfig::default());
        let mut rec = Recorder::default();

        let view = viewer.frame(&mut rec, 0.0, [1280.0, 720.0]);

        assert_eq!(rec.writes[U_TIME], ParamValue::Float(0.0));
        assert_eq!(rec.writes[U_RESOLUTION], ParamValue::Vec2([1280.0, 720.0]));
        assert_eq!(rec.writes[U_CAM_POS], ParamValue::from(view.position));
        assert_eq!(rec.writes[U_CAM_LOOKAT], ParamValue::Vec3([0.0; 3]));
        assert_eq!(rec.writes[U_CAM_RIGHT], ParamValue::from(view.right));
        assert_eq!(rec.writes[U_CAM_UP], ParamValue::from(view.up));
    }

    #[test]
    fn missing_params_do_not_stop_the_frame() {
        let mut viewer = Viewer::new(&ViewerConfig::default());
        let mut rec = Recorder {
            missing: vec![U_TIME, U_CAM_RIGHT],
            ..Recorder::default()
        };

        viewer.frame(&mut rec, 0.016, [800.0, 600.0]);

        assert_eq!(rec.rejected, vec![U_TIME.to_string(), U_CAM_RIGHT.to_string()]);
        assert!(rec.writes.contains_key(U_CAM_POS));
        assert!(rec.writes.contains_key(U_CAM_UP));
    }

    #[test]
    fn clock_and_auto_rotate_follow_dt() {
        let config = ViewerConfig::default();
        let mut viewer = Viewer::new(&config);
        let mut params = ShaderParams::all_active();
        let start = viewer.camera.state().azimuth;

        for _ in 0..4 {
            viewer.frame(&mut params, 0.25, [1.0, 1.0]);
        }

        assert!((viewer.shader_time() - config.time_scale).abs() < 1e-5);
        let turned = viewer.camera.state().azimuth - start;
        assert!((turned - config.controls.auto_rotate_speed).abs() < 1e-5);
        // time written at the start of the last frame
        assert!((params.block().time - 0.75 * config.time_scale).abs() < 1e-5);
    }

    #[test]
    fn held_button_freezes_auto_rotate() {
        let mut viewer = Viewer::new(&ViewerConfig::default());
        let mut params = ShaderParams::all_active();
        let start = viewer.camera.state().azimuth;

        viewer.camera.begin_rotate();
        viewer.frame(&mut params, 1.0, [1.0, 1.0]);
        assert_eq!(viewer.camera.state().azimuth, start);
    }
}
