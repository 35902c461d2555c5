// params.rs: named shader parameters backed by a single uniform block

use std::collections::HashSet;

pub const U_TIME: &str = "u_time";
pub const U_RESOLUTION: &str = "u_resolution";
pub const U_CAM_POS: &str = "u_cam_pos";
pub const U_CAM_LOOKAT: &str = "u_cam_lookat";
pub const U_CAM_RIGHT: &str = "u_cam_right";
pub const U_CAM_UP: &str = "u_cam_up";

/// Every parameter the viewer knows how to write.
pub const PARAM_NAMES: [&str; 6] = [
    U_TIME,
    U_RESOLUTION,
    U_CAM_POS,
    U_CAM_LOOKAT,
    U_CAM_RIGHT,
    U_CAM_UP,
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    Float(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
}

impl ParamValue {
    fn kind(&self) -> &'static str {
        match self {
            ParamValue::Float(_) => "f32",
            ParamValue::Vec2(_) => "vec2<f32>",
            ParamValue::Vec3(_) => "vec3<f32>",
        }
    }
}

impl From<glam::Vec3> for ParamValue {
    fn from(v: glam::Vec3) -> Self {
        ParamValue::Vec3(v.to_array())
    }
}

/// Mirrors `Uniforms` in `prelude.wgsl` (uniform address space layout, 80 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct UniformBlock {
    pub cam_pos: [f32; 3],
    pub time: f32,
    pub cam_lookat: [f32; 3],
    pad0: f32,
    pub cam_right: [f32; 3],
    pad1: f32,
    pub cam_up: [f32; 3],
    pad2: f32,
    pub resolution: [f32; 2],
    pad3: [f32; 2],
}

impl Default for UniformBlock {
    fn default() -> Self {
        Self {
            cam_pos: [0.0; 3],
            time: 0.0,
            cam_lookat: [0.0; 3],
            pad0: 0.0,
            cam_right: [1.0, 0.0, 0.0],
            pad1: 0.0,
            cam_up: [0.0, 1.0, 0.0],
            pad2: 0.0,
            resolution: [1.0, 1.0],
            pad3: [0.0; 2],
        }
    }
}

/// Write access to named shader parameters.
///
/// A parameter the shader never references is not an error: `set_param`
/// returns `false` and the value is dropped.
pub trait ShaderBackend {
    fn has_param(&self, name: &str) -> bool;
    fn set_param(&mut self, name: &str, value: ParamValue) -> bool;
}

/// CPU copy of the uniform block plus the set of names the scene shader uses.
#[derive(Debug, Clone)]
pub struct ShaderParams {
    block: UniformBlock,
    active: HashSet<&'static str>,
    reported: HashSet<String>,
    dirty: bool,
}

impl ShaderParams {
    /// A parameter is active when `source` mentions its name as an identifier.
    pub fn from_source(source: &str) -> Self {
        let idents: HashSet<&str> = identifiers(source).collect();
        let active: HashSet<&'static str> = PARAM_NAMES
            .iter()
            .copied()
            .filter(|name| idents.contains(name))
            .collect();

        for name in PARAM_NAMES.iter().filter(|n| !active.contains(*n)) {
            log::debug!("shader does not use parameter `{name}`");
        }

        Self {
            block: UniformBlock::default(),
            active,
            reported: HashSet::new(),
            dirty: true,
        }
    }

    #[cfg(test)]
    pub fn all_active() -> Self {
        Self {
            block: UniformBlock::default(),
            active: PARAM_NAMES.iter().copied().collect(),
            reported: HashSet::new(),
            dirty: true,
        }
    }

    pub fn block(&self) -> &UniformBlock {
        &self.block
    }

    pub fn active_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        PARAM_NAMES.iter().copied().filter(|n| self.active.contains(n))
    }

    /// Returns the block if anything changed since the last call.
    pub fn take_dirty(&mut self) -> Option<&UniformBlock> {
        if std::mem::take(&mut self.dirty) {
            Some(&self.block)
        } else {
            None
        }
    }

    fn report_once(&mut self, name: &str, level: log::Level, reason: impl FnOnce() -> String) {
        if self.reported.insert(name.to_string()) {
            log::log!(level, "skipping shader parameter `{name}`: {}", reason());
        }
    }
}

impl ShaderBackend for ShaderParams {
    fn has_param(&self, name: &str) -> bool {
        self.active.contains(name)
    }

    fn set_param(&mut self, name: &str, value: ParamValue) -> bool {
        if !self.active.contains(name) {
            self.report_once(name, log::Level::Debug, || {
                "not used by the shader".to_string()
            });
            return false;
        }

        let b = &mut self.block;
        let slot = match (name, value) {
            (U_TIME, ParamValue::Float(v)) => {
                b.time = v;
                true
            }
            (U_RESOLUTION, ParamValue::Vec2(v)) => {
                b.resolution = v;
                true
            }
            (U_CAM_POS, ParamValue::Vec3(v)) => {
                b.cam_pos = v;
                true
            }
            (U_CAM_LOOKAT, ParamValue::Vec3(v)) => {
                b.cam_lookat = v;
                true
            }
            (U_CAM_RIGHT, ParamValue::Vec3(v)) => {
                b.cam_right = v;
                true
            }
            (U_CAM_UP, ParamValue::Vec3(v)) => {
                b.cam_up = v;
                true
            }
            _ => false,
        };

        if slot {
            self.dirty = true;
        } else {
            self.report_once(name, log::Level::Warn, || {
                format!("does not accept a {} value", value.kind())
            });
        }
        slot
    }
}

fn identifiers(source: &str) -> impl Iterator<Item = &str> {
    source
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE: &str = r#"
        @fragment
        fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
            let uv = in.clip_position.xy / u.u_resolution;
            let ro = u.u_cam_pos;
            let ta = u.u_cam_lookat; // u_cam_up unused here
            return vec4<f32>(uv, sin(u.u_time), 1.0);
        }
    "#;

    #[test]
    fn block_matches_wgsl_layout() {
        assert_eq!(std::mem::size_of::<UniformBlock>(), 80);
        assert_eq!(std::mem::align_of::<UniformBlock>(), 4);
    }

    #[test]
    fn detects_referenced_params() {
        let params = ShaderParams::from_source(SCENE);
        let active: Vec<_> = params.active_names().collect();
        // comments count as references, just like a name match would
        assert_eq!(
            active,
            vec![U_TIME, U_RESOLUTION, U_CAM_POS, U_CAM_LOOKAT, U_CAM_UP]
        );
        assert!(!params.has_param(U_CAM_RIGHT));
    }

    #[test]
    fn partial_name_is_not_a_reference() {
        let params = ShaderParams::from_source("let a = u.u_times; let b = my_u_cam_pos;");
        assert!(!params.has_param(U_TIME));
        assert!(!params.has_param(U_CAM_POS));
    }

    #[test]
    fn missing_param_is_skipped() {
        let mut params = ShaderParams::from_source(SCENE);
        params.take_dirty();

        assert!(!params.set_param(U_CAM_RIGHT, ParamValue::Vec3([0.0, 0.0, 1.0])));
        assert!(!params.set_param(U_CAM_RIGHT, ParamValue::Vec3([0.0, 0.0, 1.0])));
        assert!(!params.set_param("u_sky_tex", ParamValue::Float(0.0)));
        assert_eq!(*params.block(), UniformBlock::default());
        assert!(params.take_dirty().is_none());
    }

    #[test]
    fn writes_active_params() {
        let mut params = ShaderParams::from_source(SCENE);
        assert!(params.set_param(U_TIME, ParamValue::Float(2.5)));
        assert!(params.set_param(U_RESOLUTION, ParamValue::Vec2([1280.0, 720.0])));
        assert!(params.set_param(U_CAM_POS, glam::Vec3::new(1.0, 2.0, 3.0).into()));

        let block = params.take_dirty().copied().unwrap();
        assert_eq!(block.time, 2.5);
        assert_eq!(block.resolution, [1280.0, 720.0]);
        assert_eq!(block.cam_pos, [1.0, 2.0, 3.0]);
        assert!(params.take_dirty().is_none());
    }

    #[test]
    fn wrong_type_is_rejected() {
        let mut params = ShaderParams::all_active();
        assert!(!params.set_param(U_TIME, ParamValue::Vec3([1.0; 3])));
        assert!(!params.set_param(U_CAM_POS, ParamValue::Float(1.0)));
        assert_eq!(params.block().time, 0.0);
    }

    #[test]
    fn repeated_mismatch_is_reported_once() {
        let mut params = ShaderParams::all_active();
        for _ in 0..3 {
            assert!(!params.set_param(U_TIME, ParamValue::Vec2([1.0, 2.0])));
        }
        assert_eq!(params.reported.len(), 1);
        assert!(params.reported.contains(U_TIME));

        // a later good write still lands
        assert!(params.set_param(U_TIME, ParamValue::Float(4.0)));
        assert_eq!(params.block().time, 4.0);
    }
}
