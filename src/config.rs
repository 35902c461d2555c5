// config.rs: viewer configuration
//
// Sources, later ones win:
// - JSON file: --config <path>, or BLACKHOLE_CONFIG
// - Env: BLACKHOLE_SHADER, BLACKHOLE_SKYBOX
// - CLI: --shader <path>, --skybox <path>, --width <px>, --height <px>

use crate::camera::{CameraSettings, CameraState};
use crate::error::{Result, ViewerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "BLACKHOLE_CONFIG";
pub const SHADER_ENV: &str = "BLACKHOLE_SHADER";
pub const SKYBOX_ENV: &str = "BLACKHOLE_SKYBOX";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    /// Scene fragment shader (WGSL).
    pub shader: PathBuf,
    pub skybox: PathBuf,
    /// Shader seconds per wall-clock second.
    pub time_scale: f32,
    pub camera: CameraState,
    pub controls: CameraSettings,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "Black Hole 3D".to_string(),
            width: 1280,
            height: 720,
            vsync: true,
            shader: PathBuf::from("blackhole.wgsl"),
            skybox: PathBuf::from("skybox.jpg"),
            time_scale: 0.3,
            camera: CameraState::default(),
            controls: CameraSettings::default(),
        }
    }
}

impl ViewerConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ViewerError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| ViewerError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(text: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Build the config from the process arguments and environment.
    pub fn resolve() -> Result<Self> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        Self::resolve_from(&args, |key| std::env::var(key).ok())
    }

    pub fn resolve_from(args: &[String], env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let config_path = flag_value(args, "--config")?
            .map(PathBuf::from)
            .or_else(|| env(CONFIG_ENV).map(PathBuf::from));

        let mut config = match config_path {
            Some(path) => {
                log::info!("loading config {:?}", path);
                Self::load(&path)?
            }
            None => Self::default(),
        };

        if let Some(v) = env(SHADER_ENV) {
            config.shader = PathBuf::from(v);
        }
        if let Some(v) = env(SKYBOX_ENV) {
            config.skybox = PathBuf::from(v);
        }

        if let Some(v) = flag_value(args, "--shader")? {
            config.shader = PathBuf::from(v);
        }
        if let Some(v) = flag_value(args, "--skybox")? {
            config.skybox = PathBuf::from(v);
        }
        if let Some(v) = flag_value(args, "--width")? {
            config.width = parse_dimension("--width", v)?;
        }
        if let Some(v) = flag_value(args, "--height")? {
            config.height = parse_dimension("--height", v)?;
        }

        Ok(config)
    }
}

fn flag_value<'a>(args: &'a [String], flag: &'static str) -> Result<Option<&'a str>> {
    let mut it = args.iter();
    while let Some(a) = it.next() {
        if a == flag {
            return match it.next() {
                Some(v) => Ok(Some(v.as_str())),
                None => Err(ViewerError::Argument {
                    flag,
                    value: String::new(),
                }),
            };
        }
    }
    Ok(None)
}

fn parse_dimension(flag: &'static str, value: &str) -> Result<u32> {
    match value.parse::<u32>() {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(ViewerError::Argument {
            flag,
            value: value.to_string(),
        }),
    }
}
