// error.rs: startup failures. Everything here ends the process.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error("cannot read shader {path:?}: {source}")]
    ShaderSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("shader compilation failed: {0}")]
    ShaderCompile(String),

    #[error("cannot load skybox {path:?}: {source}")]
    Skybox {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("cannot read config {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path:?}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid value for {flag}: {value}")]
    Argument { flag: &'static str, value: String },

    #[error("window creation failed: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("surface creation failed: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter found")]
    NoAdapter,

    #[error("GPU device request failed: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
}

pub type Result<T, E = ViewerError> = std::result::Result<T, E>;
