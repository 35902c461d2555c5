// skybox.rs: skybox image decoding

use crate::error::{Result, ViewerError};
use image::io::Reader as ImageReader;
use image::RgbaImage;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::thread;

/// Extensions offered by the open dialog.
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "bmp", "hdr"];

pub fn decode(path: &Path) -> std::result::Result<RgbaImage, image::ImageError> {
    let file = File::open(path).map_err(image::ImageError::IoError)?;
    let mut reader = ImageReader::new(BufReader::new(file))
        .with_guessed_format()
        .map_err(image::ImageError::IoError)?;
    reader.no_limits();
    Ok(reader.decode()?.to_rgba8())
}

/// Startup load. A missing skybox is fatal.
pub fn load(path: &Path) -> Result<RgbaImage> {
    let img = decode(path).map_err(|source| ViewerError::Skybox {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("skybox {:?} loaded ({}x{})", path, img.width(), img.height());
    Ok(img)
}

/// Decode on a worker thread and hand the result to the event loop.
/// Failures are logged and dropped.
pub fn load_in_background(path: PathBuf, tx: Sender<RgbaImage>) {
    thread::spawn(move || {
        log::info!("loading skybox {:?} in background", path);
        match decode(&path) {
            Ok(img) => {
                log::info!("skybox {:?} decoded ({}x{})", path, img.width(), img.height());
                if tx.send(img).is_err() {
                    log::warn!("event loop gone, dropping skybox {:?}", path);
                }
            }
            Err(e) => log::error!("cannot load skybox {:?}: {}", path, e),
        }
    });
}

/// Downscale so neither side exceeds `max_dimension`, keeping the aspect ratio.
pub fn fit_to_limit(img: RgbaImage, max_dimension: u32) -> RgbaImage {
    let (w, h) = img.dimensions();
    if w <= max_dimension && h <= max_dimension {
        return img;
    }

    let scale = max_dimension as f32 / w.max(h) as f32;
    let new_w = ((w as f32 * scale) as u32).clamp(1, max_dimension);
    let new_h = ((h as f32 * scale) as u32).clamp(1, max_dimension);
    log::warn!(
        "skybox {}x{} exceeds GPU limit {}, scaling to {}x{}",
        w,
        h,
        max_dimension,
        new_w,
        new_h
    );
    image::imageops::resize(&img, new_w, new_h, image::imageops::FilterType::Lanczos3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn small_image_is_untouched() {
        let img = RgbaImage::from_pixel(64, 32, Rgba([1, 2, 3, 255]));
        let out = fit_to_limit(img.clone(), 64);
        assert_eq!(out, img);
    }

    #[test]
    fn large_image_is_scaled_to_limit() {
        let img = RgbaImage::from_pixel(400, 200, Rgba([0, 0, 0, 255]));
        let out = fit_to_limit(img, 100);
        assert_eq!(out.dimensions(), (100, 50));
    }

    #[test]
    fn missing_file_is_a_skybox_error() {
        let err = load(Path::new("/nonexistent/skybox.jpg")).unwrap_err();
        assert!(matches!(err, ViewerError::Skybox { .. }));
    }

    #[test]
    fn background_load_sends_image() {
        let path = std::env::temp_dir().join(format!("skybox-{}.png", std::process::id()));
        RgbaImage::from_pixel(8, 4, Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();

        let (tx, rx) = std::sync::mpsc::channel();
        load_in_background(path.clone(), tx);
        let img = rx
            .recv_timeout(std::time::Duration::from_secs(10))
            .unwrap();
        assert_eq!(img.dimensions(), (8, 4));
        assert_eq!(img.get_pixel(0, 0), &Rgba([10, 20, 30, 255]));

        let _ = std::fs::remove_file(path);
    }
}
