//! # Image File Layer
//!
//! Decodes images of any format the `image` crate understands into RGB
//! payloads, and saves payloads back to disk.
//!
//! Non-RGB sources are converted on load: alpha and palette information is
//! dropped before the image ever reaches the codec.

use image::{ColorType, ImageFormat};
use log::{debug, warn};
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::processing::payload::ImagePayload;
use crate::utils::output::write_atomic;

/// An RGB payload plus facts about the file it came from.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub payload: ImagePayload,
    /// Color type of the source before RGB conversion.
    pub source_color: ColorType,
    pub file_size: u64,
}

/// Opens an image file and converts it to 8-bit RGB.
pub fn load_rgb<P: AsRef<Path>>(path: P) -> Result<LoadedImage> {
    let path = path.as_ref();
    let file_size = fs::metadata(path)?.len();
    let image = image::open(path)?;

    let source_color = image.color();
    if source_color != ColorType::Rgb8 {
        debug!("converting {:?} image to RGB", source_color);
    }

    Ok(LoadedImage {
        payload: ImagePayload::from(image.to_rgb8()),
        source_color,
        file_size,
    })
}

/// Saves an RGB payload atomically; the format follows the file extension.
pub fn save_rgb<P: AsRef<Path>>(payload: &ImagePayload, path: P) -> Result<()> {
    let path = path.as_ref();

    if is_lossy(path) {
        warn!(
            "{} uses a lossy format; the saved pixels will differ from the hidden image",
            path.display()
        );
    }

    let format = ImageFormat::from_path(path)?;
    let image = payload.to_rgb_image()?;
    write_atomic(path, |w| Ok(image.write_to(w, format)?))
}

/// True for formats whose encoder does not preserve pixels exactly.
pub fn is_lossy(path: &Path) -> bool {
    matches!(ImageFormat::from_path(path), Ok(ImageFormat::Jpeg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::tempdir;

    #[test]
    fn test_png_round_trip_is_exact() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pixels.png");
        let data: Vec<u8> = (0..6 * 4 * 3).map(|i| (i * 7) as u8).collect();
        let payload = ImagePayload::new(6, 4, data).unwrap();

        save_rgb(&payload, &path).unwrap();
        let loaded = load_rgb(&path).unwrap();

        assert_eq!(loaded.payload, payload);
        assert_eq!(loaded.source_color, ColorType::Rgb8);
        assert!(loaded.file_size > 0);
    }

    #[test]
    fn test_alpha_is_dropped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("alpha.png");
        RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 40]))
            .save(&path)
            .unwrap();

        let loaded = load_rgb(&path).unwrap();

        assert_eq!(loaded.source_color, ColorType::Rgba8);
        assert_eq!(loaded.payload.byte_len(), 3 * 2 * 3);
        assert_eq!(&loaded.payload.data()[..3], &[10, 20, 30]);
    }

    #[test]
    fn test_unknown_extension_creates_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pixels.unknownformat");
        let payload = ImagePayload::new(1, 1, vec![1, 2, 3]).unwrap();

        assert!(save_rgb(&payload, &path).is_err());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_lossy_detection() {
        assert!(is_lossy(Path::new("out.jpg")));
        assert!(is_lossy(Path::new("out.JPEG")));
        assert!(!is_lossy(Path::new("out.png")));
        assert!(!is_lossy(Path::new("out.bmp")));
    }

    #[test]
    fn test_missing_file() {
        assert!(load_rgb("/definitely/not/here.png").is_err());
    }
}
