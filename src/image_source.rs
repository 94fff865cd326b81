//! Image loading status and helpers.
//!
//! Pixels are loaded and drawn by the host. The editor only tracks whether
//! the image is usable and what its natural size is.

use crate::model::Size;

/// Supported image file extensions.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

/// Check if a filename has a supported image extension.
pub fn is_image_file(filename: &str) -> bool {
    let lower = filename.to_lowercase();
    IMAGE_EXTENSIONS
        .iter()
        .any(|ext| lower.rsplit_once('.').is_some_and(|(_, e)| e == *ext))
}

/// Load state of the displayed image.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ImageStatus {
    /// No image open.
    #[default]
    None,
    /// Waiting for the host to report natural dimensions.
    Loading,
    /// Natural dimensions known.
    Ready(Size),
    /// Image could not be displayed; the editor shows a placeholder.
    Failed(String),
}

impl ImageStatus {
    /// Natural size, if the image is ready.
    pub fn natural_size(&self) -> Option<Size> {
        match self {
            ImageStatus::Ready(size) => Some(*size),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ImageStatus::Failed(_))
    }
}

/// Read an image file's natural dimensions without decoding pixels.
#[cfg(not(target_arch = "wasm32"))]
pub fn probe_dimensions(path: &std::path::Path) -> Result<Size, image::ImageError> {
    let (width, height) = image::image_dimensions(path)?;
    Ok(Size::new(f64::from(width), f64::from(height)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_image_file() {
        assert!(is_image_file("photo.JPG"));
        assert!(is_image_file("a.b.webp"));
        assert!(!is_image_file("notes.txt"));
        assert!(!is_image_file("png"));
    }

    #[test]
    fn test_status_natural_size() {
        assert_eq!(ImageStatus::Loading.natural_size(), None);
        assert_eq!(
            ImageStatus::Ready(Size::new(800.0, 600.0)).natural_size(),
            Some(Size::new(800.0, 600.0))
        );
        assert!(ImageStatus::Failed("404".into()).is_failed());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_probe_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("probe.png");
        image::RgbImage::new(12, 7).save(&path).unwrap();

        let size = probe_dimensions(&path).unwrap();
        assert_eq!(size, Size::new(12.0, 7.0));

        assert!(probe_dimensions(&dir.path().join("missing.png")).is_err());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_every_listed_extension_can_be_probed() {
        let dir = tempfile::tempdir().unwrap();
        for ext in ["png", "jpg", "bmp"] {
            let path = dir.path().join(format!("photo.{ext}"));
            image::RgbImage::new(5, 3).save(&path).unwrap();
            assert!(is_image_file(&path.to_string_lossy()));
            assert_eq!(probe_dimensions(&path).unwrap(), Size::new(5.0, 3.0), "{ext}");
        }
    }
}
