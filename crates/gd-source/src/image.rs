use std::path::Path;

use ::image::DynamicImage;
use gd_core::error::CoreError;
use gd_core::frame::FrameBuffer;

/// Charge une image (JPEG, PNG, BMP, GIF) en RGBA 8 bits.
///
/// # Errors
/// `CoreError::ImageLoad` if the file is unreadable or not a raster format.
///
/// # Example
/// ```no_run
/// use gd_source::image::load_image;
/// use std::path::Path;
/// let frame = load_image(Path::new("photo.jpg")).unwrap();
/// ```
pub fn load_image(path: &Path) -> Result<FrameBuffer, CoreError> {
    let img = ::image::open(path).map_err(|e| CoreError::ImageLoad {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    log::info!(
        "Image chargée : {} ({}×{})",
        path.display(),
        img.width(),
        img.height()
    );
    frame_from_dynamic(&img)
}

/// Convertit une image décodée en `FrameBuffer` RGBA.
///
/// # Errors
/// `CoreError::InvalidDimensions` for a zero-sized image.
pub fn frame_from_dynamic(img: &DynamicImage) -> Result<FrameBuffer, CoreError> {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(CoreError::InvalidDimensions { width, height });
    }
    Ok(FrameBuffer {
        data: rgba.into_raw(),
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::image::RgbaImage;

    #[test]
    fn missing_file_is_image_load_error() {
        let err = load_image(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, CoreError::ImageLoad { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn garbage_file_is_image_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.png");
        std::fs::write(&path, b"not an image at all").unwrap();
        assert!(matches!(
            load_image(&path),
            Err(CoreError::ImageLoad { .. })
        ));
    }

    #[test]
    fn png_round_trips_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("px.png");
        let mut img = RgbaImage::new(3, 2);
        img.put_pixel(2, 1, ::image::Rgba([10, 20, 30, 255]));
        img.save(&path).unwrap();

        let frame = load_image(&path).unwrap();
        assert_eq!((frame.width, frame.height), (3, 2));
        assert_eq!(frame.pixel(2, 1), (10, 20, 30, 255));
    }
}
