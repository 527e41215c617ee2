use std::path::Path;

use gd_core::error::CoreError;
use gd_core::frame::FrameBuffer;
use gd_core::luminance::LuminanceMap;

use crate::edge::edge_plane;
use crate::image::load_image;
use crate::resize::resize_to_width;

/// Image redimensionnée et sa carte de luminance.
///
/// `frame` est la référence de dimensions pour tout le rendu : compositeur,
/// animateur et planches produisent des buffers de cette taille.
#[derive(Clone, Debug)]
pub struct SampledImage {
    /// The resized source, RGBA.
    pub frame: FrameBuffer,
    /// Luminance/edge map aligned with `frame`.
    pub map: LuminanceMap,
}

impl SampledImage {
    /// Canvas dimensions.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.frame.width, self.frame.height)
    }
}

/// Charge, redimensionne et échantillonne une image sur disque.
///
/// # Errors
/// `CoreError::ImageLoad` if the file cannot be decoded, `CoreError::Config`
/// for `max_width == 0`.
///
/// # Example
/// ```no_run
/// use gd_source::sample_path;
/// use std::path::Path;
/// let sampled = sample_path(Path::new("photo.jpg"), 800).unwrap();
/// assert_eq!(sampled.frame.width, 800);
/// ```
pub fn sample_path(path: &Path, max_width: u32) -> Result<SampledImage, CoreError> {
    if max_width == 0 {
        return Err(CoreError::config("max_width doit être > 0"));
    }
    let frame = load_image(path)?;
    sample_image(&frame, max_width)
}

/// Redimensionne une image en mémoire et calcule sa carte.
///
/// Déterministe pour une même entrée et une même largeur.
///
/// # Errors
/// `CoreError::Config` for `max_width == 0`.
///
/// # Example
/// ```
/// use gd_core::frame::FrameBuffer;
/// use gd_source::sample_image;
/// let src = FrameBuffer::filled(40, 30, (0, 0, 0));
/// let sampled = sample_image(&src, 20).unwrap();
/// assert_eq!(sampled.size(), (20, 15));
/// assert!(sampled.map.region_mean(0, 0, 5).darkness() > 0.99);
/// ```
pub fn sample_image(src: &FrameBuffer, max_width: u32) -> Result<SampledImage, CoreError> {
    let frame = resize_to_width(src, max_width)?;
    let map = luminance_map(&frame)?;
    log::debug!(
        "Échantillonnage {}×{} → {}×{}",
        src.width,
        src.height,
        frame.width,
        frame.height
    );
    Ok(SampledImage { frame, map })
}

/// Luminance (0 = noir, 1 = blanc) et contours Sobel de chaque pixel.
///
/// # Errors
/// `CoreError::InvalidDimensions` for an empty frame.
pub fn luminance_map(frame: &FrameBuffer) -> Result<LuminanceMap, CoreError> {
    let (w, h) = (frame.width, frame.height);
    let mut lum8 = Vec::with_capacity(w as usize * h as usize);
    for y in 0..h {
        for x in 0..w {
            lum8.push(frame.luminance(x, y));
        }
    }
    let edge = edge_plane(&lum8, w, h);
    let lum = lum8.iter().map(|&l| f32::from(l) / 255.0).collect();
    LuminanceMap::from_planes(w, h, lum, edge)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_matches_frame_dimensions() {
        let src = FrameBuffer::filled(400, 300, (128, 128, 128));
        let sampled = sample_image(&src, 400).unwrap();
        assert_eq!(sampled.size(), (400, 300));
        assert_eq!(sampled.map.width(), 400);
        assert_eq!(sampled.map.height(), 300);
    }

    #[test]
    fn darkness_follows_source() {
        let mut src = FrameBuffer::filled(20, 10, (255, 255, 255));
        for y in 0..10 {
            for x in 0..10 {
                src.set_pixel(x, y, [0, 0, 0, 255]);
            }
        }
        let map = luminance_map(&src).unwrap();
        assert!(map.region_mean(0, 0, 5).darkness() > 0.99);
        assert!(map.region_mean(15, 0, 5).darkness() < 0.01);
        // The boundary column carries the contour.
        assert!(map.edge_at(10, 5) > 0.5);
    }

    #[test]
    fn sampling_is_deterministic() {
        let mut src = FrameBuffer::filled(37, 23, (200, 100, 50));
        src.set_pixel(5, 5, [0, 0, 0, 255]);
        let a = sample_image(&src, 50).unwrap();
        let b = sample_image(&src, 50).unwrap();
        assert_eq!(a.frame, b.frame);
        assert_eq!(a.map.region_mean(0, 0, 50), b.map.region_mean(0, 0, 50));
    }
}
