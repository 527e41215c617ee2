use fast_image_resize::images::Image;
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use gd_core::error::CoreError;
use gd_core::frame::FrameBuffer;

/// Dimensions after scaling to `max_width`, aspect ratio preserved.
///
/// The image is always scaled to exactly `max_width`, up or down, so that a
/// small source still yields enough canvas for fine glyph layers.
///
/// # Example
/// ```
/// use gd_source::resize::target_size;
/// assert_eq!(target_size(400, 300, 800), (800, 600));
/// assert_eq!(target_size(1000, 333, 100), (100, 33));
/// ```
#[must_use]
pub fn target_size(width: u32, height: u32, max_width: u32) -> (u32, u32) {
    let scale = f64::from(max_width) / f64::from(width.max(1));
    let h = (f64::from(height) * scale) as u32;
    (max_width, h.max(1))
}

/// Lanczos3 resize to `max_width`, aspect ratio preserved.
///
/// # Errors
/// `CoreError::Config` for `max_width == 0`, or a resize failure.
///
/// # Example
/// ```
/// use gd_source::resize::resize_to_width;
/// use gd_core::frame::FrameBuffer;
/// let src = FrameBuffer::new(100, 50);
/// let dst = resize_to_width(&src, 40).unwrap();
/// assert_eq!((dst.width, dst.height), (40, 20));
/// ```
pub fn resize_to_width(src: &FrameBuffer, max_width: u32) -> Result<FrameBuffer, CoreError> {
    if max_width == 0 {
        return Err(CoreError::config("max_width doit être > 0"));
    }
    let (w, h) = target_size(src.width, src.height, max_width);
    if (w, h) == (src.width, src.height) {
        return Ok(src.clone());
    }

    // fast_image_resize veut une source &mut : copie forcée.
    let mut src_buf = src.data.clone();
    let src_image = Image::from_slice_u8(src.width, src.height, &mut src_buf, PixelType::U8x4)
        .map_err(|_| CoreError::InvalidDimensions {
            width: src.width,
            height: src.height,
        })?;

    let mut dst = FrameBuffer::new(w, h);
    let mut dst_image = Image::from_slice_u8(w, h, &mut dst.data, PixelType::U8x4)
        .map_err(|_| CoreError::InvalidDimensions {
            width: w,
            height: h,
        })?;

    let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Lanczos3));
    Resizer::new()
        .resize(&src_image, &mut dst_image, Some(&options))
        .map_err(|e| {
            log::error!("Resize {}×{} → {w}×{h} : {e}", src.width, src.height);
            CoreError::InvalidDimensions {
                width: w,
                height: h,
            }
        })?;
    Ok(dst)
}
