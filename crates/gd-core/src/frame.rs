use crate::color::{Rgb, blend_over, composite_over};

/// Buffer de pixels RGBA, row-major, 4 bytes par pixel.
///
/// Layout compatible avec `image::RgbaImage` (8 bits par canal, non prémultiplié).
///
/// # Example
/// ```
/// use gd_core::frame::FrameBuffer;
/// let fb = FrameBuffer::new(10, 10);
/// assert_eq!(fb.data.len(), 400);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    /// Pixels RGBA, row-major, 4 bytes par pixel.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl FrameBuffer {
    /// Crée un buffer transparent aux dimensions données.
    ///
    /// # Example
    /// ```
    /// use gd_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::new(100, 50);
    /// assert_eq!(fb.width, 100);
    /// assert_eq!(fb.height, 50);
    /// assert_eq!(fb.data.len(), 100 * 50 * 4);
    /// ```
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0u8; width as usize * height as usize * 4],
            width,
            height,
        }
    }

    /// Crée un buffer opaque rempli d'une couleur unie.
    ///
    /// # Example
    /// ```
    /// use gd_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::filled(2, 2, (255, 255, 255));
    /// assert_eq!(fb.pixel(1, 1), (255, 255, 255, 255));
    /// ```
    #[must_use]
    pub fn filled(width: u32, height: u32, color: Rgb) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for _ in 0..(width as usize * height as usize) {
            data.extend_from_slice(&[color.0, color.1, color.2, 255]);
        }
        Self {
            data,
            width,
            height,
        }
    }

    #[inline(always)]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Accès au pixel (x, y) → (r, g, b, a).
    ///
    /// # Example
    /// ```
    /// use gd_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::new(10, 10);
    /// assert_eq!(fb.pixel(0, 0), (0, 0, 0, 0));
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> (u8, u8, u8, u8) {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let idx = self.index(x, y);
        (
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        )
    }

    /// Écrase le pixel (x, y).
    #[inline(always)]
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let idx = self.index(x, y);
        self.data[idx..idx + 4].copy_from_slice(&rgba);
    }

    /// Alpha-over d'une encre `color` d'opacité `alpha` au pixel (x, y).
    /// Hors-cadre : ignoré.
    #[inline(always)]
    pub fn blend_pixel(&mut self, x: i64, y: i64, color: Rgb, alpha: f32) {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return;
        }
        let idx = self.index(x as u32, y as u32);
        let dst = [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ];
        self.data[idx..idx + 4].copy_from_slice(&blend_over(dst, color, alpha));
    }

    /// Composite `src` over `self` at offset (`dx`, `dy`), clipping to bounds.
    ///
    /// # Example
    /// ```
    /// use gd_core::frame::FrameBuffer;
    /// let mut dst = FrameBuffer::filled(4, 4, (255, 255, 255));
    /// let src = FrameBuffer::filled(2, 2, (0, 0, 0));
    /// dst.composite(&src, 1, 1);
    /// assert_eq!(dst.pixel(1, 1), (0, 0, 0, 255));
    /// assert_eq!(dst.pixel(0, 0), (255, 255, 255, 255));
    /// ```
    pub fn composite(&mut self, src: &FrameBuffer, dx: i64, dy: i64) {
        for sy in 0..src.height {
            let ty = dy + i64::from(sy);
            if ty < 0 || ty >= i64::from(self.height) {
                continue;
            }
            for sx in 0..src.width {
                let tx = dx + i64::from(sx);
                if tx < 0 || tx >= i64::from(self.width) {
                    continue;
                }
                let (r, g, b, a) = src.pixel(sx, sy);
                if a == 0 {
                    continue;
                }
                let idx = self.index(tx as u32, ty as u32);
                let dst = [
                    self.data[idx],
                    self.data[idx + 1],
                    self.data[idx + 2],
                    self.data[idx + 3],
                ];
                self.data[idx..idx + 4].copy_from_slice(&composite_over(dst, [r, g, b, a]));
            }
        }
    }

    /// Luminance perceptuelle BT.709.
    ///
    /// # Example
    /// ```
    /// use gd_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::filled(1, 1, (255, 255, 255));
    /// assert_eq!(fb.luminance(0, 0), 255);
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn luminance(&self, x: u32, y: u32) -> u8 {
        let (r, g, b, _) = self.pixel(x, y);
        ((u32::from(r) * 2126 + u32::from(g) * 7152 + u32::from(b) * 722) / 10000) as u8
    }

    /// Same dimensions as `other`.
    #[must_use]
    pub fn same_size(&self, other: &FrameBuffer) -> bool {
        self.width == other.width && self.height == other.height
    }
}

/// Couverture 8 bits d'un glyphe rastérisé (0 = vide, 255 = plein).
///
/// # Example
/// ```
/// use gd_core::frame::GlyphBitmap;
/// let g = GlyphBitmap::new(3, 2);
/// assert_eq!(g.coverage.len(), 6);
/// assert_eq!(g.at(2, 1), 0);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphBitmap {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major coverage values.
    pub coverage: Vec<u8>,
}

impl GlyphBitmap {
    /// Empty (fully transparent) bitmap.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            coverage: vec![0u8; width as usize * height as usize],
        }
    }

    /// Coverage at (x, y); 0 outside the bitmap.
    #[inline(always)]
    #[must_use]
    pub fn at(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.coverage[y as usize * self.width as usize + x as usize]
    }

    /// `true` if nothing would be drawn.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.coverage.iter().all(|&c| c == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_pixel_ignores_out_of_bounds() {
        let mut fb = FrameBuffer::filled(2, 2, (255, 255, 255));
        let before = fb.clone();
        fb.blend_pixel(-1, 0, (0, 0, 0), 1.0);
        fb.blend_pixel(0, 2, (0, 0, 0), 1.0);
        assert_eq!(fb, before);
    }

    #[test]
    fn composite_clips_negative_offsets() {
        let mut dst = FrameBuffer::filled(3, 3, (255, 255, 255));
        let src = FrameBuffer::filled(2, 2, (0, 0, 0));
        dst.composite(&src, -1, -1);
        assert_eq!(dst.pixel(0, 0), (0, 0, 0, 255));
        assert_eq!(dst.pixel(1, 1), (255, 255, 255, 255));
    }
}
