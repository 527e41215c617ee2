use crate::error::CoreError;
use crate::frame::GlyphBitmap;

/// Rastérise un glyphe en carte de couverture.
///
/// Implémenté par : `FontRasterizer` (ab_glyph). Partagé entre les styles
/// rendus en parallèle, d'où `Send + Sync`.
///
/// # Example
/// ```
/// use gd_core::traits::GlyphRasterizer;
/// use gd_core::frame::GlyphBitmap;
/// use gd_core::error::CoreError;
///
/// struct Blocks;
/// impl GlyphRasterizer for Blocks {
///     fn rasterize(&self, _glyph: char, size: u32) -> Result<GlyphBitmap, CoreError> {
///         let mut bmp = GlyphBitmap::new(size, size);
///         bmp.coverage.fill(255);
///         Ok(bmp)
///     }
/// }
/// assert_eq!(Blocks.rasterize('天', 4).unwrap().coverage.len(), 16);
/// ```
pub trait GlyphRasterizer: Send + Sync {
    /// Rasterize `glyph` at `size` pixels (em height).
    ///
    /// # Errors
    /// `CoreError::GlyphRender` if the font cannot draw this glyph.
    fn rasterize(&self, glyph: char, size: u32) -> Result<GlyphBitmap, CoreError>;

    /// Glyph substituted when `rasterize` fails.
    fn fallback_glyph(&self) -> char {
        '□'
    }
}
