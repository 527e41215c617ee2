use std::path::Path;

use ab_glyph::{point, Font, FontVec, PxScale, ScaleFont};
use anyhow::{Context, Result};
use gd_core::error::CoreError;
use gd_core::frame::GlyphBitmap;
use gd_core::traits::GlyphRasterizer;

/// Candidats de repli, dans l'ordre de préférence.
const FALLBACK_CANDIDATES: [char; 3] = ['□', '口', '?'];

/// Rastériseur ab_glyph d'une police TrueType/OpenType chargée en mémoire.
///
/// Chaque glyphe est rendu dans une boîte `avance × size`, ligne de base
/// placée pour centrer verticalement la hauteur de ligne de la police : les
/// glyphes d'une même taille sont alignés entre eux, ce qui sert aussi aux
/// libellés des planches.
pub struct FontRasterizer {
    font: FontVec,
    fallback: char,
}

impl FontRasterizer {
    /// Charge une police depuis un fichier.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not a valid font.
    ///
    /// # Example
    /// ```no_run
    /// use gd_export::FontRasterizer;
    /// use std::path::Path;
    /// let font = FontRasterizer::from_file(Path::new("NotoSansSC-Regular.otf")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)
            .with_context(|| format!("Impossible de lire la police {}", path.display()))?;
        let rasterizer = Self::from_bytes(data)
            .with_context(|| format!("Police invalide : {}", path.display()))?;
        log::info!("Police chargée : {}", path.display());
        Ok(rasterizer)
    }

    /// Build from raw font bytes.
    ///
    /// # Errors
    /// Returns an error if the bytes are not a parseable font.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let font = FontVec::try_from_vec(data).context("Données de police illisibles")?;
        let fallback = FALLBACK_CANDIDATES
            .into_iter()
            .find(|&c| font.glyph_id(c).0 != 0)
            .unwrap_or(FALLBACK_CANDIDATES[0]);
        Ok(Self { font, fallback })
    }

    /// `true` if the font has an outline for `glyph`.
    #[must_use]
    pub fn covers(&self, glyph: char) -> bool {
        self.font.glyph_id(glyph).0 != 0
    }

    /// Caractères de `text` absents de la police (sans doublons, espaces ignorés).
    #[must_use]
    pub fn missing_glyphs(&self, text: &str) -> Vec<char> {
        let mut missing: Vec<char> = text
            .chars()
            .filter(|c| !c.is_whitespace() && !self.covers(*c))
            .collect();
        missing.sort_unstable();
        missing.dedup();
        missing
    }
}

impl GlyphRasterizer for FontRasterizer {
    #[allow(clippy::cast_possible_wrap)]
    fn rasterize(&self, glyph: char, size: u32) -> Result<GlyphBitmap, CoreError> {
        let fail = |reason: &str| CoreError::GlyphRender {
            glyph,
            size,
            reason: reason.to_string(),
        };
        if size == 0 {
            return Err(fail("taille nulle"));
        }
        // glyph_id 0 = .notdef : la police ne couvre pas ce caractère.
        let gid = self.font.glyph_id(glyph);
        if gid.0 == 0 {
            return Err(fail("absent de la police"));
        }

        let scale = PxScale::from(size as f32);
        let scaled = self.font.as_scaled(scale);
        let line = scaled.ascent() - scaled.descent();
        let baseline = scaled.ascent() - (line - size as f32) / 2.0;
        let width = scaled.h_advance(gid).ceil().max(1.0) as u32;

        let mut bmp = GlyphBitmap::new(width, size);
        let positioned = gid.with_scale_and_position(scale, point(0.0, baseline));
        if let Some(outline) = self.font.outline_glyph(positioned) {
            let bounds = outline.px_bounds();
            outline.draw(|x, y, v| {
                let px = x as i32 + bounds.min.x as i32;
                let py = y as i32 + bounds.min.y as i32;
                if px >= 0 && py >= 0 && (px as u32) < width && (py as u32) < size {
                    let idx = py as usize * width as usize + px as usize;
                    let cov = (v * 255.0).round().clamp(0.0, 255.0) as u8;
                    bmp.coverage[idx] = bmp.coverage[idx].max(cov);
                }
            });
        }
        Ok(bmp)
    }

    fn fallback_glyph(&self) -> char {
        self.fallback
    }
}
