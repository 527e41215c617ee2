use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use gd_core::color::Rgb;
use gd_core::error::CoreError;
use gd_core::frame::{FrameBuffer, GlyphBitmap};
use gd_core::placement::{LayerPlan, Placement};
use gd_core::traits::GlyphRasterizer;

use crate::transform::rotate_bitmap;

/// Compteurs d'un rendu.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Placements drawn with their own glyph.
    pub drawn: usize,
    /// Placements drawn with the rasterizer's fallback glyph.
    pub fallbacks: usize,
    /// Placements skipped because neither glyph could be rasterized.
    pub skipped: usize,
}

/// Dessine des plans de couches sur un canevas, couche par couche.
///
/// Les bitmaps non tournés sont mis en cache par (glyphe, taille). Un
/// glyphe irrastérisable est remplacé par le glyphe de repli ; si celui-ci
/// échoue aussi, le placement est sauté. Dans les deux cas un seul
/// avertissement par caractère.
///
/// # Example
/// ```
/// use gd_core::{FrameBuffer, GlyphBitmap, GlyphRasterizer, CoreError};
/// use gd_layers::Compositor;
///
/// struct Blocks;
/// impl GlyphRasterizer for Blocks {
///     fn rasterize(&self, _: char, size: u32) -> Result<GlyphBitmap, CoreError> {
///         let mut b = GlyphBitmap::new(size, size);
///         b.coverage.fill(255);
///         Ok(b)
///     }
/// }
///
/// let mut compositor = Compositor::new(&Blocks);
/// let canvas = compositor.render(&[], 64, 48, Some((255, 255, 255))).unwrap();
/// assert_eq!((canvas.width, canvas.height), (64, 48));
/// ```
pub struct Compositor<'r> {
    rasterizer: &'r dyn GlyphRasterizer,
    cache: HashMap<(char, u32), Option<Arc<GlyphBitmap>>>,
    warned: HashSet<char>,
    stats: RenderStats,
}

impl<'r> Compositor<'r> {
    /// New compositor with an empty glyph cache.
    #[must_use]
    pub fn new(rasterizer: &'r dyn GlyphRasterizer) -> Self {
        Self {
            rasterizer,
            cache: HashMap::new(),
            warned: HashSet::new(),
            stats: RenderStats::default(),
        }
    }

    /// Counters accumulated since creation.
    #[must_use]
    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    /// Dessine tous les plans sur un canevas neuf de `width`×`height`.
    ///
    /// `background = None` donne un canevas transparent (calque d'animation).
    ///
    /// # Errors
    /// `CoreError::InvalidDimensions` for an empty canvas, `CoreError::Config`
    /// if `plans` are not in ascending layer order.
    pub fn render(
        &mut self,
        plans: &[LayerPlan],
        width: u32,
        height: u32,
        background: Option<Rgb>,
    ) -> Result<FrameBuffer, CoreError> {
        if width == 0 || height == 0 {
            return Err(CoreError::InvalidDimensions { width, height });
        }
        if plans.windows(2).any(|w| w[0].index >= w[1].index) {
            return Err(CoreError::config(
                "les couches doivent être dessinées de la plus grossière à la plus fine",
            ));
        }

        let mut canvas = match background {
            Some(color) => FrameBuffer::filled(width, height, color),
            None => FrameBuffer::new(width, height),
        };
        for plan in plans {
            self.draw_layer(&mut canvas, plan);
        }

        let stats = self.stats;
        log::debug!(
            "Rendu {width}×{height} : {} glyphes, {} replis, {} sautés",
            stats.drawn,
            stats.fallbacks,
            stats.skipped
        );
        Ok(canvas)
    }

    /// Draw every placement of `plan`, in order.
    pub fn draw_layer(&mut self, canvas: &mut FrameBuffer, plan: &LayerPlan) {
        for placement in &plan.placements {
            self.draw_placement(canvas, placement);
        }
    }

    /// Dessine un placement centré sur (x, y), avec rotation et alpha.
    /// Les pixels hors du canevas sont coupés.
    #[allow(clippy::cast_possible_truncation)]
    pub fn draw_placement(&mut self, canvas: &mut FrameBuffer, placement: &Placement) {
        let Some(bitmap) = self.bitmap_for(placement.glyph, placement.size) else {
            self.stats.skipped += 1;
            return;
        };

        let rotated;
        let bitmap = if placement.rotation.abs() > f32::EPSILON {
            rotated = rotate_bitmap(&bitmap, placement.rotation);
            &rotated
        } else {
            bitmap.as_ref()
        };

        let left = (placement.x - bitmap.width as f32 / 2.0).round() as i64;
        let top = (placement.y - bitmap.height as f32 / 2.0).round() as i64;
        let opacity = placement.opacity();

        for by in 0..bitmap.height {
            for bx in 0..bitmap.width {
                let cov = bitmap.at(bx, by);
                if cov == 0 {
                    continue;
                }
                canvas.blend_pixel(
                    left + i64::from(bx),
                    top + i64::from(by),
                    placement.color,
                    opacity * f32::from(cov) / 255.0,
                );
            }
        }
    }

    /// Cached bitmap for `glyph`, falling back as needed. Updates counters.
    fn bitmap_for(&mut self, glyph: char, size: u32) -> Option<Arc<GlyphBitmap>> {
        if let Some(bmp) = self.lookup(glyph, size) {
            self.stats.drawn += 1;
            return Some(bmp);
        }

        let fallback = self.rasterizer.fallback_glyph();
        let replacement = if fallback == glyph {
            None
        } else {
            self.lookup(fallback, size)
        };

        if self.warned.insert(glyph) {
            match replacement {
                Some(_) => log::warn!("Glyphe '{glyph}' indisponible, remplacé par '{fallback}'"),
                None => log::warn!("Glyphe '{glyph}' indisponible et sans repli, ignoré"),
            }
        }
        if replacement.is_some() {
            self.stats.fallbacks += 1;
        }
        replacement
    }

    fn lookup(&mut self, glyph: char, size: u32) -> Option<Arc<GlyphBitmap>> {
        let rasterizer = self.rasterizer;
        self.cache
            .entry((glyph, size))
            .or_insert_with(|| match rasterizer.rasterize(glyph, size) {
                Ok(bmp) => Some(Arc::new(bmp)),
                Err(e) => {
                    log::debug!("{e}");
                    None
                }
            })
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gd_core::charset::GlyphSource;
    use gd_core::config::LayerConfig;
    use gd_core::luminance::LuminanceMap;
    use gd_core::presets::Style;

    use crate::planner::plan_style;

    /// Solid squares; refuses glyphs listed in `missing`.
    struct Squares {
        missing: &'static str,
    }

    impl GlyphRasterizer for Squares {
        fn rasterize(&self, glyph: char, size: u32) -> Result<GlyphBitmap, CoreError> {
            if self.missing.contains(glyph) {
                return Err(CoreError::GlyphRender {
                    glyph,
                    size,
                    reason: "absent de la police".into(),
                });
            }
            let mut bmp = GlyphBitmap::new(size, size);
            bmp.coverage.fill(255);
            Ok(bmp)
        }
    }

    fn plan(index: usize, placements: Vec<Placement>) -> LayerPlan {
        LayerPlan {
            index,
            config: LayerConfig::default(),
            placements,
        }
    }

    fn dot(x: f32, y: f32, glyph: char, color: Rgb, layer: usize) -> Placement {
        Placement {
            x,
            y,
            glyph,
            size: 10,
            rotation: 0.0,
            alpha: 255,
            color,
            layer,
        }
    }

    #[test]
    fn canvas_has_requested_size_and_background() {
        let r = Squares { missing: "" };
        let canvas = Compositor::new(&r)
            .render(&[], 30, 20, Some((255, 255, 255)))
            .unwrap();
        assert_eq!((canvas.width, canvas.height), (30, 20));
        assert_eq!(canvas.pixel(3, 3), (255, 255, 255, 255));
    }

    #[test]
    fn later_layers_cover_earlier_ones() {
        let r = Squares { missing: "" };
        let plans = [
            plan(0, vec![dot(10.0, 10.0, '山', (255, 0, 0), 0)]),
            plan(1, vec![dot(10.0, 10.0, '水', (0, 0, 255), 1)]),
        ];
        let canvas = Compositor::new(&r)
            .render(&plans, 20, 20, Some((255, 255, 255)))
            .unwrap();
        assert_eq!(canvas.pixel(10, 10), (0, 0, 255, 255));
    }

    #[test]
    fn out_of_order_plans_are_rejected() {
        let r = Squares { missing: "" };
        let plans = [plan(1, vec![]), plan(0, vec![])];
        assert!(matches!(
            Compositor::new(&r).render(&plans, 10, 10, None),
            Err(CoreError::Config(_))
        ));
    }

    #[test]
    fn missing_glyph_uses_fallback_then_skips() {
        let r = Squares { missing: "龍" };
        let mut c = Compositor::new(&r);
        let plans = [plan(0, vec![dot(5.0, 5.0, '龍', (0, 0, 0), 0), dot(15.0, 5.0, '山', (0, 0, 0), 0)])];
        let canvas = c.render(&plans, 20, 10, Some((255, 255, 255))).unwrap();
        assert_eq!(
            c.stats(),
            RenderStats {
                drawn: 1,
                fallbacks: 1,
                skipped: 0
            }
        );
        assert_eq!(canvas.pixel(5, 5), (0, 0, 0, 255));

        let broken = Squares { missing: "龍□" };
        let mut c = Compositor::new(&broken);
        let canvas = c.render(&plans, 20, 10, Some((255, 255, 255))).unwrap();
        assert_eq!(c.stats().skipped, 1);
        assert_eq!(canvas.pixel(5, 5), (255, 255, 255, 255));
    }

    #[test]
    fn partial_alpha_blends_with_background() {
        let r = Squares { missing: "" };
        let mut p = dot(5.0, 5.0, '山', (0, 0, 0), 0);
        p.alpha = 128;
        let canvas = Compositor::new(&r)
            .render(&[plan(0, vec![p])], 10, 10, Some((255, 255, 255)))
            .unwrap();
        let (r, _, _, a) = canvas.pixel(5, 5);
        assert!((120..=135).contains(&r), "r = {r}");
        assert_eq!(a, 255);
    }

    #[test]
    fn glyphs_near_the_edge_are_clipped() {
        let r = Squares { missing: "" };
        let canvas = Compositor::new(&r)
            .render(&[plan(0, vec![dot(0.0, 0.0, '山', (0, 0, 0), 0)])], 8, 8, None)
            .unwrap();
        assert_eq!(canvas.pixel(0, 0), (0, 0, 0, 255));
        assert_eq!(canvas.pixel(7, 7), (0, 0, 0, 0));
    }

    #[test]
    fn styled_render_is_reproducible() {
        let r = Squares { missing: "" };
        let map = LuminanceMap::uniform(120, 80, 0.3);
        let plans = plan_style(&map, &Style::GraphicBold.layers(), &GlyphSource::default(), 7).unwrap();
        let a = Compositor::new(&r).render(&plans, 120, 80, Some((255, 255, 255))).unwrap();
        let b = Compositor::new(&r).render(&plans, 120, 80, Some((255, 255, 255))).unwrap();
        assert_eq!(a, b);
    }
}
