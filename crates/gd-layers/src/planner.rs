use gd_core::charset::GlyphSource;
use gd_core::config::{LayerConfig, MIN_GLYPH_SIZE};
use gd_core::error::CoreError;
use gd_core::luminance::LuminanceMap;
use gd_core::placement::{LayerPlan, Placement};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Mélange une graine et un sel (SplitMix64), pour donner à chaque style
/// ou à l'animateur son propre flux reproductible.
///
/// # Example
/// ```
/// use gd_layers::derive_seed;
/// assert_eq!(derive_seed(42, 1), derive_seed(42, 1));
/// assert_ne!(derive_seed(42, 1), derive_seed(42, 2));
/// ```
#[must_use]
pub fn derive_seed(seed: u64, salt: u64) -> u64 {
    let mut z = seed ^ salt.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Plan one layer: walk the `step` grid, sample darkness, decide occupancy,
/// then draw glyph, size, jitter, rotation and alpha for each occupied cell.
///
/// Cells are visited row-major, so the returned order is deterministic for a
/// given RNG state.
///
/// # Errors
/// `CoreError::Config` if `config` is out of its domain.
///
/// # Example
/// ```
/// use gd_core::{GlyphSource, LayerConfig, LuminanceMap};
/// use gd_layers::plan_layer;
/// use rand::SeedableRng;
///
/// let map = LuminanceMap::uniform(100, 100, 0.0);
/// let mut glyphs = GlyphSource::default();
/// let mut rng = rand::rngs::StdRng::seed_from_u64(1);
/// let plan = plan_layer(&map, &LayerConfig::new(20, 20, 40, 200, 1.0), 0, &mut glyphs, &mut rng).unwrap();
/// assert_eq!(plan.len(), 25); // black everywhere, density saturates
/// ```
pub fn plan_layer<R: Rng + ?Sized>(
    map: &LuminanceMap,
    config: &LayerConfig,
    index: usize,
    glyphs: &mut GlyphSource,
    rng: &mut R,
) -> Result<LayerPlan, CoreError> {
    config.validate()?;

    let (w, h) = (map.width(), map.height());
    let step = config.step;
    let half = step as f32 / 2.0;
    let reach = step as f32 * config.jitter;
    let (var_lo, var_hi) = config.size_variation;
    let max_x = (w - 1) as f32;
    let max_y = (h - 1) as f32;

    let mut placements = Vec::new();
    for y in (0..h).step_by(step as usize) {
        for x in (0..w).step_by(step as usize) {
            let sample = map.region_mean(x, y, step);
            let darkness = sample.darkness();
            let p = config.occupancy(darkness, sample.edge);
            if p <= 0.0 || rng.gen_range(0.0f32..1.0) >= p {
                continue;
            }

            let glyph = glyphs.next_glyph(rng);

            let jx = rng.gen_range(-1.0f32..=1.0) * reach;
            let jy = rng.gen_range(-1.0f32..=1.0) * reach;
            // Centre toujours dans le canevas : débordement partiel seulement.
            let cx = (x as f32 + half + jx).clamp(0.0, max_x);
            let cy = (y as f32 + half + jy).clamp(0.0, max_y);

            let variation = rng.gen_range(var_lo..=var_hi);
            let size = ((config.font_size as f32 * variation).round() as u32).max(MIN_GLYPH_SIZE);

            let rotation = match config.rotation {
                Some(r) if r > 0.0 => rng.gen_range(-r..=r),
                _ => 0.0,
            };

            placements.push(Placement {
                x: cx,
                y: cy,
                glyph,
                size,
                rotation,
                alpha: config.alpha_for(darkness),
                color: config.color.ink(darkness),
                layer: index,
            });
        }
    }

    log::debug!(
        "Couche {index} (pas {step}px, densité {}) : {} glyphes",
        config.density_scale,
        placements.len()
    );

    Ok(LayerPlan {
        index,
        config: config.clone(),
        placements,
    })
}

/// Plan a stack of layers with one RNG, coarse layers first.
///
/// Every layer is validated before any is planned. Layers given out of
/// coarse-to-fine order (decreasing `step`) are reordered so that fine detail
/// is never drawn under coarse structure.
///
/// # Errors
/// `CoreError::Config` if any layer is invalid or the stack is empty.
pub fn plan_layers<R: Rng + ?Sized>(
    map: &LuminanceMap,
    layers: &[LayerConfig],
    glyphs: &mut GlyphSource,
    rng: &mut R,
) -> Result<Vec<LayerPlan>, CoreError> {
    if layers.is_empty() {
        return Err(CoreError::config("aucune couche à planifier"));
    }
    for (i, layer) in layers.iter().enumerate() {
        layer
            .validate()
            .map_err(|e| CoreError::config(format!("couche {i} : {e}")))?;
    }

    let mut ordered: Vec<&LayerConfig> = layers.iter().collect();
    ordered.sort_by(|a, b| b.step.cmp(&a.step).then(b.font_size.cmp(&a.font_size)));
    if ordered
        .iter()
        .zip(layers.iter())
        .any(|(a, b)| !std::ptr::eq(*a, b))
    {
        log::warn!("Couches réordonnées de la plus grossière à la plus fine");
    }

    ordered
        .into_iter()
        .enumerate()
        .map(|(index, layer)| plan_layer(map, layer, index, glyphs, rng))
        .collect()
}

/// Plan a full style from a seed. Identical seed and inputs give identical plans.
///
/// # Errors
/// `CoreError::Config` if any layer is invalid.
///
/// # Example
/// ```
/// use gd_core::{GlyphSource, LuminanceMap, Style};
/// use gd_layers::plan_style;
///
/// let map = LuminanceMap::uniform(200, 120, 0.3);
/// let a = plan_style(&map, &Style::SubtleSoft.layers(), &GlyphSource::default(), 42).unwrap();
/// let b = plan_style(&map, &Style::SubtleSoft.layers(), &GlyphSource::default(), 42).unwrap();
/// assert_eq!(a.len(), 3);
/// assert_eq!(a[2].placements, b[2].placements);
/// ```
pub fn plan_style(
    map: &LuminanceMap,
    layers: &[LayerConfig],
    glyphs: &GlyphSource,
    seed: u64,
) -> Result<Vec<LayerPlan>, CoreError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut glyphs = glyphs.clone();
    glyphs.reset();
    plan_layers(map, layers, &mut glyphs, &mut rng)
}
