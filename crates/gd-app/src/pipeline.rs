use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use gd_core::charset::GlyphSource;
use gd_core::config::RunConfig;
use gd_core::frame::FrameBuffer;
use gd_core::placement::{total_placements, LayerPlan};
use gd_core::presets::Style;
use gd_core::traits::GlyphRasterizer;
use gd_export::{save_png, FontRasterizer, GifWriter};
use gd_layers::{derive_seed, plan_style, Compositor, RenderStats};
use gd_render::sheet::{comparison_sheet, evaluation_sheet};
use gd_render::DepthAnimator;
use gd_source::{sample_path, SampledImage};
use rayon::prelude::*;

use crate::cli::{parse_styles, AnimateArgs, RenderArgs, VariationsArgs};

/// Tout ce qu'une commande a validé et chargé avant de rendre.
pub struct Prepared {
    pub config: RunConfig,
    pub glyphs: GlyphSource,
    pub seed: u64,
    pub sampled: SampledImage,
}

/// Valide la configuration et les styles, puis charge police et image.
///
/// Aucune erreur de configuration ne peut survenir après le premier rendu.
///
/// # Errors
/// Invalid configuration, unknown style, unreadable font or image.
fn prepare(
    config: RunConfig,
    styles: &[Style],
    input: &Path,
    font: &Path,
) -> Result<(Prepared, FontRasterizer)> {
    config.validate()?;
    for style in styles {
        style.validate()?;
    }
    let glyphs = GlyphSource::new(&config.glyphs, config.glyph_order)?;

    let rasterizer = FontRasterizer::from_file(font)?;
    let missing = rasterizer.missing_glyphs(&config.glyphs);
    if !missing.is_empty() {
        log::warn!(
            "{} glyphe(s) absent(s) de la police, remplacés au rendu : {}",
            missing.len(),
            missing.iter().collect::<String>()
        );
    }

    let sampled = sample_path(input, config.max_width)?;
    let seed = config.effective_seed();
    log::info!(
        "Canevas {}×{}, graine {seed}",
        sampled.frame.width,
        sampled.frame.height
    );

    Ok((
        Prepared {
            config,
            glyphs,
            seed,
            sampled,
        },
        rasterizer,
    ))
}

/// Graine d'un style : même image pour `render` et `variations`.
fn style_seed(seed: u64, style: Style) -> u64 {
    derive_seed(seed, style.index())
}

/// Planifie puis compose un style sur le canevas échantillonné.
///
/// # Errors
/// Propagates planner and compositor errors.
pub fn render_style(
    prepared: &Prepared,
    style: Style,
    rasterizer: &dyn GlyphRasterizer,
) -> Result<(FrameBuffer, RenderStats)> {
    let (w, h) = prepared.sampled.size();
    let plans = plan_style(
        &prepared.sampled.map,
        &prepared.config.layers(style),
        &prepared.glyphs,
        style_seed(prepared.seed, style),
    )?;
    log::info!(
        "Style {style} : {} couches, {} glyphes",
        plans.len(),
        total_placements(&plans)
    );

    let mut compositor = Compositor::new(rasterizer);
    let canvas = compositor.render(&plans, w, h, Some(prepared.config.background))?;
    let stats = compositor.stats();
    report_fallbacks(style.name(), stats);
    Ok((canvas, stats))
}

fn report_fallbacks(what: &str, stats: RenderStats) {
    if stats.fallbacks > 0 || stats.skipped > 0 {
        log::warn!(
            "{what} : {} glyphe(s) remplacé(s), {} ignoré(s)",
            stats.fallbacks,
            stats.skipped
        );
    }
}

/// `glyphdepth render`.
///
/// # Errors
/// Any validation, loading, rendering or write failure.
pub fn run_render(args: &RenderArgs, mut config: RunConfig) -> Result<()> {
    args.common.apply(&mut config);
    let style: Style = args.style.parse()?;
    let (prepared, rasterizer) = prepare(config, &[style], &args.common.input, &args.common.font)?;
    let (canvas, _) = render_style(&prepared, style, &rasterizer)?;
    save_png(&args.output, &canvas)
}

/// Fichiers écrits par `variations`.
#[derive(Debug)]
pub struct VariationsOutput {
    pub styles: Vec<PathBuf>,
    pub original: PathBuf,
    pub evaluation: Option<PathBuf>,
    pub comparison: PathBuf,
}

/// `glyphdepth variations`.
///
/// # Errors
/// Any validation, loading, rendering or write failure.
pub fn run_variations(args: &VariationsArgs, mut config: RunConfig) -> Result<VariationsOutput> {
    args.common.apply(&mut config);
    let styles = parse_styles(&args.styles, &Style::VARIATIONS)?;
    let (prepared, rasterizer) = prepare(config, &styles, &args.common.input, &args.common.font)?;
    variations(
        &prepared,
        &styles,
        &rasterizer,
        &args.out_dir,
        &args.comparison_output,
    )
}

/// Rend chaque style en parallèle puis assemble évaluation et comparaison.
///
/// Chaque style a son propre flux aléatoire : le résultat ne dépend pas de
/// l'ordonnancement des threads.
///
/// # Errors
/// Rendering or write failure.
pub fn variations(
    prepared: &Prepared,
    styles: &[Style],
    rasterizer: &dyn GlyphRasterizer,
    out_dir: &Path,
    comparison_name: &str,
) -> Result<VariationsOutput> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Création du dossier {}", out_dir.display()))?;

    let renders: Vec<(Style, FrameBuffer)> = styles
        .par_iter()
        .map(|&style| render_style(prepared, style, rasterizer).map(|(fb, _)| (style, fb)))
        .collect::<Result<_>>()?;

    let mut style_paths = Vec::with_capacity(renders.len());
    for (style, canvas) in &renders {
        let path = out_dir.join(format!("{}.png", style.name()));
        save_png(&path, canvas)?;
        style_paths.push(path);
    }

    let original = out_dir.join("original.png");
    save_png(&original, &prepared.sampled.frame)?;

    let sheet = &prepared.config.sheet;
    let evaluation = evaluation_sheet(&prepared.sampled.frame, &renders, sheet, Some(rasterizer))?;
    let evaluation_path = match &evaluation {
        Some((frame, report)) => {
            let path = out_dir.join("evaluation.png");
            log_sheet("évaluation", report);
            save_png(&path, frame)?;
            Some(path)
        }
        None => None,
    };

    let (comparison, report) = comparison_sheet(
        &renders,
        evaluation.as_ref().map(|(frame, _)| frame),
        sheet,
        Some(rasterizer),
    )?;
    log_sheet("comparaison", &report);
    let comparison_path = out_dir.join(comparison_name);
    save_png(&comparison_path, &comparison)?;

    Ok(VariationsOutput {
        styles: style_paths,
        original,
        evaluation: evaluation_path,
        comparison: comparison_path,
    })
}

fn log_sheet(name: &str, report: &gd_render::SheetReport) {
    if report.padded_panels > 0 {
        log::warn!("Planche {name} : {} panneau(x) complété(s)", report.padded_panels);
    }
    if report.missing_label_glyphs > 0 {
        log::warn!(
            "Planche {name} : {} caractère(s) de libellé manquant(s)",
            report.missing_label_glyphs
        );
    }
}

/// `glyphdepth animate`.
///
/// # Errors
/// Any validation, loading, rendering or write failure.
pub fn run_animate(args: &AnimateArgs, mut config: RunConfig) -> Result<usize> {
    args.apply(&mut config)?;
    let styles = config.animation.sequence();
    let (prepared, rasterizer) = prepare(config, &styles, &args.common.input, &args.common.font)?;
    animate(&prepared, &rasterizer, &args.output_gif)
}

/// Couches des styles animés, mises bout à bout et renumérotées.
///
/// Chaque style reste ordonné grossier → fin, mais la pile ne l'est pas :
/// avec la séquence par défaut, la couche grossière de `graphic_bold` (pas 60)
/// se pose sur la couche la plus fine de `subtle_soft` (pas 18). L'ordre de
/// dessin suit l'ordre d'arrivée, pas le pas de grille. La renumérotation
/// garantit seulement des indices croissants pour le compositeur.
///
/// # Errors
/// Planner errors.
pub fn animation_layers(prepared: &Prepared) -> Result<Vec<LayerPlan>> {
    let mut stacked = Vec::new();
    for style in prepared.config.animation.sequence() {
        let plans = plan_style(
            &prepared.sampled.map,
            &prepared.config.layers(style),
            &prepared.glyphs,
            style_seed(prepared.seed, style),
        )?;
        stacked.extend(plans);
    }
    for (index, plan) in stacked.iter_mut().enumerate() {
        plan.index = index;
        for placement in &mut plan.placements {
            placement.layer = index;
        }
    }
    Ok(stacked)
}

/// Produit le GIF frame par frame. Retourne le nombre de frames écrites.
///
/// # Errors
/// Rendering or write failure.
pub fn animate(
    prepared: &Prepared,
    rasterizer: &dyn GlyphRasterizer,
    output: &Path,
) -> Result<usize> {
    let animation = &prepared.config.animation;
    let layers = animation_layers(prepared)?;
    let mut animator = DepthAnimator::new(
        &prepared.sampled.frame,
        layers,
        rasterizer,
        animation,
        prepared.config.background,
        prepared.seed,
    )?;
    log::info!("Animation : {} frames", animator.frame_count());

    let mut gif = GifWriter::new(output, animation.frame_delay_ms)?;
    for frame in animator.by_ref() {
        gif.write_frame(&frame)?;
    }
    report_fallbacks("animation", animator.stats());
    let frames = gif.finish()?;
    log::info!("GIF sauvegardé : {} ({frames} frames)", output.display());
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gd_core::error::CoreError;
    use gd_core::frame::GlyphBitmap;
    use gd_source::sample_image;

    struct Squares;

    impl GlyphRasterizer for Squares {
        fn rasterize(&self, _glyph: char, size: u32) -> Result<GlyphBitmap, CoreError> {
            let mut bmp = GlyphBitmap::new(size, size);
            bmp.coverage.fill(255);
            Ok(bmp)
        }
    }

    fn prepared(width: u32, height: u32, seed: u64) -> Prepared {
        let mut src = FrameBuffer::filled(width, height, (240, 240, 240));
        for y in height / 4..height * 3 / 4 {
            for x in width / 4..width * 3 / 4 {
                src.set_pixel(x, y, [20, 20, 20, 255]);
            }
        }
        let config = RunConfig {
            max_width: width,
            seed: Some(seed),
            ..RunConfig::default()
        };
        Prepared {
            glyphs: GlyphSource::new(&config.glyphs, config.glyph_order).unwrap(),
            sampled: sample_image(&src, width).unwrap(),
            seed,
            config,
        }
    }

    /// FNV-1a over the pixel bytes.
    fn image_hash(fb: &FrameBuffer) -> u64 {
        fb.data.iter().fold(0xcbf2_9ce4_8422_2325, |h, &b| {
            (h ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
        })
    }

    #[test]
    fn render_matches_sampled_dimensions() {
        let p = prepared(200, 120, 1);
        let (canvas, stats) = render_style(&p, Style::Classic, &Squares).unwrap();
        assert_eq!((canvas.width, canvas.height), p.sampled.size());
        assert!(stats.drawn > 0);
        assert_eq!(stats.fallbacks, 0);
    }

    #[test]
    fn subtle_soft_400x300_seed_42_is_reproducible() {
        let a = prepared(400, 300, 42);
        let b = prepared(400, 300, 42);
        let plan = |p: &Prepared| {
            plan_style(
                &p.sampled.map,
                &p.config.layers(Style::SubtleSoft),
                &p.glyphs,
                style_seed(p.seed, Style::SubtleSoft),
            )
            .unwrap()
        };
        let (plans_a, plans_b) = (plan(&a), plan(&b));
        assert!(total_placements(&plans_a) > 0);
        assert_eq!(total_placements(&plans_a), total_placements(&plans_b));

        let (fa, _) = render_style(&a, Style::SubtleSoft, &Squares).unwrap();
        let (fb, _) = render_style(&b, Style::SubtleSoft, &Squares).unwrap();
        assert_eq!(image_hash(&fa), image_hash(&fb));
        assert_eq!((fa.width, fa.height), (400, 300));
    }

    #[test]
    fn parallel_variations_match_sequential_renders() {
        let p = prepared(160, 100, 7);
        let dir = tempfile::tempdir().unwrap();
        let out = variations(&p, &Style::VARIATIONS, &Squares, dir.path(), "comparison.png").unwrap();

        assert_eq!(out.styles.len(), 4);
        assert!(out.original.exists());
        assert!(out.evaluation.as_ref().is_some_and(|e| e.exists()));
        assert!(out.comparison.exists());

        let (expected, _) = render_style(&p, Style::DeepDense, &Squares).unwrap();
        let written = gd_source::image::load_image(&dir.path().join("deep_dense.png")).unwrap();
        assert_eq!(written, expected);
    }

    #[test]
    fn variations_without_key_styles_skip_evaluation() {
        let p = prepared(120, 80, 3);
        let dir = tempfile::tempdir().unwrap();
        let out = variations(&p, &[Style::MinimalAiry], &Squares, dir.path(), "cmp.png").unwrap();
        assert!(out.evaluation.is_none());
        assert!(!dir.path().join("evaluation.png").exists());
        assert!(dir.path().join("cmp.png").exists());
    }

    #[test]
    fn animated_layers_are_stacked_and_renumbered() {
        let p = prepared(160, 100, 11);
        let layers = animation_layers(&p).unwrap();
        // subtle_soft (3) + graphic_bold (3)
        assert_eq!(layers.len(), 6);
        for (i, plan) in layers.iter().enumerate() {
            assert_eq!(plan.index, i);
            assert!(plan.placements.iter().all(|pl| pl.layer == i));
        }
    }

    #[test]
    fn empty_animation_styles_stack_the_default_sequence() {
        let mut p = prepared(160, 100, 11);
        p.config.animation.styles.clear();
        let layers = animation_layers(&p).unwrap();
        assert_eq!(layers.len(), 6);
        assert_eq!(layers[0].config.step, 56);
        assert_eq!(layers[3].config.step, 60);
    }

    #[test]
    fn animate_writes_the_expected_frame_count() {
        let mut p = prepared(80, 60, 5);
        p.config.animation.frames_per_layer = 2;
        p.config.animation.final_original_frames = 3;
        let dir = tempfile::tempdir().unwrap();
        let frames = animate(&p, &Squares, &dir.path().join("anim/depth.gif")).unwrap();
        assert_eq!(frames, 6 * 2 + 3);
    }
}
