use gd_core::config::SheetConfig;
use gd_core::error::CoreError;
use gd_core::frame::FrameBuffer;
use gd_core::presets::Style;
use gd_core::traits::GlyphRasterizer;

/// Libellé du panneau de l'image originale.
pub const ORIGINAL_LABEL: &str = "original";
/// Libellé de la planche d'évaluation imbriquée dans la comparaison.
pub const EVALUATION_LABEL: &str = "evaluation";

/// Une image et son libellé, posés côte à côte sur une planche.
#[derive(Clone, Debug)]
pub struct Panel {
    /// Text drawn under the panel.
    pub label: String,
    /// Panel pixels.
    pub frame: FrameBuffer,
}

impl Panel {
    /// Build a panel.
    #[must_use]
    pub fn new(label: impl Into<String>, frame: FrameBuffer) -> Self {
        Self {
            label: label.into(),
            frame,
        }
    }
}

/// Ce que l'assemblage a dû corriger.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SheetReport {
    /// Panels shorter than the tallest one, padded and centred vertically.
    pub padded_panels: usize,
    /// Label characters the rasterizer could not draw.
    pub missing_label_glyphs: usize,
}

/// Pose les panneaux de gauche à droite avec leur libellé dessous.
///
/// Largeur = Σ largeurs + `padding` × (n + 1). Les panneaux moins hauts que
/// le plus grand sont centrés verticalement et comptés dans
/// `SheetReport::padded_panels`. Sans rasteriseur, la bande des libellés
/// reste vide.
///
/// # Errors
/// `CoreError::Config` for an empty panel list or an invalid `config`.
///
/// # Example
/// ```
/// use gd_core::{FrameBuffer, SheetConfig};
/// use gd_render::sheet::{assemble, Panel};
///
/// let panels = vec![
///     Panel::new("a", FrameBuffer::filled(10, 8, (0, 0, 0))),
///     Panel::new("b", FrameBuffer::filled(10, 8, (0, 0, 0))),
/// ];
/// let config = SheetConfig { padding: 2, ..SheetConfig::default() };
/// let (sheet, report) = assemble(&panels, &config, None).unwrap();
/// assert_eq!(sheet.width, 26);
/// assert_eq!(sheet.height, 8 + 40 + 4);
/// assert_eq!(report.padded_panels, 0);
/// ```
pub fn assemble(
    panels: &[Panel],
    config: &SheetConfig,
    labels: Option<&dyn GlyphRasterizer>,
) -> Result<(FrameBuffer, SheetReport), CoreError> {
    config.validate()?;
    if panels.is_empty() {
        return Err(CoreError::config("aucun panneau à assembler"));
    }

    let pad = config.padding;
    let max_h = panels.iter().map(|p| p.frame.height).max().unwrap_or(0);
    let width = panels.iter().map(|p| p.frame.width).sum::<u32>()
        + pad * (panels.len() as u32 + 1);
    let height = max_h + config.label_height + 2 * pad;
    let mut sheet = FrameBuffer::filled(width, height, config.background);
    let mut report = SheetReport::default();

    let mut x = pad;
    for panel in panels {
        let (pw, ph) = (panel.frame.width, panel.frame.height);
        if ph != max_h {
            let err = CoreError::DimensionMismatch {
                expected: max_h,
                found: ph,
            };
            log::warn!("Panneau '{}' : {err}, complété par des marges", panel.label);
            report.padded_panels += 1;
        }
        let y = pad + (max_h - ph) / 2;
        sheet.composite(&panel.frame, i64::from(x), i64::from(y));

        if let Some(rasterizer) = labels.filter(|_| config.label_height > 0) {
            let band_top = pad + max_h;
            report.missing_label_glyphs +=
                draw_label(&mut sheet, rasterizer, &panel.label, x, pw, band_top, config);
        }
        x += pw + pad;
    }

    log::debug!("Planche {width}×{height}, {} panneaux", panels.len());
    Ok((sheet, report))
}

/// Trace `text` centré sous un panneau d'abscisse `left` et de largeur `width`.
/// Retourne le nombre de caractères non rastérisables.
fn draw_label(
    sheet: &mut FrameBuffer,
    rasterizer: &dyn GlyphRasterizer,
    text: &str,
    left: u32,
    width: u32,
    band_top: u32,
    config: &SheetConfig,
) -> usize {
    let size = config.label_size;
    let mut missing = 0;
    let glyphs: Vec<_> = text
        .chars()
        .filter_map(|c| match rasterizer.rasterize(c, size) {
            Ok(bmp) => Some(bmp),
            Err(e) => {
                log::warn!("Libellé '{text}' : {e}");
                missing += 1;
                None
            }
        })
        .collect();

    let text_w: u32 = glyphs.iter().map(|g| g.width).sum();
    let mut pen = i64::from(left) + (i64::from(width) - i64::from(text_w)) / 2;
    let top = i64::from(band_top) + i64::from(config.label_height.saturating_sub(size) / 2);

    for glyph in &glyphs {
        for gy in 0..glyph.height {
            for gx in 0..glyph.width {
                let cov = glyph.at(gx, gy);
                if cov > 0 {
                    sheet.blend_pixel(
                        pen + i64::from(gx),
                        top + i64::from(gy),
                        config.label_color,
                        f32::from(cov) / 255.0,
                    );
                }
            }
        }
        pen += i64::from(glyph.width);
    }
    missing
}

/// Planche d'évaluation : l'original puis les styles clés rendus, dans
/// l'ordre subtle_soft, graphic_bold, deep_dense.
///
/// `None` si aucun style clé n'a été rendu.
///
/// # Errors
/// `CoreError::Config` for an invalid `config`.
pub fn evaluation_sheet(
    original: &FrameBuffer,
    renders: &[(Style, FrameBuffer)],
    config: &SheetConfig,
    labels: Option<&dyn GlyphRasterizer>,
) -> Result<Option<(FrameBuffer, SheetReport)>, CoreError> {
    let mut panels = vec![Panel::new(ORIGINAL_LABEL, original.clone())];
    for key in Style::EVALUATION {
        if let Some((style, frame)) = renders.iter().find(|(s, _)| *s == key) {
            panels.push(Panel::new(style.name(), frame.clone()));
        }
    }
    if panels.len() == 1 {
        return Ok(None);
    }
    assemble(&panels, config, labels).map(Some)
}

/// Bande de comparaison.
///
/// Avec une planche d'évaluation : les trois premiers styles rendus puis
/// l'évaluation en quatrième panneau. Sans : tous les styles rendus.
///
/// # Errors
/// `CoreError::Config` if there is nothing to compare or `config` is invalid.
pub fn comparison_sheet(
    renders: &[(Style, FrameBuffer)],
    evaluation: Option<&FrameBuffer>,
    config: &SheetConfig,
    labels: Option<&dyn GlyphRasterizer>,
) -> Result<(FrameBuffer, SheetReport), CoreError> {
    let take = if evaluation.is_some() { 3 } else { renders.len() };
    let mut panels: Vec<Panel> = renders
        .iter()
        .take(take)
        .map(|(style, frame)| Panel::new(style.name(), frame.clone()))
        .collect();
    if let Some(eval) = evaluation {
        panels.push(Panel::new(EVALUATION_LABEL, eval.clone()));
    }
    assemble(&panels, config, labels)
}
