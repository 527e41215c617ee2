use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::charset::{BANK_DEFAULT, GlyphOrder};
use crate::color::{ColorPolicy, Rgb};
use crate::error::CoreError;
use crate::presets::Style;

/// Taille de police minimale après variation aléatoire.
pub const MIN_GLYPH_SIZE: u32 = 6;

/// Paramètres d'une passe de glyphes.
///
/// Une instance par couche et par style ; immuable une fois validée.
///
/// # Example
/// ```
/// use gd_core::config::LayerConfig;
/// let layer = LayerConfig::new(30, 26, 20, 150, 1.2).with_rotation(25.0);
/// assert!(layer.validate().is_ok());
/// assert_eq!(layer.alpha_range(), (20, 170));
/// ```
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LayerConfig {
    /// Taille de police de base (px).
    pub font_size: u32,
    /// Pas de la grille d'échantillonnage et de pose (px).
    pub step: u32,
    /// Alpha sur les zones blanches.
    pub base_alpha: u8,
    /// Alpha ajouté proportionnellement à l'obscurité.
    pub alpha_boost_dark: u8,
    /// Multiplicateur de densité (> 0). Au-delà de 1, les zones sombres saturent.
    pub density_scale: f32,
    /// Politique de couleur de l'encre.
    pub color: ColorPolicy,
    /// Jitter de position, fraction du pas [0.0, 0.5].
    pub jitter: f32,
    /// Rotation maximale en degrés (None = pas de rotation).
    pub rotation: Option<f32>,
    /// Facteurs min/max appliqués à `font_size`.
    pub size_variation: (f32, f32),
    /// Poids des contours dans la probabilité d'occupation.
    pub edge_weight: f32,
    /// En dessous de cette obscurité la cellule reste vide [0.0, 1.0].
    pub background_threshold: f32,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self::new(18, 18, 40, 150, 1.0)
    }
}

impl LayerConfig {
    /// Layer with the given size/pitch/alpha/density and default jitter (0.4),
    /// size variation (0.9..1.2), black ink, no rotation.
    #[must_use]
    pub fn new(
        font_size: u32,
        step: u32,
        base_alpha: u8,
        alpha_boost_dark: u8,
        density_scale: f32,
    ) -> Self {
        Self {
            font_size,
            step,
            base_alpha,
            alpha_boost_dark,
            density_scale,
            color: ColorPolicy::default(),
            jitter: 0.4,
            rotation: None,
            size_variation: (0.9, 1.2),
            edge_weight: 0.0,
            background_threshold: 0.0,
        }
    }

    /// Enable random rotation within ±`degrees`.
    #[must_use]
    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = Some(degrees);
        self
    }

    /// Override the position jitter.
    #[must_use]
    pub fn with_jitter(mut self, jitter: f32) -> Self {
        self.jitter = jitter;
        self
    }

    /// Override the ink policy.
    #[must_use]
    pub fn with_color(mut self, color: ColorPolicy) -> Self {
        self.color = color;
        self
    }

    /// Bias occupancy toward contours.
    #[must_use]
    pub fn with_edge_weight(mut self, weight: f32) -> Self {
        self.edge_weight = weight;
        self
    }

    /// Keep cells lighter than this darkness empty.
    #[must_use]
    pub fn with_background_threshold(mut self, threshold: f32) -> Self {
        self.background_threshold = threshold;
        self
    }

    /// Plage de tailles effectives (min, max) en pixels.
    #[must_use]
    pub fn size_range(&self) -> (u32, u32) {
        let base = self.font_size as f32;
        let lo = ((base * self.size_variation.0).round() as u32).max(MIN_GLYPH_SIZE);
        let hi = ((base * self.size_variation.1).round() as u32).max(MIN_GLYPH_SIZE);
        (lo, hi.max(lo))
    }

    /// Plage d'alpha (blanc, noir), bornée à 255.
    #[must_use]
    pub fn alpha_range(&self) -> (u8, u8) {
        let hi = (u16::from(self.base_alpha) + u16::from(self.alpha_boost_dark)).min(255);
        (self.base_alpha, hi as u8)
    }

    /// Alpha for a cell of the given darkness. Non-decreasing in `darkness`.
    ///
    /// # Example
    /// ```
    /// use gd_core::config::LayerConfig;
    /// let l = LayerConfig::new(20, 20, 40, 200, 1.0);
    /// assert_eq!(l.alpha_for(0.0), 40);
    /// assert_eq!(l.alpha_for(1.0), 240);
    /// ```
    #[must_use]
    pub fn alpha_for(&self, darkness: f32) -> u8 {
        let d = darkness.clamp(0.0, 1.0);
        let a = f32::from(self.base_alpha) + d * f32::from(self.alpha_boost_dark);
        a.clamp(0.0, 255.0) as u8
    }

    /// Occupancy probability of a cell. Non-decreasing in `darkness` and `edge`.
    ///
    /// # Example
    /// ```
    /// use gd_core::config::LayerConfig;
    /// let l = LayerConfig::new(20, 20, 40, 200, 0.5);
    /// assert_eq!(l.occupancy(0.0, 0.0), 0.0);
    /// assert!((l.occupancy(1.0, 0.0) - 0.5).abs() < 1e-6);
    /// ```
    #[must_use]
    pub fn occupancy(&self, darkness: f32, edge: f32) -> f32 {
        let d = darkness.clamp(0.0, 1.0);
        if d < self.background_threshold {
            return 0.0;
        }
        ((d + self.edge_weight * edge.clamp(0.0, 1.0)) * self.density_scale).clamp(0.0, 1.0)
    }

    /// Check every parameter against its domain.
    ///
    /// # Errors
    /// `CoreError::Config` naming the first invalid field.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.font_size == 0 {
            return Err(CoreError::config("font_size doit être > 0"));
        }
        if self.step == 0 {
            return Err(CoreError::config("step doit être > 0"));
        }
        if !self.density_scale.is_finite() || self.density_scale <= 0.0 {
            return Err(CoreError::config(format!(
                "density_scale doit être > 0 (reçu {})",
                self.density_scale
            )));
        }
        if self.base_alpha == 0 && self.alpha_boost_dark == 0 {
            return Err(CoreError::config("plage alpha vide : la couche serait invisible"));
        }
        if !(0.0..=0.5).contains(&self.jitter) {
            return Err(CoreError::config(format!(
                "jitter hors de [0, 0.5] : {}",
                self.jitter
            )));
        }
        if let Some(r) = self
            .rotation
            .filter(|r| !r.is_finite() || !(0.0..=180.0).contains(r))
        {
            return Err(CoreError::config(format!("rotation hors de [0, 180] : {r}")));
        }
        let (lo, hi) = self.size_variation;
        if !lo.is_finite() || !hi.is_finite() || lo <= 0.0 || lo > hi {
            return Err(CoreError::config(format!(
                "size_variation invalide : min {lo} > max {hi} ou non positive"
            )));
        }
        if !self.edge_weight.is_finite() || self.edge_weight < 0.0 {
            return Err(CoreError::config("edge_weight doit être ≥ 0"));
        }
        if !(0.0..=1.0).contains(&self.background_threshold) {
            return Err(CoreError::config("background_threshold hors de [0, 1]"));
        }
        Ok(())
    }
}

/// Courbe d'interpolation du vol des glyphes.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum Easing {
    /// y = t.
    Linear,
    /// y = 1 - (1 - t)².
    EaseOutQuad,
    /// y = 1 - (1 - t)³. Arrive vite, se pose doucement.
    #[default]
    EaseOutCubic,
}

impl Easing {
    /// Progress at normalized time `t` ∈ [0, 1]. Monotone, 0 → 0, 1 → 1.
    ///
    /// # Example
    /// ```
    /// use gd_core::config::Easing;
    /// assert_eq!(Easing::EaseOutCubic.apply(0.0), 0.0);
    /// assert_eq!(Easing::EaseOutCubic.apply(1.0), 1.0);
    /// ```
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
        }
    }

    /// Vitesse instantanée normalisée par sa valeur maximale, dans [0, 1].
    #[must_use]
    pub fn relative_speed(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => 1.0,
            Self::EaseOutQuad => 1.0 - t,
            Self::EaseOutCubic => (1.0 - t) * (1.0 - t),
        }
    }
}

/// Rythme et rendu de l'animation de profondeur.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct AnimationConfig {
    /// Frames de vol par couche (> 0).
    pub frames_per_layer: u32,
    /// Frames du fondu final vers l'original (> 0).
    pub final_original_frames: u32,
    /// Délai GIF par frame (ms).
    pub frame_delay_ms: u32,
    /// Courbe de vol.
    pub easing: Easing,
    /// Rayon de flou maximal (px) pendant le vol, proportionnel à la vitesse.
    pub motion_blur: f32,
    /// Rayon de flou au début du fondu final, décroît jusqu'à 0.
    pub fade_blur: f32,
    /// Styles empilés, dans l'ordre d'apparition.
    pub styles: Vec<Style>,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            frames_per_layer: 4,
            final_original_frames: 6,
            frame_delay_ms: 120,
            easing: Easing::default(),
            motion_blur: 1.2,
            fade_blur: 1.5,
            styles: Style::ANIMATION.to_vec(),
        }
    }
}

impl AnimationConfig {
    /// Styles to stack, in order. An empty list means the default sequence.
    #[must_use]
    pub fn sequence(&self) -> Vec<Style> {
        if self.styles.is_empty() {
            Style::ANIMATION.to_vec()
        } else {
            self.styles.clone()
        }
    }

    /// # Errors
    /// `CoreError::Config` if a frame count or delay is zero or a blur is negative.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.frames_per_layer == 0 {
            return Err(CoreError::config("frames_per_layer doit être > 0"));
        }
        if self.final_original_frames == 0 {
            return Err(CoreError::config("final_original_frames doit être > 0"));
        }
        if self.frame_delay_ms == 0 {
            return Err(CoreError::config("frame_delay_ms doit être > 0"));
        }
        for (name, v) in [("motion_blur", self.motion_blur), ("fade_blur", self.fade_blur)] {
            if !v.is_finite() || v < 0.0 {
                return Err(CoreError::config(format!("{name} doit être ≥ 0 (reçu {v})")));
            }
        }
        Ok(())
    }
}

/// Mise en page des planches de comparaison.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct SheetConfig {
    /// Marge autour et entre les panneaux (px).
    pub padding: u32,
    /// Bandeau réservé aux libellés sous les panneaux (px, 0 = sans libellé).
    pub label_height: u32,
    /// Taille de police des libellés (px).
    pub label_size: u32,
    /// Fond de la planche.
    pub background: Rgb,
    /// Couleur des libellés.
    pub label_color: Rgb,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            padding: 0,
            label_height: 40,
            label_size: 16,
            background: (255, 255, 255),
            label_color: (0, 0, 0),
        }
    }
}

impl SheetConfig {
    /// # Errors
    /// `CoreError::Config` if labels are enabled with a zero or oversized font.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.label_height > 0 && (self.label_size == 0 || self.label_size > self.label_height)
        {
            return Err(CoreError::config(format!(
                "label_size {} incompatible avec label_height {}",
                self.label_size, self.label_height
            )));
        }
        Ok(())
    }
}

/// Configuration complète d'une exécution.
///
/// Sérialisable en TOML. Chaque champ a une valeur par défaut saine.
///
/// # Example
/// ```
/// use gd_core::config::RunConfig;
/// let config = RunConfig::default();
/// assert_eq!(config.max_width, 800);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct RunConfig {
    /// Largeur cible de l'image redimensionnée (> 0).
    pub max_width: u32,
    /// Graine du générateur pseudo-aléatoire. None = tirée au lancement.
    pub seed: Option<u64>,
    /// Banque de glyphes.
    pub glyphs: String,
    /// Ordre de parcours de la banque.
    pub glyph_order: GlyphOrder,
    /// Fond du canevas.
    pub background: Rgb,
    /// Encre imposée à toutes les couches. None = encre de chaque style.
    pub ink: Option<ColorPolicy>,
    /// Poids des contours imposé à toutes les couches. None = valeur du style.
    pub edge_weight: Option<f32>,
    /// Seuil de fond imposé à toutes les couches. None = valeur du style.
    pub background_threshold: Option<f32>,
    /// Réglages d'animation.
    pub animation: AnimationConfig,
    /// Réglages des planches.
    pub sheet: SheetConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_width: 800,
            seed: None,
            glyphs: BANK_DEFAULT.to_string(),
            glyph_order: GlyphOrder::Random,
            background: (255, 255, 255),
            ink: None,
            edge_weight: None,
            background_threshold: None,
            animation: AnimationConfig::default(),
            sheet: SheetConfig::default(),
        }
    }
}

impl RunConfig {
    /// Validate the whole run before any image is touched.
    ///
    /// # Errors
    /// The first `CoreError::Config` found.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.max_width == 0 {
            return Err(CoreError::config("max_width doit être > 0"));
        }
        if self.glyphs.chars().all(char::is_whitespace) {
            return Err(CoreError::config("la banque de glyphes est vide"));
        }
        if let Some(w) = self.edge_weight.filter(|w| !w.is_finite() || *w < 0.0) {
            return Err(CoreError::config(format!("edge_weight doit être ≥ 0 (reçu {w})")));
        }
        if let Some(t) = self
            .background_threshold
            .filter(|t| !(0.0..=1.0).contains(t))
        {
            return Err(CoreError::config(format!(
                "background_threshold hors de [0, 1] : {t}"
            )));
        }
        self.animation.validate()?;
        self.sheet.validate()
    }

    /// Layers of `style` with the configured ink, edge weight and background
    /// threshold applied.
    ///
    /// # Example
    /// ```
    /// use gd_core::color::ColorPolicy;
    /// use gd_core::config::RunConfig;
    /// use gd_core::presets::Style;
    ///
    /// let config = RunConfig { ink: Some(ColorPolicy::Monochrome((30, 0, 0))), ..RunConfig::default() };
    /// assert!(config.layers(Style::Classic).iter().all(|l| l.color == ColorPolicy::Monochrome((30, 0, 0))));
    /// ```
    #[must_use]
    pub fn layers(&self, style: Style) -> Vec<LayerConfig> {
        style
            .layers()
            .into_iter()
            .map(|mut layer| {
                if let Some(ink) = self.ink {
                    layer.color = ink;
                }
                if let Some(w) = self.edge_weight {
                    layer.edge_weight = w;
                }
                if let Some(t) = self.background_threshold {
                    layer.background_threshold = t;
                }
                layer
            })
            .collect()
    }

    /// The seed to use: the configured one, or a fresh one drawn now.
    #[must_use]
    pub fn effective_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            let seed = rand::random::<u64>();
            log::info!("Aucune graine fournie, graine tirée : {seed}");
            seed
        })
    }
}

/// Structure TOML intermédiaire, toutes sections optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    render: Option<RenderSection>,
    animation: Option<AnimationConfig>,
    sheet: Option<SheetConfig>,
}

/// Render section of the TOML config, all fields optional for partial override.
#[derive(Deserialize)]
struct RenderSection {
    max_width: Option<u32>,
    seed: Option<u64>,
    glyphs: Option<String>,
    glyph_order: Option<GlyphOrder>,
    background: Option<Rgb>,
    ink: Option<ColorPolicy>,
    edge_weight: Option<f32>,
    background_threshold: Option<f32>,
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed. Value domains are
/// checked separately by [`RunConfig::validate`].
///
/// # Example
/// ```no_run
/// use gd_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("glyphdepth.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<RunConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Erreur de parsing TOML dans {}", path.display()))
}

/// Parse TOML text over the defaults.
///
/// # Errors
/// Returns an error on malformed TOML or wrongly typed values.
pub fn parse_config(content: &str) -> Result<RunConfig> {
    let file: ConfigFile = toml::from_str(content)?;
    let mut config = RunConfig::default();

    if let Some(r) = file.render {
        if let Some(v) = r.max_width {
            config.max_width = v;
        }
        if let Some(v) = r.seed {
            config.seed = Some(v);
        }
        if let Some(v) = r.glyphs {
            config.glyphs = v;
        }
        if let Some(v) = r.glyph_order {
            config.glyph_order = v;
        }
        if let Some(v) = r.background {
            config.background = v;
        }
        if r.ink.is_some() {
            config.ink = r.ink;
        }
        if r.edge_weight.is_some() {
            config.edge_weight = r.edge_weight;
        }
        if r.background_threshold.is_some() {
            config.background_threshold = r.background_threshold;
        }
    }
    if let Some(a) = file.animation {
        config.animation = a;
    }
    if let Some(s) = file.sheet {
        config.sheet = s;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_rejects_bad_domains() {
        let ok = LayerConfig::new(20, 20, 20, 100, 1.0);
        assert!(ok.validate().is_ok());

        let mut l = ok.clone();
        l.density_scale = 0.0;
        assert!(matches!(l.validate(), Err(CoreError::Config(_))));

        let mut l = ok.clone();
        l.size_variation = (1.3, 1.1);
        assert!(matches!(l.validate(), Err(CoreError::Config(_))));

        let mut l = ok.clone();
        l.base_alpha = 0;
        l.alpha_boost_dark = 0;
        assert!(matches!(l.validate(), Err(CoreError::Config(_))));

        let l = ok.clone().with_jitter(0.8);
        assert!(matches!(l.validate(), Err(CoreError::Config(_))));

        let mut l = ok;
        l.step = 0;
        assert!(matches!(l.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn alpha_and_occupancy_monotone_in_darkness() {
        let l = LayerConfig::new(20, 20, 30, 200, 1.3).with_edge_weight(0.5);
        let mut prev_a = 0u8;
        let mut prev_p = 0.0f32;
        for i in 0..=100 {
            let d = i as f32 / 100.0;
            let a = l.alpha_for(d);
            let p = l.occupancy(d, 0.2);
            assert!(a >= prev_a, "alpha non monotone à {d}");
            assert!(p >= prev_p, "occupation non monotone à {d}");
            prev_a = a;
            prev_p = p;
        }
    }

    #[test]
    fn background_threshold_empties_light_cells() {
        let l = LayerConfig::new(20, 20, 30, 200, 1.0).with_background_threshold(0.2);
        assert_eq!(l.occupancy(0.1, 1.0), 0.0);
        assert!(l.occupancy(0.3, 0.0) > 0.0);
    }

    #[test]
    fn size_range_respects_minimum() {
        let l = LayerConfig::new(4, 10, 30, 200, 1.0);
        assert_eq!(l.size_range(), (MIN_GLYPH_SIZE, MIN_GLYPH_SIZE));
        let l = LayerConfig::new(50, 50, 30, 200, 1.0);
        assert_eq!(l.size_range(), (45, 60));
    }

    #[test]
    fn animation_rejects_zero_frames() {
        let mut a = AnimationConfig::default();
        a.frames_per_layer = 0;
        assert!(a.validate().is_err());
        let mut a = AnimationConfig::default();
        a.final_original_frames = 0;
        assert!(a.validate().is_err());
    }

    #[test]
    fn easing_is_monotone_and_settles() {
        for e in [Easing::Linear, Easing::EaseOutQuad, Easing::EaseOutCubic] {
            let mut prev = 0.0;
            for i in 0..=50 {
                let v = e.apply(i as f32 / 50.0);
                assert!(v >= prev);
                prev = v;
            }
            assert_eq!(e.apply(1.0), 1.0);
        }
        assert_eq!(Easing::EaseOutCubic.relative_speed(1.0), 0.0);
    }

    #[test]
    fn parse_partial_toml() {
        let config = parse_config(
            r#"
            [render]
            max_width = 400
            seed = 42

            [animation]
            frames_per_layer = 5
            styles = ["deep_dense"]
            "#,
        )
        .unwrap();
        assert_eq!(config.max_width, 400);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.animation.frames_per_layer, 5);
        assert_eq!(config.animation.final_original_frames, 6);
        assert_eq!(config.animation.styles, vec![Style::DeepDense]);
        assert_eq!(config.glyphs, BANK_DEFAULT);
    }

    #[test]
    fn ink_override_reaches_every_layer() {
        let config = parse_config(
            r#"
            [render.ink.DarknessMapped]
            light = [180, 170, 160]
            dark = [20, 10, 0]
            "#,
        )
        .unwrap();
        let expected = ColorPolicy::DarknessMapped {
            light: (180, 170, 160),
            dark: (20, 10, 0),
        };
        assert_eq!(config.ink, Some(expected));
        let layers = config.layers(Style::DeepDense);
        assert_eq!(layers.len(), 3);
        assert!(layers.iter().all(|l| l.color == expected));
        assert_eq!(
            RunConfig::default().layers(Style::DeepDense),
            Style::DeepDense.layers()
        );
    }

    #[test]
    fn contour_settings_reach_every_layer() {
        let config = parse_config(
            r#"
            [render]
            edge_weight = 0.6
            background_threshold = 0.1
            "#,
        )
        .unwrap();
        assert!(config.validate().is_ok());
        for style in Style::ALL {
            for layer in config.layers(style) {
                assert_eq!(layer.edge_weight, 0.6);
                assert_eq!(layer.background_threshold, 0.1);
                assert!(layer.validate().is_ok());
            }
        }

        let config = RunConfig {
            background_threshold: Some(1.5),
            ..RunConfig::default()
        };
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
        let config = RunConfig {
            edge_weight: Some(-0.2),
            ..RunConfig::default()
        };
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn empty_animation_styles_mean_default_sequence() {
        let config = parse_config("[animation]\nstyles = []\n").unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.animation.sequence(), Style::ANIMATION.to_vec());

        let config = parse_config("[animation]\nstyles = [\"minimal_airy\"]\n").unwrap();
        assert_eq!(config.animation.sequence(), vec![Style::MinimalAiry]);
    }

    #[test]
    fn load_config_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.toml");
        std::fs::write(&path, "[sheet]\npadding = 8\n").unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.sheet.padding, 8);
        assert_eq!(config.sheet.label_height, 40);
    }

    #[test]
    fn run_config_rejects_zero_width() {
        let config = RunConfig {
            max_width: 0,
            ..RunConfig::default()
        };
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
    }
}
