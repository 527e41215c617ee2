use crate::color::Rgb;
use crate::config::LayerConfig;

/// Une instance de glyphe posée sur le canevas.
///
/// Produite par le planificateur de couche, lue ensuite par le compositeur
/// et l'animateur. `(x, y)` est le centre du glyphe en coordonnées canevas.
///
/// # Example
/// ```
/// use gd_core::placement::Placement;
/// let p = Placement { x: 5.0, y: 5.0, glyph: '山', size: 12, rotation: 0.0, alpha: 128, color: (0, 0, 0), layer: 0 };
/// assert!((p.opacity() - 128.0 / 255.0).abs() < 1e-6);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Placement {
    /// Centre X, canvas pixels.
    pub x: f32,
    /// Centre Y, canvas pixels.
    pub y: f32,
    /// Caractère à dessiner.
    pub glyph: char,
    /// Taille de police en pixels.
    pub size: u32,
    /// Rotation en degrés, sens trigonométrique.
    pub rotation: f32,
    /// Opacité [0, 255].
    pub alpha: u8,
    /// Encre.
    pub color: Rgb,
    /// Index of the layer that produced it.
    pub layer: usize,
}

impl Placement {
    /// Alpha as a [0.0, 1.0] factor.
    #[inline(always)]
    #[must_use]
    pub fn opacity(&self) -> f32 {
        f32::from(self.alpha) / 255.0
    }

    /// Same glyph moved to another centre (used by the animator).
    #[must_use]
    pub fn at(&self, x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            ..self.clone()
        }
    }
}

/// Les placements d'une couche, dans leur ordre de dessin.
#[derive(Clone, Debug)]
pub struct LayerPlan {
    /// Position in the render's draw order (0 = drawn first).
    pub index: usize,
    /// Configuration the layer was planned from.
    pub config: LayerConfig,
    /// Placements, later ones drawn over earlier ones.
    pub placements: Vec<Placement>,
}

impl LayerPlan {
    /// Number of placements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    /// `true` when the layer placed nothing (e.g. a white image).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }
}

/// Total placements across a full render.
#[must_use]
pub fn total_placements(plans: &[LayerPlan]) -> usize {
    plans.iter().map(LayerPlan::len).sum()
}
