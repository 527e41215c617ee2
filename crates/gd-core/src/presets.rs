use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::LayerConfig;
use crate::error::CoreError;

/// Styles nommés : de simples jeux de paramètres pour le planificateur.
///
/// Chaque style est une liste ordonnée de couches, de la plus grossière à la plus fine.
///
/// # Example
/// ```
/// use gd_core::presets::Style;
/// let style: Style = "deep_dense".parse().unwrap();
/// assert_eq!(style, Style::DeepDense);
/// assert_eq!(style.layers().len(), 3);
/// ```
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Style {
    /// Quatre couches, rotation sur les couches intermédiaires.
    Classic,
    /// Plus doux, plus photographique, moins de bruit.
    SubtleSoft,
    /// Contraste fort, caractères très visibles, allure d'affiche.
    GraphicBold,
    /// Très dense dans les zones sombres, presque gravé.
    DeepDense,
    /// Clairsemé, aéré, impression plus abstraite.
    MinimalAiry,
}

impl Style {
    /// Every preset, in the order used when no style is requested.
    pub const ALL: [Style; 5] = [
        Style::Classic,
        Style::SubtleSoft,
        Style::GraphicBold,
        Style::DeepDense,
        Style::MinimalAiry,
    ];

    /// The variation presets compared side by side.
    pub const VARIATIONS: [Style; 4] = [
        Style::SubtleSoft,
        Style::GraphicBold,
        Style::DeepDense,
        Style::MinimalAiry,
    ];

    /// Default sequence of the depth animation.
    pub const ANIMATION: [Style; 2] = [Style::SubtleSoft, Style::GraphicBold];

    /// Styles shown next to the original on the evaluation sheet.
    pub const EVALUATION: [Style; 3] = [Style::SubtleSoft, Style::GraphicBold, Style::DeepDense];

    /// Configuration-boundary name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::SubtleSoft => "subtle_soft",
            Self::GraphicBold => "graphic_bold",
            Self::DeepDense => "deep_dense",
            Self::MinimalAiry => "minimal_airy",
        }
    }

    /// Stable index, mixed into per-style RNG seeds.
    #[must_use]
    pub fn index(self) -> u64 {
        match self {
            Self::Classic => 0,
            Self::SubtleSoft => 1,
            Self::GraphicBold => 2,
            Self::DeepDense => 3,
            Self::MinimalAiry => 4,
        }
    }

    /// Couches du style, grossière → fine.
    #[must_use]
    pub fn layers(self) -> Vec<LayerConfig> {
        match self {
            Self::Classic => vec![
                LayerConfig::new(50, 50, 10, 180, 0.7),
                LayerConfig::new(30, 26, 20, 150, 1.2).with_rotation(25.0),
                LayerConfig::new(18, 14, 40, 160, 1.6).with_rotation(25.0),
                LayerConfig::new(12, 10, 30, 200, 1.3),
            ],
            Self::SubtleSoft => vec![
                LayerConfig::new(52, 56, 20, 130, 0.5),
                LayerConfig::new(30, 32, 30, 140, 0.9),
                LayerConfig::new(18, 18, 40, 150, 1.2),
            ],
            Self::GraphicBold => vec![
                LayerConfig::new(64, 60, 40, 200, 0.8),
                LayerConfig::new(32, 30, 60, 190, 1.6),
                LayerConfig::new(16, 14, 70, 190, 1.8),
            ],
            Self::DeepDense => vec![
                LayerConfig::new(40, 40, 25, 210, 1.0),
                LayerConfig::new(26, 22, 40, 210, 1.8),
                LayerConfig::new(14, 10, 50, 210, 2.2),
            ],
            Self::MinimalAiry => vec![
                LayerConfig::new(60, 70, 15, 120, 0.4),
                LayerConfig::new(32, 46, 20, 130, 0.6),
                LayerConfig::new(18, 30, 25, 140, 0.8),
            ],
        }
    }

    /// Validate every layer of the preset.
    ///
    /// # Errors
    /// `CoreError::Config` prefixed with the style and layer index.
    pub fn validate(self) -> Result<(), CoreError> {
        for (i, layer) in self.layers().iter().enumerate() {
            layer.validate().map_err(|e| {
                CoreError::config(format!("style {} couche {i} : {e}", self.name()))
            })?;
        }
        Ok(())
    }

    /// Comma-separated list of every style name, for error messages.
    #[must_use]
    pub fn available() -> String {
        Self::ALL
            .iter()
            .map(|s| s.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Style {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|style| style.name() == s.trim())
            .ok_or_else(|| {
                CoreError::config(format!(
                    "style inconnu '{s}'. Styles disponibles : {}",
                    Self::available()
                ))
            })
    }
}
