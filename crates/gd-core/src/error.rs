use thiserror::Error;

/// Errors shared by every glyphdepth crate.
///
/// `ImageLoad` and `Config` are fatal and surface before any rendering starts.
/// `GlyphRender` and `DimensionMismatch` are recovered locally by the compositor
/// and the sheet assembler; they only travel as values so the fallback can be counted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Source image unreadable or not a raster format.
    #[error("Impossible de charger l'image {path} : {reason}")]
    ImageLoad {
        /// Path that failed to load.
        path: String,
        /// Decoder message.
        reason: String,
    },

    /// Invalid configuration value or combination.
    #[error("Configuration invalide : {0}")]
    Config(String),

    /// A glyph could not be rasterized with the current font.
    #[error("Glyphe '{glyph}' impossible à rastériser en {size}px : {reason}")]
    GlyphRender {
        /// The glyph that failed.
        glyph: char,
        /// Requested pixel size.
        size: u32,
        /// Why it failed (missing from font, empty outline...).
        reason: String,
    },

    /// Two panels that must share a height do not.
    #[error("Hauteurs de panneaux incompatibles : attendu {expected}, trouvé {found}")]
    DimensionMismatch {
        /// Expected height in pixels.
        expected: u32,
        /// Actual height in pixels.
        found: u32,
    },

    /// Invalid width/height dimensions.
    #[error("Dimensions invalides : {width}×{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },
}

impl CoreError {
    /// Shorthand for [`CoreError::Config`].
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// `true` for error classes that must abort the run.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ImageLoad { .. } | Self::Config(_) | Self::InvalidDimensions { .. }
        )
    }
}
