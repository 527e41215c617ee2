/// Data model, configuration and shared traits for glyphdepth.
///
/// This crate contains every type the sampler, planner, compositor,
/// animator and exporters exchange, plus the named style presets.

pub mod charset;
pub mod color;
pub mod config;
pub mod error;
pub mod frame;
pub mod luminance;
pub mod placement;
pub mod presets;
pub mod traits;

pub use charset::{GlyphOrder, GlyphSource};
pub use config::{AnimationConfig, LayerConfig, RunConfig, SheetConfig};
pub use error::CoreError;
pub use frame::{FrameBuffer, GlyphBitmap};
pub use luminance::LuminanceMap;
pub use placement::{LayerPlan, Placement};
pub use presets::Style;
pub use traits::GlyphRasterizer;
