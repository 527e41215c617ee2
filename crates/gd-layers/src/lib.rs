/// Layer planning and compositing engine for glyphdepth.
///
/// Turns a luminance map into ordered glyph placements, then draws them
/// coarse-to-fine onto a canvas.
pub mod compositor;
pub mod planner;
pub mod transform;

pub use compositor::{Compositor, RenderStats};
pub use planner::{derive_seed, plan_layer, plan_layers, plan_style};
