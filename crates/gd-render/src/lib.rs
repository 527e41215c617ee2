/// Depth animation and comparison sheets for glyphdepth.
pub mod animator;
pub mod effects;
pub mod sheet;

pub use animator::{DepthAnimator, Phase};
pub use sheet::{Panel, SheetReport};
