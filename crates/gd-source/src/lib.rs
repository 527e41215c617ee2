/// Image sampler for glyphdepth: decode, resize, luminance/edge map.

pub mod edge;
pub mod image;
pub mod resize;
pub mod sampler;

pub use sampler::{SampledImage, sample_image, sample_path};
