/// Output side of glyphdepth: font rasterization, PNG and GIF writers.
pub mod gif;
pub mod png;
pub mod rasterizer;

pub use gif::GifWriter;
pub use png::save_png;
pub use rasterizer::FontRasterizer;
