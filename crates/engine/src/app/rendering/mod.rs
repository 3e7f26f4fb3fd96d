mod canvas;
mod renderer;
mod text;
mod transform;

pub use canvas::{Canvas, Rgba};
pub use renderer::Renderer;
pub use text::{text_width_px, GLYPH_HEIGHT, LINE_ADVANCE, TEXT_SCALE};
pub use transform::{Affine2, Viewport};
