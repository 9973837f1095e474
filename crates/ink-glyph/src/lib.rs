/// Glyph rasterization and ink-density scoring for inkascii.
///
/// Renders one character at a time into a fixed 16×16 monochrome bitmap
/// using a reference monospace font, and counts the ink cells.
pub mod rasterizer;

pub use rasterizer::{GLYPH_RESOLUTION, GlyphBitmap, GlyphRenderer};
