/// Configuration, types, and shared structures for inkascii.
///
/// This crate contains the pixel and grid types, the error taxonomy, the
/// traits at the crate seams, and the configuration logic used across the
/// inkascii workspace.

pub mod charset;
pub mod config;
pub mod error;
pub mod frame;
pub mod traits;

pub use config::RenderConfig;
pub use error::CoreError;
pub use frame::{AsciiGrid, BrightnessGrid, Image, Pixel};
pub use traits::{AsciiOutput, GlyphScorer};
