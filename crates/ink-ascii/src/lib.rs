pub mod brightness;
/// ASCII conversion engine for inkascii.
///
/// Turns an image into a brightness grid, then each brightness into the
/// palette character whose normalized ink density is closest.
pub mod palette;
pub mod render;

pub use brightness::build_brightness_grid;
pub use palette::{CharPalette, SharedPalette};
pub use render::{convert, render};
