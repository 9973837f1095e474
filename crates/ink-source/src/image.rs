use std::path::Path;

use anyhow::{Context, Result};
use image::{DynamicImage, RgbImage};
use ink_core::frame::{Image, Pixel};

/// Charge une image (PNG, JPEG, BMP, GIF) depuis le disque.
///
/// Le canal alpha est ignoré.
///
/// # Errors
/// Returns an error if the file cannot be opened or decoded.
///
/// # Example
/// ```no_run
/// use ink_source::image::load_image;
/// use std::path::Path;
/// let img = load_image(Path::new("board.jpeg")).unwrap();
/// ```
pub fn load_image(path: &Path) -> Result<Image> {
    let img = image::open(path)
        .with_context(|| format!("Impossible de charger {}", path.display()))?;
    let frame = from_dynamic(&img)
        .with_context(|| format!("Image inutilisable : {}", path.display()))?;
    log::info!(
        "Image chargée : {} ({}×{})",
        path.display(),
        frame.width(),
        frame.height()
    );
    Ok(frame)
}

/// Convert any decoded image into the core representation.
///
/// # Errors
/// Returns an error if the image has a zero dimension.
pub fn from_dynamic(img: &DynamicImage) -> Result<Image> {
    from_rgb_image(&img.to_rgb8())
}

/// Convert an RGB8 buffer into the core representation.
///
/// # Errors
/// Returns an error if the image has a zero dimension.
///
/// # Example
/// ```
/// use image::RgbImage;
/// use ink_source::image::from_rgb_image;
/// let buf = RgbImage::from_pixel(3, 2, image::Rgb([255, 0, 0]));
/// let img = from_rgb_image(&buf).unwrap();
/// assert_eq!((img.width(), img.height()), (3, 2));
/// ```
pub fn from_rgb_image(buf: &RgbImage) -> Result<Image> {
    let (width, height) = buf.dimensions();
    let pixels = buf
        .pixels()
        .map(|p| Pixel::new(p.0[0], p.0[1], p.0[2]))
        .collect();
    Ok(Image::new(width, height, pixels)?)
}
