use ink_core::error::CoreError;
use ink_core::frame::{BrightnessGrid, Image};
use rayon::prelude::*;

/// Compute one average brightness per square tile of the padded image.
///
/// The image is first padded to a power-of-two canvas (white border, original
/// centred). `columns` tiles span the canvas width; the tile side is
/// `canvas_width / columns` and the row count is `canvas_height / side`.
///
/// # Errors
/// Returns [`CoreError::InvalidResolution`] if `columns` is zero, exceeds the
/// canvas width, does not divide it, or leaves no complete row.
///
/// # Example
/// ```
/// use ink_core::frame::{Image, Pixel};
/// use ink_ascii::brightness::build_brightness_grid;
///
/// let img = Image::filled(100, 60, Pixel::WHITE).unwrap();
/// let grid = build_brightness_grid(&img, 16).unwrap();
/// assert_eq!((grid.columns, grid.rows), (16, 8));
/// ```
pub fn build_brightness_grid(image: &Image, columns: u32) -> Result<BrightnessGrid, CoreError> {
    let canvas = image.padded_to_power_of_two();
    let (width, height) = (canvas.width(), canvas.height());

    let invalid = || CoreError::InvalidResolution {
        columns,
        canvas_width: width,
        canvas_height: height,
    };

    if columns == 0 || columns > width || width % columns != 0 {
        return Err(invalid());
    }
    let tile = width / columns;
    let rows = height / tile;
    if rows == 0 {
        return Err(invalid());
    }

    let mut values = vec![0.0f64; columns as usize * rows as usize];
    values
        .par_chunks_mut(columns as usize)
        .enumerate()
        .for_each(|(ty, row)| {
            for (tx, value) in row.iter_mut().enumerate() {
                *value = tile_brightness(&canvas, tx as u32 * tile, ty as u32 * tile, tile);
            }
        });

    log::debug!(
        "Grille de luminosité {columns}×{rows} (tuiles {tile}px, canevas {width}×{height})"
    );
    BrightnessGrid::new(columns, rows, values)
}

/// Mean grey / 255 over the `side`×`side` square at (x0, y0).
fn tile_brightness(canvas: &Image, x0: u32, y0: u32, side: u32) -> f64 {
    let mut sum = 0.0;
    for y in y0..y0 + side {
        let row = canvas.row(y);
        for pixel in &row[x0 as usize..(x0 + side) as usize] {
            sum += pixel.grey();
        }
    }
    let count = f64::from(side) * f64::from(side);
    (sum / (count * 255.0)).clamp(0.0, 1.0)
}
