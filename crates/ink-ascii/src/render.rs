use ink_core::error::CoreError;
use ink_core::frame::{AsciiGrid, BrightnessGrid, Image};
use ink_core::traits::GlyphScorer;
use rayon::prelude::*;

use crate::brightness::build_brightness_grid;
use crate::palette::CharPalette;

/// Map every brightness cell to its best-matching palette character.
///
/// The palette is checked before any cell is written: on an empty palette no
/// grid is produced at all.
///
/// # Errors
/// Returns [`CoreError::EmptyPalette`] if the palette has no characters.
///
/// # Example
/// ```
/// use ink_ascii::{palette::CharPalette, render::render};
/// use ink_core::frame::BrightnessGrid;
/// use ink_core::traits::GlyphScorer;
///
/// struct Code;
/// impl GlyphScorer for Code {
///     fn score(&self, c: char) -> u32 { c as u32 }
/// }
///
/// let palette = CharPalette::new(Code, ['a', 'z']);
/// let grid = BrightnessGrid::new(2, 1, vec![0.1, 0.9]).unwrap();
/// assert_eq!(render(&grid, &palette).unwrap().to_string(), "az");
/// ```
pub fn render<S: GlyphScorer>(
    grid: &BrightnessGrid,
    palette: &CharPalette<S>,
) -> Result<AsciiGrid, CoreError> {
    if palette.is_empty() {
        return Err(CoreError::EmptyPalette);
    }

    let mut out = AsciiGrid::new(grid.columns, grid.rows);
    let width = grid.columns.max(1) as usize;

    out.cells
        .par_chunks_mut(width)
        .zip(grid.values.par_chunks(width))
        .try_for_each(|(cells, values)| -> Result<(), CoreError> {
            for (cell, &brightness) in cells.iter_mut().zip(values) {
                *cell = palette.best_match(brightness)?;
            }
            Ok(())
        })?;

    Ok(out)
}

/// Image → brightness grid → ASCII grid in one call.
///
/// # Errors
/// Returns [`CoreError::EmptyPalette`] before doing any image work if the
/// palette is empty, or [`CoreError::InvalidResolution`] from the grid builder.
pub fn convert<S: GlyphScorer>(
    image: &Image,
    columns: u32,
    palette: &CharPalette<S>,
) -> Result<AsciiGrid, CoreError> {
    if palette.is_empty() {
        return Err(CoreError::EmptyPalette);
    }
    let brightness = build_brightness_grid(image, columns)?;
    render(&brightness, palette)
}
