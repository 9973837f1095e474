use std::fmt;

use crate::error::CoreError;

/// Poids BT.709 appliqués aux canaux R, G, B.
pub const LUMA_WEIGHTS: (f64, f64, f64) = (0.2126, 0.7152, 0.0722);

/// Valeur maximale d'un canal 8 bits, en flottant.
const CHANNEL_MAX: f64 = 255.0;

/// A single RGB pixel, 8 bits per channel.
///
/// # Example
/// ```
/// use ink_core::frame::Pixel;
/// assert!((Pixel::WHITE.brightness() - 1.0).abs() < 1e-9);
/// assert_eq!(Pixel::BLACK.brightness(), 0.0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Pixel {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Pixel {
    /// Pure white, used to fill padding.
    pub const WHITE: Self = Self::new(255, 255, 255);
    /// Pure black.
    pub const BLACK: Self = Self::new(0, 0, 0);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Weighted grey value in [0, 255].
    #[inline(always)]
    #[must_use]
    pub fn grey(self) -> f64 {
        let (wr, wg, wb) = LUMA_WEIGHTS;
        f64::from(self.r) * wr + f64::from(self.g) * wg + f64::from(self.b) * wb
    }

    /// Grey value normalised into [0, 1].
    #[inline(always)]
    #[must_use]
    pub fn brightness(self) -> f64 {
        (self.grey() / CHANNEL_MAX).clamp(0.0, 1.0)
    }
}

/// Immutable RGB image, row-major.
///
/// Both dimensions are at least 1. Transformations such as
/// [`Image::padded_to_power_of_two`] return a new image.
///
/// # Example
/// ```
/// use ink_core::frame::{Image, Pixel};
/// let img = Image::filled(3, 2, Pixel::BLACK).unwrap();
/// assert_eq!((img.width(), img.height()), (3, 2));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<Pixel>,
}

impl Image {
    /// Build an image from a row-major pixel buffer.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidDimensions`] if a dimension is zero or if
    /// `pixels.len() != width * height`.
    pub fn new(width: u32, height: u32, pixels: Vec<Pixel>) -> Result<Self, CoreError> {
        if width == 0 || height == 0 || pixels.len() != width as usize * height as usize {
            return Err(CoreError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build a uniform image.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidDimensions`] if a dimension is zero.
    pub fn filled(width: u32, height: u32, pixel: Pixel) -> Result<Self, CoreError> {
        Self::new(width, height, vec![pixel; width as usize * height as usize])
    }

    /// Build an image by evaluating `f(x, y)` for every position.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidDimensions`] if a dimension is zero.
    ///
    /// # Example
    /// ```
    /// use ink_core::frame::{Image, Pixel};
    /// let img = Image::from_fn(2, 2, |x, _| if x == 0 { Pixel::BLACK } else { Pixel::WHITE }).unwrap();
    /// assert_eq!(img.pixel(1, 1), Pixel::WHITE);
    /// ```
    pub fn from_fn(
        width: u32,
        height: u32,
        mut f: impl FnMut(u32, u32) -> Pixel,
    ) -> Result<Self, CoreError> {
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self::new(width, height, pixels)
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel at (x, y).
    #[inline(always)]
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Pixel {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// One row of pixels.
    #[inline]
    #[must_use]
    pub fn row(&self, y: u32) -> &[Pixel] {
        let start = y as usize * self.width as usize;
        &self.pixels[start..start + self.width as usize]
    }

    /// Returns a copy whose width and height are each rounded up to the next
    /// power of two, with the original centred and the border filled white.
    ///
    /// # Example
    /// ```
    /// use ink_core::frame::{Image, Pixel};
    /// let img = Image::filled(3, 5, Pixel::BLACK).unwrap();
    /// let padded = img.padded_to_power_of_two();
    /// assert_eq!((padded.width(), padded.height()), (4, 8));
    /// assert_eq!(padded.pixel(0, 0), Pixel::WHITE);
    /// ```
    #[must_use]
    pub fn padded_to_power_of_two(&self) -> Self {
        let new_width = self.width.next_power_of_two();
        let new_height = self.height.next_power_of_two();
        if new_width == self.width && new_height == self.height {
            return self.clone();
        }

        let pad_x = (new_width - self.width) / 2;
        let pad_y = (new_height - self.height) / 2;

        let mut pixels = vec![Pixel::WHITE; new_width as usize * new_height as usize];
        for y in 0..self.height {
            let dst = (y + pad_y) as usize * new_width as usize + pad_x as usize;
            pixels[dst..dst + self.width as usize].copy_from_slice(self.row(y));
        }

        Self {
            width: new_width,
            height: new_height,
            pixels,
        }
    }
}

/// Grille de luminosités moyennes, une valeur [0, 1] par tuile.
///
/// # Example
/// ```
/// use ink_core::frame::BrightnessGrid;
/// let grid = BrightnessGrid::new(4, 2, vec![0.5; 8]).unwrap();
/// assert_eq!(grid.get(3, 1), 0.5);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct BrightnessGrid {
    /// Flat array of values, row-major.
    pub values: Vec<f64>,
    /// Number of columns.
    pub columns: u32,
    /// Number of rows.
    pub rows: u32,
}

impl BrightnessGrid {
    /// Wrap a row-major value buffer.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidDimensions`] if `values.len() != columns * rows`.
    pub fn new(columns: u32, rows: u32, values: Vec<f64>) -> Result<Self, CoreError> {
        if values.len() != columns as usize * rows as usize {
            return Err(CoreError::InvalidDimensions {
                width: columns,
                height: rows,
            });
        }
        Ok(Self {
            values,
            columns,
            rows,
        })
    }

    /// Value of the tile at column `x`, row `y`.
    #[inline(always)]
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> f64 {
        self.values[y as usize * self.columns as usize + x as usize]
    }
}

/// Grille de sortie ASCII.
///
/// # Example
/// ```
/// use ink_core::frame::AsciiGrid;
/// let mut grid = AsciiGrid::new(3, 2);
/// grid.set(0, 0, '@');
/// assert_eq!(grid.get(0, 0), '@');
/// assert_eq!(grid.to_string(), "@  \n   ");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AsciiGrid {
    /// Flat array of characters, row-major.
    pub cells: Vec<char>,
    /// Width in characters.
    pub width: u32,
    /// Height in characters.
    pub height: u32,
}

impl AsciiGrid {
    /// Crée une grille remplie d'espaces.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            cells: vec![' '; width as usize * height as usize],
            width,
            height,
        }
    }

    /// Set the character at position (x, y).
    #[inline(always)]
    pub fn set(&mut self, x: u32, y: u32, ch: char) {
        self.cells[y as usize * self.width as usize + x as usize] = ch;
    }

    /// Get the character at position (x, y).
    #[inline(always)]
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> char {
        self.cells[y as usize * self.width as usize + x as usize]
    }

    /// Iterate over rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[char]> {
        self.cells.chunks(self.width.max(1) as usize)
    }
}

impl fmt::Display for AsciiGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            for &ch in row {
                write!(f, "{ch}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_rejects_zero_dimension() {
        assert_eq!(
            Image::filled(0, 4, Pixel::WHITE),
            Err(CoreError::InvalidDimensions {
                width: 0,
                height: 4
            })
        );
    }

    #[test]
    fn image_rejects_short_buffer() {
        assert!(Image::new(2, 2, vec![Pixel::WHITE; 3]).is_err());
    }

    #[test]
    fn padding_centres_original_pixels() {
        let img = Image::filled(3, 3, Pixel::BLACK).unwrap();
        let padded = img.padded_to_power_of_two();
        assert_eq!((padded.width(), padded.height()), (4, 4));
        // pad = (4 - 3) / 2 = 0: original occupies [0, 3) on both axes.
        assert_eq!(padded.pixel(0, 0), Pixel::BLACK);
        assert_eq!(padded.pixel(2, 2), Pixel::BLACK);
        assert_eq!(padded.pixel(3, 0), Pixel::WHITE);
        assert_eq!(padded.pixel(0, 3), Pixel::WHITE);

        let img = Image::filled(5, 2, Pixel::BLACK).unwrap();
        let padded = img.padded_to_power_of_two();
        assert_eq!((padded.width(), padded.height()), (8, 2));
        assert_eq!(padded.pixel(0, 0), Pixel::WHITE);
        assert_eq!(padded.pixel(1, 0), Pixel::BLACK);
        assert_eq!(padded.pixel(5, 1), Pixel::BLACK);
        assert_eq!(padded.pixel(6, 1), Pixel::WHITE);
    }

    #[test]
    fn padding_leaves_source_untouched() {
        let img = Image::filled(3, 3, Pixel::BLACK).unwrap();
        let before = img.clone();
        let _ = img.padded_to_power_of_two();
        assert_eq!(img, before);
    }

    #[test]
    fn power_of_two_image_is_unchanged() {
        let img = Image::from_fn(4, 2, |x, y| Pixel::new(x as u8, y as u8, 0)).unwrap();
        assert_eq!(img.padded_to_power_of_two(), img);
    }

    #[test]
    fn grey_uses_bt709_weights() {
        let red = Pixel::new(255, 0, 0);
        assert!((red.brightness() - 0.2126).abs() < 1e-9);
        let green = Pixel::new(0, 255, 0);
        assert!((green.brightness() - 0.7152).abs() < 1e-9);
    }

    #[test]
    fn brightness_grid_checks_length() {
        assert!(BrightnessGrid::new(2, 2, vec![0.0; 3]).is_err());
    }

    #[test]
    fn ascii_grid_rows() {
        let mut grid = AsciiGrid::new(2, 2);
        grid.set(1, 1, '#');
        let rows: Vec<String> = grid.rows().map(|r| r.iter().collect()).collect();
        assert_eq!(rows, vec!["  ".to_string(), " #".to_string()]);
    }
}
