use std::fmt;
use std::path::Path;

use ab_glyph::{Font, FontArc, PxScale, point};
use anyhow::{Context, Result};
use ink_core::traits::GlyphScorer;

/// Côté du bitmap de glyphe, en cellules.
pub const GLYPH_RESOLUTION: usize = 16;

/// Taille du cadratin en pixels (corps de la police).
const EM_SIZE_PX: f32 = GLYPH_RESOLUTION as f32;
/// Position horizontale du stylo, en fraction du bitmap.
const X_OFFSET_FACTOR: f32 = 0.2;
/// Position de la ligne de base, en fraction du bitmap.
const Y_OFFSET_FACTOR: f32 = 0.75;
/// Couverture minimale pour qu'une cellule compte comme encre.
const INK_THRESHOLD: f32 = 0.5;

/// DejaVu Sans Mono (licence Bitstream Vera, voir assets/).
static BUNDLED_FONT: &[u8] = include_bytes!("../assets/DejaVuSansMono.ttf");

/// Monochrome 16×16 rendering of one character. `true` = ink.
///
/// # Example
/// ```
/// use ink_glyph::GlyphBitmap;
/// let bitmap = GlyphBitmap::blank();
/// assert_eq!(bitmap.ink_count(), 0);
/// ```
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct GlyphBitmap {
    cells: [[bool; GLYPH_RESOLUTION]; GLYPH_RESOLUTION],
}

impl GlyphBitmap {
    /// A bitmap with no ink.
    #[must_use]
    pub fn blank() -> Self {
        Self {
            cells: [[false; GLYPH_RESOLUTION]; GLYPH_RESOLUTION],
        }
    }

    /// Whether cell (x, y) is ink.
    #[inline]
    #[must_use]
    pub fn is_ink(&self, x: usize, y: usize) -> bool {
        self.cells[y][x]
    }

    /// Number of ink cells, in `0..=256`.
    #[must_use]
    pub fn ink_count(&self) -> u32 {
        self.cells
            .iter()
            .map(|row| row.iter().filter(|&&ink| ink).count() as u32)
            .sum()
    }
}

impl fmt::Debug for GlyphBitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            for &ink in row {
                f.write_str(if ink { "#" } else { "." })?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}

/// Rasterise des caractères isolés avec une police monospace de référence.
///
/// Chaque appel est indépendant : aucun cache mutable partagé, le même
/// caractère produit toujours le même bitmap.
///
/// # Example
/// ```
/// use ink_glyph::GlyphRenderer;
/// use ink_core::traits::GlyphScorer;
/// let renderer = GlyphRenderer::bundled().unwrap();
/// assert_eq!(renderer.score(' '), 0);
/// assert!(renderer.score('@') > renderer.score('.'));
/// ```
#[derive(Clone)]
pub struct GlyphRenderer {
    font: FontArc,
    scale: PxScale,
}

impl GlyphRenderer {
    /// Renderer backed by the bundled DejaVu Sans Mono.
    ///
    /// # Errors
    /// Retourne une erreur si la police embarquée est illisible.
    pub fn bundled() -> Result<Self> {
        let font = FontArc::try_from_slice(BUNDLED_FONT).context("Police embarquée invalide")?;
        Ok(Self::with_font(font))
    }

    /// Renderer backed by a TTF/OTF file on disk.
    ///
    /// # Errors
    /// Retourne une erreur si le fichier est illisible ou n'est pas une police.
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)
            .with_context(|| format!("Impossible de lire la police {}", path.display()))?;
        let font = FontArc::try_from_vec(data)
            .with_context(|| format!("Police invalide : {}", path.display()))?;
        log::info!("Police de référence chargée depuis {}", path.display());
        Ok(Self::with_font(font))
    }

    /// Use `path` when given, otherwise the bundled font.
    ///
    /// # Errors
    /// Propagates [`GlyphRenderer::from_file`] and [`GlyphRenderer::bundled`] errors.
    pub fn from_optional_path(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Self::bundled(),
        }
    }

    fn with_font(font: FontArc) -> Self {
        // PxScale is expressed in ascent-descent height; rescale so that one
        // em spans EM_SIZE_PX.
        let height = font.height_unscaled();
        let units_per_em = font.units_per_em().unwrap_or(height);
        let scale = PxScale::from(EM_SIZE_PX * height / units_per_em);
        Self { font, scale }
    }

    /// Render `c` into a 16×16 bitmap.
    ///
    /// Characters absent from the font, and whitespace, give a blank bitmap.
    #[must_use]
    pub fn render(&self, c: char) -> GlyphBitmap {
        let mut bitmap = GlyphBitmap::blank();

        let gid = self.font.glyph_id(c);
        if gid.0 == 0 {
            return bitmap;
        }

        let x_offset = (EM_SIZE_PX * X_OFFSET_FACTOR).round();
        let baseline = (EM_SIZE_PX * Y_OFFSET_FACTOR).round();
        let glyph = gid.with_scale_and_position(self.scale, point(x_offset, baseline));

        if let Some(outline) = self.font.outline_glyph(glyph) {
            let bounds = outline.px_bounds();
            let (min_x, min_y) = (bounds.min.x as i32, bounds.min.y as i32);
            #[allow(clippy::cast_possible_wrap)]
            outline.draw(|x, y, v| {
                let px = x as i32 + min_x;
                let py = y as i32 + min_y;
                let side = GLYPH_RESOLUTION as i32;
                if v >= INK_THRESHOLD && (0..side).contains(&px) && (0..side).contains(&py) {
                    bitmap.cells[py as usize][px as usize] = true;
                }
            });
        }

        bitmap
    }
}

impl GlyphScorer for GlyphRenderer {
    fn score(&self, c: char) -> u32 {
        self.render(c).ink_count()
    }
}
