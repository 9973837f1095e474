use crate::frame::AsciiGrid;

/// Mesure la densité d'encre d'un caractère.
///
/// Implémenté par : `GlyphRenderer` (police vectorielle rasterisée).
/// Doit être pur : le même caractère donne toujours le même score.
///
/// # Example
/// ```
/// use ink_core::traits::GlyphScorer;
///
/// struct CodeScorer;
/// impl GlyphScorer for CodeScorer {
///     fn score(&self, c: char) -> u32 { c as u32 }
/// }
/// assert_eq!(CodeScorer.score('A'), 65);
/// ```
pub trait GlyphScorer: Send + Sync {
    /// Nombre de cellules « encre » du glyphe rendu.
    fn score(&self, c: char) -> u32;
}

impl<T: GlyphScorer + ?Sized> GlyphScorer for &T {
    fn score(&self, c: char) -> u32 {
        (**self).score(c)
    }
}

/// Écrit une grille ASCII finale vers une destination (console, fichier HTML).
///
/// # Example
/// ```
/// use ink_core::traits::AsciiOutput;
/// use ink_core::frame::AsciiGrid;
///
/// struct Discard;
/// impl AsciiOutput for Discard {
///     fn write_grid(&mut self, _grid: &AsciiGrid) -> anyhow::Result<()> { Ok(()) }
///     fn name(&self) -> &'static str { "discard" }
/// }
/// ```
pub trait AsciiOutput {
    /// Sérialise `grid` vers la destination.
    ///
    /// # Errors
    /// Returns an error if the destination cannot be written.
    fn write_grid(&mut self, grid: &AsciiGrid) -> anyhow::Result<()>;

    /// Nom lisible pour les logs.
    fn name(&self) -> &'static str;
}
