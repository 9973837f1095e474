use thiserror::Error;

/// Errors originating from the core pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A match or render was attempted against a palette with no characters.
    #[error("Palette vide : aucun caractère disponible pour le rendu")]
    EmptyPalette,

    /// The requested column count cannot tile the padded canvas.
    #[error("Résolution invalide : {columns} colonnes pour un canevas {canvas_width}×{canvas_height}")]
    InvalidResolution {
        /// Requested column count.
        columns: u32,
        /// Width of the power-of-two canvas.
        canvas_width: u32,
        /// Height of the power-of-two canvas.
        canvas_height: u32,
    },

    /// Invalid width/height dimensions.
    #[error("Dimensions invalides : {width}×{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// Invalid configuration value or structure.
    #[error("Configuration invalide : {0}")]
    Config(String),
}
