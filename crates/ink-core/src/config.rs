use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Configuration complète du rendu.
///
/// Sérialisable en TOML. Chaque champ a une valeur par défaut saine.
///
/// # Example
/// ```
/// use ink_core::config::RenderConfig;
/// let config = RenderConfig::default();
/// assert_eq!(config.columns, 128);
/// assert_eq!(config.charset, "0123456789");
/// ```
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct RenderConfig {
    // === Conversion ===
    /// Palette initiale (l'ordre n'a pas d'importance).
    pub charset: String,
    /// Nombre de colonnes de sortie au démarrage.
    pub columns: u32,
    /// Largeur minimale d'une tuile, en pixels. Borne haute de la résolution.
    pub min_pixels_per_char: u32,

    // === Sortie ===
    /// Writer actif au démarrage.
    pub output: OutputMode,
    /// Fichier HTML produit par le writer HTML.
    pub html_path: PathBuf,
    /// Famille de police déclarée dans le HTML.
    pub html_font: String,
    /// Ajoute un espace après chaque caractère en console.
    pub console_spacing: bool,

    // === Glyphes ===
    /// Police TTF/OTF de référence. `None` = police embarquée.
    pub font_path: Option<PathBuf>,
}

/// Output writer selection.
///
/// # Example
/// ```
/// use ink_core::config::OutputMode;
/// assert_eq!(OutputMode::default(), OutputMode::Html);
/// assert_eq!("console".parse::<OutputMode>(), Ok(OutputMode::Console));
/// ```
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Print rows to the terminal.
    Console,
    /// Write a standalone HTML document.
    #[default]
    Html,
}

impl std::str::FromStr for OutputMode {
    type Err = crate::error::CoreError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "console" => Ok(Self::Console),
            "html" => Ok(Self::Html),
            other => Err(crate::error::CoreError::Config(format!(
                "mode de sortie inconnu '{other}'"
            ))),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            charset: crate::charset::CHARSET_DIGITS.to_string(),
            columns: 128,
            min_pixels_per_char: 2,
            output: OutputMode::Html,
            html_path: PathBuf::from("out.html"),
            html_font: "Courier New".to_string(),
            console_spacing: true,
            font_path: None,
        }
    }
}

impl RenderConfig {
    /// Clamp all numeric fields to their valid ranges.
    /// Called after TOML deserialization to prevent out-of-range values.
    pub fn clamp_all(&mut self) {
        self.columns = self.columns.clamp(1, 1 << 15);
        self.min_pixels_per_char = self.min_pixels_per_char.clamp(1, 64);
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    render: Option<RenderSection>,
    output: Option<OutputSection>,
    glyph: Option<GlyphSection>,
}

/// Render section of the TOML config, all fields optional for partial override.
#[derive(Deserialize)]
struct RenderSection {
    charset: Option<String>,
    columns: Option<u32>,
    min_pixels_per_char: Option<u32>,
}

/// Output section of the TOML config, all fields optional.
#[derive(Deserialize)]
struct OutputSection {
    mode: Option<OutputMode>,
    html_path: Option<PathBuf>,
    html_font: Option<String>,
    console_spacing: Option<bool>,
}

#[derive(Deserialize)]
struct GlyphSection {
    font_path: Option<PathBuf>,
}

/// Parse TOML text and merge it over the defaults.
///
/// # Errors
/// Returns an error if the text is not valid TOML for this schema.
///
/// # Example
/// ```
/// use ink_core::config::parse_config;
/// let config = parse_config("[render]\ncolumns = 64\n").unwrap();
/// assert_eq!(config.columns, 64);
/// ```
pub fn parse_config(content: &str) -> Result<RenderConfig> {
    let file: ConfigFile = toml::from_str(content).context("Erreur de parsing TOML")?;

    let mut config = RenderConfig::default();

    if let Some(r) = file.render {
        if let Some(v) = r.charset {
            config.charset = v;
        }
        if let Some(v) = r.columns {
            config.columns = v;
        }
        if let Some(v) = r.min_pixels_per_char {
            config.min_pixels_per_char = v;
        }
    }

    if let Some(o) = file.output {
        if let Some(v) = o.mode {
            config.output = v;
        }
        if let Some(v) = o.html_path {
            config.html_path = v;
        }
        if let Some(v) = o.html_font {
            config.html_font = v;
        }
        if let Some(v) = o.console_spacing {
            config.console_spacing = v;
        }
    }

    if let Some(g) = file.glyph {
        config.font_path = g.font_path;
    }

    if config.charset.is_empty() {
        log::warn!("Charset vide dans la configuration : aucun rendu possible avant 'add'.");
    }

    config.clamp_all();
    Ok(config)
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use ink_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<RenderConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Configuration invalide dans {}", path.display()))
}
