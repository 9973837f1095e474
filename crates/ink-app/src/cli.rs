use std::path::PathBuf;

use clap::Parser;
use ink_core::config::{OutputMode, RenderConfig};

/// inkascii — convertit une image en art ASCII par densité d'encre des glyphes.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Image source (PNG, JPEG, BMP, GIF).
    pub image: PathBuf,

    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Nombre de colonnes initial.
    #[arg(long)]
    pub columns: Option<u32>,

    /// Palette initiale, ex. " .:-=+*#%@".
    #[arg(long)]
    pub charset: Option<String>,

    /// Écrire sur la console plutôt qu'en HTML.
    #[arg(long, default_value_t = false)]
    pub console: bool,

    /// Police TTF/OTF de référence pour le calcul des densités.
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Rendre une seule fois puis quitter, sans shell interactif.
    #[arg(long, default_value_t = false)]
    pub once: bool,

    /// Niveau de log : off, error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: log::LevelFilter,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply_overrides(&self, config: &mut RenderConfig) {
        if let Some(columns) = self.columns {
            config.columns = columns;
        }
        if let Some(ref charset) = self.charset {
            config.charset.clone_from(charset);
        }
        if self.console {
            config.output = OutputMode::Console;
        }
        if let Some(ref font) = self.font {
            config.font_path = Some(font.clone());
        }
        config.clamp_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_config_values() {
        let cli = Cli::parse_from([
            "inkascii",
            "board.png",
            "--columns",
            "64",
            "--charset",
            "ab",
            "--console",
        ]);
        let mut config = RenderConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.columns, 64);
        assert_eq!(config.charset, "ab");
        assert_eq!(config.output, OutputMode::Console);
        assert_eq!(config.font_path, None);
    }

    #[test]
    fn defaults_leave_config_untouched() {
        let cli = Cli::parse_from(["inkascii", "board.png"]);
        let mut config = RenderConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config, RenderConfig::default());
        assert_eq!(cli.config, PathBuf::from("config/default.toml"));
        assert!(!cli.once);
    }

    #[test]
    fn log_level_is_validated() {
        let cli = Cli::parse_from(["inkascii", "board.png", "--log-level", "debug"]);
        assert_eq!(cli.log_level, log::LevelFilter::Debug);
        assert_eq!(
            Cli::parse_from(["inkascii", "board.png"]).log_level,
            log::LevelFilter::Warn
        );
        assert!(Cli::try_parse_from(["inkascii", "board.png", "--log-level", "loud"]).is_err());
    }

    #[test]
    fn image_argument_is_required() {
        assert!(Cli::try_parse_from(["inkascii"]).is_err());
    }
}
