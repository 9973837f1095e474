use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use ink_ascii::palette::CharPalette;
use ink_core::config::RenderConfig;
use ink_glyph::GlyphRenderer;

pub mod cli;
pub mod shell;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level)
        .init();

    // 3. Charger la config, puis les overrides CLI
    let mut config = resolve_config(&cli)?;
    cli.apply_overrides(&mut config);
    log::debug!("Configuration : {config:?}");

    // 4. Image de départ (fatale si illisible)
    let image = ink_source::image::load_image(&cli.image)?;

    // 5. Police de référence et palette
    let renderer = GlyphRenderer::from_optional_path(config.font_path.as_deref())?;
    let palette = CharPalette::new(renderer, config.charset.chars());
    log::info!("Palette initiale : {} caractères", palette.len());

    let mut session = shell::Shell::new(image, palette, &config);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    // 6. Rendu unique ou shell interactif
    if cli.once {
        session.execute("asciiArt", &mut out)?;
        out.flush().context("Écriture console impossible")?;
        return Ok(());
    }
    session.run(std::io::stdin().lock(), &mut out)
}

/// Resolve config: a missing file falls back to the defaults.
fn resolve_config(cli: &cli::Cli) -> Result<RenderConfig> {
    if cli.config.exists() {
        ink_core::config::load_config(&cli.config)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        Ok(RenderConfig::default())
    }
}
