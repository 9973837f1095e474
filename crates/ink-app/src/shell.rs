use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use ink_ascii::palette::CharPalette;
use ink_ascii::render::convert;
use ink_core::charset::CharSelection;
use ink_core::config::{OutputMode, RenderConfig};
use ink_core::error::CoreError;
use ink_core::frame::{AsciiGrid, Image};
use ink_core::traits::{AsciiOutput, GlyphScorer};
use ink_export::{ConsoleOutput, HtmlOutput};

const PROMPT: &str = ">>> ";

const HELP: &str = "\
Commands:
  chars                 list the palette characters
  add <sel>             add characters (x, x-y, space, all)
  remove <sel>          remove characters (x, x-y, space, all)
  res up | res down     double or halve the column count
  image <path>          load another image
  output console|html   choose the output target
  asciiArt              render the current image
  help                  show this list
  exit                  leave";

/// Whether the read-eval loop keeps going after a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Column count limits for one image.
///
/// `min` keeps at least one full row of square tiles on the padded canvas,
/// `max` keeps each tile at least `min_pixels_per_char` wide. Both are powers
/// of two, so every power of two between them divides the canvas width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolutionBounds {
    pub min: u32,
    pub max: u32,
}

impl ResolutionBounds {
    /// Limits for `image` once padded to a power-of-two canvas.
    #[must_use]
    pub fn for_image(image: &Image, min_pixels_per_char: u32) -> Self {
        let width = image.width().next_power_of_two();
        let height = image.height().next_power_of_two();
        let min = (width / height).max(1);
        let max = prev_power_of_two(width / min_pixels_per_char.max(1)).max(min);
        Self { min, max }
    }

    /// Nearest usable column count: rounded down to a power of two, then
    /// clamped into the bounds.
    #[must_use]
    pub fn fit(self, columns: u32) -> u32 {
        prev_power_of_two(columns).clamp(self.min, self.max)
    }
}

/// Interactive session: current image, palette, resolution and output target.
///
/// All state lives here and is passed explicitly; the loop reads commands
/// from any `BufRead` and answers on any `Write`.
pub struct Shell<S> {
    palette: CharPalette<S>,
    image: Image,
    bounds: ResolutionBounds,
    columns: u32,
    output: OutputMode,
    config: RenderConfig,
}

impl<S: GlyphScorer> Shell<S> {
    pub fn new(image: Image, palette: CharPalette<S>, config: &RenderConfig) -> Self {
        let bounds = ResolutionBounds::for_image(&image, config.min_pixels_per_char);
        let columns = bounds.fit(config.columns);
        if columns != config.columns {
            log::warn!(
                "Colonnes {} inutilisables (bornes [{}, {}], puissance de deux), ramenées à {columns}",
                config.columns,
                bounds.min,
                bounds.max
            );
        }
        Self {
            palette,
            image,
            bounds,
            columns,
            output: config.output,
            config: config.clone(),
        }
    }

    #[must_use]
    pub fn columns(&self) -> u32 {
        self.columns
    }

    #[must_use]
    pub fn bounds(&self) -> ResolutionBounds {
        self.bounds
    }

    #[must_use]
    pub fn output(&self) -> OutputMode {
        self.output
    }

    #[must_use]
    pub fn palette(&self) -> &CharPalette<S> {
        &self.palette
    }

    /// Prompt, read one line, execute it, until `exit` or end of input.
    ///
    /// # Errors
    /// Only I/O failures on `input` or `out` end the loop with an error;
    /// bad commands are answered with a message.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<()> {
        let mut lines = input.lines();
        loop {
            write!(out, "{PROMPT}")?;
            out.flush()?;
            let Some(line) = lines.next() else {
                break;
            };
            let line = line.context("Lecture de la commande impossible")?;
            if self.execute(&line, out)? == Flow::Exit {
                break;
            }
        }
        Ok(())
    }

    /// Execute one command line.
    ///
    /// # Errors
    /// Returns an error only when writing to `out` fails.
    pub fn execute<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow> {
        let words: Vec<&str> = line.split_whitespace().collect();
        log::debug!("Commande : {words:?}");

        match words.as_slice() {
            ["exit"] => return Ok(Flow::Exit),
            ["chars"] => {
                let listed: Vec<String> = self
                    .palette
                    .characters()
                    .into_iter()
                    .map(String::from)
                    .collect();
                writeln!(out, "{}", listed.join(" "))?;
            }
            ["add", rest @ ..] => self.add(rest, out)?,
            ["remove", rest @ ..] => self.remove(rest, out)?,
            ["res", rest @ ..] => self.change_resolution(rest, out)?,
            ["image", path] => self.load_image(Path::new(path), out)?,
            ["output", rest @ ..] => self.change_output(rest, out)?,
            ["asciiArt"] => self.ascii_art(out)?,
            ["help"] => writeln!(out, "{HELP}")?,
            _ => writeln!(out, "Did not execute due to incorrect command.")?,
        }
        Ok(Flow::Continue)
    }

    fn add<W: Write>(&mut self, args: &[&str], out: &mut W) -> Result<()> {
        match parse_selection(args) {
            Some(sel) => self.palette.add_all(sel.chars()),
            None => writeln!(out, "Did not add due to incorrect format.")?,
        }
        Ok(())
    }

    fn remove<W: Write>(&mut self, args: &[&str], out: &mut W) -> Result<()> {
        match parse_selection(args) {
            Some(sel) => self.palette.remove_all(sel.chars()),
            None => writeln!(out, "Did not remove due to incorrect format.")?,
        }
        Ok(())
    }

    fn change_resolution<W: Write>(&mut self, args: &[&str], out: &mut W) -> Result<()> {
        let next = match args {
            ["up"] => self.columns.checked_mul(2),
            ["down"] => Some(self.columns / 2),
            _ => {
                writeln!(out, "Did not change resolution due to incorrect format.")?;
                return Ok(());
            }
        };
        match next {
            Some(columns) if (self.bounds.min..=self.bounds.max).contains(&columns) => {
                self.columns = columns;
                writeln!(out, "Resolution set to {columns}.")?;
            }
            _ => writeln!(out, "Did not change resolution due to exceeding boundaries.")?,
        }
        Ok(())
    }

    fn load_image<W: Write>(&mut self, path: &Path, out: &mut W) -> Result<()> {
        match ink_source::image::load_image(path) {
            Ok(image) => {
                self.bounds = ResolutionBounds::for_image(&image, self.config.min_pixels_per_char);
                self.columns = self.bounds.fit(self.columns);
                self.image = image;
                log::info!(
                    "Image chargée : {} (colonnes {}, bornes [{}, {}])",
                    path.display(),
                    self.columns,
                    self.bounds.min,
                    self.bounds.max
                );
            }
            Err(e) => {
                log::warn!("{e:#}");
                writeln!(out, "Did not execute due to problem with image file.")?;
            }
        }
        Ok(())
    }

    fn change_output<W: Write>(&mut self, args: &[&str], out: &mut W) -> Result<()> {
        match args {
            [mode] => match mode.parse::<OutputMode>() {
                Ok(mode) => self.output = mode,
                Err(_) => {
                    writeln!(out, "Did not change output method due to incorrect format.")?;
                }
            },
            _ => writeln!(out, "Did not change output method due to incorrect format.")?,
        }
        Ok(())
    }

    fn ascii_art<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let grid = match convert(&self.image, self.columns, &self.palette) {
            Ok(grid) => grid,
            Err(CoreError::EmptyPalette) => {
                writeln!(out, "Did not execute. Charset is empty.")?;
                return Ok(());
            }
            Err(e) => {
                log::warn!("{e}");
                writeln!(out, "Did not execute: {e}")?;
                return Ok(());
            }
        };

        let written = match self.output {
            OutputMode::Console => emit(
                &mut ConsoleOutput::new(&mut *out, self.config.console_spacing),
                &grid,
            ),
            OutputMode::Html => emit(
                &mut HtmlOutput::new(self.config.html_path.clone(), self.config.html_font.as_str()),
                &grid,
            ),
        };
        if let Err(e) = written {
            log::error!("{e:#}");
            writeln!(out, "Did not execute: {e:#}")?;
        }
        Ok(())
    }
}

fn emit(output: &mut dyn AsciiOutput, grid: &AsciiGrid) -> Result<()> {
    output
        .write_grid(grid)
        .with_context(|| format!("Sortie {} en échec", output.name()))?;
    log::info!("Grille {}×{} écrite ({})", grid.width, grid.height, output.name());
    Ok(())
}

/// Largest power of two `<= n`, or 1 for 0.
fn prev_power_of_two(n: u32) -> u32 {
    if n == 0 { 1 } else { 1 << (31 - n.leading_zeros()) }
}

fn parse_selection(args: &[&str]) -> Option<CharSelection> {
    match args {
        [token] => CharSelection::parse(token),
        _ => None,
    }
}
