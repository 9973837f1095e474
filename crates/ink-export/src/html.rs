use std::path::PathBuf;

use anyhow::{Context, Result};
use ink_core::frame::AsciiGrid;
use ink_core::traits::AsciiOutput;

/// Interligne, en em.
const BASE_LINE_SPACING: f64 = 0.8;
/// Taille de police totale répartie sur la largeur de la grille, en rem.
const BASE_FONT_SIZE: f64 = 150.0;

/// Writes the grid as a standalone HTML document.
///
/// # Example
/// ```no_run
/// use ink_core::frame::AsciiGrid;
/// use ink_core::traits::AsciiOutput;
/// use ink_export::HtmlOutput;
///
/// let mut out = HtmlOutput::new("out.html", "Courier New");
/// out.write_grid(&AsciiGrid::new(4, 2)).unwrap();
/// ```
pub struct HtmlOutput {
    path: PathBuf,
    font_name: String,
}

impl HtmlOutput {
    /// Writer targeting `path`, declaring `font_name` as the font family.
    pub fn new(path: impl Into<PathBuf>, font_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            font_name: font_name.into(),
        }
    }
}

impl AsciiOutput for HtmlOutput {
    fn write_grid(&mut self, grid: &AsciiGrid) -> Result<()> {
        let document = render_document(grid, &self.font_name);
        std::fs::write(&self.path, document)
            .with_context(|| format!("Impossible d'écrire {}", self.path.display()))?;
        log::info!("HTML écrit : {}", self.path.display());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "html"
    }
}

/// Build the full HTML text for `grid`.
///
/// # Example
/// ```
/// use ink_core::frame::AsciiGrid;
/// use ink_export::html::render_document;
/// let mut grid = AsciiGrid::new(1, 1);
/// grid.set(0, 0, '<');
/// assert!(render_document(&grid, "monospace").contains("&lt;\n"));
/// ```
#[must_use]
pub fn render_document(grid: &AsciiGrid, font_name: &str) -> String {
    let font_size = BASE_FONT_SIZE / f64::from(grid.width.max(1));
    let mut html = String::with_capacity(grid.cells.len() * 2 + 512);

    html.push_str("<!DOCTYPE html>\n<html>\n");
    html.push_str("<body style=\"color:#000000; text-align:center; font-size:1px;\">\n");
    html.push_str(&format!(
        "<p style=\"white-space:pre; font-family:{}; font-size:{font_size:.6}rem; \
         letter-spacing:0.15em; line-height:{BASE_LINE_SPACING:.6}em;\">\n",
        escape_attr(font_name)
    ));

    for row in grid.rows() {
        for &ch in row {
            match ch {
                '<' => html.push_str("&lt;"),
                '>' => html.push_str("&gt;"),
                '&' => html.push_str("&amp;"),
                _ => html.push(ch),
            }
        }
        html.push('\n');
    }

    html.push_str("</p>\n</body>\n</html>\n");
    html
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}
