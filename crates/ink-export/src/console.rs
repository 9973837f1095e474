use std::io::Write;

use anyhow::{Context, Result};
use ink_core::frame::AsciiGrid;
use ink_core::traits::AsciiOutput;

/// Écrit la grille ligne par ligne sur un flux texte.
///
/// Avec `spacing`, chaque caractère est suivi d'un espace pour compenser
/// les cellules de terminal deux fois plus hautes que larges.
///
/// # Example
/// ```
/// use ink_core::frame::AsciiGrid;
/// use ink_core::traits::AsciiOutput;
/// use ink_export::ConsoleOutput;
///
/// let mut grid = AsciiGrid::new(2, 1);
/// grid.set(0, 0, '#');
/// let mut buf = Vec::new();
/// ConsoleOutput::new(&mut buf, false).write_grid(&grid).unwrap();
/// assert_eq!(buf, b"# \n");
/// ```
pub struct ConsoleOutput<W: Write> {
    writer: W,
    spacing: bool,
}

impl<W: Write> ConsoleOutput<W> {
    /// Wrap a writer.
    pub fn new(writer: W, spacing: bool) -> Self {
        Self { writer, spacing }
    }

    /// Give back the wrapped writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> AsciiOutput for ConsoleOutput<W> {
    fn write_grid(&mut self, grid: &AsciiGrid) -> Result<()> {
        let mut line = String::with_capacity(grid.width as usize * 2 + 1);
        for row in grid.rows() {
            line.clear();
            for &ch in row {
                line.push(ch);
                if self.spacing {
                    line.push(' ');
                }
            }
            line.push('\n');
            self.writer
                .write_all(line.as_bytes())
                .context("Écriture console impossible")?;
        }
        self.writer.flush().context("Écriture console impossible")?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "console"
    }
}
