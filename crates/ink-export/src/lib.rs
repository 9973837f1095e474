/// Writers for finished ASCII grids: terminal and standalone HTML.

pub mod console;
pub mod html;

pub use console::ConsoleOutput;
pub use html::HtmlOutput;
