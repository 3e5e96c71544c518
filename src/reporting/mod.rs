pub mod json;
pub mod terminal;

pub use json::JsonReportGenerator;
pub use terminal::TerminalRenderer;
