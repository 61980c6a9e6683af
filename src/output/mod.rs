//! Reports and renderers

pub mod formatter;
pub mod report;

pub use formatter::{ChatRenderer, ConsoleFormatter, JsonFormatter, OutputFormatter};
pub use report::FinalReport;
