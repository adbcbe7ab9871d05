pub mod formatter;
pub mod sink;

pub use formatter::{format_colored, format_plain_text, format_plain_text_at, format_uncolored};
pub use sink::{persist, ReportSink};
