/// Renders reports, chains and cycles as text, Markdown or JSON.
pub mod formatter;

pub use formatter::{
    format_chain_as_markdown, format_cycles_as_markdown, format_report_as_json,
    format_report_as_text,
};
