pub mod html;
pub mod json;
pub mod text;
pub mod traits;
pub mod writer;

pub use html::HtmlFormatter;
pub use json::JsonFormatter;
pub use text::TextFormatter;
pub use traits::{OutputError, ReportFormatter};
pub use writer::ReportWriter;
