//! Page content: fetching raw markup and turning it into plain text.

mod extract;
mod source;

pub use extract::{extract, extract_text};
pub use source::{ConfluenceSource, DocumentSource, parse_page_id};
