/// Unprocessed page markup together with the reference it was fetched for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    pub source_id: String,
    pub markup: String,
}

/// Plain text of a page and its whitespace-token word count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedContent {
    pub text: String,
    pub word_count: usize,
}

impl ExtractedContent {
    pub fn new(text: String) -> Self {
        let word_count = text.split_whitespace().count();
        Self { text, word_count }
    }
}
