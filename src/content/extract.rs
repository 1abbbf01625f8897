//! Markup to plain text conversion.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::models::{ExtractedContent, RawDocument};

const PARAGRAPH_SEPARATOR: &str = "\n";

static PARAGRAPH_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</p\s*>|\n\s*\n").expect("valid paragraph regex"));
static SUPERSCRIPT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<sup\b[^>]*>.*?</sup\s*>").expect("valid superscript regex"));
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(nbsp|amp|quot|lt|gt);").expect("valid entity regex"));

/// Convert a raw document into plain text plus its word count.
pub fn extract(document: &RawDocument) -> ExtractedContent {
    ExtractedContent::new(extract_text(&document.markup))
}

/// Plain text rendering of storage-format markup.
///
/// Entities are decoded in a single pass after every tag is gone, so an
/// encoded `&lt;p&gt;` survives as literal text and `&amp;lt;` decodes to
/// `&lt;` rather than `<`.
pub fn extract_text(markup: &str) -> String {
    let normalized = normalize_paragraphs(markup);
    let without_footnotes = SUPERSCRIPT.replace_all(&normalized, "");
    let without_tags = TAG.replace_all(&without_footnotes, "");
    decode_entities(&without_tags).trim().to_string()
}

fn normalize_paragraphs(markup: &str) -> String {
    PARAGRAPH_BOUNDARY
        .split(markup)
        .filter(|fragment| !fragment.trim().is_empty())
        .collect::<Vec<_>>()
        .join(PARAGRAPH_SEPARATOR)
}

fn decode_entities(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &Captures| match &caps[1] {
            "nbsp" => " ",
            "amp" => "&",
            "quot" => "\"",
            "lt" => "<",
            _ => ">",
        })
        .into_owned()
}
