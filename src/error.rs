//! Error type shared by the quiz pipeline and the terminal host.
//!
//! The `Display` text of each variant is what the Setup screen shows.

use std::io;

use thiserror::Error;

use crate::generation::MIN_WORD_COUNT;

#[derive(Debug, Error)]
pub enum QuizError {
    /// The page reference does not contain a `pages/<digits>` segment.
    #[error("Error: Page Id is missing from '{0}'")]
    ContentUnavailable(String),

    /// The document store could not be reached or answered with an error.
    #[error("Error extracting content: {0}")]
    ContentFetch(String),

    #[error("Minimum {min} words required to generate a quiz.", min = MIN_WORD_COUNT)]
    InsufficientContent { word_count: usize },

    /// The generative backend failed or answered with a non-success status.
    #[error("Error generating quiz: {0}")]
    Generation(String),

    #[error("Error parsing quiz JSON: {0}")]
    MalformedResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
