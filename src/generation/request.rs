//! Question count defaults and prompt construction.
//!
//! Everything here is pure: no I/O, same output for the same inputs.

use crate::error::QuizError;
use crate::models::{ExtractedContent, QuestionType, QuizOverrides, QuizRequestConfig};

/// Pages shorter than this cannot be turned into a quiz.
pub const MIN_WORD_COUNT: usize = 250;

const MEDIUM_WORD_COUNT: usize = 500;
const LONG_WORD_COUNT: usize = 1000;

const SHORT_QUESTION_COUNT: usize = 5;
const MEDIUM_QUESTION_COUNT: usize = 10;
const LONG_QUESTION_COUNT: usize = 15;

/// Finalized configuration plus the prompt to send to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizRequest {
    pub config: QuizRequestConfig,
    pub prompt: String,
}

/// Choices offered to the user before generating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomizationOptions {
    pub word_count: usize,
    /// Question counts the page is long enough for, ascending.
    pub allowed_counts: Vec<usize>,
    pub defaults: QuizRequestConfig,
}

impl CustomizationOptions {
    pub fn allows(&self, question_count: usize) -> bool {
        self.allowed_counts.contains(&question_count)
    }

    /// The allowed count after `current`, wrapping around.
    pub fn next_count(&self, current: usize) -> usize {
        let position = self.allowed_counts.iter().position(|&c| c == current);
        match position {
            Some(i) => self.allowed_counts[(i + 1) % self.allowed_counts.len()],
            None => self.defaults.question_count,
        }
    }

    /// The allowed count before `current`, wrapping around.
    pub fn previous_count(&self, current: usize) -> usize {
        let len = self.allowed_counts.len();
        let position = self.allowed_counts.iter().position(|&c| c == current);
        match position {
            Some(i) => self.allowed_counts[(i + len - 1) % len],
            None => self.defaults.question_count,
        }
    }
}

fn ensure_enough_words(content: &ExtractedContent) -> Result<(), QuizError> {
    if content.word_count < MIN_WORD_COUNT {
        return Err(QuizError::InsufficientContent {
            word_count: content.word_count,
        });
    }
    Ok(())
}

/// Default question count for a page of `word_count` words.
pub fn default_question_count(word_count: usize) -> usize {
    if word_count >= LONG_WORD_COUNT {
        LONG_QUESTION_COUNT
    } else if word_count >= MEDIUM_WORD_COUNT {
        MEDIUM_QUESTION_COUNT
    } else {
        SHORT_QUESTION_COUNT
    }
}

pub fn default_config(word_count: usize) -> QuizRequestConfig {
    QuizRequestConfig {
        question_count: default_question_count(word_count),
        question_type: QuestionType::default(),
    }
}

pub fn customization_options(content: &ExtractedContent) -> Result<CustomizationOptions, QuizError> {
    ensure_enough_words(content)?;

    let allowed_counts = [
        (0, SHORT_QUESTION_COUNT),
        (MEDIUM_WORD_COUNT, MEDIUM_QUESTION_COUNT),
        (LONG_WORD_COUNT, LONG_QUESTION_COUNT),
    ]
    .into_iter()
    .filter(|(min_words, _)| content.word_count >= *min_words)
    .map(|(_, count)| count)
    .collect();

    Ok(CustomizationOptions {
        word_count: content.word_count,
        allowed_counts,
        defaults: default_config(content.word_count),
    })
}

/// Resolve the configuration for one attempt and build its prompt.
///
/// Supplied override fields are used verbatim; unset fields are derived from
/// the word count.
pub fn build_request(
    content: &ExtractedContent,
    overrides: QuizOverrides,
) -> Result<QuizRequest, QuizError> {
    ensure_enough_words(content)?;

    let defaults = default_config(content.word_count);
    let question_count = overrides.question_count.unwrap_or(defaults.question_count);
    if question_count == 0 {
        return Err(QuizError::Config(
            "question count must be greater than zero".to_string(),
        ));
    }

    let config = QuizRequestConfig {
        question_count,
        question_type: overrides.question_type.unwrap_or(defaults.question_type),
    };

    tracing::debug!(
        word_count = content.word_count,
        question_count = config.question_count,
        question_type = %config.question_type,
        "Built quiz request"
    );

    Ok(QuizRequest {
        prompt: build_prompt(&config, &content.text),
        config,
    })
}

fn build_prompt(config: &QuizRequestConfig, text: &str) -> String {
    let example_options = match config.question_type {
        QuestionType::MultipleChoice => r#"["Option A", "Option B", "Option C", "Option D"]"#,
        QuestionType::TrueFalse => r#"["True", "False"]"#,
    };
    let example_answer = match config.question_type {
        QuestionType::MultipleChoice => "Option B",
        QuestionType::TrueFalse => "True",
    };

    format!(
        r#"Generate {count} well-crafted and meaningful {label} quiz questions in JSON format:

{{
  "questions": [
    {{
      "question": "Question text here",
      "options": {options},
      "correctAnswer": "{answer}"
    }}
  ]
}}

The "correctAnswer" value must be copied exactly from the "options" list.
Please return the JSON structure directly without code block formatting, backticks, or any additional text.
The quiz should be based on the following content: {text}"#,
        count = config.question_count,
        label = config.question_type.prompt_label(),
        options = example_options,
        answer = example_answer,
        text = text,
    )
}
