use std::fmt;

use serde::{Deserialize, Serialize};

/// A single quiz question as produced by the generative backend.
///
/// `correct_answer` is expected to literally match one entry of `options`;
/// the response parser rejects questions where it does not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(rename = "question")]
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

impl Question {
    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct_answer == answer
    }
}

/// The ordered questions of one generation attempt.
///
/// Serializes to the same `{"questions": [...]}` shape the backend is asked
/// to return.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuizSet {
    pub questions: Vec<Question>,
}

impl QuizSet {
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuestionType {
    #[default]
    MultipleChoice,
    TrueFalse,
}

impl QuestionType {
    /// Label used inside the generation prompt.
    pub fn prompt_label(self) -> &'static str {
        match self {
            Self::MultipleChoice => "multiple-choice",
            Self::TrueFalse => "true/false",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::MultipleChoice => Self::TrueFalse,
            Self::TrueFalse => Self::MultipleChoice,
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MultipleChoice => write!(f, "Multiple Choice"),
            Self::TrueFalse => write!(f, "True/False"),
        }
    }
}

/// Negotiated question count and type for one generation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizRequestConfig {
    pub question_count: usize,
    pub question_type: QuestionType,
}

/// User choices made before generation; unset fields fall back to defaults
/// derived from the page's word count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuizOverrides {
    pub question_count: Option<usize>,
    pub question_type: Option<QuestionType>,
}

/// The user's response to one question, recorded once at submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRecord {
    pub question_index: usize,
    pub question_text: String,
    pub selected_answer: Option<String>,
    pub correct_answer: String,
}

impl AnswerRecord {
    pub fn is_correct(&self) -> bool {
        self.selected_answer.as_deref() == Some(self.correct_answer.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_uses_backend_field_names() {
        let question = Question {
            prompt: "Is Rust memory safe?".to_string(),
            options: vec!["True".to_string(), "False".to_string()],
            correct_answer: "True".to_string(),
        };
        let json = serde_json::to_string(&question).unwrap();
        assert!(json.contains("\"question\":\"Is Rust memory safe?\""));
        assert!(json.contains("\"correctAnswer\":\"True\""));
    }

    #[test]
    fn test_unanswered_record_is_incorrect() {
        let record = AnswerRecord {
            question_index: 0,
            question_text: "q".to_string(),
            selected_answer: None,
            correct_answer: "a".to_string(),
        };
        assert!(!record.is_correct());
    }
}
