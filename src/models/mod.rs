mod content;
mod question;

pub use content::{ExtractedContent, RawDocument};
pub use question::{
    AnswerRecord, Question, QuestionType, QuizOverrides, QuizRequestConfig, QuizSet,
};
