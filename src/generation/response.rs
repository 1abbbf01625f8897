//! Decoding and validation of the backend's quiz JSON.

use crate::error::QuizError;
use crate::models::{QuestionType, QuizRequestConfig, QuizSet};

const CODE_FENCE: &str = "```";
const TRUE_FALSE_OPTION_COUNT: usize = 2;

/// Remove code-fence markers and an optional language tag around the payload.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix(CODE_FENCE) {
        text = rest;
        let tag_len = text
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(text.len());
        text = &text[tag_len..];
    }
    if let Some(rest) = text.trim_end().strip_suffix(CODE_FENCE) {
        text = rest;
    }

    text.trim()
}

/// Decode the backend output into a validated quiz.
///
/// Rejects questions whose correct answer is not one of their options, and
/// true/false questions that do not have exactly two options. A question count
/// different from the requested one is only logged.
pub fn parse_quiz_response(raw: &str, config: &QuizRequestConfig) -> Result<QuizSet, QuizError> {
    let payload = strip_code_fences(raw);

    let quiz: QuizSet = serde_json::from_str(payload).map_err(|e| {
        tracing::warn!(error = %e, "Quiz response is not valid quiz JSON");
        QuizError::MalformedResponse(e.to_string())
    })?;

    validate(&quiz, config.question_type)?;

    if quiz.len() != config.question_count {
        tracing::warn!(
            requested = config.question_count,
            received = quiz.len(),
            "Backend returned a different number of questions than requested"
        );
    }

    Ok(quiz)
}

fn validate(quiz: &QuizSet, question_type: QuestionType) -> Result<(), QuizError> {
    if quiz.is_empty() {
        return Err(QuizError::MalformedResponse(
            "response contains no questions".to_string(),
        ));
    }

    for (i, question) in quiz.questions.iter().enumerate() {
        let number = i + 1;

        if question.prompt.trim().is_empty() {
            return Err(QuizError::MalformedResponse(format!(
                "question {} has no text",
                number
            )));
        }

        if question.options.len() < TRUE_FALSE_OPTION_COUNT {
            return Err(QuizError::MalformedResponse(format!(
                "question {} has fewer than two options",
                number
            )));
        }

        if question_type == QuestionType::TrueFalse
            && question.options.len() != TRUE_FALSE_OPTION_COUNT
        {
            return Err(QuizError::MalformedResponse(format!(
                "true/false question {} has {} options",
                number,
                question.options.len()
            )));
        }

        if !question.options.contains(&question.correct_answer) {
            return Err(QuizError::MalformedResponse(format!(
                "question {} has correct answer '{}' which is not one of its options",
                number, question.correct_answer
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Question;

    fn mcq(count: usize) -> QuizRequestConfig {
        QuizRequestConfig {
            question_count: count,
            question_type: QuestionType::MultipleChoice,
        }
    }

    fn question(n: usize) -> Question {
        Question {
            prompt: format!("Question {}?", n),
            options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
            correct_answer: "B".into(),
        }
    }

    #[test]
    fn test_fenced_response_with_language_tag() {
        let quiz = QuizSet {
            questions: (1..=3).map(question).collect(),
        };
        let raw = format!("```json {}```", serde_json::to_string(&quiz).unwrap());

        let parsed = parse_quiz_response(&raw, &mcq(3)).unwrap();
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed, quiz);
    }

    #[test]
    fn test_encoded_quiz_decodes_to_equal_set() {
        let quiz = QuizSet {
            questions: vec![
                question(1),
                Question {
                    prompt: "Rust has a garbage collector.".into(),
                    options: vec!["True".into(), "False".into()],
                    correct_answer: "False".into(),
                },
            ],
        };
        let pretty = serde_json::to_string_pretty(&quiz).unwrap();

        assert_eq!(parse_quiz_response(&pretty, &mcq(2)).unwrap(), quiz);
        assert_eq!(
            parse_quiz_response(&format!("```\n{}\n```\n", pretty), &mcq(2)).unwrap(),
            quiz
        );
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("  {}  "), "{}");
        assert_eq!(strip_code_fences("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("```JSON{}```"), "{}");
        assert_eq!(strip_code_fences("```{\"a\":1}```"), "{\"a\":1}");
    }

    #[test]
    fn test_rejects_non_json() {
        assert!(matches!(
            parse_quiz_response("Sure! Here is your quiz.", &mcq(5)),
            Err(QuizError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_rejects_missing_questions_array() {
        assert!(matches!(
            parse_quiz_response(r#"{"items": []}"#, &mcq(5)),
            Err(QuizError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_quiz_response(r#"{"questions": []}"#, &mcq(5)),
            Err(QuizError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_rejects_answer_outside_options() {
        let raw = r#"{"questions":[{"question":"Q?","options":["A","B","C","D"],"correctAnswer":"Option B"}]}"#;
        assert!(matches!(
            parse_quiz_response(raw, &mcq(1)),
            Err(QuizError::MalformedResponse(msg)) if msg.contains("Option B")
        ));
    }

    #[test]
    fn test_true_false_needs_two_options() {
        let config = QuizRequestConfig {
            question_count: 1,
            question_type: QuestionType::TrueFalse,
        };
        let raw = r#"{"questions":[{"question":"Q?","options":["True","False","Maybe"],"correctAnswer":"True"}]}"#;
        assert!(matches!(
            parse_quiz_response(raw, &config),
            Err(QuizError::MalformedResponse(_))
        ));

        let raw = r#"{"questions":[{"question":"Q?","options":["True","False"],"correctAnswer":"True"}]}"#;
        assert_eq!(parse_quiz_response(raw, &config).unwrap().len(), 1);
    }

    #[test]
    fn test_count_mismatch_is_tolerated() {
        let quiz = QuizSet {
            questions: (1..=4).map(question).collect(),
        };
        let raw = serde_json::to_string(&quiz).unwrap();
        assert_eq!(parse_quiz_response(&raw, &mcq(5)).unwrap().len(), 4);
    }
}
