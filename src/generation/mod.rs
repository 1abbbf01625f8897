//! Content-to-quiz pipeline.
//!
//! One generation attempt has two suspension points: fetching the page and
//! calling the generative backend. A failure at either one ends the attempt.

mod backend;
mod request;
mod response;

use std::sync::Arc;

pub use backend::{GeminiBackend, GenerativeBackend};
pub use request::{
    CustomizationOptions, MIN_WORD_COUNT, QuizRequest, build_request, customization_options,
    default_config, default_question_count,
};
pub use response::{parse_quiz_response, strip_code_fences};

use crate::content::{self, DocumentSource};
use crate::error::QuizError;
use crate::models::{ExtractedContent, QuizOverrides, QuizRequestConfig, QuizSet};

/// A quiz together with the configuration it was requested with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedQuiz {
    pub config: QuizRequestConfig,
    pub quiz: QuizSet,
}

#[derive(Clone)]
pub struct QuizGenerator {
    source: Arc<dyn DocumentSource>,
    backend: Arc<dyn GenerativeBackend>,
}

impl QuizGenerator {
    pub fn new(source: Arc<dyn DocumentSource>, backend: Arc<dyn GenerativeBackend>) -> Self {
        Self { source, backend }
    }

    async fn load_content(&self, page_ref: &str) -> Result<ExtractedContent, QuizError> {
        let document = self.source.fetch(page_ref).await?;
        let content = content::extract(&document);
        tracing::info!(
            page_id = %document.source_id,
            word_count = content.word_count,
            "Extracted page content"
        );
        Ok(content)
    }

    /// Word count and question choices for the page.
    pub async fn customization_options(
        &self,
        page_ref: &str,
    ) -> Result<CustomizationOptions, QuizError> {
        let content = self.load_content(page_ref).await?;
        customization_options(&content)
    }

    /// Fetch the page, ask the backend for questions and validate the answer.
    pub async fn generate(
        &self,
        page_ref: &str,
        overrides: QuizOverrides,
    ) -> Result<GeneratedQuiz, QuizError> {
        let content = self.load_content(page_ref).await?;
        let request = build_request(&content, overrides)?;

        let raw = self.backend.generate(&request.prompt).await?;
        let quiz = parse_quiz_response(&raw, &request.config)?;

        tracing::info!(
            requested = request.config.question_count,
            received = quiz.len(),
            question_type = %request.config.question_type,
            "Generated quiz"
        );

        Ok(GeneratedQuiz {
            config: request.config,
            quiz,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::models::QuestionType;

    const PAGE: &str = "https://acme.atlassian.net/wiki/spaces/ENG/pages/4242/Handbook";

    fn pipeline(source: impl DocumentSource + 'static, backend: Arc<FakeBackend>) -> QuizGenerator {
        QuizGenerator::new(Arc::new(source), backend)
    }

    #[tokio::test]
    async fn test_short_page_never_reaches_backend() {
        let backend = Arc::new(FakeBackend::replying(quiz_json(5)));
        let generator = pipeline(FakeSource::with_words(200), Arc::clone(&backend));

        let result = generator.generate(PAGE, QuizOverrides::default()).await;
        assert!(matches!(
            result,
            Err(QuizError::InsufficientContent { word_count: 200 })
        ));

        let options = generator.customization_options(PAGE).await;
        assert!(matches!(options, Err(QuizError::InsufficientContent { .. })));
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_long_page_uses_defaults() {
        let backend = Arc::new(FakeBackend::replying(quiz_json(15)));
        let generator = pipeline(FakeSource::with_words(1200), Arc::clone(&backend));

        let generated = generator.generate(PAGE, QuizOverrides::default()).await.unwrap();
        assert_eq!(generated.config.question_count, 15);
        assert_eq!(generated.config.question_type, QuestionType::MultipleChoice);
        assert_eq!(generated.quiz.len(), 15);

        let prompts = backend.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Generate 15 well-crafted and meaningful multiple-choice"));
    }

    #[tokio::test]
    async fn test_fenced_reply_is_accepted() {
        let reply = format!("```json {}```", quiz_json(3));
        let backend = Arc::new(FakeBackend::replying(reply));
        let generator = pipeline(FakeSource::with_words(300), backend);

        let generated = generator.generate(PAGE, QuizOverrides::default()).await.unwrap();
        assert_eq!(generated.quiz.len(), 3);
    }

    #[tokio::test]
    async fn test_failures_short_circuit() {
        let backend = Arc::new(FakeBackend::replying(quiz_json(5)));
        let generator = pipeline(FailingSource, Arc::clone(&backend));
        assert!(matches!(
            generator.generate(PAGE, QuizOverrides::default()).await,
            Err(QuizError::ContentFetch(_))
        ));
        assert_eq!(backend.calls(), 0);

        let generator = pipeline(
            FakeSource::with_words(300),
            Arc::new(FakeBackend::failing("quota exceeded")),
        );
        assert!(matches!(
            generator.generate(PAGE, QuizOverrides::default()).await,
            Err(QuizError::Generation(_))
        ));

        let generator = pipeline(
            FakeSource::with_words(300),
            Arc::new(FakeBackend::replying("not json at all")),
        );
        assert!(matches!(
            generator.generate(PAGE, QuizOverrides::default()).await,
            Err(QuizError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_bad_reference_is_content_unavailable() {
        let backend = Arc::new(FakeBackend::replying(quiz_json(5)));
        let generator = pipeline(FakeSource::with_words(300), backend);
        assert!(matches!(
            generator.customization_options("https://acme.atlassian.net/wiki/home").await,
            Err(QuizError::ContentUnavailable(_))
        ));
    }
}
