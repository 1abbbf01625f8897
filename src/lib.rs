//! # page-quiz
//!
//! Generate a multiple-choice or true/false quiz from a wiki page and take it
//! in the terminal.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use page_quiz::{Config, ConfluenceSource, GeminiBackend, Quiz, QuizError, QuizGenerator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), QuizError> {
//!     let config = Config::from_env()?;
//!     let generator = QuizGenerator::new(
//!         Arc::new(ConfluenceSource::new(
//!             config.confluence_base_url.clone(),
//!             config.confluence_auth.clone(),
//!         )?),
//!         Arc::new(GeminiBackend::from_config(&config)),
//!     );
//!
//!     let page = "https://acme.atlassian.net/wiki/spaces/ENG/pages/123456/Onboarding";
//!     Quiz::new(generator, page, config.export_dir).run().await
//! }
//! ```

pub mod config;
pub mod content;
mod error;
pub mod export;
pub mod generation;
mod models;
pub mod session;
pub mod terminal;
mod ui;

use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use tokio::sync::mpsc;

pub use config::Config;
pub use content::{ConfluenceSource, DocumentSource};
pub use error::QuizError;
pub use generation::{GeminiBackend, GenerativeBackend, QuizGenerator};
pub use models::{
    AnswerRecord, ExtractedContent, Question, QuestionType, QuizOverrides, QuizRequestConfig,
    QuizSet, RawDocument,
};
pub use session::{Action, Outcome, Screen, Session};

use export::PageLayout;
use terminal::TerminalGuard;

const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A quiz for one page, driven from the terminal.
pub struct Quiz {
    session: Session,
    generator: QuizGenerator,
    page_ref: String,
    export_dir: PathBuf,
    status: Option<String>,
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Action>,
}

impl Quiz {
    /// Create a quiz for the page identified by `page_ref`.
    ///
    /// # Arguments
    ///
    /// * `generator` - Pipeline used to fetch the page and generate questions.
    /// * `page_ref` - Page reference containing a `pages/<id>` segment.
    /// * `export_dir` - Directory review exports are written to.
    pub fn new(generator: QuizGenerator, page_ref: impl Into<String>, export_dir: PathBuf) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            session: Session::new(),
            generator,
            page_ref: page_ref.into(),
            export_dir,
            status: None,
            tx,
            rx,
        }
    }

    /// Preselect the question count and type.
    pub fn with_overrides(mut self, overrides: QuizOverrides) -> Self {
        self.session = Session::with_overrides(overrides);
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run the quiz in the terminal.
    ///
    /// This will take over the terminal, display the quiz UI, and return
    /// when the user quits from the setup screen.
    pub async fn run(mut self) -> Result<(), QuizError> {
        let mut terminal = TerminalGuard::enter()?;
        tracing::info!(page = %self.page_ref, "Quiz started");

        loop {
            self.drain_actions();

            let host = ui::HostView {
                page_ref: &self.page_ref,
                status: self.status.as_deref(),
            };
            terminal.draw(|frame| ui::render(frame, &self.session, &host))?;

            if event::poll(INPUT_POLL_INTERVAL)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }

                    if self.handle_input(key.code) {
                        break;
                    }
                }
            }
        }

        tracing::info!("Quiz closed");
        Ok(())
    }

    /// Apply results posted by pipeline tasks.
    fn drain_actions(&mut self) {
        while let Ok(action) = self.rx.try_recv() {
            self.session.apply(action);
        }
    }

    fn spawn_options_request(&self) {
        let generator = self.generator.clone();
        let page_ref = self.page_ref.clone();
        let ticket = self.session.ticket();
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let result = generator.customization_options(&page_ref).await;
            let _ = tx.send(Action::OptionsLoaded(ticket, result));
        });
    }

    fn spawn_generation(&self) {
        let generator = self.generator.clone();
        let page_ref = self.page_ref.clone();
        let overrides = self.session.overrides();
        let ticket = self.session.ticket();
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let result = generator.generate(&page_ref, overrides).await;
            let _ = tx.send(Action::QuizLoaded(ticket, result));
        });
    }

    /// Returns true if the app should exit.
    fn handle_input(&mut self, key: KeyCode) -> bool {
        match self.session.screen() {
            Screen::Setup { customizing } => self.handle_setup_input(key, customizing),
            Screen::InProgress { submitted, .. } => {
                self.handle_quiz_input(key, submitted);
                false
            }
            Screen::Finished(_) => {
                self.handle_result_input(key);
                false
            }
            Screen::Reviewing { .. } => {
                self.handle_review_input(key);
                false
            }
        }
    }

    fn handle_setup_input(&mut self, key: KeyCode, customizing: bool) -> bool {
        match key {
            KeyCode::Enter => {
                if self.session.apply(Action::StartQuiz) {
                    self.spawn_generation();
                }
            }
            KeyCode::Char('c') | KeyCode::Char('C') => {
                if self.session.apply(Action::RequestOptions) {
                    self.spawn_options_request();
                }
            }
            KeyCode::Left | KeyCode::Char('h') if customizing => self.cycle_question_count(false),
            KeyCode::Right | KeyCode::Char('l') if customizing => self.cycle_question_count(true),
            KeyCode::Char('t') | KeyCode::Char('T') if customizing => {
                let toggled = self.session.question_type().toggled();
                self.session.apply(Action::Configure(QuizOverrides {
                    question_count: None,
                    question_type: Some(toggled),
                }));
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return true,
            _ => {}
        }
        false
    }

    fn cycle_question_count(&mut self, forward: bool) {
        let Some(options) = self.session.customization() else {
            return;
        };
        let current = self
            .session
            .overrides()
            .question_count
            .unwrap_or(options.defaults.question_count);
        let count = if forward {
            options.next_count(current)
        } else {
            options.previous_count(current)
        };
        self.session.apply(Action::Configure(QuizOverrides {
            question_count: Some(count),
            question_type: None,
        }));
    }

    fn handle_quiz_input(&mut self, key: KeyCode, submitted: bool) {
        let option_count = self
            .session
            .current_question()
            .map_or(0, |question| question.options.len());

        match key {
            KeyCode::Down | KeyCode::Char('j') if option_count > 0 => {
                let next = self
                    .session
                    .selected_index()
                    .map_or(0, |i| (i + 1) % option_count);
                self.session.apply(Action::Select(next));
            }
            KeyCode::Up | KeyCode::Char('k') if option_count > 0 => {
                let previous = self
                    .session
                    .selected_index()
                    .map_or(option_count - 1, |i| (i + option_count - 1) % option_count);
                self.session.apply(Action::Select(previous));
            }
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                self.session.apply(Action::Select(index));
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if !submitted {
                    // Submitting requires a choice.
                    if self.session.pending_answer().is_some() {
                        self.session.apply(Action::Submit);
                    }
                } else if self.session.on_last_question() {
                    self.session.apply(Action::Finish);
                } else {
                    self.session.apply(Action::Next);
                }
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => self.quit(),
            _ => {}
        }
    }

    fn handle_result_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('v') | KeyCode::Char('V') => {
                self.session.apply(Action::Review);
            }
            KeyCode::Char('r') | KeyCode::Char('R') => self.retake(),
            KeyCode::Char('q') | KeyCode::Char('Q') => self.quit(),
            _ => {}
        }
    }

    fn handle_review_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Down | KeyCode::Char('j') => {
                self.session.apply(Action::ScrollReview(1));
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.session.apply(Action::ScrollReview(-1));
            }
            KeyCode::Char('v') | KeyCode::Char('V') | KeyCode::Esc => {
                self.status = None;
                self.session.apply(Action::Review);
            }
            KeyCode::Char('e') | KeyCode::Char('E') => self.export(false),
            KeyCode::Char('p') | KeyCode::Char('P') => self.export(true),
            KeyCode::Char('r') | KeyCode::Char('R') => self.retake(),
            KeyCode::Char('q') | KeyCode::Char('Q') => self.quit(),
            _ => {}
        }
    }

    fn retake(&mut self) {
        self.status = None;
        self.session.apply(Action::Retake);
    }

    fn quit(&mut self) {
        self.status = None;
        self.session.apply(Action::Quit);
    }

    fn export(&mut self, paginated: bool) {
        let Some(review) = self.session.review() else {
            return;
        };
        let result = if paginated {
            export::export_document(&review, &self.export_dir, PageLayout::default())
        } else {
            export::export_text(&review, &self.export_dir)
        };

        self.status = Some(match result {
            Ok(path) => format!("Review saved to {}", path.display()),
            Err(e) => {
                tracing::warn!(error = %e, "Review export failed");
                e.to_string()
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;

    use tempfile::tempdir;

    use super::*;
    use crate::generation::testing::{FakeBackend, FakeSource, quiz_json};

    const PAGE: &str = "https://acme.atlassian.net/wiki/spaces/ENG/pages/777/Guide";

    fn quiz(words: usize, reply: String, export_dir: &Path) -> Quiz {
        let generator = QuizGenerator::new(
            Arc::new(FakeSource::with_words(words)),
            Arc::new(FakeBackend::replying(reply)),
        );
        Quiz::new(generator, PAGE, export_dir.to_path_buf())
    }

    /// Wait for the spawned pipeline task and apply its result.
    async fn settle(quiz: &mut Quiz) {
        let action = quiz.rx.recv().await.unwrap();
        quiz.session.apply(action);
    }

    #[tokio::test]
    async fn test_start_from_keyboard() {
        let dir = tempdir().unwrap();
        let mut quiz = quiz(300, quiz_json(5), dir.path());
        assert!(!quiz.handle_input(KeyCode::Enter));
        assert!(quiz.session().is_loading());

        // Ignored while the first request is in flight.
        quiz.handle_input(KeyCode::Enter);
        settle(&mut quiz).await;

        assert_eq!(
            quiz.session().screen(),
            Screen::InProgress {
                index: 0,
                submitted: false
            }
        );
        assert_eq!(quiz.session().total_questions(), 5);
        assert!(quiz.rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_short_page_reports_error() {
        let dir = tempdir().unwrap();
        let mut quiz = quiz(200, quiz_json(5), dir.path());
        quiz.handle_input(KeyCode::Enter);
        settle(&mut quiz).await;

        assert_eq!(quiz.session().screen(), Screen::Setup { customizing: false });
        assert_eq!(
            quiz.session().error(),
            Some("Minimum 250 words required to generate a quiz.")
        );
    }

    #[tokio::test]
    async fn test_customize_from_keyboard() {
        let dir = tempdir().unwrap();
        let mut quiz = quiz(1200, quiz_json(10), dir.path());
        quiz.handle_input(KeyCode::Char('c'));
        settle(&mut quiz).await;
        assert_eq!(quiz.session().screen(), Screen::Setup { customizing: true });
        assert_eq!(quiz.session().overrides().question_count, Some(15));

        quiz.handle_input(KeyCode::Char('l'));
        assert_eq!(quiz.session().overrides().question_count, Some(5));
        quiz.handle_input(KeyCode::Char('l'));
        assert_eq!(quiz.session().overrides().question_count, Some(10));
        quiz.handle_input(KeyCode::Char('t'));
        assert_eq!(quiz.session().question_type(), QuestionType::TrueFalse);
        quiz.handle_input(KeyCode::Char('t'));
        assert_eq!(quiz.session().question_type(), QuestionType::MultipleChoice);

        quiz.handle_input(KeyCode::Enter);
        settle(&mut quiz).await;
        assert_eq!(quiz.session().requested_count(), Some(10));
    }

    #[tokio::test]
    async fn test_play_through_and_quit() {
        let dir = tempdir().unwrap();
        let mut quiz = quiz(300, quiz_json(2), dir.path());
        quiz.handle_input(KeyCode::Enter);
        settle(&mut quiz).await;

        // Enter without a choice does nothing.
        quiz.handle_input(KeyCode::Enter);
        assert!(quiz.session().answers().is_empty());

        for _ in 0..2 {
            quiz.handle_input(KeyCode::Char('j'));
            quiz.handle_input(KeyCode::Char('j'));
            quiz.handle_input(KeyCode::Enter);
            quiz.handle_input(KeyCode::Enter);
        }
        assert_eq!(quiz.session().screen(), Screen::Finished(Outcome::Passed));

        quiz.handle_input(KeyCode::Char('v'));
        assert!(matches!(quiz.session().screen(), Screen::Reviewing { .. }));

        quiz.handle_input(KeyCode::Char('q'));
        assert_eq!(quiz.session().screen(), Screen::Setup { customizing: false });
        assert!(quiz.session().quiz().is_none());
        assert!(quiz.handle_input(KeyCode::Char('q')));
    }

    #[tokio::test]
    async fn test_export_review_from_keyboard() {
        let dir = tempdir().unwrap();
        let mut quiz = quiz(300, quiz_json(1), dir.path());
        quiz.handle_input(KeyCode::Enter);
        settle(&mut quiz).await;

        quiz.handle_input(KeyCode::Char('1'));
        quiz.handle_input(KeyCode::Enter);
        quiz.handle_input(KeyCode::Enter);
        quiz.handle_input(KeyCode::Char('v'));

        quiz.handle_input(KeyCode::Char('e'));
        let text = std::fs::read_to_string(dir.path().join(export::CLIPBOARD_FILE_NAME)).unwrap();
        assert!(text.contains("Question 1"));
        assert!(quiz.status.as_deref().unwrap().starts_with("Review saved to"));

        quiz.handle_input(KeyCode::Char('p'));
        assert!(dir.path().join(export::DOCUMENT_FILE_NAME).exists());
    }
}
