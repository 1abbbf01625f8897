//! Quiz session state machine.
//!
//! All transitions go through [`Session::apply`], one action at a time. Network
//! work happens outside: the host issues a request action, runs the pipeline,
//! and feeds the outcome back as a `*Loaded` action carrying the same ticket.

use std::sync::Arc;

use crate::error::QuizError;
use crate::generation::{CustomizationOptions, GeneratedQuiz};
use crate::models::{AnswerRecord, Question, QuestionType, QuizOverrides, QuizSet};

/// Percentage needed to pass, inclusive.
pub const PASS_PERCENTAGE: usize = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Before generation; `customizing` once the options have been loaded.
    Setup { customizing: bool },
    InProgress { index: usize, submitted: bool },
    Finished(Outcome),
    Reviewing { outcome: Outcome, scroll: usize },
}

impl Default for Screen {
    fn default() -> Self {
        Self::Setup { customizing: false }
    }
}

/// Identifies one outstanding pipeline request.
pub type Ticket = u64;

#[derive(Debug)]
pub enum Action {
    /// Ask for the page's customization options.
    RequestOptions,
    OptionsLoaded(Ticket, Result<CustomizationOptions, QuizError>),
    /// Change the question count and/or type while customizing.
    Configure(QuizOverrides),
    StartQuiz,
    QuizLoaded(Ticket, Result<GeneratedQuiz, QuizError>),
    /// Choose the option at this index of the current question.
    Select(usize),
    Submit,
    Next,
    Finish,
    /// Open the review from a result screen, or close it again.
    Review,
    ScrollReview(isize),
    Retake,
    Quit,
}

/// One row of the read-only review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewItem {
    pub number: usize,
    pub question: String,
    pub correct_answer: String,
    pub selected_answer: Option<String>,
}

impl ReviewItem {
    pub fn is_correct(&self) -> bool {
        self.selected_answer.as_deref() == Some(self.correct_answer.as_str())
    }
}

/// Questions paired with the recorded answers, in presentation order.
#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub items: Vec<ReviewItem>,
    pub score: usize,
    pub total: usize,
    pub percentage: f64,
    pub outcome: Outcome,
}

#[derive(Debug, Default)]
pub struct Session {
    screen: Screen,
    quiz: Option<Arc<QuizSet>>,
    requested_count: Option<usize>,
    options: Option<CustomizationOptions>,
    overrides: QuizOverrides,
    pending: Option<String>,
    score: usize,
    answers: Vec<AnswerRecord>,
    final_percentage: Option<f64>,
    loading: bool,
    ticket: Ticket,
    error: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session with user choices made up front, e.g. on the command line.
    pub fn with_overrides(overrides: QuizOverrides) -> Self {
        Self {
            overrides,
            ..Self::default()
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Ticket of the request currently in flight.
    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn overrides(&self) -> QuizOverrides {
        self.overrides
    }

    pub fn customization(&self) -> Option<&CustomizationOptions> {
        self.options.as_ref()
    }

    pub fn quiz(&self) -> Option<&Arc<QuizSet>> {
        self.quiz.as_ref()
    }

    pub fn requested_count(&self) -> Option<usize> {
        self.requested_count
    }

    /// `(requested, received)` when the backend returned a different number
    /// of questions than was asked for.
    pub fn count_mismatch(&self) -> Option<(usize, usize)> {
        let requested = self.requested_count?;
        let received = self.total_questions();
        (requested != received).then_some((requested, received))
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    pub fn pending_answer(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    /// Final percentage once the quiz is finished.
    pub fn final_percentage(&self) -> Option<f64> {
        self.final_percentage
    }

    pub fn total_questions(&self) -> usize {
        self.quiz.as_ref().map_or(0, |quiz| quiz.len())
    }

    pub fn current_question(&self) -> Option<&Question> {
        match self.screen {
            Screen::InProgress { index, .. } => self.quiz.as_ref()?.get(index),
            _ => None,
        }
    }

    /// Index of the pending answer within the current question's options.
    pub fn selected_index(&self) -> Option<usize> {
        let pending = self.pending.as_deref()?;
        self.current_question()?
            .options
            .iter()
            .position(|option| option == pending)
    }

    /// Whether the current question is the last one.
    pub fn on_last_question(&self) -> bool {
        matches!(self.screen, Screen::InProgress { index, .. } if index + 1 >= self.total_questions())
    }

    /// Apply one action. Returns `false` when the action is not valid in the
    /// current state, in which case nothing changes.
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::RequestOptions => self.request_options(),
            Action::OptionsLoaded(ticket, result) => self.options_loaded(ticket, result),
            Action::Configure(overrides) => self.configure(overrides),
            Action::StartQuiz => self.start_quiz(),
            Action::QuizLoaded(ticket, result) => self.quiz_loaded(ticket, result),
            Action::Select(option) => self.select(option),
            Action::Submit => self.submit(),
            Action::Next => self.next(),
            Action::Finish => self.finish(),
            Action::Review => self.toggle_review(),
            Action::ScrollReview(delta) => self.scroll_review(delta),
            Action::Retake => self.retake(),
            Action::Quit => self.quit(),
        }
    }

    fn in_idle_setup(&self) -> bool {
        matches!(self.screen, Screen::Setup { .. }) && !self.loading
    }

    fn begin_request(&mut self) {
        self.loading = true;
        self.ticket += 1;
        self.error = None;
    }

    fn fail(&mut self, err: QuizError) {
        tracing::warn!(error = %err, "Quiz request failed");
        self.error = Some(err.to_string());
    }

    fn request_options(&mut self) -> bool {
        if !self.in_idle_setup() {
            return false;
        }
        self.begin_request();
        true
    }

    fn options_loaded(
        &mut self,
        ticket: Ticket,
        result: Result<CustomizationOptions, QuizError>,
    ) -> bool {
        if !self.loading || ticket != self.ticket || !matches!(self.screen, Screen::Setup { .. }) {
            return false;
        }
        self.loading = false;

        match result {
            Ok(options) => {
                let count = self
                    .overrides
                    .question_count
                    .filter(|count| options.allows(*count))
                    .unwrap_or(options.defaults.question_count);
                let question_type = self
                    .overrides
                    .question_type
                    .unwrap_or(options.defaults.question_type);

                self.overrides = QuizOverrides {
                    question_count: Some(count),
                    question_type: Some(question_type),
                };
                self.options = Some(options);
                self.screen = Screen::Setup { customizing: true };
            }
            Err(err) => {
                self.options = None;
                self.fail(err);
            }
        }
        true
    }

    fn configure(&mut self, overrides: QuizOverrides) -> bool {
        if !self.in_idle_setup() || self.screen != (Screen::Setup { customizing: true }) {
            return false;
        }
        let Some(options) = &self.options else {
            return false;
        };
        if let Some(count) = overrides.question_count {
            if !options.allows(count) {
                return false;
            }
            self.overrides.question_count = Some(count);
        }
        if let Some(question_type) = overrides.question_type {
            self.overrides.question_type = Some(question_type);
        }
        true
    }

    fn start_quiz(&mut self) -> bool {
        if !self.in_idle_setup() {
            return false;
        }
        self.begin_request();
        self.quiz = None;
        self.requested_count = None;
        true
    }

    fn quiz_loaded(&mut self, ticket: Ticket, result: Result<GeneratedQuiz, QuizError>) -> bool {
        if !self.loading || ticket != self.ticket || !matches!(self.screen, Screen::Setup { .. }) {
            return false;
        }
        self.loading = false;

        match result {
            Ok(generated) => {
                self.requested_count = Some(generated.config.question_count);
                self.quiz = Some(Arc::new(generated.quiz));
                self.restart_attempt();
            }
            Err(err) => {
                self.quiz = None;
                self.fail(err);
            }
        }
        true
    }

    fn restart_attempt(&mut self) {
        self.screen = Screen::InProgress {
            index: 0,
            submitted: false,
        };
        self.pending = None;
        self.score = 0;
        self.answers.clear();
        self.final_percentage = None;
        self.error = None;
    }

    fn select(&mut self, option: usize) -> bool {
        if !matches!(self.screen, Screen::InProgress { submitted: false, .. }) {
            return false;
        }
        let Some(answer) = self
            .current_question()
            .and_then(|question| question.options.get(option))
            .cloned()
        else {
            return false;
        };
        self.pending = Some(answer);
        true
    }

    fn submit(&mut self) -> bool {
        let Screen::InProgress {
            index,
            submitted: false,
        } = self.screen
        else {
            return false;
        };
        let Some(question) = self.current_question() else {
            return false;
        };

        let record = AnswerRecord {
            question_index: index,
            question_text: question.prompt.clone(),
            selected_answer: self.pending.clone(),
            correct_answer: question.correct_answer.clone(),
        };
        if record.is_correct() {
            self.score += 1;
        }
        self.answers.push(record);
        self.screen = Screen::InProgress {
            index,
            submitted: true,
        };
        true
    }

    fn next(&mut self) -> bool {
        match self.screen {
            Screen::InProgress {
                index,
                submitted: true,
            } if index + 1 < self.total_questions() => {
                self.screen = Screen::InProgress {
                    index: index + 1,
                    submitted: false,
                };
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    fn finish(&mut self) -> bool {
        let total = self.total_questions();
        match self.screen {
            Screen::InProgress {
                index,
                submitted: true,
            } if index + 1 == total => {
                let outcome = outcome_for(self.score, total);
                self.final_percentage = Some(percentage(self.score, total));
                self.pending = None;
                self.screen = Screen::Finished(outcome);

                tracing::info!(
                    score = self.score,
                    total,
                    outcome = ?outcome,
                    "Quiz finished"
                );
                true
            }
            _ => false,
        }
    }

    fn toggle_review(&mut self) -> bool {
        self.screen = match self.screen {
            Screen::Finished(outcome) => Screen::Reviewing { outcome, scroll: 0 },
            Screen::Reviewing { outcome, .. } => Screen::Finished(outcome),
            _ => return false,
        };
        true
    }

    fn scroll_review(&mut self, delta: isize) -> bool {
        let Screen::Reviewing { outcome, scroll } = self.screen else {
            return false;
        };
        let max_scroll = self.answers.len().saturating_sub(1);
        let scroll = scroll.saturating_add_signed(delta).min(max_scroll);
        self.screen = Screen::Reviewing { outcome, scroll };
        true
    }

    fn retake(&mut self) -> bool {
        if !matches!(self.screen, Screen::Finished(_) | Screen::Reviewing { .. }) {
            return false;
        }
        self.restart_attempt();
        true
    }

    fn quit(&mut self) -> bool {
        *self = Self {
            ticket: self.ticket,
            ..Self::default()
        };
        true
    }

    /// Read-only projection of the finished attempt.
    pub fn review(&self) -> Option<Review> {
        let outcome = match self.screen {
            Screen::Finished(outcome) | Screen::Reviewing { outcome, .. } => outcome,
            _ => return None,
        };
        let quiz = self.quiz.as_ref()?;

        let items = quiz
            .questions
            .iter()
            .enumerate()
            .map(|(i, question)| ReviewItem {
                number: i + 1,
                question: question.prompt.clone(),
                correct_answer: question.correct_answer.clone(),
                selected_answer: self
                    .answers
                    .iter()
                    .find(|record| record.question_index == i)
                    .and_then(|record| record.selected_answer.clone()),
            })
            .collect();

        Some(Review {
            items,
            score: self.score,
            total: quiz.len(),
            percentage: percentage(self.score, quiz.len()),
            outcome,
        })
    }

    /// Question type chosen for the next attempt.
    pub fn question_type(&self) -> QuestionType {
        self.overrides.question_type.unwrap_or_default()
    }
}

fn percentage(score: usize, total: usize) -> f64 {
    if total > 0 {
        (score * 100) as f64 / total as f64
    } else {
        0.0
    }
}

/// Pass/fail in integer arithmetic so exactly 70% passes.
fn outcome_for(score: usize, total: usize) -> Outcome {
    if total > 0 && score * 100 >= PASS_PERCENTAGE * total {
        Outcome::Passed
    } else {
        Outcome::Failed
    }
}
