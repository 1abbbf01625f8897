//! Review exports: a plain-text rendering for pasting elsewhere and a
//! paginated document.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::QuizError;
use crate::session::Review;

const NOT_ANSWERED: &str = "Not Answered";
const REVIEW_TITLE: &str = "Quiz Review";
const FORM_FEED: char = '\u{000C}';

pub const CLIPBOARD_FILE_NAME: &str = "Quiz_Review.txt";
pub const DOCUMENT_FILE_NAME: &str = "Quiz_Review_pages.txt";

fn question_line(number: usize, question: &str) -> String {
    format!("Question {}: {}", number, question)
}

fn correct_line(answer: &str) -> String {
    format!("Correct Answer: {}", answer)
}

fn your_answer_line(answer: Option<&str>) -> String {
    format!("Your Answer: {}", answer.unwrap_or(NOT_ANSWERED))
}

/// One block per question, each followed by a blank line.
pub fn review_text(review: &Review) -> String {
    review
        .items
        .iter()
        .map(|item| {
            format!(
                "{}\n{}\n{}\n\n",
                question_line(item.number, &item.question),
                correct_line(&item.correct_answer),
                your_answer_line(item.selected_answer.as_deref())
            )
        })
        .collect()
}

/// Lays text out on fixed-size pages.
#[derive(Debug, Clone, Copy)]
pub struct PageLayout {
    /// Maximum characters per line.
    pub line_width: usize,
    /// Maximum lines per page, title and spacing included.
    pub lines_per_page: usize,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            line_width: 80,
            lines_per_page: 27,
        }
    }
}

impl PageLayout {
    /// Render the review as pages; the first page starts with the title.
    pub fn paginate(&self, review: &Review) -> Vec<Vec<String>> {
        let mut pages = vec![vec![REVIEW_TITLE.to_string(), String::new()]];

        for item in &review.items {
            let block = [
                question_line(item.number, &item.question),
                correct_line(&item.correct_answer),
                your_answer_line(item.selected_answer.as_deref()),
            ];
            for text in &block {
                for line in wrap(text, self.line_width) {
                    self.push_line(&mut pages, line);
                }
            }
            self.push_line(&mut pages, String::new());
        }

        pages
    }

    fn push_line(&self, pages: &mut Vec<Vec<String>>, line: String) {
        let needs_page = pages
            .last()
            .is_none_or(|page| page.len() >= self.lines_per_page.max(1));
        if needs_page {
            // A page never starts with spacing.
            if line.is_empty() {
                return;
            }
            pages.push(Vec::new());
        }
        if let Some(page) = pages.last_mut() {
            page.push(line);
        }
    }

    /// Pages joined with form feeds.
    pub fn render(&self, review: &Review) -> String {
        self.paginate(review)
            .iter()
            .map(|page| page.join("\n"))
            .collect::<Vec<_>>()
            .join(&format!("\n{}", FORM_FEED))
    }
}

/// Greedy word wrap; words longer than `width` are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        let current_len = current.chars().count();
        if !current.is_empty() && current_len + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.extend(word);
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn write_export(dir: &Path, file_name: &str, contents: &str) -> Result<PathBuf, QuizError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    fs::write(&path, contents)?;
    tracing::info!(path = %path.display(), bytes = contents.len(), "Exported review");
    Ok(path)
}

/// Write the plain-text review into `dir`.
pub fn export_text(review: &Review, dir: &Path) -> Result<PathBuf, QuizError> {
    write_export(dir, CLIPBOARD_FILE_NAME, &review_text(review))
}

/// Write the paginated review into `dir`.
pub fn export_document(review: &Review, dir: &Path, layout: PageLayout) -> Result<PathBuf, QuizError> {
    write_export(dir, DOCUMENT_FILE_NAME, &layout.render(review))
}
