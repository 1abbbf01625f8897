mod quiz;
mod result;
mod review;
mod setup;

use ratatui::{
    prelude::*,
    widgets::{Block, Paragraph},
};

use crate::session::{Screen, Session};

/// Extra state the host shows alongside the session.
pub struct HostView<'a> {
    pub page_ref: &'a str,
    /// Result of the last export, shown on the review screen.
    pub status: Option<&'a str>,
}

pub fn render(frame: &mut Frame, session: &Session, host: &HostView) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    match session.screen() {
        Screen::Setup { .. } => setup::render(frame, area, session, host),
        Screen::InProgress { .. } => quiz::render(frame, area, session),
        Screen::Finished(outcome) => result::render(frame, area, session, outcome),
        Screen::Reviewing { scroll, .. } => review::render(frame, area, session, scroll, host),
    }
}

fn render_controls(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

fn grade_color(percentage: f64) -> Color {
    match percentage as u32 {
        90..=100 => Color::Green,
        70..=89 => Color::Cyan,
        50..=69 => Color::Yellow,
        _ => Color::Red,
    }
}
