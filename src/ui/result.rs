use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::session::{Outcome, Session};

use super::{grade_color, render_controls};

pub fn render(frame: &mut Frame, area: Rect, session: &Session, outcome: Outcome) {
    let score = session.score();
    let total = session.total_questions();
    let percentage = session.final_percentage().unwrap_or(0.0);

    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(10),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    let (headline, detail, headline_color) = match outcome {
        Outcome::Passed => (
            format!("Passed! You have scored {}/{}", score, total),
            "Well done.",
            Color::Green,
        ),
        Outcome::Failed => (
            format!("Oops! You have failed. Score: {}/{}", score, total),
            "Please re-take the quiz.",
            Color::Red,
        ),
    };

    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "RESULTS",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            headline,
            Style::default().fg(headline_color).bold(),
        )),
        Line::from(Span::styled(
            format!("{:.0}%", percentage),
            Style::default().fg(grade_color(percentage)).bold(),
        )),
        Line::from(""),
        Line::from(detail.fg(Color::DarkGray)),
    ];
    if let Some((requested, received)) = session.count_mismatch() {
        content.push(Line::from(
            format!("Requested {} questions, received {}", requested, received).fg(Color::Yellow),
        ));
    }

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, chunks[1]);

    render_controls(
        frame,
        chunks[3],
        "v review  ·  r retake  ·  q quit",
    );
}
