use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::session::{Review, Session};

use super::{HostView, grade_color, render_controls};

pub fn render(frame: &mut Frame, area: Rect, session: &Session, scroll: usize, host: &HostView) {
    let Some(review) = session.review() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    render_summary(frame, chunks[0], &review);
    render_items(frame, chunks[1], &review, scroll);

    if let Some(status) = host.status {
        let widget = Paragraph::new(status)
            .alignment(Alignment::Center)
            .fg(Color::Yellow);
        frame.render_widget(widget, chunks[2]);
    }

    render_controls(
        frame,
        chunks[3],
        "j/k scroll  ·  e export text  ·  p export pages  ·  v back  ·  r retake  ·  q quit",
    );
}

fn render_summary(frame: &mut Frame, area: Rect, review: &Review) {
    let content = vec![
        Line::from(Span::styled(
            "QUIZ REVIEW",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "{} / {}  ({:.0}%)",
                review.score, review.total, review.percentage
            ),
            Style::default().fg(grade_color(review.percentage)).bold(),
        )),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_items(frame: &mut Frame, area: Rect, review: &Review, scroll: usize) {
    let visible = review.items.iter().skip(scroll);
    let mut lines: Vec<Line> = Vec::with_capacity(visible.len() * 4);

    // Start at the scrolled-to item; wrapped rows never shift item boundaries.
    for item in visible {
        let (symbol, color) = if item.is_correct() {
            ("+", Color::Green)
        } else {
            ("-", Color::Red)
        };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", symbol), Style::default().fg(color)),
            Span::styled(
                format!("Question {}: ", item.number),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(item.question.as_str(), Style::default().fg(Color::White)),
        ]));
        lines.push(Line::from(vec![
            Span::raw("   "),
            Span::styled("Correct Answer: ", Style::default().fg(Color::DarkGray)),
            Span::styled(item.correct_answer.as_str(), Style::default().fg(Color::Green)),
        ]));
        lines.push(Line::from(vec![
            Span::raw("   "),
            Span::styled("Your Answer: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                item.selected_answer.as_deref().unwrap_or("Not Answered"),
                Style::default().fg(color),
            ),
        ]));
        lines.push(Line::from(""));
    }

    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().padding(Padding::horizontal(1)));
    frame.render_widget(widget, area);
}

#[cfg(test)]
mod tests {
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::session::{Outcome, ReviewItem};

    fn long_review() -> Review {
        let items = (1..=3)
            .map(|number| ReviewItem {
                number,
                question: "A question long enough to wrap across several rows ".repeat(3),
                correct_answer: "An answer that also wraps when the pane is narrow".to_string(),
                selected_answer: None,
            })
            .collect();
        Review {
            items,
            score: 0,
            total: 3,
            percentage: 0.0,
            outcome: Outcome::Failed,
        }
    }

    fn rows(terminal: &Terminal<TestBackend>) -> Vec<String> {
        let buffer = terminal.backend().buffer();
        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_scrolled_review_starts_at_item_boundary() {
        let mut terminal = Terminal::new(TestBackend::new(30, 40)).unwrap();
        let review = long_review();

        terminal
            .draw(|frame| render_items(frame, frame.area(), &review, 1))
            .unwrap();

        let rows = rows(&terminal);
        assert!(rows[0].contains("Question 2:"));
        assert!(rows.iter().all(|row| !row.contains("Question 1:")));
        assert!(rows.iter().any(|row| row.contains("Question 3:")));
    }
}
