use ratatui::{
    prelude::*,
    widgets::{Paragraph, Wrap},
};

use crate::models::Question;
use crate::session::{Screen, Session};

use super::render_controls;

const OPTION_LABELS: [char; 6] = ['A', 'B', 'C', 'D', 'E', 'F'];

pub fn render(frame: &mut Frame, area: Rect, session: &Session) {
    let (Screen::InProgress { index, submitted }, Some(question)) =
        (session.screen(), session.current_question())
    else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(2),
        Constraint::Length(1),
    ])
    .margin(2)
    .split(area);

    render_progress(frame, chunks[0], index + 1, session.total_questions());
    render_question_text(frame, chunks[1], index + 1, &question.prompt);
    render_options(frame, chunks[2], question, session.selected_index(), submitted);

    if submitted {
        render_feedback(frame, chunks[3], question, session.pending_answer());
    }

    let controls = match (submitted, session.on_last_question()) {
        (false, _) => "j/k choose  ·  enter submit  ·  q quit",
        (true, false) => "enter next  ·  q quit",
        (true, true) => "enter finish  ·  q quit",
    };
    render_controls(frame, chunks[4], controls);
}

fn render_progress(frame: &mut Frame, area: Rect, number: usize, total: usize) {
    let widget = Paragraph::new(format!("{}/{}", number, total))
        .alignment(Alignment::Right)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

fn render_question_text(frame: &mut Frame, area: Rect, number: usize, text: &str) {
    let widget = Paragraph::new(format!("Question {}: {}", number, text))
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold();
    frame.render_widget(widget, area);
}

/// Before submission the cursor shows the choice; afterwards the correct option
/// is green and a wrong choice red.
fn option_style(option: &str, is_selected: bool, question: &Question, submitted: bool) -> Style {
    if submitted {
        if question.is_correct(option) {
            Style::default().fg(Color::Green).bold()
        } else if is_selected {
            Style::default().fg(Color::Red).bold()
        } else {
            Style::default().fg(Color::DarkGray)
        }
    } else if is_selected {
        Style::default().fg(Color::Cyan).bold()
    } else {
        Style::default().fg(Color::Gray)
    }
}

fn render_options(
    frame: &mut Frame,
    area: Rect,
    question: &Question,
    selected: Option<usize>,
    submitted: bool,
) {
    let mut lines: Vec<Line> = Vec::with_capacity(question.options.len() * 2);

    for (index, option) in question.options.iter().enumerate() {
        let is_selected = selected == Some(index);
        let style = option_style(option, is_selected, question, submitted);
        let marker = if is_selected { ">" } else { " " };
        let label = OPTION_LABELS.get(index).copied().unwrap_or('-');

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{}. ", label), style),
            Span::styled(option.as_str(), style),
        ]));
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

fn render_feedback(frame: &mut Frame, area: Rect, question: &Question, answer: Option<&str>) {
    let line = match answer {
        Some(answer) if question.is_correct(answer) => {
            Line::from(Span::styled("Correct!", Style::default().fg(Color::Green).bold()))
        }
        _ => Line::from(vec![
            Span::styled("Incorrect. ", Style::default().fg(Color::Red).bold()),
            Span::styled(
                format!("Correct answer: {}", question.correct_answer),
                Style::default().fg(Color::Gray),
            ),
        ]),
    };
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}
