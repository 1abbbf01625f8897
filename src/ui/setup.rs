use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::session::{PASS_PERCENTAGE, Screen, Session};

use super::{HostView, render_controls};

pub fn render(frame: &mut Frame, area: Rect, session: &Session, host: &HostView) {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(15),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "QUIZ TIME!",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from("This quiz is based on the contents of this page".fg(Color::DarkGray)),
        Line::from(host.page_ref.fg(Color::DarkGray)),
        Line::from(""),
        Line::from(Span::styled(
            format!("Score {}% to pass", PASS_PERCENTAGE),
            Style::default().fg(Color::White).bold(),
        )),
        Line::from(""),
    ];

    if let Some(error) = session.error() {
        content.push(Line::from(Span::styled(
            error,
            Style::default().fg(Color::Red).bold(),
        )));
        content.push(Line::from(""));
    }

    if session.is_loading() {
        content.push(Line::from(Span::styled(
            "Loading quiz...",
            Style::default().fg(Color::Yellow),
        )));
    } else if session.screen() == (Screen::Setup { customizing: true }) {
        content.extend(customization_lines(session));
    } else {
        content.push(Line::from(Span::styled(
            "ENTER",
            Style::default().fg(Color::Green).bold(),
        )));
        content.push(Line::from("to start".fg(Color::DarkGray)));
    }

    let widget = Paragraph::new(content)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Color::DarkGray),
        );
    frame.render_widget(widget, chunks[1]);

    let controls = if session.screen() == (Screen::Setup { customizing: true }) {
        "h/l questions  ·  t type  ·  enter start  ·  q quit"
    } else {
        "c customize  ·  enter start  ·  q quit"
    };
    render_controls(frame, chunks[3], controls);
}

fn customization_lines(session: &Session) -> Vec<Line<'static>> {
    let Some(options) = session.customization() else {
        return Vec::new();
    };
    let selected_count = session
        .overrides()
        .question_count
        .unwrap_or(options.defaults.question_count);

    let counts: Vec<Span> = options
        .allowed_counts
        .iter()
        .flat_map(|&count| {
            let style = if count == selected_count {
                Style::default().fg(Color::Cyan).bold()
            } else {
                Style::default().fg(Color::DarkGray)
            };
            [Span::styled(format!(" {} ", count), style), Span::raw(" ")]
        })
        .collect();

    let mut count_line = vec![Span::styled(
        "Number of Questions: ",
        Style::default().fg(Color::Gray),
    )];
    count_line.extend(counts);

    vec![
        Line::from(Span::styled(
            format!("{} words on this page", options.word_count),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(count_line),
        Line::from(vec![
            Span::styled("Type of Questions: ", Style::default().fg(Color::Gray)),
            Span::styled(
                session.question_type().to_string(),
                Style::default().fg(Color::Cyan).bold(),
            ),
        ]),
    ]
}
