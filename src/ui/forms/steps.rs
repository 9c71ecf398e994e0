//! Step body rendering

use super::field_renderer::draw_field;
use crate::app::App;
use crate::state::{
    continue_label, Answer, ChoiceField, FieldId, FocusTarget, Step, CHANNEL_OPTIONS,
};
use crate::ui::components::{render_action_button, render_option_button, BUTTON_HEIGHT};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

const FIELD_HEIGHT: u16 = 3;
const OPTION_WIDTH: u16 = 18;

/// Draw the body of the current step inside a titled frame
pub fn draw_step(frame: &mut Frame, area: Rect, app: &App) {
    let step = app.state.shown_step;

    let block = Block::default()
        .title(format!(" {} ", step.title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let inner = Rect {
        x: inner.x + 1,
        width: inner.width.saturating_sub(2),
        ..inner
    };

    match step.number() {
        1 => draw_contact(frame, inner, app),
        2 => draw_company(frame, inner, app),
        3 => draw_sells_online(frame, inner, app),
        4 => draw_channels(frame, inner, app),
        5 => draw_revenue(frame, inner, app),
        _ => draw_success(frame, inner, app),
    }
}

fn draw_input(frame: &mut Frame, area: Rect, app: &App, id: FieldId) {
    draw_field(
        frame,
        area,
        app.state.inputs.get(id),
        app.state.is_focused(FocusTarget::Field(id)),
    );
}

fn draw_continue(frame: &mut Frame, area: Rect, app: &App, step: Step) {
    let busy = app.state.pending_submit || !app.controller.submit_enabled();
    let label = if busy { "Submitting..." } else { continue_label(step) };
    let width = (label.len() as u16 + 6).min(area.width);
    let button_area = Rect {
        width,
        height: BUTTON_HEIGHT.min(area.height),
        ..area
    };
    render_action_button(
        frame,
        button_area,
        label,
        app.state.is_focused(FocusTarget::Continue),
        !busy,
    );
}

fn draw_question(frame: &mut Frame, area: Rect, text: &str) {
    let line = Line::from(Span::styled(
        text.to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(Paragraph::new(line), area);
}

/// Single-choice options laid out in a row
fn draw_choice_row(frame: &mut Frame, area: Rect, app: &App, field: ChoiceField) {
    let options = field.options();
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            options
                .iter()
                .map(|_| Constraint::Length(OPTION_WIDTH))
                .chain(std::iter::once(Constraint::Min(0))),
        )
        .split(area);

    let chosen = app.controller.data().choice(field);
    for (idx, answer) in options.iter().enumerate() {
        render_option_button(
            frame,
            chunks[idx],
            answer.label(),
            chosen == Some(*answer),
            app.state.is_focused(FocusTarget::Option(field, *answer)),
            false,
        );
    }
}

fn draw_contact(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(FIELD_HEIGHT),  // First and last name
            Constraint::Length(FIELD_HEIGHT),  // Email
            Constraint::Length(FIELD_HEIGHT),  // Phone
            Constraint::Length(1),             // Spacer
            Constraint::Length(BUTTON_HEIGHT), // Continue
            Constraint::Min(0),
        ])
        .split(area);

    let names = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[0]);

    draw_input(frame, names[0], app, FieldId::FirstName);
    draw_input(frame, names[1], app, FieldId::LastName);
    draw_input(frame, chunks[1], app, FieldId::Email);
    draw_input(frame, chunks[2], app, FieldId::Phone);
    draw_continue(frame, chunks[4], app, Step::FIRST);
}

fn draw_company(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(FIELD_HEIGHT),  // Company
            Constraint::Length(1),             // Spacer
            Constraint::Length(1),             // Question
            Constraint::Length(BUTTON_HEIGHT), // Options
            Constraint::Length(1),             // Spacer
            Constraint::Length(BUTTON_HEIGHT), // Continue
            Constraint::Min(0),
        ])
        .split(area);

    draw_input(frame, chunks[0], app, FieldId::Company);
    draw_question(frame, chunks[2], "Do you have a Federal Tax ID (EIN)?");
    draw_choice_row(frame, chunks[3], app, ChoiceField::FederalTaxId);
    draw_continue(frame, chunks[5], app, app.state.shown_step);
}

fn draw_sells_online(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),             // Question
            Constraint::Length(BUTTON_HEIGHT), // Options
            Constraint::Length(1),             // Spacer
            Constraint::Length(BUTTON_HEIGHT), // Continue
            Constraint::Min(0),
        ])
        .split(area);

    draw_question(frame, chunks[0], "Do you sell products or services online?");
    draw_choice_row(frame, chunks[1], app, ChoiceField::SellsOnline);
    draw_continue(frame, chunks[3], app, app.state.shown_step);
}

fn draw_channels(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),             // Hint
            Constraint::Length(BUTTON_HEIGHT), // Channels, first row
            Constraint::Length(BUTTON_HEIGHT), // Channels, second row
            Constraint::Length(FIELD_HEIGHT),  // Other
            Constraint::Length(1),             // Spacer
            Constraint::Length(BUTTON_HEIGHT), // Continue
            Constraint::Min(0),
        ])
        .split(area);

    draw_question(frame, chunks[0], "Select all that apply");

    let selected = &app.controller.data().selling_channels;
    for (row_idx, row) in CHANNEL_OPTIONS.chunks(3).enumerate() {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(OPTION_WIDTH),
                Constraint::Length(OPTION_WIDTH),
                Constraint::Length(OPTION_WIDTH),
                Constraint::Min(0),
            ])
            .split(chunks[1 + row_idx.min(1)]);
        for (idx, channel) in row.iter().enumerate() {
            render_option_button(
                frame,
                cells[idx],
                channel,
                selected.contains(channel),
                app.state.is_focused(FocusTarget::Channel(*channel)),
                true,
            );
        }
    }

    draw_input(frame, chunks[3], app, FieldId::OtherPlatform);
    draw_continue(frame, chunks[5], app, app.state.shown_step);
}

fn draw_revenue(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(FIELD_HEIGHT),  // Revenue
            Constraint::Length(1),             // Note
            Constraint::Length(1),             // Spacer
            Constraint::Length(BUTTON_HEIGHT), // Submit
            Constraint::Min(0),
        ])
        .split(area);

    let revenue_area = Rect {
        width: chunks[0].width.min(40),
        ..chunks[0]
    };
    draw_input(frame, revenue_area, app, FieldId::MonthlyRevenue);
    frame.render_widget(
        Paragraph::new(Span::styled(
            "An estimate is fine. Whole dollars only.",
            Style::default().fg(Color::DarkGray),
        )),
        chunks[1],
    );
    draw_continue(frame, chunks[3], app, app.state.shown_step);
}

fn draw_success(frame: &mut Frame, area: Rect, app: &App) {
    let data = app.controller.data();
    let greeting = if data.first_name.trim().is_empty() {
        "Thank you!".to_string()
    } else {
        format!("Thank you, {}!", data.first_name.trim())
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "✓",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            greeting,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from("Your business credit report request has been received."),
    ];
    if !data.email.trim().is_empty() {
        lines.push(Line::from(format!(
            "We'll send your report to {}.",
            data.email.trim()
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press Enter to exit",
        Style::default().fg(Color::DarkGray),
    )));

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}
