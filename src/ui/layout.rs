//! Layout components (header, status bar, step slide)

use crate::app::App;
use crate::controller::Transition;
use crate::state::{Step, FINAL_ENTRY_STEP, TOTAL_STEPS};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};
use std::time::Instant;

/// Header height: title row, progress gauge and border
pub const HEADER_HEIGHT: u16 = 4;

/// Split the screen into header, step content and status bar
pub fn create_layout(area: Rect) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT), // Header
            Constraint::Min(0),                // Step content
            Constraint::Length(1),             // Status bar
        ])
        .split(area);

    (chunks[0], chunks[1], chunks[2])
}

/// Draw the title and progress through the form
pub fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let step = app.controller.current_step();

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let title = Line::from(vec![
        Span::styled(
            " BizCred ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Free Business Credit Report  "),
        Span::styled(step_counter(step), Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(title), rows[0]);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::Black))
        .ratio(f64::from(step.number()) / f64::from(TOTAL_STEPS))
        .label(format!("{}%", step.progress_percentage()));
    frame.render_widget(gauge, rows[1]);
}

/// "Step n of 5" while collecting input, "Complete" afterwards
fn step_counter(step: Step) -> String {
    if step.is_terminal() {
        "Complete".to_string()
    } else {
        format!("Step {} of {}", step.number(), FINAL_ENTRY_STEP.number())
    }
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let hints = get_step_hints(app.controller.current_step());
    let mut spans = vec![Span::styled(
        format!(" {hints}"),
        Style::default().fg(Color::Gray),
    )];

    if app.state.pending_submit || !app.controller.submit_enabled() {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            "Submitting...",
            Style::default().fg(Color::Yellow),
        ));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, area);

    let quit_hint = " Esc:quit ";
    let quit_area = Rect {
        x: area.x + area.width.saturating_sub(quit_hint.len() as u16),
        y: area.y,
        width: (quit_hint.len() as u16).min(area.width),
        height: 1,
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}

/// Get keyboard hints for the current step
fn get_step_hints(step: Step) -> &'static str {
    match step.number() {
        1 | 5 => "Tab:next  Shift+Tab:prev  Enter:continue",
        2 | 3 => "Tab:next  Space:choose  Enter:continue",
        4 => "Tab:next  Space:toggle  Enter:continue",
        _ => "Enter:exit",
    }
}

/// Horizontal offset of the step body during a transition.
///
/// The old step slides out to the left, the new one slides in from the right.
pub fn slide_offset(transition: Option<Transition>, now: Instant, width: u16) -> i32 {
    let Some(transition) = transition else {
        return 0;
    };
    let progress = transition.progress(now);
    let width = f32::from(width);
    match transition {
        Transition::Out { .. } => -(simple_easing::cubic_in(progress) * width) as i32,
        Transition::In { .. } => ((1.0 - simple_easing::cubic_out(progress)) * width) as i32,
    }
}

/// Shift `area` horizontally, clipping whatever leaves it
pub fn shifted_area(area: Rect, offset: i32) -> Rect {
    let shift = offset.unsigned_abs().min(u32::from(area.width)) as u16;
    if offset >= 0 {
        Rect {
            x: area.x + shift,
            width: area.width - shift,
            ..area
        }
    } else {
        Rect {
            width: area.width - shift,
            ..area
        }
    }
}
