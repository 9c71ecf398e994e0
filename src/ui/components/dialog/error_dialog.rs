//! Error banner overlay

use super::base::{render_dialog, DialogConfig};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Span,
    Frame,
};

/// Render a validation or submission error over the top of `area`.
///
/// The controller clears the message on a timer, so there is nothing to
/// dismiss by hand.
pub fn render_error_banner(frame: &mut Frame, area: Rect, error_message: &str, hint: &str) {
    let hint = vec![Span::styled(
        hint.to_string(),
        Style::default().fg(Color::DarkGray),
    )];

    render_dialog(
        frame,
        area,
        DialogConfig {
            title: "Error",
            title_color: Color::Red,
            border_color: Color::Red,
            message: error_message,
            hint: Some(hint),
            max_width: 60,
        },
    );
}
