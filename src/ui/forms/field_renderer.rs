//! Field rendering utilities for forms

use crate::controller::validation::is_valid_email;
use crate::state::{FormField, InputKind};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// A typed email that would fail validation
pub fn is_invalid_email(field: &FormField) -> bool {
    field.kind == InputKind::Email && !field.value().is_empty() && !is_valid_email(field.value())
}

/// Draw a single-line input
pub fn draw_field(frame: &mut Frame, area: Rect, field: &FormField, is_active: bool) {
    let invalid = is_invalid_email(field);

    let border_color = match (invalid, is_active) {
        (true, _) => Color::Red,
        (false, true) => Color::Cyan,
        (false, false) => Color::DarkGray,
    };
    let text_style = if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let display_value = field.display_value();
    let mut spans = Vec::new();
    if field.kind == InputKind::Currency {
        spans.push(Span::styled("$ ", Style::default().fg(Color::DarkGray)));
    }
    if display_value.is_empty() && !is_active {
        spans.push(Span::styled("(empty)", Style::default().fg(Color::DarkGray)));
    } else {
        spans.push(Span::styled(display_value, text_style));
    }
    if is_active {
        spans.push(Span::styled("▌", Style::default().fg(Color::Cyan)));
    }

    let title = if invalid {
        format!(" {} (invalid) ", field.label)
    } else {
        format!(" {} ", field.label)
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::FieldId;

    #[test]
    fn test_empty_email_is_not_flagged() {
        let field = FormField::new(FieldId::Email);
        assert!(!is_invalid_email(&field));
    }

    #[test]
    fn test_malformed_email_is_flagged() {
        let mut field = FormField::new(FieldId::Email);
        field.set_value("ada@");
        assert!(is_invalid_email(&field));
        field.set_value("ada@example.com");
        assert!(!is_invalid_email(&field));
    }

    #[test]
    fn test_only_email_inputs_are_checked() {
        let mut field = FormField::new(FieldId::Company);
        field.set_value("not an email");
        assert!(!is_invalid_email(&field));
    }
}
