//! Button component for TUI

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Button height in rows (top border + content + bottom border)
pub const BUTTON_HEIGHT: u16 = 3;

/// Render a generic button with border
pub fn render_button(
    frame: &mut Frame,
    area: Rect,
    content: &str,
    is_selected: bool,
    is_enabled: bool,
) {
    let border_style = if is_selected {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let text_style = if is_selected {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else if !is_enabled {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };

    let paragraph = Paragraph::new(format!(" {content} ")).style(text_style);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);

    frame.render_widget(paragraph.block(block), area);
}

/// Render the primary action of a step (continue or submit)
pub fn render_action_button(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    is_selected: bool,
    is_enabled: bool,
) {
    let color = if is_enabled { Color::Green } else { Color::DarkGray };
    let border_style = if is_selected {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(color)
    };
    let mut text_style = Style::default().fg(color).add_modifier(Modifier::BOLD);
    if is_selected && is_enabled {
        text_style = text_style.add_modifier(Modifier::REVERSED);
    }

    let paragraph = Paragraph::new(format!(" {label} → ")).style(text_style);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);

    frame.render_widget(paragraph.block(block), area);
}

/// Marker for a choice: radio for single choice, checkbox for multi choice
pub fn choice_marker(is_checked: bool, multi: bool) -> &'static str {
    match (multi, is_checked) {
        (false, true) => "(●)",
        (false, false) => "( )",
        (true, true) => "[x]",
        (true, false) => "[ ]",
    }
}

/// Render a selectable option as a bordered button
pub fn render_option_button(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    is_checked: bool,
    is_selected: bool,
    multi: bool,
) {
    let content = format!("{} {label}", choice_marker(is_checked, multi));
    render_button(frame, area, &content, is_selected || is_checked, true);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_marker() {
        assert_eq!(choice_marker(true, false), "(●)");
        assert_eq!(choice_marker(false, false), "( )");
        assert_eq!(choice_marker(true, true), "[x]");
        assert_eq!(choice_marker(false, true), "[ ]");
    }
}
