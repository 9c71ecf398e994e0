//! UI module for rendering the TUI

mod components;
mod forms;
mod layout;

use crate::app::App;
use crate::controller::SUBMIT_ERROR_MESSAGE;
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let (header_area, main_area, status_area) = layout::create_layout(frame.area());

    layout::draw_header(frame, header_area, app);

    // Slide the step body while a transition runs
    let offset = layout::slide_offset(
        app.controller.transition(),
        app.controller.now(),
        main_area.width,
    );
    let step_area = layout::shifted_area(main_area, offset);
    if step_area.width > 2 {
        forms::draw_step(frame, step_area, app);
    }

    if let Some(message) = app.controller.error_message() {
        components::render_error_banner(frame, main_area, message, error_hint(message));
    }

    layout::draw_status_bar(frame, status_area, app);
}

/// What the user can do about the error on screen
fn error_hint(message: &str) -> &'static str {
    if message == SUBMIT_ERROR_MESSAGE {
        "Press Enter to try again"
    } else {
        "Fix the highlighted answer to continue"
    }
}
