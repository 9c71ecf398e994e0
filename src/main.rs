//! BizCred TUI - business credit report request form
//!
//! A Ratatui-based multi-step lead-capture form that submits to the
//! HubSpot forms API and reports usage analytics.

mod analytics;
mod app;
mod config;
mod controller;
mod error;
mod hubspot;
mod logging;
mod state;
mod ui;

use anyhow::Result;
use app::App;
use config::AppConfig;
use crossterm::{
    event::{self, DisableFocusChange, EnableFocusChange, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;
    let logging = logging::init_logging(&config, &AppConfig::logs_dir())?;
    tracing::info!(log_file = %logging.log_file_path.display(), "Starting bizcred-tui");

    // Bad endpoint ids fail here, before the terminal is taken over
    let mut app = App::new(&config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableFocusChange)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableFocusChange
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!(error = %err, "Exited with error");
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }

    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    loop {
        app.tick();

        terminal.draw(|frame| ui::draw(frame, app))?;

        // The busy label is on screen now; send the form
        if app.state.pending_submit {
            app.run_pending_submit().await;
            continue;
        }

        // Faster polling while a step slides (16ms = ~60fps)
        let poll_duration = if app.is_animating() {
            Duration::from_millis(16)
        } else {
            Duration::from_millis(100)
        };

        if event::poll(poll_duration)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::FocusLost => app.handle_focus_lost(),
                _ => {}
            }
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}
