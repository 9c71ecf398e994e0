//! Application state and core logic

use crate::analytics::{AnalyticsSink, Ga4Sink, TracingSink};
use crate::config::AppConfig;
use crate::controller::{Activity, Collaborators, Completion, FormController};
use crate::error::FormError;
use crate::state::{AppState, FocusTarget, SystemClock, FINAL_ENTRY_STEP};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Main application struct
pub struct App {
    /// Host state (inputs and focus)
    pub state: AppState,
    /// The form controller
    pub controller: FormController,
    /// Whether the app should quit
    quit: bool,
    completions: broadcast::Receiver<Completion>,
    /// Set once a completion notification arrives
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl App {
    /// Build the controller from configuration
    pub fn new(config: &AppConfig) -> Result<Self> {
        let analytics: Box<dyn AnalyticsSink> = match config.ga4_credentials() {
            Some((measurement_id, api_secret)) => {
                tracing::info!(measurement_id, "Sending analytics to GA4");
                Box::new(Ga4Sink::new(measurement_id, api_secret))
            }
            None => Box::new(TracingSink),
        };

        let controller = FormController::init(
            &config.init_config(),
            Collaborators {
                analytics,
                endpoint: None,
                clock: Arc::new(SystemClock),
                context: config.submission_context(),
            },
        )?;

        Ok(Self::with_controller(controller))
    }

    pub fn with_controller(controller: FormController) -> Self {
        let completions = controller.subscribe();
        let mut state = AppState::default();
        state.enter_step(controller.current_step());
        Self {
            state,
            controller,
            quit: false,
            completions,
            completed_at: None,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// A step transition is animating
    pub fn is_animating(&self) -> bool {
        self.controller.transition().is_some()
    }

    /// Fire due timers and follow step changes
    pub fn tick(&mut self) {
        self.controller.tick();

        let step = self.controller.current_step();
        if step != self.state.shown_step {
            self.state.enter_step(step);
        }

        while let Ok(completion) = self.completions.try_recv() {
            tracing::info!(
                submitted_at = %completion.submitted_at,
                "Credit report request completed"
            );
            self.completed_at = Some(completion.submitted_at);
        }
    }

    /// Leave the app, reporting abandonment if the form is unfinished
    pub fn quit(&mut self) {
        self.controller.page_unload();
        self.quit = true;
    }

    /// The terminal lost focus
    pub fn handle_focus_lost(&mut self) {
        self.controller.page_hidden();
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
        {
            self.quit();
            return;
        }

        if self.controller.current_step().is_terminal() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Char('q')) {
                self.quit();
            }
            return;
        }

        self.controller.record_activity(Activity::Keystroke);

        // Input is locked while a step slides or a submit is queued
        if self.is_animating() || self.state.pending_submit {
            return;
        }

        let focused = self.state.focused();
        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.state.next_focus();
                self.track_focus();
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.state.prev_focus();
                self.track_focus();
            }
            KeyCode::Enter => self.continue_step(),
            KeyCode::Char(' ')
                if matches!(
                    focused,
                    Some(FocusTarget::Option(..) | FocusTarget::Channel(_))
                ) =>
            {
                self.activate(focused);
            }
            KeyCode::Char(c) => {
                if let Some(id) = focused.and_then(FocusTarget::field) {
                    self.state.inputs.get_mut(id).push_char(c);
                    self.sync_field(id);
                }
            }
            KeyCode::Backspace => {
                if let Some(id) = focused.and_then(FocusTarget::field) {
                    self.state.inputs.get_mut(id).pop_char();
                    self.sync_field(id);
                }
            }
            _ => {}
        }
    }

    fn activate(&mut self, target: Option<FocusTarget>) {
        match target {
            Some(FocusTarget::Option(field, answer)) => {
                self.controller.select_option(field, answer);
            }
            Some(FocusTarget::Channel(channel)) => self.controller.toggle_channel(channel),
            _ => {}
        }
    }

    fn sync_field(&mut self, id: crate::state::FieldId) {
        let value = self.state.inputs.get(id).value().to_string();
        self.controller.set_field(id, &value);
    }

    fn track_focus(&mut self) {
        if let Some(id) = self.state.focused().and_then(FocusTarget::field) {
            let has_value = !self.state.inputs.get(id).value().is_empty();
            self.controller.track_field_focus(id, has_value);
        }
    }

    fn continue_step(&mut self) {
        let step = self.controller.current_step();
        if step == FINAL_ENTRY_STEP {
            self.state.pending_submit = true;
            return;
        }
        match self.controller.advance(step.number(), &self.state.inputs) {
            Ok(()) => {}
            // The controller already shows the message
            Err(FormError::Validation(_)) => {}
            Err(e) => tracing::warn!(error = %e, "Cannot advance"),
        }
    }

    /// Perform a queued submit. Runs after a draw so the busy label shows.
    pub async fn run_pending_submit(&mut self) {
        if !std::mem::take(&mut self.state.pending_submit) {
            return;
        }
        match self.controller.submit(&self.state.inputs).await {
            Ok(()) => tracing::info!("Form submitted"),
            Err(FormError::Validation(_)) => {}
            Err(e) => tracing::warn!(error = %e, "Submission failed"),
        }
    }
}
