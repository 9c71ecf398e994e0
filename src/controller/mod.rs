//! Form controller: step navigation, validation and submission
//!
//! The controller owns the collected record and the step cursor. Hosts feed
//! it input through the field-change handlers, hand it a [`FieldReader`] when
//! validating, and call [`FormController::tick`] regularly so scheduled
//! timers (error dismissal, step transitions, inactivity) can fire.

pub mod validation;

use crate::analytics::{AbandonmentReason, AnalyticsEvent, AnalyticsSink, EngagementTracker};
use crate::config::InitConfig;
use crate::error::FormError;
use crate::hubspot::{
    HubSpotClient, HubSpotConfig, SubmissionContext, SubmissionEndpoint, SubmissionPayload,
};
use crate::state::{
    Answer, ChoiceField, Clock, FieldId, FieldReader, FormState, Scheduler, Step, TimerToken,
    FINAL_ENTRY_STEP,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::broadcast;
use validation::{check_step, clean_currency, revenue_range};

/// How long a validation or submission error stays visible
pub const ERROR_DISPLAY: Duration = Duration::from_secs(3);

/// Outgoing half of the step transition
pub const TRANSITION_OUT: Duration = Duration::from_millis(300);

/// Incoming half of the step transition
pub const TRANSITION_IN: Duration = Duration::from_millis(50);

/// Idle window after which the form counts as abandoned
pub const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Message shown when the submission endpoint fails
pub const SUBMIT_ERROR_MESSAGE: &str = "Could not submit the form. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerKind {
    DismissError,
    TransitionOut { to: Step },
    TransitionIn,
    Inactivity,
}

/// Visual phase of a step change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The previous step is sliding out
    Out { from: Step, to: Step, started: Instant },
    /// The new step is sliding in
    In { step: Step, started: Instant },
}

impl Transition {
    /// Fraction of the current phase elapsed, in `0.0..=1.0`
    pub fn progress(&self, now: Instant) -> f32 {
        let (started, total) = match self {
            Transition::Out { started, .. } => (*started, TRANSITION_OUT),
            Transition::In { started, .. } => (*started, TRANSITION_IN),
        };
        let elapsed = now.saturating_duration_since(started);
        (elapsed.as_secs_f32() / total.as_secs_f32()).clamp(0.0, 1.0)
    }
}

/// Kind of user activity, for engagement counting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Keystroke,
    Click,
}

/// Notification sent to listeners after a successful submission
#[derive(Debug, Clone)]
pub struct Completion {
    pub data: FormState,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug)]
struct ErrorBanner {
    message: String,
    token: TimerToken,
}

/// External collaborators the controller composes with
pub struct Collaborators {
    pub analytics: Box<dyn AnalyticsSink>,
    /// `None` builds a [`HubSpotClient`] from the resolved configuration
    pub endpoint: Option<Box<dyn SubmissionEndpoint>>,
    pub clock: Arc<dyn Clock>,
    pub context: SubmissionContext,
}

/// Drives the user through the steps and performs the final submission
pub struct FormController {
    data: FormState,
    current: Step,
    hubspot: HubSpotConfig,
    context: SubmissionContext,
    analytics: Box<dyn AnalyticsSink>,
    endpoint: Box<dyn SubmissionEndpoint>,
    clock: Arc<dyn Clock>,
    timers: Scheduler<TimerKind>,
    step_started: HashMap<Step, Instant>,
    engagement: EngagementTracker,
    error: Option<ErrorBanner>,
    transition: Option<Transition>,
    inactivity: Option<TimerToken>,
    submit_enabled: bool,
    has_tracked_submission: bool,
    has_tracked_conversion: bool,
    completion_tx: broadcast::Sender<Completion>,
}

impl FormController {
    /// Resolve the endpoint, start tracking and show the first step.
    ///
    /// Malformed endpoint identifiers fail here instead of at submit time.
    pub fn init(config: &InitConfig, deps: Collaborators) -> Result<Self, FormError> {
        let hubspot = config.resolve()?;
        let endpoint: Box<dyn SubmissionEndpoint> = match deps.endpoint {
            Some(endpoint) => endpoint,
            None => Box::new(HubSpotClient::new(hubspot.clone())?),
        };
        let now = deps.clock.now();
        let (completion_tx, _) = broadcast::channel(8);

        tracing::info!(
            portal_id = %hubspot.portal_id,
            form_id = %hubspot.form_id,
            "Initializing credit report form"
        );

        let mut controller = Self {
            data: FormState::default(),
            current: Step::FIRST,
            hubspot,
            context: deps.context,
            analytics: deps.analytics,
            endpoint,
            clock: deps.clock,
            timers: Scheduler::new(),
            step_started: HashMap::new(),
            engagement: EngagementTracker::new(now),
            error: None,
            transition: None,
            inactivity: None,
            submit_enabled: true,
            has_tracked_submission: false,
            has_tracked_conversion: false,
            completion_tx,
        };

        controller.track(AnalyticsEvent::FormStart {
            step: Step::FIRST,
            timestamp: chrono::Utc::now().to_rfc3339(),
        });
        controller.reset_inactivity_timer();
        controller.show_step(Step::FIRST.number())?;
        Ok(controller)
    }

    // --- Accessors ---

    /// Read-only view of everything entered so far
    pub fn data(&self) -> &FormState {
        &self.data
    }

    pub fn current_step(&self) -> Step {
        self.current
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.message.as_str())
    }

    pub fn transition(&self) -> Option<Transition> {
        self.transition
    }

    pub fn submit_enabled(&self) -> bool {
        self.submit_enabled
    }

    pub fn hubspot_config(&self) -> &HubSpotConfig {
        &self.hubspot
    }

    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    /// Listen for successful submissions
    pub fn subscribe(&self) -> broadcast::Receiver<Completion> {
        self.completion_tx.subscribe()
    }

    // --- Navigation ---

    /// Make step `n` the visible step
    pub fn show_step(&mut self, n: u8) -> Result<(), FormError> {
        let step = Step::new(n)?;
        self.current = step;
        self.step_started.insert(step, self.clock.now());
        self.clear_error();
        tracing::debug!(step = n, name = step.name(), "Showing step");
        self.track(AnalyticsEvent::StepView { step });
        Ok(())
    }

    /// Check the required fields of `step`, reporting the first failure
    pub fn validate_step(&mut self, step: Step, fields: &impl FieldReader) -> bool {
        self.check(step, fields).is_ok()
    }

    fn check(&mut self, step: Step, fields: &impl FieldReader) -> Result<(), FormError> {
        match check_step(step, fields, &self.data) {
            Ok(()) => Ok(()),
            Err(message) => {
                tracing::debug!(step = step.number(), error = message, "Validation failed");
                self.track(AnalyticsEvent::ValidationError {
                    step,
                    message: message.to_string(),
                });
                self.raise_error(message);
                Err(FormError::Validation(message.to_string()))
            }
        }
    }

    /// Validate step `n` and start the transition to the following step
    pub fn advance(&mut self, n: u8, fields: &impl FieldReader) -> Result<(), FormError> {
        let step = Step::new(n)?;
        if self.transition.is_some() {
            return Err(FormError::TransitionInProgress);
        }
        if step != self.current {
            return Err(FormError::StepMismatch {
                requested: n,
                current: self.current.number(),
            });
        }
        let Some(next) = step.next() else {
            return Err(FormError::InvalidStep(n.saturating_add(1)));
        };
        if step == FINAL_ENTRY_STEP {
            return Err(FormError::SubmitRequired(n));
        }

        self.check(step, fields)?;

        let now = self.clock.now();
        let started = self.step_started.get(&step).copied().unwrap_or(now);
        self.track(AnalyticsEvent::StepComplete {
            step,
            duration_ms: duration_ms(now.saturating_duration_since(started)),
        });

        self.transition = Some(Transition::Out {
            from: step,
            to: next,
            started: now,
        });
        self.timers
            .schedule(now, TRANSITION_OUT, TimerKind::TransitionOut { to: next });
        Ok(())
    }

    // --- Field handlers ---

    /// Store the raw value of a text input
    pub fn set_field(&mut self, field: FieldId, value: &str) {
        let slot = match field {
            FieldId::FirstName => &mut self.data.first_name,
            FieldId::LastName => &mut self.data.last_name,
            FieldId::Email => &mut self.data.email,
            FieldId::Phone => &mut self.data.phone,
            FieldId::Company => &mut self.data.company,
            FieldId::OtherPlatform => &mut self.data.other_channel_text,
            FieldId::MonthlyRevenue => {
                self.data.monthly_revenue_raw = clean_currency(value);
                return;
            }
        };
        *slot = value.to_string();
    }

    /// Pick the single answer of a choice group
    pub fn select_option(&mut self, field: ChoiceField, answer: Answer) {
        match field {
            ChoiceField::FederalTaxId => self.data.has_federal_tax_id = Some(answer),
            ChoiceField::SellsOnline => self.data.sells_online = Some(answer),
        }
        self.record_activity(Activity::Click);
    }

    /// Add or remove a selling channel
    pub fn toggle_channel(&mut self, channel: &str) {
        self.data.selling_channels.toggle(channel);
        self.record_activity(Activity::Click);
    }

    /// Report that an input gained focus
    pub fn track_field_focus(&mut self, field: FieldId, has_value: bool) {
        self.track(AnalyticsEvent::FieldInteraction {
            field,
            action: "focus",
            step: self.current,
            has_value,
        });
    }

    // --- Submission ---

    /// Validate the last entry step and post the form once.
    ///
    /// On failure the error is shown, the submit affordance is re-enabled
    /// and the cursor stays where it was; nothing is retried.
    pub async fn submit(&mut self, fields: &impl FieldReader) -> Result<(), FormError> {
        if !self.submit_enabled {
            return Err(FormError::SubmissionInFlight);
        }
        if self.current != FINAL_ENTRY_STEP {
            return Err(FormError::StepMismatch {
                requested: FINAL_ENTRY_STEP.number(),
                current: self.current.number(),
            });
        }
        self.check(FINAL_ENTRY_STEP, fields)?;

        self.submit_enabled = false;
        self.track_submission();

        let payload = SubmissionPayload::from_form(&self.data, self.context.clone());
        tracing::info!(endpoint = %self.hubspot.endpoint(), "Submitting form");
        let result = self.endpoint.submit(&payload).await;
        self.submit_enabled = true;

        match result {
            Ok(()) => {
                self.track_conversion();
                self.show_step(Step::SUCCESS.number())?;
                self.cancel_inactivity_timer();
                let completion = Completion {
                    data: self.data.clone(),
                    submitted_at: chrono::Utc::now(),
                };
                if self.completion_tx.send(completion).is_err() {
                    tracing::debug!("No completion listeners");
                }
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Form submission failed");
                self.raise_error(SUBMIT_ERROR_MESSAGE);
                Err(e.into())
            }
        }
    }

    fn track_submission(&mut self) {
        if self.has_tracked_submission {
            return;
        }
        let now = self.clock.now();
        self.track(AnalyticsEvent::Submit {
            total_duration_ms: duration_ms(self.engagement.elapsed(now)),
            completed_steps: self.current.number(),
            total_interactions: self.engagement.total_interactions(),
            engagement_score: self.engagement.score(now, self.current),
        });
        self.has_tracked_submission = true;
    }

    fn track_conversion(&mut self) {
        if self.has_tracked_conversion {
            return;
        }
        let now = self.clock.now();
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        let transaction_id = format!(
            "cr_{}_{}",
            chrono::Utc::now().timestamp_millis(),
            &suffix[..9]
        );
        self.track(AnalyticsEvent::Conversion { transaction_id });
        self.track(AnalyticsEvent::CreditReportConversion {
            total_duration_ms: duration_ms(self.engagement.elapsed(now)),
            user_type: self.data.user_type(),
            platform: self.data.platform_summary(),
            has_federal_tax_id: self.data.choice_str(ChoiceField::FederalTaxId),
            revenue_provided: !self.data.monthly_revenue_raw.is_empty(),
            revenue_range: revenue_range(&self.data.monthly_revenue_raw),
            engagement_score: self.engagement.score(now, Step::SUCCESS),
        });
        self.has_tracked_conversion = true;
    }

    // --- Abandonment and activity ---

    /// Count an interaction and restart the inactivity window
    pub fn record_activity(&mut self, activity: Activity) {
        match activity {
            Activity::Keystroke => self.engagement.record_keystroke(),
            Activity::Click => self.engagement.record_click(),
        }
        if !self.current.is_terminal() {
            self.reset_inactivity_timer();
        }
    }

    /// The host lost visibility
    pub fn page_hidden(&mut self) {
        self.track_abandonment(AbandonmentReason::PageHidden);
    }

    /// The host is going away
    pub fn page_unload(&mut self) {
        self.track_abandonment(AbandonmentReason::PageUnload);
    }

    fn track_abandonment(&mut self, reason: AbandonmentReason) {
        if self.current.is_terminal() {
            return;
        }
        let now = self.clock.now();
        tracing::info!(step = self.current.number(), reason = reason.as_str(), "Form abandoned");
        self.track(AnalyticsEvent::Abandonment {
            step: self.current,
            reason,
            time_spent_ms: duration_ms(self.engagement.elapsed(now)),
            engagement_score: self.engagement.score(now, self.current),
        });
    }

    fn reset_inactivity_timer(&mut self) {
        self.cancel_inactivity_timer();
        let now = self.clock.now();
        self.inactivity = Some(
            self.timers
                .schedule(now, INACTIVITY_TIMEOUT, TimerKind::Inactivity),
        );
    }

    fn cancel_inactivity_timer(&mut self) {
        if let Some(token) = self.inactivity.take() {
            self.timers.cancel(token);
        }
    }

    // --- Timers ---

    /// Fire every timer that is due
    pub fn tick(&mut self) {
        let now = self.clock.now();
        for kind in self.timers.take_due(now) {
            match kind {
                TimerKind::DismissError => self.error = None,
                TimerKind::TransitionOut { to } => {
                    if let Err(e) = self.show_step(to.number()) {
                        tracing::warn!(error = %e, "Transition target rejected");
                    }
                    self.transition = Some(Transition::In {
                        step: to,
                        started: now,
                    });
                    self.timers
                        .schedule(now, TRANSITION_IN, TimerKind::TransitionIn);
                }
                TimerKind::TransitionIn => self.transition = None,
                TimerKind::Inactivity => {
                    self.inactivity = None;
                    self.track_abandonment(AbandonmentReason::InactivityTimeout);
                }
            }
        }
    }

    fn raise_error(&mut self, message: &str) {
        self.clear_error();
        let token = self
            .timers
            .schedule(self.clock.now(), ERROR_DISPLAY, TimerKind::DismissError);
        self.error = Some(ErrorBanner {
            message: message.to_string(),
            token,
        });
    }

    fn clear_error(&mut self) {
        if let Some(banner) = self.error.take() {
            self.timers.cancel(banner.token);
        }
    }

    fn track(&self, event: AnalyticsEvent) {
        self.analytics.track(&event);
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests;
