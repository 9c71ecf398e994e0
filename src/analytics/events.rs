//! Analytics events and their parameter maps

use crate::state::{FieldId, Step, TOTAL_STEPS};
use serde_json::{json, Map, Value};

/// Name reported as `form_name` on every event
pub const FORM_NAME: &str = "credit_report_form";

/// Category reported as `event_category` on every event
pub const EVENT_CATEGORY: &str = "Form Interaction";

/// Why the user left before finishing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbandonmentReason {
    /// The host lost focus
    PageHidden,
    /// The host is closing
    PageUnload,
    /// No activity for the idle window
    InactivityTimeout,
}

impl AbandonmentReason {
    pub fn as_str(self) -> &'static str {
        match self {
            AbandonmentReason::PageHidden => "page_hidden",
            AbandonmentReason::PageUnload => "page_unload",
            AbandonmentReason::InactivityTimeout => "inactivity_timeout",
        }
    }
}

/// A named usage event
#[derive(Debug, Clone, PartialEq)]
pub enum AnalyticsEvent {
    FormStart {
        step: Step,
        timestamp: String,
    },
    StepView {
        step: Step,
    },
    StepComplete {
        step: Step,
        duration_ms: u64,
    },
    ValidationError {
        step: Step,
        message: String,
    },
    FieldInteraction {
        field: FieldId,
        action: &'static str,
        step: Step,
        has_value: bool,
    },
    Submit {
        total_duration_ms: u64,
        completed_steps: u8,
        total_interactions: u64,
        engagement_score: u32,
    },
    Conversion {
        transaction_id: String,
    },
    CreditReportConversion {
        total_duration_ms: u64,
        user_type: &'static str,
        platform: String,
        has_federal_tax_id: &'static str,
        revenue_provided: bool,
        revenue_range: &'static str,
        engagement_score: u32,
    },
    Abandonment {
        step: Step,
        reason: AbandonmentReason,
        time_spent_ms: u64,
        engagement_score: u32,
    },
}

impl AnalyticsEvent {
    /// Event name as reported to the sink
    pub fn name(&self) -> &'static str {
        match self {
            AnalyticsEvent::FormStart { .. } => "form_start",
            AnalyticsEvent::StepView { .. } => "form_step_view",
            AnalyticsEvent::StepComplete { .. } => "form_step_complete",
            AnalyticsEvent::ValidationError { .. } => "form_validation_error",
            AnalyticsEvent::FieldInteraction { .. } => "form_field_interaction",
            AnalyticsEvent::Submit { .. } => "form_submit",
            AnalyticsEvent::Conversion { .. } => "conversion",
            AnalyticsEvent::CreditReportConversion { .. } => "credit_report_conversion",
            AnalyticsEvent::Abandonment { .. } => "form_abandonment",
        }
    }

    /// Parameter map, including the common category and form name
    pub fn params(&self) -> Map<String, Value> {
        let specific = match self {
            AnalyticsEvent::FormStart { step, timestamp } => json!({
                "step_number": step.number(),
                "step_name": step.name(),
                "timestamp": timestamp,
            }),
            AnalyticsEvent::StepView { step } => json!({
                "step_number": step.number(),
                "step_name": step.name(),
                "total_steps": TOTAL_STEPS,
                "progress_percentage": step.progress_percentage(),
            }),
            AnalyticsEvent::StepComplete { step, duration_ms } => json!({
                "step_number": step.number(),
                "step_name": step.name(),
                "step_duration_ms": duration_ms,
                "step_duration_seconds": (duration_ms + 500) / 1000,
                "completion_rate": step.progress_percentage(),
            }),
            AnalyticsEvent::ValidationError { step, message } => json!({
                "step_number": step.number(),
                "step_name": step.name(),
                "error_message": message,
                "error_type": "validation",
            }),
            AnalyticsEvent::FieldInteraction {
                field,
                action,
                step,
                has_value,
            } => json!({
                "field_name": field.id(),
                "action": action,
                "step_number": step.number(),
                "step_name": step.name(),
                "has_value": has_value,
            }),
            AnalyticsEvent::Submit {
                total_duration_ms,
                completed_steps,
                total_interactions,
                engagement_score,
            } => json!({
                "total_duration_ms": total_duration_ms,
                "total_duration_seconds": (total_duration_ms + 500) / 1000,
                "completed_steps": completed_steps,
                "total_interactions": total_interactions,
                "user_engagement_score": engagement_score,
            }),
            AnalyticsEvent::Conversion { transaction_id } => json!({
                "currency": "USD",
                "value": 1,
                "transaction_id": transaction_id,
            }),
            AnalyticsEvent::CreditReportConversion {
                total_duration_ms,
                user_type,
                platform,
                has_federal_tax_id,
                revenue_provided,
                revenue_range,
                engagement_score,
            } => json!({
                "total_duration_ms": total_duration_ms,
                "user_type": user_type,
                "platform": platform,
                "has_federal_tax_id": has_federal_tax_id,
                "revenue_provided": revenue_provided,
                "revenue_range": revenue_range,
                "completion_funnel": format!("{TOTAL_STEPS}/{TOTAL_STEPS}"),
                "user_engagement_score": engagement_score,
            }),
            AnalyticsEvent::Abandonment {
                step,
                reason,
                time_spent_ms,
                engagement_score,
            } => json!({
                "step_number": step.number(),
                "step_name": step.name(),
                "abandonment_reason": reason.as_str(),
                "time_spent_ms": time_spent_ms,
                "progress_percentage": step.progress_percentage(),
                "user_engagement_score": engagement_score,
            }),
        };

        let mut params = Map::new();
        params.insert("event_category".into(), EVENT_CATEGORY.into());
        params.insert("form_name".into(), FORM_NAME.into());
        if let Value::Object(specific) = specific {
            params.extend(specific);
        }
        params
    }
}
