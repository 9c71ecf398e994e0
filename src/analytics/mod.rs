//! Analytics layer: named usage events and the sinks that receive them

mod engagement;
mod events;
mod sinks;

pub use engagement::EngagementTracker;
pub use events::{AbandonmentReason, AnalyticsEvent};
pub use sinks::{Ga4Sink, RecordingSink, TracingSink};

/// Receives analytics events. Fire-and-forget: nothing is returned and a
/// sink must never fail the caller.
#[cfg_attr(test, mockall::automock)]
pub trait AnalyticsSink: Send + Sync {
    fn track(&self, event: &AnalyticsEvent);
}
