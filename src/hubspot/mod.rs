//! HubSpot forms API: payload, endpoint trait and HTTP client

mod client;
mod payload;
mod traits;

pub use client::{HubSpotClient, HubSpotConfig};
pub use payload::{hutk_from_cookie_header, SubmissionContext, SubmissionPayload};
pub use traits::SubmissionEndpoint;

#[cfg(test)]
pub use traits::MockSubmissionEndpoint;
