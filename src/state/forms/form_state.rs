//! The form-state record collected across the steps

use serde::{Deserialize, Serialize};

/// Platforms offered as selling channels
pub const CHANNEL_OPTIONS: &[&str] = &[
    "Amazon",
    "Shopify",
    "eBay",
    "Etsy",
    "Walmart",
    "WooCommerce",
];

/// Answer to a single-choice question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Answer {
    Yes,
    No,
    Unknown,
}

impl Answer {
    pub const ALL: [Answer; 3] = [Answer::Yes, Answer::No, Answer::Unknown];

    pub fn as_str(self) -> &'static str {
        match self {
            Answer::Yes => "yes",
            Answer::No => "no",
            Answer::Unknown => "unknown",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Answer::Yes => "Yes",
            Answer::No => "No",
            Answer::Unknown => "Not sure",
        }
    }
}

/// Single-choice groups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceField {
    FederalTaxId,
    SellsOnline,
}

impl ChoiceField {
    pub fn options(self) -> &'static [Answer] {
        match self {
            ChoiceField::FederalTaxId => &Answer::ALL,
            ChoiceField::SellsOnline => &[Answer::Yes, Answer::No],
        }
    }
}

/// Insertion-ordered set of selected channels
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SellingChannels(Vec<String>);

impl SellingChannels {
    /// Add the channel if absent, remove it if present
    pub fn toggle(&mut self, channel: &str) {
        if let Some(pos) = self.0.iter().position(|c| c == channel) {
            self.0.remove(pos);
        } else {
            self.0.push(channel.to_string());
        }
    }

    pub fn contains(&self, channel: &str) -> bool {
        self.0.iter().any(|c| c == channel)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn joined(&self, separator: &str) -> String {
        self.0.join(separator)
    }
}

/// Everything the user has entered so far
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormState {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub has_federal_tax_id: Option<Answer>,
    pub sells_online: Option<Answer>,
    pub selling_channels: SellingChannels,
    pub other_channel_text: String,
    /// Digits only
    pub monthly_revenue_raw: String,
}

impl FormState {
    pub fn choice(&self, field: ChoiceField) -> Option<Answer> {
        match field {
            ChoiceField::FederalTaxId => self.has_federal_tax_id,
            ChoiceField::SellsOnline => self.sells_online,
        }
    }

    /// Answer as submitted, empty when unanswered
    pub fn choice_str(&self, field: ChoiceField) -> &'static str {
        self.choice(field).map(Answer::as_str).unwrap_or("")
    }

    /// `online_seller` or `offline_business`
    pub fn user_type(&self) -> &'static str {
        if self.sells_online == Some(Answer::Yes) {
            "online_seller"
        } else {
            "offline_business"
        }
    }

    /// Channels, falling back to the free-text channel, then `not_specified`
    pub fn platform_summary(&self) -> String {
        if !self.selling_channels.is_empty() {
            self.selling_channels.joined(", ")
        } else if !self.other_channel_text.is_empty() {
            self.other_channel_text.clone()
        } else {
            "not_specified".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod selling_channels {
        use super::*;

        #[test]
        fn test_toggle_adds_then_removes() {
            let mut channels = SellingChannels::default();
            channels.toggle("Amazon");
            assert!(channels.contains("Amazon"));
            channels.toggle("Amazon");
            assert!(!channels.contains("Amazon"));
            assert!(channels.is_empty());
        }

        #[test]
        fn test_toggle_twice_restores_prior_state() {
            let mut channels = SellingChannels::default();
            channels.toggle("Shopify");
            channels.toggle("Etsy");
            let before = channels.clone();

            channels.toggle("eBay");
            channels.toggle("eBay");
            assert_eq!(channels, before);

            channels.toggle("Shopify");
            channels.toggle("Shopify");
            assert_eq!(channels.len(), before.len());
            assert!(channels.contains("Shopify"));
        }

        #[test]
        fn test_preserves_insertion_order() {
            let mut channels = SellingChannels::default();
            channels.toggle("Walmart");
            channels.toggle("Amazon");
            channels.toggle("Etsy");
            assert_eq!(channels.joined(";"), "Walmart;Amazon;Etsy");
        }
    }

    mod form_state {
        use super::*;

        #[test]
        fn test_default_is_empty() {
            let state = FormState::default();
            assert!(state.first_name.is_empty());
            assert!(state.has_federal_tax_id.is_none());
            assert!(state.sells_online.is_none());
            assert!(state.selling_channels.is_empty());
            assert_eq!(state.choice_str(ChoiceField::SellsOnline), "");
        }

        #[test]
        fn test_user_type() {
            let mut state = FormState::default();
            assert_eq!(state.user_type(), "offline_business");
            state.sells_online = Some(Answer::Yes);
            assert_eq!(state.user_type(), "online_seller");
        }

        #[test]
        fn test_platform_summary_fallbacks() {
            let mut state = FormState::default();
            assert_eq!(state.platform_summary(), "not_specified");

            state.other_channel_text = "Faire".to_string();
            assert_eq!(state.platform_summary(), "Faire");

            state.selling_channels.toggle("Amazon");
            state.selling_channels.toggle("eBay");
            assert_eq!(state.platform_summary(), "Amazon, eBay");
        }

        #[test]
        fn test_serializes_answers_lowercase() {
            let state = FormState {
                has_federal_tax_id: Some(Answer::Unknown),
                ..Default::default()
            };
            let json = serde_json::to_value(&state).unwrap();
            assert_eq!(json["hasFederalTaxId"], "unknown");
            assert_eq!(json["sellingChannels"], serde_json::json!([]));
        }
    }

    #[test]
    fn test_sells_online_offers_yes_no() {
        assert_eq!(ChoiceField::SellsOnline.options(), &[Answer::Yes, Answer::No]);
        assert_eq!(ChoiceField::FederalTaxId.options().len(), 3);
    }
}
