//! HubSpot forms API payload

use crate::state::{ChoiceField, FormState};
use serde::{Deserialize, Serialize};

/// Cookie carrying the HubSpot visitor token
pub const HUTK_COOKIE: &str = "hubspotutk";

/// One `{name, value}` pair of the submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionField {
    pub name: String,
    pub value: String,
}

impl SubmissionField {
    fn new(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            value: value.into(),
        }
    }
}

/// Context block identifying the visitor and page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionContext {
    pub hutk: String,
    pub page_uri: String,
    pub page_name: String,
}

/// Body posted to the HubSpot submit endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub fields: Vec<SubmissionField>,
    pub context: SubmissionContext,
}

impl SubmissionPayload {
    /// Map the record onto the HubSpot property names
    pub fn from_form(data: &FormState, context: SubmissionContext) -> Self {
        let fields = vec![
            SubmissionField::new("firstname", data.first_name.as_str()),
            SubmissionField::new("lastname", data.last_name.as_str()),
            SubmissionField::new("email", data.email.as_str()),
            SubmissionField::new("phone", data.phone.as_str()),
            SubmissionField::new("company", data.company.as_str()),
            SubmissionField::new(
                "federal_tax_id_available",
                data.choice_str(ChoiceField::FederalTaxId),
            ),
            SubmissionField::new("ecommerce_seller", data.choice_str(ChoiceField::SellsOnline)),
            SubmissionField::new("selling_channels__c", data.selling_channels.joined(";")),
            SubmissionField::new(
                "other_online_sales_channels",
                data.other_channel_text.as_str(),
            ),
            SubmissionField::new(
                "user_reported_monthly_revenue",
                data.monthly_revenue_raw.as_str(),
            ),
        ];
        Self { fields, context }
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }
}

/// Read the visitor token from a `Cookie` header value; empty when absent
pub fn hutk_from_cookie_header(cookies: &str) -> String {
    cookies
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == HUTK_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Answer;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample_state() -> FormState {
        let mut state = FormState {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            phone: "555-0100".into(),
            company: "Analytical Engines".into(),
            has_federal_tax_id: Some(Answer::Yes),
            sells_online: Some(Answer::Yes),
            other_channel_text: "Faire".into(),
            monthly_revenue_raw: "25000".into(),
            ..Default::default()
        };
        state.selling_channels.toggle("Amazon");
        state.selling_channels.toggle("Etsy");
        state
    }

    #[test]
    fn test_payload_json_shape() {
        let payload = SubmissionPayload::from_form(
            &sample_state(),
            SubmissionContext {
                hutk: "abc123".into(),
                page_uri: "https://bizcred.example/report".into(),
                page_name: "Credit Report".into(),
            },
        );

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value,
            json!({
                "fields": [
                    {"name": "firstname", "value": "Ada"},
                    {"name": "lastname", "value": "Lovelace"},
                    {"name": "email", "value": "ada@example.com"},
                    {"name": "phone", "value": "555-0100"},
                    {"name": "company", "value": "Analytical Engines"},
                    {"name": "federal_tax_id_available", "value": "yes"},
                    {"name": "ecommerce_seller", "value": "yes"},
                    {"name": "selling_channels__c", "value": "Amazon;Etsy"},
                    {"name": "other_online_sales_channels", "value": "Faire"},
                    {"name": "user_reported_monthly_revenue", "value": "25000"}
                ],
                "context": {
                    "hutk": "abc123",
                    "pageUri": "https://bizcred.example/report",
                    "pageName": "Credit Report"
                }
            })
        );
    }

    #[test]
    fn test_unanswered_choices_submit_empty() {
        let payload =
            SubmissionPayload::from_form(&FormState::default(), SubmissionContext::default());
        assert_eq!(payload.field("federal_tax_id_available"), Some(""));
        assert_eq!(payload.field("selling_channels__c"), Some(""));
        assert_eq!(payload.field("missing"), None);
    }

    #[test]
    fn test_hutk_from_cookie_header() {
        assert_eq!(
            hutk_from_cookie_header("a=1; hubspotutk=tok123; b=2"),
            "tok123"
        );
        assert_eq!(hutk_from_cookie_header("hubspotutk=only"), "only");
    }

    #[test]
    fn test_hutk_absent_is_empty() {
        assert_eq!(hutk_from_cookie_header(""), "");
        assert_eq!(hutk_from_cookie_header("a=1; b=2"), "");
        assert_eq!(hutk_from_cookie_header("xhubspotutk=nope"), "");
    }
}
