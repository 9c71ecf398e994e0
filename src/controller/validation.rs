//! Per-step validation rules and value formatting helpers

use crate::state::{ChoiceField, FieldId, FieldReader, FormState, Step};
use regex::Regex;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid")
});

/// Strip every non-digit character
pub fn clean_currency(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// Group digits in thousands (`"123456"` -> `"123,456"`), dropping leading zeros
pub fn format_currency(value: &str) -> String {
    let cleaned = clean_currency(value);
    if cleaned.is_empty() {
        return String::new();
    }

    let digits = cleaned.trim_start_matches('0');
    let digits = if digits.is_empty() { "0" } else { digits };

    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Loose email check: something@something.something, no whitespace
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

/// Revenue bucket reported with conversions
pub fn revenue_range(revenue: &str) -> &'static str {
    if revenue.is_empty() {
        return "not_provided";
    }
    let amount = revenue.parse::<u64>().unwrap_or(u64::MAX);
    match amount {
        0..=999 => "under_1k",
        1_000..=4_999 => "1k_5k",
        5_000..=9_999 => "5k_10k",
        10_000..=24_999 => "10k_25k",
        25_000..=49_999 => "25k_50k",
        50_000..=99_999 => "50k_100k",
        _ => "over_100k",
    }
}

/// True when the digit string denotes an amount greater than zero
fn is_positive_amount(digits: &str) -> bool {
    digits.bytes().any(|b| b != b'0')
}

/// Check the required fields of `step`.
///
/// Text inputs are read through `fields`; selections come from the record.
/// Returns the user-facing message of the first failing rule.
pub fn check_step(step: Step, fields: &impl FieldReader, data: &FormState) -> Result<(), &'static str> {
    match step.number() {
        1 => {
            let email = fields.value(FieldId::Email);
            if fields.value(FieldId::FirstName).trim().is_empty() {
                return Err("Please enter your first name");
            }
            if fields.value(FieldId::LastName).trim().is_empty() {
                return Err("Please enter your last name");
            }
            if email.trim().is_empty() {
                return Err("Please enter your email");
            }
            if !is_valid_email(&email) {
                return Err("Please enter a valid email address");
            }
            if fields.value(FieldId::Phone).trim().is_empty() {
                return Err("Please enter your phone number");
            }
            Ok(())
        }
        2 => {
            if fields.value(FieldId::Company).trim().is_empty() {
                return Err("Please enter your company name");
            }
            if data.choice(ChoiceField::FederalTaxId).is_none() {
                return Err("Please select if you have a Federal Tax ID");
            }
            Ok(())
        }
        3 => {
            if data.choice(ChoiceField::SellsOnline).is_none() {
                return Err("Please select if you sell online");
            }
            Ok(())
        }
        4 => {
            if data.selling_channels.is_empty() && data.other_channel_text.trim().is_empty() {
                return Err("Please select where you primarily sell");
            }
            Ok(())
        }
        5 => {
            let revenue = clean_currency(&fields.value(FieldId::MonthlyRevenue));
            if !is_positive_amount(&revenue) {
                return Err("Please enter your monthly revenue");
            }
            Ok(())
        }
        _ => Ok(()),
    }
}
