//! Form field value objects and the field reader capability

use crate::controller::validation::{clean_currency, format_currency};
use std::collections::HashMap;

/// Stable identifiers of the text inputs the form reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    FirstName,
    LastName,
    Email,
    Phone,
    Company,
    OtherPlatform,
    MonthlyRevenue,
}

impl FieldId {
    pub const ALL: [FieldId; 7] = [
        FieldId::FirstName,
        FieldId::LastName,
        FieldId::Email,
        FieldId::Phone,
        FieldId::Company,
        FieldId::OtherPlatform,
        FieldId::MonthlyRevenue,
    ];

    /// Host identifier of the input
    pub fn id(self) -> &'static str {
        match self {
            FieldId::FirstName => "first-name",
            FieldId::LastName => "last-name",
            FieldId::Email => "email",
            FieldId::Phone => "phone",
            FieldId::Company => "company-name",
            FieldId::OtherPlatform => "other-platform",
            FieldId::MonthlyRevenue => "monthly-revenue",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FieldId::FirstName => "First Name",
            FieldId::LastName => "Last Name",
            FieldId::Email => "Email",
            FieldId::Phone => "Phone",
            FieldId::Company => "Company Name",
            FieldId::OtherPlatform => "Other",
            FieldId::MonthlyRevenue => "Monthly Revenue ($)",
        }
    }

    pub fn kind(self) -> InputKind {
        match self {
            FieldId::Email => InputKind::Email,
            FieldId::MonthlyRevenue => InputKind::Currency,
            _ => InputKind::Text,
        }
    }
}

/// Reads the current raw value of an input.
///
/// The controller validates through this capability so the rules can be
/// exercised without a terminal.
pub trait FieldReader {
    fn value(&self, field: FieldId) -> String;
}

/// How an input accepts and displays characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Email,
    /// Digits only, displayed thousands-grouped
    Currency,
}

/// A single editable input
#[derive(Debug, Clone)]
pub struct FormField {
    pub id: FieldId,
    pub label: &'static str,
    pub kind: InputKind,
    value: String,
}

impl FormField {
    pub fn new(id: FieldId) -> Self {
        Self {
            id,
            label: id.label(),
            kind: id.kind(),
            value: String::new(),
        }
    }

    /// Raw value as handed to the controller
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: &str) {
        self.value = match self.kind {
            InputKind::Currency => clean_currency(value),
            _ => value.to_string(),
        };
    }

    /// Push a character; currency inputs drop anything but digits
    pub fn push_char(&mut self, c: char) {
        match self.kind {
            InputKind::Currency => {
                if c.is_ascii_digit() {
                    self.value.push(c);
                }
            }
            _ => self.value.push(c),
        }
    }

    pub fn pop_char(&mut self) {
        self.value.pop();
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    /// Value for rendering
    pub fn display_value(&self) -> String {
        match self.kind {
            InputKind::Currency => format_currency(&self.value),
            _ => self.value.clone(),
        }
    }
}

/// The full set of inputs owned by the terminal host
#[derive(Debug, Clone)]
pub struct FieldInputs {
    fields: Vec<FormField>,
}

impl FieldInputs {
    pub fn new() -> Self {
        Self {
            fields: FieldId::ALL.iter().copied().map(FormField::new).collect(),
        }
    }

    pub fn get(&self, id: FieldId) -> &FormField {
        // ALL covers every variant, so the lookup cannot miss
        self.fields
            .iter()
            .find(|f| f.id == id)
            .unwrap_or(&self.fields[0])
    }

    pub fn get_mut(&mut self, id: FieldId) -> &mut FormField {
        let idx = self.fields.iter().position(|f| f.id == id).unwrap_or(0);
        &mut self.fields[idx]
    }
}

impl Default for FieldInputs {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldReader for FieldInputs {
    fn value(&self, field: FieldId) -> String {
        self.get(field).value().to_string()
    }
}

/// In-memory field values, for driving the controller without a host
#[derive(Debug, Clone, Default)]
pub struct MemoryFields {
    values: HashMap<FieldId, String>,
}

#[allow(dead_code)]
impl MemoryFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: FieldId, value: &str) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: FieldId, value: &str) {
        self.values.insert(field, value.to_string());
    }
}

impl FieldReader for MemoryFields {
    fn value(&self, field: FieldId) -> String {
        self.values.get(&field).cloned().unwrap_or_default()
    }
}
