//! Form domain layer
//!
//! Type-safe form handling: the collected record, the editable inputs the
//! terminal owns, and the reader capability the controller validates through.

mod field;
mod form_state;

pub use field::{FieldId, FieldInputs, FieldReader, FormField, InputKind, MemoryFields};
pub use form_state::{Answer, ChoiceField, FormState, CHANNEL_OPTIONS};
