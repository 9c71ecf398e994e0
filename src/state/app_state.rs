//! Terminal host state: input buffers and keyboard focus

use super::{Answer, ChoiceField, FieldId, FieldInputs, Step, CHANNEL_OPTIONS, FINAL_ENTRY_STEP};

/// Something on a step that can hold keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    /// A text input
    Field(FieldId),
    /// One option of a single-choice group
    Option(ChoiceField, Answer),
    /// A selling channel checkbox
    Channel(&'static str),
    /// The continue (or submit) button
    Continue,
}

impl FocusTarget {
    pub fn field(self) -> Option<FieldId> {
        match self {
            FocusTarget::Field(id) => Some(id),
            _ => None,
        }
    }
}

/// Focus order for a step
pub fn focus_targets(step: Step) -> Vec<FocusTarget> {
    let mut targets = match step.number() {
        1 => vec![
            FocusTarget::Field(FieldId::FirstName),
            FocusTarget::Field(FieldId::LastName),
            FocusTarget::Field(FieldId::Email),
            FocusTarget::Field(FieldId::Phone),
        ],
        2 => std::iter::once(FocusTarget::Field(FieldId::Company))
            .chain(choice_targets(ChoiceField::FederalTaxId))
            .collect(),
        3 => choice_targets(ChoiceField::SellsOnline).collect(),
        4 => CHANNEL_OPTIONS
            .iter()
            .map(|c| FocusTarget::Channel(*c))
            .chain(std::iter::once(FocusTarget::Field(FieldId::OtherPlatform)))
            .collect(),
        5 => vec![FocusTarget::Field(FieldId::MonthlyRevenue)],
        _ => return Vec::new(),
    };
    targets.push(FocusTarget::Continue);
    targets
}

fn choice_targets(field: ChoiceField) -> impl Iterator<Item = FocusTarget> {
    field
        .options()
        .iter()
        .map(move |answer| FocusTarget::Option(field, *answer))
}

/// Label of the continue button on a step
pub fn continue_label(step: Step) -> &'static str {
    if step == FINAL_ENTRY_STEP {
        "Get My Report"
    } else {
        "Continue"
    }
}

/// Host-side state that the controller does not own
#[derive(Debug, Default)]
pub struct AppState {
    /// Input buffers the controller reads when validating
    pub inputs: FieldInputs,
    /// Step the focus list was built for
    pub shown_step: Step,
    /// Index into `focus_targets(shown_step)`
    pub active_focus: usize,
    /// Submit requested; performed after the next draw
    pub pending_submit: bool,
}

impl AppState {
    pub fn targets(&self) -> Vec<FocusTarget> {
        focus_targets(self.shown_step)
    }

    pub fn focused(&self) -> Option<FocusTarget> {
        self.targets().get(self.active_focus).copied()
    }

    /// Move to next focus target
    pub fn next_focus(&mut self) {
        let count = self.targets().len();
        if count > 0 {
            self.active_focus = (self.active_focus + 1) % count;
        }
    }

    /// Move to previous focus target
    pub fn prev_focus(&mut self) {
        let count = self.targets().len();
        if count == 0 {
            return;
        }
        if self.active_focus == 0 {
            self.active_focus = count - 1;
        } else {
            self.active_focus -= 1;
        }
    }

    /// Rebuild focus for a newly shown step
    pub fn enter_step(&mut self, step: Step) {
        self.shown_step = step;
        self.active_focus = 0;
    }

    pub fn is_focused(&self, target: FocusTarget) -> bool {
        self.focused() == Some(target)
    }
}
