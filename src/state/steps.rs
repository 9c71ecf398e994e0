//! Step cursor for the multi-step form

use crate::error::FormError;

/// Total number of steps, including the terminal success step
pub const TOTAL_STEPS: u8 = 6;

/// Last step that collects input; submission validates this one
pub const FINAL_ENTRY_STEP: Step = Step(5);

/// A 1-based step index, always within `1..=TOTAL_STEPS`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Step(u8);

impl Step {
    pub const FIRST: Step = Step(1);
    pub const SUCCESS: Step = Step(TOTAL_STEPS);

    /// Create a step, failing fast on out-of-range numbers
    pub fn new(number: u8) -> Result<Self, FormError> {
        if (1..=TOTAL_STEPS).contains(&number) {
            Ok(Self(number))
        } else {
            Err(FormError::InvalidStep(number))
        }
    }

    pub fn number(self) -> u8 {
        self.0
    }

    /// Analytics name of the step
    pub fn name(self) -> &'static str {
        match self.0 {
            1 => "personal_info",
            2 => "company_info",
            3 => "online_sales",
            4 => "selling_platform",
            5 => "monthly_revenue",
            _ => "success",
        }
    }

    /// Heading shown above the step body
    pub fn title(self) -> &'static str {
        match self.0 {
            1 => "Tell us about yourself",
            2 => "About your business",
            3 => "Do you sell online?",
            4 => "Where do you primarily sell?",
            5 => "What is your average monthly revenue?",
            _ => "You're all set!",
        }
    }

    /// The following step, or `None` from the terminal step
    pub fn next(self) -> Option<Step> {
        Step::new(self.0 + 1).ok()
    }

    pub fn is_terminal(self) -> bool {
        self.0 == TOTAL_STEPS
    }

    /// Share of the form reached at this step, formatted with one decimal
    pub fn progress_percentage(self) -> String {
        format!("{:.1}", f64::from(self.0) / f64::from(TOTAL_STEPS) * 100.0)
    }

    /// Iterate over every step in order
    pub fn all() -> impl Iterator<Item = Step> {
        (1..=TOTAL_STEPS).map(Step)
    }
}

impl Default for Step {
    fn default() -> Self {
        Self::FIRST
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "step-{}", self.0)
    }
}
