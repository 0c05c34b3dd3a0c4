use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Submission;

/// Minimum justification length, counted in chars after trimming.
pub const MIN_JUSTIFICATION_CHARS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationError {
    #[error("Select at least one action before committing")]
    NoActionSelected,

    #[error("Justification must be at least 20 characters")]
    JustificationTooShort,
}

impl ValidationError {
    /// Stable reason code reported to callers.
    pub fn reason(&self) -> &'static str {
        match self {
            ValidationError::NoActionSelected => "no_action_selected",
            ValidationError::JustificationTooShort => "justification_too_short",
        }
    }
}

/// Actions picked in the task workspace plus the free-text rationale.
///
/// The selection is a set; it is submitted as a list in ascending id order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionSet {
    pub selected_action_ids: BTreeSet<String>,
    pub justification: String,
}

impl DecisionSet {
    /// Flips membership of `action_id`. Returns whether it is now selected.
    pub fn toggle(&mut self, action_id: &str) -> bool {
        if self.selected_action_ids.remove(action_id) {
            false
        } else {
            self.selected_action_ids.insert(action_id.to_string());
            true
        }
    }

    pub fn set_justification(&mut self, text: impl Into<String>) {
        self.justification = text.into();
    }

    pub fn selected_count(&self) -> usize {
        self.selected_action_ids.len()
    }

    /// Wire form for the submit call. Does not validate.
    pub fn to_submission(&self) -> Submission {
        Submission {
            decisions: self.selected_action_ids.iter().cloned().collect(),
            justification: self.justification.clone(),
        }
    }
}

/// Checks a decision set before it may be submitted.
///
/// Rules, in order:
/// 1. at least one action selected
/// 2. trimmed justification of at least `MIN_JUSTIFICATION_CHARS`
///
/// Pure; the same input always yields the same verdict.
pub fn validate(decisions: &DecisionSet) -> Result<(), ValidationError> {
    if decisions.selected_action_ids.is_empty() {
        return Err(ValidationError::NoActionSelected);
    }
    if decisions.justification.trim().chars().count() < MIN_JUSTIFICATION_CHARS {
        return Err(ValidationError::JustificationTooShort);
    }
    Ok(())
}
