//! Shared deterministic types for the step-sequence core.

use serde::Serialize;

use crate::core::taxonomy::Category;

/// Default pause duration (seconds) when a pause step does not supply one.
pub const DEFAULT_PAUSE_DURATION: u32 = 3;
/// Inclusive bounds for a caller-supplied pause duration.
pub const PAUSE_DURATION_RANGE: std::ops::RangeInclusive<u32> = 1..=10;

/// One validated step of a journey.
///
/// Only [`crate::core::validator::parse_step`] constructs these from caller
/// input, so every stored record has a label from the taxonomy, non-empty
/// content and positive step counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepRecord {
    pub label: String,
    pub content: String,
    pub step_number: u32,
    pub total_steps: u32,
    pub next_step_needed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_pause: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pause_duration: Option<u32>,
    /// Derived from `label`; never caller-supplied.
    pub category: Category,
}

impl StepRecord {
    /// Raise `total_steps` to `step_number` when the caller under-estimated.
    pub fn correct_total_steps(&mut self) {
        if self.step_number > self.total_steps {
            self.total_steps = self.step_number;
        }
    }

    /// Effective pause duration for the acknowledgment payload.
    pub fn effective_pause_duration(&self) -> u32 {
        self.pause_duration.unwrap_or(DEFAULT_PAUSE_DURATION)
    }
}

/// Closed set of response shapes, selected in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// Entry label: static framework description.
    Framework,
    /// Reflective pause acknowledgment.
    Pause,
    /// Terminal label with no further steps: ready to speak.
    Completion,
    /// Everything else.
    Progress,
}
