//! Per-session step history and its derived views.
//!
//! A [`Journey`] is owned by exactly one transport session. It grows by
//! append and is only ever cleared as a whole.

use serde::Serialize;
use serde_json::Value;

use crate::core::processor::{StepResponse, build_response};
use crate::core::taxonomy::{Category, is_journey_opener};
use crate::core::types::StepRecord;
use crate::core::validator::{ValidationError, parse_step};

/// Separator used in label and category paths.
pub const PATH_SEPARATOR: &str = " → ";
const BRIEF_ELLIPSIS: &str = "...";

/// Tunables that shape responses but never the stored history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JourneyOptions {
    /// Characters of content kept in each summary brief.
    pub brief_chars: usize,
    /// Attach framework guidance to a first progress step.
    pub first_step_guidance: bool,
}

impl Default for JourneyOptions {
    fn default() -> Self {
        Self {
            brief_chars: 50,
            first_step_guidance: true,
        }
    }
}

/// Outcome of one accepted step.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    /// The stored record (after total-steps correction).
    pub record: StepRecord,
    /// True if this record started a fresh history.
    pub reset: bool,
    pub response: StepResponse,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepBrief {
    pub label: String,
    pub category: Category,
    pub step_number: u32,
    pub brief: String,
}

/// Read-only view of the current history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneySummary {
    pub journey_length: usize,
    pub category_journey: String,
    pub steps: Vec<StepBrief>,
}

#[derive(Debug, Clone, Default)]
pub struct Journey {
    steps: Vec<StepRecord>,
    options: JourneyOptions,
}

impl Journey {
    pub fn new(options: JourneyOptions) -> Self {
        Self {
            steps: Vec::new(),
            options,
        }
    }

    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn clear(&mut self) {
        self.steps.clear();
    }

    /// Validate `input`, apply the reset policy, append, and build the
    /// response. On error the history is untouched.
    pub fn submit(&mut self, input: &Value) -> Result<Submission, ValidationError> {
        let mut record = parse_step(input)?;
        record.correct_total_steps();

        let reset = record.step_number == 1 && is_journey_opener(&record.label);
        if reset {
            self.clear();
        }

        self.steps.push(record.clone());
        let response = build_response(&record, &self.steps, self.options.first_step_guidance);
        Ok(Submission {
            record,
            reset,
            response,
        })
    }

    pub fn label_path(&self) -> String {
        label_path(&self.steps)
    }

    pub fn category_path(&self) -> String {
        category_path(&self.steps)
    }

    pub fn summary(&self) -> JourneySummary {
        JourneySummary {
            journey_length: self.steps.len(),
            category_journey: self.category_path(),
            steps: self
                .steps
                .iter()
                .map(|step| StepBrief {
                    label: step.label.clone(),
                    category: step.category,
                    step_number: step.step_number,
                    brief: brief(&step.content, self.options.brief_chars),
                })
                .collect(),
        }
    }
}

/// Every label in insertion order.
pub fn label_path(steps: &[StepRecord]) -> String {
    steps
        .iter()
        .map(|step| step.label.as_str())
        .collect::<Vec<_>>()
        .join(PATH_SEPARATOR)
}

/// Categories with consecutive duplicates collapsed.
pub fn category_path(steps: &[StepRecord]) -> String {
    compress_categories(steps.iter().map(|step| step.category))
        .iter()
        .map(|category| category.as_str())
        .collect::<Vec<_>>()
        .join(PATH_SEPARATOR)
}

/// Keep the first category of each run.
pub fn compress_categories(categories: impl IntoIterator<Item = Category>) -> Vec<Category> {
    let mut out: Vec<Category> = Vec::new();
    for category in categories {
        if out.last() != Some(&category) {
            out.push(category);
        }
    }
    out
}

/// First `max_chars` characters of `content` followed by an ellipsis.
fn brief(content: &str, max_chars: usize) -> String {
    let mut out: String = content.chars().take(max_chars).collect();
    out.push_str(BRIEF_ELLIPSIS);
    out
}
