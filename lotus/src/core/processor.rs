//! Response-shape selection for an accepted step.
//!
//! [`select_kind`] is an ordered decision list (first match wins); the
//! builders only read the record and the history as of that record.

use serde::Serialize;
use serde_json::Value;

use crate::core::framework::{first_step_guidance, framework_payload};
use crate::core::journey::{category_path, label_path};
use crate::core::taxonomy::{BEGIN, COMPLETE, Category, EXPRESS, MEDITATE};
use crate::core::types::{ResponseKind, StepRecord};

pub const PAUSE_STATUS: &str = "PAUSE_COMPLETE";
pub const COMPLETION_STATUS: &str = "WISDOM_READY";
pub const PROGRESS_STATUS: &str = "processing";

const PAUSE_PROMPT: &str = "What insights emerged during the pause?";
const PAUSE_INSTRUCTION: &str = "Continue with what arose from stillness";
const EXPRESS_INSTRUCTION: &str = "NOW_SPEAK_THE_WISDOM_NATURALLY";
const COMPLETE_INSTRUCTION: &str = "PROCESS_COMPLETE_SPEAK_WISDOM";

/// Pick the response shape for `record`.
pub fn select_kind(record: &StepRecord) -> ResponseKind {
    match record.label.as_str() {
        BEGIN => ResponseKind::Framework,
        MEDITATE => ResponseKind::Pause,
        EXPRESS | COMPLETE if !record.next_step_needed => ResponseKind::Completion,
        _ => ResponseKind::Progress,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PauseResponse {
    pub status: &'static str,
    pub duration: u32,
    pub prompt: &'static str,
    pub instruction: &'static str,
    pub step_number: u32,
    pub total_steps: u32,
    pub journey: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionResponse {
    pub status: &'static str,
    pub process_complete: bool,
    pub final_step: String,
    pub instruction: &'static str,
    /// Reported total: the step number that completed the journey.
    pub total_steps: u32,
    pub journey_length: usize,
    pub final_journey: String,
    pub category_journey: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressResponse {
    pub status: &'static str,
    pub current_step: String,
    pub category: Category,
    pub journey: String,
    pub category_journey: String,
    pub step_number: u32,
    pub total_steps: u32,
    pub next_step_needed: bool,
    pub process_length: usize,
    /// Presentation-only teaching; absent unless this is the first record of the session.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guidance: Option<Value>,
}

/// Structured result of one accepted step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StepResponse {
    Framework(Value),
    Pause(PauseResponse),
    Completion(CompletionResponse),
    Progress(ProgressResponse),
}

impl StepResponse {
    pub fn kind(&self) -> ResponseKind {
        match self {
            StepResponse::Framework(_) => ResponseKind::Framework,
            StepResponse::Pause(_) => ResponseKind::Pause,
            StepResponse::Completion(_) => ResponseKind::Completion,
            StepResponse::Progress(_) => ResponseKind::Progress,
        }
    }

    pub fn status(&self) -> &str {
        match self {
            StepResponse::Framework(payload) => {
                payload["status"].as_str().unwrap_or_default()
            }
            StepResponse::Pause(response) => response.status,
            StepResponse::Completion(response) => response.status,
            StepResponse::Progress(response) => response.status,
        }
    }
}

/// Build the response for `record`, which must already be the last entry of
/// `history`.
pub fn build_response(
    record: &StepRecord,
    history: &[StepRecord],
    with_guidance: bool,
) -> StepResponse {
    match select_kind(record) {
        ResponseKind::Framework => StepResponse::Framework(framework_payload()),
        ResponseKind::Pause => StepResponse::Pause(PauseResponse {
            status: PAUSE_STATUS,
            duration: record.effective_pause_duration(),
            prompt: PAUSE_PROMPT,
            instruction: PAUSE_INSTRUCTION,
            step_number: record.step_number,
            total_steps: record.total_steps,
            journey: label_path(history),
        }),
        ResponseKind::Completion => StepResponse::Completion(CompletionResponse {
            status: COMPLETION_STATUS,
            process_complete: true,
            final_step: record.label.clone(),
            instruction: if record.label == EXPRESS {
                EXPRESS_INSTRUCTION
            } else {
                COMPLETE_INSTRUCTION
            },
            total_steps: record.step_number,
            journey_length: history.len(),
            final_journey: label_path(history),
            category_journey: category_path(history),
        }),
        ResponseKind::Progress => StepResponse::Progress(ProgressResponse {
            status: PROGRESS_STATUS,
            current_step: record.label.clone(),
            category: record.category,
            journey: label_path(history),
            category_journey: category_path(history),
            step_number: record.step_number,
            total_steps: record.total_steps,
            next_step_needed: record.next_step_needed,
            process_length: history.len(),
            guidance: (with_guidance && history.len() == 1).then(first_step_guidance),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::record;

    #[test]
    fn begin_selects_framework_even_when_final() {
        let mut step = record("begin", 1, 1);
        step.next_step_needed = false;
        assert_eq!(select_kind(&step), ResponseKind::Framework);
    }

    #[test]
    fn meditate_selects_pause_regardless_of_next_step() {
        let mut step = record("meditate", 2, 5);
        assert_eq!(select_kind(&step), ResponseKind::Pause);
        step.next_step_needed = false;
        assert_eq!(select_kind(&step), ResponseKind::Pause);
    }

    #[test]
    fn terminal_labels_complete_only_without_next_step() {
        for label in ["express", "complete"] {
            let mut step = record(label, 3, 3);
            assert_eq!(select_kind(&step), ResponseKind::Progress);
            step.next_step_needed = false;
            assert_eq!(select_kind(&step), ResponseKind::Completion);
        }
    }

    #[test]
    fn non_terminal_final_step_is_progress() {
        let mut step = record("embody", 4, 4);
        step.next_step_needed = false;
        assert_eq!(select_kind(&step), ResponseKind::Progress);
    }

    #[test]
    fn completion_instruction_depends_on_label() {
        let mut step = record("complete", 2, 2);
        step.next_step_needed = false;
        let history = vec![record("open", 1, 2), step.clone()];
        match build_response(&step, &history, true) {
            StepResponse::Completion(response) => {
                assert_eq!(response.instruction, COMPLETE_INSTRUCTION);
                assert_eq!(response.final_step, "complete");
                assert_eq!(response.category_journey, "process_flow → meta_cognitive");
            }
            other => panic!("expected completion, got {other:?}"),
        }
    }

    #[test]
    fn pause_uses_supplied_duration() {
        let mut step = record("meditate", 2, 5);
        step.pause_duration = Some(8);
        let history = vec![record("open", 1, 5), step.clone()];
        match build_response(&step, &history, true) {
            StepResponse::Pause(response) => {
                assert_eq!(response.duration, 8);
                assert_eq!(response.journey, "open → meditate");
            }
            other => panic!("expected pause, got {other:?}"),
        }
    }

    #[test]
    fn guidance_only_on_first_step_and_when_enabled() {
        let first = record("open", 1, 3);
        let history = vec![first.clone()];
        let with = build_response(&first, &history, true);
        let without = build_response(&first, &history, false);
        match (&with, &without) {
            (StepResponse::Progress(with), StepResponse::Progress(without)) => {
                assert!(with.guidance.is_some());
                assert!(without.guidance.is_none());
                let stripped = ProgressResponse {
                    guidance: None,
                    ..with.clone()
                };
                assert_eq!(&stripped, without);
            }
            other => panic!("expected progress, got {other:?}"),
        }

        let second = record("examine", 2, 3);
        let history = vec![first, second.clone()];
        match build_response(&second, &history, true) {
            StepResponse::Progress(response) => assert!(response.guidance.is_none()),
            other => panic!("expected progress, got {other:?}"),
        }
    }

    #[test]
    fn step_one_appended_mid_journey_gets_no_guidance() {
        let late = record("reflect", 1, 3);
        let history = vec![record("open", 1, 3), record("examine", 2, 3), late.clone()];
        match build_response(&late, &history, true) {
            StepResponse::Progress(response) => {
                assert!(response.guidance.is_none());
                assert_eq!(response.process_length, 3);
            }
            other => panic!("expected progress, got {other:?}"),
        }
    }

    #[test]
    fn progress_serializes_without_guidance_key() {
        let step = record("examine", 2, 3);
        let history = vec![record("open", 1, 3), step.clone()];
        let value = serde_json::to_value(build_response(&step, &history, true)).expect("json");
        assert!(value.get("guidance").is_none());
        assert_eq!(value["status"], PROGRESS_STATUS);
        assert_eq!(value["category"], "meta_cognitive");
        assert_eq!(value["processLength"], 2);
    }
}
