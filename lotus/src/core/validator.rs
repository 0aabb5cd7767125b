//! Strict parse of untrusted step input into a [`StepRecord`].
//!
//! Checks run in a fixed order and the first failure wins:
//! label, content, stepNumber, totalSteps, nextStepNeeded.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::core::taxonomy::{self, BEGIN};
use crate::core::types::{PAUSE_DURATION_RANGE, StepRecord};

const BEGIN_DEFAULT_CONTENT: &str = "Beginning contemplative journey";
const BEGIN_DEFAULT_TOTAL_STEPS: u64 = 5;

/// Reason a step record was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid input: step must be a JSON object")]
    NotAnObject,
    #[error("Invalid label: must be a string. Must be one of: {valid}")]
    MissingLabel { valid: String },
    #[error("Invalid label: {label}. Must be one of: {valid}")]
    UnknownLabel { label: String, valid: String },
    #[error("Invalid content: must be a non-empty string")]
    InvalidContent,
    #[error("Invalid stepNumber: must be a positive integer")]
    InvalidStepNumber,
    #[error("Invalid totalSteps: must be a positive integer")]
    InvalidTotalSteps,
    #[error("Invalid nextStepNeeded: must be a boolean")]
    InvalidNextStepNeeded,
}

/// Validate `input` and return a normalized record with its category set.
///
/// `tag`, `isMeditation` and `meditationDuration` are accepted as aliases of
/// `label`, `isPause` and `pauseDuration`. A `begin` record may omit every
/// field but its label.
pub fn parse_step(input: &Value) -> Result<StepRecord, ValidationError> {
    let map = input.as_object().ok_or(ValidationError::NotAnObject)?;

    let label = parse_label(map)?;

    let defaults = label == BEGIN;
    let content = match field(map, "content", None) {
        Some(Value::String(content)) if !content.is_empty() => content.clone(),
        None if defaults => BEGIN_DEFAULT_CONTENT.to_string(),
        _ => return Err(ValidationError::InvalidContent),
    };
    let step_number = positive(field(map, "stepNumber", None), defaults.then_some(1))
        .ok_or(ValidationError::InvalidStepNumber)?;
    let total_steps = positive(
        field(map, "totalSteps", None),
        defaults.then_some(BEGIN_DEFAULT_TOTAL_STEPS),
    )
    .ok_or(ValidationError::InvalidTotalSteps)?;
    let next_step_needed = match field(map, "nextStepNeeded", None) {
        Some(Value::Bool(flag)) => *flag,
        None if defaults => true,
        _ => return Err(ValidationError::InvalidNextStepNeeded),
    };

    let is_pause = field(map, "isPause", Some("isMeditation")).and_then(Value::as_bool);
    let pause_duration = field(map, "pauseDuration", Some("meditationDuration"))
        .and_then(Value::as_u64)
        .and_then(|secs| u32::try_from(secs).ok())
        .filter(|secs| PAUSE_DURATION_RANGE.contains(secs));

    Ok(StepRecord {
        category: taxonomy::category_of(&label),
        label,
        content,
        step_number,
        total_steps,
        next_step_needed,
        is_pause,
        pause_duration,
    })
}

fn parse_label(map: &Map<String, Value>) -> Result<String, ValidationError> {
    let valid = || taxonomy::all_labels().join(", ");
    match field(map, "label", Some("tag")) {
        Some(Value::String(label)) if !label.is_empty() => {
            if taxonomy::is_valid_label(label) {
                Ok(label.clone())
            } else {
                Err(ValidationError::UnknownLabel {
                    label: label.clone(),
                    valid: valid(),
                })
            }
        }
        _ => Err(ValidationError::MissingLabel { valid: valid() }),
    }
}

/// Look up `key`, falling back to `alias`. JSON `null` counts as absent.
fn field<'a>(map: &'a Map<String, Value>, key: &str, alias: Option<&str>) -> Option<&'a Value> {
    map.get(key)
        .or_else(|| alias.and_then(|alias| map.get(alias)))
        .filter(|value| !value.is_null())
}

fn positive(value: Option<&Value>, default: Option<u64>) -> Option<u32> {
    let raw = match value {
        Some(value) => value.as_u64()?,
        None => default?,
    };
    u32::try_from(raw).ok().filter(|n| *n > 0)
}
