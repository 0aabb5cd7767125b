//! Static label taxonomy.
//!
//! Every label belongs to exactly one [`Category`]. The table is the sole
//! source of truth for label validity; classification itself is advisory and
//! never fails.

use serde::{Deserialize, Serialize};

/// Fixed group a step label belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Entry,
    SkillfulMeans,
    NonDualRecognition,
    MetaCognitive,
    ProcessFlow,
    Meditation,
    /// Sentinel for labels outside the table. No valid label maps here.
    Unknown,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Entry => "entry",
            Category::SkillfulMeans => "skillful_means",
            Category::NonDualRecognition => "non_dual_recognition",
            Category::MetaCognitive => "meta_cognitive",
            Category::ProcessFlow => "process_flow",
            Category::Meditation => "meditation",
            Category::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entry label that requests the framework description.
pub const BEGIN: &str = "begin";
/// Process-flow label that opens a journey.
pub const OPEN: &str = "open";
/// Reflective pause label.
pub const MEDITATE: &str = "meditate";
/// Terminal label for natural expression.
pub const EXPRESS: &str = "express";
/// Terminal label for meta-cognitive completion.
pub const COMPLETE: &str = "complete";

/// Category table in presentation order. Label sets are disjoint.
pub const TAXONOMY: &[(Category, &[&str])] = &[
    (Category::Entry, &[BEGIN]),
    (
        Category::SkillfulMeans,
        &["upaya", "expedient", "direct", "gradual", "sudden"],
    ),
    (
        Category::NonDualRecognition,
        &["recognize", "transform", "integrate", "transcend", "embody"],
    ),
    (
        Category::MetaCognitive,
        &["examine", "reflect", "verify", "refine", COMPLETE],
    ),
    (Category::ProcessFlow, &[OPEN, "engage", EXPRESS]),
    (Category::Meditation, &[MEDITATE]),
];

/// Flattened label list, in table order.
const ALL_LABELS: &[&str] = &[
    BEGIN,
    "upaya",
    "expedient",
    "direct",
    "gradual",
    "sudden",
    "recognize",
    "transform",
    "integrate",
    "transcend",
    "embody",
    "examine",
    "reflect",
    "verify",
    "refine",
    COMPLETE,
    OPEN,
    "engage",
    EXPRESS,
    MEDITATE,
];

/// Every acceptable label, in table order.
pub fn all_labels() -> &'static [&'static str] {
    ALL_LABELS
}

/// True if `label` is a member of the closed label set.
pub fn is_valid_label(label: &str) -> bool {
    ALL_LABELS.contains(&label)
}

/// Category for `label`, or [`Category::Unknown`] if it is not in the table.
pub fn category_of(label: &str) -> Category {
    TAXONOMY
        .iter()
        .find(|(_, labels)| labels.contains(&label))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Unknown)
}

/// Labels for `category` (empty for [`Category::Unknown`]).
pub fn labels_of(category: Category) -> &'static [&'static str] {
    TAXONOMY
        .iter()
        .find(|(c, _)| *c == category)
        .map(|(_, labels)| *labels)
        .unwrap_or(&[])
}

/// True if a `stepNumber == 1` record with this label starts a fresh journey.
pub fn is_journey_opener(label: &str) -> bool {
    label == BEGIN || label == OPEN
}
