//! Static framework description returned for the entry step, the framework
//! tool, and (as additive guidance) the first progress step.

use serde_json::{Value, json};

use crate::core::taxonomy::{Category, labels_of};

/// Status value of the framework payload.
pub const FRAMEWORK_STATUS: &str = "FRAMEWORK_RECEIVED";

/// Full framework payload for `begin` and `lotuswisdom_framework`.
pub fn framework_payload() -> Value {
    json!({
        "status": FRAMEWORK_STATUS,
        "welcome": "Welcome to the Lotus Wisdom framework. Read this before continuing your contemplative journey.",
        "philosophy": philosophy(),
        "domains": domains(),
        "patterns": patterns(),
        "guidance": {
            "interpenetration": "These domains interpenetrate; each step contains echoes of all others. A moment of recognition may also be transformation. An examination may suddenly become meditation.",
            "uncertainty": "When uncertain, sit with the uncertainty. The fog is not an obstacle; it is part of the journey. Not-knowing is its own form of wisdom.",
            "workflow": "Call lotuswisdom iteratively with different labels. The tool processes your contemplation internally; do NOT output wisdom until you receive status=WISDOM_READY. Then speak naturally in your own voice.",
            "next": "Proceed with stepNumber: 2 using any label that feels right (often \"open\" or \"examine\" to start)."
        },
        "parameters": {
            "label": "The current processing technique; choose from any wisdom domain",
            "content": "Your contemplation for this step: what you are thinking, seeing, or understanding",
            "stepNumber": "Current step in your journey (this begin step is 1)",
            "totalSteps": "Your estimate of total steps needed (can adjust as you go)",
            "nextStepNeeded": "Set true to continue, false when ready to complete",
            "isPause": "Set true when using the meditate label for a contemplative pause",
            "pauseDuration": "Optional seconds (1-10) for meditation pauses"
        },
        "responses": {
            "processing": "Normal steps return status=processing with journey tracking",
            "category": "Which domain your current label belongs to",
            "journey": "Your complete label path so far (e.g., \"open → examine → direct → integrate\")",
            "categoryJourney": "Movement between wisdom domains (e.g., \"process_flow → meta_cognitive → skillful_means\")",
            "pause": "The meditate label returns status=PAUSE_COMPLETE with a prompt asking what emerged from stillness",
            "completion": "express or complete with nextStepNeeded=false returns status=WISDOM_READY; then speak the final wisdom naturally in your own voice"
        },
        "whenToUse": [
            "Breaking down complex problems requiring multi-faceted understanding",
            "Questions that benefit from both direct and gradual approaches",
            "Problems where apparent contradictions need integration",
            "Situations requiring both analytical and intuitive understanding",
            "Tasks that benefit from meditative pauses to allow insight",
            "Questions containing their own inherent wisdom"
        ]
    })
}

/// Just-in-time teaching attached to the first progress step of a journey
/// that did not start with `begin`.
pub fn first_step_guidance() -> Value {
    json!({
        "welcome": "You have begun a contemplative journey. There is no wrong path here, only the path that unfolds.",
        "philosophy": philosophy(),
        "domains": domains(),
        "patterns": patterns(),
        "guidance": {
            "interpenetration": "These domains interpenetrate; each step contains echoes of all others.",
            "uncertainty": "When uncertain, sit with the uncertainty. Not-knowing is its own form of wisdom.",
            "closing": "Trust what arises. The tool processes your contemplation; you speak the wisdom that emerges."
        }
    })
}

fn philosophy() -> Value {
    json!({
        "core": "The Lotus Sutra teaches that there are many skillful means to reach the same truth. These labels are not rigid steps but different aspects of wisdom that interpenetrate and respond to what each moment needs.",
        "essence": "The wisdom channels itself through your choices. Each step contains all others: when you truly recognize, you are already transforming. The tool simply mirrors your journey without judgment.",
        "trust": "Trust what each moment calls for. The path reveals itself in the walking."
    })
}

fn domains() -> Value {
    let domain = |category: Category, spirit: &str, role: &str| {
        json!({
            "labels": labels_of(category),
            "spirit": spirit,
            "role": role,
        })
    };
    json!({
        "process_flow": domain(
            Category::ProcessFlow,
            "The natural arc of inquiry. Opening creates space for what wants to emerge. Engagement explores with curiosity and presence. Expression shares what arose, not as conclusion but as offering.",
            "A container that can hold any of the other approaches within it.",
        ),
        "skillful_means": domain(
            Category::SkillfulMeans,
            "Many ways lead to understanding. Sometimes direct pointing cuts through confusion instantly. Sometimes patient, gradual unfolding is what serves. Upaya is the art of meeting each situation with what it actually needs.",
            "Different approaches to truth: the medicine that fits the illness.",
        ),
        "non_dual_recognition": domain(
            Category::NonDualRecognition,
            "Awakening to what is already present. Recognition and transformation are not separate; to truly see IS already to change. Integration weaves apparent opposites. Transcendence sees beyond the frame. Embodiment lives the understanding.",
            "The alchemical heart of the journey, where seeing becomes being.",
        ),
        "meta_cognitive": domain(
            Category::MetaCognitive,
            "The mind watching its own understanding unfold. Gentle examination, not harsh judgment. Reflection that deepens rather than distances. Verification that grounds insight in reality. Refinement that polishes without force.",
            "The witness consciousness that ensures clarity and completeness.",
        ),
        "meditation": domain(
            Category::Meditation,
            "Pause. Let thoughts settle like silt in still water. Insight often emerges from stillness, not effort.",
            "Sacred pause, creating space for what cannot be grasped to be received.",
        ),
    })
}

fn patterns() -> Value {
    json!({
        "note": "Common flows (not rules; let the inquiry guide you):",
        "suggestions": [
            "Opening often involves open, recognize, or examine, creating space and initial contact",
            "Engagement might use direct, gradual, or upaya approaches, working with what arose",
            "Integration can happen through integrate, transcend, or sudden insight, weaving understanding",
            "Completion often flows through express, embody, or complete, bringing forth and grounding"
        ],
        "flexibility": "These patterns are descriptive, not prescriptive. Some inquiries need only two steps. Others spiral through many."
    })
}
