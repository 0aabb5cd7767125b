//! Human-readable step banner written to stderr when step echo is enabled.

use anyhow::{Context, Result};
use minijinja::{Environment, context};

use crate::core::taxonomy::Category;
use crate::core::types::StepRecord;

const HEADER_TEMPLATE: &str = include_str!("../../templates/step_header.j2");
const BANNER_TEMPLATE: &str = include_str!("../../templates/step_banner.j2");

const SETTLE_PATTERN: &[&str] = &[
    "..........................",
    "[letting thoughts settle into clarity]",
    "..........................",
    "[wisdom naturally emerging]",
    "..........................",
];

/// Template engine wrapper around minijinja.
pub struct StepRenderer {
    env: Environment<'static>,
}

impl StepRenderer {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.add_template("header", HEADER_TEMPLATE)
            .context("parse step header template")?;
        env.add_template("banner", BANNER_TEMPLATE)
            .context("parse step banner template")?;
        Ok(Self { env })
    }

    /// Boxed banner for `record`. Pause records show the settle pattern
    /// instead of their content.
    pub fn render(&self, record: &StepRecord) -> Result<String> {
        let (glyph, domain) = category_style(record.category);
        let header = self.env.get_template("header")?.render(context! {
            glyph => glyph,
            domain => domain,
            label => &record.label,
            step_number => record.step_number,
            total_steps => record.total_steps,
        })?;

        let body: Vec<&str> = if record.is_pause == Some(true) {
            SETTLE_PATTERN.to_vec()
        } else {
            record.content.lines().collect()
        };
        let width = body
            .iter()
            .map(|line| line.chars().count())
            .chain(std::iter::once(header.chars().count()))
            .max()
            .unwrap_or(0);

        let banner = self.env.get_template("banner")?.render(context! {
            rule => "─".repeat(width + 2),
            header => header,
            body => body,
        })?;
        Ok(banner)
    }
}

fn category_style(category: Category) -> (&'static str, &'static str) {
    match category {
        Category::Entry => ("🪷", "ENTRY"),
        Category::SkillfulMeans => ("🔆", "SKILLFUL MEANS"),
        Category::NonDualRecognition => ("☯️", "NON-DUAL"),
        Category::MetaCognitive => ("🧠", "META-COGNITIVE"),
        Category::ProcessFlow => ("🌊", "PROCESS"),
        Category::Meditation => ("🧘", "MEDITATION"),
        Category::Unknown => ("💭", "UNKNOWN"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::record;

    #[test]
    fn banner_shows_domain_label_and_counter() {
        let renderer = StepRenderer::new().expect("templates");
        let banner = renderer.render(&record("examine", 2, 4)).expect("render");
        let lines: Vec<&str> = banner.lines().collect();
        assert_eq!(lines[1], "│ 🧠 [META-COGNITIVE: EXAMINE] Step 2/4");
        assert_eq!(lines[3], "│ examine content");
        assert!(lines[0].starts_with('┌'));
        assert!(lines.last().expect("last").starts_with('└'));
    }

    #[test]
    fn pause_banner_hides_content() {
        let renderer = StepRenderer::new().expect("templates");
        let mut step = record("meditate", 3, 5);
        step.is_pause = Some(true);
        let banner = renderer.render(&step).expect("render");
        assert!(banner.contains("[letting thoughts settle into clarity]"));
        assert!(!banner.contains("meditate content"));
    }

    #[test]
    fn multi_line_content_gets_one_row_per_line() {
        let renderer = StepRenderer::new().expect("templates");
        let mut step = record("reflect", 1, 1);
        step.content = "first\nsecond".to_string();
        let banner = renderer.render(&step).expect("render");
        assert!(banner.contains("│ first\n│ second\n└"));
    }
}
