//! Field resolution and markdown rendering shared by the API payload and the
//! SQL script.

use crate::model::{Difficulty, ProblemRecord};
use crate::settings::ContentDefaults;

const INPUT_HEADING: &str = "입력";
const OUTPUT_HEADING: &str = "출력";

pub fn title<'a>(record: &'a ProblemRecord, defaults: &'a ContentDefaults) -> &'a str {
    record.title.as_deref().unwrap_or(&defaults.title)
}

pub fn category<'a>(record: &'a ProblemRecord, defaults: &'a ContentDefaults) -> &'a str {
    record.category.as_deref().unwrap_or(&defaults.category)
}

pub fn difficulty(record: &ProblemRecord, defaults: &ContentDefaults) -> Difficulty {
    record.difficulty.unwrap_or(defaults.difficulty)
}

/// Flatten description and input/output sections into one markdown document.
///
/// The title heading is only emitted together with a description; empty
/// sections are left out entirely.
pub fn render_content(record: &ProblemRecord, defaults: &ContentDefaults) -> String {
    let mut parts = Vec::new();
    if let Some(desc) = non_empty(&record.description) {
        parts.push(format!("# {}\n\n{}", title(record, defaults), desc));
    }
    if let Some(input) = non_empty(&record.input_description) {
        parts.push(format!("\n\n## {}\n{}", INPUT_HEADING, input));
    }
    if let Some(output) = non_empty(&record.output_description) {
        parts.push(format!("\n\n## {}\n{}", OUTPUT_HEADING, output));
    }
    parts.join("\n")
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}
