use std::fmt;

use serde::{Deserialize, Serialize};

/// One scraped problem, in the shape persisted to the JSON store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemRecord {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub input_description: Option<String>,
    #[serde(default)]
    pub output_description: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: LectureType,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub time_limit: Option<f64>,
    #[serde(default)]
    pub memory_limit: Option<u64>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub test_cases: Vec<TestCase>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub metadata: Metadata,
}

impl ProblemRecord {
    pub fn problem_id(&self) -> i64 {
        self.metadata.problem_id
    }

    /// Every free-text field the record carries, test cases included.
    pub fn text_fields(&self) -> impl Iterator<Item = &str> {
        [
            &self.title,
            &self.description,
            &self.input_description,
            &self.output_description,
        ]
        .into_iter()
        .filter_map(|f| f.as_deref())
        .chain(
            self.test_cases
                .iter()
                .flat_map(|tc| [tc.input.as_str(), tc.expected_output.as_str()]),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub expected_output: String,
    #[serde(default)]
    pub order_index: Option<u32>,
}

impl TestCase {
    /// Build a case from raw sample blocks, trimming trailing whitespace the
    /// way the judge compares output.
    pub fn from_samples(input: &str, expected_output: &str, order_index: u32) -> Self {
        TestCase {
            input: input.trim_end().to_string(),
            expected_output: expected_output.trim_end().to_string(),
            order_index: Some(order_index),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub source: String,
    pub problem_id: i64,
    pub url: String,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LectureType {
    #[default]
    Problem,
    Markdown,
}

impl LectureType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LectureType::Problem => "PROBLEM",
            LectureType::Markdown => "MARKDOWN",
        }
    }
}

impl fmt::Display for LectureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// solved.ac tiers, lowest to highest. Serialized with the labels the
/// lecture service stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Difficulty {
    #[serde(rename = "미등급")]
    Unranked,
    #[serde(rename = "브론즈")]
    Bronze,
    #[serde(rename = "실버")]
    Silver,
    #[serde(rename = "골드")]
    Gold,
    #[serde(rename = "플래티넘")]
    Platinum,
    #[serde(rename = "다이아몬드")]
    Diamond,
    #[serde(rename = "챌린저")]
    Challenger,
}

impl Difficulty {
    /// Map a solved.ac level (0..=30) onto a tier. Out-of-range levels are
    /// unranked.
    pub fn from_level(level: i64) -> Self {
        match level {
            1..=5 => Difficulty::Bronze,
            6..=10 => Difficulty::Silver,
            11..=15 => Difficulty::Gold,
            16..=20 => Difficulty::Platinum,
            21..=25 => Difficulty::Diamond,
            26..=30 => Difficulty::Challenger,
            _ => Difficulty::Unranked,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Unranked => "미등급",
            Difficulty::Bronze => "브론즈",
            Difficulty::Silver => "실버",
            Difficulty::Gold => "골드",
            Difficulty::Platinum => "플래티넘",
            Difficulty::Diamond => "다이아몬드",
            Difficulty::Challenger => "챌린저",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── Tests ──
