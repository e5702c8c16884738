use serde::Serialize;

use crate::content;
use crate::model::{Difficulty, LectureType, ProblemRecord};
use crate::settings::ContentDefaults;

/// Body of `POST /api/lectures`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LectureRequest {
    pub title: String,
    pub description: String,
    pub content: String,
    pub input_content: String,
    pub output_content: String,
    #[serde(rename = "type")]
    pub kind: LectureType,
    pub category: String,
    pub difficulty: Difficulty,
    #[serde(rename = "isPublic")]
    pub is_public: bool,
    #[serde(rename = "testCases")]
    pub test_cases: Vec<TestCasePayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCasePayload {
    pub input: String,
    pub expected_output: String,
}

impl LectureRequest {
    /// Lectures are always created private; the order index is implied by
    /// position.
    pub fn from_record(record: &ProblemRecord, defaults: &ContentDefaults) -> Self {
        LectureRequest {
            title: content::title(record, defaults).to_string(),
            description: record.description.clone().unwrap_or_default(),
            content: content::render_content(record, defaults),
            input_content: record.input_description.clone().unwrap_or_default(),
            output_content: record.output_description.clone().unwrap_or_default(),
            kind: record.kind,
            category: content::category(record, defaults).to_string(),
            difficulty: content::difficulty(record, defaults),
            is_public: false,
            test_cases: record
                .test_cases
                .iter()
                .map(|tc| TestCasePayload {
                    input: tc.input.clone(),
                    expected_output: tc.expected_output.clone(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Metadata, TestCase};
    use serde_json::json;

    fn record() -> ProblemRecord {
        ProblemRecord {
            title: Some("수열".into()),
            description: Some("길이 $n$".into()),
            input_description: Some("$n$".into()),
            output_description: None,
            kind: LectureType::Problem,
            category: None,
            difficulty: None,
            time_limit: Some(1.0),
            memory_limit: Some(262144),
            is_public: true,
            test_cases: vec![
                TestCase::from_samples("3", "6", 1),
                TestCase::from_samples("1", "1", 2),
            ],
            tags: vec!["수학".into()],
            metadata: Metadata {
                source: "s".into(),
                problem_id: 11,
                url: String::new(),
            },
        }
    }

    #[test]
    fn payload_shape_matches_api() {
        let req = LectureRequest::from_record(&record(), &ContentDefaults::default());
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            json!({
                "title": "수열",
                "description": "길이 $n$",
                "content": "# 수열\n\n길이 $n$\n\n\n## 입력\n$n$",
                "input_content": "$n$",
                "output_content": "",
                "type": "PROBLEM",
                "category": "알고리즘",
                "difficulty": "브론즈",
                "isPublic": false,
                "testCases": [
                    {"input": "3", "expectedOutput": "6"},
                    {"input": "1", "expectedOutput": "1"}
                ]
            })
        );
    }

    #[test]
    fn stored_values_win_over_defaults() {
        let mut r = record();
        r.category = Some("그래프".into());
        r.difficulty = Some(Difficulty::Gold);
        r.title = None;
        let req = LectureRequest::from_record(&r, &ContentDefaults::default());
        assert_eq!(req.category, "그래프");
        assert_eq!(req.difficulty, Difficulty::Gold);
        assert_eq!(req.title, "Untitled");
    }
}
