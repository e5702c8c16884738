use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::debug;

use super::page::{parse_problem_page, ParsedPage};
use super::rating::{RatingClient, RatingInfo};
use crate::model::{LectureType, Metadata, ProblemRecord};
use crate::settings::Settings;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("problem {0} not found")]
    NotFound(i64),
    #[error("problem {0} has no title")]
    MissingTitle(i64),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Anything that can turn a problem id into a record.
pub trait ProblemSource {
    fn fetch(&self, problem_id: i64) -> Result<ProblemRecord, FetchError>;
}

/// Record fields that come from configuration rather than the page.
#[derive(Debug, Clone)]
pub struct RecordTemplate {
    pub source_name: String,
    pub category: String,
}

impl RecordTemplate {
    pub fn build(&self, problem_id: i64, url: String, page: ParsedPage, rating: RatingInfo) -> ProblemRecord {
        ProblemRecord {
            title: Some(page.title),
            description: Some(page.description),
            input_description: Some(page.input_description),
            output_description: Some(page.output_description),
            kind: LectureType::Problem,
            category: Some(self.category.clone()),
            difficulty: rating.difficulty,
            time_limit: page.time_limit,
            memory_limit: page.memory_limit,
            is_public: false,
            test_cases: page.test_cases,
            tags: rating.tags,
            metadata: Metadata {
                source: self.source_name.clone(),
                problem_id,
                url,
            },
        }
    }
}

/// Blocking client for the judge site plus its rating companion.
pub struct JudgeClient {
    http: Client,
    base_url: String,
    page_timeout: Duration,
    rating: RatingClient,
    template: RecordTemplate,
}

impl JudgeClient {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let http = Client::builder()
            .user_agent(settings.fetch.user_agent.as_str())
            .build()?;
        Ok(JudgeClient {
            rating: RatingClient::new(http.clone(), &settings.fetch),
            http,
            base_url: settings.fetch.judge_base_url.trim_end_matches('/').to_string(),
            page_timeout: Duration::from_secs(settings.fetch.page_timeout_secs),
            template: RecordTemplate {
                source_name: settings.fetch.source_name.clone(),
                category: settings.defaults.category.clone(),
            },
        })
    }

    pub fn problem_url(&self, problem_id: i64) -> String {
        format!("{}/problem/{}", self.base_url, problem_id)
    }
}

impl ProblemSource for JudgeClient {
    fn fetch(&self, problem_id: i64) -> Result<ProblemRecord, FetchError> {
        let url = self.problem_url(problem_id);
        let resp = self.http.get(&url).timeout(self.page_timeout).send()?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(problem_id));
        }
        let html = resp.error_for_status()?.text()?;
        debug!(problem_id, bytes = html.len(), "page downloaded");

        let page = parse_problem_page(&html).ok_or(FetchError::MissingTitle(problem_id))?;
        let rating = self.rating.lookup(problem_id);
        Ok(self.template.build(problem_id, url, page, rating))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Difficulty, TestCase};
    use crate::test_support::{closed_port, json_reply, reply, StubServer};

    #[test]
    fn template_fills_provenance_and_defaults() {
        let template = RecordTemplate {
            source_name: "백준 온라인 저지".into(),
            category: "알고리즘".into(),
        };
        let page = ParsedPage {
            title: "A+B".into(),
            description: "d".into(),
            input_description: String::new(),
            output_description: "o".into(),
            time_limit: Some(2.0),
            memory_limit: Some(131072),
            test_cases: vec![TestCase::from_samples("1 2", "3", 1)],
        };
        let rating = RatingInfo {
            difficulty: Some(Difficulty::Bronze),
            tags: vec!["수학".into()],
        };
        let record = template.build(1000, "https://www.acmicpc.net/problem/1000".into(), page, rating);

        assert_eq!(record.problem_id(), 1000);
        assert_eq!(record.metadata.source, "백준 온라인 저지");
        assert_eq!(record.metadata.url, "https://www.acmicpc.net/problem/1000");
        assert_eq!(record.category.as_deref(), Some("알고리즘"));
        assert_eq!(record.input_description.as_deref(), Some(""));
        assert_eq!(record.kind, LectureType::Problem);
        assert!(!record.is_public);
        assert_eq!(record.tags, vec!["수학".to_string()]);
    }

    fn client_at(url: &str, use_rating: bool) -> JudgeClient {
        let mut settings = Settings::default();
        settings.fetch.judge_base_url = url.to_string();
        settings.fetch.rating_api_url = url.to_string();
        settings.fetch.use_rating = use_rating;
        JudgeClient::new(&settings).unwrap()
    }

    #[test]
    fn judge_404_is_not_found() {
        let server = StubServer::serve(vec![reply(404, "no such problem")]);
        let err = client_at(&server.url(), false).fetch(1000).unwrap_err();
        assert!(matches!(err, FetchError::NotFound(1000)), "{:?}", err);
        assert!(server.requests()[0].starts_with("GET /problem/1000 "));
    }

    #[test]
    fn other_error_status_is_transport() {
        let server = StubServer::serve(vec![reply(500, "oops")]);
        match client_at(&server.url(), false).fetch(1000) {
            Err(FetchError::Transport(e)) => {
                assert_eq!(e.status(), Some(StatusCode::INTERNAL_SERVER_ERROR))
            }
            other => panic!("expected a transport error, got {:?}", other),
        }
    }

    #[test]
    fn unreachable_judge_is_transport() {
        let url = format!("http://{}", closed_port());
        let err = client_at(&url, false).fetch(1000).unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)), "{:?}", err);
    }

    #[test]
    fn page_without_title_is_missing_title() {
        let server = StubServer::serve(vec![reply(200, include_str!("../../tests/fixtures/no_title.html"))]);
        let err = client_at(&server.url(), false).fetch(1002).unwrap_err();
        assert!(matches!(err, FetchError::MissingTitle(1002)), "{:?}", err);
    }

    #[test]
    fn page_then_rating_build_one_record() {
        let server = StubServer::serve(vec![
            reply(200, include_str!("../../tests/fixtures/problem_1000.html")),
            json_reply(
                200,
                r#"{"level": 7, "tags": [{"displayNames": [{"language": "ko", "name": "수학"}]}]}"#,
            ),
        ]);
        let url = server.url();
        let record = client_at(&url, true).fetch(1000).unwrap();

        assert_eq!(record.title.as_deref(), Some("A+B"));
        assert_eq!(record.difficulty, Some(Difficulty::Silver));
        assert_eq!(record.tags, vec!["수학".to_string()]);
        assert_eq!(record.metadata.url, format!("{}/problem/1000", url));

        let requests = server.requests();
        assert!(requests[1].starts_with("GET /problem/show?problemId=1000 "));
    }

    #[test]
    fn failed_rating_still_yields_the_page() {
        let server = StubServer::serve(vec![
            reply(200, include_str!("../../tests/fixtures/problem_1000.html")),
            reply(503, "maintenance"),
        ]);
        let record = client_at(&server.url(), true).fetch(1000).unwrap();
        assert_eq!(record.title.as_deref(), Some("A+B"));
        assert_eq!(record.difficulty, None);
        assert!(record.tags.is_empty());
    }

    #[test]
    fn problem_url_ignores_trailing_slash() {
        let mut settings = Settings::default();
        settings.fetch.judge_base_url = "https://judge.example/".into();
        let client = JudgeClient::new(&settings).unwrap();
        assert_eq!(client.problem_url(42), "https://judge.example/problem/42");
    }
}
