//! solved.ac lookups: difficulty tier and localized tag names.

use std::time::Duration;

use anyhow::Result;
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::model::Difficulty;
use crate::settings::FetchSettings;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct RatingInfo {
    pub difficulty: Option<Difficulty>,
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct RatingResponse {
    #[serde(default)]
    pub level: Option<i64>,
    #[serde(default)]
    pub tags: Vec<RatingTag>,
}

#[derive(Debug, Deserialize)]
pub struct RatingTag {
    #[serde(rename = "displayNames", default)]
    pub display_names: Vec<DisplayName>,
}

#[derive(Debug, Deserialize)]
pub struct DisplayName {
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub name: String,
}

impl RatingInfo {
    /// Tier from `level`, plus the first display name in `language` for each
    /// tag that has one.
    pub fn from_response(resp: &RatingResponse, language: &str) -> Self {
        let tags = resp
            .tags
            .iter()
            .filter_map(|tag| {
                tag.display_names
                    .iter()
                    .find(|d| d.language == language)
                    .map(|d| d.name.clone())
            })
            .collect();
        RatingInfo {
            difficulty: Some(Difficulty::from_level(resp.level.unwrap_or(0))),
            tags,
        }
    }
}

pub struct RatingClient {
    http: Client,
    base_url: String,
    language: String,
    timeout: Duration,
    enabled: bool,
}

impl RatingClient {
    pub fn new(http: Client, settings: &FetchSettings) -> Self {
        RatingClient {
            http,
            base_url: settings.rating_api_url.trim_end_matches('/').to_string(),
            language: settings.tag_language.clone(),
            timeout: Duration::from_secs(settings.rating_timeout_secs),
            enabled: settings.use_rating,
        }
    }

    /// Never fails: any problem with the lookup degrades to "no difficulty,
    /// no tags".
    pub fn lookup(&self, problem_id: i64) -> RatingInfo {
        if !self.enabled {
            return RatingInfo::default();
        }
        match self.try_lookup(problem_id) {
            Ok(info) => info,
            Err(e) => {
                warn!(problem_id, error = %e, "solved.ac lookup failed");
                RatingInfo::default()
            }
        }
    }

    fn try_lookup(&self, problem_id: i64) -> Result<RatingInfo> {
        let resp = self
            .http
            .get(format!("{}/problem/show", self.base_url))
            .query(&[("problemId", problem_id)])
            .timeout(self.timeout)
            .send()?;

        if !resp.status().is_success() {
            debug!(problem_id, status = %resp.status(), "no rating available");
            return Ok(RatingInfo::default());
        }
        let body: RatingResponse = resp.json()?;
        Ok(RatingInfo::from_response(&body, &self.language))
    }
}
