//! Runtime configuration.
//!
//! Layering, lowest to highest: built-in defaults, an optional `pipeline.*`
//! file in the working directory, then `BOJ_`-prefixed environment variables
//! (`__` separates nested keys, e.g. `BOJ_PUBLISH__MAX_ATTEMPTS=5`).
//! Positional CLI arguments are applied on top by each binary.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use config::Config;
use serde::Deserialize;

use crate::model::Difficulty;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub store_path: PathBuf,
    pub defaults: ContentDefaults,
    pub fetch: FetchSettings,
    pub publish: PublishSettings,
    pub sql: SqlSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            store_path: PathBuf::from("baekjoon_problems.json"),
            defaults: ContentDefaults::default(),
            fetch: FetchSettings::default(),
            publish: PublishSettings::default(),
            sql: SqlSettings::default(),
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        Config::builder()
            .add_source(config::File::with_name("pipeline").required(false))
            .add_source(
                config::Environment::with_prefix("BOJ")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }
}

/// Values substituted when a stored record leaves a field empty.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ContentDefaults {
    pub title: String,
    pub category: String,
    /// One of 미등급, 브론즈, 실버, 골드, 플래티넘, 다이아몬드, 챌린저.
    pub difficulty: Difficulty,
}

impl Default for ContentDefaults {
    fn default() -> Self {
        ContentDefaults {
            title: "Untitled".into(),
            category: "알고리즘".into(),
            difficulty: Difficulty::Bronze,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    pub judge_base_url: String,
    pub rating_api_url: String,
    pub use_rating: bool,
    pub tag_language: String,
    pub source_name: String,
    pub user_agent: String,
    pub page_timeout_secs: u64,
    pub rating_timeout_secs: u64,
    pub delay_ms: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        FetchSettings {
            judge_base_url: "https://www.acmicpc.net".into(),
            rating_api_url: "https://solved.ac/api/v3".into(),
            use_rating: true,
            tag_language: "ko".into(),
            source_name: "백준 온라인 저지".into(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".into(),
            page_timeout_secs: 10,
            rating_timeout_secs: 5,
            delay_ms: 1000,
        }
    }
}

impl FetchSettings {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PublishSettings {
    pub api_url: String,
    pub user_id: i64,
    pub max_attempts: u32,
    pub request_timeout_secs: u64,
    pub status_backoff_ms: u64,
    pub timeout_backoff_ms: u64,
    pub pacing_ms: u64,
    pub failed_output: PathBuf,
}

impl Default for PublishSettings {
    fn default() -> Self {
        PublishSettings {
            api_url: "http://localhost:2358/api/lectures".into(),
            user_id: 5,
            max_attempts: 3,
            request_timeout_secs: 30,
            status_backoff_ms: 1000,
            timeout_backoff_ms: 2000,
            pacing_ms: 100,
            failed_output: PathBuf::from("failed_problems.json"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SqlSettings {
    pub output_file: PathBuf,
    pub author_id: i64,
    pub admin_login: String,
    pub admin_username: String,
    pub admin_password: String,
    pub constraints_id: i64,
}

impl Default for SqlSettings {
    fn default() -> Self {
        SqlSettings {
            output_file: PathBuf::from("V103__baekjoon_problems_no_math.sql"),
            author_id: 1,
            admin_login: "admin".into(),
            admin_username: "관리자".into(),
            admin_password: "admin123".into(),
            constraints_id: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_source_yields_defaults() {
        let settings: Settings = Config::builder().build().unwrap().try_deserialize().unwrap();
        assert_eq!(settings.publish.max_attempts, 3);
        assert_eq!(settings.publish.user_id, 5);
        assert_eq!(settings.defaults.difficulty, Difficulty::Bronze);
        assert_eq!(settings.fetch.delay(), Duration::from_secs(1));
        assert_eq!(
            settings.sql.output_file,
            PathBuf::from("V103__baekjoon_problems_no_math.sql")
        );
    }

    #[test]
    fn overrides_merge_with_defaults() {
        let settings: Settings = Config::builder()
            .set_override("publish.max_attempts", 5)
            .unwrap()
            .set_override("defaults.difficulty", "골드")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(settings.publish.max_attempts, 5);
        assert_eq!(settings.publish.pacing_ms, 100);
        assert_eq!(settings.defaults.difficulty, Difficulty::Gold);
        assert_eq!(settings.defaults.category, "알고리즘");
    }
}
