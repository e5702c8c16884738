//! The HTTP seam of the publisher and its bounded retry loop.

use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use thiserror::Error;
use tracing::debug;

use super::payload::LectureRequest;
use crate::settings::PublishSettings;

const CREATED: u16 = 201;
const DETAIL_LIMIT: usize = 200;

/// Raw answer from the lecture API.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Error, PartialEq)]
pub enum SendError {
    #[error("timed out ({}s exceeded)", .0.as_secs_f64())]
    Timeout(Duration),
    #[error("connection failed, is the server running? ({0})")]
    Connect(String),
    #[error("request error: {0}")]
    Other(String),
}

pub trait LectureApi {
    fn create_lecture(&self, request: &LectureRequest) -> Result<ApiResponse, SendError>;
}

pub struct HttpLectureApi {
    http: Client,
    url: String,
    user_id: i64,
    timeout: Duration,
}

impl HttpLectureApi {
    pub fn new(url: impl Into<String>, user_id: i64, timeout: Duration) -> anyhow::Result<Self> {
        Ok(HttpLectureApi {
            http: Client::builder().timeout(timeout).build()?,
            url: url.into(),
            user_id,
            timeout,
        })
    }

    fn classify(&self, err: reqwest::Error) -> SendError {
        if err.is_timeout() {
            SendError::Timeout(self.timeout)
        } else if err.is_connect() {
            SendError::Connect(err.to_string())
        } else {
            SendError::Other(err.to_string())
        }
    }
}

impl LectureApi for HttpLectureApi {
    fn create_lecture(&self, request: &LectureRequest) -> Result<ApiResponse, SendError> {
        let resp = self
            .http
            .post(&self.url)
            .header("X-User-Id", self.user_id.to_string())
            .json(request)
            .send()
            .map_err(|e| self.classify(e))?;
        let status = resp.status().as_u16();
        let body = resp.text().map_err(|e| self.classify(e))?;
        Ok(ApiResponse { status, body })
    }
}

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub status_backoff: Duration,
    pub timeout_backoff: Duration,
}

impl RetryPolicy {
    pub fn from_settings(settings: &PublishSettings) -> Self {
        RetryPolicy {
            max_attempts: settings.max_attempts,
            status_backoff: Duration::from_millis(settings.status_backoff_ms),
            timeout_backoff: Duration::from_millis(settings.timeout_backoff_ms),
        }
    }

    /// Same budget, no waiting.
    pub fn immediate(max_attempts: u32) -> Self {
        RetryPolicy {
            max_attempts,
            status_backoff: Duration::ZERO,
            timeout_backoff: Duration::ZERO,
        }
    }
}

/// Post `request` until the API answers 201 or the attempt budget runs out.
///
/// Non-201 answers and timeouts are retried after their backoff. Connection
/// failures and other transport errors end the loop at once. The error is
/// the last failure seen.
pub fn send_with_retry<A: LectureApi + ?Sized>(
    api: &A,
    request: &LectureRequest,
    policy: &RetryPolicy,
) -> Result<(), String> {
    let mut last_error = format!("gave up after {} attempts", policy.max_attempts);

    for attempt in 1..=policy.max_attempts {
        let backoff = match api.create_lecture(request) {
            Ok(resp) if resp.status == CREATED => return Ok(()),
            Ok(resp) => {
                last_error = describe_status(&resp);
                policy.status_backoff
            }
            Err(e @ SendError::Timeout(_)) => {
                last_error = e.to_string();
                policy.timeout_backoff
            }
            Err(e) => return Err(e.to_string()),
        };

        if attempt < policy.max_attempts {
            debug!(attempt, title = %request.title, error = %last_error, "retrying");
            thread::sleep(backoff);
        }
    }

    Err(last_error)
}

/// `HTTP 500: {...}` with the JSON body when there is one, otherwise the
/// first characters of the text body.
fn describe_status(resp: &ApiResponse) -> String {
    let detail = match serde_json::from_str::<serde_json::Value>(&resp.body) {
        Ok(json) => json.to_string(),
        Err(_) => resp.body.chars().take(DETAIL_LIMIT).collect(),
    };
    format!("HTTP {}: {}", resp.status, detail)
}
