//! API publisher: math-bearing records become lecture creation requests.

pub mod payload;
pub mod progress;
pub mod retry;

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::content;
use crate::model::ProblemRecord;
use crate::settings::ContentDefaults;
use crate::store::write_json_atomic;
pub use payload::LectureRequest;
use progress::{is_report_point, Throughput};
pub use retry::{send_with_retry, ApiResponse, HttpLectureApi, LectureApi, RetryPolicy, SendError};

/// A record the API refused, kept for a later manual retry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub problem: ProblemRecord,
    pub error: String,
    /// 1-based position in the attempted batch.
    pub index: usize,
}

#[derive(Debug, Default)]
pub struct PublishReport {
    pub attempted: usize,
    pub succeeded: usize,
    pub failures: Vec<FailureRecord>,
    pub interrupted: bool,
    pub elapsed: Duration,
}

impl PublishReport {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

pub struct Publisher<'a, A: LectureApi + ?Sized> {
    pub api: &'a A,
    pub policy: RetryPolicy,
    pub pacing: Duration,
    pub defaults: &'a ContentDefaults,
}

impl<'a, A: LectureApi + ?Sized> Publisher<'a, A> {
    /// Send each problem in order. `stop` is checked before every record so
    /// an interrupt ends the batch between sends.
    pub fn run(&self, problems: &[&ProblemRecord], stop: &AtomicBool) -> PublishReport {
        let total = problems.len();
        let start = Instant::now();
        let mut report = PublishReport::default();

        for (i, problem) in problems.iter().enumerate() {
            if stop.load(Ordering::SeqCst) {
                break;
            }
            let position = i + 1;
            let title = content::title(problem, self.defaults);

            if is_report_point(position) {
                let t = Throughput {
                    done: position,
                    total,
                    elapsed: start.elapsed(),
                };
                let rate = format!("{:.1}/s", t.rate());
                let eta = format!("{:.1}min", t.eta().as_secs_f64() / 60.0);
                info!(
                    position,
                    total,
                    succeeded = report.succeeded,
                    failed = report.failed(),
                    rate = %rate,
                    eta = %eta,
                    "publishing"
                );
            }

            let request = LectureRequest::from_record(problem, self.defaults);
            report.attempted += 1;
            match send_with_retry(self.api, &request, &self.policy) {
                Ok(()) => {
                    report.succeeded += 1;
                    if position % 100 == 0 {
                        info!(position, total, problem_id = problem.problem_id(), title = %title, "created");
                    }
                }
                Err(error) => {
                    warn!(
                        position,
                        total,
                        problem_id = problem.problem_id(),
                        title = %title,
                        error = %error,
                        "publish failed"
                    );
                    report.failures.push(FailureRecord {
                        problem: (*problem).clone(),
                        error,
                        index: position,
                    });
                }
            }

            thread::sleep(self.pacing);
        }

        // a stop raised while the last record was in flight still counts
        report.interrupted = stop.load(Ordering::SeqCst);
        report.elapsed = start.elapsed();
        report
    }
}

/// Write failed sends as one JSON array. Nothing is written for an empty
/// batch.
pub fn write_failures(path: &Path, failures: &[FailureRecord]) -> Result<bool> {
    if failures.is_empty() {
        return Ok(false);
    }
    write_json_atomic(path, failures)?;
    Ok(true)
}
