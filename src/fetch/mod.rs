//! Fetcher: problem ids in, upserted store records out.

pub mod client;
pub mod ids;
pub mod page;
pub mod rating;

use std::thread;
use std::time::Duration;

use anyhow::Result;
use indicatif::ProgressBar;
use itertools::Itertools;
use tracing::{info, warn};

use crate::store::ProblemStore;
pub use client::{FetchError, JudgeClient, ProblemSource};
pub use ids::{parse_id_tokens, IdTokenError};

/// Ids fetched when the CLI is given none.
pub const SAMPLE_IDS: [i64; 3] = [1000, 1001, 1008];

#[derive(Debug, Default, Clone, PartialEq)]
pub struct CollectStats {
    pub requested: usize,
    pub collected: usize,
    pub replaced: usize,
    pub not_found: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Fetch every id in order, upserting each record as soon as it parses.
///
/// Per-problem failures are logged and skipped; only a failed store write
/// aborts the run. `delay` is slept between attempts, never after the last.
pub fn collect<S: ProblemSource>(
    source: &S,
    ids: &[i64],
    store: &mut ProblemStore,
    delay: Duration,
    pb: &ProgressBar,
) -> Result<CollectStats> {
    let mut stats = CollectStats {
        requested: ids.len(),
        ..Default::default()
    };

    for (idx, &problem_id) in ids.iter().enumerate() {
        pb.set_message(format!("problem {}", problem_id));
        match source.fetch(problem_id) {
            Ok(record) => {
                let title = record.title.clone().unwrap_or_default();
                if let Some(difficulty) = record.difficulty {
                    info!(problem_id, %difficulty, tags = %record.tags.iter().join(", "), "rated");
                }
                if store.upsert(record)? {
                    stats.replaced += 1;
                }
                stats.collected += 1;
                info!(problem_id, %title, stored = store.len(), "saved");
            }
            Err(FetchError::NotFound(_)) => {
                warn!(problem_id, "problem not found, skipping");
                stats.not_found += 1;
            }
            Err(e @ FetchError::MissingTitle(_)) => {
                warn!(problem_id, "{}, skipping", e);
                stats.skipped += 1;
            }
            Err(e) => {
                warn!(problem_id, error = %e, "fetch failed, skipping");
                stats.failed += 1;
            }
        }
        pb.inc(1);

        if idx + 1 < ids.len() {
            thread::sleep(delay);
        }
    }

    Ok(stats)
}
