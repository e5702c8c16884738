//! Baekjoon problem pipeline: scrape problems into a JSON store, then route
//! each stored record either to the lecture HTTP API (math-bearing) or to a
//! SQL migration script (plain text).

pub mod classify;
pub mod content;
pub mod fetch;
pub mod model;
pub mod publish;
pub mod settings;
pub mod sqlgen;
pub mod store;

#[cfg(test)]
mod test_support;

/// Install the fmt subscriber. `RUST_LOG` wins, otherwise `info`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .try_init();
}

/// Percentage helper that tolerates an empty denominator.
pub fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}
