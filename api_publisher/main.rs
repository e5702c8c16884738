use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use boj_pipeline::classify;
use boj_pipeline::percent;
use boj_pipeline::publish::{write_failures, HttpLectureApi, Publisher, RetryPolicy};
use boj_pipeline::settings::Settings;
use boj_pipeline::store::load_records;
use chrono::Local;
use clap::Parser;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "api_publisher", about = "Publish math-bearing problems through the lecture API")]
struct Cli {
    /// Problem store written by the fetcher
    json_file: PathBuf,
    /// Lecture endpoint (default: publish.api_url)
    api_url: Option<String>,
    /// Value of the X-User-Id header (default: publish.user_id)
    user_id: Option<i64>,
}

fn main() -> Result<()> {
    boj_pipeline::init_tracing();
    let cli = Cli::parse();
    let mut settings = Settings::load()?;
    if let Some(url) = cli.api_url {
        settings.publish.api_url = url;
    }
    if let Some(user_id) = cli.user_id {
        settings.publish.user_id = user_id;
    }
    let publish = &settings.publish;

    println!("Lecture API Publisher (math-bearing problems)");
    println!("=============================================\n");
    println!("Started:  {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
    println!("Endpoint: {}", publish.api_url);
    println!("User id:  {}\n", publish.user_id);

    let records = load_records(&cli.json_file)?;
    let total = records.len();
    let (math, plain) = classify::partition(&records);
    println!("Loaded {} problems from {:?}", total, cli.json_file);
    println!("  with math:    {} ({:.1}%)", math.len(), percent(math.len(), total));
    println!("  without math: {} ({:.1}%)\n", plain.len(), percent(plain.len(), total));

    if math.is_empty() {
        warn!("no math-bearing problems to publish");
        return Ok(());
    }

    let api = HttpLectureApi::new(
        publish.api_url.clone(),
        publish.user_id,
        Duration::from_secs(publish.request_timeout_secs),
    )?;

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = Arc::clone(&stop);
        ctrlc::set_handler(move || stop.store(true, Ordering::SeqCst))
            .context("Failed to install Ctrl-C handler")?;
    }

    let publisher = Publisher {
        api: &api,
        policy: RetryPolicy::from_settings(publish),
        pacing: Duration::from_millis(publish.pacing_ms),
        defaults: &settings.defaults,
    };
    info!(count = math.len(), "publishing");
    let report = publisher.run(&math, &stop);

    let secs = report.elapsed.as_secs_f64();
    let rate = if secs > 0.0 { report.attempted as f64 / secs } else { 0.0 };
    println!("\nAttempted: {}", report.attempted);
    println!(
        "Succeeded: {} ({:.1}%)",
        report.succeeded,
        percent(report.succeeded, report.attempted)
    );
    println!(
        "Failed:    {} ({:.1}%)",
        report.failed(),
        percent(report.failed(), report.attempted)
    );
    println!("Elapsed:   {:.1} min ({:.2} problems/s)", secs / 60.0, rate);

    if write_failures(&publish.failed_output, &report.failures)? {
        println!(
            "Failed problems written to {:?} for a later retry",
            publish.failed_output
        );
    }

    if report.interrupted {
        warn!(done = report.attempted, total = math.len(), "interrupted by user");
        std::process::exit(1);
    }

    println!("Finished: {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
    Ok(())
}
