use std::time::Instant;

use anyhow::{Context, Result};
use boj_pipeline::fetch::{self, parse_id_tokens, JudgeClient, SAMPLE_IDS};
use boj_pipeline::settings::Settings;
use boj_pipeline::store::ProblemStore;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

#[derive(Parser)]
#[command(name = "fetcher", about = "Collect Baekjoon problems into the JSON store")]
struct Cli {
    /// Problem ids or inclusive ranges, e.g. `1000 1001 1000-1010`
    #[arg(allow_hyphen_values = true)]
    ids: Vec<String>,
}

fn main() -> Result<()> {
    boj_pipeline::init_tracing();
    let cli = Cli::parse();
    let settings = Settings::load()?;
    info!(store = ?settings.store_path, judge = %settings.fetch.judge_base_url, "settings loaded");

    let ids = if cli.ids.is_empty() {
        println!("Usage: fetcher [ID|LO-HI]...");
        println!("  fetcher 1000 1001 1002");
        println!("  fetcher 1000-1010");
        println!("\nNo ids given, fetching samples: {:?}\n", SAMPLE_IDS);
        SAMPLE_IDS.to_vec()
    } else {
        parse_id_tokens(&cli.ids).context("Bad problem id argument")?
    };

    println!("Baekjoon Problem Fetcher");
    println!("========================\n");
    println!("Problems to fetch: {}", ids.len());

    let mut store = ProblemStore::open(&settings.store_path)?;
    if !store.is_empty() {
        println!("Existing store: {} problems in {:?}", store.len(), store.path());
    }
    println!();

    let client = JudgeClient::new(&settings)?;
    let pb = ProgressBar::new(ids.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg} (eta {eta})")?
            .progress_chars("=> "),
    );

    let t0 = Instant::now();
    let stats = fetch::collect(&client, &ids, &mut store, settings.fetch.delay(), &pb)?;
    pb.finish_and_clear();

    println!("Done in {:.1}s", t0.elapsed().as_secs_f64());
    println!("Collected:  {} ({} replaced)", stats.collected, stats.replaced);
    println!("Not found:  {}", stats.not_found);
    println!("Skipped:    {}", stats.skipped);
    println!("Failed:     {}", stats.failed);
    println!("Stored:     {} problems in {:?}", store.len(), store.path());
    Ok(())
}
