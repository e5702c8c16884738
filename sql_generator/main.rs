use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use boj_pipeline::percent;
use boj_pipeline::settings::Settings;
use boj_pipeline::sqlgen::render_script;
use boj_pipeline::store::load_records;
use chrono::Local;
use clap::Parser;
use tracing::info;

#[derive(Parser)]
#[command(name = "sql_generator", about = "Write plain-text problems as a SQL migration")]
struct Cli {
    /// Problem store written by the fetcher
    json_file: PathBuf,
    /// Migration file to write (default: sql.output_file)
    output_file: Option<PathBuf>,
    /// Author id noted in the script header (default: sql.author_id)
    author_id: Option<i64>,
}

fn main() -> Result<()> {
    boj_pipeline::init_tracing();
    let cli = Cli::parse();
    let mut settings = Settings::load()?;
    if let Some(output) = cli.output_file {
        settings.sql.output_file = output;
    }
    if let Some(author_id) = cli.author_id {
        settings.sql.author_id = author_id;
    }

    println!("SQL Migration Generator (problems without math)");
    println!("===============================================\n");

    let records = load_records(&cli.json_file)?;
    let total = records.len();
    info!(total, input = ?cli.json_file, "store loaded");

    let script = render_script(
        &records,
        &settings.sql,
        &settings.defaults,
        Local::now().naive_local(),
    )?;
    println!("Loaded {} problems from {:?}", total, cli.json_file);
    println!(
        "  included (no math): {} ({:.1}%)",
        script.included,
        percent(script.included, total)
    );
    println!(
        "  excluded (math):    {} ({:.1}%)\n",
        script.excluded,
        percent(script.excluded, total)
    );

    let out = &settings.sql.output_file;
    fs::write(out, &script.text).with_context(|| format!("Failed to write {:?}", out))?;

    println!("Wrote {:?} ({} bytes)", out, script.text.len());
    println!("Author id: {}", settings.sql.author_id);
    Ok(())
}
