use std::{sync::Arc, time::Duration};

use anyhow::Result;
use clap::Parser;
use console::style;
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::fs;

use recap_core::{
    OllamaClient, chunk_text, clean_srt, download_captions, finalize, get_workdir,
    merge_summaries, summarize_batches, validate_url,
};

#[derive(Parser)]
#[command(name = "recap")]
#[command(
    about = "Summarize a YouTube video's captions into quick and extended digests with a local Ollama model"
)]
struct Cli {
    /// Video URL (prompted for interactively when omitted)
    url: Option<String>,

    /// Ollama model name
    #[arg(short, long, default_value = recap_core::DEFAULT_MODEL)]
    model: String,

    /// Ollama base URL
    #[arg(long, default_value = recap_core::DEFAULT_BASE_URL)]
    base_url: String,

    /// Maximum characters per transcript chunk
    #[arg(long, default_value_t = recap_core::DEFAULT_MAX_CHARS, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    max_chars: usize,

    /// Chunks summarized per backend call
    #[arg(long, default_value_t = recap_core::DEFAULT_BATCH_SIZE, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    batch_size: usize,

    /// Concurrent backend calls during the batch phase
    #[arg(short, long, default_value_t = recap_core::DEFAULT_WORKERS, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    workers: usize,
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

async fn run(cli: Cli, url: String) -> Result<()> {
    let workdir = get_workdir(&url);
    fs::create_dir_all(&workdir).await?;

    // Step 1: Captions
    let spinner = create_spinner("Downloading captions...");
    let srt_path = download_captions(&url, &workdir).await?;
    spinner.finish_with_message(format!(
        "{} Captions downloaded: {}",
        style("✓").green().bold(),
        style(srt_path.file_name().unwrap_or_default().to_string_lossy()).dim()
    ));

    // Step 2: Clean
    let raw = fs::read_to_string(&srt_path).await?;
    let transcript = clean_srt(&raw);
    println!(
        "{} Transcript cleaned: {} characters",
        style("✓").green().bold(),
        style(transcript.chars().count()).yellow()
    );

    // Step 3: Chunk
    let chunks = chunk_text(&transcript, cli.max_chars);
    let total_batches = chunks.len().div_ceil(cli.batch_size);

    // Step 4: Summarize batches concurrently
    println!(
        "{} Summarizing {} batches with {} workers...",
        style("⚡").yellow(),
        total_batches,
        cli.workers
    );
    let bar = ProgressBar::new(total_batches as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.cyan/blue} {pos}/{len} batches")
            .unwrap(),
    );
    let client = Arc::new(OllamaClient::new(&cli.base_url, &cli.model));
    let progress = bar.clone();
    let summaries = summarize_batches(
        client.clone(),
        &chunks,
        cli.batch_size,
        cli.workers,
        move |done, _total| progress.set_position(done as u64),
    )
    .await?;
    bar.finish_and_clear();
    println!("{} Batches summarized", style("✓").green().bold());

    // Step 5: Merge
    let spinner = create_spinner("Merging batch summaries...");
    let merged = merge_summaries(client.as_ref(), &summaries).await?;
    spinner.finish_with_message(format!("{} Summaries merged", style("✓").green().bold()));

    // Step 6: Digests
    let spinner = create_spinner(&format!("Generating digests with {}...", client.model()));
    let digests = finalize(client.as_ref(), &merged).await?;
    spinner.finish_with_message(format!("{} Digests generated", style("✓").green().bold()));

    println!("\n{}", style("─".repeat(60)).dim());
    println!("\n{}\n", style("Quick Digest").cyan().bold());
    println!("{}", digests.quick);
    println!("\n{}\n", style("Extended Digest").cyan().bold());
    println!("{}", digests.extended);

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    println!(
        "\n{}  {}\n",
        style("recap").cyan().bold(),
        style("Caption Summarizer").dim()
    );

    let input = match &cli.url {
        Some(url) => url.clone(),
        None => Input::new()
            .with_prompt("Paste a YouTube video URL")
            .allow_empty(true)
            .interact_text()?,
    };

    // Reject bad locators before any subprocess or network activity
    let url = match validate_url(&input) {
        Ok(url) => url,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    };

    tokio::select! {
        result = run(cli, url) => {
            if let Err(e) = result {
                eprintln!("\n{} {}", style("Error:").red().bold(), e);
                std::process::exit(1);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            println!("\n{} Stopped by user.", style("✗").red().bold());
        }
    }

    Ok(())
}
