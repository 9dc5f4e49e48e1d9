mod logging;

use anyhow::Context;
use clap::{Parser, Subcommand};
use ferret_inspect::{inspect_process, process_inspection_available, source_for_pid, SourceOptions};
use ferret_web::{FetchSettings, Scraper};

/// Web scraping and local binary inspection demos.
#[derive(Parser)]
#[command(name = "ferret", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch a page and print what the query layer sees.
    Fetch {
        /// Url to fetch.
        #[arg(default_value = "https://example.com")]
        url: String,
    },
    /// Print metadata and a source sample for a local process.
    Inspect {
        /// Pid to inspect; defaults to the current process.
        pid: Option<u32>,
    },
}

fn main() -> anyhow::Result<()> {
    logging::initialize();
    let cli = Cli::parse();
    match cli.command {
        Command::Fetch { url } => run_fetch(&url),
        Command::Inspect { pid } => run_inspect(pid.unwrap_or_else(std::process::id)),
    }
}

fn run_fetch(url: &str) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("tokio runtime")?;
    let mut scraper = Scraper::new(FetchSettings::default())?;

    println!("[demo] fetching {url} ...");
    runtime.block_on(scraper.get(url))?;

    let page = scraper.page()?;
    println!("-> title: {:?}", page.select("title")?);
    println!("-> h1: {:?}", page.select("h1")?);
    let text = page.visible_text(true);
    println!("-> text (first 200 chars): {}", truncate_chars(&text, 200));
    println!(
        "-> interactions: {}",
        serde_json::to_string_pretty(&page.interactions())?
    );
    Ok(())
}

fn run_inspect(pid: u32) -> anyhow::Result<()> {
    if !process_inspection_available() {
        // Expected on exotic platforms, not an error.
        println!("process inspection is not supported on this platform");
        return Ok(());
    }

    println!("inspecting pid={pid}");
    let report = inspect_process(pid)?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    let options = SourceOptions {
        strings_limit: 30,
        ..SourceOptions::default()
    };
    let source = source_for_pid(pid, &options)?;
    println!("source path: {}", source.source_path.display());
    println!(
        "sha256: {}",
        source.sha256.as_deref().unwrap_or("unavailable")
    );
    let sample: Vec<&str> = source
        .strings
        .iter()
        .take(5)
        .map(|run| run.value.as_str())
        .collect();
    println!("strings sample: {sample:?}");
    Ok(())
}

fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}
