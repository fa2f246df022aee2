//! Segment Leaderboard main entry point
//!
//! This is the command-line interface for the segment leaderboard tools.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use segment_leaderboard::config::{load_config_with_hash, Config, CrawlerConfig};
use segment_leaderboard::crawler::{build_http_client, split_segment_list, star_segment};
use segment_leaderboard::output::{format_missing, write_leaderboard, write_rank_records};
use segment_leaderboard::pipeline::{find_missing, http_crawler, lookup_ranks, score_run};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Segment Leaderboard: rankings and points across timed segments
///
/// Crawls segment leaderboards as an authenticated user and turns the elapsed
/// times into Olympic-style rankings and cumulative points tables.
#[derive(Parser, Debug)]
#[command(name = "segment-leaderboard")]
#[command(version)]
#[command(about = "Builds leaderboards from timed segment rankings", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score every segment for every run and write one leaderboard per run
    Leaderboard {
        #[command(flatten)]
        source: CrawlSource,

        /// Directory receiving one output file per run configuration
        #[arg(long, value_name = "DIR")]
        output_dir: PathBuf,
    },

    /// Write an athlete's rank and field size for each segment they completed
    Ranks {
        #[command(flatten)]
        source: CrawlSource,

        /// Athlete display name, exactly as shown on the leaderboard
        #[arg(long)]
        name: String,

        #[arg(long, value_name = "FILE")]
        output_file: PathBuf,

        /// Index of the run configuration whose options are crawled
        #[arg(long, default_value_t = 0)]
        run: usize,
    },

    /// Print the segments an athlete has not completed yet
    Missing {
        #[command(flatten)]
        source: CrawlSource,

        /// Athlete display name, exactly as shown on the leaderboard
        #[arg(long)]
        name: String,

        /// Query option used to crawl each segment
        #[arg(long, default_value = "filter=overall")]
        filter: String,
    },

    /// Star a list of segments through the REST API
    Star {
        /// Comma-separated segment ids
        #[arg(long)]
        segments: String,

        /// OAuth access token with write access
        #[arg(long)]
        access_token: String,

        /// API root; defaults to the config's api_base_url
        #[arg(long)]
        api_base: Option<Url>,

        /// Optional configuration supplying crawler settings
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Validate a configuration and show what would be crawled
    Check {
        #[arg(long, value_name = "FILE")]
        config: PathBuf,
    },
}

#[derive(Args, Debug)]
struct CrawlSource {
    /// Path to the JSON (or .toml) configuration file
    #[arg(long, value_name = "FILE")]
    config: PathBuf,

    /// Cookie jar or raw Cookie header for the authenticated session
    #[arg(long, value_name = "FILE")]
    cookie_file: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Command::Leaderboard { source, output_dir } => handle_leaderboard(&source, &output_dir).await,
        Command::Ranks {
            source,
            name,
            output_file,
            run,
        } => handle_ranks(&source, &name, &output_file, run).await,
        Command::Missing {
            source,
            name,
            filter,
        } => handle_missing(&source, &name, &filter).await,
        Command::Star {
            segments,
            access_token,
            api_base,
            config,
        } => handle_star(&segments, &access_token, api_base, config.as_deref()).await,
        Command::Check { config } => handle_check(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("segment_leaderboard=info,warn"),
            1 => EnvFilter::new("segment_leaderboard=debug,info"),
            2 => EnvFilter::new("segment_leaderboard=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

fn load(path: &Path) -> anyhow::Result<Config> {
    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("failed to load {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);
    Ok(config)
}

/// Handles the leaderboard command: one scored file per run configuration
async fn handle_leaderboard(source: &CrawlSource, output_dir: &Path) -> anyhow::Result<()> {
    let config = load(&source.config)?;
    let crawler = http_crawler(&config, &source.cookie_file)?;

    for run in &config.runs {
        tracing::info!("Scoring run '{}' with options {:?}", run.output_file, run.options);
        let board = score_run(
            &crawler,
            &config.markup,
            &config.segments,
            &config.scoring,
            run,
        )
        .await?;
        write_leaderboard(&output_dir.join(&run.output_file), &board)?;
    }

    Ok(())
}

/// Handles the ranks command
async fn handle_ranks(
    source: &CrawlSource,
    name: &str,
    output_file: &Path,
    run_index: usize,
) -> anyhow::Result<()> {
    let config = load(&source.config)?;
    let run = config.runs.get(run_index).with_context(|| {
        format!(
            "run index {} is out of range ({} runs configured)",
            run_index,
            config.runs.len()
        )
    })?;
    let crawler = http_crawler(&config, &source.cookie_file)?;

    let records = lookup_ranks(&crawler, &config.markup, &config.segments, run, name).await?;
    tracing::info!("{} appears on {} of {} segments", name, records.len(), config.segments.len());
    write_rank_records(output_file, &records)?;

    Ok(())
}

/// Handles the missing command, printing the result to stdout
async fn handle_missing(source: &CrawlSource, name: &str, filter: &str) -> anyhow::Result<()> {
    let config = load(&source.config)?;
    let crawler = http_crawler(&config, &source.cookie_file)?;

    let missing = find_missing(&crawler, &config.markup, &config.segments, filter, name).await?;
    println!("{}", format_missing(&missing));

    Ok(())
}

/// Handles the star command
async fn handle_star(
    segments: &str,
    access_token: &str,
    api_base: Option<Url>,
    config: Option<&Path>,
) -> anyhow::Result<()> {
    let crawler_config = match config {
        Some(path) => load(path)?.crawler,
        None => CrawlerConfig::default(),
    };
    let api_base = match api_base {
        Some(url) => url,
        None => Url::parse(&crawler_config.api_base_url)?,
    };
    let client = build_http_client(&crawler_config, None)?;

    for segment in split_segment_list(segments) {
        let body = star_segment(&client, &api_base, access_token, &segment).await?;
        println!("{}", body);
    }

    Ok(())
}

/// Handles the check command: validates config and shows what would be crawled
fn handle_check(path: &Path) -> anyhow::Result<()> {
    let config = load(path)?;

    println!("=== Segment Leaderboard Check ===\n");

    println!("Segments ({}):", config.segments.len());
    for segment in &config.segments {
        println!("  - {}", segment);
    }

    println!("\nScoring:");
    println!("  Points: {:?}", config.scoring.points);
    println!("  Participation points: {}", config.scoring.participation_points);
    println!(
        "  Unmatched participation points: {}",
        config.scoring.unmatched_participation_points
    );

    println!("\nRuns ({}):", config.runs.len());
    for run in &config.runs {
        println!("  - {} <- {}", run.output_file, run.options.join(" | "));
    }

    println!("\nCrawler:");
    println!("  Base URL: {}", config.crawler.base_url);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!("  Max retries: {}", config.crawler.max_retries);

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would crawl {} segment/option pairs",
        config.segments.len() * config.runs.iter().map(|r| r.options.len()).sum::<usize>()
    );

    Ok(())
}
