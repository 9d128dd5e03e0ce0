//! Almanac CLI
//!
//! Command-line front end over a CSV file of dated values:
//! - List events in a date range
//! - Read roll-up statistics for a year, quarter, month or day
//! - Summarize every populated year and month
//! - Generate a default config file

use almanac::config::{generate_default_config, Config, LoggingConfig};
use almanac::{
    CsvLoader, DateBound, NodeSelector, Record, TimeCriteria, Timeline, TimelineError,
};
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "almanac")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Query and roll up dated values by calendar period")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,

    /// Date format of the CSV date column (strftime)
    #[arg(long, global = true)]
    pub date_format: Option<String>,

    /// Scan from the first event instead of using the seek index
    #[arg(long, global = true)]
    pub no_seek: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List events in a date range
    Events {
        /// Path to CSV file
        path: PathBuf,
        /// Lower bound: YYYY, YYYY-MM or YYYY-MM-DD
        #[arg(long)]
        from: Option<DateBound>,
        /// Upper bound: YYYY, YYYY-MM or YYYY-MM-DD
        #[arg(long)]
        to: Option<DateBound>,
    },

    /// Show count, sum and average for a calendar bucket
    Stat {
        /// Path to CSV file
        path: PathBuf,
        /// Year (omit for every event)
        #[arg(short, long)]
        year: Option<i32>,
        /// Quarter 1-4
        #[arg(short, long, requires = "year", conflicts_with = "month")]
        quarter: Option<u32>,
        /// Month 1-12
        #[arg(short, long, requires = "year")]
        month: Option<u32>,
        /// Day of month
        #[arg(short, long, requires = "month")]
        day: Option<u32>,
    },

    /// Per-year and per-month statistics
    Summary {
        /// Path to CSV file
        path: PathBuf,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(format) = &cli.date_format {
        config.import.date_format = format.clone();
    }
    if cli.no_seek {
        config.index.seek_index = false;
    }

    init_logging(&config.logging);

    match cli.command {
        Commands::Events { path, from, to } => {
            let timeline = load_timeline(&path, &config)?;
            let criteria = TimeCriteria::new(from, to);
            let events: Vec<_> = timeline.query(&criteria).collect();

            match cli.format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&events)?),
                _ => {
                    println!("{:<12} {:>14}  {}", "DATE", "VALUE", "LABEL");
                    for event in &events {
                        let record = event.payload();
                        println!(
                            "{:<12} {:>14.4}  {}",
                            event.date(),
                            record.value,
                            record.label.as_deref().unwrap_or("")
                        );
                    }
                    println!();
                    println!("{} events", events.len());
                }
            }
        }

        Commands::Stat {
            path,
            year,
            quarter,
            month,
            day,
        } => {
            let selector = selector_for(year, quarter, month, day)?;
            let timeline = load_timeline(&path, &config)?;
            let stat = timeline.stat(selector);

            match cli.format.as_str() {
                "json" => {
                    let body = serde_json::json!({
                        "bucket": selector.to_string(),
                        "stat": stat.summary(),
                    });
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
                _ => println!("{}: {}", selector, stat),
            }
        }

        Commands::Summary { path } => {
            let timeline = load_timeline(&path, &config)?;
            print_summary(&timeline, &cli.format)?;
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("Config written to {}", path.display());
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("almanac={}", logging.level)));

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn load_timeline(path: &Path, config: &Config) -> anyhow::Result<Timeline<Record>> {
    let result = CsvLoader::new(config.import.clone())
        .load(path)
        .with_context(|| format!("importing {}", path.display()))?;

    for error in &result.errors {
        tracing::warn!("{}", error);
    }
    if result.rows_failed > 0 {
        eprintln!("Skipped {} unreadable rows", result.rows_failed);
    }
    if result.rows_skipped > 0 {
        eprintln!("Skipped {} rows with no value", result.rows_skipped);
    }

    let timeline = result.into_timeline(config.index.clone());
    tracing::info!("Loaded timeline: {}", timeline.stats());
    Ok(timeline)
}

fn selector_for(
    year: Option<i32>,
    quarter: Option<u32>,
    month: Option<u32>,
    day: Option<u32>,
) -> Result<NodeSelector, TimelineError> {
    match (year, quarter, month, day) {
        (None, ..) => Ok(NodeSelector::All),
        (Some(y), Some(q), _, _) => NodeSelector::quarter(y, q),
        (Some(y), None, Some(m), Some(d)) => NodeSelector::day(y, m, d),
        (Some(y), None, Some(m), None) => NodeSelector::month(y, m),
        (Some(y), None, None, _) => Ok(NodeSelector::year(y)),
    }
}

fn print_summary(timeline: &Timeline<Record>, format: &str) -> anyhow::Result<()> {
    let mut rows = Vec::new();
    for year in timeline.years() {
        rows.push((NodeSelector::Year(year), timeline.stat(NodeSelector::Year(year))));
        for month in timeline.months(year) {
            let selector = NodeSelector::Month(year, month);
            rows.push((selector, timeline.stat(selector)));
        }
    }

    match format {
        "json" => {
            let body: Vec<_> = rows
                .iter()
                .map(|(selector, stat)| {
                    serde_json::json!({
                        "bucket": selector.to_string(),
                        "stat": stat.summary(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        _ => {
            println!("{:<10} {:>8} {:>14} {:>12}", "BUCKET", "COUNT", "SUM", "AVG");
            for (selector, stat) in &rows {
                let indent = if matches!(selector, NodeSelector::Month(..)) { "  " } else { "" };
                let avg = stat
                    .avg()
                    .map(|a| format!("{:.4}", a))
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{:<10} {:>8} {:>14.4} {:>12}",
                    format!("{}{}", indent, selector),
                    stat.count,
                    stat.sum,
                    avg
                );
            }
        }
    }

    Ok(())
}
