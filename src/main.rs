use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chess_filter::chess::{lowtime, sink};
use chess_filter::{FilterOptions, RunConfig};
use clap::Parser;
use tracing::warn;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Filter chess games by rating, result and time control into a zstd stream"
)]
struct Cli {
    /// Minimum rating (exclusive): both players must be rated above this
    #[arg(value_name = "eloMin", allow_negative_numbers = true)]
    elo_min: i32,

    /// Maximum rating (inclusive)
    #[arg(value_name = "eloMax", allow_negative_numbers = true)]
    elo_max: i32,

    /// Output file (zstd-compressed PGN)
    #[arg(value_name = "output")]
    output: PathBuf,

    /// Input PGN files (.pgn or .pgn.zst); glob patterns are expanded
    #[arg(value_name = "targets", required = true, num_args = 1..)]
    targets: Vec<String>,

    /// Exclude bullet and ultrabullet games
    #[arg(long = "remove_bullet")]
    remove_bullet: bool,

    /// Strip moves played with little time left on the clock
    #[arg(long = "remove_low_time")]
    remove_low_time: bool,

    /// Clock threshold in seconds for --remove_low_time
    #[arg(
        long = "low_time_threshold",
        value_name = "SECONDS",
        default_value_t = lowtime::DEFAULT_LOW_TIME_SECONDS
    )]
    low_time_threshold: u32,

    /// zstd compression level for the output
    #[arg(long, value_name = "N", default_value_t = sink::DEFAULT_COMPRESSION_LEVEL)]
    level: i32,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    chess_filter::chess::log::init();

    if cli.elo_min >= cli.elo_max {
        warn!(
            "eloMin ({}) is not below eloMax ({}); no game can pass the rating filter",
            cli.elo_min, cli.elo_max
        );
    }

    let options = FilterOptions {
        elo_min: cli.elo_min,
        elo_max: cli.elo_max,
        remove_bullet: cli.remove_bullet,
        remove_low_time: cli.remove_low_time,
    };
    let config = RunConfig {
        output: cli.output,
        targets: cli.targets,
        compression_level: cli.level,
        low_time_seconds: cli.low_time_threshold,
    };

    let report = chess_filter::run(options, &config)
        .with_context(|| format!("failed to filter into {}", config.output.display()))?;

    if let Some(err) = report.aborted {
        bail!(
            "output {} is incomplete after {} games: {}",
            config.output.display(),
            report.stats.accepted,
            err
        );
    }
    Ok(())
}
