//! The AI player binary: speaks the line protocol over stdin/stdout,
//! selecting moves with the negamax search. Also offers `analyze` and
//! `benchmark` modes for offline inspection of the search.

use std::io::BufRead;

use clap::{Parser, Subcommand};
use flexi_logger::{AdaptiveFormat, Logger, WriteMode};
use lib_blackhole::prelude::*;
use lib_blackhole::search::SearchOutcome;
use lib_blackhole::utils::prelude::*;

/// Black Hole AI player.
///
/// With no subcommand, plays a game over stdin/stdout: if a transcript is
/// given, play resumes from that state, otherwise the first five lines of
/// input are read as the brown stones.
#[derive(Clone, Debug, Parser)]
struct PlayerOptions {
    #[command(subcommand)]
    command: Option<Command>,

    /// Maximum search depth, in coloured plies.
    #[arg(short = 'd', long = "max_search_depth", default_value_t = 4, global = true)]
    max_search_depth: usize,

    /// Order candidate moves by descending liberty count before
    /// searching them.
    #[arg(short = 'o', long, global = true)]
    order_by_liberties: bool,

    #[arg(long, global = true)]
    log_level: Option<String>,

    /// A base-36 transcript to resume play from.
    transcript: Option<String>,
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Reports the best move for a single transcript and exits.
    Analyze { transcript: String },
    /// Reads one transcript per line from stdin, searching each and
    /// printing accumulated node-visit totals.
    Benchmark,
}

fn init_logging(log_level: &Option<String>) -> Result<flexi_logger::LoggerHandle> {
    Ok(Logger::try_with_env_or_str(log_level.clone().unwrap_or_else(|| "info".into()))?
        .write_mode(WriteMode::BufferAndFlush)
        .log_to_stderr()
        .adaptive_format_for_stderr(match cfg!(debug_assertions) {
            true => AdaptiveFormat::WithThread,
            false => AdaptiveFormat::Default,
        })
        .start()?)
}

fn search_config(options: &PlayerOptions) -> SearchConfig {
    SearchConfig {
        max_depth: options.max_search_depth,
        stone_selection: StoneSelection::ForceHighest,
        order_by_liberties: options.order_by_liberties,
        rng_seed: 0,
    }
}

fn analyze_one(transcript: &str, config: &SearchConfig) -> Result<(SearchOutcome, SearchStats)> {
    let history = notation::decode_history(transcript)
        .with_context(|| format!("decoding transcript {transcript:?}"))?;
    let mut state = State::new();
    for mv in history {
        state
            .play(mv)
            .map_err(|e| anyhow!("transcript {transcript:?} is invalid: {e}"))?;
    }
    if state.is_terminal() {
        return Err(anyhow!("transcript {transcript:?} is already a finished game"));
    }
    Ok(search(&mut state, config))
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let options = PlayerOptions::parse();
    let _logger = init_logging(&options.log_level)?;
    let config = search_config(&options);

    match &options.command {
        Some(Command::Analyze { transcript }) => {
            let (outcome, stats) = analyze_one(transcript, &config)?;
            println!(
                "{}={} value={} nodes={}",
                board::field_name(outcome.best_move.field),
                outcome.best_move.value,
                outcome.value,
                stats.total(),
            );
        }
        Some(Command::Benchmark) => {
            let stdin = std::io::stdin();
            let mut total_nodes = 0u64;
            let mut games = 0u64;
            for line in stdin.lock().lines() {
                let line = line?;
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let (_, stats) = analyze_one(line, &config)?;
                total_nodes += stats.total();
                games += 1;
                log::debug!("benchmark: transcript={line:?} nodes={}", stats.total());
            }
            println!("games={games} total_nodes={total_nodes}");
        }
        None => {
            log::info!("blackhole player starting (max_search_depth={})", options.max_search_depth);
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            let mut session = match &options.transcript {
                Some(transcript) => {
                    let history = notation::decode_history(transcript)
                        .with_context(|| format!("decoding starting transcript {transcript:?}"))?;
                    PlayerSession::from_history(history, config)?
                }
                None => PlayerSession::new(config),
            };
            session.run(stdin.lock(), stdout.lock())?;
            log::info!("exiting");
        }
    }
    Ok(())
}
