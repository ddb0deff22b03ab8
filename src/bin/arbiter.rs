//! Referees matches between two player commands, printing one transcript
//! line per game and, for multi-game series, a summary table.

use clap::Parser;
use flexi_logger::{AdaptiveFormat, Logger, WriteMode};
use lib_blackhole::tournament::{format_summary_table, Tournament, TournamentOptions};
use lib_blackhole::utils::prelude::*;

/// Black Hole arbiter: runs one or more games between two player
/// processes and reports the results.
///
/// Usage: arbiter [--rounds=<N>] [--logs=<filename-prefix>] <player1> <player2>
#[derive(Clone, Debug, Parser)]
struct ArbiterArgs {
    /// Number of rounds to play (each round is two games with sides
    /// swapped). 0 plays a single game.
    #[arg(long, default_value_t = 0)]
    rounds: usize,

    /// Prefix for per-game, per-side log files. Use "-" to send all logs
    /// to stderr, or omit to discard them.
    #[arg(long)]
    logs: Option<String>,

    #[arg(long)]
    log_level: Option<String>,

    player1: String,
    player2: String,
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let args = ArbiterArgs::parse();
    let _logger = Logger::try_with_env_or_str(args.log_level.clone().unwrap_or_else(|| "info".into()))?
        .write_mode(WriteMode::BufferAndFlush)
        .log_to_stderr()
        .adaptive_format_for_stderr(match cfg!(debug_assertions) {
            true => AdaptiveFormat::WithThread,
            false => AdaptiveFormat::Default,
        })
        .start()?;

    let options = TournamentOptions {
        player_commands: [args.player1.clone(), args.player2.clone()],
        rounds: args.rounds,
        logs_prefix: args.logs.clone(),
    };
    let tournament = Tournament::new(options.clone());
    let summary = tournament.run()?;

    for (game, result) in &summary.games {
        let sign = if result.score > 0 { "+" } else { "" };
        println!("{game:4}: {} {sign}{}", result.transcript, result.score);
    }

    if summary.games.len() > 1 {
        println!();
        print!("{}", format_summary_table(&options, &summary));
    }

    Ok(())
}
