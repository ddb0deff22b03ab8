//! Runs a round-robin match series between two players, swapping which
//! side plays red/blue each round, and aggregates the results.

use std::time::Duration;

use crate::arbiter::{Arbiter, ArbiterOptions, GameResult, LogDestination};
use crate::utils::prelude::*;

#[derive(Clone, Debug)]
pub struct TournamentOptions {
    pub player_commands: [String; 2],
    /// Number of rounds to play; each round is two games with sides
    /// swapped, so the series totals `2 * rounds` games (or just one game
    /// if `rounds == 0`, matching the original tool's "quick match" mode).
    pub rounds: usize,
    /// Where each game's per-player logs are written. `None` mirrors the
    /// original's "no --logs given" behaviour (both redirected to
    /// `/dev/null`).
    pub logs_prefix: Option<String>,
}

/// Per-player aggregate statistics across a tournament.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlayerStats {
    pub wins: u32,
    pub ties: u32,
    pub losses: u32,
    pub failures: u32,
    pub score_as_red: i32,
    pub score_as_blue: i32,
    pub total_score: i32,
    pub total_time: Duration,
    pub max_time: Duration,
}

#[derive(Clone, Debug)]
pub struct TournamentSummary {
    pub games: Vec<(usize, GameResult)>,
    pub stats: [PlayerStats; 2],
}

pub struct Tournament {
    options: TournamentOptions,
}

impl Tournament {
    pub fn new(options: TournamentOptions) -> Self {
        Tournament { options }
    }

    fn log_destination(&self, game: usize, side: usize, colour: &str) -> LogDestination {
        match &self.options.logs_prefix {
            None => LogDestination::Null,
            Some(prefix) if prefix == "-" => LogDestination::Stderr,
            Some(prefix) => {
                LogDestination::File(format!("{prefix}{game:04}_{side}_{colour}").into())
            }
        }
    }

    /// Plays the full series and returns the aggregated summary. Prints
    /// nothing; callers render the per-game lines and summary table as
    /// they see fit (the `player` and `arbiter` binaries print them to
    /// match the original's exact layout).
    pub fn run(&self) -> Result<TournamentSummary> {
        let games_total = if self.options.rounds == 0 { 1 } else { 2 * self.options.rounds };
        let mut stats = [PlayerStats::default(); 2];
        let mut games = Vec::with_capacity(games_total);

        for game in 0..games_total {
            let p = game % 2;
            let q = 1 - p;

            let arbiter = Arbiter::new(ArbiterOptions {
                player1_command: self.options.player_commands[p].clone(),
                player2_command: self.options.player_commands[q].clone(),
                log1: self.log_destination(game, 0, "red"),
                log2: self.log_destination(game, 1, "blue"),
            });
            let result = arbiter.run_game().with_context(|| format!("running game {game}"))?;

            stats[p].score_as_red += result.score;
            stats[q].score_as_blue += -result.score;
            stats[p].total_score += result.score;
            stats[q].total_score -= result.score;

            match result.score.cmp(&0) {
                std::cmp::Ordering::Greater => {
                    stats[p].wins += 1;
                    stats[q].losses += 1;
                }
                std::cmp::Ordering::Less => {
                    stats[p].losses += 1;
                    stats[q].wins += 1;
                }
                std::cmp::Ordering::Equal => {
                    stats[p].ties += 1;
                    stats[q].ties += 1;
                }
            }
            if result.score == -99 {
                stats[p].failures += 1;
            }
            if result.score == 99 {
                stats[q].failures += 1;
            }

            stats[p].total_time += result.wall_time[0];
            stats[q].total_time += result.wall_time[1];
            stats[p].max_time = stats[p].max_time.max(result.wall_time[0]);
            stats[q].max_time = stats[q].max_time.max(result.wall_time[1]);

            games.push((game, result));
        }

        Ok(TournamentSummary { games, stats })
    }
}

/// Renders the summary table in the original tool's exact column layout,
/// used by the `arbiter` binary after a multi-game series.
pub fn format_summary_table(options: &TournamentOptions, summary: &TournamentSummary) -> String {
    let games = summary.games.len().max(1) as f64;
    let mut out = String::new();
    out.push_str("Player               AvgTm MaxTm Wins Ties Loss Fail RedPts BluePt Total\n");
    out.push_str("-------------------- ----- ----- ---- ---- ---- ---- ------ ------ ------\n");
    for i in 0..2 {
        let mut command = options.player_commands[i].as_str();
        while command.len() > 20 && command.contains('/') {
            command = &command[command.rfind('/').unwrap() + 1..];
        }
        let s = &summary.stats[i];
        out.push_str(&format!(
            "{:<20} {:.3} {:.3} {:4} {:4} {:4} {:4} {:+6} {:+6} {:+6}\n",
            command,
            s.total_time.as_secs_f64() / games,
            s.max_time.as_secs_f64(),
            s.wins,
            s.ties,
            s.losses,
            s.failures,
            s.score_as_red,
            s.score_as_blue,
            s.total_score,
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_result(score: i32) -> GameResult {
        GameResult {
            transcript: String::new(),
            score,
            wall_time: [Duration::ZERO; 2],
        }
    }

    #[test]
    fn log_destination_defaults_to_null() {
        let options = TournamentOptions {
            player_commands: ["p1".into(), "p2".into()],
            rounds: 1,
            logs_prefix: None,
        };
        let tournament = Tournament::new(options);
        assert!(matches!(tournament.log_destination(0, 0, "red"), LogDestination::Null));
    }

    #[test]
    fn log_destination_dash_means_stderr() {
        let options = TournamentOptions {
            player_commands: ["p1".into(), "p2".into()],
            rounds: 1,
            logs_prefix: Some("-".into()),
        };
        let tournament = Tournament::new(options);
        assert!(matches!(tournament.log_destination(0, 0, "red"), LogDestination::Stderr));
    }

    #[test]
    fn log_destination_prefix_builds_per_game_per_side_filenames() {
        let options = TournamentOptions {
            player_commands: ["p1".into(), "p2".into()],
            rounds: 1,
            logs_prefix: Some("/tmp/logs/".into()),
        };
        let tournament = Tournament::new(options);
        match tournament.log_destination(3, 1, "blue") {
            LogDestination::File(path) => {
                assert_eq!(path, std::path::PathBuf::from("/tmp/logs/0003_1_blue"));
            }
            _ => panic!("expected a file destination"),
        }
    }

    #[test]
    fn format_summary_table_matches_the_original_column_header() {
        let options = TournamentOptions {
            player_commands: ["./players/red-bot".into(), "./players/blue-bot".into()],
            rounds: 1,
            logs_prefix: None,
        };
        let summary = TournamentSummary {
            games: vec![(0, dummy_result(5)), (1, dummy_result(-5))],
            stats: [PlayerStats::default(); 2],
        };
        let table = format_summary_table(&options, &summary);
        assert!(table.starts_with("Player               AvgTm MaxTm Wins Ties Loss Fail RedPts BluePt Total\n"));
        assert!(table.contains("red-bot"));
        assert!(table.contains("blue-bot"));
    }
}
