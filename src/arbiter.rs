//! Referees a single match between two player processes: seeds the brown
//! stones, relays validated moves between them, and scores the result.

use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::time::{Duration, Instant};

use crate::board::{self, NUM_FIELDS};
use crate::game::{Colour, Move, State, INITIAL_STONES};
use crate::notation;
use crate::utils::prelude::*;

/// Where a player process's stderr is routed.
#[derive(Clone, Debug)]
pub enum LogDestination {
    Null,
    Stderr,
    File(PathBuf),
}

impl LogDestination {
    fn into_stdio(self) -> Result<Stdio> {
        Ok(match self {
            LogDestination::Null => Stdio::null(),
            LogDestination::Stderr => Stdio::inherit(),
            LogDestination::File(path) => Stdio::from(
                std::fs::File::create(&path)
                    .with_context(|| format!("opening log file {}", path.display()))?,
            ),
        })
    }
}

#[derive(Clone, Debug)]
pub struct ArbiterOptions {
    pub player1_command: String,
    pub player2_command: String,
    pub log1: LogDestination,
    pub log2: LogDestination,
}

/// The outcome of one refereed game.
#[derive(Clone, Debug)]
pub struct GameResult {
    pub transcript: String,
    /// Final score: positive favours red (player 1), negative favours blue.
    /// A forfeit is scored at exactly ±99.
    pub score: i32,
    pub wall_time: [Duration; 2],
}

struct RefereedPlayer {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<std::process::ChildStdout>,
}

impl RefereedPlayer {
    fn spawn(command: &str, stderr: Stdio) -> Result<Self> {
        let mut child = Command::new("/bin/sh")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(stderr)
            .spawn()
            .with_context(|| format!("spawning player command {command:?}"))?;
        let stdin = child.stdin.take().expect("piped stdin");
        let stdout = BufReader::new(child.stdout.take().expect("piped stdout"));
        Ok(RefereedPlayer { child, stdin, stdout })
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.stdin, "{line}")?;
        self.stdin.flush()?;
        Ok(())
    }

    /// Reads exactly one line, trimming the trailing newline. Returns an
    /// empty string on EOF or any framing problem, mirroring the original
    /// arbiter's tolerance for a misbehaving player: the caller treats an
    /// empty line as an unparsable, forfeiting move.
    fn read_line(&mut self) -> String {
        let mut buf = String::new();
        match self.stdout.read_line(&mut buf) {
            Ok(0) => String::new(),
            Ok(_) => buf.trim_end_matches(['\n', '\r']).to_string(),
            Err(_) => String::new(),
        }
    }

    fn quit(mut self) {
        let _ = self.write_line("Quit");
        drop(self.stdin);
        match self.child.wait() {
            Ok(status) if !status.success() => {
                log::warn!("player did not exit normally: {status}");
            }
            Err(err) => log::warn!("waitpid failed: {err}"),
            _ => {}
        }
    }
}

/// Draws `INITIAL_STONES` distinct fields out of `NUM_FIELDS`, using a
/// biased partial Fisher-Yates shuffle driven by a single 64-bit seed: at
/// step `i` the seed is reduced modulo the remaining field count to pick a
/// swap partner, then divided by that same count for the next step.
fn draw_brown_fields(mut seed: u64) -> [usize; INITIAL_STONES] {
    let mut fields: Vec<usize> = (0..NUM_FIELDS).collect();
    let mut drawn = [0usize; INITIAL_STONES];
    for (i, slot) in drawn.iter_mut().enumerate() {
        let n = (NUM_FIELDS - i) as u64;
        let j = i + (seed % n) as usize;
        fields.swap(i, j);
        seed /= n;
        *slot = fields[i];
    }
    drawn
}

fn random_seed() -> Result<u64> {
    let mut bytes = [0u8; 8];
    getrandom::getrandom(&mut bytes).context("reading OS entropy for brown-stone seed")?;
    Ok(u64::from_le_bytes(bytes))
}

fn format_move(colour: Colour, mv: Move) -> String {
    match colour {
        Colour::Brown => board::field_name(mv.field),
        _ => format!("{}={}", board::field_name(mv.field), mv.value),
    }
}

/// Referees one complete match between two freshly spawned player
/// processes.
pub struct Arbiter {
    options: ArbiterOptions,
}

impl Arbiter {
    pub fn new(options: ArbiterOptions) -> Self {
        Arbiter { options }
    }

    pub fn run_game(self) -> Result<GameResult> {
        let stderr1 = self.options.log1.clone().into_stdio()?;
        let stderr2 = self.options.log2.clone().into_stdio()?;
        let mut players = [
            RefereedPlayer::spawn(&self.options.player1_command, stderr1)?,
            RefereedPlayer::spawn(&self.options.player2_command, stderr2)?,
        ];

        let mut state = State::new();
        let mut history = Vec::new();

        let seed = random_seed()?;
        for field in draw_brown_fields(seed) {
            let mv = Move { field, value: 0 };
            state.play(mv).expect("freshly drawn brown fields are always distinct and empty");
            let line = format_move(Colour::Brown, mv);
            players[0].write_line(&line)?;
            players[1].write_line(&line)?;
            history.push(mv);
        }

        let mut time_used = [Duration::ZERO; 2];
        players[0].write_line("Start")?;
        let mut turn_start = Instant::now();

        let final_colour = loop {
            let colour = state.next_colour();
            if colour == Colour::None {
                break Colour::None;
            }
            let player_index = colour.player_index().expect("brown seeding is already done");
            let line = players[player_index].read_line();
            time_used[player_index] += turn_start.elapsed();

            let Ok((field, value)) = crate::game::parse_move_line(&line) else {
                log::warn!("could not parse move from player {player_index}: {line:?}");
                break colour;
            };
            let mv = Move { field, value };
            if let Err(reason) = state.validate_move(mv) {
                log::warn!("invalid move from player {player_index} {line:?}: {reason}");
                break colour;
            }
            state.do_move(mv);
            history.push(mv);

            let next_colour = state.next_colour();
            if next_colour != Colour::None {
                let forwarded = format_move(colour, mv);
                turn_start = Instant::now();
                players[1 - player_index].write_line(&forwarded)?;
            }
        };

        players[0].quit();
        players[1].quit();

        let score = match final_colour {
            Colour::None => state.final_score(),
            Colour::Red => -99,  // red made an illegal move: blue wins
            Colour::Blue => 99,  // blue made an illegal move: red wins
            Colour::Brown => unreachable!("brown seeding never forfeits mid-loop"),
        };

        Ok(GameResult {
            transcript: notation::encode_history(&history),
            score,
            wall_time: time_used,
        })
    }
}
