//! The line protocol a player process speaks over stdin/stdout: read five
//! brown stones, learn which colour we're playing, then alternate moves
//! with the opponent until the game ends or `Quit` is received.

use std::io::{BufRead, Write};

use crate::board;
use crate::game::{parse_move_line, Move, State, INITIAL_STONES};
use crate::search::{search, SearchConfig};
use crate::utils::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    ReadInitialStones,
    AwaitStartOrFirstMove,
    MyTurn,
    OpponentTurn,
    GameOver,
}

/// Drives a single game session for one player process.
pub struct PlayerSession {
    state: State,
    history: Vec<Move>,
    my_player: Option<usize>,
    search_config: SearchConfig,
    phase: Phase,
}

impl PlayerSession {
    /// A session starting from an empty board; the first five lines read
    /// by `run` are the brown stones.
    pub fn new(search_config: SearchConfig) -> Self {
        PlayerSession {
            state: State::new(),
            history: Vec::new(),
            my_player: None,
            search_config,
            phase: Phase::ReadInitialStones,
        }
    }

    /// A session resuming from an already-played history, e.g. decoded
    /// from a transcript passed on the command line.
    pub fn from_history(history: Vec<Move>, search_config: SearchConfig) -> Result<Self> {
        let mut state = State::new();
        for &mv in &history {
            state
                .play(mv)
                .map_err(|e| anyhow!("invalid starting history at move {}: {e}", history.len()))?;
        }
        let phase = if state.brown_placed() < INITIAL_STONES {
            Phase::ReadInitialStones
        } else {
            Phase::AwaitStartOrFirstMove
        };
        Ok(PlayerSession {
            state,
            history,
            my_player: None,
            search_config,
            phase,
        })
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    /// Runs the session to completion against `input`/`output`, returning
    /// once the game ends or the peer disconnects (EOF or `Quit`).
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut output: W) -> Result<()> {
        if self.phase == Phase::ReadInitialStones {
            self.read_initial_stones(&mut input)?;
        }

        let mut pending_move_line = match read_line(&mut input)? {
            None => {
                self.phase = Phase::GameOver;
                return Ok(());
            }
            Some(line) if line == "Start" => {
                self.my_player = Some(self.state.player_to_move());
                None
            }
            Some(line) => {
                self.my_player = Some(1 - self.state.player_to_move());
                Some(line)
            }
        };

        while !self.state.is_terminal() {
            let mover = self.state.player_to_move();
            if Some(mover) == self.my_player {
                self.phase = Phase::MyTurn;
                self.play_my_move(&mut output)?;
            } else {
                self.phase = Phase::OpponentTurn;
                let line = match pending_move_line.take() {
                    Some(line) => line,
                    None => match read_line(&mut input)? {
                        Some(line) => line,
                        None => break,
                    },
                };
                self.play_opponent_move(&line)?;
            }
        }
        self.phase = Phase::GameOver;
        Ok(())
    }

    fn play_my_move<W: Write>(&mut self, output: &mut W) -> Result<()> {
        let (outcome, stats) = search(&mut self.state, &self.search_config);
        log::debug!(
            "move={}={} value={} nodes={}",
            board::field_name(outcome.best_move.field),
            outcome.best_move.value,
            outcome.value,
            stats.total(),
        );
        self.state
            .play(outcome.best_move)
            .expect("search only ever returns legal moves");
        self.history.push(outcome.best_move);
        writeln!(
            output,
            "{}={}",
            board::field_name(outcome.best_move.field),
            outcome.best_move.value
        )?;
        output.flush()?;
        Ok(())
    }

    fn play_opponent_move(&mut self, line: &str) -> Result<()> {
        let (field, value) = parse_move_line(line)?;
        let mv = Move { field, value };
        self.state
            .play(mv)
            .map_err(|e| anyhow!("opponent move {line:?} rejected: {e}"))?;
        self.history.push(mv);
        Ok(())
    }

    fn read_initial_stones<R: BufRead>(&mut self, input: &mut R) -> Result<()> {
        for _ in 0..INITIAL_STONES {
            let line = read_line(input)?.ok_or_else(|| anyhow!("EOF while reading initial stones"))?;
            let field = board::parse_field_name(&line)?;
            let mv = Move { field, value: 0 };
            self.state
                .play(mv)
                .map_err(|e| anyhow!("invalid initial stone {line:?}: {e}"))?;
            self.history.push(mv);
        }
        self.phase = Phase::AwaitStartOrFirstMove;
        Ok(())
    }
}

/// Reads one line, stripping the trailing newline. Returns `Ok(None)` on
/// EOF or on a literal `Quit` line, both of which end the session.
fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut buf = String::new();
    let n = input.read_line(&mut buf)?;
    if n == 0 {
        return Ok(None);
    }
    let trimmed = buf.trim_end_matches(['\n', '\r']).to_string();
    if trimmed == "Quit" {
        return Ok(None);
    }
    Ok(Some(trimmed))
}
