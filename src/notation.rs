//! Base-36 transcript codec: encodes a complete (or partial) game history
//! as `2*(5 + moves_played)` base-36 digits, two per move.

use crate::game::{Colour, Move, State, INITIAL_STONES, MAX_MOVES, MAX_VALUE};
use crate::utils::prelude::*;

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

fn encode_digit(value: usize) -> char {
    BASE36_DIGITS[value] as char
}

fn decode_digit(ch: u8) -> Option<usize> {
    match ch {
        b'0'..=b'9' => Some((ch - b'0') as usize),
        b'a'..=b'z' => Some((ch - b'a' + 10) as usize),
        _ => None,
    }
}

/// Encodes a full move history (brown placements followed by alternating
/// red/blue placements) into its transcript string.
///
/// The colour of each move is derived from its position: the first
/// [`INITIAL_STONES`] entries are brown, and the rest alternate starting
/// with red, matching [`State::next_colour`].
pub fn encode_history(moves: &[Move]) -> String {
    let mut s = String::with_capacity(moves.len() * 2);
    for (i, mv) in moves.iter().enumerate() {
        let value_digit = if i < INITIAL_STONES {
            0
        } else if (i - INITIAL_STONES) % 2 == 0 {
            mv.value as usize
        } else {
            mv.value as usize + MAX_VALUE as usize
        };
        s.push(encode_digit(mv.field));
        s.push(encode_digit(value_digit));
    }
    s
}

/// Decodes a transcript string into its move history, replaying each move
/// against the rules engine. Fails if the length isn't an even number of
/// digits in the permitted range, or if any move fails validation.
pub fn decode_history(s: &str) -> Result<Vec<Move>> {
    let bytes = s.as_bytes();
    if bytes.len() % 2 != 0 {
        return Err(anyhow!("transcript {s:?} has an odd number of digits"));
    }
    let min_len = 2 * INITIAL_STONES;
    let max_len = 2 * (INITIAL_STONES + MAX_MOVES);
    if bytes.len() < min_len || bytes.len() > max_len {
        return Err(anyhow!(
            "transcript {s:?} has length {}, expected between {min_len} and {max_len}",
            bytes.len()
        ));
    }

    let mut state = State::new();
    let mut moves = Vec::with_capacity(bytes.len() / 2);
    for pair in bytes.chunks_exact(2) {
        let field = decode_digit(pair[0])
            .ok_or_else(|| anyhow!("invalid base-36 field digit in {s:?}"))?;
        let value_digit = decode_digit(pair[1])
            .ok_or_else(|| anyhow!("invalid base-36 value digit in {s:?}"))?;

        let value = match state.next_colour() {
            Colour::Brown => {
                if value_digit != 0 {
                    return Err(anyhow!("brown move in {s:?} has a nonzero value digit"));
                }
                0
            }
            Colour::Red => value_digit as i32,
            Colour::Blue => value_digit as i32 - MAX_VALUE,
            Colour::None => {
                return Err(anyhow!("transcript {s:?} has moves past game end"));
            }
        };

        let mv = Move { field, value };
        state
            .play(mv)
            .map_err(|e| anyhow!("transcript {s:?} failed validation at move {}: {e}", moves.len()))?;
        moves.push(mv);
    }
    Ok(moves)
}
