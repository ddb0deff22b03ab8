//! Game state and rules engine: field colours, move validity, make/undo
//! with incremental neighbour-sum updates, and terminal scoring.

use crate::board::{self, NUM_FIELDS};
use crate::utils::prelude::*;

/// The maximum numbered stone value a player may place.
pub const MAX_VALUE: i32 = 15;

/// Number of brown "hole" stones placed before coloured play begins.
pub const INITIAL_STONES: usize = 5;

/// Number of coloured moves played in a complete game (15 per side).
pub const MAX_MOVES: usize = 2 * MAX_VALUE as usize;

/// The colour occupying a field, or lack thereof.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Colour {
    None,
    Brown,
    Red,
    Blue,
}

impl Colour {
    /// Red's values count positively towards the score, blue's negatively.
    pub fn perspective(self) -> i32 {
        match self {
            Colour::Red => 1,
            Colour::Blue => -1,
            Colour::Brown | Colour::None => 0,
        }
    }

    /// The 0-based player index used to key `State::used`, if this colour
    /// is one of the two players.
    pub fn player_index(self) -> Option<usize> {
        match self {
            Colour::Red => Some(0),
            Colour::Blue => Some(1),
            _ => None,
        }
    }
}

/// A single field on the board: its colour and signed value.
///
/// Invariant: `colour == None` iff `value == 0`; `colour == Brown` implies
/// `value == 0`; `colour` in `{Red, Blue}` implies `1 <= |value| <= 15`,
/// with the sign matching the colour (`+` for red, `-` for blue).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Field {
    colour: Option<ColourTag>,
    value: i32,
}

/// Internal tag distinguishing the three non-empty colours, so `Field` can
/// derive `Default` cheaply (an empty field is just `None`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ColourTag {
    Brown,
    Red,
    Blue,
}

impl Field {
    pub fn colour(&self) -> Colour {
        match self.colour {
            None => Colour::None,
            Some(ColourTag::Brown) => Colour::Brown,
            Some(ColourTag::Red) => Colour::Red,
            Some(ColourTag::Blue) => Colour::Blue,
        }
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn is_occupied(&self) -> bool {
        self.colour.is_some()
    }
}

/// A (field, value) placement. `value == 0` denotes a brown placement;
/// the colour making the move is always derivable from the state it is
/// applied to, so it is not stored here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Move {
    pub field: usize,
    pub value: i32,
}

/// Reasons a candidate move fails validation, matching the original
/// engine's named diagnostics one-for-one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationError {
    FieldOutOfRange,
    FieldNotEmpty,
    WrongColour,
    BrownStoneHasValue,
    ValueOutOfRange,
    ValueAlreadyUsed,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            ValidationError::FieldOutOfRange => "field index out of range",
            ValidationError::FieldNotEmpty => "field is not empty",
            ValidationError::WrongColour => "colour does not match next colour to move",
            ValidationError::BrownStoneHasValue => "brown stone cannot have value",
            ValidationError::ValueOutOfRange => "stone value out of range",
            ValidationError::ValueAlreadyUsed => "stone value has been used",
        };
        f.write_str(reason)
    }
}

impl std::error::Error for ValidationError {}

/// The authoritative game state: board contents, used-value tables, move
/// counters, and a per-field cache of the signed neighbour-value sum used
/// by both the evaluator and the final scoring rule.
#[derive(Clone, Debug)]
pub struct State {
    fields: [Field; NUM_FIELDS],
    used: [[bool; MAX_VALUE as usize]; 2],
    brown_placed: usize,
    moves_played: usize,
    score: [i32; NUM_FIELDS],
}

impl Default for State {
    fn default() -> Self {
        State {
            fields: [Field::default(); NUM_FIELDS],
            used: [[false; MAX_VALUE as usize]; 2],
            brown_placed: 0,
            moves_played: 0,
            score: [0; NUM_FIELDS],
        }
    }
}

impl State {
    pub fn new() -> State {
        State::default()
    }

    pub fn field(&self, index: usize) -> Field {
        self.fields[index]
    }

    pub fn moves_played(&self) -> usize {
        self.moves_played
    }

    pub fn brown_placed(&self) -> usize {
        self.brown_placed
    }

    /// The cached sum of signed neighbour values at `field`. Only
    /// meaningful for unoccupied fields, per the scoring rule.
    pub fn score_at(&self, field: usize) -> i32 {
        self.score[field]
    }

    pub fn is_used(&self, player: usize, value: i32) -> bool {
        self.used[player][(value - 1) as usize]
    }

    pub fn is_terminal(&self) -> bool {
        self.moves_played >= MAX_MOVES
    }

    /// The colour due to move next: brown while seeding, then alternating
    /// red/blue, then `None` once the game is over.
    pub fn next_colour(&self) -> Colour {
        if self.brown_placed < INITIAL_STONES {
            Colour::Brown
        } else if self.moves_played >= MAX_MOVES {
            Colour::None
        } else if self.moves_played % 2 == 0 {
            Colour::Red
        } else {
            Colour::Blue
        }
    }

    /// Player index (0 = red, 1 = blue) to move, assuming seeding is done
    /// and the game isn't over. Used by the search, which never calls this
    /// at a terminal or pre-seeded state.
    pub fn player_to_move(&self) -> usize {
        self.moves_played % 2
    }

    pub fn validate_move(&self, mv: Move) -> std::result::Result<(), ValidationError> {
        if mv.field >= NUM_FIELDS {
            return Err(ValidationError::FieldOutOfRange);
        }
        if self.fields[mv.field].is_occupied() {
            return Err(ValidationError::FieldNotEmpty);
        }
        match self.next_colour() {
            Colour::Brown => {
                if mv.value != 0 {
                    return Err(ValidationError::BrownStoneHasValue);
                }
                Ok(())
            }
            Colour::Red | Colour::Blue => {
                if mv.value < 1 || mv.value > MAX_VALUE {
                    return Err(ValidationError::ValueOutOfRange);
                }
                let player = self.player_to_move();
                if self.is_used(player, mv.value) {
                    return Err(ValidationError::ValueAlreadyUsed);
                }
                Ok(())
            }
            Colour::None => Err(ValidationError::WrongColour),
        }
    }

    /// Applies a move, assuming it has already been validated.
    pub fn do_move(&mut self, mv: Move) {
        debug_assert!(self.validate_move(mv).is_ok());
        if self.brown_placed < INITIAL_STONES {
            self.fields[mv.field] = Field {
                colour: Some(ColourTag::Brown),
                value: 0,
            };
            self.brown_placed += 1;
            return;
        }
        let player = self.player_to_move();
        let signed_value = if player == 0 { mv.value } else { -mv.value };
        self.fields[mv.field] = Field {
            colour: Some(if player == 0 { ColourTag::Red } else { ColourTag::Blue }),
            value: signed_value,
        };
        self.used[player][(mv.value - 1) as usize] = true;
        for n in board::neighbours(mv.field) {
            self.score[n] += signed_value;
        }
        self.moves_played += 1;
    }

    /// Exact inverse of `do_move` for the most recently applied move.
    pub fn undo_move(&mut self, mv: Move) {
        if mv.value == 0 {
            debug_assert!(self.brown_placed > 0);
            debug_assert_eq!(self.fields[mv.field].colour(), Colour::Brown);
            self.fields[mv.field] = Field::default();
            self.brown_placed -= 1;
            return;
        }
        debug_assert!(self.moves_played > 0);
        self.moves_played -= 1;
        let player = self.player_to_move();
        let signed_value = if player == 0 { mv.value } else { -mv.value };
        debug_assert_eq!(self.fields[mv.field].value(), signed_value);
        for n in board::neighbours(mv.field) {
            self.score[n] -= signed_value;
        }
        self.used[player][(mv.value - 1) as usize] = false;
        self.fields[mv.field] = Field::default();
    }

    /// Applies an already-validated move, returning a validation error
    /// instead of panicking if it's illegal.
    pub fn play(&mut self, mv: Move) -> std::result::Result<(), ValidationError> {
        self.validate_move(mv)?;
        self.do_move(mv);
        Ok(())
    }

    /// Rebuilds `score` from scratch; used to validate the incremental
    /// cache (§8 invariant 3).
    pub fn recompute_score(&self) -> [i32; NUM_FIELDS] {
        let mut score = [0; NUM_FIELDS];
        for field in 0..NUM_FIELDS {
            if !self.fields[field].is_occupied() {
                continue;
            }
            let value = self.fields[field].value();
            if value == 0 {
                continue;
            }
            for n in board::neighbours(field) {
                score[n] += value;
            }
        }
        score
    }

    /// The true game-ending score: for every empty field, the sum of red
    /// neighbours' values minus blue neighbours' values.
    pub fn final_score(&self) -> i32 {
        let mut total = 0;
        for field in 0..NUM_FIELDS {
            if !self.fields[field].is_occupied() {
                total += self.score[field];
            }
        }
        total
    }
}

/// Loads a parser-friendly `Result` alias for callers constructing moves
/// from wire or transcript input.
pub fn parse_move_line(line: &str) -> Result<(usize, i32)> {
    let (field_str, value_str) = line
        .split_once('=')
        .ok_or_else(|| anyhow!("move {line:?} is missing '='"))?;
    let field = board::parse_field_name(field_str)?;
    let value: i32 = value_str
        .parse()
        .map_err(|_| anyhow!("move {line:?} has a non-numeric value"))?;
    Ok((field, value))
}
