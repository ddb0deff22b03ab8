//! Static position evaluator used as the search's leaf heuristic.

use crate::board::{self, NUM_FIELDS};
use crate::game::{Colour, State};

/// Reward added on top of a field's raw neighbour-sum for being polarized
/// (i.e. already leaning towards one colour), since a field an opponent
/// can no longer contest is worth more than its raw value suggests.
const POLARIZATION_BONUS: i32 = 5;

fn bonus(score: i32) -> i32 {
    match score.signum() {
        1 => POLARIZATION_BONUS,
        -1 => -POLARIZATION_BONUS,
        _ => 0,
    }
}

/// Evaluates `state` from the perspective of the player to move: positive
/// favours the mover, negative favours the opponent.
///
/// Sums `score_at(f) + bonus(score_at(f))` over every empty field, then
/// flips the sign when blue is to move, since the underlying sum is always
/// expressed from red's point of view.
pub fn evaluate(state: &State) -> i32 {
    let mut total = 0;
    for field in 0..NUM_FIELDS {
        if state.field(field).is_occupied() {
            continue;
        }
        let score = state.score_at(field);
        total += score + bonus(score);
    }
    match state.next_colour() {
        Colour::Blue => -total,
        _ => total,
    }
}
