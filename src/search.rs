//! Negamax search with fail-soft alpha-beta pruning over the forced-highest-
//! value move policy (and an exhaustive policy for comparison/testing).

use crate::board;
use crate::eval::evaluate;
use crate::game::{Move, State, MAX_MOVES, MAX_VALUE};

/// Default alpha-beta window. Final scores never exceed the sum of every
/// stone's value times its liberties, which is comfortably inside ±1000.
const DEFAULT_WINDOW: i32 = 1000;

/// How a ply's candidate moves are generated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoneSelection {
    /// Only the mover's highest unused value is considered; branching is
    /// over the empty field to place it on. This is the policy the
    /// original engine always used.
    ForceHighest,
    /// Every (empty field, unused value) pair is considered. Far more
    /// expensive; useful for comparing against the forced-highest policy.
    EnumerateAll,
}

impl Default for StoneSelection {
    fn default() -> Self {
        StoneSelection::ForceHighest
    }
}

#[derive(Clone, Debug)]
pub struct SearchConfig {
    /// Maximum ply depth to search; clamped to the number of moves left.
    pub max_depth: usize,
    pub stone_selection: StoneSelection,
    /// Order candidate moves by descending liberty count before searching
    /// them, breaking ties with a seeded shuffle. Doesn't change the
    /// result, only how quickly alpha-beta converges.
    pub order_by_liberties: bool,
    pub rng_seed: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            max_depth: 4,
            stone_selection: StoneSelection::default(),
            order_by_liberties: false,
            rng_seed: 0,
        }
    }
}

/// Per-ply node-visit counters, indexed by remaining depth at the time of
/// the call (`stats.nodes_by_depth[0]` counts leaf evaluations).
#[derive(Clone, Debug)]
pub struct SearchStats {
    nodes_by_depth: Vec<u64>,
}

impl SearchStats {
    fn new(max_depth: usize) -> Self {
        SearchStats {
            nodes_by_depth: vec![0; max_depth + 1],
        }
    }

    fn record(&mut self, depth: usize) {
        self.nodes_by_depth[depth] += 1;
    }

    pub fn nodes_at_depth(&self, depth: usize) -> u64 {
        self.nodes_by_depth.get(depth).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.nodes_by_depth.iter().sum()
    }
}

/// The chosen move and its negamax value, from the mover's perspective.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchOutcome {
    pub best_move: Move,
    pub value: i32,
}

/// Searches from `state` to find the best move for the player to move,
/// together with node-visit statistics. Panics if the game is already
/// over; callers must check `state.is_terminal()` first.
pub fn search(state: &mut State, config: &SearchConfig) -> (SearchOutcome, SearchStats) {
    assert!(!state.is_terminal(), "search called on a terminal state");
    let depth = config.max_depth.min(MAX_MOVES - state.moves_played());
    assert!(depth > 0);
    let mut stats = SearchStats::new(depth);
    let mut rng = fastrand::Rng::with_seed(config.rng_seed);
    let (value, best_move) = negamax(
        state,
        depth,
        -DEFAULT_WINDOW,
        DEFAULT_WINDOW,
        config,
        &mut stats,
        &mut rng,
    );
    let best_move = best_move.expect("search at depth > 0 always considers at least one move");
    (SearchOutcome { best_move, value }, stats)
}

fn negamax(
    state: &mut State,
    depth: usize,
    mut lo: i32,
    hi: i32,
    config: &SearchConfig,
    stats: &mut SearchStats,
    rng: &mut fastrand::Rng,
) -> (i32, Option<Move>) {
    debug_assert!(lo < hi);
    stats.record(depth);

    if depth == 0 {
        return (evaluate(state), None);
    }
    debug_assert!(!state.is_terminal());

    let player = state.player_to_move();
    let mut candidates = candidate_moves(state, player, config.stone_selection);
    if config.order_by_liberties {
        order_by_liberties(state, &mut candidates, rng);
    }

    let mut best_value = i32::MIN;
    let mut best_move = None;
    for mv in candidates {
        state.do_move(mv);
        let (child_value, _) = negamax(state, depth - 1, -hi, -lo, config, stats, rng);
        state.undo_move(mv);
        let value = -child_value;
        if value > best_value {
            best_value = value;
            best_move = Some(mv);
            if best_value > lo {
                lo = best_value;
                if lo >= hi {
                    break; // beta cut-off
                }
            }
        }
    }
    (best_value, best_move)
}

fn empty_fields(state: &State) -> impl Iterator<Item = usize> + '_ {
    (0..board::NUM_FIELDS).filter(move |&f| !state.field(f).is_occupied())
}

fn highest_unused_value(state: &State, player: usize) -> i32 {
    let mut value = MAX_VALUE;
    while value > 0 && state.is_used(player, value) {
        value -= 1;
    }
    value
}

fn candidate_moves(state: &State, player: usize, selection: StoneSelection) -> Vec<Move> {
    match selection {
        StoneSelection::ForceHighest => {
            let value = highest_unused_value(state, player);
            empty_fields(state).map(|field| Move { field, value }).collect()
        }
        StoneSelection::EnumerateAll => {
            let mut moves = Vec::new();
            for field in empty_fields(state) {
                for value in 1..=MAX_VALUE {
                    if !state.is_used(player, value) {
                        moves.push(Move { field, value });
                    }
                }
            }
            moves
        }
    }
}

/// Orders moves by descending count of empty neighbours ("liberties"),
/// which tends to search the more consequential placements first. Ties
/// are broken by a seeded shuffle so ordering is deterministic given a
/// seed but not an artifact of field numbering.
fn order_by_liberties(state: &State, moves: &mut [Move], rng: &mut fastrand::Rng) {
    rng.shuffle(moves);
    moves.sort_by_key(|mv| std::cmp::Reverse(liberties(state, mv.field)));
}

fn liberties(state: &State, field: usize) -> usize {
    board::neighbours(field)
        .filter(|&n| !state.field(n).is_occupied())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Move;

    fn seed_brown(state: &mut State, fields: &[usize]) {
        for &field in fields {
            state.play(Move { field, value: 0 }).unwrap();
        }
    }

    #[test]
    fn depth_one_search_picks_the_locally_best_field() {
        let mut state = State::new();
        seed_brown(&mut state, &[17, 18, 19, 20, 21]);
        let config = SearchConfig {
            max_depth: 1,
            ..SearchConfig::default()
        };
        let (outcome, stats) = search(&mut state, &config);
        // Depth-1 search only ever considers the forced value 15.
        assert_eq!(outcome.best_move.value, 15);
        assert_eq!(stats.nodes_at_depth(0), board::NUM_FIELDS as u64 - 5);
        assert_eq!(stats.nodes_at_depth(1), 1);
    }

    #[test]
    fn search_only_returns_legal_moves() {
        let mut state = State::new();
        seed_brown(&mut state, &[0, 1, 2, 3, 4]);
        let config = SearchConfig {
            max_depth: 2,
            ..SearchConfig::default()
        };
        let (outcome, _) = search(&mut state, &config);
        assert!(state.validate_move(outcome.best_move).is_ok());
    }

    #[test]
    fn depth_clamps_to_remaining_moves() {
        let mut state = State::new();
        seed_brown(&mut state, &[0, 1, 2, 3, 4]);
        // Play down to the last coloured move.
        for i in 0..MAX_MOVES - 1 {
            let player = state.player_to_move();
            let value = highest_unused_value(&state, player);
            state.play(Move { field: 5 + i, value }).unwrap();
        }
        let config = SearchConfig {
            max_depth: 10,
            ..SearchConfig::default()
        };
        let (_, stats) = search(&mut state, &config);
        // Only one move remains, so the search tree is depth 1.
        assert_eq!(stats.nodes_by_depth.len(), 2);
    }

    #[test]
    fn enumerate_all_considers_every_unused_value() {
        let mut state = State::new();
        seed_brown(&mut state, &[0, 1, 2, 3, 4]);
        let empty_field_count = empty_fields(&state).count();
        let moves = candidate_moves(&state, 0, StoneSelection::EnumerateAll);
        assert_eq!(moves.len(), empty_field_count * MAX_VALUE as usize);
    }

    #[test]
    fn force_highest_considers_one_value_per_empty_field() {
        let mut state = State::new();
        seed_brown(&mut state, &[0, 1, 2, 3, 4]);
        let empty_field_count = empty_fields(&state).count();
        let moves = candidate_moves(&state, 0, StoneSelection::ForceHighest);
        assert_eq!(moves.len(), empty_field_count);
        assert!(moves.iter().all(|mv| mv.value == MAX_VALUE));
    }

    #[test]
    fn liberty_ordering_is_a_permutation_of_the_input() {
        let mut state = State::new();
        seed_brown(&mut state, &[0, 1, 2, 3, 4]);
        let mut moves = candidate_moves(&state, 0, StoneSelection::ForceHighest);
        let before: std::collections::BTreeSet<_> = moves.iter().map(|m| m.field).collect();
        let mut rng = fastrand::Rng::with_seed(42);
        order_by_liberties(&state, &mut moves, &mut rng);
        let after: std::collections::BTreeSet<_> = moves.iter().map(|m| m.field).collect();
        assert_eq!(before, after);
        // Ordering is non-increasing in liberty count.
        for pair in moves.windows(2) {
            assert!(liberties(&state, pair[0].field) >= liberties(&state, pair[1].field));
        }
    }
}
