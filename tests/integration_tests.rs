//! Cross-module integration tests: a complete game played directly against
//! the rules engine, transcript round-tripping through a decoded replay,
//! a protocol session driven over in-memory pipes, and the arbiter
//! refereeing real (scripted) child processes.

use std::io::Cursor;

use lib_blackhole::arbiter::{Arbiter, ArbiterOptions, LogDestination};
use lib_blackhole::board;
use lib_blackhole::game::{Move, State};
use lib_blackhole::notation;
use lib_blackhole::protocol::PlayerSession;
use lib_blackhole::search::{SearchConfig, StoneSelection};
use lib_blackhole::tournament::{Tournament, TournamentOptions};

fn highest_unused(state: &State, player: usize) -> i32 {
    let mut value = 15;
    while value > 0 && state.is_used(player, value) {
        value -= 1;
    }
    value
}

/// Plays a full 30-move game directly against the rules engine (5 brown
/// stones, then forced-descending values alternating red/blue filling the
/// rest of the board) and checks the game reaches its terminal state with
/// a transcript that decodes back to the same history.
#[test]
fn a_complete_game_reaches_terminal_state_and_round_trips() {
    let mut state = State::new();
    let mut history = Vec::new();

    for field in 0..5 {
        let mv = Move { field, value: 0 };
        state.play(mv).unwrap();
        history.push(mv);
    }

    for i in 0..30 {
        let player = state.player_to_move();
        let value = highest_unused(&state, player);
        let mv = Move { field: 5 + i, value };
        state.play(mv).unwrap();
        history.push(mv);
    }

    assert!(state.is_terminal());

    let transcript = notation::encode_history(&history);
    assert_eq!(transcript.len(), 2 * (5 + 30));
    let decoded = notation::decode_history(&transcript).unwrap();
    assert_eq!(decoded, history);
}

/// Drives a `PlayerSession` over an in-memory pipe through initial
/// seeding, receiving the opponent's first move (instead of `Start`), and
/// confirms the session replies with a legally playable move.
#[test]
fn player_session_replies_with_a_legal_move_when_opponent_moves_first() {
    let input = Cursor::new(b"A1\nA2\nA3\nA4\nA5\nH1=9\n".to_vec());
    let mut output = Vec::new();
    let config = SearchConfig {
        max_depth: 2,
        stone_selection: StoneSelection::ForceHighest,
        order_by_liberties: false,
        rng_seed: 7,
    };
    let mut session = PlayerSession::new(config);
    session.run(input, &mut output).unwrap();

    let written = String::from_utf8(output).unwrap();
    let line = written.lines().next().expect("session should reply with a move");
    let (field, value) = lib_blackhole::game::parse_move_line(line).unwrap();
    // Forced-highest-value policy: our first move always uses our own
    // highest unused value (15), independent of what the opponent used.
    assert_eq!(value, 15);

    let field_name = board::field_name(field);
    assert_ne!(field_name, "H1"); // that field is already occupied by the opponent's stone
}

/// Spawns a misbehaving child process (valid brown-stone intake, then a
/// garbage reply instead of a move) as the red player and checks the
/// arbiter scores it as a forfeit.
#[test]
fn arbiter_scores_an_unparsable_move_as_a_forfeit() {
    let misbehaving_player = "for i in 1 2 3 4 5; do read x; done; read start; echo not-a-move";
    let quiet_player = "cat > /dev/null";

    let options = ArbiterOptions {
        player1_command: misbehaving_player.to_string(),
        player2_command: quiet_player.to_string(),
        log1: LogDestination::Null,
        log2: LogDestination::Null,
    };
    let result = Arbiter::new(options).run_game().unwrap();
    assert_eq!(result.score, -99);
    // The forfeiting move is never added to the transcript.
    assert_eq!(result.transcript.len(), 2 * 5);
}

/// A single-game tournament (rounds=0) should reflect the same forfeit in
/// its aggregated stats.
#[test]
fn single_game_tournament_aggregates_a_forfeit_correctly() {
    let misbehaving_player = "for i in 1 2 3 4 5; do read x; done; read start; echo not-a-move";
    let quiet_player = "cat > /dev/null";

    let options = TournamentOptions {
        player_commands: [misbehaving_player.to_string(), quiet_player.to_string()],
        rounds: 0,
        logs_prefix: None,
    };
    let summary = Tournament::new(options).run().unwrap();
    assert_eq!(summary.games.len(), 1);
    assert_eq!(summary.stats[0].failures, 1);
    assert_eq!(summary.stats[0].losses, 1);
    assert_eq!(summary.stats[1].wins, 1);
    assert_eq!(summary.stats[0].total_score, -99);
    assert_eq!(summary.stats[1].total_score, 99);
}
