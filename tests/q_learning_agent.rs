//! Q-learning agent: action space, ε-greedy selection, updates and
//! persistence.

mod common;

use std::collections::HashSet;

use checkers_rl::{
    Error,
    adapters::{CheckpointFormat, checkpoint_path},
    app::AgentConfig,
    checkers::{Board, Piece},
    q_learning::QLearningAgent,
    types::{Color, StateKey},
};
use common::{action, diagram, random_game_positions, sq};
use rand::{Rng, SeedableRng, rngs::StdRng};
use tempfile::TempDir;

fn greedy(color: Color, seed: u64) -> QLearningAgent {
    QLearningAgent::new(color, AgentConfig::default().with_epsilon(0.0)).with_seed(seed)
}

#[test]
fn first_update_on_unseen_pair_is_alpha_times_reward() {
    let mut agent = QLearningAgent::new(Color::Red, AgentConfig::default());
    let board = Board::new();
    let old = board.encode_state();
    let mut after = board.clone();
    after.apply_move(sq(5, 0), sq(4, 1)).unwrap();
    let new = after.encode_state();

    let value = agent.learn(&old, action("5,0->4,1"), 10.0, &new, false);

    assert_eq!(value, 1.0);
    assert_eq!(agent.q_table().get(&old, action("5,0->4,1")), Some(1.0));
}

#[test]
fn update_bootstraps_from_recorded_actions_only() {
    let mut agent = QLearningAgent::new(Color::Black, AgentConfig::default());
    let board = Board::new();
    let next_board = {
        let mut b = board.clone();
        b.apply_move(sq(2, 1), sq(3, 0)).unwrap();
        b
    };
    let s = board.encode_state();
    let s2 = next_board.encode_state();

    // Seed a value for the successor so the future term is non-zero
    agent.learn(&s2, action("2,3->3,4"), 50.0, &s2, true);
    let future = agent.q_table().max_value(&s2).unwrap();
    assert_eq!(future, 5.0);

    let value = agent.learn(&s, action("2,1->3,0"), 0.0, &s2, false);
    assert!((value - 0.1 * 0.9 * 5.0).abs() < 1e-12);
}

#[test]
fn available_actions_respect_mandatory_capture() {
    let board = diagram(&[
        "........",
        "........",
        "........",
        "........",
        ".b......",
        "r.r.....",
        "........",
        "........",
    ]);
    let agent = greedy(Color::Red, 1);
    let actions: HashSet<_> = agent.available_actions(&board).into_iter().collect();
    let expected: HashSet<_> = [action("5,0->3,2"), action("5,2->3,0")].into_iter().collect();
    assert_eq!(actions, expected);
}

#[test]
fn opening_action_space_has_seven_slides() {
    let agent = greedy(Color::Red, 1);
    let actions = agent.available_actions(&Board::new());
    assert_eq!(actions.len(), 7);
    assert!(actions.iter().all(|a| !a.is_jump()));
}

#[test]
fn greedy_ties_are_broken_at_random() {
    let board = Board::new();
    let mut agent = greedy(Color::Red, 99);
    let chosen: HashSet<_> = (0..200)
        .map(|_| agent.choose_action(&board).unwrap())
        .collect();
    // All seven opening moves are tied at 0.0
    assert!(chosen.len() > 1, "greedy play always picked the same move");
}

#[test]
fn exploration_only_returns_available_actions() {
    let board = Board::new();
    let legal: HashSet<_> = board.legal_actions(Color::Black).into_iter().collect();
    let mut agent = QLearningAgent::new(Color::Black, AgentConfig::default()).with_seed(4);
    for _ in 0..100 {
        assert!(legal.contains(&agent.choose_action(&board).unwrap()));
    }
}

#[test]
fn piece_action_is_limited_to_that_pieces_captures() {
    let mut board = Board::empty(8, 8).unwrap();
    board.place(Piece::king(Color::Red, sq(3, 4))).unwrap();
    board.place(Piece::man(Color::Black, sq(2, 3))).unwrap();
    board.place(Piece::man(Color::Black, sq(2, 5))).unwrap();
    board.place(Piece::man(Color::Red, sq(7, 0))).unwrap();

    let mut agent = QLearningAgent::new(Color::Red, AgentConfig::default()).with_seed(8);
    for _ in 0..20 {
        let chosen = agent.choose_piece_action(&board, sq(3, 4)).unwrap();
        assert_eq!(chosen.from, sq(3, 4));
        assert!(chosen.is_jump());
    }
    // A piece with only slides has nothing to continue with
    assert_eq!(agent.choose_piece_action(&board, sq(7, 0)), None);
    // Nor does an empty square or an opposing piece
    assert_eq!(agent.choose_piece_action(&board, sq(4, 1)), None);
    assert_eq!(agent.choose_piece_action(&board, sq(2, 3)), None);
}

#[test]
fn empty_action_space_is_reported() {
    let board = diagram(&["....", "..b.", "....", "...."]);
    let mut agent = greedy(Color::Red, 0);
    assert!(matches!(
        agent.choose_action(&board),
        Err(Error::NoActionsAvailable { color: Color::Red, .. })
    ));
}

fn trained_agent() -> QLearningAgent {
    let mut agent = QLearningAgent::new(Color::Red, AgentConfig::default()).with_seed(21);
    let board = Board::new();
    let s = board.encode_state();
    for (i, a) in board.legal_actions(Color::Red).into_iter().enumerate() {
        let mut next = board.clone();
        next.apply_move(a.from, a.to).unwrap();
        agent.learn(&s, a, i as f64 * 1.5 - 3.0, &next.encode_state(), i % 2 == 0);
    }
    agent
}

/// Values from repeated updates with arbitrary rewards, so they use the
/// full f64 mantissa rather than a few binary digits.
fn agent_with_arbitrary_values() -> QLearningAgent {
    let mut agent = QLearningAgent::new(Color::Red, AgentConfig::default()).with_seed(5);
    let mut rng = StdRng::seed_from_u64(99);
    for seed in 0..10 {
        let positions = random_game_positions(seed, 120);
        for pair in positions.windows(2) {
            let (s, next) = (pair[0].encode_state(), pair[1].encode_state());
            for color in Color::ALL {
                for a in pair[0].legal_actions(color) {
                    for _ in 0..2 {
                        let reward = rng.random_range(-100.0..100.0);
                        agent.learn(&s, a, reward, &next, false);
                    }
                }
            }
        }
    }
    agent
}

#[test]
fn save_then_load_reproduces_table_exactly() {
    let dir = TempDir::new().unwrap();
    let agent = agent_with_arbitrary_values();
    assert!(agent.q_table().size() > 1000);

    for format in [CheckpointFormat::MsgPack, CheckpointFormat::Json] {
        let path = checkpoint_path(dir.path(), Color::Red, format);
        agent.save(&path).unwrap();

        let mut restored = QLearningAgent::new(Color::Red, AgentConfig::default());
        restored.load(&path).unwrap();
        assert_eq!(restored.q_table(), agent.q_table(), "{format:?}");
    }
}

#[test]
fn load_resets_epsilon_to_floor() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("q_red.msgpack");
    trained_agent().save(&path).unwrap();

    let config = AgentConfig::default().with_epsilon_min(0.02);
    let mut agent = QLearningAgent::new(Color::Red, config);
    assert_eq!(agent.epsilon(), 1.0);
    agent.load(&path).unwrap();
    assert_eq!(agent.epsilon(), 0.02);

    agent.set_epsilon(0.5);
    assert_eq!(agent.epsilon(), 0.5);
}

#[test]
fn load_replaces_rather_than_merges() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("q_red.json");
    trained_agent().save(&path).unwrap();

    let mut agent = QLearningAgent::new(Color::Red, AgentConfig::default());
    let stray: StateKey = "r...".parse().unwrap();
    agent.learn(&stray, action("1,0->0,1"), 1.0, &stray, false);
    agent.load(&path).unwrap();
    assert_eq!(agent.q_table().get(&stray, action("1,0->0,1")), None);
}

#[test]
fn missing_or_corrupt_checkpoints_fail() {
    let dir = TempDir::new().unwrap();
    let mut agent = QLearningAgent::new(Color::Black, AgentConfig::default());
    assert!(agent.load(dir.path().join("absent.msgpack")).is_err());

    let corrupt = dir.path().join("q_black.json");
    std::fs::write(&corrupt, "{ not json").unwrap();
    assert!(agent.load(&corrupt).is_err());
    assert!(agent.q_table().is_empty());
}
