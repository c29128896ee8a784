use super::*;
use std::sync::{Arc, Barrier};

#[test]
fn new_state_rejects_zero_goal() {
    assert!(matches!(RaceState::new(0, 2), Err(ConfigError::ZeroGoal)));
}

#[test]
fn new_state_rejects_no_participants() {
    assert!(matches!(
        RaceState::new(10, 0),
        Err(ConfigError::NoParticipants)
    ));
}

#[test]
fn advance_accumulates_per_participant() {
    let state = RaceState::new(100, 2).unwrap();

    assert_eq!(state.advance(0, 7), 7);
    assert_eq!(state.advance(0, 3), 10);
    assert_eq!(state.advance(1, 1), 1);

    assert_eq!(state.distances(), vec![10, 1]);
    assert!(!state.has_reached_goal(0));
}

#[test]
fn leader_count_includes_exact_goal() {
    let state = RaceState::new(10, 3).unwrap();

    state.advance(0, 10);
    state.advance(1, 9);
    state.advance(2, 15);

    assert_eq!(state.leader_count(), 2);
    assert!(state.has_reached_goal(0));
}

#[test]
fn only_first_declaration_wins() {
    let state = RaceState::new(10, 2).unwrap();

    assert!(state.try_declare_winner("Goku"));
    assert!(!state.try_declare_winner("Vegeta"));

    assert!(state.is_winner_declared());
    assert_eq!(state.winner_name().as_deref(), Some("Goku"));
}

#[test]
fn concurrent_declarations_yield_exactly_one_winner() {
    for _ in 0..50 {
        let state = Arc::new(RaceState::new(10, 8).unwrap());
        let barrier = Arc::new(Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let state = state.clone();
                let barrier = barrier.clone();
                std::thread::spawn(move || {
                    let name = format!("racer-{}", i);
                    state.advance(i, 10);
                    barrier.wait();
                    state.try_declare_winner(&name).then_some(name)
                })
            })
            .collect();

        let winners: Vec<String> = handles
            .into_iter()
            .filter_map(|h| h.join().unwrap())
            .collect();

        assert_eq!(winners.len(), 1);
        assert_eq!(state.winner_name(), Some(winners[0].clone()));
        assert_eq!(state.leader_count(), 8);
    }
}

#[test]
fn reset_clears_everything() {
    let state = RaceState::new(5, 2).unwrap();
    state.advance(0, 5);
    state.record_turn();
    state.try_declare_winner("a");

    state.reset();

    assert!(!state.is_winner_declared());
    assert_eq!(state.winner_name(), None);
    assert_eq!(state.distances(), vec![0, 0]);
    assert_eq!(state.turns(), 0);
    assert!(state.try_declare_winner("b"));
}

#[test]
fn summary_pairs_names_with_distances() {
    let state = RaceState::new(10, 2).unwrap();
    state.advance(0, 10);
    state.advance(1, 4);
    state.record_turn();
    state.record_turn();
    state.try_declare_winner("Goku");

    let summary = state.summary(&["Goku".to_string(), "Vegeta".to_string()]);

    assert_eq!(summary.goal, 10);
    assert_eq!(summary.winner.as_deref(), Some("Goku"));
    assert_eq!(summary.turns, 2);
    assert_eq!(
        summary.standings,
        vec![
            Standing {
                name: "Goku".to_string(),
                distance: 10
            },
            Standing {
                name: "Vegeta".to_string(),
                distance: 4
            },
        ]
    );
}

#[test]
fn distance_is_none_past_last_participant() {
    let state = RaceState::new(10, 2).unwrap();
    state.advance(1, 4);

    assert_eq!(state.distance(1), Some(4));
    assert_eq!(state.distance(2), None);
    assert!(!state.has_reached_goal(2));
}
