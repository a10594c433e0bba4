//! Property tests over random tables and random action sequences.

use proptest::prelude::*;

use the_game::core::{is_legal, Card, GameConfig, Outcome, Pile, PlayAction};
use the_game::curriculum::DifficultyConfig;
use the_game::env::Environment;
use the_game::rules::has_legal_action;

fn fresh(players: usize, seed: u64, difficulty: f64) -> Environment {
    let mut env = Environment::new(GameConfig::new(players), DifficultyConfig::default()).unwrap();
    env.reset(seed, difficulty).unwrap();
    env
}

/// Indices slightly past the hand and table so invalid actions show up too.
fn actions() -> impl Strategy<Value = Vec<(usize, usize)>> {
    prop::collection::vec((0usize..7, 0usize..5), 1..300)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn legality_matches_rule(card in 2u8..=99, value in 1u8..=100) {
        let (c, v) = (i16::from(card), i16::from(value));

        prop_assert_eq!(is_legal(Card(card), &Pile::ascending(value)), c > v || c == v - 10);
        prop_assert_eq!(is_legal(Card(card), &Pile::descending(value)), c < v || c == v + 10);
    }

    #[test]
    fn cards_are_conserved(
        players in 1usize..=5,
        seed in any::<u64>(),
        tenths in 0u8..=10,
        actions in actions(),
    ) {
        let mut env = fresh(players, seed, f64::from(tenths) / 10.0);
        let population = env.state().card_population();
        prop_assert_eq!(population + env.state().cards_withheld(), 98);

        for (card, pile) in actions {
            if env.is_done() {
                break;
            }
            env.step(card, pile).unwrap();
            prop_assert!(env.state().is_conserved());
            prop_assert_eq!(env.state().card_population(), population);
            prop_assert!(env.state().hands().values().all(|h| h.len() <= 6));
        }
    }

    #[test]
    fn step_mutates_iff_mask_allows(
        players in 1usize..=4,
        seed in any::<u64>(),
        actions in actions(),
    ) {
        let mut env = fresh(players, seed, 1.0);

        for (card, pile) in actions {
            if env.is_done() {
                break;
            }
            let before = env.state().clone();
            let allowed = env.observe().is_legal(PlayAction::new(card, pile));

            let out = env.step(card, pile).unwrap();

            prop_assert_eq!(allowed, !out.result.is_invalid());
            if allowed {
                prop_assert_ne!(env.state(), &before);
                let play = out.result.play().copied().unwrap();
                let pile_before = before.piles()[pile];
                prop_assert!(is_legal(play.card, &pile_before));
            } else {
                prop_assert_eq!(env.state(), &before);
            }
        }
    }

    #[test]
    fn replays_are_identical(
        players in 1usize..=4,
        seed in any::<u64>(),
        tenths in 0u8..=10,
        actions in actions(),
    ) {
        let difficulty = f64::from(tenths) / 10.0;
        let mut a = fresh(players, seed, difficulty);
        let mut b = fresh(players, seed, difficulty);
        prop_assert_eq!(a.observe().to_bytes().unwrap(), b.observe().to_bytes().unwrap());

        for (card, pile) in actions {
            if a.is_done() {
                prop_assert!(b.is_done());
                break;
            }
            let x = a.step(card, pile).unwrap();
            let y = b.step(card, pile).unwrap();
            prop_assert_eq!(x.reward.to_bits(), y.reward.to_bits());
            prop_assert_eq!(x.observation.to_bytes().unwrap(), y.observation.to_bytes().unwrap());
        }
    }

    #[test]
    fn outcomes_are_exclusive(
        players in 1usize..=4,
        seed in any::<u64>(),
        tenths in 0u8..=10,
    ) {
        use the_game::agents::{Policy, RandomPolicy};
        use the_game::core::GameRng;

        let mut env = fresh(players, seed, f64::from(tenths) / 10.0);
        let mut rng = GameRng::new(seed).for_context("policy");
        while !env.is_done() {
            let action = RandomPolicy.choose(&env.observe(), &mut rng);
            env.step_action(action).unwrap();
        }

        let state = env.state();
        match state.outcome() {
            Outcome::Won => {
                prop_assert!(state.is_cleared());
            }
            Outcome::Lost => {
                prop_assert!(!state.is_cleared());
                prop_assert!(!state.active_hand().is_empty());
                prop_assert!(!has_legal_action(state));
            }
            Outcome::InProgress => prop_assert!(false, "loop ended mid-episode"),
        }
    }
}
