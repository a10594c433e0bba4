//! Difficulty controller working with the environment and runner.

use the_game::agents::GreedyPolicy;
use the_game::core::{GameConfig, Outcome};
use the_game::curriculum::{withheld_count, DifficultyConfig, DifficultyController};
use the_game::env::Environment;
use the_game::training::{EpisodeRunner, RunnerConfig};

#[test]
fn test_reset_withholds_by_difficulty() {
    let mut env = Environment::new(GameConfig::default(), DifficultyConfig::default()).unwrap();

    for tenths in 0..=10 {
        let difficulty = f64::from(tenths) / 10.0;
        let (_, info) = env.reset(5, difficulty).unwrap();
        let withheld = withheld_count(difficulty, 80);

        assert_eq!(info["cards_withheld"], withheld as f64);
        assert_eq!(env.state().card_population(), 98 - withheld);
        assert!(env.state().is_conserved());
    }
}

#[test]
fn test_short_deck_deals_what_exists() {
    // 2..=11 is ten cards; four players of six can't all fill up.
    let config = GameConfig::default().with_card_range(2, 11);
    let mut env = Environment::new(config, DifficultyConfig::default()).unwrap();
    env.reset(0, 1.0).unwrap();

    let sizes: Vec<usize> = env.state().hands().values().map(|h| h.len()).collect();
    assert_eq!(sizes, vec![3, 3, 2, 2]);
    assert_eq!(env.state().deck_size(), 0);
    assert_eq!(env.state().must_play_count(), 1);
}

#[test]
fn test_escalation_after_exactly_k_wins() {
    let mut controller =
        DifficultyController::new(DifficultyConfig::default().with_wins_per_step(4)).unwrap();

    for _ in 0..3 {
        controller.observe(Outcome::Won);
        controller.observe(Outcome::Lost);
    }
    assert_eq!(controller.difficulty(), 0.0);

    assert!(controller.observe(Outcome::Won));
    assert!((controller.difficulty() - 0.1).abs() < 1e-12);

    for _ in 0..3 {
        assert!(!controller.observe(Outcome::Won));
    }
    assert!(controller.observe(Outcome::Won));
    assert!((controller.difficulty() - 0.2).abs() < 1e-12);
}

#[test]
fn test_controller_shared_across_environments() {
    // Every card withheld: each episode is won before the first step.
    let curriculum = DifficultyConfig::default()
        .with_wins_per_step(3)
        .with_max_removable(98);
    let mut controller = DifficultyController::new(curriculum.clone()).unwrap();

    let mut runners: Vec<EpisodeRunner> = (0..3)
        .map(|_| {
            let env = Environment::new(GameConfig::default(), curriculum.clone()).unwrap();
            EpisodeRunner::new(env, RunnerConfig::default())
        })
        .collect();

    for (index, runner) in runners.iter_mut().enumerate() {
        let traj = runner
            .run_episode(index as u64, &GreedyPolicy, &mut controller)
            .unwrap();
        assert_eq!(traj.outcome, Outcome::Won);
    }

    assert_eq!(controller.wins(), 3);
    assert!((controller.difficulty() - 0.1).abs() < 1e-12);

    controller.reset();
    assert_eq!(controller.difficulty(), 0.0);
    assert_eq!(controller.wins(), 0);
}

#[test]
fn test_curriculum_from_json() {
    let config: DifficultyConfig =
        serde_json::from_str(r#"{"wins_per_step": 5, "initial": 0.3}"#).unwrap();

    assert_eq!(config.wins_per_step, 5);
    assert_eq!(config.max_removable, 80);

    let controller = DifficultyController::new(config).unwrap();
    assert_eq!(controller.difficulty(), 0.3);
}
