//! Episode loop for scripted policies.
//!
//! Plays complete episodes against an [`Environment`], reading difficulty
//! from a [`DifficultyController`] and feeding it the outcomes. The runner
//! owns the harness limits the engine does not impose: a bound on
//! consecutive invalid actions and a hard step cap.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::agents::Policy;
use crate::core::{GameRng, Result};
use crate::curriculum::DifficultyController;
use crate::env::Environment;

use super::trajectory::{RunSummary, StepRecord, Trajectory};

/// Harness limits and seeding.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Invalid actions in a row before the episode is abandoned.
    pub max_consecutive_invalid: usize,

    /// Maximum steps per episode (to prevent endless invalid loops).
    pub max_steps: usize,

    /// Seed offset (combined with episode index for unique seeds).
    pub seed_offset: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            max_consecutive_invalid: 10,
            max_steps: 1_000,
            seed_offset: 0,
        }
    }
}

impl RunnerConfig {
    #[must_use]
    pub fn with_max_consecutive_invalid(mut self, max: usize) -> Self {
        self.max_consecutive_invalid = max;
        self
    }

    #[must_use]
    pub fn with_max_steps(mut self, max: usize) -> Self {
        self.max_steps = max;
        self
    }

    #[must_use]
    pub fn with_seed_offset(mut self, offset: u64) -> Self {
        self.seed_offset = offset;
        self
    }
}

/// Runs episodes back to back on one environment.
pub struct EpisodeRunner {
    env: Environment,
    config: RunnerConfig,
}

impl EpisodeRunner {
    #[must_use]
    pub fn new(env: Environment, config: RunnerConfig) -> Self {
        Self { env, config }
    }

    #[must_use]
    pub fn env(&self) -> &Environment {
        &self.env
    }

    #[must_use]
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Play episode `index` to the end (or until a harness limit hits).
    pub fn run_episode(
        &mut self,
        index: u64,
        policy: &dyn Policy,
        controller: &mut DifficultyController,
    ) -> Result<Trajectory> {
        let seed = self.config.seed_offset.wrapping_add(index);
        let (mut observation, _) = self.env.reset_with(seed, controller);
        let mut rng = GameRng::new(seed).for_context("policy");
        let mut trajectory = Trajectory::new(seed, controller.difficulty());
        let mut consecutive_invalid = 0;

        while !self.env.is_done() {
            if trajectory.len() >= self.config.max_steps {
                warn!(seed, steps = trajectory.len(), "step limit reached, truncating");
                trajectory.truncated = true;
                break;
            }

            let player = observation.active_player;
            let action = policy.choose(&observation, &mut rng);
            let outcome = self.env.step_action(action)?;

            trajectory.push(StepRecord {
                player,
                action,
                reward: outcome.reward,
                valid: !outcome.result.is_invalid(),
                turn_ended: outcome.result.turn_ended,
            });
            observation = outcome.observation;

            if outcome.result.is_invalid() {
                consecutive_invalid += 1;
                if consecutive_invalid >= self.config.max_consecutive_invalid {
                    warn!(
                        seed,
                        policy = policy.name(),
                        consecutive_invalid,
                        "too many invalid actions, truncating"
                    );
                    trajectory.truncated = true;
                    break;
                }
            } else {
                consecutive_invalid = 0;
            }
        }

        trajectory.outcome = self.env.state().outcome();
        controller.observe(trajectory.outcome);
        Ok(trajectory)
    }

    /// Play `episodes` episodes and summarise them.
    pub fn play_episodes(
        &mut self,
        episodes: u64,
        policy: &dyn Policy,
        controller: &mut DifficultyController,
    ) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        for index in 0..episodes {
            let trajectory = self.run_episode(index, policy, controller)?;
            summary.record(&trajectory);
        }
        summary.final_difficulty = controller.difficulty();

        info!(
            policy = policy.name(),
            episodes = summary.episodes,
            wins = summary.wins,
            losses = summary.losses,
            truncated = summary.truncated,
            difficulty = summary.final_difficulty,
            "run finished"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::GreedyPolicy;
    use crate::core::{GameConfig, GameRng, Outcome, PlayAction};
    use crate::curriculum::DifficultyConfig;
    use crate::env::Observation;

    struct AlwaysInvalid;

    impl Policy for AlwaysInvalid {
        fn name(&self) -> &str {
            "invalid"
        }

        fn choose(&self, _observation: &Observation, _rng: &mut GameRng) -> PlayAction {
            PlayAction::new(99, 99)
        }
    }

    fn runner(config: RunnerConfig) -> EpisodeRunner {
        let env = Environment::new(GameConfig::default(), DifficultyConfig::default()).unwrap();
        EpisodeRunner::new(env, config)
    }

    fn controller(config: DifficultyConfig) -> DifficultyController {
        DifficultyController::new(config).unwrap()
    }

    #[test]
    fn test_greedy_episode_terminates() {
        let mut runner = runner(RunnerConfig::default());
        let mut ctrl = controller(DifficultyConfig::default().with_initial(1.0));

        let traj = runner
            .run_episode(0, &GreedyPolicy, &mut ctrl)
            .unwrap();

        assert!(traj.outcome.is_terminal());
        assert!(!traj.truncated);
        assert_eq!(traj.invalid_count(), 0);
        assert!(runner.env().state().is_conserved());
    }

    #[test]
    fn test_invalid_streak_truncates() {
        let mut runner = runner(RunnerConfig::default().with_max_consecutive_invalid(5));
        let mut ctrl = controller(DifficultyConfig::default());

        let traj = runner.run_episode(0, &AlwaysInvalid, &mut ctrl).unwrap();

        assert!(traj.truncated);
        assert_eq!(traj.len(), 5);
        assert_eq!(traj.outcome, Outcome::InProgress);
        assert!((traj.total_reward - -5.0).abs() < 1e-12);
        assert_eq!(ctrl.wins(), 0);
    }

    #[test]
    fn test_step_cap_truncates() {
        let config = RunnerConfig::default()
            .with_max_consecutive_invalid(100)
            .with_max_steps(3);
        let mut runner = runner(config);
        let mut ctrl = controller(DifficultyConfig::default());

        let traj = runner.run_episode(0, &AlwaysInvalid, &mut ctrl).unwrap();
        assert!(traj.truncated);
        assert_eq!(traj.len(), 3);
    }

    #[test]
    fn test_wins_feed_the_controller() {
        // Withholding every card makes each episode an immediate win.
        let curriculum = DifficultyConfig::default()
            .with_wins_per_step(2)
            .with_max_removable(98);
        let mut runner = runner(RunnerConfig::default());
        let mut ctrl = controller(curriculum);

        let first = runner.run_episode(0, &GreedyPolicy, &mut ctrl).unwrap();
        assert_eq!(first.outcome, Outcome::Won);
        assert!(first.is_empty());

        runner.run_episode(1, &GreedyPolicy, &mut ctrl).unwrap();
        assert_eq!(ctrl.wins(), 2);
        assert!((ctrl.difficulty() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_replay_is_byte_identical() {
        let config = RunnerConfig::default().with_seed_offset(500);
        let curriculum = DifficultyConfig::default().with_initial(0.6);

        let mut a = runner(config.clone());
        let mut b = runner(config);
        let mut ctrl_a = controller(curriculum.clone());
        let mut ctrl_b = controller(curriculum);

        let ta = a.run_episode(3, &crate::agents::RandomPolicy, &mut ctrl_a).unwrap();
        let tb = b.run_episode(3, &crate::agents::RandomPolicy, &mut ctrl_b).unwrap();

        assert_eq!(ta.seed, 503);
        assert_eq!(ta.to_bytes().unwrap(), tb.to_bytes().unwrap());
    }

    #[test]
    fn test_play_episodes_summary() {
        let mut runner = runner(RunnerConfig::default());
        let mut ctrl = controller(DifficultyConfig::default());

        let summary = runner.play_episodes(4, &GreedyPolicy, &mut ctrl).unwrap();

        assert_eq!(summary.episodes, 4);
        assert_eq!(summary.wins + summary.losses + summary.truncated, 4);
        assert_eq!(summary.final_difficulty, ctrl.difficulty());
    }
}
