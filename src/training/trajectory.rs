//! Episode records.
//!
//! A trajectory records one episode as played by the runner:
//! - the action chosen at each decision point and by whom
//! - the reward the engine returned and whether the action was legal
//! - the final outcome, and whether the harness cut the episode short

use serde::{Deserialize, Serialize};

use crate::core::{Outcome, PlayAction, Result};

/// One decision and its result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Seat that chose the action.
    pub player: usize,
    pub action: PlayAction,
    pub reward: f64,
    /// False when the engine rejected the action.
    pub valid: bool,
    /// The step passed the turn on.
    pub turn_ended: bool,
}

/// A complete episode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub seed: u64,
    pub difficulty: f64,
    pub steps: Vec<StepRecord>,
    pub total_reward: f64,
    /// `InProgress` only when `truncated` is set.
    pub outcome: Outcome,
    /// Stopped by the runner's step or invalid-action limit.
    pub truncated: bool,
}

impl Trajectory {
    #[must_use]
    pub fn new(seed: u64, difficulty: f64) -> Self {
        Self {
            seed,
            difficulty,
            steps: Vec::new(),
            total_reward: 0.0,
            outcome: Outcome::InProgress,
            truncated: false,
        }
    }

    pub fn push(&mut self, step: StepRecord) {
        self.total_reward += step.reward;
        self.steps.push(step);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Legal plays made.
    #[must_use]
    pub fn cards_played(&self) -> usize {
        self.steps.iter().filter(|s| s.valid).count()
    }

    #[must_use]
    pub fn invalid_count(&self) -> usize {
        self.steps.iter().filter(|s| !s.valid).count()
    }

    /// Steps taken by one seat.
    pub fn player_steps(&self, player: usize) -> impl Iterator<Item = &StepRecord> {
        self.steps.iter().filter(move |s| s.player == player)
    }

    /// Compact binary encoding, used to compare replays byte for byte.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }
}

/// Totals over a batch of episodes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub episodes: usize,
    pub wins: usize,
    pub losses: usize,
    pub truncated: usize,
    pub total_reward: f64,
    pub final_difficulty: f64,
}

impl RunSummary {
    pub fn record(&mut self, trajectory: &Trajectory) {
        self.episodes += 1;
        self.total_reward += trajectory.total_reward;
        match trajectory.outcome {
            Outcome::Won => self.wins += 1,
            Outcome::Lost => self.losses += 1,
            Outcome::InProgress => {}
        }
        if trajectory.truncated {
            self.truncated += 1;
        }
    }

    #[must_use]
    pub fn win_rate(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.wins as f64 / self.episodes as f64
        }
    }

    #[must_use]
    pub fn mean_reward(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.total_reward / self.episodes as f64
        }
    }
}
