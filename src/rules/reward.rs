//! Step rewards.
//!
//! Each step is scored exactly once, from what the step did and the
//! outcome it produced:
//!
//! - invalid step: `invalid`
//! - reverse-ten play: `excellent_play`
//! - other legal play: `valid_play - gap * pile_gap_penalty`
//! - every legal play: `+ deck_remaining * per_deck_card`
//! - step that ends the episode: `+ win` or `+ cant_play`

use crate::core::{Outcome, RewardConfig};

use super::engine::StepKind;

/// Turns transitions into scalar rewards.
#[derive(Clone, Debug, Default)]
pub struct RewardEvaluator {
    config: RewardConfig,
}

impl RewardEvaluator {
    #[must_use]
    pub fn new(config: RewardConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &RewardConfig {
        &self.config
    }

    /// Reward for one step.
    ///
    /// `deck_remaining` is the deck size after the step's draw; `outcome`
    /// is the outcome after the step.
    #[must_use]
    pub fn evaluate(&self, kind: &StepKind, deck_remaining: usize, outcome: Outcome) -> f64 {
        let play = match kind {
            StepKind::Invalid(_) => return self.config.invalid,
            StepKind::Played(play) => play,
        };

        let base = if play.reverse {
            self.config.excellent_play
        } else {
            self.config.valid_play - f64::from(play.gap) * self.config.pile_gap_penalty
        };
        let progress = deck_remaining as f64 * self.config.per_deck_card;

        base + progress + self.terminal_bonus(outcome)
    }

    /// One-off adjustment for the step that ends the episode.
    #[must_use]
    pub fn terminal_bonus(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::Won => self.config.win,
            Outcome::Lost => self.config.cant_play,
            Outcome::InProgress => 0.0,
        }
    }
}
