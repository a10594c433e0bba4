//! Game and reward configuration.
//!
//! `GameConfig` fixes the table layout (seats, hand size, piles, card range)
//! and the reward constants. Defaults match the standard game: four players,
//! six cards each, two cards per turn, piles `1, 1 | 100, 100`, cards 2-99.

use serde::{Deserialize, Serialize};

use super::error::{GameError, Result};

/// Reward constants, one value per kind of step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Illegal play or out-of-range index.
    pub invalid: f64,
    /// Legal play using the reverse-ten exception.
    pub excellent_play: f64,
    /// Base reward of any other legal play.
    pub valid_play: f64,
    /// Subtracted per point of distance between card and pile.
    pub pile_gap_penalty: f64,
    /// Added per card still in the deck after a legal play.
    pub per_deck_card: f64,
    /// Added once when the episode is won.
    pub win: f64,
    /// Added once when the episode is lost.
    pub cant_play: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            invalid: -1.0,
            excellent_play: 2.0,
            valid_play: 1.0,
            pile_gap_penalty: 0.005,
            per_deck_card: 0.01,
            win: 100.0,
            cant_play: -10.0,
        }
    }
}

impl RewardConfig {
    /// Check that no gap can turn a legal play's reward negative.
    pub fn validate(&self, max_gap: u8) -> Result<()> {
        let all = [
            self.invalid,
            self.excellent_play,
            self.valid_play,
            self.pile_gap_penalty,
            self.per_deck_card,
            self.win,
            self.cant_play,
        ];
        if all.iter().any(|r| !r.is_finite()) {
            return Err(GameError::InvalidConfig("rewards must be finite".into()));
        }
        if self.pile_gap_penalty < 0.0 {
            return Err(GameError::InvalidConfig(
                "pile_gap_penalty must not be negative".into(),
            ));
        }
        let worst = self.valid_play - f64::from(max_gap) * self.pile_gap_penalty;
        if self.valid_play > 0.0 && worst < 0.0 {
            return Err(GameError::InvalidConfig(format!(
                "pile_gap_penalty {} makes a gap of {max_gap} score {worst}",
                self.pile_gap_penalty
            )));
        }
        Ok(())
    }
}

/// Complete table configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of players (1-255).
    pub num_players: usize,
    /// Cards each player holds when the deck can refill them.
    pub hand_size: usize,
    /// Cards a player must play per turn while the deck has cards.
    pub must_play: usize,
    /// Ascending piles, indexed first.
    pub ascending_piles: usize,
    /// Descending piles, indexed after the ascending ones.
    pub descending_piles: usize,
    /// Lowest card value; the ascending sentinel is one below it.
    pub min_card: u8,
    /// Highest card value; the descending sentinel is one above it.
    pub max_card: u8,
    pub rewards: RewardConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            num_players: 4,
            hand_size: 6,
            must_play: 2,
            ascending_piles: 2,
            descending_piles: 2,
            min_card: 2,
            max_card: 99,
            rewards: RewardConfig::default(),
        }
    }
}

impl GameConfig {
    /// Standard table for `num_players` players.
    #[must_use]
    pub fn new(num_players: usize) -> Self {
        Self {
            num_players,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_hand_size(mut self, hand_size: usize) -> Self {
        self.hand_size = hand_size;
        self
    }

    #[must_use]
    pub fn with_must_play(mut self, must_play: usize) -> Self {
        self.must_play = must_play;
        self
    }

    #[must_use]
    pub fn with_piles(mut self, ascending: usize, descending: usize) -> Self {
        self.ascending_piles = ascending;
        self.descending_piles = descending;
        self
    }

    #[must_use]
    pub fn with_card_range(mut self, min_card: u8, max_card: u8) -> Self {
        self.min_card = min_card;
        self.max_card = max_card;
        self
    }

    #[must_use]
    pub fn with_rewards(mut self, rewards: RewardConfig) -> Self {
        self.rewards = rewards;
        self
    }

    /// Total number of piles.
    #[must_use]
    pub fn pile_count(&self) -> usize {
        self.ascending_piles + self.descending_piles
    }

    /// Number of distinct cards in a full deck; 0 for an inverted range.
    #[must_use]
    pub fn card_count(&self) -> usize {
        (usize::from(self.max_card) + 1).saturating_sub(usize::from(self.min_card))
    }

    /// Starting value of ascending piles.
    #[must_use]
    pub fn low_sentinel(&self) -> u8 {
        self.min_card.saturating_sub(1)
    }

    /// Starting value of descending piles.
    #[must_use]
    pub fn high_sentinel(&self) -> u8 {
        self.max_card.saturating_add(1)
    }

    /// Length of the flattened `(card, pile)` action space.
    #[must_use]
    pub fn action_space_size(&self) -> usize {
        self.hand_size * self.pile_count()
    }

    /// Reject tables the engine cannot run.
    pub fn validate(&self) -> Result<()> {
        let fail = |msg: String| Err(GameError::InvalidConfig(msg));

        if !(1..=255).contains(&self.num_players) {
            return fail(format!("num_players must be 1-255, got {}", self.num_players));
        }
        if self.hand_size == 0 {
            return fail("hand_size must be at least 1".into());
        }
        if self.must_play == 0 {
            return fail("must_play must be at least 1".into());
        }
        if self.pile_count() == 0 {
            return fail("at least one pile is required".into());
        }
        if self.min_card == 0 || self.max_card == u8::MAX {
            return fail("card range must leave room for both sentinels".into());
        }
        if self.min_card > self.max_card {
            return fail(format!(
                "min_card {} exceeds max_card {}",
                self.min_card, self.max_card
            ));
        }
        self.rewards
            .validate(self.high_sentinel() - self.min_card)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let config = GameConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.pile_count(), 4);
        assert_eq!(config.card_count(), 98);
        assert_eq!(config.low_sentinel(), 1);
        assert_eq!(config.high_sentinel(), 100);
        assert_eq!(config.action_space_size(), 24);
    }

    #[test]
    fn test_builder() {
        let config = GameConfig::new(2)
            .with_hand_size(8)
            .with_must_play(3)
            .with_piles(1, 3)
            .with_card_range(2, 49);

        assert!(config.validate().is_ok());
        assert_eq!(config.num_players, 2);
        assert_eq!(config.action_space_size(), 32);
        assert_eq!(config.high_sentinel(), 50);
    }

    #[test]
    fn test_validate_rejects_bad_tables() {
        assert!(GameConfig::new(0).validate().is_err());
        assert!(GameConfig::default().with_hand_size(0).validate().is_err());
        assert!(GameConfig::default().with_must_play(0).validate().is_err());
        assert!(GameConfig::default().with_piles(0, 0).validate().is_err());
        assert!(GameConfig::default().with_card_range(0, 99).validate().is_err());
        assert!(GameConfig::default().with_card_range(2, 255).validate().is_err());
        assert!(GameConfig::default().with_card_range(50, 40).validate().is_err());
    }

    #[test]
    fn test_derived_sizes_on_unvalidated_ranges() {
        let inverted = GameConfig::default().with_card_range(50, 40);
        assert_eq!(inverted.card_count(), 0);

        let wide = GameConfig::default().with_card_range(0, 255);
        assert_eq!(wide.card_count(), 256);
        assert_eq!(wide.low_sentinel(), 0);
        assert_eq!(wide.high_sentinel(), 255);
        assert!(wide.validate().is_err());
    }

    #[test]
    fn test_gap_penalty_cannot_flip_sign() {
        let rewards = RewardConfig {
            pile_gap_penalty: 0.5,
            ..RewardConfig::default()
        };
        let err = GameConfig::default().with_rewards(rewards).validate();
        assert!(matches!(err, Err(GameError::InvalidConfig(_))));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GameConfig = serde_json::from_str(r#"{"num_players": 3}"#).unwrap();

        assert_eq!(config.num_players, 3);
        assert_eq!(config.hand_size, 6);
        assert_eq!(config.rewards, RewardConfig::default());
    }
}
