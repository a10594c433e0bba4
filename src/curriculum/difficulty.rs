//! Deck-truncation curriculum.
//!
//! Lower difficulty removes more cards from the top of the shuffled deck
//! before dealing, so early episodes are shorter and easier to win. The
//! controller raises difficulty by a fixed step after every
//! `wins_per_step` cumulative wins and never lowers it on its own.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::{Deck, GameError, Outcome, Result};

/// Curriculum parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyConfig {
    /// Cumulative wins between escalations.
    pub wins_per_step: u32,
    /// Difficulty added per escalation.
    pub step: f64,
    /// Cards removed at difficulty 0.
    pub max_removable: usize,
    /// Starting difficulty.
    pub initial: f64,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            wins_per_step: 10,
            step: 0.1,
            max_removable: 80,
            initial: 0.0,
        }
    }
}

impl DifficultyConfig {
    #[must_use]
    pub fn with_wins_per_step(mut self, wins: u32) -> Self {
        self.wins_per_step = wins;
        self
    }

    #[must_use]
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    #[must_use]
    pub fn with_max_removable(mut self, max_removable: usize) -> Self {
        self.max_removable = max_removable;
        self
    }

    #[must_use]
    pub fn with_initial(mut self, initial: f64) -> Self {
        self.initial = initial;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.wins_per_step == 0 {
            return Err(GameError::InvalidConfig(
                "wins_per_step must be at least 1".into(),
            ));
        }
        if !self.step.is_finite() || self.step < 0.0 {
            return Err(GameError::InvalidConfig(format!(
                "difficulty step {} must be a non-negative number",
                self.step
            )));
        }
        check_difficulty(self.initial)
    }
}

/// Reject difficulties outside `[0, 1]`.
pub fn check_difficulty(difficulty: f64) -> Result<()> {
    if (0.0..=1.0).contains(&difficulty) {
        Ok(())
    } else {
        Err(GameError::InvalidDifficulty(difficulty))
    }
}

/// Cards removed at `difficulty`: `floor((1 - difficulty) * max_removable)`.
#[must_use]
pub fn withheld_count(difficulty: f64, max_removable: usize) -> usize {
    let d = difficulty.clamp(0.0, 1.0);
    // Epsilon absorbs representation error, e.g. (1 - 0.7) * 80 = 23.999...
    ((1.0 - d) * max_removable as f64 + 1e-9).floor() as usize
}

/// Drop cards from the top of `deck` for `difficulty`. Returns how many were
/// removed, which is at most the deck length.
pub fn prepare_deck(deck: &mut Deck, difficulty: f64, max_removable: usize) -> usize {
    deck.withhold_front(withheld_count(difficulty, max_removable))
}

/// Win-driven difficulty schedule.
///
/// Owned by whoever runs episodes; only [`observe`](Self::observe) and
/// [`reset`](Self::reset) change it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DifficultyController {
    config: DifficultyConfig,
    levels: u32,
    wins: u32,
}

impl DifficultyController {
    pub fn new(config: DifficultyConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            levels: 0,
            wins: 0,
        })
    }

    #[must_use]
    pub fn config(&self) -> &DifficultyConfig {
        &self.config
    }

    /// Current difficulty in `[0, 1]`.
    #[must_use]
    pub fn difficulty(&self) -> f64 {
        // Computed from the level count so repeated steps don't accumulate drift.
        (self.config.initial + f64::from(self.levels) * self.config.step).min(1.0)
    }

    /// Cumulative wins since the last reset.
    #[must_use]
    pub fn wins(&self) -> u32 {
        self.wins
    }

    /// Feed one finished episode. Returns true when difficulty went up.
    pub fn observe(&mut self, outcome: Outcome) -> bool {
        if outcome != Outcome::Won {
            return false;
        }
        self.wins += 1;
        if self.wins % self.config.wins_per_step != 0 || self.difficulty() >= 1.0 {
            return false;
        }

        let before = self.difficulty();
        self.levels += 1;
        info!(
            wins = self.wins,
            from = before,
            to = self.difficulty(),
            "difficulty increased"
        );
        true
    }

    /// Back to the initial difficulty with no wins.
    pub fn reset(&mut self) {
        self.levels = 0;
        self.wins = 0;
    }

    /// Truncate `deck` for the current difficulty.
    pub fn prepare_deck(&self, deck: &mut Deck) -> usize {
        prepare_deck(deck, self.difficulty(), self.config.max_removable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(wins_per_step: u32) -> DifficultyController {
        DifficultyController::new(DifficultyConfig::default().with_wins_per_step(wins_per_step))
            .unwrap()
    }

    #[test]
    fn test_withheld_count() {
        assert_eq!(withheld_count(0.0, 80), 80);
        assert_eq!(withheld_count(1.0, 80), 0);
        assert_eq!(withheld_count(0.5, 80), 40);
        assert_eq!(withheld_count(0.7, 80), 24);
        assert_eq!(withheld_count(0.25, 10), 7);
    }

    #[test]
    fn test_prepare_deck_clamps_to_length() {
        let mut deck = Deck::ordered(2, 11);
        assert_eq!(prepare_deck(&mut deck, 0.0, 80), 10);
        assert!(deck.is_empty());

        let mut deck = Deck::ordered(2, 99);
        assert_eq!(prepare_deck(&mut deck, 0.0, 80), 80);
        assert_eq!(deck.len(), 18);
        assert_eq!(deck.draw().map(|c| c.value()), Some(82));
    }

    #[test]
    fn test_escalates_after_exactly_k_wins() {
        let mut ctrl = controller(3);

        assert!(!ctrl.observe(Outcome::Won));
        assert!(!ctrl.observe(Outcome::Lost));
        assert!(!ctrl.observe(Outcome::Won));
        assert_eq!(ctrl.difficulty(), 0.0);

        assert!(ctrl.observe(Outcome::Won));
        assert!((ctrl.difficulty() - 0.1).abs() < 1e-12);
        assert_eq!(ctrl.wins(), 3);
    }

    #[test]
    fn test_losses_never_lower_difficulty() {
        let mut ctrl = controller(1);
        ctrl.observe(Outcome::Won);
        let level = ctrl.difficulty();

        for _ in 0..20 {
            ctrl.observe(Outcome::Lost);
            ctrl.observe(Outcome::InProgress);
        }
        assert_eq!(ctrl.difficulty(), level);
    }

    #[test]
    fn test_caps_at_one() {
        let mut ctrl = controller(1);
        for _ in 0..25 {
            ctrl.observe(Outcome::Won);
        }

        assert_eq!(ctrl.difficulty(), 1.0);
        assert_eq!(ctrl.wins(), 25);
        assert!(!ctrl.observe(Outcome::Won));
    }

    #[test]
    fn test_reset() {
        let config = DifficultyConfig::default()
            .with_wins_per_step(1)
            .with_initial(0.5);
        let mut ctrl = DifficultyController::new(config).unwrap();
        ctrl.observe(Outcome::Won);
        assert!((ctrl.difficulty() - 0.6).abs() < 1e-12);

        ctrl.reset();
        assert_eq!(ctrl.difficulty(), 0.5);
        assert_eq!(ctrl.wins(), 0);
    }

    #[test]
    fn test_invalid_configs() {
        let zero = DifficultyConfig::default().with_wins_per_step(0);
        assert!(DifficultyController::new(zero).is_err());

        let high = DifficultyConfig::default().with_initial(1.5);
        assert!(matches!(
            DifficultyController::new(high),
            Err(GameError::InvalidDifficulty(_))
        ));
        assert!(check_difficulty(f64::NAN).is_err());
    }
}
