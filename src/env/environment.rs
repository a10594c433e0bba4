//! Reset/step interface for decision-making agents.

use rustc_hash::FxHashMap;
use tracing::{debug, info};

use crate::core::{Deck, GameConfig, GameRng, GameSetup, GameState, PlayAction, Result};
use crate::curriculum::{check_difficulty, prepare_deck, DifficultyConfig, DifficultyController};
use crate::rules::{compute_mask, legal_actions, ActionMask, Rules, StepResult};

use super::observation::Observation;

/// Numeric diagnostics returned alongside observations.
pub type Info = FxHashMap<&'static str, f64>;

/// Everything one `step` reports.
#[derive(Clone, Debug, PartialEq)]
pub struct StepOutcome {
    pub observation: Observation,
    pub reward: f64,
    /// The episode reached Won or Lost.
    pub terminated: bool,
    /// Always false here; step limits belong to the harness.
    pub truncated: bool,
    pub info: Info,
    pub result: StepResult,
}

/// One table, reset between episodes.
///
/// Construction deals a first episode (seed 0, initial difficulty) so the
/// environment is always in a steppable state.
#[derive(Clone, Debug)]
pub struct Environment {
    rules: Rules,
    max_removable: usize,
    state: GameState,
}

impl Environment {
    pub fn new(config: GameConfig, curriculum: DifficultyConfig) -> Result<Self> {
        curriculum.validate()?;
        let rules = Rules::new(config)?;
        let state = deal(&rules, 0, curriculum.initial, |deck| {
            prepare_deck(deck, curriculum.initial, curriculum.max_removable)
        });
        Ok(Self {
            rules,
            max_removable: curriculum.max_removable,
            state,
        })
    }

    /// Start a new episode. `seed` fixes the deck order.
    pub fn reset(&mut self, seed: u64, difficulty: f64) -> Result<(Observation, Info)> {
        check_difficulty(difficulty)?;
        let max_removable = self.max_removable;
        self.state = deal(&self.rules, seed, difficulty, |deck| {
            prepare_deck(deck, difficulty, max_removable)
        });
        Ok((self.observe(), self.info()))
    }

    /// Start a new episode at the controller's current difficulty.
    pub fn reset_with(
        &mut self,
        seed: u64,
        controller: &DifficultyController,
    ) -> (Observation, Info) {
        self.state = deal(&self.rules, seed, controller.difficulty(), |deck| {
            controller.prepare_deck(deck)
        });
        (self.observe(), self.info())
    }

    /// Start from a scripted position. `seed` only matters when the setup
    /// leaves the deck to be generated.
    pub fn load(&mut self, setup: &GameSetup, seed: u64) -> Result<(Observation, Info)> {
        let mut rng = GameRng::new(seed).for_context("deck");
        self.state = self.rules.load(setup, &mut rng)?;
        debug!(outcome = ?self.state.outcome(), "setup loaded");
        Ok((self.observe(), self.info()))
    }

    /// Play the `card_index`-th card of the active hand onto `pile_index`.
    pub fn step(&mut self, card_index: usize, pile_index: usize) -> Result<StepOutcome> {
        self.step_action(PlayAction::new(card_index, pile_index))
    }

    pub fn step_action(&mut self, action: PlayAction) -> Result<StepOutcome> {
        let result = self.rules.apply_action(&mut self.state, action)?;
        let terminated = result.outcome.is_terminal();
        if terminated {
            info!(
                outcome = ?result.outcome,
                turns = self.state.turn_number(),
                cards_left = self.state.cards_remaining(),
                difficulty = self.state.difficulty(),
                "episode finished"
            );
        }

        let mut info = self.info();
        info.insert("invalid", f64::from(u8::from(result.is_invalid())));
        info.insert("turn_ended", f64::from(u8::from(result.turn_ended)));

        Ok(StepOutcome {
            observation: self.observe(),
            reward: result.reward,
            terminated,
            truncated: false,
            info,
            result,
        })
    }

    /// Snapshot for the active player.
    #[must_use]
    pub fn observe(&self) -> Observation {
        Observation::new(&self.state, self.rules.config())
    }

    #[must_use]
    pub fn action_mask(&self) -> ActionMask {
        compute_mask(&self.state)
    }

    #[must_use]
    pub fn legal_actions(&self) -> Vec<PlayAction> {
        legal_actions(&self.state)
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.state.outcome().is_terminal()
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        self.rules.config()
    }

    fn info(&self) -> Info {
        let state = &self.state;
        let mut info = Info::default();
        info.insert("deck_size", state.deck_size() as f64);
        info.insert("cards_remaining", state.cards_remaining() as f64);
        info.insert("cards_withheld", state.cards_withheld() as f64);
        info.insert("turn_number", f64::from(state.turn_number()));
        info.insert("difficulty", state.difficulty());
        info
    }
}

fn deal(
    rules: &Rules,
    seed: u64,
    difficulty: f64,
    truncate: impl FnOnce(&mut Deck) -> usize,
) -> GameState {
    let config = rules.config();
    let mut deck = Deck::ordered(config.min_card, config.max_card);
    deck.shuffle(&mut GameRng::new(seed).for_context("deck"));
    let withheld = truncate(&mut deck);

    let state = rules.new_game(deck, difficulty, withheld);
    debug!(seed, difficulty, withheld, deck = state.deck_size(), "episode dealt");
    state
}
