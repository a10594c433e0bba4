//! Turn state machine.
//!
//! `Rules` is the only code that mutates a `GameState` during play. One call
//! to [`Rules::apply_action`] is one decision step:
//!
//! 1. Resolve the card index against the active hand and the pile index
//!    against the table. Out of range: invalid step.
//! 2. Check legality. Illegal: invalid step. Invalid steps change nothing;
//!    the same player is asked again.
//! 3. Remove the card, put it on the pile, draw one replacement.
//! 4. End the turn once `must_play_count` cards are down, or earlier if the
//!    player has nothing left to play. Seats with empty hands are skipped.
//! 5. Classify: Won when every card is gone, Lost when the player to move
//!    holds cards but none fit.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::{
    is_legal, Card, Deck, GameConfig, GameError, GameRng, GameSetup, GameState, Outcome,
    PlayAction, PlayerId, Result,
};

use super::mask::has_legal_action;
use super::reward::RewardEvaluator;

/// Why a step was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvalidReason {
    /// Card or pile index outside the hand or table.
    IndexOutOfRange,
    /// The card does not fit the pile.
    IllegalPlay,
}

/// A card that was played.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Play {
    pub player: PlayerId,
    pub card: Card,
    pub pile_index: usize,
    /// Pile top before the card landed.
    pub pile_before: u8,
    /// `|card - pile_before|`.
    pub gap: u8,
    /// Played via the reverse-ten exception.
    pub reverse: bool,
    /// Replacement card drawn, if the deck had one.
    pub drew: Option<Card>,
}

/// What a step did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepKind {
    Invalid(InvalidReason),
    Played(Play),
}

/// Result of one [`Rules::apply_action`] call.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub kind: StepKind,
    pub reward: f64,
    /// Outcome after the step.
    pub outcome: Outcome,
    /// The step handed the turn to another player.
    pub turn_ended: bool,
}

impl StepResult {
    #[must_use]
    pub fn is_invalid(&self) -> bool {
        matches!(self.kind, StepKind::Invalid(_))
    }

    /// The play, if the step was legal.
    #[must_use]
    pub fn play(&self) -> Option<&Play> {
        match &self.kind {
            StepKind::Played(play) => Some(play),
            StepKind::Invalid(_) => None,
        }
    }
}

/// Rules of the game for one table configuration.
#[derive(Clone, Debug)]
pub struct Rules {
    config: GameConfig,
    rewards: RewardEvaluator,
}

impl Rules {
    /// Create the rules for a validated configuration.
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate()?;
        let rewards = RewardEvaluator::new(config.rewards.clone());
        Ok(Self { config, rewards })
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn rewards(&self) -> &RewardEvaluator {
        &self.rewards
    }

    // === Episode Setup ===

    /// Deal a new episode from a prepared deck.
    ///
    /// `withheld` is how many cards were removed from the deck beforehand.
    #[must_use]
    pub fn new_game(&self, deck: Deck, difficulty: f64, withheld: usize) -> GameState {
        let mut state = GameState::new(&self.config, deck, difficulty);
        state.set_withheld(withheld);
        state.deal_initial_hands();
        let outcome = self.evaluate(&state);
        state.set_outcome(outcome);
        state
    }

    /// Start from a scripted position. The outcome is classified right away,
    /// so a setup may already be Won or Lost.
    pub fn load(&self, setup: &GameSetup, rng: &mut GameRng) -> Result<GameState> {
        let mut state = setup.build(&self.config, rng)?;
        let outcome = self.evaluate(&state);
        state.set_outcome(outcome);
        Ok(state)
    }

    // === Transitions ===

    /// Apply one decision of the active player.
    ///
    /// Rule violations come back as `StepKind::Invalid` with the state
    /// untouched. Only stepping a finished episode is an error.
    pub fn apply_action(&self, state: &mut GameState, action: PlayAction) -> Result<StepResult> {
        if state.outcome().is_terminal() {
            return Err(GameError::EpisodeEnded);
        }

        let player = state.current_player();
        let kind = match Self::resolve(state, action) {
            Err(reason) => {
                debug!(%player, %action, ?reason, "invalid action");
                StepKind::Invalid(reason)
            }
            Ok(card) => {
                let pile = state.piles()[action.pile_index];
                state.remove(player, card)?;
                state.place(action.pile_index, card);
                let drew = state.draw(player);
                trace!(%player, %card, pile = action.pile_index, ?drew, "card played");

                StepKind::Played(Play {
                    player,
                    card,
                    pile_index: action.pile_index,
                    pile_before: pile.value,
                    gap: pile.gap(card),
                    reverse: pile.is_reverse_play(card),
                    drew,
                })
            }
        };

        let mut turn_ended = false;
        if let StepKind::Played(_) = kind {
            if state.cards_played_this_turn() >= state.must_play_count() || !has_legal_action(state)
            {
                self.end_turn(state);
                turn_ended = true;
            }
            let outcome = self.evaluate(state);
            state.set_outcome(outcome);
        }

        let outcome = state.outcome();
        let reward = self.rewards.evaluate(&kind, state.deck_size(), outcome);
        Ok(StepResult {
            kind,
            reward,
            outcome,
            turn_ended,
        })
    }

    /// Classify a state.
    #[must_use]
    pub fn evaluate(&self, state: &GameState) -> Outcome {
        if state.is_cleared() {
            Outcome::Won
        } else if !state.active_hand().is_empty() && !has_legal_action(state) {
            Outcome::Lost
        } else {
            Outcome::InProgress
        }
    }

    fn resolve(state: &GameState, action: PlayAction) -> std::result::Result<Card, InvalidReason> {
        let card = state
            .active_hand()
            .get(action.card_index)
            .ok_or(InvalidReason::IndexOutOfRange)?;
        let pile = state
            .piles()
            .get(action.pile_index)
            .ok_or(InvalidReason::IndexOutOfRange)?;

        if is_legal(card, pile) {
            Ok(card)
        } else {
            Err(InvalidReason::IllegalPlay)
        }
    }

    fn end_turn(&self, state: &mut GameState) {
        let current = state.current_player();
        let played = state.cards_played_this_turn();
        let owed = state.must_play_count();

        // Empty hands can only refill from the deck, and every hand is full
        // while the deck has cards, so skipped seats are out for good.
        let next = current
            .seats_after(state.player_count())
            .find(|&seat| !state.hand(seat).is_empty())
            .unwrap_or(current);
        state.advance_turn(next);

        debug!(
            from = %current,
            to = %next,
            played,
            owed,
            must_play = state.must_play_count(),
            deck = state.deck_size(),
            "turn ended"
        );
    }
}
