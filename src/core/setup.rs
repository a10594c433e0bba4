//! Scripted table setups.
//!
//! A `GameSetup` pins piles, hands and optionally the deck order, so tests
//! and tutorials can start from a specific position:
//!
//! ```json
//! {
//!   "must_play": 2,
//!   "piles_up": [1, 1],
//!   "piles_down": [100, 100],
//!   "hands": [[10, 20, 30, 40, 50, 60], [11, 21, 31, 41, 51, 61]]
//! }
//! ```
//!
//! When `deck` is omitted, every card value not held in a hand is shuffled
//! into the deck.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::card::{Card, Pile};
use super::config::GameConfig;
use super::deck::Deck;
use super::error::{GameError, Result};
use super::hand::Hand;
use super::player::{PlayerId, PlayerMap};
use super::rng::GameRng;
use super::state::GameState;

/// Description of a mid-game position.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSetup {
    /// Cards owed per turn for this episode (1 once the deck is empty); the
    /// table default if unset.
    pub must_play: Option<usize>,
    /// Seat to move.
    pub active_player: usize,
    /// Top values of the ascending piles.
    pub piles_up: Vec<u8>,
    /// Top values of the descending piles.
    pub piles_down: Vec<u8>,
    /// One hand per seat.
    pub hands: Vec<Vec<u8>>,
    /// Deck order, top first. Shuffled from the unused cards if absent.
    pub deck: Option<Vec<u8>>,
}

impl GameSetup {
    /// Build the state described by this setup.
    ///
    /// `rng` is only used when the deck has to be generated.
    pub fn build(&self, config: &GameConfig, rng: &mut GameRng) -> Result<GameState> {
        self.validate_shape(config)?;

        let in_range = |value: u8| (config.min_card..=config.max_card).contains(&value);
        let mut seen = FxHashSet::default();
        let mut claim = |value: u8| -> Result<Card> {
            if !in_range(value) {
                return Err(GameError::InvalidSetup(format!(
                    "card {value} is outside {}..={}",
                    config.min_card, config.max_card
                )));
            }
            if !seen.insert(value) {
                return Err(GameError::InvalidSetup(format!("card {value} appears twice")));
            }
            Ok(Card::new(value))
        };

        let mut hands: PlayerMap<Hand> = PlayerMap::with_default(config.num_players);
        for (seat, values) in self.hands.iter().enumerate() {
            for &value in values {
                let card = claim(value)?;
                hands[PlayerId::new(seat as u8)].insert(card);
            }
        }

        let deck = match &self.deck {
            Some(values) => Deck::from_cards(
                values
                    .iter()
                    .map(|&value| claim(value))
                    .collect::<Result<Vec<_>>>()?,
            ),
            None => {
                let mut deck = Deck::from_cards(
                    (config.min_card..=config.max_card)
                        .filter(|value| !seen.contains(value))
                        .map(Card::new)
                        .collect(),
                );
                deck.shuffle(rng);
                deck
            }
        };

        let piles: SmallVec<[Pile; 4]> = self
            .piles_up
            .iter()
            .map(|&value| Pile::ascending(value))
            .chain(self.piles_down.iter().map(|&value| Pile::descending(value)))
            .collect();

        let active = PlayerId::new(self.active_player as u8);
        if hands[active].is_empty() && !(deck.is_empty() && hands.values().all(Hand::is_empty)) {
            return Err(GameError::InvalidSetup(format!(
                "{active} is to move but holds no cards"
            )));
        }

        let mut state = GameState::from_parts(config, deck, piles, hands, 1.0);
        state.set_current_player(active);
        if let Some(count) = self.must_play {
            state.set_must_play(count);
        }
        Ok(state)
    }

    fn validate_shape(&self, config: &GameConfig) -> Result<()> {
        let fail = |msg: String| Err(GameError::InvalidSetup(msg));

        if self.hands.len() != config.num_players {
            return fail(format!(
                "expected {} hands, got {}",
                config.num_players,
                self.hands.len()
            ));
        }
        if let Some(hand) = self.hands.iter().find(|h| h.len() > config.hand_size) {
            return fail(format!(
                "hand of {} cards exceeds hand_size {}",
                hand.len(),
                config.hand_size
            ));
        }
        if self.piles_up.len() != config.ascending_piles
            || self.piles_down.len() != config.descending_piles
        {
            return fail(format!(
                "expected {}+{} piles, got {}+{}",
                config.ascending_piles,
                config.descending_piles,
                self.piles_up.len(),
                self.piles_down.len()
            ));
        }
        let pile_range = config.low_sentinel()..=config.high_sentinel();
        if let Some(value) = self
            .piles_up
            .iter()
            .chain(&self.piles_down)
            .find(|v| !pile_range.contains(*v))
        {
            return fail(format!("pile value {value} is outside {pile_range:?}"));
        }
        if self.active_player >= config.num_players {
            return fail(format!("active_player {} has no seat", self.active_player));
        }
        if self.must_play == Some(0) {
            return fail("must_play must be at least 1".into());
        }
        Ok(())
    }
}
