//! Game state: deck, piles, hands and turn bookkeeping.
//!
//! ## Ownership
//!
//! Every card of the episode is in exactly one place: the deck, one hand,
//! or consumed onto a pile. Piles only remember their top value, so
//! consumed cards are counted, not stored:
//!
//! ```text
//! deck_size + Σ hand sizes + cards_consumed == card_population
//! ```
//!
//! Mutation happens only through the rules engine; callers get read-only
//! views.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::card::{Card, Pile};
use super::config::GameConfig;
use super::deck::Deck;
use super::error::{GameError, Result};
use super::hand::Hand;
use super::player::{PlayerId, PlayerMap};

/// Episode classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    InProgress,
    /// Deck and every hand are empty.
    Won,
    /// The active player holds cards but none can be played.
    Lost,
}

impl Outcome {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Outcome::InProgress)
    }
}

/// Complete state of one episode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    deck: Deck,
    piles: SmallVec<[Pile; 4]>,
    hands: PlayerMap<Hand>,
    hand_size: usize,
    must_play: usize,

    current_player: PlayerId,
    cards_played_this_turn: usize,
    must_play_count: usize,
    turn_number: u32,
    outcome: Outcome,
    difficulty: f64,

    card_population: usize,
    cards_consumed: usize,
    cards_withheld: usize,
}

impl GameState {
    /// A fresh table: sentinel piles, empty hands, `deck` still undealt.
    ///
    /// Call [`GameState::deal_initial_hands`] before play.
    #[must_use]
    pub fn new(config: &GameConfig, deck: Deck, difficulty: f64) -> Self {
        let piles = (0..config.ascending_piles)
            .map(|_| Pile::ascending(config.low_sentinel()))
            .chain((0..config.descending_piles).map(|_| Pile::descending(config.high_sentinel())))
            .collect();

        Self::from_parts(config, deck, piles, PlayerMap::with_default(config.num_players), difficulty)
    }

    /// Assemble a state from explicit components (scripted setups).
    pub(crate) fn from_parts(
        config: &GameConfig,
        deck: Deck,
        piles: SmallVec<[Pile; 4]>,
        hands: PlayerMap<Hand>,
        difficulty: f64,
    ) -> Self {
        let card_population = deck.len() + hands.values().map(Hand::len).sum::<usize>();
        let mut state = Self {
            deck,
            piles,
            hands,
            hand_size: config.hand_size,
            must_play: config.must_play,
            current_player: PlayerId::new(0),
            cards_played_this_turn: 0,
            must_play_count: config.must_play,
            turn_number: 1,
            outcome: Outcome::InProgress,
            difficulty,
            card_population,
            cards_consumed: 0,
            cards_withheld: 0,
        };
        state.refresh_must_play();
        state
    }

    // === Deck & Hands ===

    /// Deal round-robin from the deck until every hand holds `hand_size`
    /// cards or the deck runs out. Never fails on a short deck.
    pub fn deal_initial_hands(&mut self) {
        'deal: for _ in 0..self.hand_size {
            for player in PlayerId::all(self.player_count()) {
                if self.hands[player].len() >= self.hand_size {
                    continue;
                }
                match self.deck.draw() {
                    Some(card) => self.hands[player].insert(card),
                    None => break 'deal,
                }
            }
        }
        self.refresh_must_play();
    }

    /// Move the top deck card into `player`'s hand. No-op on an empty deck.
    pub(crate) fn draw(&mut self, player: PlayerId) -> Option<Card> {
        let card = self.deck.draw()?;
        self.hands[player].insert(card);
        Some(card)
    }

    /// Take `card` out of `player`'s hand.
    pub(crate) fn remove(&mut self, player: PlayerId, card: Card) -> Result<()> {
        if self.hands[player].remove(card) {
            Ok(())
        } else {
            Err(GameError::NotInHand { player, card })
        }
    }

    /// Put `card` on pile `pile_index` and count it as played this turn.
    pub(crate) fn place(&mut self, pile_index: usize, card: Card) {
        self.piles[pile_index].apply(card);
        self.cards_played_this_turn += 1;
        self.cards_consumed += 1;
    }

    // === Turn Advancement ===

    /// Hand the turn to `next` and recompute the play requirement.
    pub(crate) fn advance_turn(&mut self, next: PlayerId) {
        self.current_player = next;
        self.cards_played_this_turn = 0;
        self.turn_number += 1;
        self.refresh_must_play();
    }

    pub(crate) fn set_current_player(&mut self, player: PlayerId) {
        self.current_player = player;
    }

    /// Replace the episode's per-turn requirement. The current turn owes
    /// `count` even on an empty deck; later turns fall back to 1 once the
    /// deck is gone.
    pub(crate) fn set_must_play(&mut self, count: usize) {
        self.must_play = count;
        self.must_play_count = count;
    }

    pub(crate) fn set_outcome(&mut self, outcome: Outcome) {
        self.outcome = outcome;
    }

    pub(crate) fn set_withheld(&mut self, count: usize) {
        self.cards_withheld = count;
    }

    fn refresh_must_play(&mut self) {
        self.must_play_count = if self.deck.is_empty() { 1 } else { self.must_play };
    }

    // === Queries ===

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.hands.player_count()
    }

    #[must_use]
    pub fn pile_count(&self) -> usize {
        self.piles.len()
    }

    #[must_use]
    pub fn hand_size(&self) -> usize {
        self.hand_size
    }

    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    #[must_use]
    pub fn deck_size(&self) -> usize {
        self.deck.len()
    }

    #[must_use]
    pub fn piles(&self) -> &[Pile] {
        &self.piles
    }

    #[must_use]
    pub fn hand(&self, player: PlayerId) -> &Hand {
        &self.hands[player]
    }

    #[must_use]
    pub fn hands(&self) -> &PlayerMap<Hand> {
        &self.hands
    }

    /// Hand of the player to move.
    #[must_use]
    pub fn active_hand(&self) -> &Hand {
        &self.hands[self.current_player]
    }

    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.current_player
    }

    #[must_use]
    pub fn cards_played_this_turn(&self) -> usize {
        self.cards_played_this_turn
    }

    /// Cards the active player must play this turn (1 once the deck is empty).
    #[must_use]
    pub fn must_play_count(&self) -> usize {
        self.must_play_count
    }

    /// Cards still owed before the turn may end.
    #[must_use]
    pub fn cards_required(&self) -> usize {
        self.must_play_count.saturating_sub(self.cards_played_this_turn)
    }

    /// Turn number (starts at 1).
    #[must_use]
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    #[must_use]
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    #[must_use]
    pub fn difficulty(&self) -> f64 {
        self.difficulty
    }

    /// Cards dealt into this episode (deck + hands at the start).
    #[must_use]
    pub fn card_population(&self) -> usize {
        self.card_population
    }

    #[must_use]
    pub fn cards_consumed(&self) -> usize {
        self.cards_consumed
    }

    /// Cards removed from the deck before dealing.
    #[must_use]
    pub fn cards_withheld(&self) -> usize {
        self.cards_withheld
    }

    /// Cards not yet played (deck plus all hands).
    #[must_use]
    pub fn cards_remaining(&self) -> usize {
        self.deck.len() + self.hands.values().map(Hand::len).sum::<usize>()
    }

    /// Deck and every hand are empty.
    #[must_use]
    pub fn is_cleared(&self) -> bool {
        self.deck.is_empty() && self.hands.values().all(Hand::is_empty)
    }

    /// Every card is accounted for exactly once.
    #[must_use]
    pub fn is_conserved(&self) -> bool {
        if self.cards_remaining() + self.cards_consumed != self.card_population {
            return false;
        }
        let mut seen = FxHashSet::default();
        self.deck
            .iter()
            .chain(self.hands.values().flat_map(Hand::iter))
            .all(|card| seen.insert(card))
    }
}
