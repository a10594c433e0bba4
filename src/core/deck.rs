//! The shared draw deck.
//!
//! Backed by `im::Vector` so cloning a `GameState` for look-ahead shares
//! the undealt cards instead of copying them. Cards leave from the front.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::card::Card;
use super::rng::GameRng;

/// Ordered sequence of undealt cards. The front is the next card drawn.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vector<Card>,
}

impl Deck {
    /// An unshuffled deck holding every value in `min..=max`.
    #[must_use]
    pub fn ordered(min: u8, max: u8) -> Self {
        Self {
            cards: (min..=max).map(Card::new).collect(),
        }
    }

    /// A deck with the given cards, first card on top.
    #[must_use]
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self {
            cards: Vector::from(cards),
        }
    }

    /// Shuffle in place.
    pub fn shuffle(&mut self, rng: &mut GameRng) {
        let mut cards: Vec<Card> = self.cards.iter().copied().collect();
        rng.shuffle(&mut cards);
        self.cards = Vector::from(cards);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Take the top card, if any.
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop_front()
    }

    /// Discard up to `count` cards from the top before dealing.
    ///
    /// Returns how many were removed.
    pub fn withhold_front(&mut self, count: usize) -> usize {
        let count = count.min(self.cards.len());
        self.cards = self.cards.skip(count);
        count
    }

    pub fn iter(&self) -> impl Iterator<Item = Card> + '_ {
        self.cards.iter().copied()
    }
}
