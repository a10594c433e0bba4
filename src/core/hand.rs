//! A player's hand.
//!
//! Cards are kept sorted by value, which gives a stable enumeration order:
//! card index `i` in an action is the `i`-th smallest card, and the same
//! index can be recovered from the hand's presence vector alone.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::card::Card;

/// Inline capacity; the standard game deals six cards.
const INLINE_CARDS: usize = 8;

/// A hand of cards, sorted ascending.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hand {
    cards: SmallVec<[Card; INLINE_CARDS]>,
}

impl Hand {
    /// Create an empty hand.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a hand from arbitrary cards (sorted on insert).
    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        let mut hand = Self::new();
        for card in cards {
            hand.insert(card);
        }
        hand
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Card at enumeration index `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Card> {
        self.cards.get(index).copied()
    }

    #[must_use]
    pub fn contains(&self, card: Card) -> bool {
        self.cards.binary_search(&card).is_ok()
    }

    /// Cards in enumeration order.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn iter(&self) -> impl Iterator<Item = Card> + '_ {
        self.cards.iter().copied()
    }

    /// Insert a card, keeping the hand sorted.
    pub fn insert(&mut self, card: Card) {
        let pos = self.cards.binary_search(&card).unwrap_or_else(|pos| pos);
        self.cards.insert(pos, card);
    }

    /// Remove one copy of `card`. Returns false if it is not held.
    pub fn remove(&mut self, card: Card) -> bool {
        match self.cards.binary_search(&card) {
            Ok(pos) => {
                self.cards.remove(pos);
                true
            }
            Err(_) => false,
        }
    }
}

impl std::fmt::Display for Hand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, card) in self.cards.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{card}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards(values: &[u8]) -> Vec<Card> {
        values.iter().copied().map(Card::new).collect()
    }

    #[test]
    fn test_insert_keeps_order() {
        let hand = Hand::from_cards(cards(&[40, 7, 93, 12]));
        assert_eq!(hand.cards(), cards(&[7, 12, 40, 93]).as_slice());
        assert_eq!(hand.get(0), Some(Card::new(7)));
        assert_eq!(hand.get(3), Some(Card::new(93)));
        assert_eq!(hand.get(4), None);
    }

    #[test]
    fn test_remove() {
        let mut hand = Hand::from_cards(cards(&[10, 20, 30]));

        assert!(hand.remove(Card::new(20)));
        assert_eq!(hand.cards(), cards(&[10, 30]).as_slice());
        assert!(!hand.remove(Card::new(20)));
        assert_eq!(hand.len(), 2);
    }

    #[test]
    fn test_spills_past_inline_capacity() {
        let hand = Hand::from_cards((2..14).rev().map(Card::new));
        assert_eq!(hand.len(), 12);
        assert_eq!(hand.get(0), Some(Card::new(2)));
        assert!(hand.contains(Card::new(13)));
    }

    #[test]
    fn test_display() {
        let hand = Hand::from_cards(cards(&[5, 3]));
        assert_eq!(hand.to_string(), "[3, 5]");
        assert_eq!(Hand::new().to_string(), "[]");
    }
}
