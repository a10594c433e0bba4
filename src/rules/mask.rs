//! Action masks and legal-action enumeration.
//!
//! The mask covers the fixed action space `hand_size * pile_count`; bit
//! `card_index * pile_count + pile_index` is set iff the hand has a card
//! at `card_index` and that card is legal on the pile. Bits for empty hand
//! slots stay 0.
//!
//! The mask is advisory. The engine re-checks every action it applies.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{is_legal, GameState, PlayAction};

/// Fixed-length bit vector over the flattened action space.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionMask {
    words: SmallVec<[u64; 1]>,
    len: usize,
}

impl ActionMask {
    /// All-zero mask of `len` bits.
    #[must_use]
    pub fn zeros(len: usize) -> Self {
        Self {
            words: SmallVec::from_elem(0, len.div_ceil(64)),
            len,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bit at `index`; false when out of range.
    #[must_use]
    pub fn get(&self, index: usize) -> bool {
        index < self.len && self.words[index / 64] & (1 << (index % 64)) != 0
    }

    pub fn set(&mut self, index: usize) {
        assert!(index < self.len, "mask index {index} out of range {}", self.len);
        self.words[index / 64] |= 1 << (index % 64);
    }

    /// Number of legal actions.
    #[must_use]
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    #[must_use]
    pub fn any(&self) -> bool {
        self.words.iter().any(|&w| w != 0)
    }

    /// Indices of set bits, ascending.
    pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).filter(move |&i| self.get(i))
    }

    /// One byte per action, 1 for legal.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        (0..self.len).map(|i| u8::from(self.get(i))).collect()
    }
}

/// Legality mask for the active player.
#[must_use]
pub fn compute_mask(state: &GameState) -> ActionMask {
    let pile_count = state.pile_count();
    let mut mask = ActionMask::zeros(state.hand_size() * pile_count);

    for (card_index, card) in state.active_hand().iter().enumerate().take(state.hand_size()) {
        for (pile_index, pile) in state.piles().iter().enumerate() {
            if is_legal(card, pile) {
                mask.set(card_index * pile_count + pile_index);
            }
        }
    }
    mask
}

/// Every legal `(card, pile)` pair for the active player, in flat order.
#[must_use]
pub fn legal_actions(state: &GameState) -> Vec<PlayAction> {
    let mut actions = Vec::new();
    for (card_index, card) in state.active_hand().iter().enumerate() {
        for (pile_index, pile) in state.piles().iter().enumerate() {
            if is_legal(card, pile) {
                actions.push(PlayAction::new(card_index, pile_index));
            }
        }
    }
    actions
}

/// Whether the active player has at least one legal play.
#[must_use]
pub fn has_legal_action(state: &GameState) -> bool {
    state
        .active_hand()
        .iter()
        .any(|card| state.piles().iter().any(|pile| is_legal(card, pile)))
}
