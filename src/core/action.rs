//! Play actions: a card index into the active hand plus a pile index.
//!
//! Actions are flattened to `card_index * pile_count + pile_index`, the
//! layout shared by the action mask and the policy output.

use serde::{Deserialize, Serialize};

/// Play the `card_index`-th card of the active hand onto pile `pile_index`.
///
/// Indices are not validated here; out-of-range values are a legal input
/// to the engine and come back as an invalid step.
///
/// ```
/// use the_game::core::PlayAction;
///
/// let action = PlayAction::new(2, 3);
/// assert_eq!(action.to_flat(4), Some(11));
/// assert_eq!(PlayAction::from_flat(11, 4), action);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayAction {
    pub card_index: usize,
    pub pile_index: usize,
}

impl PlayAction {
    #[must_use]
    pub const fn new(card_index: usize, pile_index: usize) -> Self {
        Self {
            card_index,
            pile_index,
        }
    }

    /// Flat index for a table with `pile_count` piles, or `None` when the
    /// pile is off the table or the index overflows.
    #[must_use]
    pub const fn to_flat(self, pile_count: usize) -> Option<usize> {
        if self.pile_index >= pile_count {
            return None;
        }
        match self.card_index.checked_mul(pile_count) {
            Some(row) => row.checked_add(self.pile_index),
            None => None,
        }
    }

    /// Inverse of [`PlayAction::to_flat`].
    #[must_use]
    pub const fn from_flat(index: usize, pile_count: usize) -> Self {
        Self {
            card_index: index / pile_count,
            pile_index: index % pile_count,
        }
    }
}

impl std::fmt::Display for PlayAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "card #{} -> pile {}", self.card_index, self.pile_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_layout() {
        let pile_count = 4;

        assert_eq!(PlayAction::new(0, 0).to_flat(pile_count), Some(0));
        assert_eq!(PlayAction::new(0, 3).to_flat(pile_count), Some(3));
        assert_eq!(PlayAction::new(1, 0).to_flat(pile_count), Some(4));
        assert_eq!(PlayAction::new(5, 3).to_flat(pile_count), Some(23));
    }

    #[test]
    fn test_flat_rejects_unrepresentable_actions() {
        assert_eq!(PlayAction::new(0, 4).to_flat(4), None);
        assert_eq!(PlayAction::new(usize::MAX, 0).to_flat(4), None);
        assert_eq!(PlayAction::new(usize::MAX / 4, 3).to_flat(4), None);
        assert_eq!(PlayAction::new(usize::MAX, 0).to_flat(1), Some(usize::MAX));
    }

    #[test]
    fn test_from_flat_covers_action_space() {
        for index in 0..24 {
            let action = PlayAction::from_flat(index, 4);
            assert!(action.card_index < 6);
            assert!(action.pile_index < 4);
            assert_eq!(action.to_flat(4), Some(index));
        }
    }

    #[test]
    fn test_serialization() {
        let action = PlayAction::new(1, 2);
        let json = serde_json::to_string(&action).unwrap();
        let back: PlayAction = serde_json::from_str(&json).unwrap();
        assert_eq!(action, back);
    }
}
