//! What the player to move may see.
//!
//! An `Observation` is an owned snapshot: it never borrows the state it was
//! taken from. Other players' cards are reduced to hand sizes; the deck is
//! reduced to its length.

use serde::{Deserialize, Serialize};

use crate::core::{Card, GameConfig, GameState, PlayAction, Result};
use crate::rules::compute_mask;

/// Decision-time view for the active player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// Presence vector over `min_card..=max_card`; 1 where the active hand
    /// holds that value.
    pub hand: Vec<u8>,
    /// Value represented by `hand[0]`.
    pub min_card: u8,
    /// Top value of each pile, ascending piles first.
    pub pile_values: Vec<u8>,
    /// 1 for ascending piles, 0 for descending.
    pub pile_directions: Vec<u8>,
    pub deck_size: usize,
    /// Cards the active player still owes this turn.
    pub cards_to_play: usize,
    /// Hand sizes of the other seats, starting with the next one to move.
    pub other_hand_sizes: Vec<usize>,
    pub active_player: usize,
    /// Legality mask over `hand_size * pile_count` actions.
    pub action_mask: Vec<u8>,
}

impl Observation {
    /// Snapshot `state` for its active player.
    #[must_use]
    pub fn new(state: &GameState, config: &GameConfig) -> Self {
        let mut hand = vec![0u8; config.card_count()];
        for card in state.active_hand().iter() {
            hand[usize::from(card.value() - config.min_card)] = 1;
        }

        let current = state.current_player();
        let other_hand_sizes = current
            .seats_after(state.player_count())
            .take(state.player_count() - 1)
            .map(|seat| state.hand(seat).len())
            .collect();

        Self {
            hand,
            min_card: config.min_card,
            pile_values: state.piles().iter().map(|pile| pile.value).collect(),
            pile_directions: state.piles().iter().map(|pile| pile.direction.flag()).collect(),
            deck_size: state.deck_size(),
            cards_to_play: state.cards_required(),
            other_hand_sizes,
            active_player: current.index(),
            action_mask: compute_mask(state).to_bytes(),
        }
    }

    #[must_use]
    pub fn pile_count(&self) -> usize {
        self.pile_values.len()
    }

    /// Cards in the active hand, in enumeration order.
    ///
    /// Hands enumerate in ascending value, so the k-th card returned here
    /// is `card_index` k.
    pub fn hand_cards(&self) -> impl Iterator<Item = Card> + '_ {
        self.hand
            .iter()
            .enumerate()
            .filter(|&(_, &present)| present != 0)
            .map(move |(offset, _)| Card::new(self.min_card + offset as u8))
    }

    /// Whether the mask marks `action` as legal.
    #[must_use]
    pub fn is_legal(&self, action: PlayAction) -> bool {
        action
            .to_flat(self.pile_count())
            .and_then(|index| self.action_mask.get(index))
            .is_some_and(|&bit| bit != 0)
    }

    /// Every action the mask allows, in flat order.
    #[must_use]
    pub fn legal_actions(&self) -> Vec<PlayAction> {
        let pile_count = self.pile_count();
        self.action_mask
            .iter()
            .enumerate()
            .filter(|&(_, &bit)| bit != 0)
            .map(|(index, _)| PlayAction::from_flat(index, pile_count))
            .collect()
    }

    /// Compact binary encoding.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameRng, GameSetup};
    use crate::rules::legal_actions;

    fn observed(setup: GameSetup, config: &GameConfig) -> (GameState, Observation) {
        let state = setup.build(config, &mut GameRng::new(0)).unwrap();
        let obs = Observation::new(&state, config);
        (state, obs)
    }

    #[test]
    fn test_fields() {
        let config = GameConfig::new(3);
        let (_, obs) = observed(
            GameSetup {
                active_player: 1,
                must_play: Some(2),
                piles_up: vec![1, 30],
                piles_down: vec![100, 70],
                hands: vec![vec![10, 11], vec![50, 5, 60], vec![90]],
                ..GameSetup::default()
            },
            &config,
        );

        assert_eq!(obs.hand.len(), 98);
        assert_eq!(obs.hand.iter().filter(|&&b| b == 1).count(), 3);
        assert_eq!(obs.hand[3], 1);
        assert_eq!(
            obs.hand_cards().map(Card::value).collect::<Vec<_>>(),
            vec![5, 50, 60]
        );
        assert_eq!(obs.pile_values, vec![1, 30, 100, 70]);
        assert_eq!(obs.pile_directions, vec![1, 1, 0, 0]);
        assert_eq!(obs.deck_size, 98 - 6);
        assert_eq!(obs.cards_to_play, 2);
        assert_eq!(obs.other_hand_sizes, vec![1, 2]);
        assert_eq!(obs.active_player, 1);
        assert_eq!(obs.action_mask.len(), 24);
    }

    #[test]
    fn test_mask_queries_match_rules() {
        let config = GameConfig::new(1);
        let (state, obs) = observed(
            GameSetup {
                piles_up: vec![40, 60],
                piles_down: vec![50, 20],
                hands: vec![vec![30, 45, 55, 70]],
                ..GameSetup::default()
            },
            &config,
        );

        assert_eq!(obs.legal_actions(), legal_actions(&state));
        assert!(obs.is_legal(PlayAction::new(0, 0)));
        assert!(!obs.is_legal(PlayAction::new(0, 4)));
        assert!(!obs.is_legal(PlayAction::new(9, 0)));
    }

    #[test]
    fn test_huge_indices_are_not_legal() {
        let config = GameConfig::new(1);
        let (_, obs) = observed(
            GameSetup {
                piles_up: vec![1, 1],
                piles_down: vec![100, 100],
                hands: vec![vec![50]],
                ..GameSetup::default()
            },
            &config,
        );

        assert!(obs.is_legal(PlayAction::new(0, 3)));
        assert!(!obs.is_legal(PlayAction::new(usize::MAX, 0)));
        assert!(!obs.is_legal(PlayAction::new(usize::MAX / 2, 3)));
        assert!(!obs.is_legal(PlayAction::new(0, usize::MAX)));
    }

    #[test]
    fn test_single_player_has_no_others() {
        let config = GameConfig::new(1);
        let (_, obs) = observed(
            GameSetup {
                piles_up: vec![1, 1],
                piles_down: vec![100, 100],
                hands: vec![vec![2]],
                ..GameSetup::default()
            },
            &config,
        );

        assert!(obs.other_hand_sizes.is_empty());
        assert!(!obs.to_bytes().unwrap().is_empty());
    }
}
