//! Observation encoding for neural network input.
//!
//! Flattens an [`Observation`] into a fixed-length `f32` vector with every
//! feature scaled into `[0, 1]`. Layout, in order:
//!
//! | Block              | Length        | Value                          |
//! |--------------------|---------------|--------------------------------|
//! | hand presence      | `card_count`  | 0 / 1                          |
//! | pile values        | `P`           | `value / high_sentinel`        |
//! | pile directions    | `P`           | 1 ascending, 0 descending      |
//! | deck size          | 1             | `deck_size / card_count`       |
//! | cards to play      | 1             | `cards_to_play / must_play`    |
//! | other hand sizes   | `players - 1` | `size / hand_size`             |
//! | active player      | `players`     | one-hot                        |
//! | action mask        | `hand_size*P` | 0 / 1                          |

use serde::{Deserialize, Serialize};

use crate::core::GameConfig;
use crate::env::Observation;

/// Encoded observation as a flat tensor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EncodedState {
    /// Flattened tensor data (row-major order).
    pub tensor: Vec<f32>,
    pub shape: Vec<usize>,
}

impl EncodedState {
    pub fn new(tensor: Vec<f32>, shape: Vec<usize>) -> Self {
        debug_assert_eq!(
            tensor.len(),
            shape.iter().product::<usize>(),
            "Tensor length must match shape product"
        );
        Self { tensor, shape }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tensor.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tensor.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<f32> {
        self.tensor.get(index).copied()
    }
}

/// Turns observations into network input.
pub trait ObservationEncoder: Send + Sync {
    fn encode(&self, observation: &Observation) -> EncodedState;

    fn output_shape(&self) -> Vec<usize>;

    /// Length of the policy output (the flattened action space).
    fn action_space_size(&self) -> usize;
}

/// Fixed-layout flat encoder for one table configuration.
#[derive(Clone, Debug)]
pub struct FlatEncoder {
    card_count: usize,
    pile_count: usize,
    players: usize,
    hand_size: usize,
    must_play: usize,
    high_sentinel: f32,
}

impl FlatEncoder {
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        Self {
            card_count: config.card_count(),
            pile_count: config.pile_count(),
            players: config.num_players,
            hand_size: config.hand_size,
            must_play: config.must_play,
            high_sentinel: f32::from(config.high_sentinel()),
        }
    }

    /// Total number of features.
    #[must_use]
    pub fn feature_count(&self) -> usize {
        self.card_count
            + 2 * self.pile_count
            + 2
            + self.players.saturating_sub(1)
            + self.players
            + self.action_space_size()
    }
}

impl ObservationEncoder for FlatEncoder {
    fn encode(&self, obs: &Observation) -> EncodedState {
        let mut tensor = Vec::with_capacity(self.feature_count());

        tensor.extend(obs.hand.iter().map(|&b| f32::from(b)));
        tensor.extend(obs.pile_values.iter().map(|&v| f32::from(v) / self.high_sentinel));
        tensor.extend(obs.pile_directions.iter().map(|&d| f32::from(d)));
        tensor.push(obs.deck_size as f32 / self.card_count as f32);
        tensor.push((obs.cards_to_play as f32 / self.must_play as f32).min(1.0));
        tensor.extend(
            obs.other_hand_sizes
                .iter()
                .map(|&n| n as f32 / self.hand_size as f32),
        );
        tensor.extend((0..self.players).map(|seat| f32::from(u8::from(seat == obs.active_player))));
        tensor.extend(obs.action_mask.iter().map(|&b| f32::from(b)));

        let len = tensor.len();
        EncodedState::new(tensor, vec![len])
    }

    fn output_shape(&self) -> Vec<usize> {
        vec![self.feature_count()]
    }

    fn action_space_size(&self) -> usize {
        self.hand_size * self.pile_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curriculum::DifficultyConfig;
    use crate::env::Environment;

    fn observation(config: &GameConfig, seed: u64) -> Observation {
        let mut env = Environment::new(config.clone(), DifficultyConfig::default()).unwrap();
        env.reset(seed, 1.0).unwrap().0
    }

    #[test]
    fn test_shape_matches_layout() {
        let config = GameConfig::default();
        let encoder = FlatEncoder::new(&config);

        // 98 + 8 + 2 + 3 + 4 + 24
        assert_eq!(encoder.feature_count(), 139);
        assert_eq!(encoder.output_shape(), vec![139]);
        assert_eq!(encoder.action_space_size(), 24);

        let encoded = encoder.encode(&observation(&config, 1));
        assert_eq!(encoded.len(), 139);
        assert_eq!(encoded.shape, vec![139]);
    }

    #[test]
    fn test_unvalidated_config_does_not_panic() {
        let encoder = FlatEncoder::new(&GameConfig::new(0).with_card_range(50, 40));

        // Piles, deck, to-play and mask survive; card and seat terms are empty.
        assert_eq!(encoder.feature_count(), 2 * 4 + 2 + 6 * 4);
        assert!(GameConfig::new(0).with_card_range(50, 40).validate().is_err());
    }

    #[test]
    fn test_values_normalised() {
        let config = GameConfig::new(2);
        let encoder = FlatEncoder::new(&config);
        let encoded = encoder.encode(&observation(&config, 5));

        assert!(encoded.tensor.iter().all(|&x| (0.0..=1.0).contains(&x)));
        assert_eq!(encoded.tensor[..98].iter().sum::<f32>(), 6.0);

        // Piles start at 1, 1, 100, 100.
        assert!((encoded.get(98).unwrap() - 0.01).abs() < 1e-6);
        assert_eq!(encoded.get(100), Some(1.0));
        assert_eq!(&encoded.tensor[102..106], &[1.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_active_player_one_hot() {
        let config = GameConfig::new(3);
        let encoder = FlatEncoder::new(&config);
        let encoded = encoder.encode(&observation(&config, 9));

        // 98 + 8 + 2 + 2 others, then 3 seats.
        assert_eq!(&encoded.tensor[110..113], &[1.0, 0.0, 0.0]);
    }
}
