//! Engine errors.
//!
//! Rule violations inside an episode (illegal plays, out-of-range indices)
//! are not errors: they come back as an invalid step with a penalty reward.
//! `GameError` is reserved for broken calling contracts and invariants.

use thiserror::Error;

use super::card::Card;
use super::player::PlayerId;

#[derive(Debug, Error)]
pub enum GameError {
    /// An action was submitted after the episode reached Won or Lost.
    #[error("episode has ended; call reset before stepping again")]
    EpisodeEnded,

    /// A card was removed from a hand that does not hold it.
    #[error("invariant violated: {card} is not in the hand of {player}")]
    NotInHand { player: PlayerId, card: Card },

    #[error("invalid game configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid game setup: {0}")]
    InvalidSetup(String),

    #[error("difficulty must be within [0, 1], got {0}")]
    InvalidDifficulty(f64),

    #[error("encoding failed: {0}")]
    Encode(#[from] bincode::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
