//! Core engine types: cards, piles, deck, hands, state, configuration.
//!
//! Everything here is plain data plus the primitive moves between deck,
//! hands and piles. Turn sequencing lives in `rules`.

pub mod action;
pub mod card;
pub mod config;
pub mod deck;
pub mod error;
pub mod hand;
pub mod player;
pub mod rng;
pub mod setup;
pub mod state;

pub use action::PlayAction;
pub use card::{is_legal, Card, Direction, Pile, REVERSE_STEP};
pub use config::{GameConfig, RewardConfig};
pub use deck::Deck;
pub use error::{GameError, Result};
pub use hand::Hand;
pub use player::{PlayerId, PlayerMap};
pub use rng::GameRng;
pub use setup::GameSetup;
pub use state::{GameState, Outcome};
