//! # the-game-rl
//!
//! A deterministic simulation engine for the cooperative card game
//! "The Game", built to be driven by reinforcement-learning agents.
//!
//! ## Design Principles
//!
//! 1. **Illegal states are unreachable**: every action is re-validated by
//!    the rules engine; the action mask is a hint, never a trust boundary.
//!
//! 2. **Replayable**: one seed fixes the deck order. The same seed,
//!    difficulty and action sequence produce identical observations and
//!    rewards.
//!
//! 3. **Cheap decisions**: legality checks are O(hand * piles) on inline
//!    storage; state clones share the deck via `im-rs`.
//!
//! ## Modules
//!
//! - `core`: Cards, piles, deck, hands, state, configuration, RNG, errors
//! - `rules`: Turn state machine, legality masks, rewards
//! - `curriculum`: Deck-truncation difficulty controller
//! - `env`: Reset/step environment and observations
//! - `nn`: Flat tensor encoding of observations
//! - `agents`: Scripted baseline policies
//! - `training`: Episode runner and trajectories
//! - `python`: PyO3 bindings (feature `python`)

pub mod agents;
pub mod core;
pub mod curriculum;
pub mod env;
pub mod nn;
pub mod rules;
pub mod training;

#[cfg(feature = "python")]
pub mod python;

// Re-export commonly used types
pub use crate::core::{
    Card, Deck, Direction, GameConfig, GameError, GameRng, GameSetup, GameState, Hand, Outcome,
    Pile, PlayAction, PlayerId, Result, RewardConfig,
};

pub use crate::rules::{ActionMask, InvalidReason, Rules, StepKind, StepResult};

pub use crate::curriculum::{DifficultyConfig, DifficultyController};

pub use crate::env::{Environment, Info, Observation, StepOutcome};

pub use crate::agents::{GreedyPolicy, Policy, RandomPolicy};

pub use crate::training::{EpisodeRunner, RunnerConfig, Trajectory};
