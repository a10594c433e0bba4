//! Agent-facing environment: reset, step, observe.
//!
//! ```
//! use the_game::core::GameConfig;
//! use the_game::curriculum::DifficultyConfig;
//! use the_game::env::Environment;
//!
//! let mut env = Environment::new(GameConfig::default(), DifficultyConfig::default()).unwrap();
//! let (obs, _info) = env.reset(42, 1.0).unwrap();
//! assert_eq!(obs.deck_size, 74);
//!
//! let action = env.legal_actions()[0];
//! let out = env.step(action.card_index, action.pile_index).unwrap();
//! assert!(!out.terminated);
//! ```

pub mod environment;
pub mod observation;

pub use environment::{Environment, Info, StepOutcome};
pub use observation::Observation;
