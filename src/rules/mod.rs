//! Rules of play: legality masks, the turn state machine, and rewards.
//!
//! `engine::Rules` applies actions to a `GameState`; `mask` answers
//! read-only legality queries; `reward` scores each transition.

pub mod engine;
pub mod mask;
pub mod reward;

pub use engine::{InvalidReason, Play, Rules, StepKind, StepResult};
pub use mask::{compute_mask, has_legal_action, legal_actions, ActionMask};
pub use reward::RewardEvaluator;
