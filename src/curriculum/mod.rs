//! Difficulty scaling across episodes.

pub mod difficulty;

pub use difficulty::{
    check_difficulty, prepare_deck, withheld_count, DifficultyConfig, DifficultyController,
};
