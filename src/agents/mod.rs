//! Scripted players.

pub mod policy;

pub use policy::{GreedyPolicy, Policy, RandomPolicy};
