//! Episode harness for baselines and data collection.
//!
//! - **EpisodeRunner**: plays episodes with a `Policy`, enforcing the
//!   harness limits and feeding the difficulty controller
//! - **Trajectory**: per-step record of one episode
//! - **RunSummary**: win/loss totals over many episodes
//!
//! ## Usage
//!
//! ```rust,ignore
//! use the_game::agents::GreedyPolicy;
//! use the_game::training::{EpisodeRunner, RunnerConfig};
//!
//! let mut runner = EpisodeRunner::new(env, RunnerConfig::default());
//! let summary = runner.play_episodes(1_000, &GreedyPolicy, &mut controller)?;
//! println!("win rate {:.1}%", 100.0 * summary.win_rate());
//! ```

pub mod runner;
pub mod trajectory;

pub use runner::{EpisodeRunner, RunnerConfig};
pub use trajectory::{RunSummary, StepRecord, Trajectory};
