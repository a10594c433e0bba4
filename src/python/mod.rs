//! Python bindings for the engine.
//!
//! # Quick Start
//!
//! ```python
//! import the_game
//!
//! env = the_game.TheGameEnv(num_players=4)
//! curriculum = the_game.DifficultyController(wins_per_step=10)
//!
//! obs, info = env.reset_with(seed=0, controller=curriculum)
//! while not env.done:
//!     card, pile = env.legal_actions()[0]
//!     obs, reward, terminated, truncated, info = env.step(card, pile)
//! curriculum.observe(env.outcome == "won")
//! ```

use pyo3::prelude::*;

mod py_env;

pub use py_env::*;

/// the_game: "The Game" simulation environment for RL training.
#[pymodule]
fn the_game(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyTheGameEnv>()?;
    m.add_class::<PyDifficultyController>()?;
    Ok(())
}
