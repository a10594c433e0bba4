//! Environment and curriculum bindings for Python.

use numpy::PyArray1;
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::core::{GameConfig, GameError, GameSetup, Outcome};
use crate::curriculum::{DifficultyConfig, DifficultyController};
use crate::env::{Environment, Info, Observation};
use crate::nn::{FlatEncoder, ObservationEncoder};

fn to_py_err(err: GameError) -> PyErr {
    match err {
        GameError::EpisodeEnded | GameError::NotInHand { .. } | GameError::Encode(_) => {
            PyRuntimeError::new_err(err.to_string())
        }
        _ => PyValueError::new_err(err.to_string()),
    }
}

fn observation_dict<'py>(py: Python<'py>, obs: &Observation) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new_bound(py);
    dict.set_item("hand", PyArray1::from_slice_bound(py, &obs.hand))?;
    dict.set_item("pile_values", PyArray1::from_slice_bound(py, &obs.pile_values))?;
    dict.set_item(
        "pile_directions",
        PyArray1::from_slice_bound(py, &obs.pile_directions),
    )?;
    dict.set_item("deck_size", obs.deck_size)?;
    dict.set_item("cards_to_play", obs.cards_to_play)?;
    let others: Vec<u64> = obs.other_hand_sizes.iter().map(|&n| n as u64).collect();
    dict.set_item("other_hand_sizes", PyArray1::from_vec_bound(py, others))?;
    dict.set_item("active_player", obs.active_player)?;
    dict.set_item("action_mask", PyArray1::from_slice_bound(py, &obs.action_mask))?;
    Ok(dict)
}

fn info_dict<'py>(py: Python<'py>, info: &Info) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new_bound(py);
    for (key, value) in info {
        dict.set_item(*key, *value)?;
    }
    Ok(dict)
}

/// Python wrapper for the game environment.
///
/// ```python
/// env = the_game.TheGameEnv(num_players=4)
/// obs, info = env.reset(seed=0, difficulty=1.0)
/// obs, reward, terminated, truncated, info = env.step(0, 0)
/// ```
#[pyclass(name = "TheGameEnv")]
pub struct PyTheGameEnv {
    env: Environment,
    encoder: FlatEncoder,
}

#[pymethods]
impl PyTheGameEnv {
    /// Create an environment.
    ///
    /// `config_json` overrides every other argument when given.
    #[new]
    #[pyo3(signature = (num_players = 4, hand_size = 6, must_play = 2, max_removable = 80, config_json = None))]
    fn new(
        num_players: usize,
        hand_size: usize,
        must_play: usize,
        max_removable: usize,
        config_json: Option<&str>,
    ) -> PyResult<Self> {
        let config = match config_json {
            Some(json) => serde_json::from_str(json)
                .map_err(|e| PyValueError::new_err(format!("bad config: {e}")))?,
            None => GameConfig::new(num_players)
                .with_hand_size(hand_size)
                .with_must_play(must_play),
        };
        let curriculum = DifficultyConfig::default().with_max_removable(max_removable);
        let env = Environment::new(config, curriculum).map_err(to_py_err)?;
        let encoder = FlatEncoder::new(env.config());
        Ok(Self { env, encoder })
    }

    /// Start an episode. Returns `(observation, info)`.
    #[pyo3(signature = (seed = 0, difficulty = 1.0))]
    fn reset<'py>(
        &mut self,
        py: Python<'py>,
        seed: u64,
        difficulty: f64,
    ) -> PyResult<(Bound<'py, PyDict>, Bound<'py, PyDict>)> {
        let (obs, info) = self.env.reset(seed, difficulty).map_err(to_py_err)?;
        Ok((observation_dict(py, &obs)?, info_dict(py, &info)?))
    }

    /// Start an episode at the controller's difficulty.
    fn reset_with<'py>(
        &mut self,
        py: Python<'py>,
        seed: u64,
        controller: &PyDifficultyController,
    ) -> PyResult<(Bound<'py, PyDict>, Bound<'py, PyDict>)> {
        let (obs, info) = self.env.reset_with(seed, &controller.0);
        Ok((observation_dict(py, &obs)?, info_dict(py, &info)?))
    }

    /// Start from a JSON table setup.
    #[pyo3(signature = (setup_json, seed = 0))]
    fn load<'py>(
        &mut self,
        py: Python<'py>,
        setup_json: &str,
        seed: u64,
    ) -> PyResult<(Bound<'py, PyDict>, Bound<'py, PyDict>)> {
        let setup: GameSetup = serde_json::from_str(setup_json)
            .map_err(|e| PyValueError::new_err(format!("bad setup: {e}")))?;
        let (obs, info) = self.env.load(&setup, seed).map_err(to_py_err)?;
        Ok((observation_dict(py, &obs)?, info_dict(py, &info)?))
    }

    /// Play a card. Returns `(observation, reward, terminated, truncated, info)`.
    #[allow(clippy::type_complexity)]
    fn step<'py>(
        &mut self,
        py: Python<'py>,
        card_index: usize,
        pile_index: usize,
    ) -> PyResult<(Bound<'py, PyDict>, f64, bool, bool, Bound<'py, PyDict>)> {
        let out = self.env.step(card_index, pile_index).map_err(to_py_err)?;
        Ok((
            observation_dict(py, &out.observation)?,
            out.reward,
            out.terminated,
            out.truncated,
            info_dict(py, &out.info)?,
        ))
    }

    /// Legality mask as a `uint8` array.
    fn action_mask<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<u8>> {
        PyArray1::from_vec_bound(py, self.env.action_mask().to_bytes())
    }

    /// Legal `(card_index, pile_index)` pairs.
    fn legal_actions(&self) -> Vec<(usize, usize)> {
        self.env
            .legal_actions()
            .into_iter()
            .map(|a| (a.card_index, a.pile_index))
            .collect()
    }

    /// Current observation as a flat `float32` feature vector.
    fn encode<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f32>> {
        let encoded = self.encoder.encode(&self.env.observe());
        PyArray1::from_vec_bound(py, encoded.tensor)
    }

    #[getter]
    fn feature_count(&self) -> usize {
        self.encoder.feature_count()
    }

    #[getter]
    fn action_space_size(&self) -> usize {
        self.env.config().action_space_size()
    }

    #[getter]
    fn done(&self) -> bool {
        self.env.is_done()
    }

    /// "in_progress", "won" or "lost".
    #[getter]
    fn outcome(&self) -> &'static str {
        match self.env.state().outcome() {
            Outcome::InProgress => "in_progress",
            Outcome::Won => "won",
            Outcome::Lost => "lost",
        }
    }

    fn __repr__(&self) -> String {
        let state = self.env.state();
        format!(
            "TheGameEnv(players={}, deck={}, turn={}, outcome={})",
            state.player_count(),
            state.deck_size(),
            state.turn_number(),
            self.outcome()
        )
    }
}

/// Python wrapper for the difficulty controller.
#[pyclass(name = "DifficultyController")]
pub struct PyDifficultyController(pub DifficultyController);

#[pymethods]
impl PyDifficultyController {
    #[new]
    #[pyo3(signature = (wins_per_step = 10, step = 0.1, max_removable = 80, initial = 0.0))]
    fn new(wins_per_step: u32, step: f64, max_removable: usize, initial: f64) -> PyResult<Self> {
        let config = DifficultyConfig {
            wins_per_step,
            step,
            max_removable,
            initial,
        };
        DifficultyController::new(config)
            .map(Self)
            .map_err(to_py_err)
    }

    /// Record a finished episode. Returns True if difficulty went up.
    fn observe(&mut self, won: bool) -> bool {
        let outcome = if won { Outcome::Won } else { Outcome::Lost };
        self.0.observe(outcome)
    }

    fn reset(&mut self) {
        self.0.reset();
    }

    #[getter]
    fn difficulty(&self) -> f64 {
        self.0.difficulty()
    }

    #[getter]
    fn wins(&self) -> u32 {
        self.0.wins()
    }

    fn __repr__(&self) -> String {
        format!(
            "DifficultyController(difficulty={:.2}, wins={})",
            self.0.difficulty(),
            self.0.wins()
        )
    }
}
