//! Neural network input encoding.
//!
//! The engine does not run networks itself; it hands out fixed-shape
//! tensors that an external learner (typically Python, via the `python`
//! feature) consumes.
//!
//! ```rust,ignore
//! use the_game::nn::{FlatEncoder, ObservationEncoder};
//!
//! let encoder = FlatEncoder::new(env.config());
//! let encoded = encoder.encode(&env.observe());
//! let logits = network.forward(&encoded.tensor);
//! ```

pub mod encoder;

pub use encoder::{EncodedState, FlatEncoder, ObservationEncoder};
