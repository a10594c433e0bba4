//! Seeded randomness for episodes.
//!
//! One episode seed keys a ChaCha8 generator. Consumers never share a
//! stream: the deck shuffle and policy sampling each select their own
//! ChaCha stream by name, so a policy that samples more or less often can't
//! change which deck gets dealt.
//!
//! ```
//! use the_game::core::GameRng;
//!
//! let mut deck = GameRng::new(42).for_context("deck");
//! let mut again = GameRng::new(42).for_context("deck");
//! assert_eq!(deck.below(98), again.below(98));
//! ```

use std::hash::Hasher;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHasher;

/// ChaCha8 keyed by the episode seed, positioned on a named stream.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    stream: u64,
}

impl GameRng {
    /// Root stream for `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::on_stream(seed, 0)
    }

    fn on_stream(seed: u64, stream: u64) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(seed);
        inner.set_stream(stream);
        Self {
            inner,
            seed,
            stream,
        }
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub fn stream(&self) -> u64 {
        self.stream
    }

    /// Fresh generator on the stream named `context`, starting from its
    /// first output whatever this generator has already produced.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        // FxHasher has no per-process keys, so stream ids survive restarts.
        let mut hasher = FxHasher::default();
        hasher.write_u64(self.stream);
        hasher.write(context.as_bytes());
        Self::on_stream(self.seed, hasher.finish())
    }

    /// Uniform value in `0..bound`. `bound` must be non-zero.
    pub fn below(&mut self, bound: usize) -> usize {
        self.inner.gen_range(0..bound)
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.inner);
    }

    /// Uniform pick, `None` on an empty slice.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.inner)
    }
}
