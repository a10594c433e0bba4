//! Seats around the table.
//!
//! Turn order is seat order and wraps. Seat counts are checked by
//! `GameConfig::validate` (1-255) before any state is built.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::ops::{Index, IndexMut};

/// Seat index, 0-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    #[must_use]
    pub const fn new(seat: u8) -> Self {
        Self(seat)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The other seats in the order they move after this one, ending with
    /// this seat.
    ///
    /// ```
    /// use the_game::core::PlayerId;
    ///
    /// let order: Vec<_> = PlayerId::new(2).seats_after(4).collect();
    /// assert_eq!(order, vec![PlayerId(3), PlayerId(0), PlayerId(1), PlayerId(2)]);
    /// ```
    pub fn seats_after(self, seats: usize) -> impl Iterator<Item = PlayerId> {
        let here = self.index();
        (here + 1..=here + seats).map(move |n| PlayerId((n % seats) as u8))
    }

    pub fn all(seats: usize) -> impl Iterator<Item = PlayerId> {
        (0..seats).map(|n| PlayerId(n as u8))
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seat {}", self.0)
    }
}

/// One `T` per seat, stored inline for typical tables.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    seats: SmallVec<[T; 6]>,
}

impl<T> PlayerMap<T> {
    pub fn new(seats: usize, mut init: impl FnMut(PlayerId) -> T) -> Self {
        Self {
            seats: PlayerId::all(seats).map(&mut init).collect(),
        }
    }

    pub fn with_default(seats: usize) -> Self
    where
        T: Default,
    {
        Self::new(seats, |_| T::default())
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.seats.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        PlayerId::all(self.seats.len()).zip(self.seats.iter())
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.seats.iter()
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &T {
        &self.seats[player.index()]
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.seats[player.index()]
    }
}
