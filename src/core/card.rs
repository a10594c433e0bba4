//! Card values and discard piles.
//!
//! ## Legality
//!
//! A card may be played on a pile when it moves the pile in its direction,
//! or when it lands exactly [`REVERSE_STEP`] against it:
//!
//! | Direction  | Legal when                                |
//! |------------|-------------------------------------------|
//! | Ascending  | `card > value` or `card == value - 10`    |
//! | Descending | `card < value` or `card == value + 10`    |
//!
//! Legality depends only on the card and the pile's direction and value.

use serde::{Deserialize, Serialize};

/// Distance of the backwards "reverse-ten" play.
pub const REVERSE_STEP: u8 = 10;

/// A physical card, identified by its face value.
///
/// Every value appears exactly once in a game, so two equal `Card`s
/// always refer to the same physical card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Card(pub u8);

impl Card {
    /// Create a card with the given face value.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Get the face value.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Direction a pile is built in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Values must go up (starts at the low sentinel).
    Ascending,
    /// Values must go down (starts at the high sentinel).
    Descending,
}

impl Direction {
    /// Observation flag: 1 for ascending, 0 for descending.
    #[must_use]
    pub const fn flag(self) -> u8 {
        match self {
            Direction::Ascending => 1,
            Direction::Descending => 0,
        }
    }

    /// Arrow used when rendering piles.
    #[must_use]
    pub const fn arrow(self) -> &'static str {
        match self {
            Direction::Ascending => "↑",
            Direction::Descending => "↓",
        }
    }
}

/// A discard pile. Only the top value is tracked; played cards are gone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pile {
    pub direction: Direction,
    pub value: u8,
}

impl Pile {
    /// Create an ascending pile with the given top value.
    #[must_use]
    pub const fn ascending(value: u8) -> Self {
        Self {
            direction: Direction::Ascending,
            value,
        }
    }

    /// Create a descending pile with the given top value.
    #[must_use]
    pub const fn descending(value: u8) -> Self {
        Self {
            direction: Direction::Descending,
            value,
        }
    }

    /// Whether `card` may be played here. See [`is_legal`].
    #[must_use]
    pub fn accepts(&self, card: Card) -> bool {
        is_legal(card, self)
    }

    /// Whether playing `card` here uses the reverse-ten exception.
    #[must_use]
    pub fn is_reverse_play(&self, card: Card) -> bool {
        let (c, v, step) = (i16::from(card.0), i16::from(self.value), i16::from(REVERSE_STEP));
        match self.direction {
            Direction::Ascending => c == v - step,
            Direction::Descending => c == v + step,
        }
    }

    /// Absolute distance between `card` and the current top value.
    #[must_use]
    pub fn gap(&self, card: Card) -> u8 {
        card.0.abs_diff(self.value)
    }

    /// Put `card` on top of the pile.
    ///
    /// The caller must have checked [`Pile::accepts`]; this never fails.
    pub fn apply(&mut self, card: Card) {
        self.value = card.0;
    }
}

impl std::fmt::Display for Pile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:>3} {}", self.value, self.direction.arrow())
    }
}

/// Legality predicate for playing `card` on `pile`.
#[must_use]
pub fn is_legal(card: Card, pile: &Pile) -> bool {
    let (c, v, step) = (i16::from(card.0), i16::from(pile.value), i16::from(REVERSE_STEP));
    match pile.direction {
        Direction::Ascending => c > v || c == v - step,
        Direction::Descending => c < v || c == v + step,
    }
}
