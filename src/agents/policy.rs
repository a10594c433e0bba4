//! Baseline decision policies.
//!
//! Policies see only the [`Observation`]; they never touch engine state.
//! They are baselines and opponents for tests, the CLI and training
//! harnesses, not learners.

use crate::core::{Card, GameRng, PlayAction, REVERSE_STEP};
use crate::env::Observation;

/// Chooses the next action for the active player.
pub trait Policy: Send + Sync {
    fn name(&self) -> &str;

    /// Pick an action. Returning an illegal action is allowed; the engine
    /// scores it as invalid.
    fn choose(&self, observation: &Observation, rng: &mut GameRng) -> PlayAction;
}

// =============================================================================
// Random
// =============================================================================

/// Uniform over legal actions; `(0, 0)` when there are none.
#[derive(Clone, Debug, Default)]
pub struct RandomPolicy;

impl Policy for RandomPolicy {
    fn name(&self) -> &str {
        "random"
    }

    fn choose(&self, observation: &Observation, rng: &mut GameRng) -> PlayAction {
        let legal = observation.legal_actions();
        rng.choose(&legal)
            .copied()
            .unwrap_or(PlayAction::new(0, 0))
    }
}

// =============================================================================
// Greedy
// =============================================================================

/// Score of a reverse-ten play; lower than any gap.
const REVERSE_SCORE: i16 = -10;

/// Plays the card that moves a pile the least.
///
/// Every legal `(card, pile)` pair is scored by its gap, except reverse-ten
/// plays which score [`REVERSE_SCORE`]. The lowest score wins; ties go to
/// the first pair in enumeration order.
#[derive(Clone, Debug, Default)]
pub struct GreedyPolicy;

impl GreedyPolicy {
    /// Score of playing `card` on a pile at `value`.
    #[must_use]
    pub fn score(card: Card, value: u8, ascending: bool) -> i16 {
        let (card, value) = (i16::from(card.value()), i16::from(value));
        let step = i16::from(REVERSE_STEP);
        let reverse = if ascending {
            card == value - step
        } else {
            card == value + step
        };
        if reverse {
            REVERSE_SCORE
        } else {
            (card - value).abs()
        }
    }
}

impl Policy for GreedyPolicy {
    fn name(&self) -> &str {
        "greedy"
    }

    fn choose(&self, observation: &Observation, _rng: &mut GameRng) -> PlayAction {
        let cards: Vec<Card> = observation.hand_cards().collect();

        observation
            .legal_actions()
            .into_iter()
            .filter_map(|action| {
                let card = *cards.get(action.card_index)?;
                let value = observation.pile_values[action.pile_index];
                let ascending = observation.pile_directions[action.pile_index] == 1;
                Some((Self::score(card, value, ascending), action))
            })
            .min_by_key(|&(score, _)| score)
            .map_or(PlayAction::new(0, 0), |(_, action)| action)
    }
}
