//! Win Streaks
//!
//! A win extends the streak, a loss resets it, a tie is transparent.

use serde::{Serialize, Deserialize};

use super::moves::Outcome;

/// Streak after one more turn.
#[inline]
pub fn update(previous: u64, outcome: Outcome) -> u64 {
    match outcome {
        Outcome::Win => previous.saturating_add(1),
        Outcome::Lose => 0,
        Outcome::Tie => previous,
    }
}

/// Current and best streak, as the ledger program keeps them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakTracker {
    /// Consecutive wins so far (ties do not break it).
    pub current: u64,
    /// Highest value `current` has ever reached.
    pub highest: u64,
}

impl StreakTracker {
    /// Start from persisted values.
    pub fn new(current: u64, highest: u64) -> Self {
        Self { current, highest: highest.max(current) }
    }

    /// Apply one outcome and return the new current streak.
    pub fn record(&mut self, outcome: Outcome) -> u64 {
        self.current = update(self.current, outcome);
        self.highest = self.highest.max(self.current);
        self.current
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn any_outcome() -> impl Strategy<Value = Outcome> {
        prop::sample::select(Outcome::ALL.to_vec())
    }

    #[test]
    fn test_update_rules() {
        assert_eq!(update(4, Outcome::Win), 5);
        assert_eq!(update(4, Outcome::Lose), 0);
        assert_eq!(update(4, Outcome::Tie), 4);
    }

    #[test]
    fn test_example_sequence() {
        use Outcome::*;
        let mut tracker = StreakTracker::default();
        let streaks: Vec<u64> = [Win, Win, Tie, Win, Lose, Win]
            .into_iter()
            .map(|o| tracker.record(o))
            .collect();

        assert_eq!(streaks, vec![1, 2, 2, 3, 0, 1]);
        assert_eq!(tracker.highest, 3);
    }

    #[test]
    fn test_new_clamps_highest() {
        let tracker = StreakTracker::new(7, 2);
        assert_eq!(tracker.highest, 7);
    }

    proptest! {
        #[test]
        fn prop_streak_is_trailing_win_run(
            outcomes in prop::collection::vec(any_outcome(), 0..64)
        ) {
            let mut tracker = StreakTracker::default();
            for o in &outcomes {
                tracker.record(*o);
            }

            // Ties are transparent: count wins back to the last loss.
            let expected = outcomes
                .iter()
                .rev()
                .take_while(|o| **o != Outcome::Lose)
                .filter(|o| **o == Outcome::Win)
                .count() as u64;
            prop_assert_eq!(tracker.current, expected);
        }

        #[test]
        fn prop_highest_monotonic(outcomes in prop::collection::vec(any_outcome(), 0..64)) {
            let mut tracker = StreakTracker::default();
            let mut last_highest = 0;
            for o in outcomes {
                tracker.record(o);
                prop_assert!(tracker.highest >= last_highest);
                prop_assert!(tracker.highest >= tracker.current);
                last_highest = tracker.highest;
            }
        }
    }
}
