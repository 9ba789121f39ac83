//! Moves and Outcomes
//!
//! The fixed cyclic dominance relation of rock-paper-scissors.

use std::fmt;

use serde::{Serialize, Deserialize};
use thiserror::Error;

/// A move, encoded on the wire as 1..=3.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Move {
    /// Beats scissors.
    Rock = 1,
    /// Beats rock.
    Paper = 2,
    /// Beats paper.
    Scissors = 3,
}

/// Result of a turn, relative to the submitting player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Player beat the machine.
    Win,
    /// Machine beat the player.
    Lose,
    /// Same move on both sides.
    Tie,
}

/// Rejected move input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    /// Integer outside 1..=3.
    #[error("move {0} is out of range, expected 1, 2 or 3")]
    OutOfRange(i64),
    /// Input that is not an integer.
    #[error("'{0}' is not a move, expected 1, 2 or 3")]
    NotANumber(String),
}

/// Outcome indexed by `(player - machine) mod 3`.
const OUTCOME_BY_DISTANCE: [Outcome; 3] = [Outcome::Tie, Outcome::Win, Outcome::Lose];

impl Move {
    /// All moves in wire order.
    pub const ALL: [Move; 3] = [Move::Rock, Move::Paper, Move::Scissors];

    /// Wire encoding (1..=3).
    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Decode a wire value, rejecting anything outside 1..=3.
    pub fn from_code(code: i64) -> Result<Move, MoveError> {
        match code {
            1 => Ok(Move::Rock),
            2 => Ok(Move::Paper),
            3 => Ok(Move::Scissors),
            other => Err(MoveError::OutOfRange(other)),
        }
    }

    /// Parse a move typed by the player.
    pub fn parse_input(input: &str) -> Result<Move, MoveError> {
        let trimmed = input.trim();
        let code: i64 = trimmed
            .parse()
            .map_err(|_| MoveError::NotANumber(trimmed.to_string()))?;
        Move::from_code(code)
    }

    /// Map any raw entropy value onto a move. Never out of range.
    #[inline]
    pub fn from_entropy(raw: u64) -> Move {
        Move::ALL[(raw % 3) as usize]
    }

    /// Name as printed in program logs.
    pub fn name(self) -> &'static str {
        match self {
            Move::Rock => "Rock",
            Move::Paper => "Paper",
            Move::Scissors => "Scissors",
        }
    }

    /// Inverse of [`Move::name`].
    pub fn from_name(name: &str) -> Option<Move> {
        Move::ALL.into_iter().find(|m| m.name() == name)
    }
}

impl TryFrom<u8> for Move {
    type Error = MoveError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Move::from_code(value as i64)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Outcome {
    /// All outcomes.
    pub const ALL: [Outcome; 3] = [Outcome::Win, Outcome::Lose, Outcome::Tie];

    /// Name as printed in program logs.
    pub fn name(self) -> &'static str {
        match self {
            Outcome::Win => "Win",
            Outcome::Lose => "Lose",
            Outcome::Tie => "Tie",
        }
    }

    /// Inverse of [`Outcome::name`].
    pub fn from_name(name: &str) -> Option<Outcome> {
        Outcome::ALL.into_iter().find(|o| o.name() == name)
    }

    /// Same turn seen from the other side.
    pub fn reversed(self) -> Outcome {
        match self {
            Outcome::Win => Outcome::Lose,
            Outcome::Lose => Outcome::Win,
            Outcome::Tie => Outcome::Tie,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolve a turn from the player's point of view.
#[inline]
pub fn resolve(player: Move, machine: Move) -> Outcome {
    let distance = (3 + player.as_u8() - machine.as_u8()) % 3;
    OUTCOME_BY_DISTANCE[distance as usize]
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn any_move() -> impl Strategy<Value = Move> {
        prop::sample::select(Move::ALL.to_vec())
    }

    #[test]
    fn test_dominance_table() {
        assert_eq!(resolve(Move::Rock, Move::Scissors), Outcome::Win);
        assert_eq!(resolve(Move::Paper, Move::Rock), Outcome::Win);
        assert_eq!(resolve(Move::Scissors, Move::Paper), Outcome::Win);

        assert_eq!(resolve(Move::Scissors, Move::Rock), Outcome::Lose);
        assert_eq!(resolve(Move::Rock, Move::Paper), Outcome::Lose);
        assert_eq!(resolve(Move::Paper, Move::Scissors), Outcome::Lose);
    }

    #[test]
    fn test_parse_input() {
        assert_eq!(Move::parse_input(" 2 \n"), Ok(Move::Paper));
        assert_eq!(Move::parse_input("0"), Err(MoveError::OutOfRange(0)));
        assert_eq!(Move::parse_input("4"), Err(MoveError::OutOfRange(4)));
        assert_eq!(Move::parse_input("-1"), Err(MoveError::OutOfRange(-1)));
        assert!(matches!(Move::parse_input("rock"), Err(MoveError::NotANumber(_))));
        assert!(matches!(Move::parse_input(""), Err(MoveError::NotANumber(_))));
    }

    #[test]
    fn test_names_round_trip_for_log_parsing() {
        for m in Move::ALL {
            assert_eq!(Move::from_name(m.name()), Some(m));
        }
        for o in Outcome::ALL {
            assert_eq!(Outcome::from_name(o.name()), Some(o));
        }
        assert_eq!(Move::from_name("Lizard"), None);
        assert_eq!(Outcome::from_name("win"), None);
    }

    #[test]
    fn test_try_from_u8() {
        assert_eq!(Move::try_from(3u8), Ok(Move::Scissors));
        assert_eq!(Move::try_from(0u8), Err(MoveError::OutOfRange(0)));
    }

    proptest! {
        #[test]
        fn prop_tie_iff_equal(a in any_move(), b in any_move()) {
            prop_assert_eq!(resolve(a, b) == Outcome::Tie, a == b);
        }

        #[test]
        fn prop_antisymmetric(a in any_move(), b in any_move()) {
            prop_assert_eq!(resolve(a, b), resolve(b, a).reversed());
        }

        #[test]
        fn prop_entropy_always_in_range(raw in any::<u64>()) {
            let code = Move::from_entropy(raw).as_u8();
            prop_assert!((1..=3).contains(&code));
        }
    }
}
