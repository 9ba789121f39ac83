//! Persisted Records
//!
//! Record shapes owned by the ledger program. Every account starts with an
//! 8-byte discriminator (`sha256("account:<Type>")[..8]`) followed by the
//! Borsh-encoded fields. Accounts may carry trailing padding.

use std::fmt;

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;
use thiserror::Error;

use crate::core::hash::{account_discriminator, Discriminator};
use super::streak::StreakTracker;

/// Fixed width of a display name on the ledger.
pub const NAME_LEN: usize = 8;

/// Record decoding errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// Shorter than a discriminator.
    #[error("account data too short ({0} bytes)")]
    TooShort(usize),
    /// Discriminator belongs to another record type.
    #[error("discriminator does not match {0}")]
    WrongType(&'static str),
    /// Fields failed to decode.
    #[error("malformed {0}: {1}")]
    Malformed(&'static str, String),
}

/// Display name validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    /// Nothing left after trimming.
    #[error("name is empty")]
    Empty,
    /// More than [`NAME_LEN`] characters.
    #[error("name has {0} characters, at most 8 allowed")]
    TooLong(usize),
    /// Outside printable ASCII.
    #[error("name contains {0:?}, only printable ASCII allowed")]
    InvalidCharacter(char),
}

// =============================================================================
// PLAYER NAME
// =============================================================================

/// Null-padded ASCII display name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, BorshSerialize, BorshDeserialize)]
pub struct PlayerName([u8; NAME_LEN]);

impl PlayerName {
    /// Validate a typed name: trimmed, 1-8 printable ASCII characters.
    ///
    /// Overlong names are rejected rather than truncated.
    pub fn parse(input: &str) -> Result<Self, NameError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(NameError::Empty);
        }

        if let Some(bad) = trimmed.chars().find(|c| !(' '..='~').contains(c)) {
            return Err(NameError::InvalidCharacter(bad));
        }

        let len = trimmed.len();
        if len > NAME_LEN {
            return Err(NameError::TooLong(len));
        }

        let mut bytes = [0u8; NAME_LEN];
        bytes[..len].copy_from_slice(trimmed.as_bytes());
        Ok(Self(bytes))
    }

    /// Wrap raw ledger bytes.
    pub const fn from_bytes(bytes: [u8; NAME_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw ledger bytes.
    pub fn as_bytes(&self) -> &[u8; NAME_LEN] {
        &self.0
    }

    /// True when no name was ever set.
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let end = self.0.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
        f.write_str(&String::from_utf8_lossy(&self.0[..end]))
    }
}

// =============================================================================
// RECORD ENCODING
// =============================================================================

/// A record type stored behind an account discriminator.
pub trait LedgerRecord: BorshSerialize + BorshDeserialize {
    /// Type name hashed into the discriminator.
    const TYPE_NAME: &'static str;

    /// Discriminator prefixed to the account data.
    fn discriminator() -> Discriminator {
        account_discriminator(Self::TYPE_NAME)
    }

    /// Encode as account data.
    fn encode(&self) -> Result<Vec<u8>, RecordError> {
        let mut data = Self::discriminator().to_vec();
        self.serialize(&mut data)
            .map_err(|e| RecordError::Malformed(Self::TYPE_NAME, e.to_string()))?;
        Ok(data)
    }

    /// Decode account data, tolerating trailing bytes.
    fn decode(data: &[u8]) -> Result<Self, RecordError> {
        if data.len() < 8 {
            return Err(RecordError::TooShort(data.len()));
        }
        if data[..8] != Self::discriminator() {
            return Err(RecordError::WrongType(Self::TYPE_NAME));
        }

        let mut body = &data[8..];
        Self::deserialize(&mut body)
            .map_err(|e| RecordError::Malformed(Self::TYPE_NAME, e.to_string()))
    }
}

// =============================================================================
// GLOBAL STATE
// =============================================================================

/// Singleton game-wide counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct GlobalState {
    /// Games played by everyone.
    pub total_games: u64,
    /// Games won by any player.
    pub total_wins: u64,
    /// Distinct players that ever created a record.
    pub total_players: u64,
    /// Address bump.
    pub bump: u8,
}

impl LedgerRecord for GlobalState {
    const TYPE_NAME: &'static str = "GameState";
}

impl GlobalState {
    /// Player wins over all games, in percent.
    pub fn win_rate_percent(&self) -> f64 {
        percent(self.total_wins, self.total_games)
    }
}

// =============================================================================
// PLAYER RECORD
// =============================================================================

/// Per-player statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct PlayerRecord {
    /// Owning player identity.
    pub player: [u8; 32],
    /// Display name.
    pub name: PlayerName,
    /// Games played.
    pub games_played: u64,
    /// Games won (never above `games_played`).
    pub games_won: u64,
    /// Current win streak.
    pub current_streak: u64,
    /// Best win streak ever.
    pub highest_streak: u64,
    /// Address bump.
    pub bump: u8,
}

impl LedgerRecord for PlayerRecord {
    const TYPE_NAME: &'static str = "PlayerStats";
}

impl PlayerRecord {
    /// Fresh record as the program creates it on a first move.
    pub fn new(player: &Pubkey, name: PlayerName, bump: u8) -> Self {
        Self {
            player: player.to_bytes(),
            name,
            bump,
            ..Default::default()
        }
    }

    /// Owning player identity.
    pub fn player_key(&self) -> Pubkey {
        Pubkey::new_from_array(self.player)
    }

    /// True for records left behind with a default identity.
    pub fn has_zeroed_identity(&self) -> bool {
        self.player == [0u8; 32]
    }

    /// Win rate as a fraction in [0, 1]; zero before any game.
    pub fn win_rate(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            self.games_won as f64 / self.games_played as f64
        }
    }

    /// Win rate in percent.
    pub fn win_rate_percent(&self) -> f64 {
        percent(self.games_won, self.games_played)
    }

    /// Persisted streak counters.
    pub fn streak(&self) -> StreakTracker {
        StreakTracker::new(self.current_streak, self.highest_streak)
    }
}

fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

// =============================================================================
// TAGGED DECODE
// =============================================================================

/// Result of identifying a raw program account.
#[derive(Clone, Debug, PartialEq)]
pub enum AccountKind {
    /// Global state record.
    GameState(GlobalState),
    /// Per-player record.
    PlayerStats(PlayerRecord),
    /// Matched no known shape.
    Unknown,
}

impl AccountKind {
    /// Try each known shape in priority order, first structural match wins.
    pub fn decode(data: &[u8]) -> AccountKind {
        if let Ok(state) = GlobalState::decode(data) {
            return AccountKind::GameState(state);
        }
        if let Ok(record) = PlayerRecord::decode(data) {
            return AccountKind::PlayerStats(record);
        }
        AccountKind::Unknown
    }

    /// Short label for listings.
    pub fn label(&self) -> &'static str {
        match self {
            AccountKind::GameState(_) => "game_state",
            AccountKind::PlayerStats(_) => "player_stats",
            AccountKind::Unknown => "unknown",
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
