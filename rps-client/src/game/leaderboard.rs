//! Leaderboards
//!
//! Ranks every persisted player record by wins, win rate and best streak.
//! All sorts are stable: ties keep the order the accounts were scanned in.

use std::cmp::Ordering;

use solana_program::pubkey::Pubkey;

use super::records::{AccountKind, PlayerRecord};

/// Entries per board.
pub const LEADERBOARD_SIZE: usize = 5;

/// Games needed before a player is ranked by win rate.
pub const MIN_GAMES_FOR_WIN_RATE: u64 = 5;

/// The three boards plus scan counters.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Leaderboard {
    /// Most games won.
    pub top_by_wins: Vec<PlayerRecord>,
    /// Best win rate among players with enough games.
    pub top_by_win_rate: Vec<PlayerRecord>,
    /// Best streak ever reached.
    pub top_by_highest_streak: Vec<PlayerRecord>,
    /// Records with at least one game.
    pub active_players: usize,
    /// Accounts that matched no known record shape.
    pub unknown_accounts: usize,
}

impl Leaderboard {
    /// True when nobody has played yet.
    pub fn is_empty(&self) -> bool {
        self.active_players == 0
    }
}

/// Rank already-decoded player records.
pub fn aggregate(records: &[PlayerRecord]) -> Leaderboard {
    let active: Vec<&PlayerRecord> = records.iter().filter(|r| r.games_played > 0).collect();

    let top_by_wins = top_n(active.clone(), |a, b| b.games_won.cmp(&a.games_won));

    let rated: Vec<&PlayerRecord> = active
        .iter()
        .copied()
        .filter(|r| r.games_played >= MIN_GAMES_FOR_WIN_RATE)
        .collect();
    let top_by_win_rate = top_n(rated, |a, b| {
        b.win_rate()
            .partial_cmp(&a.win_rate())
            .unwrap_or(Ordering::Equal)
    });

    let top_by_highest_streak =
        top_n(active.clone(), |a, b| b.highest_streak.cmp(&a.highest_streak));

    Leaderboard {
        top_by_wins,
        top_by_win_rate,
        top_by_highest_streak,
        active_players: active.len(),
        unknown_accounts: 0,
    }
}

/// Decode raw program accounts and rank the player records among them.
///
/// Global state accounts are skipped; anything undecodable is counted as
/// unknown and otherwise ignored.
pub fn aggregate_accounts(accounts: &[(Pubkey, Vec<u8>)]) -> Leaderboard {
    let mut unknown = 0;
    let mut records = Vec::new();

    for (_, data) in accounts {
        match AccountKind::decode(data) {
            AccountKind::PlayerStats(record) => records.push(record),
            AccountKind::GameState(_) => {}
            AccountKind::Unknown => unknown += 1,
        }
    }

    Leaderboard {
        unknown_accounts: unknown,
        ..aggregate(&records)
    }
}

fn top_n<F>(mut records: Vec<&PlayerRecord>, compare: F) -> Vec<PlayerRecord>
where
    F: Fn(&PlayerRecord, &PlayerRecord) -> Ordering,
{
    // `sort_by` is stable
    records.sort_by(|a, b| compare(a, b));
    records.into_iter().take(LEADERBOARD_SIZE).cloned().collect()
}

// =============================================================================
// TESTS
// =============================================================================
