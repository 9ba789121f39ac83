//! Game logic.
//!
//! Move resolution, result reconciliation, streaks, record shapes and
//! leaderboards. Nothing here talks to the ledger; the reconciler only
//! reads its fallback entropy source and logs when it has to use it.

pub mod leaderboard;
pub mod moves;
pub mod reconcile;
pub mod records;
pub mod streak;

pub use leaderboard::{aggregate, aggregate_accounts, Leaderboard};
pub use moves::{resolve, Move, MoveError, Outcome};
pub use reconcile::{
    reconcile, EntropySource, ResultSource, SubmissionReceipt, TurnResult, WallClock,
};
pub use records::{AccountKind, GlobalState, LedgerRecord, NameError, PlayerName, PlayerRecord};
pub use streak::StreakTracker;
