//! Ledger Collaborator
//!
//! The contract the client needs from the ledger program. The program is
//! authoritative for every record; the client only submits instructions,
//! reads records back, and looks up transaction logs.

pub mod simulated;

use solana_program::pubkey::Pubkey;
use thiserror::Error;
use tracing::{debug, warn};

use crate::game::moves::Move;
use crate::game::reconcile::SubmissionReceipt;
use crate::game::records::{GlobalState, PlayerName, PlayerRecord, RecordError};

pub use simulated::SimulatedLedger;

/// Errors raised by the ledger program itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgramFailure {
    /// Move code outside 1..=3.
    #[error("invalid move {0}, expected 1-3")]
    InvalidMove(u8),
    /// `initialize` has not run yet.
    #[error("global state is not initialized")]
    NotInitialized,
    /// Account to create exists already.
    #[error("account {0} already in use")]
    AlreadyInUse(Pubkey),
}

/// Ledger errors.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// No account at this address. Expected for new players.
    #[error("account {0} not found")]
    NotFound(Pubkey),

    /// The program rejected the transaction.
    #[error("transaction rejected: {0}")]
    Rejected(#[from] ProgramFailure),

    /// Account exists but does not have the expected shape.
    #[error("account {0} has unexpected data: {1}")]
    Mismatch(Pubkey, RecordError),

    /// Ledger storage could not be read or written.
    #[error("ledger storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Ledger snapshot is not valid JSON.
    #[error("ledger snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// Ledger snapshot parsed but holds invalid values.
    #[error("ledger snapshot corrupt: {0}")]
    Corrupt(String),
}

impl LedgerError {
    /// True for the recoverable "no such record" condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, LedgerError::NotFound(_))
    }
}

/// Receipt of an account close.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CloseReceipt {
    /// Transaction signature.
    pub signature: String,
    /// Reservation returned to the player (lamports).
    pub reclaimed_lamports: u64,
}

/// Operations the client needs from the ledger program.
///
/// Bound to one player identity, like a wallet-backed provider.
#[allow(async_fn_in_trait)]
pub trait Ledger {
    /// The program that owns every record.
    fn program_id(&self) -> Pubkey;

    /// The identity submitting transactions.
    fn player(&self) -> Pubkey;

    /// Create the global state record. Fails if it exists.
    async fn initialize_global_state(&self) -> Result<String, LedgerError>;

    /// Submit a move; `name` only when the player has no record yet.
    /// Returns the transaction signature.
    async fn submit_move(
        &self,
        player_move: Move,
        name: Option<PlayerName>,
    ) -> Result<String, LedgerError>;

    /// Log lines of a confirmed transaction, `None` if unknown.
    async fn transaction_logs(&self, signature: &str) -> Result<Option<Vec<String>>, LedgerError>;

    /// Read the global state record.
    async fn fetch_global_state(&self) -> Result<GlobalState, LedgerError>;

    /// Read a player record.
    async fn fetch_player_record(&self, address: &Pubkey) -> Result<PlayerRecord, LedgerError>;

    /// Close this player's record and reclaim its reservation.
    async fn close_player_record(&self) -> Result<CloseReceipt, LedgerError>;

    /// Every account owned by the program, raw.
    async fn program_accounts(&self) -> Result<Vec<(Pubkey, Vec<u8>)>, LedgerError>;

    /// True iff there is no record at `address`.
    ///
    /// A record that exists, whatever its contents, is a returning player.
    async fn is_new_player(&self, address: &Pubkey) -> Result<bool, LedgerError> {
        match self.fetch_player_record(address).await {
            Ok(_) => Ok(false),
            Err(e) if e.is_not_found() => Ok(true),
            Err(e) => Err(e),
        }
    }

    /// Fetch a player record, mapping "not found" to `None`.
    async fn find_player_record(
        &self,
        address: &Pubkey,
    ) -> Result<Option<PlayerRecord>, LedgerError> {
        match self.fetch_player_record(address).await {
            Ok(record) => Ok(Some(record)),
            Err(e) if e.is_not_found() => {
                debug!("No player record at {}", address);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Submit a move and collect whatever logs the ledger can provide.
    ///
    /// Once the move is committed a failed log lookup only degrades the
    /// receipt; it never fails the turn.
    async fn submit_and_collect(
        &self,
        player_move: Move,
        name: Option<PlayerName>,
    ) -> Result<SubmissionReceipt, LedgerError> {
        let signature = self.submit_move(player_move, name).await?;
        let logs = match self.transaction_logs(&signature).await {
            Ok(logs) => logs,
            Err(e) => {
                warn!("Could not fetch logs for {}: {}", signature, e);
                None
            }
        };
        Ok(SubmissionReceipt { signature, logs })
    }
}
