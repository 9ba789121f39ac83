//! Result Reconciliation
//!
//! After a move is committed, the program's log lines are the authoritative
//! record of the machine's move and the outcome. When they are missing or
//! unreadable the turn is recomputed locally from a declared entropy source,
//! flagged as a fallback. A committed turn is never dropped.

use chrono::Utc;
use tracing::{debug, warn};

use super::moves::{resolve, Move, Outcome};
use super::records::PlayerRecord;

/// Log marker announcing the machine's move.
pub const MACHINE_PLAYED_MARKER: &str = "Machine played: ";

/// Log marker announcing the outcome.
pub const RESULT_MARKER: &str = "Result: ";

/// What the ledger handed back for a committed move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmissionReceipt {
    /// Transaction signature.
    pub signature: String,
    /// Program log lines, if the transaction could be looked up.
    pub logs: Option<Vec<String>>,
}

/// Where a turn's machine move and outcome came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResultSource {
    /// Parsed from the program logs.
    Ledger,
    /// Recomputed by the client.
    LocalFallback,
}

/// One reconciled turn. Never persisted by the client.
#[derive(Clone, Debug, PartialEq)]
pub struct TurnResult {
    /// Move the player submitted.
    pub player_move: Move,
    /// Move the machine played.
    pub machine_move: Move,
    /// Outcome for the player.
    pub outcome: Outcome,
    /// Origin of `machine_move` and `outcome`.
    pub source: ResultSource,
    /// Transaction signature.
    pub signature: String,
    /// Player record read back after the turn.
    pub record: Option<PlayerRecord>,
}

impl TurnResult {
    /// Attach the record read back after the turn.
    pub fn with_record(mut self, record: Option<PlayerRecord>) -> Self {
        self.record = record;
        self
    }

    /// True when the outcome was not read from the ledger.
    pub fn is_fallback(&self) -> bool {
        self.source == ResultSource::LocalFallback
    }
}

/// Randomness used only by the fallback path.
pub trait EntropySource {
    /// Draw a raw value. Any range is acceptable.
    fn sample(&self) -> u64;
}

/// Wall-clock seconds, the coarse source the program itself uses.
#[derive(Clone, Copy, Debug, Default)]
pub struct WallClock;

impl EntropySource for WallClock {
    fn sample(&self) -> u64 {
        Utc::now().timestamp().max(0) as u64
    }
}

impl<F: Fn() -> u64> EntropySource for F {
    fn sample(&self) -> u64 {
        self()
    }
}

/// Extract the machine move and outcome from program logs.
///
/// Both must be present and valid. The last occurrence of each marker wins.
pub fn parse_result_logs(logs: &[String]) -> Option<(Move, Outcome)> {
    let mut machine_move = None;
    let mut outcome = None;

    for line in logs {
        if let Some(value) = value_after(line, MACHINE_PLAYED_MARKER) {
            if let Some(m) = Move::from_name(value) {
                machine_move = Some(m);
            }
        } else if let Some(value) = value_after(line, RESULT_MARKER) {
            if let Some(o) = Outcome::from_name(value) {
                outcome = Some(o);
            }
        }
    }

    Some((machine_move?, outcome?))
}

fn value_after<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    line.find(marker).map(|idx| line[idx + marker.len()..].trim())
}

/// Reconcile a committed move against its receipt.
pub fn reconcile<E: EntropySource + ?Sized>(
    player_move: Move,
    receipt: &SubmissionReceipt,
    entropy: &E,
) -> TurnResult {
    let parsed = receipt.logs.as_deref().and_then(parse_result_logs);

    let (machine_move, outcome, source) = match parsed {
        Some((machine_move, outcome)) => {
            debug!(
                "Result for {} read from logs: {} / {}",
                receipt.signature, machine_move, outcome
            );
            (machine_move, outcome, ResultSource::Ledger)
        }
        None => {
            warn!(
                "Reconciliation fell back to local computation for {} (logs {})",
                receipt.signature,
                if receipt.logs.is_some() { "unparseable" } else { "missing" },
            );
            let machine_move = Move::from_entropy(entropy.sample());
            (machine_move, resolve(player_move, machine_move), ResultSource::LocalFallback)
        }
    };

    TurnResult {
        player_move,
        machine_move,
        outcome,
        source,
        signature: receipt.signature.clone(),
        record: None,
    }
}

// =============================================================================
// TESTS
// =============================================================================
