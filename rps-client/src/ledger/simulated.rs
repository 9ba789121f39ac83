//! Simulated Ledger Program
//!
//! An in-process stand-in for the on-chain program. It applies the same
//! instructions with the same record layout and log lines, so the client
//! can be played and tested without a cluster. State can be persisted to a
//! JSON snapshot so separate invocations share one ledger.

use std::collections::{BTreeMap, VecDeque};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use serde::{Serialize, Deserialize};
use solana_program::pubkey::Pubkey;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::core::address::{global_state_address, player_record_address};
use crate::core::hash::{instruction_discriminator, DomainHasher};
use crate::core::rng::DeterministicRng;
use crate::game::moves::{resolve, Move, Outcome};
use crate::game::reconcile::{MACHINE_PLAYED_MARKER, RESULT_MARKER};
use crate::game::records::{GlobalState, LedgerRecord, PlayerName, PlayerRecord};
use super::{CloseReceipt, Ledger, LedgerError, ProgramFailure};

/// Transactions whose logs stay queryable.
pub const DEFAULT_HISTORY_LIMIT: usize = 256;

/// Per-account storage overhead counted by the rent calculation.
const ACCOUNT_STORAGE_OVERHEAD: u64 = 128;

/// Default lamports per byte-year.
const LAMPORTS_PER_BYTE_YEAR: u64 = 3480;

/// Years of rent an account must hold to be exempt.
const EXEMPTION_THRESHOLD_YEARS: u64 = 2;

/// Minimum balance for a rent-exempt account of `data_len` bytes.
pub fn rent_exempt_minimum(data_len: usize) -> u64 {
    (ACCOUNT_STORAGE_OVERHEAD + data_len as u64)
        * LAMPORTS_PER_BYTE_YEAR
        * EXEMPTION_THRESHOLD_YEARS
}

/// A confirmed transaction and its logs.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct TransactionRecord {
    signature: String,
    slot: u64,
    logs: Vec<String>,
}

/// On-disk form of the ledger.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    slot: u64,
    /// Base58 address -> hex account data.
    accounts: BTreeMap<String, String>,
    transactions: Vec<TransactionRecord>,
}

/// Mutable ledger contents.
#[derive(Clone, Debug, Default)]
struct LedgerState {
    slot: u64,
    accounts: BTreeMap<Pubkey, Vec<u8>>,
    transactions: VecDeque<TransactionRecord>,
    machine_script: VecDeque<Move>,
}

impl LedgerState {
    fn from_snapshot(snapshot: Snapshot) -> Result<Self, LedgerError> {
        let mut accounts = BTreeMap::new();
        for (address, data) in snapshot.accounts {
            let key = Pubkey::from_str(&address)
                .map_err(|e| LedgerError::Corrupt(format!("address {}: {}", address, e)))?;
            let bytes = hex::decode(&data)
                .map_err(|e| LedgerError::Corrupt(format!("data of {}: {}", address, e)))?;
            accounts.insert(key, bytes);
        }

        Ok(Self {
            slot: snapshot.slot,
            accounts,
            transactions: snapshot.transactions.into(),
            machine_script: VecDeque::new(),
        })
    }

    fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            slot: self.slot,
            accounts: self.accounts
                .iter()
                .map(|(k, v)| (k.to_string(), hex::encode(v)))
                .collect(),
            transactions: self.transactions.iter().cloned().collect(),
        }
    }

    fn read<T: LedgerRecord>(&self, address: &Pubkey) -> Result<T, LedgerError> {
        let data = self.accounts.get(address).ok_or(LedgerError::NotFound(*address))?;
        T::decode(data).map_err(|e| LedgerError::Mismatch(*address, e))
    }

    fn write<T: LedgerRecord>(&mut self, address: Pubkey, record: &T) -> Result<(), LedgerError> {
        let data = record.encode().map_err(|e| LedgerError::Mismatch(address, e))?;
        self.accounts.insert(address, data);
        Ok(())
    }

    /// Confirm a transaction in a new slot and return its signature.
    fn confirm(
        &mut self,
        program_id: &Pubkey,
        payer: &Pubkey,
        instruction: &[u8],
        messages: Vec<String>,
        history_limit: usize,
    ) -> String {
        self.slot += 1;

        let mut hasher = DomainHasher::for_signature();
        hasher.update_u64(self.slot);
        hasher.update_bytes(payer.as_ref());
        hasher.update_bytes(instruction);
        let signature = hex::encode(hasher.finalize());

        let mut logs = vec![format!("Program {} invoke [1]", program_id)];
        logs.extend(messages.into_iter().map(|m| format!("Program log: {}", m)));
        logs.push(format!("Program {} success", program_id));

        self.transactions.push_back(TransactionRecord {
            signature: signature.clone(),
            slot: self.slot,
            logs,
        });
        while self.transactions.len() > history_limit {
            self.transactions.pop_front();
        }

        signature
    }

    fn initialize(
        &mut self,
        program_id: &Pubkey,
        payer: &Pubkey,
        history_limit: usize,
    ) -> Result<String, LedgerError> {
        let global = global_state_address(program_id);
        if self.accounts.contains_key(&global.address) {
            return Err(ProgramFailure::AlreadyInUse(global.address).into());
        }

        let state = GlobalState { bump: global.bump, ..Default::default() };
        self.write(global.address, &state)?;

        let instruction = instruction_discriminator("initialize_game");
        Ok(self.confirm(
            program_id,
            payer,
            &instruction,
            vec!["Instruction: InitializeGame".into(), "Game initialized".into()],
            history_limit,
        ))
    }

    fn play(
        &mut self,
        program_id: &Pubkey,
        payer: &Pubkey,
        code: u8,
        name: Option<PlayerName>,
        history_limit: usize,
    ) -> Result<String, LedgerError> {
        let player_move = Move::try_from(code).map_err(|_| ProgramFailure::InvalidMove(code))?;

        let global_address = global_state_address(program_id);
        let mut global: GlobalState = match self.read(&global_address.address) {
            Ok(state) => state,
            Err(e) if e.is_not_found() => return Err(ProgramFailure::NotInitialized.into()),
            Err(e) => return Err(e),
        };

        let record_address = player_record_address(payer, program_id);
        let mut record = match self.read::<PlayerRecord>(&record_address.address) {
            Ok(record) => record,
            Err(e) if e.is_not_found() => {
                global.total_players += 1;
                PlayerRecord::new(payer, name.unwrap_or_default(), record_address.bump)
            }
            Err(e) => return Err(e),
        };

        let machine_move = match self.machine_script.pop_front() {
            Some(m) => m,
            None => {
                let mut rng = DeterministicRng::for_machine_move(
                    self.slot,
                    &payer.to_bytes(),
                    &program_id.to_bytes(),
                );
                let code = rng.next_int_range(1, 3) as u8;
                Move::try_from(code).map_err(|_| ProgramFailure::InvalidMove(code))?
            }
        };
        let outcome = resolve(player_move, machine_move);

        let mut streak = record.streak();
        streak.record(outcome);
        record.games_played += 1;
        record.current_streak = streak.current;
        record.highest_streak = streak.highest;
        global.total_games += 1;
        if outcome == Outcome::Win {
            record.games_won += 1;
            global.total_wins += 1;
        }

        self.write(global_address.address, &global)?;
        self.write(record_address.address, &record)?;

        let mut instruction = instruction_discriminator("play_game").to_vec();
        instruction.push(code);
        match name {
            Some(n) => {
                instruction.push(1);
                instruction.extend_from_slice(n.as_bytes());
            }
            None => instruction.push(0),
        }

        Ok(self.confirm(
            program_id,
            payer,
            &instruction,
            vec![
                "Instruction: PlayGame".into(),
                format!("Player played: {}", player_move),
                format!("{}{}", MACHINE_PLAYED_MARKER, machine_move),
                format!("{}{}", RESULT_MARKER, outcome),
            ],
            history_limit,
        ))
    }

    fn close(
        &mut self,
        program_id: &Pubkey,
        payer: &Pubkey,
        history_limit: usize,
    ) -> Result<CloseReceipt, LedgerError> {
        let address = player_record_address(payer, program_id).address;
        // Must be a player record, not just any account
        self.read::<PlayerRecord>(&address)?;

        let data = self.accounts.remove(&address).unwrap_or_default();
        let reclaimed_lamports = rent_exempt_minimum(data.len());

        let instruction = instruction_discriminator("close_player_stats");
        let signature = self.confirm(
            program_id,
            payer,
            &instruction,
            vec!["Instruction: ClosePlayerStats".into()],
            history_limit,
        );

        Ok(CloseReceipt { signature, reclaimed_lamports })
    }
}

/// In-process ledger program bound to one player identity.
///
/// Clones made with [`SimulatedLedger::as_player`] share the same state.
#[derive(Clone, Debug)]
pub struct SimulatedLedger {
    program_id: Pubkey,
    player: Pubkey,
    state: Arc<RwLock<LedgerState>>,
    snapshot_path: Option<PathBuf>,
    history_limit: usize,
}

impl SimulatedLedger {
    /// Fresh ledger kept in memory only.
    pub fn in_memory(program_id: Pubkey, player: Pubkey) -> Self {
        Self {
            program_id,
            player,
            state: Arc::new(RwLock::new(LedgerState::default())),
            snapshot_path: None,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    /// Ledger persisted at `path`, created empty if the file is missing.
    pub async fn open(
        path: impl AsRef<Path>,
        program_id: Pubkey,
        player: Pubkey,
    ) -> Result<Self, LedgerError> {
        let path = path.as_ref().to_path_buf();
        let state = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let snapshot: Snapshot = serde_json::from_slice(&bytes)?;
                debug!("Loaded ledger snapshot {} at slot {}", path.display(), snapshot.slot);
                LedgerState::from_snapshot(snapshot)?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("Creating new ledger snapshot at {}", path.display());
                LedgerState::default()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            program_id,
            player,
            state: Arc::new(RwLock::new(state)),
            snapshot_path: Some(path),
            history_limit: DEFAULT_HISTORY_LIMIT,
        })
    }

    /// Keep logs for at most `limit` transactions; zero prunes immediately.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Handle submitting as another player, sharing this ledger's state.
    pub fn as_player(&self, player: Pubkey) -> Self {
        Self { player, ..self.clone() }
    }

    /// Force the machine's next moves, in order.
    pub async fn queue_machine_moves(&self, moves: impl IntoIterator<Item = Move>) {
        self.state.write().await.machine_script.extend(moves);
    }

    /// Store raw bytes at an address, bypassing the program.
    ///
    /// Models accounts written by older program versions.
    pub async fn insert_raw_account(
        &self,
        address: Pubkey,
        data: Vec<u8>,
    ) -> Result<(), LedgerError> {
        self.apply(|state| {
            state.accounts.insert(address, data);
            Ok(())
        })
        .await
    }

    /// Current slot.
    pub async fn slot(&self) -> u64 {
        self.state.read().await.slot
    }

    /// Run `op` on a copy of the state and keep the copy only once it is
    /// persisted. A failed instruction or snapshot write changes nothing.
    async fn apply<T, F>(&self, op: F) -> Result<T, LedgerError>
    where
        F: FnOnce(&mut LedgerState) -> Result<T, LedgerError>,
    {
        let mut state = self.state.write().await;
        let mut next = state.clone();
        let value = op(&mut next)?;
        self.persist(&next).await?;
        *state = next;
        Ok(value)
    }

    async fn persist(&self, state: &LedgerState) -> Result<(), LedgerError> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };

        let json = serde_json::to_vec_pretty(&state.to_snapshot())?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }
}

impl Ledger for SimulatedLedger {
    fn program_id(&self) -> Pubkey {
        self.program_id
    }

    fn player(&self) -> Pubkey {
        self.player
    }

    async fn initialize_global_state(&self) -> Result<String, LedgerError> {
        self.apply(|state| state.initialize(&self.program_id, &self.player, self.history_limit))
            .await
    }

    async fn submit_move(
        &self,
        player_move: Move,
        name: Option<PlayerName>,
    ) -> Result<String, LedgerError> {
        let code = player_move.as_u8();
        self.apply(|state| {
            state.play(&self.program_id, &self.player, code, name, self.history_limit)
        })
        .await
    }

    async fn transaction_logs(&self, signature: &str) -> Result<Option<Vec<String>>, LedgerError> {
        let state = self.state.read().await;
        Ok(state.transactions
            .iter()
            .find(|t| t.signature == signature)
            .map(|t| t.logs.clone()))
    }

    async fn fetch_global_state(&self) -> Result<GlobalState, LedgerError> {
        let address = global_state_address(&self.program_id).address;
        self.state.read().await.read(&address)
    }

    async fn fetch_player_record(&self, address: &Pubkey) -> Result<PlayerRecord, LedgerError> {
        self.state.read().await.read(address)
    }

    async fn close_player_record(&self) -> Result<CloseReceipt, LedgerError> {
        self.apply(|state| state.close(&self.program_id, &self.player, self.history_limit))
            .await
    }

    async fn program_accounts(&self) -> Result<Vec<(Pubkey, Vec<u8>)>, LedgerError> {
        let state = self.state.read().await;
        Ok(state.accounts.iter().map(|(k, v)| (*k, v.clone())).collect())
    }
}

// =============================================================================
// TESTS
// =============================================================================
