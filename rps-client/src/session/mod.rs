//! Play Session
//!
//! Drives one interactive session as an explicit state machine:
//!
//! ```text
//! Idle ─► AwaitingMove ─► Submitting ─► Reconciling ─► Displaying
//!              ▲   │            │                           │
//!              │   └─► Terminal └──── (failure) ──┐         │
//!              └──────────────────────────────────┴─────────┘
//! ```
//!
//! Every record read that feeds a decision is fetched right before use.
//! Only console failures end the session early; ledger failures are shown
//! and the player gets the post-turn menu, so they can retry, look at
//! statistics or quit.

pub mod console;
pub mod render;

use tracing::{debug, error, info, warn};

use crate::core::address::{derive_addresses, PlayerAddresses};
use crate::game::leaderboard::aggregate_accounts;
use crate::game::moves::Move;
use crate::game::reconcile::{reconcile, EntropySource, SubmissionReceipt, TurnResult, WallClock};
use crate::game::records::PlayerName;
use crate::game::streak;
use crate::ledger::Ledger;

pub use console::{Console, ConsoleError, TerminalConsole};

/// Prompt for a move.
pub const MOVE_PROMPT: &str = "Enter your move and try to beat the machine:";

/// Prompt for a display name.
pub const NAME_PROMPT: &str = "Enter your player name:";

/// Session states.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionState {
    /// Resolving the player's identity and record.
    Idle,
    /// Waiting for input; `menu` selects the post-turn menu over the move prompt.
    AwaitingMove {
        /// Show the post-turn menu.
        menu: bool,
    },
    /// Sending a move.
    Submitting(Move),
    /// Interpreting a committed move.
    Reconciling {
        /// Move the player sent.
        player_move: Move,
        /// Streak read before submission.
        previous_streak: u64,
        /// What the ledger returned.
        receipt: SubmissionReceipt,
    },
    /// Showing a finished turn.
    Displaying {
        /// Reconciled turn.
        turn: TurnResult,
        /// Streak read before submission.
        previous_streak: u64,
    },
    /// Session over.
    Terminal,
}

/// Counters for a finished session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Turns committed to the ledger.
    pub turns: u64,
    /// Turns whose result was recomputed locally.
    pub fallbacks: u64,
    /// Submissions the ledger rejected.
    pub failures: u64,
}

/// One player's interactive session.
pub struct Session<L, C, E = WallClock> {
    ledger: L,
    console: C,
    entropy: E,
    addresses: PlayerAddresses,
    pending_name: Option<PlayerName>,
    summary: SessionSummary,
}

impl<L: Ledger, C: Console> Session<L, C, WallClock> {
    /// Session using wall-clock fallback entropy.
    pub fn new(ledger: L, console: C) -> Self {
        Self::with_entropy(ledger, console, WallClock)
    }
}

impl<L: Ledger, C: Console, E: EntropySource> Session<L, C, E> {
    /// Session with an explicit fallback entropy source.
    pub fn with_entropy(ledger: L, console: C, entropy: E) -> Self {
        let addresses = derive_addresses(&ledger.player(), &ledger.program_id());
        Self {
            ledger,
            console,
            entropy,
            addresses,
            pending_name: None,
            summary: SessionSummary::default(),
        }
    }

    /// The console, e.g. to inspect a scripted transcript.
    pub fn console(&self) -> &C {
        &self.console
    }

    /// Run until the player quits or input ends.
    pub async fn run(&mut self) -> Result<SessionSummary, ConsoleError> {
        info!("Session started for {}", self.addresses.player);

        let mut state = SessionState::Idle;
        while state != SessionState::Terminal {
            state = self.step(state).await?;
        }

        info!(
            "Session ended: {} turns, {} fallbacks, {} failures",
            self.summary.turns, self.summary.fallbacks, self.summary.failures
        );
        Ok(self.summary)
    }

    /// Advance one state.
    pub async fn step(&mut self, state: SessionState) -> Result<SessionState, ConsoleError> {
        debug!("Session state: {:?}", state);
        match state {
            SessionState::Idle => self.identify().await,
            SessionState::AwaitingMove { menu: false } => self.await_move(),
            SessionState::AwaitingMove { menu: true } => self.post_turn_menu().await,
            SessionState::Submitting(player_move) => self.submit(player_move).await,
            SessionState::Reconciling { player_move, previous_streak, receipt } => {
                Ok(self.reconcile_turn(player_move, previous_streak, receipt).await)
            }
            SessionState::Displaying { turn, previous_streak } => {
                Ok(self.display(turn, previous_streak))
            }
            SessionState::Terminal => Ok(SessionState::Terminal),
        }
    }

    async fn identify(&mut self) -> Result<SessionState, ConsoleError> {
        let record_address = self.addresses.player_record.address;

        match self.ledger.find_player_record(&record_address).await {
            Ok(None) => {
                self.console.say(&render::welcome_new(&self.addresses.player, &record_address));
                match self.prompt_name()? {
                    Some(name) => self.pending_name = Some(name),
                    None => return Ok(SessionState::Terminal),
                }
            }
            Ok(Some(record)) => {
                if record.has_zeroed_identity() {
                    warn!("Player record {} has a zeroed identity", record_address);
                    self.console.say("Warning: your player record has no owner identity set.");
                }
                let player = self.addresses.player;
                self.console.say(&render::welcome_back(&player, &record_address, &record));
            }
            Err(e) => {
                error!("Could not read player record {}: {}", record_address, e);
                self.console.say(&format!("Could not read your player record: {}", e));
            }
        }

        Ok(SessionState::AwaitingMove { menu: false })
    }

    /// Ask for a name until a valid one is typed. `None` on end of input.
    fn prompt_name(&mut self) -> Result<Option<PlayerName>, ConsoleError> {
        loop {
            let Some(answer) = self.console.ask(NAME_PROMPT)? else {
                return Ok(None);
            };
            match PlayerName::parse(&answer) {
                Ok(name) => return Ok(Some(name)),
                Err(e) => self.console.say(&format!(
                    "Invalid name: {}. Must be 1-8 printable ASCII characters.",
                    e
                )),
            }
        }
    }

    fn await_move(&mut self) -> Result<SessionState, ConsoleError> {
        self.console.say(&render::move_menu());

        loop {
            let Some(answer) = self.console.ask(MOVE_PROMPT)? else {
                return Ok(SessionState::Terminal);
            };
            match Move::parse_input(&answer) {
                Ok(player_move) => return Ok(SessionState::Submitting(player_move)),
                Err(e) => {
                    self.console.say(&format!("Invalid move: {}. Please enter 1, 2, or 3.", e))
                }
            }
        }
    }

    async fn post_turn_menu(&mut self) -> Result<SessionState, ConsoleError> {
        self.console.say(&render::post_turn_menu());

        let Some(choice) = self.console.ask("")? else {
            return Ok(SessionState::Terminal);
        };
        if let Ok(player_move) = Move::parse_input(&choice) {
            return Ok(SessionState::Submitting(player_move));
        }

        match choice.trim().chars().next().map(|c| c.to_ascii_lowercase()) {
            Some('q') => {
                self.console.say("Thanks for playing! 👋");
                Ok(SessionState::Terminal)
            }
            Some('s') => {
                self.show_statistics().await;
                match self.console.ask("Press return to continue")? {
                    Some(_) => Ok(SessionState::AwaitingMove { menu: false }),
                    None => Ok(SessionState::Terminal),
                }
            }
            _ => Ok(SessionState::AwaitingMove { menu: false }),
        }
    }

    async fn submit(&mut self, player_move: Move) -> Result<SessionState, ConsoleError> {
        self.console.say(&format!("\nPlaying move: {}...", player_move.as_u8()));

        // Read before submitting; afterwards the record already holds this turn
        let record_address = self.addresses.player_record.address;
        let previous = match self.ledger.find_player_record(&record_address).await {
            Ok(previous) => previous,
            Err(e) => return Ok(self.submission_failed(e)),
        };

        let name = match previous {
            Some(_) => None,
            None => match self.pending_name.take() {
                Some(name) => Some(name),
                None => {
                    self.console.say(&render::welcome_new(&self.addresses.player, &record_address));
                    match self.prompt_name()? {
                        Some(name) => Some(name),
                        None => return Ok(SessionState::Terminal),
                    }
                }
            },
        };
        let previous_streak = previous.map(|r| r.current_streak).unwrap_or(0);

        match self.ledger.submit_and_collect(player_move, name).await {
            Ok(receipt) => {
                self.summary.turns += 1;
                Ok(SessionState::Reconciling { player_move, previous_streak, receipt })
            }
            Err(e) => {
                // Record is still missing; keep the name for the next try
                if name.is_some() {
                    self.pending_name = name;
                }
                Ok(self.submission_failed(e))
            }
        }
    }

    fn submission_failed(&mut self, e: impl std::fmt::Display) -> SessionState {
        error!("Submission failed: {}", e);
        self.summary.failures += 1;
        self.console.say(&format!("Error playing game: {}", e));
        SessionState::AwaitingMove { menu: true }
    }

    async fn reconcile_turn(
        &mut self,
        player_move: Move,
        previous_streak: u64,
        receipt: SubmissionReceipt,
    ) -> SessionState {
        let turn = reconcile(player_move, &receipt, &self.entropy);
        if turn.is_fallback() {
            self.summary.fallbacks += 1;
            self.console
                .say("Warning: Could not parse transaction logs, using fallback calculation");
        }

        let record_address = self.addresses.player_record.address;
        let record = match self.ledger.find_player_record(&record_address).await {
            Ok(record) => record,
            Err(e) => {
                self.console.say(&format!("Error fetching player stats: {}", e));
                None
            }
        };

        SessionState::Displaying { turn: turn.with_record(record), previous_streak }
    }

    fn display(&mut self, turn: TurnResult, previous_streak: u64) -> SessionState {
        let current = streak::update(previous_streak, turn.outcome);
        if let Some(record) = &turn.record {
            if record.current_streak != current && !turn.is_fallback() {
                debug!(
                    "Displayed streak {} differs from ledger streak {}",
                    current, record.current_streak
                );
            }
        }

        self.console.say(&render::turn_result(&turn, current));
        SessionState::AwaitingMove { menu: true }
    }

    async fn show_statistics(&mut self) {
        self.console.say("\n📊 ======== GAME STATISTICS ======== 📊");

        match self.ledger.fetch_global_state().await {
            Ok(state) => {
                self.console.say(&format!("\n🌍 Global Stats:\n{}", render::global_stats(&state)))
            }
            Err(e) => {
                debug!("Global state unavailable: {}", e);
                self.console.say("Could not fetch global stats.");
            }
        }

        let record_address = self.addresses.player_record.address;
        match self.ledger.find_player_record(&record_address).await {
            Ok(Some(record)) => {
                self.console.say(&format!("\n🎯 Your Stats:\n{}", render::player_stats(&record)));
                let earned = render::achievements(&record);
                if !earned.is_empty() {
                    let lines: Vec<String> =
                        earned.iter().map(|a| format!("✅ {} achieved!", a)).collect();
                    self.console.say(&format!("\n🏅 Achievements:\n{}", lines.join("\n")));
                }
            }
            Ok(None) => self.console.say("\nNo player record yet."),
            Err(e) => self.console.say(&format!("Could not fetch player stats: {}", e)),
        }

        match self.ledger.program_accounts().await {
            Ok(accounts) => {
                let boards = aggregate_accounts(&accounts);
                if boards.unknown_accounts > 0 {
                    debug!("Skipped {} unknown accounts", boards.unknown_accounts);
                }
                self.console.say(&render::leaderboard(&boards));
            }
            Err(e) => self.console.say(&format!("Could not fetch leaderboard: {}", e)),
        }

        self.console.say("\n📊 ================================ 📊");
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::console::ScriptedConsole;
    use super::*;
    use crate::game::records::{LedgerRecord, PlayerRecord};
    use crate::ledger::SimulatedLedger;
    use solana_program::pubkey::Pubkey;

    const PROGRAM: Pubkey = Pubkey::new_from_array([42; 32]);
    const PLAYER: Pubkey = Pubkey::new_from_array([3; 32]);

    async fn ledger() -> SimulatedLedger {
        let ledger = SimulatedLedger::in_memory(PROGRAM, PLAYER);
        ledger.initialize_global_state().await.unwrap();
        ledger
    }

    fn session(
        ledger: &SimulatedLedger,
        answers: &[&str],
    ) -> Session<SimulatedLedger, ScriptedConsole, fn() -> u64> {
        let zero: fn() -> u64 = || 0;
        Session::with_entropy(ledger.clone(), ScriptedConsole::new(answers.iter().copied()), zero)
    }

    async fn own_record(ledger: &SimulatedLedger) -> PlayerRecord {
        let address = derive_addresses(&PLAYER, &PROGRAM).player_record.address;
        ledger.fetch_player_record(&address).await.unwrap()
    }

    #[tokio::test]
    async fn test_new_player_named_once() {
        let ledger = ledger().await;
        ledger.queue_machine_moves([Move::Scissors, Move::Rock]).await;

        let mut s = session(&ledger, &["bob", "1", "2", "q"]);
        let summary = s.run().await.unwrap();

        assert_eq!(summary.turns, 2);
        assert_eq!(s.console().asked(NAME_PROMPT), 1);
        assert!(s.console().output().contains("Welcome, new player!"));
        assert!(s.console().output().contains("Thanks for playing!"));

        let record = own_record(&ledger).await;
        assert_eq!(record.name.to_string(), "bob");
        assert_eq!(record.games_played, 2);
    }

    #[tokio::test]
    async fn test_invalid_name_reprompts() {
        let ledger = ledger().await;
        let mut s = session(&ledger, &["", "waytoolongname", "ok", "3", "q"]);
        s.run().await.unwrap();

        assert_eq!(s.console().asked(NAME_PROMPT), 3);
        assert_eq!(own_record(&ledger).await.name.to_string(), "ok");
    }

    #[tokio::test]
    async fn test_invalid_move_reprompts() {
        let ledger = ledger().await;
        let mut s = session(&ledger, &["ann", "7", "x", "0", "1", "q"]);
        let summary = s.run().await.unwrap();

        assert_eq!(s.console().asked(MOVE_PROMPT), 4);
        assert_eq!(summary.turns, 1);
    }

    #[tokio::test]
    async fn test_streak_shown_across_turns() {
        let ledger = ledger().await;
        // win, win, tie, lose
        ledger
            .queue_machine_moves([Move::Scissors, Move::Scissors, Move::Rock, Move::Paper])
            .await;

        let mut s = session(&ledger, &["ann", "1", "1", "1", "1", "q"]);
        s.run().await.unwrap();

        let output = s.console().output();
        assert!(output.contains("Match counter: 1 💥"));
        assert!(output.contains("Match counter: 2 💥💥"));
        assert!(output.contains("It's a tie!"));
        assert!(output.contains("Match counter: 0 "));

        let record = own_record(&ledger).await;
        assert_eq!(record.current_streak, 0);
        assert_eq!(record.highest_streak, 2);
    }

    #[tokio::test]
    async fn test_returning_player_not_prompted() {
        let ledger = ledger().await;
        ledger.submit_move(Move::Rock, Some(PlayerName::parse("ann").unwrap())).await.unwrap();

        let mut s = session(&ledger, &["2", "q"]);
        s.run().await.unwrap();

        assert_eq!(s.console().asked(NAME_PROMPT), 0);
        assert!(s.console().output().contains("Welcome back, ann!"));
        assert_eq!(own_record(&ledger).await.games_played, 2);
    }

    #[tokio::test]
    async fn test_fallback_when_logs_missing() {
        let ledger = ledger().await.with_history_limit(0);
        let mut s = session(&ledger, &["ann", "1", "q"]);
        let summary = s.run().await.unwrap();

        assert_eq!(summary.fallbacks, 1);
        let output = s.console().output();
        assert!(output.contains("using fallback calculation"));
        // zero entropy maps to Rock
        assert!(output.contains("It's a tie!"));
    }

    #[tokio::test]
    async fn test_submission_failure_returns_to_menu() {
        let ledger = SimulatedLedger::in_memory(PROGRAM, PLAYER);
        let mut s = session(&ledger, &["ann", "1", "2"]);
        let summary = s.run().await.unwrap();

        assert_eq!(summary.failures, 2);
        assert_eq!(summary.turns, 0);
        assert_eq!(s.console().asked(NAME_PROMPT), 1);
        assert!(s.console().output().contains("Error playing game"));
        // the retry came from the post-turn menu, then input ended
        assert_eq!(s.console().asked(MOVE_PROMPT), 1);
    }

    #[tokio::test]
    async fn test_quit_after_failed_submission() {
        let ledger = SimulatedLedger::in_memory(PROGRAM, PLAYER);
        let mut s = session(&ledger, &["ann", "1", "q", "q", "q"]);
        let summary = s.run().await.unwrap();

        assert_eq!(summary.failures, 1);
        let output = s.console().output();
        assert!(output.contains("global state is not initialized"));
        assert!(output.contains("Thanks for playing!"));
        assert!(!output.contains("Invalid move"));
    }

    #[tokio::test]
    async fn test_statistics_after_failed_submission() {
        let ledger = SimulatedLedger::in_memory(PROGRAM, PLAYER);
        let mut s = session(&ledger, &["ann", "1", "s", ""]);
        let summary = s.run().await.unwrap();

        assert_eq!(summary.failures, 1);
        let output = s.console().output();
        assert!(output.contains("Could not fetch global stats."));
        assert!(output.contains("No player record yet."));
    }

    #[tokio::test]
    async fn test_zeroed_identity_is_returning_player() {
        let ledger = ledger().await;
        let address = derive_addresses(&PLAYER, &PROGRAM).player_record.address;
        let name = PlayerName::parse("ghost").unwrap();
        let orphan = PlayerRecord::new(&Pubkey::default(), name, 255);
        assert!(orphan.has_zeroed_identity());
        ledger.insert_raw_account(address, orphan.encode().unwrap()).await.unwrap();

        let mut s = session(&ledger, &["1", "q"]);
        let summary = s.run().await.unwrap();

        assert_eq!(summary.turns, 1);
        assert_eq!(s.console().asked(NAME_PROMPT), 0);
        let output = s.console().output();
        assert!(output.contains("Warning: your player record has no owner identity set."));
        assert!(output.contains("Welcome back, ghost!"));
        assert_eq!(own_record(&ledger).await.games_played, 1);
    }

    #[tokio::test]
    async fn test_closed_record_prompts_again() {
        let ledger = ledger().await;
        let mut s = session(&ledger, &["ann", "1", "2", "zed"]);

        let mut state = SessionState::Idle;
        while state != (SessionState::AwaitingMove { menu: true }) {
            state = s.step(state).await.unwrap();
        }
        ledger.close_player_record().await.unwrap();

        let mut state = SessionState::AwaitingMove { menu: true };
        while state != SessionState::Terminal {
            state = s.step(state).await.unwrap();
        }

        assert_eq!(s.console().asked(NAME_PROMPT), 2);
        assert_eq!(own_record(&ledger).await.name.to_string(), "zed");
    }

    #[tokio::test]
    async fn test_statistics_screen() {
        let ledger = ledger().await;
        let mut s = session(&ledger, &["ann", "1", "s", ""]);
        s.run().await.unwrap();

        let output = s.console().output();
        assert!(output.contains("GAME STATISTICS"));
        assert!(output.contains("Total games played: 1"));
        assert!(output.contains("Name: ann"));
        assert!(output.contains("Top 5 by Games Won") || output.contains("Fire Streaks"));
    }

    #[tokio::test]
    async fn test_end_of_input_quits() {
        let ledger = ledger().await;
        let mut s = session(&ledger, &[]);
        let summary = s.run().await.unwrap();
        assert_eq!(summary, SessionSummary::default());
    }
}
