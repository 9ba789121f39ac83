//! Command Entry Points
//!
//! One function per subcommand. Each writes through a [`Console`] and
//! returns `anyhow::Result` for the binary to report.
//!
//! [`Console`]: crate::session::Console

pub mod init;
pub mod inspect;
pub mod reset;
pub mod stats;

pub use init::init;
pub use inspect::inspect;
pub use reset::reset;
pub use stats::stats;

#[cfg(test)]
pub(crate) mod testing {
    use solana_program::pubkey::Pubkey;

    use crate::game::moves::Move;
    use crate::game::records::PlayerName;
    use crate::ledger::{Ledger, SimulatedLedger};

    pub const PROGRAM: Pubkey = Pubkey::new_from_array([42; 32]);
    pub const PLAYER: Pubkey = Pubkey::new_from_array([5; 32]);

    /// Initialized ledger where `PLAYER` has played `games` rock moves.
    pub async fn ledger_with_games(games: usize) -> SimulatedLedger {
        let ledger = SimulatedLedger::in_memory(PROGRAM, PLAYER);
        ledger.initialize_global_state().await.unwrap();
        for i in 0..games {
            let name = (i == 0).then(|| PlayerName::parse("ann").unwrap());
            ledger.submit_move(Move::Rock, name).await.unwrap();
        }
        ledger
    }
}
