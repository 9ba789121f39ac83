//! `init`: create the global state record.

use anyhow::{Context, Result};
use tracing::info;

use crate::core::address::global_state_address;
use crate::ledger::Ledger;
use crate::session::Console;

/// Initialize the game. Fails if it is already initialized.
pub async fn init<L: Ledger, C: Console>(ledger: &L, console: &mut C) -> Result<()> {
    console.say(&format!("Player wallet: {}", ledger.player()));
    console.say("Initializing Rock Paper Scissors game...");

    let signature = ledger
        .initialize_global_state()
        .await
        .context("failed to initialize game state")?;
    let address = global_state_address(&ledger.program_id()).address;
    info!("Global state {} created in {}", address, signature);

    console.say(&format!("Game initialized: {}", signature));
    console.say(&format!("Game state address: {}", address));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::*;
    use crate::ledger::SimulatedLedger;
    use crate::session::console::ScriptedConsole;

    #[tokio::test]
    async fn test_init_twice_fails() {
        let ledger = SimulatedLedger::in_memory(PROGRAM, PLAYER);
        let mut console = ScriptedConsole::default();

        init(&ledger, &mut console).await.unwrap();
        let address = global_state_address(&PROGRAM).address;
        assert!(console.output().contains(&address.to_string()));

        let err = init(&ledger, &mut console).await.unwrap_err();
        assert!(format!("{:#}", err).contains("already in use"));
    }
}
