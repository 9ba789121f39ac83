//! `stats`: show this player's record and the global counters.

use anyhow::Result;
use tracing::debug;

use crate::config::explorer_url;
use crate::core::address::derive_addresses;
use crate::ledger::Ledger;
use crate::session::render::player_stats;
use crate::session::Console;

/// Print the player's record with explorer links. Missing records are
/// reported with a hint, not as errors.
pub async fn stats<L: Ledger, C: Console>(
    ledger: &L,
    console: &mut C,
    cluster: &str,
) -> Result<()> {
    let addresses = derive_addresses(&ledger.player(), &ledger.program_id());
    let record_address = addresses.player_record.address;
    let record_url = explorer_url(&record_address, cluster);
    let global_address = addresses.global.address;

    console.say("🔍 PLAYER DATA CHECK");
    console.say("=====================");
    console.say(&format!("Player wallet: {}", ledger.player()));
    console.say(&format!("Program ID: {}", ledger.program_id()));

    console.say("\n📊 Player Stats Account:");
    console.say(&format!("Account: {}", record_address));
    console.say(&format!("Solscan URL: {}", record_url));

    match ledger.find_player_record(&record_address).await {
        Ok(Some(record)) => {
            console.say("\n🎮 Player Data:");
            console.say("===============");
            console.say(&player_stats(&record));
            console.say(&format!("\n🔗 View on Solscan:\n{}", record_url));
        }
        Ok(None) => {
            console.say("\n❌ Player stats not found.");
            console.say("This means you haven't played any games yet with this wallet.");
            console.say("Run 'rps-client play' to create your player account!");
        }
        Err(e) => console.say(&format!("\n❌ Player stats unreadable: {}", e)),
    }

    console.say("\n🌍 Global Game State:");
    console.say(&format!("Account: {}", global_address));
    console.say(&format!("Solscan URL: {}", explorer_url(&global_address, cluster)));

    match ledger.fetch_global_state().await {
        Ok(state) => {
            console.say(&format!("Total games: {}", state.total_games));
            console.say(&format!("Total wins: {}", state.total_wins));
            console.say(&format!("Total players: {}", state.total_players));
        }
        Err(e) => {
            debug!("Global state unavailable: {}", e);
            console.say("Game state not initialized. Run 'rps-client init' first.");
        }
    }

    Ok(())
}
