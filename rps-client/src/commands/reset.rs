//! `reset`: close this player's record after confirmation.

use anyhow::{Context, Result};
use tracing::info;

use crate::core::address::player_record_address;
use crate::ledger::Ledger;
use crate::session::render::{achievements, player_stats};
use crate::session::Console;

/// What a reset did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResetOutcome {
    /// No record to close.
    NotFound,
    /// Player declined.
    Cancelled,
    /// Record closed.
    Closed {
        /// Transaction signature.
        signature: String,
        /// Reservation returned (lamports).
        reclaimed_lamports: u64,
    },
}

/// Show the record, ask for confirmation (default yes) and close it.
pub async fn reset<L: Ledger, C: Console>(ledger: &L, console: &mut C) -> Result<ResetOutcome> {
    let record_address = player_record_address(&ledger.player(), &ledger.program_id()).address;

    console.say("🔄 PLAYER ACCOUNT RESET");
    console.say("========================");
    console.say(&format!("Player wallet: {}", ledger.player()));
    console.say(&format!("Account address: {}", record_address));

    let record = ledger
        .find_player_record(&record_address)
        .await
        .context("failed to read player record")?;
    let Some(record) = record else {
        console.say("❌ Player account not found. You haven't played any games yet.");
        console.say("Run 'rps-client play' to create your player account first!");
        return Ok(ResetOutcome::NotFound);
    };

    console.say("✅ Account found!");
    console.say("\n👤 PLAYER INFO:");
    console.say("===============");
    console.say(&player_stats(&record));
    let earned = achievements(&record);
    if !earned.is_empty() {
        console.say(&format!("Achievements: {}", earned.join(", ")));
    }

    console.say("\n⚠️  WARNING: This will permanently delete your account!");
    console.say("💰 Your rent will be returned to your wallet.");
    console.say("🗑️  All your stats will be lost forever!");
    console.say("✅ You can create a new account by running 'rps-client play'");

    let confirmed = console
        .confirm("\nAre you sure you want to reset the account?", true)?
        .unwrap_or(false);
    if !confirmed {
        console.say("✅ Account deletion cancelled.");
        return Ok(ResetOutcome::Cancelled);
    }

    console.say("\n🗑️  DELETING ACCOUNT...");
    let receipt = ledger
        .close_player_record()
        .await
        .context("failed to close player record")?;
    info!("Closed {} reclaiming {} lamports", record_address, receipt.reclaimed_lamports);

    console.say("✅ Account deleted successfully!");
    console.say(&format!("Transaction: {}", receipt.signature));
    console.say(&format!("💰 {} lamports returned to your wallet.", receipt.reclaimed_lamports));

    Ok(ResetOutcome::Closed {
        signature: receipt.signature,
        reclaimed_lamports: receipt.reclaimed_lamports,
    })
}
