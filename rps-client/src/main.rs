//! Rock Paper Scissors Client
//!
//! Command-line front end: loads settings, opens the ledger and runs one
//! subcommand.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use rps::{
    commands,
    config::{Endpoint, Settings, DEFAULT_CONFIG_PATH},
    ledger::SimulatedLedger,
    session::{Session, TerminalConsole},
    VERSION,
};

#[derive(Parser)]
#[command(name = "rps-client", version)]
#[command(about = "Play rock-paper-scissors against the on-chain machine")]
struct Cli {
    /// Settings file.
    #[arg(long, env = "RPS_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the global game state (once per program).
    Init,
    /// Play interactively.
    Play,
    /// List and decode every program account.
    Inspect,
    /// Show your player record and the global counters.
    Stats,
    /// Delete your player record and reclaim its rent.
    Reset,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Game output goes to stdout; diagnostics to stderr
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    let cli = Cli::parse();
    info!("rps-client v{}", VERSION);

    let settings = Settings::load(&cli.config)?;
    let program_id = settings.program_id()?;
    let player = settings.load_player()?;
    let Endpoint::Simulated(path) = settings.endpoint()?;

    info!("Ledger {} ({} commitment)", path.display(), settings.devnet.commitment);
    let ledger = SimulatedLedger::open(&path, program_id, player)
        .await
        .with_context(|| format!("failed to open ledger at {}", path.display()))?;

    let mut console = TerminalConsole::new();
    match cli.command {
        Command::Init => commands::init(&ledger, &mut console).await?,
        Command::Play => {
            let mut session = Session::new(ledger, console);
            session.run().await?;
        }
        Command::Inspect => {
            commands::inspect(&ledger, &mut console).await?;
        }
        Command::Stats => commands::stats(&ledger, &mut console, &settings.explorer_cluster).await?,
        Command::Reset => {
            commands::reset(&ledger, &mut console).await?;
        }
    }

    Ok(())
}
