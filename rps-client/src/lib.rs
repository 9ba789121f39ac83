//! # Rock Paper Scissors Client
//!
//! Player client for an on-chain rock-paper-scissors program. The program
//! owns every record; this crate derives addresses, submits moves,
//! reconciles results and ranks players.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     RPS CLIENT                               │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── hash.rs     - Discriminators and domain hashing         │
//! │  ├── rng.rs      - Deterministic Xorshift128+ PRNG           │
//! │  └── address.rs  - Program-derived record addresses          │
//! │                                                              │
//! │  game/           - Game logic                                │
//! │  ├── moves.rs    - Moves, outcomes and resolution            │
//! │  ├── streak.rs   - Win streak rules                          │
//! │  ├── records.rs  - Persisted record shapes                   │
//! │  ├── reconcile.rs- Log parsing with local fallback           │
//! │  └── leaderboard.rs - Rankings                               │
//! │                                                              │
//! │  ledger/         - Ledger program contract                   │
//! │  └── simulated.rs- In-process program with JSON snapshot     │
//! │                                                              │
//! │  session/        - Interactive play loop                     │
//! │  commands/       - init / inspect / stats / reset            │
//! │  config.rs       - JSON settings and wallet                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Authority
//!
//! The ledger's log lines are the source of truth for a turn. The client
//! only recomputes a result when those lines are missing or unreadable,
//! and says so.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod commands;
pub mod config;
pub mod core;
pub mod game;
pub mod ledger;
pub mod session;

// Re-export commonly used types
pub use core::address::{derive_addresses, PlayerAddresses};
pub use game::moves::{resolve, Move, Outcome};
pub use game::reconcile::{reconcile, TurnResult};
pub use game::records::{GlobalState, PlayerRecord};
pub use ledger::{Ledger, LedgerError, SimulatedLedger};
pub use session::Session;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
