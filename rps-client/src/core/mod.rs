//! Core deterministic primitives.
//!
//! Hashing, seeded randomness and address derivation. Nothing here talks
//! to the ledger or the terminal.

pub mod address;
pub mod hash;
pub mod rng;

// Re-export core types
pub use address::{derive_addresses, DerivedAddress, PlayerAddresses};
pub use hash::{account_discriminator, Discriminator};
pub use rng::DeterministicRng;
