//! Hashing Helpers
//!
//! Provides the SHA-256 based hashes the ledger program relies on:
//! - Account and instruction discriminators (Anchor layout)
//! - Transaction signatures for the simulated ledger
//! - Seeds for machine-move derivation

use sha2::{Sha256, Digest};

/// Hash output type (256 bits / 32 bytes)
pub type Hash32 = [u8; 32];

/// Account/instruction discriminator (first 8 bytes of a namespaced hash).
pub type Discriminator = [u8; 8];

/// Incremental hasher with a domain separator.
///
/// Order of updates is critical for determinism.
pub struct DomainHasher {
    hasher: Sha256,
}

impl DomainHasher {
    /// Create a new hasher with domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Create hasher for simulated transaction signatures.
    pub fn for_signature() -> Self {
        Self::new(b"RPS_LEDGER_SIGNATURE_V1")
    }

    /// Create hasher for machine-move seeds.
    pub fn for_machine_seed() -> Self {
        Self::new(b"RPS_MACHINE_SEED_V1")
    }

    /// Update with raw bytes.
    #[inline]
    pub fn update_bytes(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    /// Update with a u64 value (little-endian).
    #[inline]
    pub fn update_u64(&mut self, value: u64) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Finalize and return the hash.
    pub fn finalize(self) -> Hash32 {
        self.hasher.finalize().into()
    }
}

/// Compute hash with domain separator.
pub fn hash_with_domain(domain: &[u8], data: &[u8]) -> Hash32 {
    let mut hasher = Sha256::new();
    hasher.update(domain);
    hasher.update(data);
    hasher.finalize().into()
}

/// Discriminator for a namespaced name, e.g. `account:GameState`.
pub fn discriminator(namespace: &str, name: &str) -> Discriminator {
    let hash = hash_with_domain(format!("{}:", namespace).as_bytes(), name.as_bytes());

    let mut out = [0u8; 8];
    out.copy_from_slice(&hash[..8]);
    out
}

/// Discriminator prefixed to an account's data.
pub fn account_discriminator(type_name: &str) -> Discriminator {
    discriminator("account", type_name)
}

/// Discriminator prefixed to an instruction's data.
pub fn instruction_discriminator(method_name: &str) -> Discriminator {
    discriminator("global", method_name)
}

/// Fold a hash into a u64 seed (first 8 bytes, little-endian).
pub fn seed_from_hash(hash: &Hash32) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash[..8]);
    u64::from_le_bytes(bytes)
}

// =============================================================================
// TESTS
// =============================================================================
