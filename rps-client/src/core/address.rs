//! Program-Derived Addresses
//!
//! The ledger program keys its records by addresses derived from fixed
//! seeds and the program id. The client must reproduce the derivation
//! byte-for-byte, otherwise it looks for records that do not exist.

use solana_program::pubkey::Pubkey;

/// Seed of the singleton global state record.
pub const GAME_STATE_SEED: &[u8] = b"game_state";

/// Seed prefix of per-player records (followed by the player key).
pub const PLAYER_STATS_SEED: &[u8] = b"player_stats";

/// An address found by the canonical bump search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DerivedAddress {
    /// The off-curve address.
    pub address: Pubkey,
    /// Bump seed that moved the address off the curve.
    pub bump: u8,
}

impl DerivedAddress {
    fn find(seeds: &[&[u8]], program_id: &Pubkey) -> Self {
        let (address, bump) = Pubkey::find_program_address(seeds, program_id);
        Self { address, bump }
    }
}

/// Both record addresses for one player of one program.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerAddresses {
    /// The player's public identity.
    pub player: Pubkey,
    /// The ledger program.
    pub program_id: Pubkey,
    /// Global state record.
    pub global: DerivedAddress,
    /// This player's record.
    pub player_record: DerivedAddress,
}

/// Address of the global state record.
pub fn global_state_address(program_id: &Pubkey) -> DerivedAddress {
    DerivedAddress::find(&[GAME_STATE_SEED], program_id)
}

/// Address of a player's record.
pub fn player_record_address(player: &Pubkey, program_id: &Pubkey) -> DerivedAddress {
    DerivedAddress::find(&[PLAYER_STATS_SEED, player.as_ref()], program_id)
}

/// Derive the global and per-player addresses for `player`.
pub fn derive_addresses(player: &Pubkey, program_id: &Pubkey) -> PlayerAddresses {
    PlayerAddresses {
        player: *player,
        program_id: *program_id,
        global: global_state_address(program_id),
        player_record: player_record_address(player, program_id),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const PROGRAM: Pubkey = Pubkey::new_from_array([42; 32]);

    #[test]
    fn test_derivation_is_deterministic() {
        let player = Pubkey::new_from_array([1; 32]);
        assert_eq!(derive_addresses(&player, &PROGRAM), derive_addresses(&player, &PROGRAM));
    }

    #[test]
    fn test_global_address_ignores_player() {
        let a = derive_addresses(&Pubkey::new_from_array([1; 32]), &PROGRAM);
        let b = derive_addresses(&Pubkey::new_from_array([2; 32]), &PROGRAM);

        assert_eq!(a.global, b.global);
        assert_ne!(a.player_record, b.player_record);
    }

    #[test]
    fn test_program_id_separates_addresses() {
        let player = Pubkey::new_from_array([1; 32]);
        let other_program = Pubkey::new_from_array([43; 32]);

        let a = derive_addresses(&player, &PROGRAM);
        let b = derive_addresses(&player, &other_program);
        assert_ne!(a.global, b.global);
        assert_ne!(a.player_record, b.player_record);
    }

    #[test]
    fn test_bump_reproduces_address() {
        let player = Pubkey::new_from_array([5; 32]);
        let derived = player_record_address(&player, &PROGRAM);

        let recreated = Pubkey::create_program_address(
            &[PLAYER_STATS_SEED, player.as_ref(), &[derived.bump]],
            &PROGRAM,
        )
        .unwrap();
        assert_eq!(recreated, derived.address);

        let global = global_state_address(&PROGRAM);
        let recreated = Pubkey::create_program_address(&[GAME_STATE_SEED, &[global.bump]], &PROGRAM)
            .unwrap();
        assert_eq!(recreated, global.address);
    }

    #[test]
    fn test_domain_tags_do_not_collide() {
        let global = global_state_address(&PROGRAM);
        let player = player_record_address(&Pubkey::new_from_array([0; 32]), &PROGRAM);
        assert_ne!(global.address, player.address);
    }
}
