use anchor_lang::{prelude::*, solana_program::pubkey::PubkeyError};

use crate::STREAM_AUTHORITY_SEED;

/// Derives the Stream Authority PDA and its canonical bump for `mint` under this program.
///
/// **Business Logic:**
/// - Same mint, same address: clients call this to pre-compute accounts before any instruction.
/// - The address lies off the ed25519 curve, so no private key exists for it.
pub fn find_stream_authority_address(mint: &Pubkey) -> (Pubkey, u8) {
    find_stream_authority_address_for(mint, &crate::ID)
}

/// Same as [`find_stream_authority_address`] for a program deployed under another id.
pub fn find_stream_authority_address_for(mint: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[STREAM_AUTHORITY_SEED, mint.as_ref()], program_id)
}

/// Recomputes the Stream Authority address from a stored bump.
///
/// Used by the program to check its own derivation before signing for the PDA.
pub fn create_stream_authority_address(
    mint: &Pubkey,
    bump: u8,
) -> std::result::Result<Pubkey, PubkeyError> {
    Pubkey::create_program_address(&[STREAM_AUTHORITY_SEED, mint.as_ref(), &[bump]], &crate::ID)
}
