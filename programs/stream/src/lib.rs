use anchor_lang::prelude::*;

// Importing instruction handlers, account state and address helpers.
pub mod events;
mod guard;
pub mod instructions;
pub mod pda;
pub mod state;
pub use instructions::*;
pub use pda::*;
pub use state::*;

// Declare the program ID to associate this Rust program with the deployed Solana program.
declare_id!("5vzwztHZBMekRQDzy9K1PiQrWw3qYYvfwcgapnwcdJLC");

/// Domain separation label for the Stream Authority PDA: `["idk", mint]`.
pub const STREAM_AUTHORITY_SEED: &[u8] = b"idk";

/// Raw units minted by `mint_to_self` when the operator does not choose an amount.
pub const DEFAULT_MINT_AMOUNT: u64 = 1;

#[program]
pub mod stream {
    use super::*;

    /// Hands the mint and freeze authority of `mint` to its Stream Authority PDA.
    ///
    /// **Business Logic:**
    /// - Only the current mint authority (who must also hold the freeze authority) may delegate.
    /// - The first delegation creates the Stream Authority record and pins its owner.
    /// - Later delegations re-arm the same record and must come from that owner.
    pub fn give_authority(ctx: Context<GiveAuthority>, mint_amount: u64) -> Result<()> {
        instructions::give_authority(ctx, mint_amount)
    }

    /// Returns the mint and freeze authority from the Stream Authority to the record owner.
    ///
    /// **Business Logic:**
    /// - Any signer other than the recorded owner is rejected, delegated or not.
    /// - The record is kept so the mint can be delegated again.
    pub fn reclaim_authority(ctx: Context<ReclaimAuthority>) -> Result<()> {
        instructions::reclaim_authority(ctx)
    }

    /// Mints the configured amount into the caller's associated token account and freezes it.
    ///
    /// **Business Logic:**
    /// - Valid only while the mint is delegated to its Stream Authority.
    /// - Each holder receives a single frozen balance; the account is created if needed.
    pub fn mint_to_self(ctx: Context<MintToSelf>) -> Result<()> {
        instructions::mint_to_self(ctx)
    }
}

/// Defines custom error codes for the Stream program.
#[error_code]
pub enum StreamError {
    #[msg("Signer is not the current mint and freeze authority")]
    UnauthorizedDelegation,
    #[msg("Stream Authority is owned by a different wallet")]
    OwnerMismatch,
    #[msg("Signer is not the Stream Authority owner")]
    NotOwner,
    #[msg("Mint authority is not delegated to the Stream Authority")]
    DelegationNotActive,
    #[msg("Stream Authority record does not exist for this mint")]
    RecordNotFound,
    #[msg("Mint authority is already delegated")]
    AlreadyDelegated,
    #[msg("Token account already holds a minted balance")]
    AlreadyMinted,
    #[msg("Mint amount must be greater than zero")]
    InvalidMintAmount,
    #[msg("Stream Authority address does not match its derivation")]
    InvalidDerivation,
    #[msg("Arithmetic overflow")]
    ArithmeticOverflow,
}
