use anchor_lang::prelude::*;

use crate::{StreamError, STREAM_AUTHORITY_SEED};

/// Whether the mint's authorities currently sit with the Stream Authority.
#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DelegationStatus {
    Idle,
    Delegated,
}

/// Represents the Stream Authority record, one per mint at `["idk", mint]`.
///
/// **Fields:**
/// - `mint`: The governed mint. Set once.
/// - `owner`: The wallet allowed to reclaim authority. Set once.
/// - `bump`: Canonical bump of the PDA, used for program signing.
/// - `status`: Current delegation state.
/// - `mint_amount`: Raw units issued by each `mint_to_self`.
/// - `total_minted`: Units issued through `mint_to_self` over the record's lifetime.
#[account]
#[derive(InitSpace, Debug, PartialEq, Eq)]
pub struct StreamAuthority {
    pub mint: Pubkey,
    pub owner: Pubkey,
    pub bump: u8,
    pub status: DelegationStatus,
    pub mint_amount: u64,
    pub total_minted: u64,
}

impl StreamAuthority {
    /// True until the first `give_authority` writes the owner.
    pub fn is_fresh(&self) -> bool {
        self.owner == Pubkey::default()
    }

    pub fn is_delegated(&self) -> bool {
        self.status == DelegationStatus::Delegated
    }

    /// Moves the record into `Delegated` on behalf of `owner`.
    ///
    /// **Business Logic:**
    /// - A fresh record adopts `mint`, `owner` and `bump`.
    /// - An existing record only re-arms for the owner it was created for.
    /// - A delegated record is never re-armed. Through `give_authority` the mint constraint
    ///   already rejects this case with `UnauthorizedDelegation`, since the PDA holds the
    ///   authority; `AlreadyDelegated` covers direct callers of the record.
    pub fn arm(&mut self, mint: Pubkey, owner: Pubkey, bump: u8, mint_amount: u64) -> Result<()> {
        require!(mint_amount > 0, StreamError::InvalidMintAmount);

        if self.is_fresh() {
            self.mint = mint;
            self.owner = owner;
            self.bump = bump;
        } else {
            require_keys_eq!(self.owner, owner, StreamError::OwnerMismatch);
            require_keys_eq!(self.mint, mint, StreamError::InvalidDerivation);
            require!(!self.is_delegated(), StreamError::AlreadyDelegated);
        }

        self.mint_amount = mint_amount;
        self.status = DelegationStatus::Delegated;
        Ok(())
    }

    /// Moves the record back to `Idle` for `signer`.
    ///
    /// Ownership is checked before delegation state so a stranger always sees `NotOwner`.
    pub fn release(&mut self, signer: Pubkey) -> Result<()> {
        require_keys_eq!(self.owner, signer, StreamError::NotOwner);
        require!(self.is_delegated(), StreamError::DelegationNotActive);

        self.status = DelegationStatus::Idle;
        Ok(())
    }

    /// Books one `mint_to_self` and returns the amount to mint.
    pub fn record_mint(&mut self) -> Result<u64> {
        require!(self.is_delegated(), StreamError::DelegationNotActive);

        self.total_minted = self
            .total_minted
            .checked_add(self.mint_amount)
            .ok_or(StreamError::ArithmeticOverflow)?;
        Ok(self.mint_amount)
    }

    /// Seeds for `invoke_signed` as the Stream Authority.
    pub fn signer_seeds(&self) -> [&[u8]; 3] {
        [
            STREAM_AUTHORITY_SEED,
            self.mint.as_ref(),
            std::slice::from_ref(&self.bump),
        ]
    }
}
