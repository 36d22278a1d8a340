use anchor_lang::prelude::*;

#[event]
pub struct AuthorityGiven {
    pub mint: Pubkey,
    pub owner: Pubkey,
    pub stream_authority: Pubkey,
    pub mint_amount: u64,
}

#[event]
pub struct AuthorityReclaimed {
    pub mint: Pubkey,
    pub owner: Pubkey,
    pub stream_authority: Pubkey,
}

#[event]
pub struct MintedToSelf {
    pub mint: Pubkey,
    pub recipient: Pubkey,
    pub token_account: Pubkey,
    pub amount: u64,
    pub total_minted: u64,
}
