use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_2022::spl_token_2022::instruction::AuthorityType,
    token_interface::{
        self, FreezeAccount, Mint, MintTo, SetAuthority, TokenAccount, TokenInterface,
    },
};

use crate::{
    events::{AuthorityGiven, AuthorityReclaimed, MintedToSelf},
    guard::{load_stream_authority, store_stream_authority},
    StreamAuthority, StreamError, STREAM_AUTHORITY_SEED,
};

// Mint and freeze authority are always delegated and reclaimed together.
const DELEGATED_AUTHORITIES: [AuthorityType; 2] =
    [AuthorityType::MintTokens, AuthorityType::FreezeAccount];

/// Delegates the mint's authorities to the Stream Authority PDA.
///
/// **Business Logic:**
/// - Creates the Stream Authority record on first use, pinning the caller as owner.
/// - Re-arms an existing record only for the owner pinned at first delegation.
/// - Moves mint and freeze authority from the caller to the PDA via Token CPI.
pub fn give_authority(ctx: Context<GiveAuthority>, mint_amount: u64) -> Result<()> {
    let mint = ctx.accounts.mint.key();
    let owner = ctx.accounts.payer.key();
    let stream_authority = ctx.accounts.stream_authority.key();

    ctx.accounts
        .stream_authority
        .arm(mint, owner, ctx.bumps.stream_authority, mint_amount)?;

    for authority_type in DELEGATED_AUTHORITIES {
        token_interface::set_authority(
            ctx.accounts.set_authority_ctx(),
            authority_type,
            Some(stream_authority),
        )?;
    }
    msg!("Mint {} delegated to stream authority {}", mint, stream_authority);

    emit!(AuthorityGiven {
        mint,
        owner,
        stream_authority,
        mint_amount,
    });

    Ok(())
}

/// Returns the mint's authorities from the Stream Authority PDA to the record owner.
///
/// **Business Logic:**
/// - The signer must be the owner recorded at first delegation.
/// - The PDA signs the Token CPI with the stored bump; the record is kept for re-delegation.
pub fn reclaim_authority(ctx: Context<ReclaimAuthority>) -> Result<()> {
    let accounts = &ctx.accounts;
    let mint = accounts.mint.key();
    let user = accounts.user.key();
    let stream_authority = accounts.stream_authority.to_account_info();

    let mut record = load_stream_authority(&stream_authority, &mint)?;
    record.release(user)?;
    require!(
        is_delegated_to(&accounts.mint, stream_authority.key),
        StreamError::DelegationNotActive
    );

    let seeds = record.signer_seeds();
    let signer = &[&seeds[..]];
    for authority_type in DELEGATED_AUTHORITIES {
        token_interface::set_authority(
            CpiContext::new_with_signer(
                accounts.token_program.to_account_info(),
                SetAuthority {
                    account_or_mint: accounts.mint.to_account_info(),
                    current_authority: stream_authority.clone(),
                },
                signer,
            ),
            authority_type,
            Some(user),
        )?;
    }

    store_stream_authority(&stream_authority, &record)?;
    msg!("Mint {} authority reclaimed by {}", mint, user);

    emit!(AuthorityReclaimed {
        mint,
        owner: user,
        stream_authority: stream_authority.key(),
    });

    Ok(())
}

/// Mints `mint_amount` units to the caller's associated token account and freezes it.
///
/// **Business Logic:**
/// - Requires an active delegation; the Stream Authority signs both the mint and the freeze.
/// - A holder whose account already carries a balance is rejected.
pub fn mint_to_self(ctx: Context<MintToSelf>) -> Result<()> {
    let accounts = &ctx.accounts;
    let mint = accounts.mint.key();
    let stream_authority = accounts.stream_authority.to_account_info();

    let mut record = load_stream_authority(&stream_authority, &mint)?;
    let amount = record.record_mint()?;
    require!(
        is_delegated_to(&accounts.mint, stream_authority.key),
        StreamError::DelegationNotActive
    );
    require!(accounts.token.amount == 0, StreamError::AlreadyMinted);

    let seeds = record.signer_seeds();
    let signer = &[&seeds[..]];

    token_interface::mint_to(
        CpiContext::new_with_signer(
            accounts.token_program.to_account_info(),
            MintTo {
                mint: accounts.mint.to_account_info(),
                to: accounts.token.to_account_info(),
                authority: stream_authority.clone(),
            },
            signer,
        ),
        amount,
    )?;

    token_interface::freeze_account(CpiContext::new_with_signer(
        accounts.token_program.to_account_info(),
        FreezeAccount {
            account: accounts.token.to_account_info(),
            mint: accounts.mint.to_account_info(),
            authority: stream_authority.clone(),
        },
        signer,
    ))?;

    store_stream_authority(&stream_authority, &record)?;
    msg!("Minted {} frozen units of {} to {}", amount, mint, accounts.token.key());

    emit!(MintedToSelf {
        mint,
        recipient: accounts.payer.key(),
        token_account: accounts.token.key(),
        amount,
        total_minted: record.total_minted,
    });

    Ok(())
}

/// True while `stream_authority` holds both the mint and the freeze authority of `mint`.
fn is_delegated_to(mint: &Mint, stream_authority: &Pubkey) -> bool {
    mint.mint_authority.contains(stream_authority)
        && mint.freeze_authority.contains(stream_authority)
}

/// Accounts required to delegate a mint to its Stream Authority.
///
/// **Business Logic:**
/// - The payer must currently hold both the mint and the freeze authority.
/// - The Stream Authority record is created on first delegation and reused afterwards.
#[derive(Accounts)]
pub struct GiveAuthority<'info> {
    #[account(
        mut,
        mint::token_program = token_program,
        constraint = mint.mint_authority.contains(&payer.key()) @ StreamError::UnauthorizedDelegation,
        constraint = mint.freeze_authority.contains(&payer.key()) @ StreamError::UnauthorizedDelegation,
    )]
    pub mint: InterfaceAccount<'info, Mint>, // The mint whose authorities are delegated.
    #[account(
        init_if_needed,
        payer = payer,
        space = 8 + StreamAuthority::INIT_SPACE,
        seeds = [STREAM_AUTHORITY_SEED, mint.key().as_ref()],
        bump
    )]
    pub stream_authority: Account<'info, StreamAuthority>, // Record and PDA signer for the mint.
    #[account(mut)]
    pub payer: Signer<'info>, // Current mint authority, becomes the record owner.
    pub token_program: Interface<'info, TokenInterface>, // SPL Token or Token-2022.
    pub system_program: Program<'info, System>, // Solana System program.
}

impl<'info> GiveAuthority<'info> {
    fn set_authority_ctx(&self) -> CpiContext<'_, '_, '_, 'info, SetAuthority<'info>> {
        let accounts = SetAuthority {
            account_or_mint: self.mint.to_account_info(),
            current_authority: self.payer.to_account_info(),
        };
        CpiContext::new(self.token_program.to_account_info(), accounts)
    }
}

/// Accounts required to reclaim a delegated mint.
///
/// The Stream Authority is taken unchecked so a missing record reports `RecordNotFound`.
#[derive(Accounts)]
pub struct ReclaimAuthority<'info> {
    #[account(mut, mint::token_program = token_program)]
    pub mint: InterfaceAccount<'info, Mint>, // The delegated mint.
    /// CHECK: owner, discriminator and derivation are verified by `load_stream_authority`.
    #[account(mut)]
    pub stream_authority: UncheckedAccount<'info>, // Stream Authority record of `mint`.
    pub user: Signer<'info>, // Must match the record owner.
    pub token_program: Interface<'info, TokenInterface>, // SPL Token or Token-2022.
}

/// Accounts required to mint a frozen balance to the caller.
#[derive(Accounts)]
pub struct MintToSelf<'info> {
    #[account(
        init_if_needed,
        payer = payer,
        associated_token::token_program = token_program,
        associated_token::mint = mint,
        associated_token::authority = payer,
    )]
    pub token: InterfaceAccount<'info, TokenAccount>, // Caller's associated token account.
    #[account(mut, mint::token_program = token_program)]
    pub mint: InterfaceAccount<'info, Mint>, // The delegated mint.
    #[account(mut)]
    pub payer: Signer<'info>, // Recipient and rent payer.
    /// CHECK: owner, discriminator and derivation are verified by `load_stream_authority`.
    #[account(mut)]
    pub stream_authority: UncheckedAccount<'info>, // Stream Authority record of `mint`.
    pub system_program: Program<'info, System>, // Solana System program.
    pub token_program: Interface<'info, TokenInterface>, // SPL Token or Token-2022.
    pub associated_token_program: Program<'info, AssociatedToken>, // Associated Token program.
}
