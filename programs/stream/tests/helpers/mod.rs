//! Test helpers for the Stream program.

use anchor_lang::{
    solana_program::{
        account_info::AccountInfo, entrypoint::ProgramResult, instruction::Instruction,
        program_pack::Pack, pubkey::Pubkey, system_instruction,
    },
    AccountDeserialize, InstructionData, ToAccountMetas,
};
use anchor_spl::{
    associated_token,
    token::spl_token,
    token_2022::spl_token_2022::{
        self,
        extension::StateWithExtensions,
        state::{Account, Mint},
    },
};
use solana_program_test::{processor, BanksClientError, ProgramTest, ProgramTestContext};
use solana_sdk::{
    instruction::InstructionError,
    signature::{Keypair, Signer},
    system_program,
    transaction::{Transaction, TransactionError},
};
use stream::{StreamAuthority, StreamError};

pub const DECIMALS: u8 = 6;

// Anchor's entry ties every account to one lifetime; leak a copy to satisfy the builtin signature.
fn process_instruction<'a, 'b, 'c, 'd>(
    program_id: &'a Pubkey,
    accounts: &'b [AccountInfo<'c>],
    data: &'d [u8],
) -> ProgramResult {
    let accounts = Box::leak(Box::new(accounts.to_vec()));
    stream::entry(program_id, accounts, data)
}

/// Starts a bank with the Stream program running natively next to the bundled SPL programs.
pub async fn start() -> ProgramTestContext {
    let mut program_test = ProgramTest::new("stream", stream::ID, processor!(process_instruction));
    program_test.prefer_bpf(false);
    program_test.start_with_context().await
}

/// Signs with the context payer plus `signers` on a fresh blockhash and submits.
pub async fn send(
    context: &mut ProgramTestContext,
    instructions: &[Instruction],
    signers: &[&Keypair],
) -> Result<(), BanksClientError> {
    let blockhash = context.get_new_latest_blockhash().await.unwrap();
    let mut all_signers = vec![&context.payer];
    all_signers.extend_from_slice(signers);

    let tx = Transaction::new_signed_with_payer(
        instructions,
        Some(&context.payer.pubkey()),
        &all_signers,
        blockhash,
    );
    context.banks_client.process_transaction(tx).await
}

/// Transfers lamports from the context payer so `to` can sign as a rent payer.
pub async fn fund(context: &mut ProgramTestContext, to: &Pubkey, lamports: u64) {
    let ix = system_instruction::transfer(&context.payer.pubkey(), to, lamports);
    send(context, &[ix], &[]).await.unwrap();
}

/// Creates an SPL Token mint whose mint authority is `authority` and freeze authority is
/// `freeze_authority`.
pub async fn create_mint(
    context: &mut ProgramTestContext,
    authority: &Pubkey,
    freeze_authority: Option<&Pubkey>,
) -> Pubkey {
    create_mint_for(context, &spl_token::ID, authority, freeze_authority).await
}

/// Creates a mint owned by `token_program`, SPL Token or Token-2022.
pub async fn create_mint_for(
    context: &mut ProgramTestContext,
    token_program: &Pubkey,
    authority: &Pubkey,
    freeze_authority: Option<&Pubkey>,
) -> Pubkey {
    let mint = Keypair::new();
    let rent = context.banks_client.get_rent().await.unwrap();
    let space = Mint::LEN;

    let instructions = [
        system_instruction::create_account(
            &context.payer.pubkey(),
            &mint.pubkey(),
            rent.minimum_balance(space),
            space as u64,
            token_program,
        ),
        // Token-2022 accepts both program ids and encodes InitializeMint identically.
        spl_token_2022::instruction::initialize_mint(
            token_program,
            &mint.pubkey(),
            authority,
            freeze_authority,
            DECIMALS,
        )
        .unwrap(),
    ];
    send(context, &instructions, &[&mint]).await.unwrap();

    mint.pubkey()
}

/// Creates a mint controlled entirely by the context payer, like a freshly issued token.
pub async fn create_payer_mint(context: &mut ProgramTestContext) -> Pubkey {
    let payer = context.payer.pubkey();
    create_mint(context, &payer, Some(&payer)).await
}

pub fn stream_authority(mint: &Pubkey) -> Pubkey {
    stream::find_stream_authority_address(mint).0
}

pub fn give_authority_ix(mint: &Pubkey, payer: &Pubkey, mint_amount: u64) -> Instruction {
    give_authority_ix_for(&spl_token::ID, mint, payer, mint_amount)
}

pub fn give_authority_ix_for(
    token_program: &Pubkey,
    mint: &Pubkey,
    payer: &Pubkey,
    mint_amount: u64,
) -> Instruction {
    Instruction {
        program_id: stream::ID,
        accounts: stream::accounts::GiveAuthority {
            mint: *mint,
            stream_authority: stream_authority(mint),
            payer: *payer,
            token_program: *token_program,
            system_program: system_program::ID,
        }
        .to_account_metas(None),
        data: stream::instruction::GiveAuthority { mint_amount }.data(),
    }
}

pub fn reclaim_authority_ix(mint: &Pubkey, user: &Pubkey) -> Instruction {
    reclaim_authority_ix_for(&spl_token::ID, mint, user)
}

pub fn reclaim_authority_ix_for(
    token_program: &Pubkey,
    mint: &Pubkey,
    user: &Pubkey,
) -> Instruction {
    Instruction {
        program_id: stream::ID,
        accounts: stream::accounts::ReclaimAuthority {
            mint: *mint,
            stream_authority: stream_authority(mint),
            user: *user,
            token_program: *token_program,
        }
        .to_account_metas(None),
        data: stream::instruction::ReclaimAuthority {}.data(),
    }
}

pub fn mint_to_self_ix(mint: &Pubkey, payer: &Pubkey) -> Instruction {
    mint_to_self_ix_for(&spl_token::ID, mint, payer)
}

pub fn mint_to_self_ix_for(
    token_program: &Pubkey,
    mint: &Pubkey,
    payer: &Pubkey,
) -> Instruction {
    Instruction {
        program_id: stream::ID,
        accounts: stream::accounts::MintToSelf {
            token: associated_token_address_for(token_program, mint, payer),
            mint: *mint,
            payer: *payer,
            stream_authority: stream_authority(mint),
            system_program: system_program::ID,
            token_program: *token_program,
            associated_token_program: associated_token::ID,
        }
        .to_account_metas(None),
        data: stream::instruction::MintToSelf {}.data(),
    }
}

pub fn associated_token_address(mint: &Pubkey, wallet: &Pubkey) -> Pubkey {
    associated_token_address_for(&spl_token::ID, mint, wallet)
}

pub fn associated_token_address_for(
    token_program: &Pubkey,
    mint: &Pubkey,
    wallet: &Pubkey,
) -> Pubkey {
    associated_token::get_associated_token_address_with_program_id(wallet, mint, token_program)
}

/// Reads a mint of either token program; extensions are skipped.
pub async fn get_mint(context: &mut ProgramTestContext, mint: &Pubkey) -> Mint {
    let account = context.banks_client.get_account(*mint).await.unwrap().unwrap();
    StateWithExtensions::<Mint>::unpack(&account.data).unwrap().base
}

/// Reads a token account of either token program; Token-2022 ATAs carry `ImmutableOwner`.
pub async fn get_token_account(
    context: &mut ProgramTestContext,
    address: &Pubkey,
) -> Option<Account> {
    let account = context.banks_client.get_account(*address).await.unwrap()?;
    Some(StateWithExtensions::<Account>::unpack(&account.data).unwrap().base)
}

pub async fn get_stream_authority(
    context: &mut ProgramTestContext,
    mint: &Pubkey,
) -> Option<StreamAuthority> {
    let account = context
        .banks_client
        .get_account(stream_authority(mint))
        .await
        .unwrap()?;
    Some(StreamAuthority::try_deserialize(&mut account.data.as_slice()).unwrap())
}

/// Asserts that `result` failed with the Stream program's custom `expected` error.
pub fn assert_stream_error(result: Result<(), BanksClientError>, expected: StreamError) {
    let err = result.expect_err("transaction should have been rejected");
    match err.unwrap() {
        TransactionError::InstructionError(_, InstructionError::Custom(code)) => {
            assert_eq!(code, u32::from(expected), "unexpected error code {code}");
        }
        other => panic!("unexpected transaction error: {other:?}"),
    }
}
