use std::{process, sync::Arc};

use anchor_client::{
    solana_client::{
        client_error::ClientErrorKind::RpcError,
        rpc_request::{RpcError as SolanaRpcError, RpcResponseErrorData},
    },
    solana_sdk::{pubkey::Pubkey, signature::Keypair, system_program},
    Client, ClientError, Cluster, Program,
};
use clap::{Parser, Subcommand};
use log::{error, info};
use stream::{find_stream_authority_address_for, StreamAuthority};

mod config;
mod error;

use config::{GlobalOpts, Settings};
use error::CliError;

/// Operator tool for the Stream program.
#[derive(Parser, Debug)]
#[command(name = "stream-cli", version, about)]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// Print the Stream Authority address and bump for a mint
    Derive { mint: Pubkey },
    /// Delegate the mint and freeze authority of a mint to its Stream Authority
    GiveAuthority {
        mint: Pubkey,
        /// Units minted to each holder by mint-to-self
        #[arg(long, default_value_t = stream::DEFAULT_MINT_AMOUNT)]
        amount: u64,
    },
    /// Return the mint and freeze authority to the record owner
    ReclaimAuthority { mint: Pubkey },
    /// Mint the configured amount to your associated token account and freeze it
    MintToSelf { mint: Pubkey },
    /// Show the Stream Authority record for a mint
    Status { mint: Pubkey },
}

type StreamProgram = Program<Arc<Keypair>>;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Cli::parse()).await {
        error!("{e}");
        if let CliError::Client(client_error) = &e {
            print_transaction_logs(client_error);
        }
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Derive { mint } => {
            derive(&mint, &cli.global.program_id.unwrap_or(stream::ID));
            Ok(())
        }
        Command::GiveAuthority { mint, amount } => {
            let (settings, program) = connect(&cli.global)?;
            give_authority(&program, &settings, mint, amount).await
        }
        Command::ReclaimAuthority { mint } => {
            let (settings, program) = connect(&cli.global)?;
            reclaim_authority(&program, &settings, mint).await
        }
        Command::MintToSelf { mint } => {
            let (settings, program) = connect(&cli.global)?;
            mint_to_self(&program, &settings, mint).await
        }
        Command::Status { mint } => {
            let (_, program) = connect(&cli.global)?;
            status(&program, mint).await
        }
    }
}

fn connect(opts: &GlobalOpts) -> Result<(Settings, StreamProgram), CliError> {
    let settings = Settings::resolve(opts)?;
    info!("Using RPC {} with program {}", settings.rpc_url, settings.program_id);

    let payer = Arc::new(settings.load_keypair()?);
    let cluster = Cluster::Custom(settings.rpc_url.clone(), settings.ws_url.clone());
    let client = Client::new_with_options(cluster, payer, settings.commitment);
    let program = client.program(settings.program_id)?;

    Ok((settings, program))
}

fn derive(mint: &Pubkey, program_id: &Pubkey) {
    let (stream_authority, bump) = find_stream_authority_address_for(mint, program_id);

    println!("Stream authority: {stream_authority}");
    println!("Bump: {bump}");
}

async fn give_authority(
    program: &StreamProgram,
    settings: &Settings,
    mint: Pubkey,
    amount: u64,
) -> Result<(), CliError> {
    let (stream_authority, _) = find_stream_authority_address_for(&mint, &program.id());
    info!("Delegating {mint} to {stream_authority}, {amount} units per holder");

    let sig = program
        .request()
        .accounts(stream::accounts::GiveAuthority {
            mint,
            stream_authority,
            payer: program.payer(),
            token_program: settings.token_program,
            system_program: system_program::ID,
        })
        .args(stream::instruction::GiveAuthority {
            mint_amount: amount,
        })
        .send()
        .await?;
    println!("Success! Authority given. Tx signature: {sig}");

    status(program, mint).await
}

async fn reclaim_authority(
    program: &StreamProgram,
    settings: &Settings,
    mint: Pubkey,
) -> Result<(), CliError> {
    let (stream_authority, _) = find_stream_authority_address_for(&mint, &program.id());

    let sig = program
        .request()
        .accounts(stream::accounts::ReclaimAuthority {
            mint,
            stream_authority,
            user: program.payer(),
            token_program: settings.token_program,
        })
        .args(stream::instruction::ReclaimAuthority {})
        .send()
        .await?;
    println!("Success! Authority reclaimed. Tx signature: {sig}");

    Ok(())
}

async fn mint_to_self(
    program: &StreamProgram,
    settings: &Settings,
    mint: Pubkey,
) -> Result<(), CliError> {
    let (stream_authority, _) = find_stream_authority_address_for(&mint, &program.id());
    let token = anchor_spl::associated_token::get_associated_token_address_with_program_id(
        &program.payer(),
        &mint,
        &settings.token_program,
    );
    info!("Minting {mint} to {token}");

    let sig = program
        .request()
        .accounts(stream::accounts::MintToSelf {
            token,
            mint,
            payer: program.payer(),
            stream_authority,
            system_program: system_program::ID,
            token_program: settings.token_program,
            associated_token_program: anchor_spl::associated_token::ID,
        })
        .args(stream::instruction::MintToSelf {})
        .send()
        .await?;
    println!("Success! Minted to {token}. Tx signature: {sig}");

    Ok(())
}

async fn status(program: &StreamProgram, mint: Pubkey) -> Result<(), CliError> {
    let (stream_authority, _) = find_stream_authority_address_for(&mint, &program.id());

    let record: StreamAuthority = match program.account(stream_authority).await {
        Ok(record) => record,
        Err(ClientError::AccountNotFound) => {
            println!("No stream authority record for {mint} at {stream_authority}");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!("Stream authority: {stream_authority}");
    println!("Mint: {}", record.mint);
    println!("Owner: {}", record.owner);
    println!("Bump: {}", record.bump);
    println!("Status: {:?}", record.status);
    println!("Mint amount: {}", record.mint_amount);
    println!("Total minted: {}", record.total_minted);

    Ok(())
}

fn print_transaction_logs(e: &ClientError) {
    if let ClientError::SolanaClientError(solana_err) = e {
        if let RpcError(SolanaRpcError::RpcResponseError { data, .. }) = &solana_err.kind {
            match data {
                RpcResponseErrorData::SendTransactionPreflightFailure(result) => {
                    if let Some(err) = &result.err {
                        error!("Preflight failed: {err}");
                    }
                    for line in result.logs.iter().flatten() {
                        error!("  {line}");
                    }
                }
                RpcResponseErrorData::Empty => {}
                other => error!("RPC error data: {other:?}"),
            }
        }
    }
}
