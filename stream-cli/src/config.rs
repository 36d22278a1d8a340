use std::str::FromStr;

use anchor_client::solana_sdk::{
    commitment_config::CommitmentConfig,
    pubkey::Pubkey,
    signature::{read_keypair_file, Keypair},
};
use clap::Args;
use log::debug;
use solana_clap_utils::input_validators::normalize_to_url_if_moniker;
use solana_cli_config::{Config, CONFIG_FILE};

use crate::error::CliError;

/// Options shared by every subcommand. Flags win over the Solana CLI config file.
#[derive(Args, Debug, Clone)]
pub struct GlobalOpts {
    /// Solana CLI config file [default: ~/.config/solana/cli/config.yml]
    #[arg(short = 'C', long, global = true)]
    pub config: Option<String>,

    /// RPC URL or moniker (mainnet-beta, devnet, testnet, localhost)
    #[arg(short = 'u', long, global = true)]
    pub url: Option<String>,

    /// Fee payer and signer keypair file
    #[arg(short = 'k', long, global = true)]
    pub keypair: Option<String>,

    /// Stream program id
    #[arg(long, global = true)]
    pub program_id: Option<Pubkey>,

    /// Token program that owns the mint
    #[arg(long, global = true, default_value_t = anchor_spl::token::ID)]
    pub token_program: Pubkey,
}

/// Fully resolved connection settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub rpc_url: String,
    pub ws_url: String,
    pub keypair_path: String,
    pub commitment: CommitmentConfig,
    pub program_id: Pubkey,
    pub token_program: Pubkey,
}

impl Settings {
    pub fn resolve(opts: &GlobalOpts) -> Result<Self, CliError> {
        let config = load_config(opts.config.as_deref())?;

        let (rpc_url, ws_url) = match &opts.url {
            Some(url) => {
                let rpc_url = normalize_to_url_if_moniker(url);
                let ws_url = Config::compute_websocket_url(&rpc_url);
                (rpc_url, ws_url)
            }
            None if config.websocket_url.is_empty() => {
                let ws_url = Config::compute_websocket_url(&config.json_rpc_url);
                (config.json_rpc_url.clone(), ws_url)
            }
            None => (config.json_rpc_url.clone(), config.websocket_url.clone()),
        };

        let commitment = CommitmentConfig::from_str(&config.commitment)
            .map_err(|_| CliError::Commitment(config.commitment.clone()))?;

        Ok(Self {
            rpc_url,
            ws_url,
            keypair_path: opts.keypair.clone().unwrap_or(config.keypair_path),
            commitment,
            program_id: opts.program_id.unwrap_or(stream::ID),
            token_program: opts.token_program,
        })
    }

    pub fn load_keypair(&self) -> Result<Keypair, CliError> {
        let path = String::from_utf8(tilde_expand::tilde_expand(self.keypair_path.as_bytes()))
            .map_err(|_| CliError::KeypairPathEncoding)?;
        debug!("Loading keypair from {path}");

        read_keypair_file(&path).map_err(|e| CliError::Keypair {
            path,
            reason: e.to_string(),
        })
    }
}

fn load_config(path: Option<&str>) -> Result<Config, CliError> {
    match path {
        Some(path) => Config::load(path).map_err(|source| CliError::Config {
            path: path.to_owned(),
            source,
        }),
        // A missing default config is normal on fresh machines.
        None => Ok(CONFIG_FILE
            .as_ref()
            .and_then(|path| Config::load(path).ok())
            .unwrap_or_default()),
    }
}
