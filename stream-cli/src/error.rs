use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to load solana config {path}: {source}")]
    Config {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read keypair {path}: {reason}")]
    Keypair { path: String, reason: String },

    #[error("invalid commitment level {0:?}")]
    Commitment(String),

    #[error("keypair path is not valid UTF-8")]
    KeypairPathEncoding,

    #[error(transparent)]
    Client(#[from] anchor_client::ClientError),
}
