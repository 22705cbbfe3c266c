use crate::program_error::ProgramFailure;
use solana_client::client_error::{ClientError, ClientErrorKind};
use solana_client::rpc_request::{RpcError, RpcResponseErrorData};
use solana_client::rpc_response::RpcSimulateTransactionResult;
use solana_pubkey::Pubkey;
use std::result::Result as StdResult;
use thiserror::Error as ThisError;

pub type Result<T> = StdResult<T, Error>;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Any(#[from] anyhow::Error),
    #[error("{}", verbose_solana_error(.0))]
    SolanaClient(#[from] ClientError),
    #[error(transparent)]
    Signer(#[from] solana_sdk::signer::SignerError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
    #[error(transparent)]
    Program(#[from] ProgramFailure),
    #[error("invalid seed for {kind}: missing `{field}`")]
    InvalidSeed {
        kind: &'static str,
        field: &'static str,
    },
    #[error("failed to decode {account} account {address}: {reason}")]
    Decode {
        account: &'static str,
        address: Pubkey,
        reason: String,
    },
    #[error("farm {0} does not exist")]
    FarmNotFound(Pubkey),
    #[error("stake receipt {0} does not exist")]
    StakeReceiptNotFound(Pubkey),
    #[error("stake receipt {0} is already closed")]
    StakeReceiptClosed(Pubkey),
    #[error("farm {0} has no lock without bonus")]
    NoBaseLock(Pubkey),
    #[error("at least one lock config is required")]
    EmptyLockConfigs,
    #[error("reward rate interval must be greater than zero")]
    ZeroRewardInterval,
    #[error("insufficient solana balance, needed={needed}; have={balance};")]
    InsufficientBalance { needed: u64, balance: u64 },
    #[error("invalid config: {0}")]
    Config(String),
}

impl Error {
    pub fn custom<E: Into<anyhow::Error>>(e: E) -> Self {
        Error::Any(e.into())
    }

    pub fn decode<E: std::fmt::Display>(account: &'static str, address: Pubkey, e: E) -> Self {
        Error::Decode {
            account,
            address,
            reason: e.to_string(),
        }
    }

    /// The typed protocol error, when this is a recognized program rejection.
    pub fn staking_error(&self) -> Option<crate::StakingError> {
        match self {
            Error::Program(ProgramFailure::Known(e)) => Some(*e),
            _ => None,
        }
    }
}

pub fn verbose_solana_error(err: &ClientError) -> String {
    use std::fmt::Write;
    if let ClientErrorKind::RpcError(RpcError::RpcResponseError {
        code,
        message,
        data,
    }) = err.kind()
    {
        let mut s = String::new();
        writeln!(s, "{} ({})", message, code).ok();
        if let RpcResponseErrorData::SendTransactionPreflightFailure(
            RpcSimulateTransactionResult {
                logs: Some(logs), ..
            },
        ) = data
        {
            for (i, log) in logs.iter().enumerate() {
                writeln!(s, "{}: {}", i + 1, log).ok();
            }
        }
        s
    } else {
        err.to_string()
    }
}
