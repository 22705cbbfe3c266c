//! Custom error codes of the staking program.
//!
//! Anchor numbers custom errors from 6000 in declaration order. This table has
//! to match the deployed program's error enum exactly.

use solana_client::client_error::ClientError;
use solana_sdk::{instruction::InstructionError, transaction::TransactionError};
use thiserror::Error as ThisError;

#[derive(Debug, ThisError, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum StakingError {
    #[error("Cooldown is not over yet.")]
    CooldownIsNotOver = 6000,
    #[error("Insufficient reward funds. Could not reserve.")]
    CouldNotReserveReward = 6001,
    #[error("Insufficient reserved reward. Could not release.")]
    CouldNotReleaseReward = 6002,
    #[error("Cannot unstake while the gem is still locked.")]
    GemStillLocked = 6003,
    #[error("Must unstake before staking again.")]
    GemStillStaked = 6004,
    #[error("Attempt to operate on a gem that is no longer staked.")]
    GemNotStaked = 6005,
    #[error("This mint or creator has not been whitelisted.")]
    AddressNotWhitelisted = 6006,
    #[error("Invalid whitelist type.")]
    InvalidWhitelistType = 6007,
    #[error("Remove all the objects before unstaking.")]
    GemStillHasObjects = 6008,
    #[error("Object not found.")]
    ObjectNotFound = 6009,
    #[error("Maximum number of objects exceeded.")]
    MaxObjectsExceeded = 6010,
    #[error("An arithmetic error occurred.")]
    ArithmeticError = 6011,
}

impl StakingError {
    pub const ALL: [StakingError; 12] = [
        StakingError::CooldownIsNotOver,
        StakingError::CouldNotReserveReward,
        StakingError::CouldNotReleaseReward,
        StakingError::GemStillLocked,
        StakingError::GemStillStaked,
        StakingError::GemNotStaked,
        StakingError::AddressNotWhitelisted,
        StakingError::InvalidWhitelistType,
        StakingError::GemStillHasObjects,
        StakingError::ObjectNotFound,
        StakingError::MaxObjectsExceeded,
        StakingError::ArithmeticError,
    ];

    pub fn code(self) -> u32 {
        self as u32
    }

    pub fn name(self) -> &'static str {
        match self {
            StakingError::CooldownIsNotOver => "CooldownIsNotOver",
            StakingError::CouldNotReserveReward => "CouldNotReserveReward",
            StakingError::CouldNotReleaseReward => "CouldNotReleaseReward",
            StakingError::GemStillLocked => "GemStillLocked",
            StakingError::GemStillStaked => "GemStillStaked",
            StakingError::GemNotStaked => "GemNotStaked",
            StakingError::AddressNotWhitelisted => "AddressNotWhitelisted",
            StakingError::InvalidWhitelistType => "InvalidWhitelistType",
            StakingError::GemStillHasObjects => "GemStillHasObjects",
            StakingError::ObjectNotFound => "ObjectNotFound",
            StakingError::MaxObjectsExceeded => "MaxObjectsExceeded",
            StakingError::ArithmeticError => "ArithmeticError",
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.code() == code)
    }
}

/// Look up a program error code. Unknown codes map to `None`.
pub fn translate_error(code: u32) -> Option<StakingError> {
    StakingError::from_code(code)
}

/// A rejected submission, typed when the code is in the table.
#[derive(Debug, ThisError, Clone, PartialEq, Eq)]
pub enum ProgramFailure {
    #[error("{}: {}", .0.code(), .0)]
    Known(StakingError),
    #[error("unrecognized program error {code}: {message}")]
    Unrecognized { code: u32, message: String },
}

impl ProgramFailure {
    pub fn from_code(code: u32, message: impl Into<String>) -> Self {
        match translate_error(code) {
            Some(e) => ProgramFailure::Known(e),
            None => ProgramFailure::Unrecognized {
                code,
                message: message.into(),
            },
        }
    }

    pub fn code(&self) -> u32 {
        match self {
            ProgramFailure::Known(e) => e.code(),
            ProgramFailure::Unrecognized { code, .. } => *code,
        }
    }
}

/// Custom instruction error code carried by a failed transaction, if any.
pub fn custom_code(err: &TransactionError) -> Option<u32> {
    match err {
        TransactionError::InstructionError(_, InstructionError::Custom(code)) => Some(*code),
        _ => None,
    }
}

/// Extract the program failure from an RPC error.
///
/// Returns `None` for transport errors and for transaction errors that are not
/// custom program errors.
pub fn program_failure(err: &ClientError) -> Option<ProgramFailure> {
    let tx_error = err.get_transaction_error()?;
    let code = custom_code(&tx_error)?;
    Some(ProgramFailure::from_code(code, tx_error.to_string()))
}
