//! Client-side composition layer for the gem staking program.
//!
//! Program ID: `3LrsNgisAKcHHdqhaea7b34TrhNBFVdT8gt7zBCCBngi`
//!
//! Direct instruction construction (no SDK crate dependency).
//! Computes Anchor discriminators via SHA-256 and borsh-serializes args manually.

use solana_pubkey::Pubkey;

pub mod config;
pub mod creator;
pub mod error;
pub mod instructions;
pub mod ledger;
pub mod pda;
pub mod program_error;
pub mod state;
pub mod submit;

pub use error::{Error, Result};
pub use instructions::StakingClient;
pub use program_error::{ProgramFailure, StakingError, translate_error};

/// Staking program ID (mainnet production)
pub const ID: Pubkey = solana_pubkey::pubkey!("3LrsNgisAKcHHdqhaea7b34TrhNBFVdT8gt7zBCCBngi");

pub mod prelude {
    pub use crate::creator::{MetadataService, TokenKind};
    pub use crate::ledger::Ledger;
    pub use crate::{Error, Result, StakingClient};
    pub use async_trait::async_trait;
    pub use solana_pubkey::Pubkey;
    pub use solana_sdk::instruction::{AccountMeta, Instruction};
    pub use std::sync::Arc;
}

#[cfg(test)]
pub(crate) mod test_utils;
