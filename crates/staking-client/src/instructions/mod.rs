//! Instruction composition for the staking program.
//!
//! Each submodule has a pure builder taking already-derived inputs, and a
//! `StakingClient` method that reads whatever ledger state the instruction
//! depends on and then calls the builder. Nothing here submits.

use crate::{
    Error, ID, Result,
    creator::MetadataService,
    ledger::{Ledger, fetch},
    state::Farm,
};
use borsh::BorshSerialize;
use sha2::{Digest, Sha256};
use solana_pubkey::Pubkey;
use solana_sdk::instruction::{AccountMeta, Instruction};

pub mod add_manager;
pub mod claim_rewards;
pub mod create_farm;
pub mod create_locks;
pub mod fund_reward;
pub mod initialize_farmer;
pub mod objects;
pub mod stake;
pub mod unstake;
pub mod whitelist;

pub use crate::pda::{ASSOCIATED_TOKEN_PROGRAM_ID, TOKEN_PROGRAM_ID};

pub const SYSTEM_PROGRAM_ID: Pubkey = solana_pubkey::pubkey!("11111111111111111111111111111111");

pub const RENT_SYSVAR_ID: Pubkey =
    solana_pubkey::pubkey!("SysvarRent111111111111111111111111111111111");

/// Compute Anchor 8-byte instruction discriminator: sha256("global:{name}")[..8]
pub fn anchor_discriminator(name: &str) -> [u8; 8] {
    let hash = Sha256::digest(format!("global:{}", name).as_bytes());
    let mut disc = [0u8; 8];
    disc.copy_from_slice(&hash[..8]);
    disc
}

/// Build an instruction for the staking program: discriminator + borsh args.
pub fn build_instruction<A: BorshSerialize>(
    name: &str,
    accounts: Vec<AccountMeta>,
    args: &A,
) -> Instruction {
    let mut data = anchor_discriminator(name).to_vec();
    args.serialize(&mut data).ok();
    Instruction {
        program_id: ID,
        accounts,
        data,
    }
}

/// Instructions that must land in the same transaction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AtomicGroup {
    pub instructions: Vec<Instruction>,
}

impl AtomicGroup {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

impl IntoIterator for AtomicGroup {
    type Item = Instruction;
    type IntoIter = std::vec::IntoIter<Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.into_iter()
    }
}

/// Composes staking program instructions from user intents.
#[derive(Debug, Clone)]
pub struct StakingClient<L, M> {
    pub ledger: L,
    pub metadata: M,
}

impl<L: Ledger, M: MetadataService> StakingClient<L, M> {
    pub fn new(ledger: L, metadata: M) -> Self {
        Self { ledger, metadata }
    }

    pub(crate) async fn fetch_farm(&self, farm: &Pubkey) -> Result<Farm> {
        fetch::<Farm>(&self.ledger, farm)
            .await?
            .ok_or(Error::FarmNotFound(*farm))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ledger::MemoryLedger,
        test_utils::{MapMetadata, insert_farm},
    };

    #[test]
    fn test_instruction_discriminators() {
        let expected: [(&str, [u8; 8]); 8] = [
            ("create_farm", [74, 59, 128, 160, 87, 174, 153, 194]),
            ("add_manager", [125, 38, 192, 212, 101, 91, 179, 16]),
            ("create_locks", [116, 223, 225, 220, 25, 137, 7, 164]),
            ("stake", [206, 176, 202, 18, 200, 209, 179, 108]),
            ("unstake", [90, 95, 107, 42, 205, 124, 50, 225]),
            ("claim_rewards", [4, 144, 132, 71, 116, 23, 151, 80]),
            ("add_object", [192, 248, 138, 97, 45, 229, 187, 212]),
            ("remove_object", [2, 190, 222, 128, 105, 24, 9, 23]),
        ];
        for (name, disc) in expected {
            assert_eq!(anchor_discriminator(name), disc, "{}", name);
        }
    }

    #[test]
    fn test_build_instruction_data() {
        let ix = build_instruction("stake", vec![], &42u64);
        assert_eq!(ix.program_id, ID);
        assert_eq!(&ix.data[..8], &anchor_discriminator("stake"));
        assert_eq!(&ix.data[8..], &42u64.to_le_bytes());

        let ix = build_instruction("unstake", vec![], &());
        assert_eq!(ix.data.len(), 8);
    }

    #[tokio::test]
    async fn test_fetch_farm() {
        let ledger = MemoryLedger::default();
        let farm = insert_farm(&ledger);
        let client = StakingClient::new(&ledger, MapMetadata::default());

        let state = client.fetch_farm(&farm.address).await.unwrap();
        assert_eq!(state.authority, farm.authority);
        assert_eq!(state.reward.mint, farm.reward_mint);

        let missing = Pubkey::new_unique();
        let err = client.fetch_farm(&missing).await.unwrap_err();
        assert!(matches!(err, Error::FarmNotFound(f) if f == missing));
    }
}
