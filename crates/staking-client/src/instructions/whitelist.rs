use super::{SYSTEM_PROGRAM_ID, StakingClient, build_instruction};
use crate::{
    Error, Result,
    creator::MetadataService,
    ledger::Ledger,
    pda::{find_farm_manager, find_whitelist_proof},
    state::WhitelistType,
};
use borsh::BorshSerialize;
use solana_pubkey::Pubkey;
use solana_sdk::instruction::{AccountMeta, Instruction};

pub const ADD_NAME: &str = "add_to_whitelist";
pub const REMOVE_NAME: &str = "remove_from_whitelist";

/// Reward paid per staked gem, as an amount over an interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardRate {
    pub token_amount: u64,
    pub interval_in_seconds: u64,
}

impl RewardRate {
    /// Tokens per second, rounded down.
    pub fn per_second(&self) -> Result<u64> {
        self.token_amount
            .checked_div(self.interval_in_seconds)
            .ok_or(Error::ZeroRewardInterval)
    }
}

#[derive(BorshSerialize)]
struct AddToWhitelistArgs {
    reward_rate: u64,
    whitelist_type: WhitelistType,
}

pub fn build_add(
    farm: &Pubkey,
    authority: &Pubkey,
    creator_or_mint: &Pubkey,
    whitelist_type: WhitelistType,
    reward_rate: u64,
) -> Instruction {
    let farm_manager = find_farm_manager(farm, authority);
    let whitelist_proof = find_whitelist_proof(farm, creator_or_mint);

    let accounts = vec![
        AccountMeta::new_readonly(*farm, false),
        AccountMeta::new_readonly(farm_manager, false),
        AccountMeta::new_readonly(*creator_or_mint, false),
        AccountMeta::new(whitelist_proof, false),
        AccountMeta::new(*authority, true),
        AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
    ];

    build_instruction(
        ADD_NAME,
        accounts,
        &AddToWhitelistArgs {
            reward_rate,
            whitelist_type,
        },
    )
}

pub fn build_remove(farm: &Pubkey, authority: &Pubkey, address: &Pubkey) -> Instruction {
    let farm_manager = find_farm_manager(farm, authority);
    let whitelist_proof = find_whitelist_proof(farm, address);

    let accounts = vec![
        AccountMeta::new_readonly(*farm, false),
        AccountMeta::new_readonly(farm_manager, false),
        AccountMeta::new(whitelist_proof, false),
        AccountMeta::new(*authority, true),
        AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
    ];

    build_instruction(REMOVE_NAME, accounts, &())
}

impl<L: Ledger, M: MetadataService> StakingClient<L, M> {
    pub async fn add_to_whitelist(
        &self,
        farm: &Pubkey,
        authority: &Pubkey,
        creator_or_mint: &Pubkey,
        whitelist_type: WhitelistType,
        reward_rate: RewardRate,
    ) -> Result<Instruction> {
        let reward_rate = reward_rate.per_second()?;
        self.fetch_farm(farm).await?;
        Ok(build_add(
            farm,
            authority,
            creator_or_mint,
            whitelist_type,
            reward_rate,
        ))
    }

    pub async fn remove_from_whitelist(
        &self,
        farm: &Pubkey,
        authority: &Pubkey,
        address: &Pubkey,
    ) -> Result<Instruction> {
        self.fetch_farm(farm).await?;
        Ok(build_remove(farm, authority, address))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        instructions::anchor_discriminator,
        ledger::MemoryLedger,
        test_utils::{MapMetadata, insert_farm},
    };

    #[test]
    fn test_reward_rate() {
        let rate = RewardRate {
            token_amount: 86_400_000,
            interval_in_seconds: 86_400,
        };
        assert_eq!(rate.per_second().unwrap(), 1_000);

        let rate = RewardRate {
            token_amount: 10,
            interval_in_seconds: 3,
        };
        assert_eq!(rate.per_second().unwrap(), 3);

        let rate = RewardRate {
            token_amount: 10,
            interval_in_seconds: 0,
        };
        assert!(matches!(rate.per_second(), Err(Error::ZeroRewardInterval)));
    }

    #[tokio::test]
    async fn test_add_creator_to_whitelist() {
        let ledger = MemoryLedger::default();
        let farm = insert_farm(&ledger);
        let client = StakingClient::new(&ledger, MapMetadata::default());
        let creator = Pubkey::new_unique();

        let ix = client
            .add_to_whitelist(
                &farm.address,
                &farm.authority,
                &creator,
                WhitelistType::Creator,
                RewardRate {
                    token_amount: 600,
                    interval_in_seconds: 60,
                },
            )
            .await
            .unwrap();

        assert_eq!(ix.accounts.len(), 6);
        assert_eq!(ix.accounts[2], AccountMeta::new_readonly(creator, false));
        assert_eq!(
            ix.accounts[3],
            AccountMeta::new(find_whitelist_proof(&farm.address, &creator), false)
        );
        assert_eq!(&ix.data[..8], &anchor_discriminator(ADD_NAME));
        // reward_rate then the enum tag
        assert_eq!(&ix.data[8..16], &10u64.to_le_bytes());
        assert_eq!(ix.data[16], 0);
        assert_eq!(ix.data.len(), 17);
    }

    #[tokio::test]
    async fn test_remove_from_whitelist() {
        let ledger = MemoryLedger::default();
        let farm = insert_farm(&ledger);
        let client = StakingClient::new(&ledger, MapMetadata::default());
        let mint = Pubkey::new_unique();

        let ix = client
            .remove_from_whitelist(&farm.address, &farm.authority, &mint)
            .await
            .unwrap();
        assert_eq!(ix.accounts.len(), 5);
        assert_eq!(
            ix.accounts[2],
            AccountMeta::new(find_whitelist_proof(&farm.address, &mint), false)
        );
        assert_eq!(ix.data, anchor_discriminator(REMOVE_NAME).to_vec());
    }

    #[tokio::test]
    async fn test_whitelist_needs_farm() {
        let ledger = MemoryLedger::default();
        let client = StakingClient::new(&ledger, MapMetadata::default());
        let err = client
            .remove_from_whitelist(
                &Pubkey::new_unique(),
                &Pubkey::new_unique(),
                &Pubkey::new_unique(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::FarmNotFound(_)));
    }
}
