use super::{
    ASSOCIATED_TOKEN_PROGRAM_ID, RENT_SYSVAR_ID, SYSTEM_PROGRAM_ID, StakingClient,
    TOKEN_PROGRAM_ID, build_instruction,
};
use crate::{
    Result,
    creator::MetadataService,
    ledger::Ledger,
    pda::{find_ata, find_farmer},
};
use solana_pubkey::Pubkey;
use solana_sdk::instruction::{AccountMeta, Instruction};

pub const NAME: &str = "claim_rewards";

pub fn build(farm: &Pubkey, owner: &Pubkey, reward_mint: &Pubkey) -> Instruction {
    let farmer = find_farmer(farm, owner);
    let farm_reward_vault = find_ata(farm, reward_mint);
    let farmer_reward_vault = find_ata(owner, reward_mint);

    let accounts = vec![
        AccountMeta::new(*farm, false),
        AccountMeta::new(farmer, false),
        AccountMeta::new_readonly(*reward_mint, false),
        AccountMeta::new(farm_reward_vault, false),
        AccountMeta::new(farmer_reward_vault, false),
        AccountMeta::new(*owner, true),
        AccountMeta::new_readonly(RENT_SYSVAR_ID, false),
        AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
        AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
        AccountMeta::new_readonly(ASSOCIATED_TOKEN_PROGRAM_ID, false),
    ];

    build_instruction(NAME, accounts, &())
}

impl<L: Ledger, M: MetadataService> StakingClient<L, M> {
    pub async fn claim_rewards(&self, farm: &Pubkey, owner: &Pubkey) -> Result<Instruction> {
        let state = self.fetch_farm(farm).await?;
        Ok(build(farm, owner, &state.reward.mint))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Error,
        ledger::MemoryLedger,
        test_utils::{MapMetadata, insert_farm},
    };

    #[tokio::test]
    async fn test_claim_rewards() {
        let ledger = MemoryLedger::default();
        let farm = insert_farm(&ledger);
        let client = StakingClient::new(&ledger, MapMetadata::default());
        let owner = Pubkey::new_unique();

        let ix = client.claim_rewards(&farm.address, &owner).await.unwrap();
        assert_eq!(ix.accounts.len(), 10);
        assert_eq!(ix.accounts[0], AccountMeta::new(farm.address, false));
        assert_eq!(
            ix.accounts[1],
            AccountMeta::new(find_farmer(&farm.address, &owner), false)
        );
        assert_eq!(ix.accounts[2].pubkey, farm.reward_mint);
        assert_eq!(
            ix.accounts[3].pubkey,
            find_ata(&farm.address, &farm.reward_mint)
        );
        assert_eq!(ix.accounts[4].pubkey, find_ata(&owner, &farm.reward_mint));
        assert_eq!(ix.accounts[5], AccountMeta::new(owner, true));
    }

    #[tokio::test]
    async fn test_claim_missing_farm() {
        let ledger = MemoryLedger::default();
        let client = StakingClient::new(&ledger, MapMetadata::default());
        let err = client
            .claim_rewards(&Pubkey::new_unique(), &Pubkey::new_unique())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::FarmNotFound(_)));
    }
}
