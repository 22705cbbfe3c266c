use super::{StakingClient, TOKEN_PROGRAM_ID, build_instruction};
use crate::{
    Result,
    creator::MetadataService,
    ledger::Ledger,
    pda::{find_ata, find_farm_manager},
};
use solana_pubkey::Pubkey;
use solana_sdk::instruction::{AccountMeta, Instruction};

pub const NAME: &str = "fund_reward";

/// Move `amount` reward tokens from the manager's token account into the farm vault.
pub fn build(farm: &Pubkey, authority: &Pubkey, reward_mint: &Pubkey, amount: u64) -> Instruction {
    let farm_manager = find_farm_manager(farm, authority);
    let farm_vault = find_ata(farm, reward_mint);
    let manager_ata = find_ata(authority, reward_mint);

    let accounts = vec![
        AccountMeta::new(*farm, false),
        AccountMeta::new_readonly(farm_manager, false),
        AccountMeta::new_readonly(*reward_mint, false),
        AccountMeta::new(farm_vault, false),
        AccountMeta::new(manager_ata, false),
        AccountMeta::new_readonly(*authority, true),
        AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
    ];

    build_instruction(NAME, accounts, &amount)
}

impl<L: Ledger, M: MetadataService> StakingClient<L, M> {
    pub async fn fund_reward(
        &self,
        farm: &Pubkey,
        authority: &Pubkey,
        amount: u64,
    ) -> Result<Instruction> {
        let state = self.fetch_farm(farm).await?;
        Ok(build(farm, authority, &state.reward.mint, amount))
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
    async fn test_fund_reward_uses_farm_reward_mint() {
        let ledger = MemoryLedger::default();
        let farm = insert_farm(&ledger);
        let client = StakingClient::new(&ledger, MapMetadata::default());

        let ix = client
            .fund_reward(&farm.address, &farm.authority, 5_000)
            .await
            .unwrap();
        assert_eq!(ix.accounts.len(), 7);
        assert_eq!(ix.accounts[2].pubkey, farm.reward_mint);
        assert_eq!(
            ix.accounts[3],
            AccountMeta::new(find_ata(&farm.address, &farm.reward_mint), false)
        );
        assert_eq!(
            ix.accounts[4],
            AccountMeta::new(find_ata(&farm.authority, &farm.reward_mint), false)
        );
        assert_eq!(ix.accounts[5], AccountMeta::new_readonly(farm.authority, true));
        assert_eq!(&ix.data[8..], &5_000u64.to_le_bytes());
    }

    #[tokio::test]
    async fn test_fund_missing_farm() {
        let ledger = MemoryLedger::default();
        let client = StakingClient::new(&ledger, MapMetadata::default());
        let farm = Pubkey::new_unique();
        let err = client
            .fund_reward(&farm, &Pubkey::new_unique(), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::FarmNotFound(f) if f == farm));
    }
}
