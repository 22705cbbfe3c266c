use super::{SYSTEM_PROGRAM_ID, StakingClient, build_instruction};
use crate::{
    Result,
    creator::MetadataService,
    ledger::{Ledger, fetch},
    pda::find_farmer,
    state::Farmer,
};
use solana_pubkey::Pubkey;
use solana_sdk::instruction::{AccountMeta, Instruction};

pub const NAME: &str = "initialize_farmer";

pub fn build(farm: &Pubkey, owner: &Pubkey) -> Instruction {
    let farmer = find_farmer(farm, owner);

    let accounts = vec![
        AccountMeta::new_readonly(*farm, false),
        AccountMeta::new(farmer, false),
        AccountMeta::new(*owner, true),
        AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
    ];

    build_instruction(NAME, accounts, &())
}

impl<L: Ledger, M: MetadataService> StakingClient<L, M> {
    pub async fn initialize_farmer(&self, farm: &Pubkey, owner: &Pubkey) -> Result<Instruction> {
        Ok(build(farm, owner))
    }

    /// The initialize instruction, only if the farmer account does not exist yet.
    pub async fn ensure_farmer(&self, farm: &Pubkey, owner: &Pubkey) -> Result<Option<Instruction>> {
        let farmer = find_farmer(farm, owner);
        match fetch::<Farmer>(&self.ledger, &farmer).await? {
            Some(_) => Ok(None),
            None => {
                tracing::debug!("farmer {} not initialized", farmer);
                Ok(Some(build(farm, owner)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ledger::MemoryLedger, test_utils::MapMetadata};

    #[tokio::test]
    async fn test_initialize_farmer() {
        let client = StakingClient::new(MemoryLedger::default(), MapMetadata::default());
        let farm = Pubkey::new_unique();
        let owner = Pubkey::new_unique();

        let ix = client.initialize_farmer(&farm, &owner).await.unwrap();
        assert_eq!(
            ix.accounts,
            vec![
                AccountMeta::new_readonly(farm, false),
                AccountMeta::new(find_farmer(&farm, &owner), false),
                AccountMeta::new(owner, true),
                AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
            ]
        );
    }

    #[tokio::test]
    async fn test_ensure_farmer() {
        let ledger = MemoryLedger::default();
        let client = StakingClient::new(&ledger, MapMetadata::default());
        let farm = Pubkey::new_unique();
        let owner = Pubkey::new_unique();

        assert!(client.ensure_farmer(&farm, &owner).await.unwrap().is_some());

        ledger.insert_account(
            find_farmer(&farm, &owner),
            &Farmer {
                farm,
                owner,
                accrued_rewards: 0,
                total_reward_rate: 0,
                last_update: 0,
            },
        );
        assert!(client.ensure_farmer(&farm, &owner).await.unwrap().is_none());
    }
}
