use super::{SYSTEM_PROGRAM_ID, StakingClient, build_instruction};
use crate::{Result, creator::MetadataService, ledger::Ledger, pda::find_farm_manager};
use solana_pubkey::Pubkey;
use solana_sdk::instruction::{AccountMeta, Instruction};

pub const NAME: &str = "add_manager";

pub fn build(farm: &Pubkey, farm_authority: &Pubkey, manager_authority: &Pubkey) -> Instruction {
    let farm_manager = find_farm_manager(farm, manager_authority);

    let accounts = vec![
        AccountMeta::new_readonly(*farm, false),
        AccountMeta::new(farm_manager, false),
        AccountMeta::new_readonly(*manager_authority, false),
        AccountMeta::new(*farm_authority, true),
        AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
    ];

    build_instruction(NAME, accounts, &())
}

impl<L: Ledger, M: MetadataService> StakingClient<L, M> {
    pub async fn add_manager(
        &self,
        farm: &Pubkey,
        farm_authority: &Pubkey,
        manager_authority: &Pubkey,
    ) -> Result<Instruction> {
        Ok(build(farm, farm_authority, manager_authority))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instruction_construction() {
        let farm = Pubkey::new_unique();
        let authority = Pubkey::new_unique();
        let manager = Pubkey::new_unique();

        let ix = build(&farm, &authority, &manager);
        assert_eq!(ix.program_id, crate::ID);
        assert_eq!(ix.accounts.len(), 5);
        assert_eq!(
            ix.accounts[1],
            AccountMeta::new(find_farm_manager(&farm, &manager), false)
        );
        assert_eq!(ix.accounts[2], AccountMeta::new_readonly(manager, false));
        // only the farm authority signs
        let signers = ix.accounts.iter().filter(|a| a.is_signer).collect::<Vec<_>>();
        assert_eq!(signers.len(), 1);
        assert_eq!(signers[0].pubkey, authority);
        assert_eq!(ix.data.len(), 8);
    }
}
