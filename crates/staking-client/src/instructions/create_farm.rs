use super::{
    ASSOCIATED_TOKEN_PROGRAM_ID, AtomicGroup, RENT_SYSVAR_ID, SYSTEM_PROGRAM_ID, StakingClient,
    TOKEN_PROGRAM_ID, add_manager, build_instruction,
};
use crate::{
    Result,
    creator::MetadataService,
    ledger::Ledger,
    pda::{find_ata, find_farm},
};
use solana_pubkey::Pubkey;
use solana_sdk::instruction::{AccountMeta, Instruction};

pub const NAME: &str = "create_farm";

pub fn build(authority: &Pubkey, reward_mint: &Pubkey) -> Instruction {
    let farm = find_farm(authority, reward_mint);
    let farm_vault = find_ata(&farm, reward_mint);

    let accounts = vec![
        AccountMeta::new(farm, false),
        AccountMeta::new_readonly(*reward_mint, false),
        AccountMeta::new(farm_vault, false),
        AccountMeta::new(*authority, true),
        AccountMeta::new_readonly(RENT_SYSVAR_ID, false),
        AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
        AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
        AccountMeta::new_readonly(ASSOCIATED_TOKEN_PROGRAM_ID, false),
    ];

    build_instruction(NAME, accounts, &())
}

impl<L: Ledger, M: MetadataService> StakingClient<L, M> {
    /// Create a farm and register its authority as the first manager.
    pub async fn create_farm(&self, authority: &Pubkey, reward_mint: &Pubkey) -> Result<AtomicGroup> {
        let farm = find_farm(authority, reward_mint);
        tracing::debug!("composing create_farm for {}", farm);
        Ok(AtomicGroup::new(vec![
            build(authority, reward_mint),
            add_manager::build(&farm, authority, authority),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        instructions::anchor_discriminator,
        ledger::MemoryLedger,
        pda::find_farm_manager,
        test_utils::MapMetadata,
    };

    #[tokio::test]
    async fn test_create_farm_is_atomic_with_self_manager() {
        let client = StakingClient::new(MemoryLedger::default(), MapMetadata::default());
        let authority = Pubkey::new_unique();
        let reward_mint = Pubkey::new_unique();
        let farm = find_farm(&authority, &reward_mint);

        let group = client.create_farm(&authority, &reward_mint).await.unwrap();
        assert_eq!(group.len(), 2);

        let create = &group.instructions[0];
        assert_eq!(&create.data, &anchor_discriminator("create_farm"));
        assert_eq!(create.accounts.len(), 8);
        assert_eq!(create.accounts[0], AccountMeta::new(farm, false));
        assert_eq!(
            create.accounts[2],
            AccountMeta::new(find_ata(&farm, &reward_mint), false)
        );
        assert_eq!(create.accounts[3], AccountMeta::new(authority, true));

        let add = &group.instructions[1];
        assert_eq!(&add.data[..8], &anchor_discriminator("add_manager"));
        assert_eq!(add.accounts[0].pubkey, farm);
        assert_eq!(
            add.accounts[1],
            AccountMeta::new(find_farm_manager(&farm, &authority), false)
        );
        assert_eq!(add.accounts[2].pubkey, authority);
    }
}
