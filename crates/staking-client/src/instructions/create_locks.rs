use super::{SYSTEM_PROGRAM_ID, StakingClient, build_instruction};
use crate::{
    Error, Result,
    creator::MetadataService,
    ledger::Ledger,
    pda::{find_farm_manager, find_lock},
    state::LockConfig,
};
use solana_pubkey::Pubkey;
use solana_sdk::instruction::{AccountMeta, Instruction};

pub const NAME: &str = "create_locks";

/// Lock accounts follow the fixed accounts, in the order of `configs`.
pub fn build(farm: &Pubkey, authority: &Pubkey, configs: &[LockConfig]) -> Result<Instruction> {
    if configs.is_empty() {
        return Err(Error::EmptyLockConfigs);
    }
    let farm_manager = find_farm_manager(farm, authority);

    let mut accounts = vec![
        AccountMeta::new_readonly(*farm, false),
        AccountMeta::new_readonly(farm_manager, false),
        AccountMeta::new(*authority, true),
        AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
    ];
    accounts.extend(
        configs
            .iter()
            .map(|config| AccountMeta::new(find_lock(farm, config), false)),
    );

    Ok(build_instruction(NAME, accounts, &configs.to_vec()))
}

impl<L: Ledger, M: MetadataService> StakingClient<L, M> {
    pub async fn create_locks(
        &self,
        farm: &Pubkey,
        authority: &Pubkey,
        configs: &[LockConfig],
    ) -> Result<Instruction> {
        build(farm, authority, configs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ledger::MemoryLedger, test_utils::{MapMetadata, insert_farm}};

    #[tokio::test]
    async fn test_single_base_lock() {
        let ledger = MemoryLedger::default();
        let farm = insert_farm(&ledger);
        let client = StakingClient::new(&ledger, MapMetadata::default());
        let config = LockConfig {
            duration: 0,
            bonus_factor: 0,
            cooldown: 0,
        };

        let ix = client
            .create_locks(&farm.address, &farm.authority, &[config])
            .await
            .unwrap();
        assert_eq!(ix.accounts.len(), 5);
        assert_eq!(
            ix.accounts.last(),
            Some(&AccountMeta::new(find_lock(&farm.address, &config), false))
        );
        // discriminator, vec length, one 17-byte config
        assert_eq!(ix.data.len(), 8 + 4 + 17);
        assert_eq!(&ix.data[8..12], &1u32.to_le_bytes());
    }

    #[test]
    fn test_lock_order_follows_configs() {
        let farm = Pubkey::new_unique();
        let authority = Pubkey::new_unique();
        let configs = [
            LockConfig {
                duration: 2_592_000,
                bonus_factor: 50,
                cooldown: 86_400,
            },
            LockConfig::default(),
            LockConfig {
                duration: 604_800,
                bonus_factor: 25,
                cooldown: 0,
            },
        ];

        let ix = build(&farm, &authority, &configs).unwrap();
        let locks = &ix.accounts[4..];
        assert_eq!(locks.len(), configs.len());
        for (meta, config) in locks.iter().zip(&configs) {
            assert_eq!(meta, &AccountMeta::new(find_lock(&farm, config), false));
        }
        assert_eq!(&ix.data[8..], &borsh::to_vec(&configs.to_vec()).unwrap());
    }

    #[test]
    fn test_empty_configs() {
        let err = build(&Pubkey::new_unique(), &Pubkey::new_unique(), &[]).unwrap_err();
        assert!(matches!(err, Error::EmptyLockConfigs));
    }
}
