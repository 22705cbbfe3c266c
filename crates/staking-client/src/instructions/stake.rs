use super::{
    ASSOCIATED_TOKEN_PROGRAM_ID, RENT_SYSVAR_ID, SYSTEM_PROGRAM_ID, StakingClient,
    TOKEN_PROGRAM_ID, build_instruction,
};
use crate::{
    Error, Result,
    creator::{MetadataService, TokenKind, resolve, resolve_all},
    ledger::{Ledger, find_farm_locks},
    pda::{find_ata, find_farmer, find_stake_receipt, find_whitelist_proof},
    state::Lock,
};
use solana_pubkey::Pubkey;
use solana_sdk::instruction::{AccountMeta, Instruction};

pub const NAME: &str = "stake";

/// Stake `amount` of `gem` under `lock`. The non-fungible path carries the
/// metadata account last.
pub fn build(farm: &Pubkey, owner: &Pubkey, gem: &TokenKind, lock: &Pubkey, amount: u64) -> Instruction {
    let mint = gem.mint();
    let farmer = find_farmer(farm, owner);
    let whitelist_proof = find_whitelist_proof(farm, &gem.whitelist_key());
    let farmer_vault = find_ata(&farmer, &mint);
    let gem_owner_ata = find_ata(owner, &mint);
    let stake_receipt = find_stake_receipt(&farmer, &mint);

    let mut accounts = vec![
        AccountMeta::new(*farm, false),
        AccountMeta::new(farmer, false),
        AccountMeta::new_readonly(mint, false),
        AccountMeta::new_readonly(whitelist_proof, false),
        AccountMeta::new(farmer_vault, false),
        AccountMeta::new(gem_owner_ata, false),
        AccountMeta::new_readonly(*lock, false),
        AccountMeta::new(stake_receipt, false),
        AccountMeta::new(*owner, true),
        AccountMeta::new_readonly(RENT_SYSVAR_ID, false),
        AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
        AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
        AccountMeta::new_readonly(ASSOCIATED_TOKEN_PROGRAM_ID, false),
    ];
    accounts.extend(gem.metadata_account());

    build_instruction(NAME, accounts, &amount)
}

/// Lowest tier without a bonus: shortest duration, then shortest cooldown,
/// then lowest address.
pub fn select_base_lock(locks: &[(Pubkey, Lock)]) -> Option<Pubkey> {
    locks
        .iter()
        .filter(|(_, lock)| lock.config.bonus_factor == 0)
        .min_by_key(|(address, lock)| (lock.config.duration, lock.config.cooldown, *address))
        .map(|(address, _)| *address)
}

impl<L: Ledger, M: MetadataService> StakingClient<L, M> {
    pub async fn stake(
        &self,
        farm: &Pubkey,
        owner: &Pubkey,
        mint: &Pubkey,
        lock: &Pubkey,
        amount: u64,
    ) -> Result<Instruction> {
        let gem = resolve(&self.metadata, mint).await;
        tracing::debug!("staking {:?} in {} with lock {}", gem, farm, lock);
        Ok(build(farm, owner, &gem, lock, amount))
    }

    /// One stake instruction per mint, in input order. Mints are classified
    /// concurrently.
    pub async fn stake_all(
        &self,
        farm: &Pubkey,
        owner: &Pubkey,
        mints: &[Pubkey],
        lock: &Pubkey,
        amount: u64,
    ) -> Result<Vec<Instruction>> {
        let gems = resolve_all(&self.metadata, mints).await;
        Ok(gems
            .iter()
            .map(|gem| build(farm, owner, gem, lock, amount))
            .collect())
    }

    /// The farm's base lock tier, see [`select_base_lock`].
    pub async fn base_lock(&self, farm: &Pubkey) -> Result<Pubkey> {
        let locks = find_farm_locks(&self.ledger, farm).await?;
        select_base_lock(&locks).ok_or(Error::NoBaseLock(*farm))
    }
}
