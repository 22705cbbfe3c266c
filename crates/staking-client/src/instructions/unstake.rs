use super::{StakingClient, TOKEN_PROGRAM_ID, build_instruction};
use crate::{
    Error, Result,
    creator::MetadataService,
    ledger::{Ledger, fetch},
    pda::{find_ata, find_farmer, find_stake_receipt},
    state::StakeReceipt,
};
use solana_pubkey::Pubkey;
use solana_sdk::instruction::{AccountMeta, Instruction};

pub const NAME: &str = "unstake";

/// `lock` is the lock recorded in the stake receipt.
pub fn build(farm: &Pubkey, owner: &Pubkey, mint: &Pubkey, lock: &Pubkey) -> Instruction {
    let farmer = find_farmer(farm, owner);
    let stake_receipt = find_stake_receipt(&farmer, mint);
    let farmer_vault = find_ata(&farmer, mint);
    let gem_owner_ata = find_ata(owner, mint);

    let accounts = vec![
        AccountMeta::new(*farm, false),
        AccountMeta::new(farmer, false),
        AccountMeta::new_readonly(*mint, false),
        AccountMeta::new(stake_receipt, false),
        AccountMeta::new_readonly(*lock, false),
        AccountMeta::new(farmer_vault, false),
        AccountMeta::new(gem_owner_ata, false),
        AccountMeta::new(*owner, true),
        AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
    ];

    build_instruction(NAME, accounts, &())
}

impl<L: Ledger, M: MetadataService> StakingClient<L, M> {
    pub async fn unstake(&self, farm: &Pubkey, owner: &Pubkey, mint: &Pubkey) -> Result<Instruction> {
        let farmer = find_farmer(farm, owner);
        let address = find_stake_receipt(&farmer, mint);
        let receipt = fetch::<StakeReceipt>(&self.ledger, &address)
            .await?
            .ok_or(Error::StakeReceiptNotFound(address))?;
        if !receipt.is_running() {
            return Err(Error::StakeReceiptClosed(address));
        }
        Ok(build(farm, owner, mint, &receipt.lock))
    }
}
