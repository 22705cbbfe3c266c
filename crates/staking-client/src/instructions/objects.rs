//! Auxiliary objects attached to an open stake receipt.

use super::{
    ASSOCIATED_TOKEN_PROGRAM_ID, RENT_SYSVAR_ID, SYSTEM_PROGRAM_ID, StakingClient,
    TOKEN_PROGRAM_ID, build_instruction,
};
use crate::{
    Result,
    creator::{MetadataService, TokenKind, resolve},
    ledger::Ledger,
    pda::{find_ata, find_farmer, find_stake_receipt, find_whitelist_proof},
};
use solana_pubkey::Pubkey;
use solana_sdk::instruction::{AccountMeta, Instruction};

pub const ADD_NAME: &str = "add_object";
pub const REMOVE_NAME: &str = "remove_object";

/// Attach `object` to the receipt of `mint`. The object's metadata account is
/// only present on the non-fungible path.
pub fn build_add(farm: &Pubkey, owner: &Pubkey, mint: &Pubkey, object: &TokenKind) -> Instruction {
    let object_mint = object.mint();
    let farmer = find_farmer(farm, owner);
    let stake_receipt = find_stake_receipt(&farmer, mint);
    let object_whitelist = find_whitelist_proof(farm, &object.whitelist_key());
    let user_object_ata = find_ata(owner, &object_mint);
    let object_vault = find_ata(&farmer, &object_mint);

    let mut accounts = vec![
        AccountMeta::new_readonly(*farm, false),
        AccountMeta::new(farmer, false),
        AccountMeta::new_readonly(*mint, false),
        AccountMeta::new(stake_receipt, false),
        AccountMeta::new_readonly(object_mint, false),
        AccountMeta::new_readonly(object_whitelist, false),
    ];
    accounts.extend(object.metadata_account());
    accounts.extend([
        AccountMeta::new(user_object_ata, false),
        AccountMeta::new(object_vault, false),
        AccountMeta::new(*owner, true),
        AccountMeta::new_readonly(RENT_SYSVAR_ID, false),
        AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
        AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
        AccountMeta::new_readonly(ASSOCIATED_TOKEN_PROGRAM_ID, false),
    ]);

    build_instruction(ADD_NAME, accounts, &())
}

pub fn build_remove(farm: &Pubkey, owner: &Pubkey, mint: &Pubkey, object: &Pubkey) -> Instruction {
    let farmer = find_farmer(farm, owner);
    let stake_receipt = find_stake_receipt(&farmer, mint);
    let user_object_ata = find_ata(owner, object);
    let object_vault = find_ata(&farmer, object);

    let accounts = vec![
        AccountMeta::new_readonly(*farm, false),
        AccountMeta::new(farmer, false),
        AccountMeta::new_readonly(*mint, false),
        AccountMeta::new(stake_receipt, false),
        AccountMeta::new_readonly(*object, false),
        AccountMeta::new(user_object_ata, false),
        AccountMeta::new(object_vault, false),
        AccountMeta::new_readonly(*owner, true),
        AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
    ];

    build_instruction(REMOVE_NAME, accounts, &())
}

impl<L: Ledger, M: MetadataService> StakingClient<L, M> {
    pub async fn add_object(
        &self,
        farm: &Pubkey,
        owner: &Pubkey,
        mint: &Pubkey,
        object: &Pubkey,
    ) -> Result<Instruction> {
        let object = resolve(&self.metadata, object).await;
        Ok(build_add(farm, owner, mint, &object))
    }

    pub async fn remove_object(
        &self,
        farm: &Pubkey,
        owner: &Pubkey,
        mint: &Pubkey,
        object: &Pubkey,
    ) -> Result<Instruction> {
        Ok(build_remove(farm, owner, mint, object))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{instructions::anchor_discriminator, ledger::MemoryLedger, pda::find_metadata, test_utils::MapMetadata};

    #[tokio::test]
    async fn test_add_object_paths() {
        let farm = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let object = Pubkey::new_unique();
        let creator = Pubkey::new_unique();

        let fungible = StakingClient::new(MemoryLedger::default(), MapMetadata::default())
            .add_object(&farm, &owner, &mint, &object)
            .await
            .unwrap();
        let nft = StakingClient::new(
            MemoryLedger::default(),
            MapMetadata::default().with_nft(object, creator),
        )
        .add_object(&farm, &owner, &mint, &object)
        .await
        .unwrap();

        assert_eq!(fungible.accounts.len(), 13);
        assert_eq!(nft.accounts.len(), 14);
        assert_eq!(
            fungible.accounts[5].pubkey,
            find_whitelist_proof(&farm, &object)
        );
        assert_eq!(nft.accounts[5].pubkey, find_whitelist_proof(&farm, &creator));
        assert_eq!(
            nft.accounts[6],
            AccountMeta::new_readonly(find_metadata(&object), false)
        );
        assert_eq!(&nft.accounts[7..], &fungible.accounts[6..]);
        assert_eq!(fungible.data, anchor_discriminator(ADD_NAME).to_vec());
    }

    #[test]
    fn test_remove_object() {
        let farm = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let object = Pubkey::new_unique();
        let farmer = find_farmer(&farm, &owner);

        let ix = build_remove(&farm, &owner, &mint, &object);
        assert_eq!(ix.accounts.len(), 9);
        assert_eq!(
            ix.accounts[3],
            AccountMeta::new(find_stake_receipt(&farmer, &mint), false)
        );
        assert_eq!(ix.accounts[4], AccountMeta::new_readonly(object, false));
        assert_eq!(
            ix.accounts[6],
            AccountMeta::new(find_ata(&farmer, &object), false)
        );
        assert_eq!(ix.accounts[7], AccountMeta::new_readonly(owner, true));
        assert_eq!(&ix.data[..], &anchor_discriminator(REMOVE_NAME));
    }
}
