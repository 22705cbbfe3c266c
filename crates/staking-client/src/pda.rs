//! Staking program PDA derivation functions
//!
//! These must stay byte-for-byte in line with the seeds the program checks,
//! otherwise the derived accounts are unreachable.

use crate::{ID, state::LockConfig};
use solana_pubkey::Pubkey;
use std::fmt;

pub const FARM_PREFIX: &[u8] = b"farm";
pub const FARM_MANAGER_PREFIX: &[u8] = b"farm_manager";
pub const LOCK_PREFIX: &[u8] = b"lock";
pub const WHITELIST_PROOF_PREFIX: &[u8] = b"whitelist_proof";
pub const FARMER_PREFIX: &[u8] = b"farmer";
pub const STAKE_RECEIPT_PREFIX: &[u8] = b"stake_receipt";

/// SPL Token program
pub const TOKEN_PROGRAM_ID: Pubkey =
    solana_pubkey::pubkey!("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA");

/// SPL Associated Token Account program
pub const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey =
    solana_pubkey::pubkey!("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL");

/// Metaplex Token Metadata program
pub const TOKEN_METADATA_PROGRAM_ID: Pubkey =
    solana_pubkey::pubkey!("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s");

/// Find the farm PDA.
///
/// Seeds: `["farm", authority, reward_mint]`
pub fn find_farm(authority: &Pubkey, reward_mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[FARM_PREFIX, authority.as_ref(), reward_mint.as_ref()],
        &ID,
    )
    .0
}

/// Find the farm manager PDA.
///
/// Seeds: `["farm_manager", farm, manager_authority]`
pub fn find_farm_manager(farm: &Pubkey, manager_authority: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[FARM_MANAGER_PREFIX, farm.as_ref(), manager_authority.as_ref()],
        &ID,
    )
    .0
}

/// Find the lock PDA. The whole config is part of the seeds.
///
/// Seeds: `["lock", farm, duration_le, bonus_factor, cooldown_le]`
pub fn find_lock(farm: &Pubkey, config: &LockConfig) -> Pubkey {
    Pubkey::find_program_address(
        &[LOCK_PREFIX, farm.as_ref(), &config.seed_bytes()],
        &ID,
    )
    .0
}

/// Find the whitelist proof PDA of a creator or mint address.
///
/// Seeds: `["whitelist_proof", farm, creator_or_mint]`
pub fn find_whitelist_proof(farm: &Pubkey, creator_or_mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[WHITELIST_PROOF_PREFIX, farm.as_ref(), creator_or_mint.as_ref()],
        &ID,
    )
    .0
}

/// Find the farmer PDA.
///
/// Seeds: `["farmer", farm, owner]`
pub fn find_farmer(farm: &Pubkey, owner: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[FARMER_PREFIX, farm.as_ref(), owner.as_ref()], &ID).0
}

/// Find the stake receipt PDA.
///
/// Seeds: `["stake_receipt", farmer, mint]`
pub fn find_stake_receipt(farmer: &Pubkey, mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[STAKE_RECEIPT_PREFIX, farmer.as_ref(), mint.as_ref()],
        &ID,
    )
    .0
}

/// Find the Associated Token Account for a given wallet and mint.
///
/// Seeds: `[wallet, token_program, mint]` under the ATA program.
pub fn find_ata(wallet: &Pubkey, mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[wallet.as_ref(), TOKEN_PROGRAM_ID.as_ref(), mint.as_ref()],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )
    .0
}

/// Find the Metaplex metadata account of a mint.
///
/// Seeds: `["metadata", metadata_program, mint]` under the metadata program.
pub fn find_metadata(mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[
            b"metadata",
            TOKEN_METADATA_PROGRAM_ID.as_ref(),
            mint.as_ref(),
        ],
        &TOKEN_METADATA_PROGRAM_ID,
    )
    .0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Farm,
    FarmManager,
    Lock,
    WhitelistProof,
    Farmer,
    StakeReceipt,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Farm => "farm",
            EntityKind::FarmManager => "farm_manager",
            EntityKind::Lock => "lock",
            EntityKind::WhitelistProof => "whitelist_proof",
            EntityKind::Farmer => "farmer",
            EntityKind::StakeReceipt => "stake_receipt",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntityKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            EntityKind::Farm,
            EntityKind::FarmManager,
            EntityKind::Lock,
            EntityKind::WhitelistProof,
            EntityKind::Farmer,
            EntityKind::StakeReceipt,
        ]
        .into_iter()
        .find(|kind| kind.as_str() == s.replace('-', "_"))
        .ok_or_else(|| crate::Error::Config(format!("unknown account kind {:?}", s)))
    }
}

/// Loosely filled seed fields, as they come from a user.
#[derive(Debug, Clone, Default)]
pub struct SeedInputs {
    pub authority: Option<Pubkey>,
    pub reward_mint: Option<Pubkey>,
    pub farm: Option<Pubkey>,
    pub manager_authority: Option<Pubkey>,
    pub lock_config: Option<LockConfig>,
    pub creator_or_mint: Option<Pubkey>,
    pub owner: Option<Pubkey>,
    pub farmer: Option<Pubkey>,
    pub mint: Option<Pubkey>,
}

fn required<T: Copy>(kind: EntityKind, field: &'static str, value: Option<T>) -> crate::Result<T> {
    value.ok_or(crate::Error::InvalidSeed {
        kind: kind.as_str(),
        field,
    })
}

/// Derive the address of `kind` from the seed fields it needs.
///
/// A stake receipt can be derived from `farmer`, or from `farm` + `owner`.
pub fn derive(kind: EntityKind, seeds: &SeedInputs) -> crate::Result<Pubkey> {
    let address = match kind {
        EntityKind::Farm => find_farm(
            &required(kind, "authority", seeds.authority)?,
            &required(kind, "reward_mint", seeds.reward_mint)?,
        ),
        EntityKind::FarmManager => find_farm_manager(
            &required(kind, "farm", seeds.farm)?,
            &required(kind, "manager_authority", seeds.manager_authority)?,
        ),
        EntityKind::Lock => find_lock(
            &required(kind, "farm", seeds.farm)?,
            &required(kind, "lock_config", seeds.lock_config)?,
        ),
        EntityKind::WhitelistProof => find_whitelist_proof(
            &required(kind, "farm", seeds.farm)?,
            &required(kind, "creator_or_mint", seeds.creator_or_mint)?,
        ),
        EntityKind::Farmer => find_farmer(
            &required(kind, "farm", seeds.farm)?,
            &required(kind, "owner", seeds.owner)?,
        ),
        EntityKind::StakeReceipt => {
            let farmer = match seeds.farmer {
                Some(farmer) => farmer,
                None => find_farmer(
                    &required(kind, "farm", seeds.farm)?,
                    &required(kind, "owner", seeds.owner)?,
                ),
            };
            find_stake_receipt(&farmer, &required(kind, "mint", seeds.mint)?)
        }
    };
    tracing::debug!("derived {} address {}", kind, address);
    Ok(address)
}
