//! Account layouts of the staking program.
//!
//! Layout (Anchor): 8-byte discriminator `sha256("account:<Name>")[..8]`, then
//! the borsh-encoded fields below. Accounts are allocated with headroom, so
//! bytes past the last field are ignored.

use borsh::{BorshDeserialize, BorshSerialize};
use sha2::{Digest, Sha256};
use solana_pubkey::Pubkey;
use std::str::FromStr;

/// Maximum number of objects a stake receipt can hold.
pub const MAX_OBJECTS: usize = 3;

/// Offset of the first field, right after the discriminator.
pub const DISCRIMINATOR_LEN: usize = 8;

/// Compute Anchor 8-byte account discriminator: sha256("account:{name}")[..8]
pub fn account_discriminator(name: &str) -> [u8; 8] {
    let hash = Sha256::digest(format!("account:{}", name).as_bytes());
    let mut disc = [0u8; 8];
    disc.copy_from_slice(&hash[..8]);
    disc
}

/// An account owned by the staking program.
pub trait ProgramAccount: BorshDeserialize + BorshSerialize {
    const NAME: &'static str;

    fn discriminator() -> [u8; 8] {
        account_discriminator(Self::NAME)
    }

    fn try_from_account_data(address: &Pubkey, data: &[u8]) -> crate::Result<Self> {
        if data.len() < DISCRIMINATOR_LEN {
            return Err(crate::Error::decode(
                Self::NAME,
                *address,
                "account data too short",
            ));
        }
        let (disc, mut rest) = data.split_at(DISCRIMINATOR_LEN);
        if disc != Self::discriminator() {
            return Err(crate::Error::decode(
                Self::NAME,
                *address,
                "discriminator mismatch",
            ));
        }
        Self::deserialize(&mut rest).map_err(|e| crate::Error::decode(Self::NAME, *address, e))
    }

    /// Discriminator followed by the borsh encoding.
    fn to_account_data(&self) -> Vec<u8> {
        let mut data = Self::discriminator().to_vec();
        self.serialize(&mut data).ok();
        data
    }
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reward {
    pub mint: Pubkey,
    pub reserved: u64,
    pub available: u64,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct Farm {
    pub authority: Pubkey,
    pub reward: Reward,
}

impl ProgramAccount for Farm {
    const NAME: &'static str = "Farm";
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct Farmer {
    pub farm: Pubkey,
    pub owner: Pubkey,
    pub accrued_rewards: u64,
    pub total_reward_rate: u64,
    pub last_update: u64,
}

impl ProgramAccount for Farmer {
    const NAME: &'static str = "Farmer";
}

/// Staking-duration tier. Part of the lock's address seeds, so a changed
/// config is a different lock.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LockConfig {
    pub duration: u64,
    pub bonus_factor: u8,
    pub cooldown: u64,
}

impl LockConfig {
    pub const SEED_LEN: usize = 8 + 1 + 8;

    /// Seed bytes, identical to the borsh encoding.
    pub fn seed_bytes(&self) -> [u8; Self::SEED_LEN] {
        let mut out = [0u8; Self::SEED_LEN];
        out[..8].copy_from_slice(&self.duration.to_le_bytes());
        out[8] = self.bonus_factor;
        out[9..].copy_from_slice(&self.cooldown.to_le_bytes());
        out
    }
}

/// Parses `duration:bonus_factor:cooldown`, e.g. `604800:25:0`.
impl FromStr for LockConfig {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s.split(':').collect::<Vec<_>>();
        let [duration, bonus_factor, cooldown] = parts.as_slice() else {
            return Err(crate::Error::Config(format!(
                "lock config must be duration:bonus_factor:cooldown, got {:?}",
                s
            )));
        };
        let parse_err = |e: std::num::ParseIntError| crate::Error::Config(format!("{:?}: {}", s, e));
        Ok(LockConfig {
            duration: duration.parse().map_err(parse_err)?,
            bonus_factor: bonus_factor.parse().map_err(parse_err)?,
            cooldown: cooldown.parse().map_err(parse_err)?,
        })
    }
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct Lock {
    pub farm: Pubkey,
    pub config: LockConfig,
}

impl ProgramAccount for Lock {
    const NAME: &'static str = "Lock";
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WhitelistType {
    Creator,
    Mint,
    AssociatedObject,
}

impl FromStr for WhitelistType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "creator" | "Creator" => Ok(WhitelistType::Creator),
            "mint" | "Mint" => Ok(WhitelistType::Mint),
            "associated_object" | "AssociatedObject" => Ok(WhitelistType::AssociatedObject),
            _ => Err(crate::Error::Config(format!("unknown whitelist type {:?}", s))),
        }
    }
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct WhitelistProof {
    pub farm: Pubkey,
    pub whitelisted_address: Pubkey,
    pub ty: WhitelistType,
    pub reward_rate: u64,
}

impl ProgramAccount for WhitelistProof {
    const NAME: &'static str = "WhitelistProof";
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssociatedObject {
    pub key: Pubkey,
    pub rate: u64,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct StakeReceipt {
    pub farmer: Pubkey,
    pub mint: Pubkey,
    pub lock: Pubkey,
    pub start_ts: u64,
    pub end_ts: Option<u64>,
    pub amount: u64,
    pub reward_rate: u64,
    pub objects: Vec<AssociatedObject>,
}

impl StakeReceipt {
    /// Open receipts have no end time and are still earning.
    pub fn is_running(&self) -> bool {
        self.end_ts.is_none()
    }
}

impl ProgramAccount for StakeReceipt {
    const NAME: &'static str = "StakeReceipt";
}
