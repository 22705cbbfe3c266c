use crate::{
    Result,
    creator::{CreatorInfo, MetadataService},
    ledger::MemoryLedger,
    pda::{find_farm, find_metadata},
    state::{Farm, Reward},
};
use async_trait::async_trait;
use borsh::BorshSerialize;
use solana_pubkey::Pubkey;
use std::collections::HashMap;

#[derive(BorshSerialize)]
struct TestCreator {
    address: Pubkey,
    verified: bool,
    share: u8,
}

#[derive(BorshSerialize)]
struct TestMetadata {
    key: u8,
    update_authority: Pubkey,
    mint: Pubkey,
    name: String,
    symbol: String,
    uri: String,
    seller_fee_basis_points: u16,
    creators: Option<Vec<TestCreator>>,
}

/// Metaplex metadata account bytes with the given `(creator, verified)` list.
pub fn metadata_data(mint: &Pubkey, creators: &[(Pubkey, bool)]) -> Vec<u8> {
    let metadata = TestMetadata {
        key: 4,
        update_authority: Pubkey::new_unique(),
        mint: *mint,
        name: "Gem #1".to_owned(),
        symbol: "GEM".to_owned(),
        uri: "https://example.com/gem.json".to_owned(),
        seller_fee_basis_points: 500,
        creators: Some(
            creators
                .iter()
                .map(|(address, verified)| TestCreator {
                    address: *address,
                    verified: *verified,
                    share: 100 / creators.len().max(1) as u8,
                })
                .collect(),
        ),
    };
    let mut data = borsh::to_vec(&metadata).unwrap();
    // collection, uses and other trailing fields
    data.resize(data.len() + 200, 0);
    data
}

/// Creators by mint. Unknown mints have no creator.
#[derive(Debug, Default)]
pub struct MapMetadata {
    pub creators: HashMap<Pubkey, Pubkey>,
}

impl MapMetadata {
    pub fn with_nft(mut self, mint: Pubkey, creator: Pubkey) -> Self {
        self.creators.insert(mint, creator);
        self
    }
}

#[async_trait]
impl MetadataService for MapMetadata {
    async fn lookup(&self, mint: &Pubkey) -> Result<Option<CreatorInfo>> {
        Ok(self.creators.get(mint).map(|creator| CreatorInfo {
            creator: *creator,
            metadata: find_metadata(mint),
        }))
    }
}

/// Metadata service that is always down.
pub struct FailingMetadata;

#[async_trait]
impl MetadataService for FailingMetadata {
    async fn lookup(&self, _: &Pubkey) -> Result<Option<CreatorInfo>> {
        Err(crate::Error::custom(anyhow::anyhow!("connection refused")))
    }
}

pub struct TestFarm {
    pub address: Pubkey,
    pub authority: Pubkey,
    pub reward_mint: Pubkey,
}

/// Store a fresh farm in `ledger`.
pub fn insert_farm(ledger: &MemoryLedger) -> TestFarm {
    let authority = Pubkey::new_unique();
    let reward_mint = Pubkey::new_unique();
    let address = find_farm(&authority, &reward_mint);
    ledger.insert_account(
        address,
        &Farm {
            authority,
            reward: Reward {
                mint: reward_mint,
                reserved: 0,
                available: 1_000_000,
            },
        },
    );
    TestFarm {
        address,
        authority,
        reward_mint,
    }
}
