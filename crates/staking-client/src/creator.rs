//! Token classification by Metaplex metadata.
//!
//! A token with a verified creator is staked on the non-fungible path, where
//! the whitelist is keyed on the creator and the metadata account goes along
//! with the instruction. Everything else is fungible and keyed on its mint.

use crate::{
    Result,
    ledger::Ledger,
    pda::find_metadata,
};
use async_trait::async_trait;
use borsh::BorshDeserialize;
use futures::future::join_all;
use solana_pubkey::Pubkey;
use solana_sdk::instruction::AccountMeta;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatorInfo {
    pub creator: Pubkey,
    pub metadata: Pubkey,
}

#[async_trait]
pub trait MetadataService: Send + Sync {
    /// Verified creator of `mint`, or `None` if it has none.
    async fn lookup(&self, mint: &Pubkey) -> Result<Option<CreatorInfo>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Fungible {
        mint: Pubkey,
    },
    NonFungible {
        mint: Pubkey,
        creator: Pubkey,
        metadata: Pubkey,
    },
}

impl TokenKind {
    pub fn mint(&self) -> Pubkey {
        match self {
            TokenKind::Fungible { mint } | TokenKind::NonFungible { mint, .. } => *mint,
        }
    }

    /// Address the whitelist proof is derived from.
    pub fn whitelist_key(&self) -> Pubkey {
        match self {
            TokenKind::Fungible { mint } => *mint,
            TokenKind::NonFungible { creator, .. } => *creator,
        }
    }

    /// Read-only metadata account appended on the non-fungible path.
    pub fn metadata_account(&self) -> Option<AccountMeta> {
        match self {
            TokenKind::Fungible { .. } => None,
            TokenKind::NonFungible { metadata, .. } => {
                Some(AccountMeta::new_readonly(*metadata, false))
            }
        }
    }
}

/// Classify `mint`. Lookup failures fall back to the fungible path.
pub async fn resolve(service: &(impl MetadataService + ?Sized), mint: &Pubkey) -> TokenKind {
    match service.lookup(mint).await {
        Ok(Some(CreatorInfo { creator, metadata })) => TokenKind::NonFungible {
            mint: *mint,
            creator,
            metadata,
        },
        Ok(None) => TokenKind::Fungible { mint: *mint },
        Err(error) => {
            tracing::warn!("metadata lookup failed for {}, using mint: {}", mint, error);
            TokenKind::Fungible { mint: *mint }
        }
    }
}

/// Classify many mints concurrently, in input order.
pub async fn resolve_all(
    service: &(impl MetadataService + ?Sized),
    mints: &[Pubkey],
) -> Vec<TokenKind> {
    join_all(mints.iter().map(|mint| resolve(service, mint))).await
}

const METADATA_V1_KEY: u8 = 4;

#[derive(BorshDeserialize, Debug)]
struct Creator {
    address: Pubkey,
    verified: bool,
    #[allow(dead_code)]
    share: u8,
}

/// Leading fields of a Metaplex metadata account.
#[derive(BorshDeserialize, Debug)]
#[allow(dead_code)]
struct MetadataHeader {
    key: u8,
    update_authority: Pubkey,
    mint: Pubkey,
    name: String,
    symbol: String,
    uri: String,
    seller_fee_basis_points: u16,
    creators: Option<Vec<Creator>>,
}

/// Reads creators from Metaplex metadata accounts on the ledger.
#[derive(Debug, Clone)]
pub struct OnChainMetadata<L> {
    ledger: L,
}

impl<L: Ledger> OnChainMetadata<L> {
    pub fn new(ledger: L) -> Self {
        Self { ledger }
    }
}

/// First verified creator in a metadata account of `mint`.
fn verified_creator(mint: &Pubkey, mut data: &[u8]) -> std::io::Result<Option<Pubkey>> {
    let header = MetadataHeader::deserialize(&mut data)?;
    if header.key != METADATA_V1_KEY || header.mint != *mint {
        return Ok(None);
    }
    Ok(header
        .creators
        .unwrap_or_default()
        .into_iter()
        .find(|c| c.verified)
        .map(|c| c.address))
}

#[async_trait]
impl<L: Ledger> MetadataService for OnChainMetadata<L> {
    async fn lookup(&self, mint: &Pubkey) -> Result<Option<CreatorInfo>> {
        let metadata = find_metadata(mint);
        let Some(data) = self.ledger.fetch_account(&metadata).await? else {
            return Ok(None);
        };
        let creator = verified_creator(mint, &data)
            .map_err(|e| crate::Error::decode("Metadata", metadata, e))?;
        Ok(creator.map(|creator| CreatorInfo { creator, metadata }))
    }
}
