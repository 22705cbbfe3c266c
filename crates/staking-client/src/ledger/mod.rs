//! Read access to program accounts.

use crate::{
    ID, Result,
    pda::find_farmer,
    state::{DISCRIMINATOR_LEN, Lock, ProgramAccount, StakeReceipt},
};
use async_trait::async_trait;
use solana_account_decoder_client_types::UiAccountEncoding;
use solana_client::{
    nonblocking::rpc_client::RpcClient,
    rpc_config::{RpcAccountInfoConfig, RpcProgramAccountsConfig},
    rpc_filter::{Memcmp, RpcFilterType},
};
use solana_pubkey::Pubkey;
use std::sync::Arc;

mod memory;

pub use memory::MemoryLedger;

/// Fixed-offset byte match on account data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountFilter {
    pub offset: usize,
    pub bytes: Vec<u8>,
}

impl AccountFilter {
    pub fn new(offset: usize, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            offset,
            bytes: bytes.into(),
        }
    }

    pub fn pubkey(offset: usize, key: &Pubkey) -> Self {
        Self::new(offset, key.to_bytes())
    }

    pub fn matches(&self, data: &[u8]) -> bool {
        let Some(end) = self.offset.checked_add(self.bytes.len()) else {
            return false;
        };
        data.get(self.offset..end) == Some(self.bytes.as_slice())
    }
}

#[async_trait]
pub trait Ledger: Send + Sync {
    /// Raw account data, `None` if the account does not exist.
    async fn fetch_account(&self, address: &Pubkey) -> Result<Option<Vec<u8>>>;

    /// All accounts of `program_id` matching every filter.
    async fn list_accounts(
        &self,
        program_id: &Pubkey,
        filters: &[AccountFilter],
    ) -> Result<Vec<(Pubkey, Vec<u8>)>>;
}

#[async_trait]
impl Ledger for RpcClient {
    async fn fetch_account(&self, address: &Pubkey) -> Result<Option<Vec<u8>>> {
        let account = self
            .get_account_with_commitment(address, self.commitment())
            .await?
            .value;
        Ok(account.map(|a| a.data))
    }

    async fn list_accounts(
        &self,
        program_id: &Pubkey,
        filters: &[AccountFilter],
    ) -> Result<Vec<(Pubkey, Vec<u8>)>> {
        let filters = filters
            .iter()
            .map(|f| RpcFilterType::Memcmp(Memcmp::new_raw_bytes(f.offset, f.bytes.clone())))
            .collect();
        let accounts = self
            .get_program_accounts_with_config(
                program_id,
                RpcProgramAccountsConfig {
                    filters: Some(filters),
                    account_config: RpcAccountInfoConfig {
                        encoding: Some(UiAccountEncoding::Base64),
                        commitment: Some(self.commitment()),
                        ..Default::default()
                    },
                    ..Default::default()
                },
            )
            .await?;
        Ok(accounts
            .into_iter()
            .map(|(address, account)| (address, account.data))
            .collect())
    }
}

#[async_trait]
impl<L: Ledger + ?Sized> Ledger for Arc<L> {
    async fn fetch_account(&self, address: &Pubkey) -> Result<Option<Vec<u8>>> {
        (**self).fetch_account(address).await
    }

    async fn list_accounts(
        &self,
        program_id: &Pubkey,
        filters: &[AccountFilter],
    ) -> Result<Vec<(Pubkey, Vec<u8>)>> {
        (**self).list_accounts(program_id, filters).await
    }
}

#[async_trait]
impl<L: Ledger + ?Sized> Ledger for &L {
    async fn fetch_account(&self, address: &Pubkey) -> Result<Option<Vec<u8>>> {
        (**self).fetch_account(address).await
    }

    async fn list_accounts(
        &self,
        program_id: &Pubkey,
        filters: &[AccountFilter],
    ) -> Result<Vec<(Pubkey, Vec<u8>)>> {
        (**self).list_accounts(program_id, filters).await
    }
}

/// Fetch and decode a program account.
///
/// Returns `Ok(None)` when the account does not exist.
pub async fn fetch<T: ProgramAccount>(
    ledger: &(impl Ledger + ?Sized),
    address: &Pubkey,
) -> Result<Option<T>> {
    match ledger.fetch_account(address).await? {
        Some(data) => Ok(Some(T::try_from_account_data(address, &data)?)),
        None => Ok(None),
    }
}

/// List every `T` account matching `filters`.
pub async fn list_by_filter<T: ProgramAccount>(
    ledger: &(impl Ledger + ?Sized),
    mut filters: Vec<AccountFilter>,
) -> Result<Vec<(Pubkey, T)>> {
    filters.insert(0, AccountFilter::new(0, T::discriminator()));
    let accounts = ledger.list_accounts(&ID, &filters).await?;
    tracing::debug!("found {} {} accounts", accounts.len(), T::NAME);
    accounts
        .into_iter()
        .map(|(address, data)| Ok((address, T::try_from_account_data(&address, &data)?)))
        .collect()
}

/// All locks of a farm.
pub async fn find_farm_locks(
    ledger: &(impl Ledger + ?Sized),
    farm: &Pubkey,
) -> Result<Vec<(Pubkey, Lock)>> {
    list_by_filter(ledger, vec![AccountFilter::pubkey(DISCRIMINATOR_LEN, farm)]).await
}

/// Stake receipts of `owner` in `farm`, newest first.
pub async fn find_user_stake_receipts(
    ledger: &(impl Ledger + ?Sized),
    farm: &Pubkey,
    owner: &Pubkey,
) -> Result<Vec<(Pubkey, StakeReceipt)>> {
    let farmer = find_farmer(farm, owner);
    let mut receipts: Vec<(Pubkey, StakeReceipt)> = list_by_filter(
        ledger,
        vec![AccountFilter::pubkey(DISCRIMINATOR_LEN, &farmer)],
    )
    .await?;
    receipts.sort_by(|a, b| b.1.start_ts.cmp(&a.1.start_ts));
    Ok(receipts)
}

/// Like [`find_user_stake_receipts`], without closed receipts.
pub async fn find_active_stake_receipts(
    ledger: &(impl Ledger + ?Sized),
    farm: &Pubkey,
    owner: &Pubkey,
) -> Result<Vec<(Pubkey, StakeReceipt)>> {
    let mut receipts = find_user_stake_receipts(ledger, farm, owner).await?;
    receipts.retain(|(_, r)| r.is_running());
    Ok(receipts)
}
