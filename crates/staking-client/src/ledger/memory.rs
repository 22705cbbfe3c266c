use super::{AccountFilter, Ledger};
use crate::{ID, Result, state::ProgramAccount};
use async_trait::async_trait;
use solana_pubkey::Pubkey;
use std::{collections::BTreeMap, sync::RwLock};

/// In-memory ledger keyed by address.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    accounts: RwLock<BTreeMap<Pubkey, (Pubkey, Vec<u8>)>>,
}

impl MemoryLedger {
    pub fn insert(&self, address: Pubkey, owner: Pubkey, data: Vec<u8>) {
        self.accounts
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(address, (owner, data));
    }

    /// Store a staking program account with its discriminator.
    pub fn insert_account<T: ProgramAccount>(&self, address: Pubkey, account: &T) {
        self.insert(address, ID, account.to_account_data());
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    async fn fetch_account(&self, address: &Pubkey) -> Result<Option<Vec<u8>>> {
        let accounts = self.accounts.read().unwrap_or_else(|e| e.into_inner());
        Ok(accounts.get(address).map(|(_, data)| data.clone()))
    }

    async fn list_accounts(
        &self,
        program_id: &Pubkey,
        filters: &[AccountFilter],
    ) -> Result<Vec<(Pubkey, Vec<u8>)>> {
        let accounts = self.accounts.read().unwrap_or_else(|e| e.into_inner());
        Ok(accounts
            .iter()
            .filter(|(_, (owner, data))| owner == program_id && filters.iter().all(|f| f.matches(data)))
            .map(|(address, (_, data))| (*address, data.clone()))
            .collect())
    }
}
