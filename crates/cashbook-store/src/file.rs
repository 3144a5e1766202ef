//! JSON snapshot ledger store
//!
//! The whole store is kept in memory and rewritten to disk after every
//! successful write. A write is applied to a copy first and only swapped in
//! once the snapshot has been persisted, so a failed save changes nothing.

use async_trait::async_trait;
use log::{debug, info};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use crate::data::StoreData;
use crate::error::StoreResult;
use crate::records::*;
use crate::LedgerStore;

pub struct FileStore {
    path: PathBuf,
    data: Mutex<StoreData>,
}

impl FileStore {
    /// Open a snapshot, starting empty when the file does not exist yet
    pub async fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let data = if tokio::fs::try_exists(&path).await? {
            let raw = tokio::fs::read(&path).await?;
            let data: StoreData = serde_json::from_slice(&raw)?;
            info!("Loaded ledger snapshot from {}", path.display());
            data
        } else {
            info!("No ledger snapshot at {}, starting empty", path.display());
            StoreData::default()
        };

        Ok(Self {
            path,
            data: Mutex::new(data),
        })
    }

    async fn persist(&self, data: &StoreData) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let json = serde_json::to_vec_pretty(data)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!("Saved ledger snapshot to {}", self.path.display());
        Ok(())
    }

    async fn mutate<T>(
        &self,
        apply: impl FnOnce(&mut StoreData) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let mut guard = self.data.lock().await;
        let mut draft = guard.clone();
        let value = apply(&mut draft)?;
        self.persist(&draft).await?;
        *guard = draft;
        Ok(value)
    }
}

#[async_trait]
impl LedgerStore for FileStore {
    async fn fetch_accounts(&self, company_id: CompanyId) -> StoreResult<Vec<AccountRecord>> {
        Ok(self.data.lock().await.active_accounts(company_id))
    }

    async fn insert_account(&self, account: NewAccount) -> StoreResult<AccountRecord> {
        self.mutate(|data| data.insert_account(account)).await
    }

    async fn deactivate_account(
        &self,
        company_id: CompanyId,
        account_name: &str,
    ) -> StoreResult<AccountRecord> {
        self.mutate(|data| data.deactivate_account(company_id, account_name)).await
    }

    async fn fetch_journal_entries(
        &self,
        company_id: CompanyId,
        filter: DateFilter,
    ) -> StoreResult<Vec<JournalEntryRecord>> {
        self.data.lock().await.journal_entries(company_id, filter)
    }

    async fn fetch_journal_entry(
        &self,
        company_id: CompanyId,
        id: JournalEntryId,
    ) -> StoreResult<Option<JournalEntryRecord>> {
        self.data.lock().await.journal_entry(company_id, id)
    }

    async fn insert_journal_entry(
        &self,
        entry: NewJournalEntry,
    ) -> StoreResult<JournalEntryRecord> {
        self.mutate(|data| data.insert_journal_entry(entry)).await
    }

    async fn mark_reversed(
        &self,
        company_id: CompanyId,
        id: JournalEntryId,
    ) -> StoreResult<JournalEntryRecord> {
        self.mutate(|data| data.mark_reversed(company_id, id)).await
    }

    async fn fetch_payables(&self, company_id: CompanyId) -> StoreResult<Vec<PayableRecord>> {
        Ok(self.data.lock().await.payables(company_id))
    }

    async fn insert_payable(&self, payable: NewPayable) -> StoreResult<PayableRecord> {
        self.mutate(|data| data.insert_payable(payable)).await
    }

    async fn mark_paid(&self, company_id: CompanyId, id: PayableId) -> StoreResult<PayableRecord> {
        self.mutate(|data| data.mark_paid(company_id, id)).await
    }
}
