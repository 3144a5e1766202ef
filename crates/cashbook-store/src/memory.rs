//! In-memory ledger store

use async_trait::async_trait;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::data::StoreData;
use crate::error::{StoreError, StoreResult};
use crate::records::*;
use crate::LedgerStore;

/// Ledger store backed by process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<StoreData>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, StoreData>> {
        self.data.read().map_err(|_| StoreError::LockPoisoned)
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, StoreData>> {
        self.data.write().map_err(|_| StoreError::LockPoisoned)
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn fetch_accounts(&self, company_id: CompanyId) -> StoreResult<Vec<AccountRecord>> {
        Ok(self.read()?.active_accounts(company_id))
    }

    async fn insert_account(&self, account: NewAccount) -> StoreResult<AccountRecord> {
        self.write()?.insert_account(account)
    }

    async fn deactivate_account(
        &self,
        company_id: CompanyId,
        account_name: &str,
    ) -> StoreResult<AccountRecord> {
        self.write()?.deactivate_account(company_id, account_name)
    }

    async fn fetch_journal_entries(
        &self,
        company_id: CompanyId,
        filter: DateFilter,
    ) -> StoreResult<Vec<JournalEntryRecord>> {
        self.read()?.journal_entries(company_id, filter)
    }

    async fn fetch_journal_entry(
        &self,
        company_id: CompanyId,
        id: JournalEntryId,
    ) -> StoreResult<Option<JournalEntryRecord>> {
        self.read()?.journal_entry(company_id, id)
    }

    async fn insert_journal_entry(
        &self,
        entry: NewJournalEntry,
    ) -> StoreResult<JournalEntryRecord> {
        self.write()?.insert_journal_entry(entry)
    }

    async fn mark_reversed(
        &self,
        company_id: CompanyId,
        id: JournalEntryId,
    ) -> StoreResult<JournalEntryRecord> {
        self.write()?.mark_reversed(company_id, id)
    }

    async fn fetch_payables(&self, company_id: CompanyId) -> StoreResult<Vec<PayableRecord>> {
        Ok(self.read()?.payables(company_id))
    }

    async fn insert_payable(&self, payable: NewPayable) -> StoreResult<PayableRecord> {
        self.write()?.insert_payable(payable)
    }

    async fn mark_paid(&self, company_id: CompanyId, id: PayableId) -> StoreResult<PayableRecord> {
        self.write()?.mark_paid(company_id, id)
    }
}
