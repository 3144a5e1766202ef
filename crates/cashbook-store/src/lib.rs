//! Ledger storage seam
//!
//! The engine never talks to a database directly. It reads and writes through
//! [`LedgerStore`], which is implemented here by [`MemoryStore`] and by
//! [`FileStore`] (a JSON snapshot on disk).

use async_trait::async_trait;
use std::sync::Arc;

mod data;
pub mod error;
pub mod file;
pub mod memory;
pub mod records;

pub use error::{StoreError, StoreResult};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use records::{
    AccountId, AccountRecord, CompanyId, DateFilter, JournalEntryId, JournalEntryRecord,
    LineRecord, NewAccount, NewJournalEntry, NewLine, NewPayable, PayableId, PayableRecord,
    TransactionEntryId, PAYABLE_STATUS_OPEN, PAYABLE_STATUS_PAID,
};

/// Store reference type
pub type StoreRef = Arc<dyn LedgerStore>;

/// Persistence operations the ledger engine depends on
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Active accounts of a company ordered by account number
    async fn fetch_accounts(&self, company_id: CompanyId) -> StoreResult<Vec<AccountRecord>>;

    /// Add an account; names are unique per company, active or not
    async fn insert_account(&self, account: NewAccount) -> StoreResult<AccountRecord>;

    /// Deactivate an account by name. Accounts are never deleted.
    async fn deactivate_account(
        &self,
        company_id: CompanyId,
        account_name: &str,
    ) -> StoreResult<AccountRecord>;

    /// Non-reversed journal entries inside `filter` with their lines and accounts
    async fn fetch_journal_entries(
        &self,
        company_id: CompanyId,
        filter: DateFilter,
    ) -> StoreResult<Vec<JournalEntryRecord>>;

    /// Single journal entry, including reversed ones
    async fn fetch_journal_entry(
        &self,
        company_id: CompanyId,
        id: JournalEntryId,
    ) -> StoreResult<Option<JournalEntryRecord>>;

    /// Write a header and all of its lines as one unit
    async fn insert_journal_entry(&self, entry: NewJournalEntry) -> StoreResult<JournalEntryRecord>;

    /// Flag an entry as reversed; fails if it already is
    async fn mark_reversed(
        &self,
        company_id: CompanyId,
        id: JournalEntryId,
    ) -> StoreResult<JournalEntryRecord>;

    async fn fetch_payables(&self, company_id: CompanyId) -> StoreResult<Vec<PayableRecord>>;

    async fn insert_payable(&self, payable: NewPayable) -> StoreResult<PayableRecord>;

    /// Move an open payable or receivable to paid; fails if already paid
    async fn mark_paid(&self, company_id: CompanyId, id: PayableId) -> StoreResult<PayableRecord>;
}
