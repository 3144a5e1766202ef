//! Backend-independent table state and the read/write rules over it
//!
//! Every write validates completely before it touches any table, so a
//! rejected write leaves the state exactly as it was.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};
use crate::records::{
    AccountId, AccountRecord, CompanyId, DateFilter, JournalEntryId, JournalEntryRecord,
    LineRecord, NewAccount, NewJournalEntry, NewPayable, PayableId, PayableRecord,
    TransactionEntryId, PAYABLE_STATUS_OPEN, PAYABLE_STATUS_PAID,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredLine {
    id: TransactionEntryId,
    account_id: AccountId,
    #[serde(with = "rust_decimal::serde::str")]
    debit_amount: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    credit_amount: Decimal,
    description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredJournalEntry {
    id: JournalEntryId,
    company_id: CompanyId,
    date: chrono::NaiveDate,
    description: String,
    source: String,
    is_reversed: bool,
    lines: Vec<StoredLine>,
}

/// All tables of the ledger store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreData {
    next_account_id: AccountId,
    next_entry_id: JournalEntryId,
    next_line_id: TransactionEntryId,
    next_payable_id: PayableId,
    accounts: Vec<AccountRecord>,
    journal_entries: Vec<StoredJournalEntry>,
    payables: Vec<PayableRecord>,
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

impl StoreData {
    // ==================== Accounts ====================

    pub fn active_accounts(&self, company_id: CompanyId) -> Vec<AccountRecord> {
        let mut accounts: Vec<AccountRecord> = self.accounts
            .iter()
            .filter(|a| a.company_id == company_id && a.is_active)
            .cloned()
            .collect();
        accounts.sort_by(|a, b| a.account_number.cmp(&b.account_number));
        accounts
    }

    pub fn insert_account(&mut self, account: NewAccount) -> StoreResult<AccountRecord> {
        let duplicate = self.accounts.iter().any(|a| {
            a.company_id == account.company_id && a.account_name == account.account_name
        });
        if duplicate {
            return Err(StoreError::Conflict {
                message: format!(
                    "account '{}' already exists for company {}",
                    account.account_name, account.company_id
                ),
            });
        }

        let record = AccountRecord {
            id: next_id(&mut self.next_account_id),
            company_id: account.company_id,
            account_number: account.account_number,
            account_name: account.account_name,
            account_type: account.account_type,
            is_active: true,
        };
        self.accounts.push(record.clone());
        Ok(record)
    }

    pub fn deactivate_account(&mut self, company_id: CompanyId, name: &str) -> StoreResult<AccountRecord> {
        let account = self.accounts
            .iter_mut()
            .find(|a| a.company_id == company_id && a.account_name == name)
            .ok_or_else(|| StoreError::NotFound {
                entity: "account",
                key: name.to_string(),
            })?;
        account.is_active = false;
        Ok(account.clone())
    }

    // ==================== Journal ====================

    fn join_entry(&self, entry: &StoredJournalEntry) -> StoreResult<JournalEntryRecord> {
        let mut lines = Vec::with_capacity(entry.lines.len());
        for line in &entry.lines {
            let account = self.accounts
                .iter()
                .find(|a| a.id == line.account_id)
                .ok_or_else(|| StoreError::NotFound {
                    entity: "account",
                    key: line.account_id.to_string(),
                })?;
            lines.push(LineRecord {
                id: line.id,
                account_id: account.id,
                account_number: account.account_number.clone(),
                account_name: account.account_name.clone(),
                account_type: account.account_type.clone(),
                debit_amount: line.debit_amount,
                credit_amount: line.credit_amount,
                description: line.description.clone(),
            });
        }
        Ok(JournalEntryRecord {
            id: entry.id,
            company_id: entry.company_id,
            date: entry.date,
            description: entry.description.clone(),
            source: entry.source.clone(),
            is_reversed: entry.is_reversed,
            lines,
        })
    }

    /// Non-reversed entries inside `filter`, ordered by date then id
    pub fn journal_entries(&self, company_id: CompanyId, filter: DateFilter) -> StoreResult<Vec<JournalEntryRecord>> {
        let mut entries: Vec<&StoredJournalEntry> = self.journal_entries
            .iter()
            .filter(|e| e.company_id == company_id && !e.is_reversed && filter.contains(e.date))
            .collect();
        entries.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
        entries.into_iter().map(|e| self.join_entry(e)).collect()
    }

    /// Single entry by id, reversed or not
    pub fn journal_entry(&self, company_id: CompanyId, id: JournalEntryId) -> StoreResult<Option<JournalEntryRecord>> {
        self.journal_entries
            .iter()
            .find(|e| e.company_id == company_id && e.id == id)
            .map(|e| self.join_entry(e))
            .transpose()
    }

    pub fn insert_journal_entry(&mut self, entry: NewJournalEntry) -> StoreResult<JournalEntryRecord> {
        if entry.lines.is_empty() {
            return Err(StoreError::InvalidWrite {
                message: "journal entry has no lines".to_string(),
            });
        }
        for line in &entry.lines {
            let account = self.accounts
                .iter()
                .find(|a| a.id == line.account_id && a.company_id == entry.company_id)
                .ok_or_else(|| StoreError::NotFound {
                    entity: "account",
                    key: line.account_id.to_string(),
                })?;
            if !account.is_active {
                return Err(StoreError::InvalidWrite {
                    message: format!("account '{}' is inactive", account.account_name),
                });
            }
            if line.debit_amount < Decimal::ZERO || line.credit_amount < Decimal::ZERO {
                return Err(StoreError::InvalidWrite {
                    message: format!("negative amount on account '{}'", account.account_name),
                });
            }
            if line.debit_amount > Decimal::ZERO && line.credit_amount > Decimal::ZERO {
                return Err(StoreError::InvalidWrite {
                    message: format!("line on '{}' carries both a debit and a credit", account.account_name),
                });
            }
        }

        let lines = entry.lines
            .into_iter()
            .map(|line| StoredLine {
                id: next_id(&mut self.next_line_id),
                account_id: line.account_id,
                debit_amount: line.debit_amount,
                credit_amount: line.credit_amount,
                description: line.description,
            })
            .collect();
        let stored = StoredJournalEntry {
            id: next_id(&mut self.next_entry_id),
            company_id: entry.company_id,
            date: entry.date,
            description: entry.description,
            source: entry.source,
            is_reversed: false,
            lines,
        };
        let record = self.join_entry(&stored)?;
        self.journal_entries.push(stored);
        Ok(record)
    }

    pub fn mark_reversed(&mut self, company_id: CompanyId, id: JournalEntryId) -> StoreResult<JournalEntryRecord> {
        let position = self.journal_entries
            .iter()
            .position(|e| e.company_id == company_id && e.id == id)
            .ok_or_else(|| StoreError::NotFound {
                entity: "journal entry",
                key: id.to_string(),
            })?;
        if self.journal_entries[position].is_reversed {
            return Err(StoreError::Conflict {
                message: format!("journal entry {} is already reversed", id),
            });
        }
        self.journal_entries[position].is_reversed = true;
        self.join_entry(&self.journal_entries[position])
    }

    // ==================== Payables / Receivables ====================

    pub fn payables(&self, company_id: CompanyId) -> Vec<PayableRecord> {
        self.payables
            .iter()
            .filter(|p| p.company_id == company_id)
            .cloned()
            .collect()
    }

    pub fn insert_payable(&mut self, payable: NewPayable) -> StoreResult<PayableRecord> {
        if payable.amount <= Decimal::ZERO {
            return Err(StoreError::InvalidWrite {
                message: format!("{} amount must be positive", payable.kind),
            });
        }
        let record = PayableRecord {
            id: next_id(&mut self.next_payable_id),
            company_id: payable.company_id,
            kind: payable.kind,
            description: payable.description,
            amount: payable.amount,
            due_date: payable.due_date,
            status: PAYABLE_STATUS_OPEN.to_string(),
        };
        self.payables.push(record.clone());
        Ok(record)
    }

    pub fn mark_paid(&mut self, company_id: CompanyId, id: PayableId) -> StoreResult<PayableRecord> {
        let payable = self.payables
            .iter_mut()
            .find(|p| p.company_id == company_id && p.id == id)
            .ok_or_else(|| StoreError::NotFound {
                entity: "payable",
                key: id.to_string(),
            })?;
        if payable.status == PAYABLE_STATUS_PAID {
            return Err(StoreError::Conflict {
                message: format!("{} {} is already paid", payable.kind, id),
            });
        }
        payable.status = PAYABLE_STATUS_PAID.to_string();
        Ok(payable.clone())
    }
}
