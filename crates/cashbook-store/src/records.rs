//! Row shapes exchanged with the storage backend
//!
//! Enumerated columns (account type, source, payable kind and status) travel
//! as their lowercase text form, the way a relational store keeps them. The
//! core crate decodes them into typed values.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub type CompanyId = i64;
pub type AccountId = i64;
pub type JournalEntryId = i64;
pub type TransactionEntryId = i64;
pub type PayableId = i64;

pub const PAYABLE_STATUS_OPEN: &str = "open";
pub const PAYABLE_STATUS_PAID: &str = "paid";

/// Chart of accounts row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub id: AccountId,
    pub company_id: CompanyId,
    pub account_number: String,
    pub account_name: String,
    pub account_type: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAccount {
    pub company_id: CompanyId,
    pub account_number: String,
    pub account_name: String,
    pub account_type: String,
}

/// Journal entry header with its lines, each joined to its account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntryRecord {
    pub id: JournalEntryId,
    pub company_id: CompanyId,
    pub date: NaiveDate,
    pub description: String,
    pub source: String,
    pub is_reversed: bool,
    pub lines: Vec<LineRecord>,
}

/// Transaction entry joined to its account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineRecord {
    pub id: TransactionEntryId,
    pub account_id: AccountId,
    pub account_number: String,
    pub account_name: String,
    pub account_type: String,
    pub debit_amount: Decimal,
    pub credit_amount: Decimal,
    pub description: Option<String>,
}

/// Header plus lines for the single transactional journal write
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewJournalEntry {
    pub company_id: CompanyId,
    pub date: NaiveDate,
    pub description: String,
    pub source: String,
    pub lines: Vec<NewLine>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLine {
    pub account_id: AccountId,
    pub debit_amount: Decimal,
    pub credit_amount: Decimal,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayableRecord {
    pub id: PayableId,
    pub company_id: CompanyId,
    pub kind: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPayable {
    pub company_id: CompanyId,
    pub kind: String,
    pub description: String,
    pub amount: Decimal,
    pub due_date: NaiveDate,
}

/// Date window for journal reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateFilter {
    /// `from <= date <= to`
    Range { from: NaiveDate, to: NaiveDate },
    /// `date <= as_of`, no lower bound
    AsOf(NaiveDate),
}

impl DateFilter {
    pub fn contains(&self, date: NaiveDate) -> bool {
        match *self {
            DateFilter::Range { from, to } => date >= from && date <= to,
            DateFilter::AsOf(as_of) => date <= as_of,
        }
    }
}
