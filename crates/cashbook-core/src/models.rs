//! Core data models for the ledger

use cashbook_store::{
    AccountId, AccountRecord, CompanyId, JournalEntryId, JournalEntryRecord, LineRecord,
    PayableId, PayableRecord, TransactionEntryId,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::{AccountType, JournalSource, PayableKind, PayableStatus};

fn decode<T>(value: &str, column: &str) -> CoreResult<T>
where
    T: std::str::FromStr<Err = String>,
{
    value.parse().map_err(|e: String| CoreError::InvalidRecord {
        message: format!("{}: {}", column, e),
    })
}

/// Chart of accounts entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: AccountId,
    pub company_id: CompanyId,
    /// Sortable number, its range decides statement placement
    pub account_number: String,
    /// Unique per company, the posting key
    pub account_name: String,
    pub account_type: AccountType,
    pub is_active: bool,
}

impl Account {
    pub fn account_ref(&self) -> AccountRef {
        AccountRef {
            account_number: self.account_number.clone(),
            account_name: self.account_name.clone(),
            id: self.id,
            account_type: self.account_type,
        }
    }
}

impl TryFrom<AccountRecord> for Account {
    type Error = CoreError;

    fn try_from(record: AccountRecord) -> CoreResult<Self> {
        Ok(Self {
            id: record.id,
            company_id: record.company_id,
            account_type: decode(&record.account_type, "account_type")?,
            account_number: record.account_number,
            account_name: record.account_name,
            is_active: record.is_active,
        })
    }
}

/// Validated account key for aggregates.
///
/// Orders by account number, then name, so maps keyed by it iterate in
/// chart order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRef {
    pub account_number: String,
    pub account_name: String,
    pub id: AccountId,
    pub account_type: AccountType,
}

impl AccountRef {
    /// Numeric account number, `None` when the number is not purely digits
    pub fn number(&self) -> Option<u32> {
        self.account_number.trim().parse().ok()
    }
}

/// One posted line of a journal entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionEntry {
    pub id: TransactionEntryId,
    pub account: AccountRef,
    pub debit_amount: Decimal,
    pub credit_amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TryFrom<LineRecord> for TransactionEntry {
    type Error = CoreError;

    fn try_from(record: LineRecord) -> CoreResult<Self> {
        Ok(Self {
            id: record.id,
            account: AccountRef {
                account_type: decode(&record.account_type, "account_type")?,
                account_number: record.account_number,
                account_name: record.account_name,
                id: record.account_id,
            },
            debit_amount: record.debit_amount,
            credit_amount: record.credit_amount,
            description: record.description,
        })
    }
}

/// Journal entry header with its ordered lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: JournalEntryId,
    pub company_id: CompanyId,
    pub date: NaiveDate,
    pub description: String,
    pub source: JournalSource,
    pub is_reversed: bool,
    pub lines: Vec<TransactionEntry>,
}

impl JournalEntry {
    pub fn total_debits(&self) -> Decimal {
        self.lines.iter().map(|l| l.debit_amount).sum()
    }

    pub fn total_credits(&self) -> Decimal {
        self.lines.iter().map(|l| l.credit_amount).sum()
    }

    pub fn is_balanced(&self) -> bool {
        crate::within_tolerance(self.total_debits() - self.total_credits())
    }
}

impl TryFrom<JournalEntryRecord> for JournalEntry {
    type Error = CoreError;

    fn try_from(record: JournalEntryRecord) -> CoreResult<Self> {
        let lines = record.lines
            .into_iter()
            .map(TransactionEntry::try_from)
            .collect::<CoreResult<Vec<_>>>()?;
        Ok(Self {
            id: record.id,
            company_id: record.company_id,
            date: record.date,
            source: decode(&record.source, "source")?,
            description: record.description,
            is_reversed: record.is_reversed,
            lines,
        })
    }
}

/// Open or settled bill/invoice kept outside the ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayableReceivable {
    pub id: PayableId,
    pub company_id: CompanyId,
    #[serde(rename = "type")]
    pub kind: PayableKind,
    pub description: String,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub status: PayableStatus,
}

impl PayableReceivable {
    pub fn is_open(&self) -> bool {
        self.status == PayableStatus::Open
    }
}

impl TryFrom<PayableRecord> for PayableReceivable {
    type Error = CoreError;

    fn try_from(record: PayableRecord) -> CoreResult<Self> {
        Ok(Self {
            id: record.id,
            company_id: record.company_id,
            kind: decode(&record.kind, "kind")?,
            status: decode(&record.status, "status")?,
            description: record.description,
            amount: record.amount,
            due_date: record.due_date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn line(id: i64, name: &str, kind: &str, debit: Decimal, credit: Decimal) -> LineRecord {
        LineRecord {
            id,
            account_id: id,
            account_number: format!("{}", 1000 * id),
            account_name: name.to_string(),
            account_type: kind.to_string(),
            debit_amount: debit,
            credit_amount: credit,
            description: None,
        }
    }

    #[test]
    fn test_account_record_decodes() {
        let account = Account::try_from(AccountRecord {
            id: 1,
            company_id: 2,
            account_number: "6600".to_string(),
            account_name: "Rent".to_string(),
            account_type: "expense".to_string(),
            is_active: true,
        }).unwrap();
        assert_eq!(account.account_type, AccountType::Expense);
        assert_eq!(account.account_ref().number(), Some(6600));
    }

    #[test]
    fn test_unknown_account_type_is_invalid_record() {
        let result = Account::try_from(AccountRecord {
            id: 1,
            company_id: 2,
            account_number: "9999".to_string(),
            account_name: "Mystery".to_string(),
            account_type: "gadget".to_string(),
            is_active: true,
        });
        assert!(matches!(result, Err(CoreError::InvalidRecord { .. })));
    }

    #[test]
    fn test_journal_entry_balance() {
        let entry = JournalEntry::try_from(JournalEntryRecord {
            id: 1,
            company_id: 1,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            description: "Sale".to_string(),
            source: "import".to_string(),
            is_reversed: false,
            lines: vec![
                line(1, "Cash", "asset", dec!(99.995), dec!(0)),
                line(4, "Sales Revenue", "revenue", dec!(0), dec!(100)),
            ],
        }).unwrap();
        assert_eq!(entry.source, JournalSource::Import);
        assert_eq!(entry.total_credits(), dec!(100));
        assert!(entry.is_balanced());
    }

    #[test]
    fn test_account_ref_orders_by_number() {
        let mut refs = vec![
            AccountRef { account_number: "6600".into(), account_name: "Rent".into(), id: 2, account_type: AccountType::Expense },
            AccountRef { account_number: "1000".into(), account_name: "Cash".into(), id: 9, account_type: AccountType::Asset },
        ];
        refs.sort();
        assert_eq!(refs[0].account_name, "Cash");
        assert_eq!(refs[1].number(), Some(6600));
    }

    #[test]
    fn test_payable_serializes_kind_as_type() {
        let payable = PayableReceivable::try_from(PayableRecord {
            id: 1,
            company_id: 1,
            kind: "receivable".to_string(),
            description: "Invoice 12".to_string(),
            amount: dec!(80),
            due_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            status: "open".to_string(),
        }).unwrap();
        assert!(payable.is_open());
        let json = serde_json::to_value(&payable).unwrap();
        assert_eq!(json["type"], "receivable");
        assert_eq!(json["dueDate"], "2024-03-01");
    }
}
