//! Basic types for the ledger engine

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Account type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Cash, receivables, equipment
    Asset,
    /// Payables, cards, loans
    Liability,
    /// Owner's capital and draws, retained earnings
    Equity,
    Revenue,
    Expense,
}

impl AccountType {
    /// Signed amount under the account's normal balance.
    ///
    /// Asset and expense accounts grow with debits; liability, equity and
    /// revenue accounts grow with credits.
    pub fn signed(&self, debit: Decimal, credit: Decimal) -> Decimal {
        match self {
            AccountType::Asset | AccountType::Expense => debit - credit,
            AccountType::Liability | AccountType::Equity | AccountType::Revenue => credit - debit,
        }
    }
}

impl std::str::FromStr for AccountType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asset" | "assets" => Ok(AccountType::Asset),
            "liability" | "liabilities" => Ok(AccountType::Liability),
            "equity" => Ok(AccountType::Equity),
            "revenue" | "income" => Ok(AccountType::Revenue),
            "expense" | "expenses" => Ok(AccountType::Expense),
            _ => Err(format!("Invalid account type: {}", s)),
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountType::Asset => write!(f, "asset"),
            AccountType::Liability => write!(f, "liability"),
            AccountType::Equity => write!(f, "equity"),
            AccountType::Revenue => write!(f, "revenue"),
            AccountType::Expense => write!(f, "expense"),
        }
    }
}

/// Coarse, user-facing kind of a cash movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
    Asset,
    Liability,
    Equity,
}

impl TransactionType {
    /// Account type a category of this transaction type normally resolves to
    pub fn natural_account_type(&self) -> AccountType {
        match self {
            TransactionType::Income => AccountType::Revenue,
            TransactionType::Expense => AccountType::Expense,
            TransactionType::Asset => AccountType::Asset,
            TransactionType::Liability => AccountType::Liability,
            TransactionType::Equity => AccountType::Equity,
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            "asset" => Ok(TransactionType::Asset),
            "liability" => Ok(TransactionType::Liability),
            "equity" => Ok(TransactionType::Equity),
            _ => Err(format!("Invalid transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Income => write!(f, "income"),
            TransactionType::Expense => write!(f, "expense"),
            TransactionType::Asset => write!(f, "asset"),
            TransactionType::Liability => write!(f, "liability"),
            TransactionType::Equity => write!(f, "equity"),
        }
    }
}

/// Where a journal entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalSource {
    #[default]
    Manual,
    Import,
    System,
}

impl std::str::FromStr for JournalSource {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "manual" => Ok(JournalSource::Manual),
            "import" => Ok(JournalSource::Import),
            "system" => Ok(JournalSource::System),
            _ => Err(format!("Invalid journal source: {}", s)),
        }
    }
}

impl std::fmt::Display for JournalSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JournalSource::Manual => write!(f, "manual"),
            JournalSource::Import => write!(f, "import"),
            JournalSource::System => write!(f, "system"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayableKind {
    Payable,
    Receivable,
}

impl std::str::FromStr for PayableKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "payable" => Ok(PayableKind::Payable),
            "receivable" => Ok(PayableKind::Receivable),
            _ => Err(format!("Invalid payable kind: {}", s)),
        }
    }
}

impl std::fmt::Display for PayableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PayableKind::Payable => write!(f, "payable"),
            PayableKind::Receivable => write!(f, "receivable"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayableStatus {
    #[default]
    Open,
    Paid,
}

impl std::str::FromStr for PayableStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(PayableStatus::Open),
            "paid" => Ok(PayableStatus::Paid),
            _ => Err(format!("Invalid payable status: {}", s)),
        }
    }
}

impl std::fmt::Display for PayableStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PayableStatus::Open => write!(f, "open"),
            PayableStatus::Paid => write!(f, "paid"),
        }
    }
}

/// Statements the engine can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportType {
    ProfitLoss,
    BalanceSheet,
    CashFlow,
    TrialBalance,
    GeneralLedger,
    ColumnarProfitLoss,
}

impl std::str::FromStr for ReportType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "profit-loss" => Ok(ReportType::ProfitLoss),
            "balance-sheet" => Ok(ReportType::BalanceSheet),
            "cash-flow" => Ok(ReportType::CashFlow),
            "trial-balance" => Ok(ReportType::TrialBalance),
            "general-ledger" => Ok(ReportType::GeneralLedger),
            "columnar-profit-loss" => Ok(ReportType::ColumnarProfitLoss),
            _ => Err(format!("Invalid report type: {}", s)),
        }
    }
}

impl std::fmt::Display for ReportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportType::ProfitLoss => write!(f, "profit-loss"),
            ReportType::BalanceSheet => write!(f, "balance-sheet"),
            ReportType::CashFlow => write!(f, "cash-flow"),
            ReportType::TrialBalance => write!(f, "trial-balance"),
            ReportType::GeneralLedger => write!(f, "general-ledger"),
            ReportType::ColumnarProfitLoss => write!(f, "columnar-profit-loss"),
        }
    }
}

/// Column width of a period-bucketed report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodMode {
    #[default]
    Monthly,
    Quarterly,
}

impl std::str::FromStr for PeriodMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "monthly" | "month" => Ok(PeriodMode::Monthly),
            "quarterly" | "quarter" => Ok(PeriodMode::Quarterly),
            _ => Err(format!("Invalid period mode: {}", s)),
        }
    }
}

impl std::fmt::Display for PeriodMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PeriodMode::Monthly => write!(f, "monthly"),
            PeriodMode::Quarterly => write!(f, "quarterly"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_account_type_from_str() {
        assert_eq!("asset".parse::<AccountType>().unwrap(), AccountType::Asset);
        assert_eq!("Liabilities".parse::<AccountType>().unwrap(), AccountType::Liability);
        assert_eq!("income".parse::<AccountType>().unwrap(), AccountType::Revenue);
        assert!("capital".parse::<AccountType>().is_err());
    }

    #[test]
    fn test_signed_follows_normal_balance() {
        assert_eq!(AccountType::Asset.signed(dec!(100), dec!(30)), dec!(70));
        assert_eq!(AccountType::Expense.signed(dec!(100), dec!(30)), dec!(70));
        assert_eq!(AccountType::Revenue.signed(dec!(100), dec!(30)), dec!(-70));
        assert_eq!(AccountType::Liability.signed(dec!(0), dec!(30)), dec!(30));
    }

    #[test]
    fn test_report_type_round_trips_kebab_case() {
        for name in ["profit-loss", "balance-sheet", "cash-flow", "trial-balance", "general-ledger", "columnar-profit-loss"] {
            let parsed: ReportType = name.parse().unwrap();
            assert_eq!(parsed.to_string(), name);
        }
        assert_eq!(serde_json::to_string(&ReportType::CashFlow).unwrap(), "\"cash-flow\"");
    }

    #[test]
    fn test_natural_account_type() {
        assert_eq!(TransactionType::Income.natural_account_type(), AccountType::Revenue);
        assert_eq!(TransactionType::Equity.natural_account_type(), AccountType::Equity);
    }
}
