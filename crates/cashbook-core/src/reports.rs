//! Report structures for API responses

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::AccountRef;
use crate::time::PeriodDefinition;
use crate::types::{AccountType, PeriodMode};

/// One account line of a statement section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementLine {
    pub account_number: String,
    pub account_name: String,
    pub amount: Decimal,
}

impl StatementLine {
    pub fn new(account: &AccountRef, amount: Decimal) -> Self {
        Self {
            account_number: account.account_number.clone(),
            account_name: account.account_name.clone(),
            amount,
        }
    }
}

/// Sum of `amount` over a section
pub fn section_total(lines: &[StatementLine]) -> Decimal {
    lines.iter().map(|l| l.amount).sum()
}

// ==================== Statements ====================

/// Profit & Loss for a date range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitAndLoss {
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub revenue: Vec<StatementLine>,
    pub cost_of_goods_sold: Vec<StatementLine>,
    pub operating_expenses: Vec<StatementLine>,
    pub other_income: Vec<StatementLine>,
    pub other_expenses: Vec<StatementLine>,
    pub total_revenue: Decimal,
    pub total_cost_of_goods_sold: Decimal,
    pub total_operating_expenses: Decimal,
    pub total_other_income: Decimal,
    pub total_other_expenses: Decimal,
    pub gross_profit: Decimal,
    pub operating_income: Decimal,
    pub net_income: Decimal,
}

/// Balance Sheet as of a date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSheet {
    pub as_of_date: NaiveDate,
    pub assets: Vec<StatementLine>,
    pub liabilities: Vec<StatementLine>,
    pub equity: Vec<StatementLine>,
    pub total_current_assets: Decimal,
    pub total_fixed_assets: Decimal,
    pub total_assets: Decimal,
    pub total_current_liabilities: Decimal,
    pub total_long_term_liabilities: Decimal,
    pub total_liabilities: Decimal,
    pub total_equity: Decimal,
    pub total_liabilities_and_equity: Decimal,
    /// Cumulative net income rolled into retained earnings
    pub net_income: Decimal,
    pub is_balanced: bool,
    /// `totalAssets - totalLiabilitiesAndEquity`
    pub discrepancy: Decimal,
}

/// Cash Flow statement, indirect method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowStatement {
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub net_income: Decimal,
    /// Working-capital adjustments, signed by their effect on cash
    pub operating_activities: Vec<StatementLine>,
    pub investing_activities: Vec<StatementLine>,
    pub financing_activities: Vec<StatementLine>,
    pub total_operating: Decimal,
    pub total_investing: Decimal,
    pub total_financing: Decimal,
    pub net_cash_flow: Decimal,
    pub beginning_cash: Decimal,
    pub ending_cash: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialBalanceLine {
    pub account_number: String,
    pub account_name: String,
    pub account_type: AccountType,
    pub debit: Decimal,
    pub credit: Decimal,
    pub balance: Decimal,
}

/// Trial Balance as of a date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialBalance {
    pub as_of_date: NaiveDate,
    pub lines: Vec<TrialBalanceLine>,
    pub total_debits: Decimal,
    pub total_credits: Decimal,
    pub is_balanced: bool,
    pub discrepancy: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerPosting {
    pub date: NaiveDate,
    pub journal_entry_id: i64,
    pub description: String,
    pub debit: Decimal,
    pub credit: Decimal,
    pub running_balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerAccount {
    pub account_number: String,
    pub account_name: String,
    pub account_type: AccountType,
    pub total_debits: Decimal,
    pub total_credits: Decimal,
    pub balance: Decimal,
    pub postings: Vec<LedgerPosting>,
}

/// General Ledger as of a date, every active account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralLedger {
    pub as_of_date: NaiveDate,
    pub accounts: Vec<LedgerAccount>,
    pub total_debits: Decimal,
    pub total_credits: Decimal,
}

// ==================== Columnar P&L ====================

/// Per-period amounts plus the row total
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodAmounts {
    pub amounts: BTreeMap<String, Decimal>,
    pub total: Decimal,
}

impl PeriodAmounts {
    /// Amounts for every period key, missing keys as zero
    pub fn from_fn(periods: &[PeriodDefinition], amount: impl Fn(&str) -> Decimal) -> Self {
        let amounts: BTreeMap<String, Decimal> = periods
            .iter()
            .map(|p| (p.key.clone(), amount(&p.key)))
            .collect();
        let total = amounts.values().copied().sum();
        Self { amounts, total }
    }

    pub fn get(&self, key: &str) -> Decimal {
        self.amounts.get(key).copied().unwrap_or(Decimal::ZERO)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnarLine {
    pub account_number: String,
    pub account_name: String,
    #[serde(flatten)]
    pub values: PeriodAmounts,
}

/// Profit & Loss split into monthly or quarterly columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnarProfitAndLoss {
    pub year: i32,
    pub mode: PeriodMode,
    pub periods: Vec<PeriodDefinition>,
    pub revenue: Vec<ColumnarLine>,
    pub cost_of_goods_sold: Vec<ColumnarLine>,
    pub operating_expenses: Vec<ColumnarLine>,
    pub other_income: Vec<ColumnarLine>,
    pub other_expenses: Vec<ColumnarLine>,
    pub total_revenue: PeriodAmounts,
    pub total_cost_of_goods_sold: PeriodAmounts,
    pub total_operating_expenses: PeriodAmounts,
    pub total_other_income: PeriodAmounts,
    pub total_other_expenses: PeriodAmounts,
    pub gross_profit: PeriodAmounts,
    pub operating_income: PeriodAmounts,
    pub net_income: PeriodAmounts,
}

/// Any report, serialized as the report itself
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReportDto {
    ProfitAndLoss(ProfitAndLoss),
    BalanceSheet(BalanceSheet),
    CashFlow(CashFlowStatement),
    TrialBalance(TrialBalance),
    GeneralLedger(GeneralLedger),
    ColumnarProfitAndLoss(ColumnarProfitAndLoss),
}

impl ReportDto {
    /// Balance check result for reports that carry one
    pub fn is_balanced(&self) -> Option<bool> {
        match self {
            ReportDto::BalanceSheet(r) => Some(r.is_balanced),
            ReportDto::TrialBalance(r) => Some(r.is_balanced),
            ReportDto::ProfitAndLoss(_)
            | ReportDto::CashFlow(_)
            | ReportDto::GeneralLedger(_)
            | ReportDto::ColumnarProfitAndLoss(_) => None,
        }
    }
}
