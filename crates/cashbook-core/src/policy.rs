//! Account-number boundaries that place accounts on statements

use cashbook_config::{AccountRange, ClassificationConfig};

use crate::models::AccountRef;
use crate::types::AccountType;

/// Profit & Loss section an account's activity lands in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PnlSection {
    Revenue,
    OtherIncome,
    CostOfGoodsSold,
    OperatingExpenses,
    OtherExpenses,
}

/// Cash Flow role of a balance-sheet account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CashFlowRole {
    /// The cash accounts themselves
    Cash,
    /// Non-cash current asset, working-capital adjustment
    CurrentAsset,
    /// Current liability, working-capital adjustment
    CurrentLiability,
    Investing,
    Financing,
}

#[derive(Debug, Clone)]
pub struct ClassificationPolicy {
    pub cash: AccountRange,
    pub current_assets: AccountRange,
    pub fixed_assets: AccountRange,
    pub current_liabilities: AccountRange,
    pub noncurrent_liabilities: AccountRange,
    pub cost_of_goods_sold: AccountRange,
    pub other_income: AccountRange,
    pub other_expenses: AccountRange,
    pub corresponding_account: String,
    pub retained_earnings_account: String,
    pub receivables_account: String,
    pub payables_account: String,
}

impl Default for ClassificationPolicy {
    fn default() -> Self {
        Self::from(&ClassificationConfig::default())
    }
}

impl From<&ClassificationConfig> for ClassificationPolicy {
    fn from(config: &ClassificationConfig) -> Self {
        Self {
            cash: config.cash,
            current_assets: config.current_assets,
            fixed_assets: config.fixed_assets,
            current_liabilities: config.current_liabilities,
            noncurrent_liabilities: config.noncurrent_liabilities,
            cost_of_goods_sold: config.cost_of_goods_sold,
            other_income: config.other_income,
            other_expenses: config.other_expenses,
            corresponding_account: config.corresponding_account.clone(),
            retained_earnings_account: config.retained_earnings_account.clone(),
            receivables_account: config.receivables_account.clone(),
            payables_account: config.payables_account.clone(),
        }
    }
}

fn in_range(range: &AccountRange, account: &AccountRef) -> bool {
    account.number().map_or(false, |n| range.contains(n))
}

impl ClassificationPolicy {
    /// P&L section for revenue and expense accounts, `None` for the rest
    pub fn pnl_section(&self, account: &AccountRef) -> Option<PnlSection> {
        match account.account_type {
            AccountType::Revenue => {
                if in_range(&self.other_income, account) {
                    Some(PnlSection::OtherIncome)
                } else {
                    Some(PnlSection::Revenue)
                }
            }
            AccountType::Expense => {
                if in_range(&self.cost_of_goods_sold, account) {
                    Some(PnlSection::CostOfGoodsSold)
                } else if in_range(&self.other_expenses, account) {
                    Some(PnlSection::OtherExpenses)
                } else {
                    Some(PnlSection::OperatingExpenses)
                }
            }
            AccountType::Asset | AccountType::Liability | AccountType::Equity => None,
        }
    }

    /// Cash Flow role for balance-sheet accounts, `None` for P&L accounts.
    ///
    /// Assets outside the cash and current ranges are treated as investing;
    /// liabilities outside the current range as financing.
    pub fn cash_flow_role(&self, account: &AccountRef) -> Option<CashFlowRole> {
        match account.account_type {
            AccountType::Asset => {
                if in_range(&self.cash, account) {
                    Some(CashFlowRole::Cash)
                } else if in_range(&self.current_assets, account) {
                    Some(CashFlowRole::CurrentAsset)
                } else {
                    Some(CashFlowRole::Investing)
                }
            }
            AccountType::Liability => {
                if in_range(&self.current_liabilities, account) {
                    Some(CashFlowRole::CurrentLiability)
                } else {
                    Some(CashFlowRole::Financing)
                }
            }
            AccountType::Equity => Some(CashFlowRole::Financing),
            AccountType::Revenue | AccountType::Expense => None,
        }
    }

    pub fn is_cash(&self, account: &AccountRef) -> bool {
        account.account_type == AccountType::Asset && in_range(&self.cash, account)
    }

    pub fn is_current_asset(&self, account: &AccountRef) -> bool {
        account.account_type == AccountType::Asset && in_range(&self.current_assets, account)
    }

    pub fn is_fixed_asset(&self, account: &AccountRef) -> bool {
        account.account_type == AccountType::Asset && in_range(&self.fixed_assets, account)
    }

    pub fn is_current_liability(&self, account: &AccountRef) -> bool {
        account.account_type == AccountType::Liability && in_range(&self.current_liabilities, account)
    }

    pub fn is_noncurrent_liability(&self, account: &AccountRef) -> bool {
        account.account_type == AccountType::Liability && in_range(&self.noncurrent_liabilities, account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(number: &str, account_type: AccountType) -> AccountRef {
        AccountRef {
            account_number: number.to_string(),
            account_name: format!("Account {}", number),
            id: 1,
            account_type,
        }
    }

    #[test]
    fn test_pnl_sections_by_range() {
        let policy = ClassificationPolicy::default();
        assert_eq!(policy.pnl_section(&account("4000", AccountType::Revenue)), Some(PnlSection::Revenue));
        assert_eq!(policy.pnl_section(&account("4900", AccountType::Revenue)), Some(PnlSection::OtherIncome));
        assert_eq!(policy.pnl_section(&account("5000", AccountType::Expense)), Some(PnlSection::CostOfGoodsSold));
        assert_eq!(policy.pnl_section(&account("5999", AccountType::Expense)), Some(PnlSection::CostOfGoodsSold));
        assert_eq!(policy.pnl_section(&account("6000", AccountType::Expense)), Some(PnlSection::OperatingExpenses));
        assert_eq!(policy.pnl_section(&account("7900", AccountType::Expense)), Some(PnlSection::OtherExpenses));
        assert_eq!(policy.pnl_section(&account("1000", AccountType::Asset)), None);
    }

    #[test]
    fn test_non_numeric_expense_is_operating() {
        let policy = ClassificationPolicy::default();
        assert_eq!(
            policy.pnl_section(&account("EXP-1", AccountType::Expense)),
            Some(PnlSection::OperatingExpenses)
        );
    }

    #[test]
    fn test_cash_flow_roles() {
        let policy = ClassificationPolicy::default();
        assert_eq!(policy.cash_flow_role(&account("1000", AccountType::Asset)), Some(CashFlowRole::Cash));
        assert_eq!(policy.cash_flow_role(&account("1100", AccountType::Asset)), Some(CashFlowRole::CurrentAsset));
        assert_eq!(policy.cash_flow_role(&account("1500", AccountType::Asset)), Some(CashFlowRole::Investing));
        assert_eq!(policy.cash_flow_role(&account("2100", AccountType::Liability)), Some(CashFlowRole::CurrentLiability));
        assert_eq!(policy.cash_flow_role(&account("2500", AccountType::Liability)), Some(CashFlowRole::Financing));
        assert_eq!(policy.cash_flow_role(&account("3000", AccountType::Equity)), Some(CashFlowRole::Financing));
        assert_eq!(policy.cash_flow_role(&account("6600", AccountType::Expense)), None);
    }

    #[test]
    fn test_balance_sheet_groupings() {
        let policy = ClassificationPolicy::default();
        assert!(policy.is_cash(&account("1000", AccountType::Asset)));
        assert!(!policy.is_cash(&account("1100", AccountType::Asset)));
        assert!(policy.is_current_asset(&account("1300", AccountType::Asset)));
        assert!(policy.is_fixed_asset(&account("1500", AccountType::Asset)));
        assert!(policy.is_current_liability(&account("2000", AccountType::Liability)));
        assert!(policy.is_noncurrent_liability(&account("2500", AccountType::Liability)));
        assert!(!policy.is_noncurrent_liability(&account("2500", AccountType::Equity)));
    }

    #[test]
    fn test_policy_follows_config() {
        let mut config = ClassificationConfig::default();
        config.cost_of_goods_sold = AccountRange::new(5000, 5500);
        let policy = ClassificationPolicy::from(&config);
        assert_eq!(
            policy.pnl_section(&account("5600", AccountType::Expense)),
            Some(PnlSection::OperatingExpenses)
        );
    }
}
