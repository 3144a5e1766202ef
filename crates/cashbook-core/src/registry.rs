//! Chart of Accounts registry
//!
//! Every posting and aggregation resolves accounts through here. Names are
//! the posting key; numbers only decide statement placement.

use cashbook_store::{AccountId, CompanyId, NewAccount, StoreError, StoreRef};
use log::{debug, info};

use crate::error::{CoreError, CoreResult};
use crate::models::Account;
use crate::types::AccountType;

/// Seed entry of the default chart of accounts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DefaultAccount {
    pub number: &'static str,
    pub name: &'static str,
    pub account_type: AccountType,
}

const fn seed(number: &'static str, name: &'static str, account_type: AccountType) -> DefaultAccount {
    DefaultAccount { number, name, account_type }
}

const DEFAULT_CHART: &[DefaultAccount] = &[
    seed("1000", "Cash", AccountType::Asset),
    seed("1100", "Accounts Receivable", AccountType::Asset),
    seed("1200", "Inventory", AccountType::Asset),
    seed("1300", "Prepaid Expenses", AccountType::Asset),
    seed("1500", "Equipment", AccountType::Asset),
    seed("1600", "Vehicles", AccountType::Asset),
    seed("1700", "Furniture and Fixtures", AccountType::Asset),
    seed("1900", "Other Assets", AccountType::Asset),
    seed("2000", "Accounts Payable", AccountType::Liability),
    seed("2100", "Credit Card", AccountType::Liability),
    seed("2200", "Sales Tax Payable", AccountType::Liability),
    seed("2400", "Other Liabilities", AccountType::Liability),
    seed("2500", "Loans Payable", AccountType::Liability),
    seed("3000", "Owner's Capital", AccountType::Equity),
    seed("3100", "Owner's Draws", AccountType::Equity),
    seed("3200", "Retained Earnings", AccountType::Equity),
    seed("3900", "Other Equity", AccountType::Equity),
    seed("4000", "Sales Revenue", AccountType::Revenue),
    seed("4100", "Service Revenue", AccountType::Revenue),
    seed("4900", "Interest Income", AccountType::Revenue),
    seed("4950", "Other Income", AccountType::Revenue),
    seed("5000", "Cost of Goods Sold", AccountType::Expense),
    seed("6000", "Advertising", AccountType::Expense),
    seed("6100", "Bank Fees", AccountType::Expense),
    seed("6200", "Insurance", AccountType::Expense),
    seed("6300", "Meals and Entertainment", AccountType::Expense),
    seed("6400", "Office Supplies", AccountType::Expense),
    seed("6500", "Professional Fees", AccountType::Expense),
    seed("6600", "Rent", AccountType::Expense),
    seed("6700", "Repairs and Maintenance", AccountType::Expense),
    seed("6800", "Salaries and Wages", AccountType::Expense),
    seed("6900", "Software", AccountType::Expense),
    seed("7000", "Travel", AccountType::Expense),
    seed("7100", "Utilities", AccountType::Expense),
    seed("7500", "Other Expenses", AccountType::Expense),
    seed("7900", "Interest Expense", AccountType::Expense),
];

/// Accounts a newly onboarded company starts with.
///
/// Contains every name the category classifier and the posting rules can
/// produce, so a seeded company can post any simplified transaction.
pub fn default_chart_of_accounts() -> &'static [DefaultAccount] {
    DEFAULT_CHART
}

/// Snapshot of a company's active accounts, ordered by account number
#[derive(Debug, Clone, Default)]
pub struct ChartOfAccounts {
    company_id: CompanyId,
    accounts: Vec<Account>,
}

impl ChartOfAccounts {
    pub fn new(company_id: CompanyId, mut accounts: Vec<Account>) -> Self {
        accounts.retain(|a| a.is_active && a.company_id == company_id);
        accounts.sort_by(|a, b| a.account_number.cmp(&b.account_number));
        Self { company_id, accounts }
    }

    pub fn company_id(&self) -> CompanyId {
        self.company_id
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Exact, case-sensitive name lookup
    pub fn find(&self, name: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.account_name == name)
    }

    pub fn find_by_id(&self, id: AccountId) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }

    pub fn resolve(&self, name: &str) -> CoreResult<&Account> {
        self.find(name).ok_or_else(|| CoreError::UnresolvedAccount {
            company_id: self.company_id,
            name: name.to_string(),
        })
    }
}

/// Default chart for `company_id` without going through a store
#[cfg(test)]
pub(crate) fn seeded_chart(company_id: CompanyId) -> ChartOfAccounts {
    let accounts = default_chart_of_accounts()
        .iter()
        .enumerate()
        .map(|(i, entry)| Account {
            id: i as AccountId + 1,
            company_id,
            account_number: entry.number.to_string(),
            account_name: entry.name.to_string(),
            account_type: entry.account_type,
            is_active: true,
        })
        .collect();
    ChartOfAccounts::new(company_id, accounts)
}

/// Store-backed account registry
#[derive(Clone)]
pub struct AccountRegistry {
    store: StoreRef,
}

impl AccountRegistry {
    pub fn new(store: StoreRef) -> Self {
        Self { store }
    }

    /// Active accounts ordered by account number
    pub async fn list_active_accounts(&self, company_id: CompanyId) -> CoreResult<Vec<Account>> {
        Ok(self.chart(company_id).await?.accounts)
    }

    pub async fn chart(&self, company_id: CompanyId) -> CoreResult<ChartOfAccounts> {
        let records = self.store.fetch_accounts(company_id).await?;
        let accounts = records
            .into_iter()
            .map(Account::try_from)
            .collect::<CoreResult<Vec<_>>>()?;
        Ok(ChartOfAccounts::new(company_id, accounts))
    }

    pub async fn resolve_account(&self, company_id: CompanyId, account_name: &str) -> CoreResult<Account> {
        self.chart(company_id).await?.resolve(account_name).cloned()
    }

    /// Add one account; the name must be unused for the company
    pub async fn add_account(
        &self,
        company_id: CompanyId,
        account_number: &str,
        account_name: &str,
        account_type: AccountType,
    ) -> CoreResult<Account> {
        let account_name = account_name.trim();
        let account_number = account_number.trim();
        if account_name.is_empty() {
            return Err(CoreError::validation("accountName is required"));
        }
        if account_number.is_empty() {
            return Err(CoreError::validation("accountNumber is required"));
        }

        let record = self.store
            .insert_account(NewAccount {
                company_id,
                account_number: account_number.to_string(),
                account_name: account_name.to_string(),
                account_type: account_type.to_string(),
            })
            .await
            .map_err(|e| match e {
                StoreError::Conflict { .. } => CoreError::DuplicateAccount {
                    company_id,
                    name: account_name.to_string(),
                },
                other => other.into(),
            })?;
        debug!("Added account {} {} for company {}", account_number, account_name, company_id);
        Account::try_from(record)
    }

    /// Mark an account inactive. It stays in history but cannot be posted to.
    pub async fn deactivate_account(&self, company_id: CompanyId, account_name: &str) -> CoreResult<Account> {
        let record = self.store
            .deactivate_account(company_id, account_name)
            .await
            .map_err(|e| match e {
                StoreError::NotFound { .. } => CoreError::UnresolvedAccount {
                    company_id,
                    name: account_name.to_string(),
                },
                other => other.into(),
            })?;
        info!("Deactivated account '{}' for company {}", account_name, company_id);
        Account::try_from(record)
    }

    /// Seed the default chart. Names that already exist, active or not, are
    /// left alone, so onboarding twice adds nothing.
    pub async fn onboard_company(&self, company_id: CompanyId) -> CoreResult<Vec<Account>> {
        let mut created = Vec::new();
        for entry in default_chart_of_accounts() {
            match self.add_account(company_id, entry.number, entry.name, entry.account_type).await {
                Ok(account) => created.push(account),
                Err(CoreError::DuplicateAccount { .. }) => {}
                Err(e) => return Err(e),
            }
        }
        info!("Onboarded company {} with {} new accounts", company_id, created.len());
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cashbook_store::MemoryStore;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn registry() -> AccountRegistry {
        AccountRegistry::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_default_chart_is_unique_and_sorted() {
        let chart = default_chart_of_accounts();
        let names: HashSet<&str> = chart.iter().map(|a| a.name).collect();
        assert_eq!(names.len(), chart.len());
        for pair in chart.windows(2) {
            assert!(pair[0].number < pair[1].number);
        }
    }

    #[tokio::test]
    async fn test_onboard_is_idempotent() {
        let registry = registry();
        let first = registry.onboard_company(1).await.unwrap();
        assert_eq!(first.len(), default_chart_of_accounts().len());

        let second = registry.onboard_company(1).await.unwrap();
        assert!(second.is_empty());
        assert_eq!(
            registry.list_active_accounts(1).await.unwrap().len(),
            default_chart_of_accounts().len()
        );
    }

    #[tokio::test]
    async fn test_list_active_is_ordered_by_number() {
        let registry = registry();
        registry.add_account(1, "6600", "Rent", AccountType::Expense).await.unwrap();
        registry.add_account(1, "1000", "Cash", AccountType::Asset).await.unwrap();
        let accounts = registry.list_active_accounts(1).await.unwrap();
        assert_eq!(accounts[0].account_name, "Cash");
        assert_eq!(accounts[1].account_name, "Rent");
    }

    #[tokio::test]
    async fn test_resolve_unknown_account() {
        let registry = registry();
        registry.onboard_company(1).await.unwrap();
        assert_eq!(registry.resolve_account(1, "Rent").await.unwrap().account_number, "6600");

        let err = registry.resolve_account(1, "Yacht").await.unwrap_err();
        assert!(matches!(err, CoreError::UnresolvedAccount { company_id: 1, .. }));
        // other companies do not see company 1's chart
        assert!(registry.resolve_account(2, "Rent").await.is_err());
    }

    #[tokio::test]
    async fn test_duplicate_account_rejected() {
        let registry = registry();
        registry.add_account(1, "1000", "Cash", AccountType::Asset).await.unwrap();
        let err = registry.add_account(1, "1001", "Cash", AccountType::Asset).await.unwrap_err();
        assert!(matches!(err, CoreError::DuplicateAccount { .. }));
    }

    #[tokio::test]
    async fn test_deactivated_account_no_longer_resolves() {
        let registry = registry();
        registry.onboard_company(1).await.unwrap();
        registry.deactivate_account(1, "Vehicles").await.unwrap();
        assert!(registry.resolve_account(1, "Vehicles").await.is_err());

        let err = registry.deactivate_account(1, "Spaceships").await.unwrap_err();
        assert!(matches!(err, CoreError::UnresolvedAccount { .. }));
    }

    #[test]
    fn test_chart_snapshot_filters_inactive() {
        let accounts = vec![
            Account {
                id: 1,
                company_id: 1,
                account_number: "1000".into(),
                account_name: "Cash".into(),
                account_type: AccountType::Asset,
                is_active: false,
            },
            Account {
                id: 2,
                company_id: 1,
                account_number: "2000".into(),
                account_name: "Accounts Payable".into(),
                account_type: AccountType::Liability,
                is_active: true,
            },
        ];
        let chart = ChartOfAccounts::new(1, accounts);
        assert!(chart.find("Cash").is_none());
        assert_eq!(chart.find_by_id(2).unwrap().account_name, "Accounts Payable");
    }
}
