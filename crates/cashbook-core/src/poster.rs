//! Double-entry poster
//!
//! Turns a simplified transaction (type, category, amount, date) into a
//! balanced two-line journal entry against the chart of accounts.

use cashbook_store::{NewJournalEntry, NewLine};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::classifier::validate_and_map_category;
use crate::error::{CoreError, CoreResult};
use crate::registry::ChartOfAccounts;
use crate::types::{JournalSource, TransactionType};

pub const CASH: &str = "Cash";
pub const ACCOUNTS_RECEIVABLE: &str = "Accounts Receivable";
pub const SALES_REVENUE: &str = "Sales Revenue";
pub const OWNERS_CAPITAL: &str = "Owner's Capital";
pub const OWNERS_DRAWS: &str = "Owner's Draws";

/// Simplified, user-facing transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRequest {
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Account name or free text; blank means classify the description
    #[serde(default)]
    pub category: String,
    pub amount: Decimal,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub source: JournalSource,
    /// Replaces the configured balancing account, e.g. "Credit Card"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corresponding_account: Option<String>,
}

/// Debit and credit account names for one transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostingPlan {
    pub debit: String,
    pub credit: String,
}

impl PostingPlan {
    fn new(debit: &str, credit: &str) -> Self {
        Self {
            debit: debit.to_string(),
            credit: credit.to_string(),
        }
    }
}

/// Posting rule table.
///
/// `category` is the resolved account name and `corresponding` the
/// balancing account (normally "Cash").
pub fn posting_rule(transaction_type: TransactionType, category: &str, corresponding: &str) -> PostingPlan {
    match transaction_type {
        TransactionType::Income => PostingPlan::new(corresponding, category),
        TransactionType::Expense => PostingPlan::new(category, corresponding),
        TransactionType::Asset if category == CASH => PostingPlan::new(CASH, OWNERS_CAPITAL),
        TransactionType::Asset if category == ACCOUNTS_RECEIVABLE => {
            PostingPlan::new(ACCOUNTS_RECEIVABLE, SALES_REVENUE)
        }
        TransactionType::Asset => PostingPlan::new(category, corresponding),
        TransactionType::Liability => PostingPlan::new(category, corresponding),
        TransactionType::Equity if category == OWNERS_DRAWS => PostingPlan::new(OWNERS_DRAWS, corresponding),
        TransactionType::Equity => PostingPlan::new(corresponding, category),
    }
}

/// Rules whose counter account is fixed rather than the balancing account
pub fn has_fixed_counterpart(transaction_type: TransactionType, category: &str) -> bool {
    transaction_type == TransactionType::Asset && (category == CASH || category == ACCOUNTS_RECEIVABLE)
}

/// Fail unless debits equal credits within tolerance
pub fn check_balance(lines: &[NewLine], description: &str) -> CoreResult<()> {
    let debits: Decimal = lines.iter().map(|l| l.debit_amount).sum();
    let credits: Decimal = lines.iter().map(|l| l.credit_amount).sum();
    if lines.is_empty() || !crate::within_tolerance(debits - credits) {
        return Err(CoreError::ImbalancedEntry {
            debits,
            credits,
            description: description.to_string(),
        });
    }
    Ok(())
}

/// Derives journal entries from [`PostRequest`]s
#[derive(Debug, Clone)]
pub struct Poster {
    corresponding_account: String,
    decimal_places: u32,
}

impl Poster {
    pub fn new(corresponding_account: impl Into<String>, decimal_places: u32) -> Self {
        Self {
            corresponding_account: corresponding_account.into(),
            decimal_places,
        }
    }

    fn validate(&self, request: &PostRequest) -> CoreResult<()> {
        crate::validate_amount(request.amount, self.decimal_places)?;
        if request.category.trim().is_empty() && request.description.trim().is_empty() {
            return Err(CoreError::validation("either category or description is required"));
        }
        Ok(())
    }

    /// Build the balanced entry for `request` without writing anything
    pub fn draft(&self, chart: &ChartOfAccounts, request: &PostRequest) -> CoreResult<NewJournalEntry> {
        self.validate(request)?;

        let proposed = if request.category.trim().is_empty() {
            request.description.as_str()
        } else {
            request.category.as_str()
        };
        let category = validate_and_map_category(chart, proposed, request.transaction_type)?;

        let requested = request
            .corresponding_account
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty());
        let fixed = has_fixed_counterpart(request.transaction_type, &category.account_name);
        if fixed && requested.is_some() {
            return Err(CoreError::validation(format!(
                "{} postings to '{}' have a fixed counter account and take no correspondingAccount",
                request.transaction_type, category.account_name
            )));
        }
        let corresponding = if fixed {
            self.corresponding_account.as_str()
        } else {
            chart
                .resolve(requested.unwrap_or(self.corresponding_account.as_str()))?
                .account_name
                .as_str()
        };

        let plan = posting_rule(request.transaction_type, &category.account_name, corresponding);
        if plan.debit == plan.credit {
            return Err(CoreError::validation(format!(
                "category '{}' is the balancing account itself", plan.debit
            )));
        }
        let debit_account = chart.resolve(&plan.debit)?;
        let credit_account = chart.resolve(&plan.credit)?;

        let description = if request.description.trim().is_empty() {
            category.account_name.clone()
        } else {
            request.description.trim().to_string()
        };

        let lines = vec![
            NewLine {
                account_id: debit_account.id,
                debit_amount: request.amount,
                credit_amount: Decimal::ZERO,
                description: None,
            },
            NewLine {
                account_id: credit_account.id,
                debit_amount: Decimal::ZERO,
                credit_amount: request.amount,
                description: None,
            },
        ];
        check_balance(&lines, &description)?;

        Ok(NewJournalEntry {
            company_id: chart.company_id(),
            date: request.date,
            description,
            source: request.source.to_string(),
            lines,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::seeded_chart;
    use rust_decimal_macros::dec;

    fn chart() -> ChartOfAccounts {
        seeded_chart(1)
    }

    fn request(transaction_type: TransactionType, category: &str, amount: Decimal) -> PostRequest {
        PostRequest {
            transaction_type,
            category: category.to_string(),
            amount,
            description: String::new(),
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            source: JournalSource::Manual,
            corresponding_account: None,
        }
    }

    fn names(chart: &ChartOfAccounts, entry: &NewJournalEntry) -> (String, String) {
        let debit = entry.lines.iter().find(|l| l.debit_amount > Decimal::ZERO).unwrap();
        let credit = entry.lines.iter().find(|l| l.credit_amount > Decimal::ZERO).unwrap();
        (
            chart.find_by_id(debit.account_id).unwrap().account_name.clone(),
            chart.find_by_id(credit.account_id).unwrap().account_name.clone(),
        )
    }

    #[test]
    fn test_rule_table() {
        let cases = [
            (TransactionType::Income, "Sales Revenue", ("Cash", "Sales Revenue")),
            (TransactionType::Expense, "Rent", ("Rent", "Cash")),
            (TransactionType::Asset, "Cash", ("Cash", "Owner's Capital")),
            (TransactionType::Asset, "Accounts Receivable", ("Accounts Receivable", "Sales Revenue")),
            (TransactionType::Asset, "Equipment", ("Equipment", "Cash")),
            (TransactionType::Liability, "Loans Payable", ("Loans Payable", "Cash")),
            (TransactionType::Equity, "Owner's Draws", ("Owner's Draws", "Cash")),
            (TransactionType::Equity, "Owner's Capital", ("Cash", "Owner's Capital")),
        ];
        for (kind, category, (debit, credit)) in cases {
            assert_eq!(posting_rule(kind, category, "Cash"), PostingPlan::new(debit, credit), "{} {}", kind, category);
        }
    }

    #[test]
    fn test_draft_is_balanced_two_lines() {
        let chart = chart();
        let poster = Poster::new("Cash", 2);
        let entry = poster.draft(&chart, &request(TransactionType::Expense, "Rent", dec!(1200))).unwrap();

        assert_eq!(entry.lines.len(), 2);
        assert_eq!(entry.description, "Rent");
        assert_eq!(entry.source, "manual");
        assert_eq!(names(&chart, &entry), ("Rent".to_string(), "Cash".to_string()));
        assert!(check_balance(&entry.lines, &entry.description).is_ok());
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        let poster = Poster::new("Cash", 2);
        for amount in [dec!(0), dec!(-5)] {
            let err = poster.draft(&chart(), &request(TransactionType::Income, "Sales Revenue", amount)).unwrap_err();
            assert!(matches!(err, CoreError::ValidationError { .. }));
        }
    }

    #[test]
    fn test_excess_precision_rejected() {
        let poster = Poster::new("Cash", 2);
        let err = poster.draft(&chart(), &request(TransactionType::Income, "Sales Revenue", dec!(10.005))).unwrap_err();
        assert!(matches!(err, CoreError::ValidationError { .. }));
        assert!(poster.draft(&chart(), &request(TransactionType::Income, "Sales Revenue", dec!(10.50))).is_ok());
    }

    #[test]
    fn test_corresponding_override() {
        let chart = chart();
        let poster = Poster::new("Cash", 2);
        let mut req = request(TransactionType::Expense, "Software", dec!(49));
        req.corresponding_account = Some("Credit Card".to_string());
        let entry = poster.draft(&chart, &req).unwrap();
        assert_eq!(names(&chart, &entry), ("Software".to_string(), "Credit Card".to_string()));
    }

    #[test]
    fn test_oversized_amount_rejected() {
        let poster = Poster::new("Cash", 2);
        let huge = request(TransactionType::Income, "Sales Revenue", dec!(50000000000000000000000000000));
        assert!(matches!(poster.draft(&chart(), &huge), Err(CoreError::ValidationError { .. })));

        let at_limit = request(TransactionType::Income, "Sales Revenue", crate::max_amount());
        assert!(poster.draft(&chart(), &at_limit).is_ok());
        let over = request(TransactionType::Income, "Sales Revenue", crate::max_amount() + dec!(0.01));
        assert!(matches!(poster.draft(&chart(), &over), Err(CoreError::ValidationError { .. })));
    }

    #[test]
    fn test_fixed_counterpart_rejects_override() {
        let poster = Poster::new("Cash", 2);
        for category in ["Cash", "Accounts Receivable"] {
            let mut req = request(TransactionType::Asset, category, dec!(100));
            req.corresponding_account = Some("Credit Card".to_string());
            let err = poster.draft(&chart(), &req).unwrap_err();
            assert!(matches!(err, CoreError::ValidationError { .. }), "{}", category);
        }
    }

    #[test]
    fn test_fixed_counterpart_needs_no_balancing_account() {
        let chart = chart();
        let poster = Poster::new("Checking", 2);
        let entry = poster
            .draft(&chart, &request(TransactionType::Asset, "Accounts Receivable", dec!(75)))
            .unwrap();
        assert_eq!(names(&chart, &entry), ("Accounts Receivable".to_string(), "Sales Revenue".to_string()));
    }

    #[test]
    fn test_unknown_corresponding_account() {
        let poster = Poster::new("Checking", 2);
        let err = poster.draft(&chart(), &request(TransactionType::Expense, "Rent", dec!(1))).unwrap_err();
        assert!(matches!(err, CoreError::UnresolvedAccount { .. }));
    }

    #[test]
    fn test_blank_category_classifies_description() {
        let chart = chart();
        let poster = Poster::new("Cash", 2);
        let mut req = request(TransactionType::Expense, "", dec!(15));
        req.description = "Starbucks coffee".to_string();
        let entry = poster.draft(&chart, &req).unwrap();
        assert_eq!(names(&chart, &entry).0, "Meals and Entertainment");
        assert_eq!(entry.description, "Starbucks coffee");

        req.description = String::new();
        assert!(matches!(poster.draft(&chart, &req), Err(CoreError::ValidationError { .. })));
    }

    #[test]
    fn test_self_balancing_category_rejected() {
        let poster = Poster::new("Cash", 2);
        let err = poster.draft(&chart(), &request(TransactionType::Expense, "Cash", dec!(5))).unwrap_err();
        assert!(matches!(err, CoreError::ValidationError { .. }));
    }

    #[test]
    fn test_imbalance_detected() {
        let lines = vec![
            NewLine { account_id: 1, debit_amount: dec!(10), credit_amount: Decimal::ZERO, description: None },
            NewLine { account_id: 2, debit_amount: Decimal::ZERO, credit_amount: dec!(9.98), description: None },
        ];
        let err = check_balance(&lines, "broken").unwrap_err();
        assert!(matches!(err, CoreError::ImbalancedEntry { .. }));
        assert!(check_balance(&[], "empty").is_err());
    }
}
