//! Category classifier
//!
//! Maps free-text descriptions to canonical account names through an ordered
//! keyword table per transaction type. Matching is case-insensitive substring
//! search and the first matching rule wins.

use log::warn;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;

use crate::error::{CoreError, CoreResult};
use crate::models::Account;
use crate::registry::ChartOfAccounts;
use crate::types::TransactionType;

struct CategoryRule {
    keywords: &'static [&'static str],
    category: &'static str,
}

const fn rule(keywords: &'static [&'static str], category: &'static str) -> CategoryRule {
    CategoryRule { keywords, category }
}

const INCOME_RULES: &[CategoryRule] = &[
    rule(&["interest"], "Interest Income"),
    rule(&["consult", "service", "fee"], "Service Revenue"),
    rule(&["sale", "invoice", "order", "payment received"], "Sales Revenue"),
];

const EXPENSE_RULES: &[CategoryRule] = &[
    rule(&["rent", "lease"], "Rent"),
    rule(&["electric", "water", "utility", "utilities", "internet", "phone"], "Utilities"),
    rule(&["payroll", "salary", "wage"], "Salaries and Wages"),
    rule(&["insurance"], "Insurance"),
    rule(&["office", "staples", "supplies"], "Office Supplies"),
    rule(&["advertis", "marketing"], "Advertising"),
    rule(&["uber", "lyft", "flight", "airline", "hotel", "travel"], "Travel"),
    rule(&["restaurant", "meal", "lunch", "dinner", "coffee"], "Meals and Entertainment"),
    rule(&["software", "subscription", "saas"], "Software"),
    rule(&["bank fee", "service charge", "wire fee"], "Bank Fees"),
    rule(&["legal", "attorney", "accountant", "cpa"], "Professional Fees"),
    rule(&["inventory", "wholesale", "materials", "merchandise"], "Cost of Goods Sold"),
    rule(&["interest"], "Interest Expense"),
    rule(&["repair", "maintenance"], "Repairs and Maintenance"),
];

const ASSET_RULES: &[CategoryRule] = &[
    rule(&["equipment", "computer", "machinery", "laptop"], "Equipment"),
    rule(&["vehicle", "truck"], "Vehicles"),
    rule(&["furniture", "desk", "chair"], "Furniture and Fixtures"),
    rule(&["inventory", "stock"], "Inventory"),
    rule(&["receivable", "invoice"], "Accounts Receivable"),
    rule(&["deposit", "investment", "capital", "cash"], "Cash"),
];

const LIABILITY_RULES: &[CategoryRule] = &[
    rule(&["credit card", "amex", "visa", "mastercard"], "Credit Card"),
    rule(&["loan", "mortgage", "note payable"], "Loans Payable"),
    rule(&["tax"], "Sales Tax Payable"),
    rule(&["vendor", "bill", "payable", "supplier"], "Accounts Payable"),
];

const EQUITY_RULES: &[CategoryRule] = &[
    rule(&["draw", "withdraw", "distribution", "personal"], "Owner's Draws"),
    rule(&["investment", "contribution", "capital"], "Owner's Capital"),
];

struct CompiledRule {
    pattern: Regex,
    category: &'static str,
}

fn compile(rules: &[CategoryRule]) -> Vec<CompiledRule> {
    rules
        .iter()
        .map(|r| {
            let alternation = r.keywords
                .iter()
                .map(|k| regex::escape(k))
                .collect::<Vec<_>>()
                .join("|");
            CompiledRule {
                pattern: RegexBuilder::new(&alternation)
                    .case_insensitive(true)
                    .build()
                    .expect("escaped keyword alternation is a valid pattern"),
                category: r.category,
            }
        })
        .collect()
}

static RULES: Lazy<HashMap<TransactionType, Vec<CompiledRule>>> = Lazy::new(|| {
    HashMap::from([
        (TransactionType::Income, compile(INCOME_RULES)),
        (TransactionType::Expense, compile(EXPENSE_RULES)),
        (TransactionType::Asset, compile(ASSET_RULES)),
        (TransactionType::Liability, compile(LIABILITY_RULES)),
        (TransactionType::Equity, compile(EQUITY_RULES)),
    ])
});

/// Category used when no rule matches
pub fn fallback_category(transaction_type: TransactionType) -> &'static str {
    match transaction_type {
        TransactionType::Income => "Other Income",
        TransactionType::Expense => "Other Expenses",
        TransactionType::Asset => "Other Assets",
        TransactionType::Liability => "Other Liabilities",
        TransactionType::Equity => "Other Equity",
    }
}

/// Suggest a canonical account name for a description. Total and pure.
pub fn auto_categorize(description: &str, transaction_type: TransactionType) -> &'static str {
    RULES
        .get(&transaction_type)
        .and_then(|rules| rules.iter().find(|r| r.pattern.is_match(description)))
        .map(|r| r.category)
        .unwrap_or_else(|| fallback_category(transaction_type))
}

/// Map an externally supplied category onto a real account of `chart`.
///
/// An exact account name wins. Otherwise the proposal is run through
/// [`auto_categorize`] and the canonical name it yields must exist.
pub fn validate_and_map_category<'a>(
    chart: &'a ChartOfAccounts,
    proposed_category: &str,
    transaction_type: TransactionType,
) -> CoreResult<&'a Account> {
    let proposed = proposed_category.trim();
    let account = match chart.find(proposed) {
        Some(account) => account,
        None => {
            let canonical = auto_categorize(proposed, transaction_type);
            chart.find(canonical).ok_or_else(|| CoreError::UnmappableCategory {
                company_id: chart.company_id(),
                category: proposed.to_string(),
                transaction_type,
            })?
        }
    };

    if account.account_type != transaction_type.natural_account_type() {
        warn!(
            "Category '{}' for {} transaction resolved to {} account '{}' (company {})",
            proposed,
            transaction_type,
            account.account_type,
            account.account_name,
            chart.company_id()
        );
    }
    Ok(account)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::seeded_chart;
    use crate::types::AccountType;

    #[test]
    fn test_expense_rules() {
        assert_eq!(auto_categorize("March office RENT", TransactionType::Expense), "Rent");
        assert_eq!(auto_categorize("Comcast internet", TransactionType::Expense), "Utilities");
        assert_eq!(auto_categorize("Delta airline ticket", TransactionType::Expense), "Travel");
        assert_eq!(auto_categorize("Team lunch", TransactionType::Expense), "Meals and Entertainment");
        assert_eq!(auto_categorize("Monthly wire fee", TransactionType::Expense), "Bank Fees");
        assert_eq!(auto_categorize("Wholesale widgets", TransactionType::Expense), "Cost of Goods Sold");
    }

    #[test]
    fn test_first_rule_wins() {
        // "rent" precedes "office" in the expense table
        assert_eq!(auto_categorize("Office rent", TransactionType::Expense), "Rent");
        // "interest" precedes "service" for income
        assert_eq!(auto_categorize("Interest on service account", TransactionType::Income), "Interest Income");
    }

    #[test]
    fn test_fallbacks() {
        assert_eq!(auto_categorize("zzz", TransactionType::Income), "Other Income");
        assert_eq!(auto_categorize("zzz", TransactionType::Expense), "Other Expenses");
        assert_eq!(auto_categorize("zzz", TransactionType::Asset), "Other Assets");
        assert_eq!(auto_categorize("zzz", TransactionType::Liability), "Other Liabilities");
        assert_eq!(auto_categorize("", TransactionType::Equity), "Other Equity");
    }

    #[test]
    fn test_auto_categorize_is_deterministic() {
        for _ in 0..3 {
            assert_eq!(auto_categorize("Owner draw", TransactionType::Equity), "Owner's Draws");
            assert_eq!(auto_categorize("Visa statement", TransactionType::Liability), "Credit Card");
        }
    }

    #[test]
    fn test_every_rule_target_is_in_default_chart() {
        let chart = seeded_chart(1);
        let tables = [INCOME_RULES, EXPENSE_RULES, ASSET_RULES, LIABILITY_RULES, EQUITY_RULES];
        for table in tables {
            for r in table {
                assert!(chart.find(r.category).is_some(), "missing {}", r.category);
            }
        }
        for t in [TransactionType::Income, TransactionType::Expense, TransactionType::Asset] {
            assert!(chart.find(fallback_category(t)).is_some());
        }
    }

    #[test]
    fn test_exact_name_is_returned() {
        let chart = seeded_chart(1);
        let account = validate_and_map_category(&chart, "Insurance", TransactionType::Expense).unwrap();
        assert_eq!(account.account_name, "Insurance");
    }

    #[test]
    fn test_free_text_is_mapped() {
        let chart = seeded_chart(1);
        let account = validate_and_map_category(&chart, "adobe subscription", TransactionType::Expense).unwrap();
        assert_eq!(account.account_name, "Software");
    }

    #[test]
    fn test_unmappable_category() {
        let chart = ChartOfAccounts::new(1, vec![]);
        let err = validate_and_map_category(&chart, "anything", TransactionType::Expense).unwrap_err();
        assert!(matches!(
            err,
            CoreError::UnmappableCategory { transaction_type: TransactionType::Expense, .. }
        ));
    }

    #[test]
    fn test_type_mismatch_still_resolves() {
        let chart = seeded_chart(1);
        let account = validate_and_map_category(&chart, "Rent", TransactionType::Income).unwrap();
        assert_eq!(account.account_type, AccountType::Expense);
    }
}
