//! Ledger aggregator
//!
//! Folds posted journal entries into per-account debit/credit totals. Totals
//! are keyed by [`AccountRef`] so every aggregate refers to a resolved
//! account. Reversed entries never contribute, whatever the store returned.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::models::{AccountRef, JournalEntry, TransactionEntry};
use crate::time::{period_for, DateRange, PeriodDefinition};

/// Raw totals of one account over some window
#[derive(Debug, Clone, PartialEq)]
pub struct AccountActivity {
    pub account: AccountRef,
    pub total_debits: Decimal,
    pub total_credits: Decimal,
}

impl AccountActivity {
    fn new(account: AccountRef) -> Self {
        Self {
            account,
            total_debits: Decimal::ZERO,
            total_credits: Decimal::ZERO,
        }
    }

    fn add(&mut self, line: &TransactionEntry) {
        self.total_debits += line.debit_amount;
        self.total_credits += line.credit_amount;
    }

    /// Signed amount under the account's normal balance
    pub fn amount(&self) -> Decimal {
        self.account.account_type.signed(self.total_debits, self.total_credits)
    }
}

/// Per-account totals, iterated in account-number order
#[derive(Debug, Clone, Default)]
pub struct AccountTotals {
    by_account: BTreeMap<AccountRef, AccountActivity>,
}

impl AccountTotals {
    fn record(&mut self, line: &TransactionEntry) {
        self.by_account
            .entry(line.account.clone())
            .or_insert_with(|| AccountActivity::new(line.account.clone()))
            .add(line);
    }

    pub fn iter(&self) -> impl Iterator<Item = &AccountActivity> {
        self.by_account.values()
    }

    pub fn get(&self, account: &AccountRef) -> Option<&AccountActivity> {
        self.by_account.get(account)
    }

    pub fn by_name(&self, account_name: &str) -> Option<&AccountActivity> {
        self.by_account.values().find(|a| a.account.account_name == account_name)
    }

    pub fn len(&self) -> usize {
        self.by_account.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_account.is_empty()
    }

    pub fn total_debits(&self) -> Decimal {
        self.iter().map(|a| a.total_debits).sum()
    }

    pub fn total_credits(&self) -> Decimal {
        self.iter().map(|a| a.total_credits).sum()
    }
}

fn accumulate<'a>(
    entries: impl IntoIterator<Item = &'a JournalEntry>,
    include: impl Fn(NaiveDate) -> bool,
) -> AccountTotals {
    let mut totals = AccountTotals::default();
    for entry in entries {
        if entry.is_reversed || !include(entry.date) {
            continue;
        }
        for line in &entry.lines {
            totals.record(line);
        }
    }
    totals
}

/// Activity with `range.from <= date <= range.to`
pub fn period_activity(entries: &[JournalEntry], range: DateRange) -> AccountTotals {
    accumulate(entries, |date| range.contains(date))
}

/// Balances from the beginning of the ledger through `as_of`
pub fn cumulative_balances(entries: &[JournalEntry], as_of: NaiveDate) -> AccountTotals {
    accumulate(entries, |date| date <= as_of)
}

/// Activity split into caller-supplied periods
#[derive(Debug, Clone, Default)]
pub struct BucketedActivity {
    pub periods: Vec<PeriodDefinition>,
    by_period: BTreeMap<String, AccountTotals>,
}

impl BucketedActivity {
    /// Totals for the period with `key`, empty when nothing landed there
    pub fn period(&self, key: &str) -> Option<&AccountTotals> {
        self.by_period.get(key)
    }

    /// Every account with activity in any period, in account-number order
    pub fn accounts(&self) -> Vec<AccountRef> {
        let mut accounts: Vec<AccountRef> = self.by_period
            .values()
            .flat_map(|totals| totals.iter().map(|a| a.account.clone()))
            .collect();
        accounts.sort();
        accounts.dedup();
        accounts
    }

    /// Signed amount of `account` in period `key`
    pub fn amount(&self, account: &AccountRef, key: &str) -> Decimal {
        self.period(key)
            .and_then(|totals| totals.get(account))
            .map_or(Decimal::ZERO, |a| a.amount())
    }
}

/// Assigns each entry to the first period containing its date. Entries
/// outside every period are dropped.
pub fn bucketed_activity(entries: &[JournalEntry], periods: &[PeriodDefinition]) -> BucketedActivity {
    let mut by_period: BTreeMap<String, AccountTotals> = BTreeMap::new();
    for entry in entries.iter().filter(|e| !e.is_reversed) {
        if let Some(period) = period_for(entry.date, periods) {
            let totals = by_period.entry(period.key.clone()).or_default();
            for line in &entry.lines {
                totals.record(line);
            }
        }
    }
    BucketedActivity {
        periods: periods.to_vec(),
        by_period,
    }
}
