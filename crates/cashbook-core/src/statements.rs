//! Statement builder
//!
//! Pure functions from aggregator output to report DTOs. Nothing here reads
//! storage; the caller fetches entries, aggregates them and passes the
//! totals in together with a [`ClassificationPolicy`].

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::aggregator::{AccountTotals, BucketedActivity};
use crate::models::{AccountRef, JournalEntry, PayableReceivable};
use crate::policy::{CashFlowRole, ClassificationPolicy, PnlSection};
use crate::registry::ChartOfAccounts;
use crate::reports::{
    section_total, BalanceSheet, CashFlowStatement, ColumnarLine, ColumnarProfitAndLoss,
    GeneralLedger, LedgerAccount, LedgerPosting, PeriodAmounts, ProfitAndLoss, StatementLine,
    TrialBalance, TrialBalanceLine,
};
use crate::time::DateRange;
use crate::types::{AccountType, PayableKind, PeriodMode};
use crate::within_tolerance;

struct PnlSections<T> {
    revenue: Vec<T>,
    cost_of_goods_sold: Vec<T>,
    operating_expenses: Vec<T>,
    other_income: Vec<T>,
    other_expenses: Vec<T>,
}

impl<T> PnlSections<T> {
    fn new() -> Self {
        Self {
            revenue: Vec::new(),
            cost_of_goods_sold: Vec::new(),
            operating_expenses: Vec::new(),
            other_income: Vec::new(),
            other_expenses: Vec::new(),
        }
    }

    fn push(&mut self, section: PnlSection, item: T) {
        match section {
            PnlSection::Revenue => self.revenue.push(item),
            PnlSection::OtherIncome => self.other_income.push(item),
            PnlSection::CostOfGoodsSold => self.cost_of_goods_sold.push(item),
            PnlSection::OperatingExpenses => self.operating_expenses.push(item),
            PnlSection::OtherExpenses => self.other_expenses.push(item),
        }
    }
}

/// Profit & Loss from period activity
pub fn profit_and_loss(range: DateRange, activity: &AccountTotals, policy: &ClassificationPolicy) -> ProfitAndLoss {
    let mut sections = PnlSections::new();
    for account in activity.iter() {
        if let Some(section) = policy.pnl_section(&account.account) {
            sections.push(section, StatementLine::new(&account.account, account.amount()));
        }
    }

    let total_revenue = section_total(&sections.revenue);
    let total_cost_of_goods_sold = section_total(&sections.cost_of_goods_sold);
    let total_operating_expenses = section_total(&sections.operating_expenses);
    let total_other_income = section_total(&sections.other_income);
    let total_other_expenses = section_total(&sections.other_expenses);
    let gross_profit = total_revenue - total_cost_of_goods_sold;
    let operating_income = gross_profit - total_operating_expenses;
    let net_income = operating_income + total_other_income - total_other_expenses;

    ProfitAndLoss {
        from_date: range.from,
        to_date: range.to,
        revenue: sections.revenue,
        cost_of_goods_sold: sections.cost_of_goods_sold,
        operating_expenses: sections.operating_expenses,
        other_income: sections.other_income,
        other_expenses: sections.other_expenses,
        total_revenue,
        total_cost_of_goods_sold,
        total_operating_expenses,
        total_other_income,
        total_other_expenses,
        gross_profit,
        operating_income,
        net_income,
    }
}

/// Revenue minus expenses over `totals`
pub fn net_income(totals: &AccountTotals) -> Decimal {
    totals
        .iter()
        .map(|a| match a.account.account_type {
            AccountType::Revenue => a.amount(),
            AccountType::Expense => -a.amount(),
            AccountType::Asset | AccountType::Liability | AccountType::Equity => Decimal::ZERO,
        })
        .sum()
}

/// Cash on hand according to `totals`
pub fn cash_balance(totals: &AccountTotals, policy: &ClassificationPolicy) -> Decimal {
    totals
        .iter()
        .filter(|a| policy.is_cash(&a.account))
        .map(|a| a.amount())
        .sum()
}

/// Reference for an amount that has no ledger account behind it yet
fn account_or_placeholder(chart: &ChartOfAccounts, name: &str, account_type: AccountType) -> AccountRef {
    chart
        .find(name)
        .map(|a| a.account_ref())
        .unwrap_or_else(|| AccountRef {
            account_number: String::new(),
            account_name: name.to_string(),
            id: 0,
            account_type,
        })
}

/// Adds `amount` to the line of `account_name`, creating the line only for a
/// non-zero amount
fn fold_into(
    section: &mut BTreeMap<AccountRef, Decimal>,
    chart: &ChartOfAccounts,
    account_name: &str,
    account_type: AccountType,
    amount: Decimal,
) {
    if let Some(existing) = section.iter_mut().find(|(a, _)| a.account_name == account_name) {
        *existing.1 += amount;
    } else if !amount.is_zero() {
        section.insert(account_or_placeholder(chart, account_name, account_type), amount);
    }
}

fn lines(section: &BTreeMap<AccountRef, Decimal>) -> Vec<StatementLine> {
    section.iter().map(|(a, amount)| StatementLine::new(a, *amount)).collect()
}

fn sum_where(section: &BTreeMap<AccountRef, Decimal>, keep: impl Fn(&AccountRef) -> bool) -> Decimal {
    section.iter().filter(|(a, _)| keep(a)).map(|(_, amount)| *amount).sum()
}

/// Balance Sheet from cumulative balances.
///
/// Open receivables and payables are added to the configured receivables and
/// payables lines. Cumulative net income is added to retained earnings. The
/// equation is checked, never forced.
pub fn balance_sheet(
    as_of: NaiveDate,
    balances: &AccountTotals,
    payables: &[PayableReceivable],
    chart: &ChartOfAccounts,
    policy: &ClassificationPolicy,
) -> BalanceSheet {
    let mut assets = BTreeMap::new();
    let mut liabilities = BTreeMap::new();
    let mut equity = BTreeMap::new();
    for account in balances.iter() {
        let target = match account.account.account_type {
            AccountType::Asset => &mut assets,
            AccountType::Liability => &mut liabilities,
            AccountType::Equity => &mut equity,
            AccountType::Revenue | AccountType::Expense => continue,
        };
        target.insert(account.account.clone(), account.amount());
    }

    let open_total = |kind: PayableKind| -> Decimal {
        payables
            .iter()
            .filter(|p| p.is_open() && p.kind == kind)
            .map(|p| p.amount)
            .sum()
    };
    fold_into(
        &mut assets,
        chart,
        &policy.receivables_account,
        AccountType::Asset,
        open_total(PayableKind::Receivable),
    );
    fold_into(
        &mut liabilities,
        chart,
        &policy.payables_account,
        AccountType::Liability,
        open_total(PayableKind::Payable),
    );

    let net_income = net_income(balances);
    fold_into(
        &mut equity,
        chart,
        &policy.retained_earnings_account,
        AccountType::Equity,
        net_income,
    );

    let total_assets = sum_where(&assets, |_| true);
    let total_liabilities = sum_where(&liabilities, |_| true);
    let total_equity = sum_where(&equity, |_| true);
    let total_liabilities_and_equity = total_liabilities + total_equity;
    let discrepancy = total_assets - total_liabilities_and_equity;

    BalanceSheet {
        as_of_date: as_of,
        total_current_assets: sum_where(&assets, |a| policy.is_current_asset(a)),
        total_fixed_assets: sum_where(&assets, |a| policy.is_fixed_asset(a)),
        total_current_liabilities: sum_where(&liabilities, |a| policy.is_current_liability(a)),
        total_long_term_liabilities: sum_where(&liabilities, |a| policy.is_noncurrent_liability(a)),
        assets: lines(&assets),
        liabilities: lines(&liabilities),
        equity: lines(&equity),
        total_assets,
        total_liabilities,
        total_equity,
        total_liabilities_and_equity,
        net_income,
        is_balanced: within_tolerance(discrepancy),
        discrepancy,
    }
}

/// Cash Flow statement, indirect method.
///
/// `opening` and `closing` are cumulative balances the day before the range
/// and at its end; only their cash accounts are read.
pub fn cash_flow(
    range: DateRange,
    activity: &AccountTotals,
    opening: &AccountTotals,
    closing: &AccountTotals,
    policy: &ClassificationPolicy,
) -> CashFlowStatement {
    let mut operating = Vec::new();
    let mut investing = Vec::new();
    let mut financing = Vec::new();

    for account in activity.iter() {
        let Some(role) = policy.cash_flow_role(&account.account) else {
            continue;
        };
        // asset amounts are debit-normal, so growth consumes cash
        let (target, effect) = match role {
            CashFlowRole::Cash => continue,
            CashFlowRole::CurrentAsset => (&mut operating, -account.amount()),
            CashFlowRole::CurrentLiability => (&mut operating, account.amount()),
            CashFlowRole::Investing => (&mut investing, -account.amount()),
            CashFlowRole::Financing => (&mut financing, account.amount()),
        };
        if !effect.is_zero() {
            target.push(StatementLine::new(&account.account, effect));
        }
    }

    let net_income = net_income(activity);
    let total_operating = net_income + section_total(&operating);
    let total_investing = section_total(&investing);
    let total_financing = section_total(&financing);

    CashFlowStatement {
        from_date: range.from,
        to_date: range.to,
        net_income,
        operating_activities: operating,
        investing_activities: investing,
        financing_activities: financing,
        total_operating,
        total_investing,
        total_financing,
        net_cash_flow: total_operating + total_investing + total_financing,
        beginning_cash: cash_balance(opening, policy),
        ending_cash: cash_balance(closing, policy),
    }
}

/// Trial Balance over every account with cumulative activity.
///
/// Active accounts with no postings are left out, so an empty ledger yields no lines.
pub fn trial_balance(as_of: NaiveDate, balances: &AccountTotals) -> TrialBalance {
    let lines: Vec<TrialBalanceLine> = balances
        .iter()
        .map(|a| TrialBalanceLine {
            account_number: a.account.account_number.clone(),
            account_name: a.account.account_name.clone(),
            account_type: a.account.account_type,
            debit: a.total_debits,
            credit: a.total_credits,
            balance: a.amount(),
        })
        .collect();
    let total_debits = balances.total_debits();
    let total_credits = balances.total_credits();
    let discrepancy = total_debits - total_credits;

    TrialBalance {
        as_of_date: as_of,
        lines,
        total_debits,
        total_credits,
        is_balanced: within_tolerance(discrepancy),
        discrepancy,
    }
}

/// General Ledger for every active account, plus any deactivated account
/// that still carries postings
pub fn general_ledger(as_of: NaiveDate, entries: &[JournalEntry], chart: &ChartOfAccounts) -> GeneralLedger {
    let mut ledger: BTreeMap<AccountRef, LedgerAccount> = chart
        .accounts()
        .iter()
        .map(|a| (a.account_ref(), empty_ledger_account(&a.account_ref())))
        .collect();

    let mut posted: Vec<&JournalEntry> = entries
        .iter()
        .filter(|e| !e.is_reversed && e.date <= as_of)
        .collect();
    posted.sort_by_key(|e| (e.date, e.id));

    for entry in posted {
        for line in &entry.lines {
            let account = ledger
                .entry(line.account.clone())
                .or_insert_with(|| empty_ledger_account(&line.account));
            account.total_debits += line.debit_amount;
            account.total_credits += line.credit_amount;
            account.balance = line.account.account_type.signed(account.total_debits, account.total_credits);
            account.postings.push(LedgerPosting {
                date: entry.date,
                journal_entry_id: entry.id,
                description: line.description.clone().unwrap_or_else(|| entry.description.clone()),
                debit: line.debit_amount,
                credit: line.credit_amount,
                running_balance: account.balance,
            });
        }
    }

    let accounts: Vec<LedgerAccount> = ledger.into_values().collect();
    GeneralLedger {
        as_of_date: as_of,
        total_debits: accounts.iter().map(|a| a.total_debits).sum(),
        total_credits: accounts.iter().map(|a| a.total_credits).sum(),
        accounts,
    }
}

fn empty_ledger_account(account: &AccountRef) -> LedgerAccount {
    LedgerAccount {
        account_number: account.account_number.clone(),
        account_name: account.account_name.clone(),
        account_type: account.account_type,
        total_debits: Decimal::ZERO,
        total_credits: Decimal::ZERO,
        balance: Decimal::ZERO,
        postings: Vec::new(),
    }
}

/// Profit & Loss with one column per period
pub fn columnar_profit_and_loss(
    year: i32,
    mode: PeriodMode,
    buckets: &BucketedActivity,
    policy: &ClassificationPolicy,
) -> ColumnarProfitAndLoss {
    let periods = &buckets.periods;
    let mut sections = PnlSections::new();
    for account in buckets.accounts() {
        if let Some(section) = policy.pnl_section(&account) {
            sections.push(
                section,
                ColumnarLine {
                    account_number: account.account_number.clone(),
                    account_name: account.account_name.clone(),
                    values: PeriodAmounts::from_fn(periods, |key| buckets.amount(&account, key)),
                },
            );
        }
    }

    let total = |lines: &[ColumnarLine]| {
        PeriodAmounts::from_fn(periods, |key| lines.iter().map(|l| l.values.get(key)).sum())
    };
    let total_revenue = total(sections.revenue.as_slice());
    let total_cost_of_goods_sold = total(sections.cost_of_goods_sold.as_slice());
    let total_operating_expenses = total(sections.operating_expenses.as_slice());
    let total_other_income = total(sections.other_income.as_slice());
    let total_other_expenses = total(sections.other_expenses.as_slice());

    let gross_profit = PeriodAmounts::from_fn(periods, |key| {
        total_revenue.get(key) - total_cost_of_goods_sold.get(key)
    });
    let operating_income = PeriodAmounts::from_fn(periods, |key| {
        gross_profit.get(key) - total_operating_expenses.get(key)
    });
    let net_income = PeriodAmounts::from_fn(periods, |key| {
        operating_income.get(key) + total_other_income.get(key) - total_other_expenses.get(key)
    });

    ColumnarProfitAndLoss {
        year,
        mode,
        periods: periods.clone(),
        revenue: sections.revenue,
        cost_of_goods_sold: sections.cost_of_goods_sold,
        operating_expenses: sections.operating_expenses,
        other_income: sections.other_income,
        other_expenses: sections.other_expenses,
        total_revenue,
        total_cost_of_goods_sold,
        total_operating_expenses,
        total_other_income,
        total_other_expenses,
        gross_profit,
        operating_income,
        net_income,
    }
}
