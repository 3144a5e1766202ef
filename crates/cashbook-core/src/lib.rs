//! Core ledger processing and business logic
//!
//! [`Books`] is the entry point: it posts simplified transactions as balanced
//! journal entries and derives financial statements from whatever the
//! [`LedgerStore`](cashbook_store::LedgerStore) holds. It keeps no mutable
//! state of its own and is shared as `Arc<Books>`.

pub mod aggregator;
pub mod classifier;
pub mod error;
pub mod models;
pub mod policy;
pub mod poster;
pub mod registry;
pub mod reports;
pub mod statements;
pub mod time;
pub mod types;

use cashbook_config::Config;
use cashbook_store::{
    CompanyId, DateFilter, JournalEntryId, NewPayable, PayableId, StoreError, StoreRef,
};
use chrono::NaiveDate;
use log::{debug, info};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use classifier::{auto_categorize, validate_and_map_category};
pub use error::{
    CoreError, CoreResult, DefaultErrorLogger, ErrorCode, ErrorContext, ErrorDetails, ErrorLogger,
    ErrorSeverity,
};
pub use models::{Account, AccountRef, JournalEntry, PayableReceivable, TransactionEntry};
pub use policy::ClassificationPolicy;
pub use poster::{PostRequest, Poster};
pub use registry::{default_chart_of_accounts, AccountRegistry, ChartOfAccounts};
pub use reports::ReportDto;
pub use time::{DateRange, PeriodDefinition};
pub use types::{
    AccountType, JournalSource, PayableKind, PayableStatus, PeriodMode, ReportType, TransactionType,
};

use aggregator::{bucketed_activity, cumulative_balances, period_activity, AccountTotals};
use reports::{
    BalanceSheet, CashFlowStatement, ColumnarProfitAndLoss, GeneralLedger, ProfitAndLoss, TrialBalance,
};
use time::periods_for_year;

/// Largest difference still treated as balanced
pub fn tolerance() -> Decimal {
    Decimal::new(1, 2)
}

/// `|difference| < 0.01`
pub fn within_tolerance(difference: Decimal) -> bool {
    difference.abs() < tolerance()
}

/// Largest amount one posting or open item may carry.
///
/// Keeps per-account sums far below `Decimal::MAX`.
pub fn max_amount() -> Decimal {
    Decimal::from(1_000_000_000_000_000i64)
}

/// Positive, at most [`max_amount`], and no finer than the currency allows
pub fn validate_amount(amount: Decimal, decimal_places: u32) -> CoreResult<()> {
    if amount <= Decimal::ZERO {
        return Err(CoreError::validation(format!(
            "amount must be greater than zero, got {}", amount
        )));
    }
    if amount > max_amount() {
        return Err(CoreError::validation(format!(
            "amount {} exceeds the maximum of {}", amount, max_amount()
        )));
    }
    if amount.normalize().scale() > decimal_places {
        return Err(CoreError::validation(format!(
            "amount {} has more than {} decimal places", amount, decimal_places
        )));
    }
    Ok(())
}

/// Error logger shared across request handlers
pub type ErrorLoggerRef = Arc<dyn ErrorLogger + Send + Sync>;

/// Report window as it arrives from a caller.
///
/// Range reports need `from` and `to`, or a `year`. As-of reports need `to`
/// or a `year`. The columnar P&L needs a `year` (or takes the year of `to`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportParams {
    #[serde(default, alias = "fromDate")]
    pub from: Option<NaiveDate>,
    #[serde(default, alias = "toDate")]
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub mode: Option<PeriodMode>,
}

impl ReportParams {
    pub fn range(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from: Some(from), to: Some(to), ..Self::default() }
    }

    pub fn as_of(to: NaiveDate) -> Self {
        Self { to: Some(to), ..Self::default() }
    }

    pub fn year(year: i32, mode: PeriodMode) -> Self {
        Self { year: Some(year), mode: Some(mode), ..Self::default() }
    }

    pub fn date_range(&self) -> CoreResult<DateRange> {
        match (self.from, self.to, self.year) {
            (Some(from), Some(to), _) => DateRange::new(from, to),
            (None, None, Some(year)) => DateRange::year(year),
            _ => Err(CoreError::validation("fromDate and toDate (or year) are required")),
        }
    }

    pub fn as_of_date(&self) -> CoreResult<NaiveDate> {
        match (self.to, self.year) {
            (Some(to), _) => Ok(to),
            (None, Some(year)) => Ok(DateRange::year(year)?.to),
            (None, None) => Err(CoreError::validation("toDate (or year) is required")),
        }
    }

    pub fn report_year(&self) -> CoreResult<i32> {
        use chrono::Datelike;
        self.year
            .or_else(|| self.to.map(|to| to.year()))
            .ok_or_else(|| CoreError::validation("year is required"))
    }
}

/// New payable or receivable as supplied by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayableRequest {
    #[serde(rename = "type")]
    pub kind: PayableKind,
    #[serde(default)]
    pub description: String,
    pub amount: Decimal,
    pub due_date: NaiveDate,
}

/// The ledger engine
pub struct Books {
    store: StoreRef,
    registry: AccountRegistry,
    poster: Poster,
    policy: ClassificationPolicy,
    decimal_places: u32,
    seed_default_accounts: bool,
    error_logger: ErrorLoggerRef,
}

impl Books {
    pub fn new(config: &Config, store: StoreRef) -> Self {
        let policy = ClassificationPolicy::from(&config.classification);
        Self {
            registry: AccountRegistry::new(store.clone()),
            poster: Poster::new(policy.corresponding_account.clone(), config.currency.decimal_places),
            store,
            policy,
            decimal_places: config.currency.decimal_places,
            seed_default_accounts: config.data.seed_default_accounts,
            error_logger: Arc::new(DefaultErrorLogger),
        }
    }

    pub fn with_error_logger(mut self, error_logger: ErrorLoggerRef) -> Self {
        self.error_logger = error_logger;
        self
    }

    fn log_failure(&self, error: CoreError, context: ErrorContext) -> CoreError {
        self.error_logger.log_error(&error, &context);
        error
    }

    // ==================== Chart of accounts ====================

    pub async fn accounts(&self, company_id: CompanyId) -> CoreResult<Vec<Account>> {
        self.registry.list_active_accounts(company_id).await
    }

    pub async fn onboard_company(&self, company_id: CompanyId) -> CoreResult<Vec<Account>> {
        self.registry.onboard_company(company_id).await
    }

    pub async fn add_account(
        &self,
        company_id: CompanyId,
        account_number: &str,
        account_name: &str,
        account_type: AccountType,
    ) -> CoreResult<Account> {
        self.registry
            .add_account(company_id, account_number, account_name, account_type)
            .await
    }

    pub async fn deactivate_account(&self, company_id: CompanyId, account_name: &str) -> CoreResult<Account> {
        self.registry.deactivate_account(company_id, account_name).await
    }

    /// Chart used for posting, seeded first when the company has none
    async fn posting_chart(&self, company_id: CompanyId) -> CoreResult<ChartOfAccounts> {
        let chart = self.registry.chart(company_id).await?;
        if chart.is_empty() && self.seed_default_accounts {
            info!("Company {} has no accounts, seeding the default chart", company_id);
            self.registry.onboard_company(company_id).await?;
            return self.registry.chart(company_id).await;
        }
        Ok(chart)
    }

    // ==================== Posting ====================

    /// Post a simplified transaction as one balanced journal entry
    pub async fn post(&self, company_id: CompanyId, request: PostRequest) -> CoreResult<JournalEntry> {
        let context = || {
            ErrorContext::new("post")
                .with_company(company_id)
                .with_data("amount", serde_json::json!(request.amount.to_string()))
                .with_data("category", serde_json::json!(request.category))
        };

        let chart = self.posting_chart(company_id).await?;
        let draft = self.poster
            .draft(&chart, &request)
            .map_err(|e| self.log_failure(e, context()))?;
        let record = self.store
            .insert_journal_entry(draft)
            .await
            .map_err(|e| self.log_failure(e.into(), context()))?;
        let entry = JournalEntry::try_from(record)?;

        info!(
            "Posted journal entry {} for company {}: {} {} on {}",
            entry.id, company_id, request.transaction_type, request.amount, entry.date
        );
        Ok(entry)
    }

    /// Mark a posted entry reversed. It stays stored but leaves every report.
    pub async fn reverse(&self, company_id: CompanyId, id: JournalEntryId) -> CoreResult<JournalEntry> {
        let existing = self.store
            .fetch_journal_entry(company_id, id)
            .await?
            .ok_or(CoreError::JournalEntryNotFound { company_id, id })?;
        if existing.is_reversed {
            return Err(CoreError::validation(format!("journal entry {} is already reversed", id)));
        }

        let record = self.store
            .mark_reversed(company_id, id)
            .await
            .map_err(|e| match e {
                StoreError::NotFound { .. } => CoreError::JournalEntryNotFound { company_id, id },
                StoreError::Conflict { message } => CoreError::validation(message),
                other => other.into(),
            })?;
        info!("Reversed journal entry {} for company {}", id, company_id);
        JournalEntry::try_from(record)
    }

    async fn journal(&self, company_id: CompanyId, filter: DateFilter) -> CoreResult<Vec<JournalEntry>> {
        let records = self.store.fetch_journal_entries(company_id, filter).await?;
        debug!("Loaded {} journal entries for company {} ({:?})", records.len(), company_id, filter);
        records.into_iter().map(JournalEntry::try_from).collect()
    }

    /// Posted entries inside `range`, reversed ones excluded
    pub async fn journal_entries(&self, company_id: CompanyId, range: DateRange) -> CoreResult<Vec<JournalEntry>> {
        self.journal(company_id, DateFilter::Range { from: range.from, to: range.to }).await
    }

    // ==================== Payables and receivables ====================

    pub async fn list_payables(&self, company_id: CompanyId) -> CoreResult<Vec<PayableReceivable>> {
        self.store
            .fetch_payables(company_id)
            .await?
            .into_iter()
            .map(PayableReceivable::try_from)
            .collect()
    }

    pub async fn add_payable(&self, company_id: CompanyId, request: PayableRequest) -> CoreResult<PayableReceivable> {
        validate_amount(request.amount, self.decimal_places)?;

        let record = self.store
            .insert_payable(NewPayable {
                company_id,
                kind: request.kind.to_string(),
                description: request.description.trim().to_string(),
                amount: request.amount,
                due_date: request.due_date,
            })
            .await?;
        info!("Recorded {} {} of {} for company {}", request.kind, record.id, request.amount, company_id);
        PayableReceivable::try_from(record)
    }

    /// Settle an open item; paid is terminal
    pub async fn mark_paid(&self, company_id: CompanyId, id: PayableId) -> CoreResult<PayableReceivable> {
        let record = self.store
            .mark_paid(company_id, id)
            .await
            .map_err(|e| match e {
                StoreError::NotFound { .. } => CoreError::PayableNotFound { company_id, id },
                StoreError::Conflict { message } => CoreError::validation(message),
                other => other.into(),
            })?;
        PayableReceivable::try_from(record)
    }

    // ==================== Reports ====================

    fn warn_if_unbalanced(&self, company_id: CompanyId, report: ReportType, is_balanced: bool, discrepancy: Decimal) {
        if !is_balanced {
            let context = ErrorContext::new("get_report")
                .with_company(company_id)
                .with_data("report", serde_json::json!(report.to_string()))
                .with_data("discrepancy", serde_json::json!(discrepancy.to_string()));
            self.error_logger.log_warning(
                &format!("{} is out of balance by {}", report, discrepancy),
                &context,
            );
        }
    }

    pub async fn profit_and_loss(&self, company_id: CompanyId, range: DateRange) -> CoreResult<ProfitAndLoss> {
        let entries = self.journal_entries(company_id, range).await?;
        Ok(statements::profit_and_loss(range, &period_activity(&entries, range), &self.policy))
    }

    pub async fn balance_sheet(&self, company_id: CompanyId, as_of: NaiveDate) -> CoreResult<BalanceSheet> {
        let entries = self.journal(company_id, DateFilter::AsOf(as_of)).await?;
        let chart = self.registry.chart(company_id).await?;
        let payables = self.list_payables(company_id).await?;
        let sheet = statements::balance_sheet(
            as_of,
            &cumulative_balances(&entries, as_of),
            &payables,
            &chart,
            &self.policy,
        );
        self.warn_if_unbalanced(company_id, ReportType::BalanceSheet, sheet.is_balanced, sheet.discrepancy);
        Ok(sheet)
    }

    pub async fn cash_flow(&self, company_id: CompanyId, range: DateRange) -> CoreResult<CashFlowStatement> {
        let entries = self.journal(company_id, DateFilter::AsOf(range.to)).await?;
        let opening = range
            .opening_date()
            .map(|date| cumulative_balances(&entries, date))
            .unwrap_or_default();
        Ok(statements::cash_flow(
            range,
            &period_activity(&entries, range),
            &opening,
            &cumulative_balances(&entries, range.to),
            &self.policy,
        ))
    }

    pub async fn trial_balance(&self, company_id: CompanyId, as_of: NaiveDate) -> CoreResult<TrialBalance> {
        let entries = self.journal(company_id, DateFilter::AsOf(as_of)).await?;
        let balances: AccountTotals = cumulative_balances(&entries, as_of);
        let report = statements::trial_balance(as_of, &balances);
        self.warn_if_unbalanced(company_id, ReportType::TrialBalance, report.is_balanced, report.discrepancy);
        Ok(report)
    }

    pub async fn general_ledger(&self, company_id: CompanyId, as_of: NaiveDate) -> CoreResult<GeneralLedger> {
        let entries = self.journal(company_id, DateFilter::AsOf(as_of)).await?;
        let chart = self.registry.chart(company_id).await?;
        Ok(statements::general_ledger(as_of, &entries, &chart))
    }

    pub async fn columnar_profit_and_loss(
        &self,
        company_id: CompanyId,
        year: i32,
        mode: PeriodMode,
    ) -> CoreResult<ColumnarProfitAndLoss> {
        let periods = periods_for_year(year, mode)?;
        let range = DateRange::year(year)?;
        let entries = self.journal_entries(company_id, range).await?;
        Ok(statements::columnar_profit_and_loss(
            year,
            mode,
            &bucketed_activity(&entries, &periods),
            &self.policy,
        ))
    }

    /// Build any report from caller-supplied parameters
    pub async fn get_report(
        &self,
        company_id: CompanyId,
        report_type: ReportType,
        params: &ReportParams,
    ) -> CoreResult<ReportDto> {
        debug!("Building {} for company {} ({:?})", report_type, company_id, params);
        let report = match report_type {
            ReportType::ProfitLoss => {
                ReportDto::ProfitAndLoss(self.profit_and_loss(company_id, params.date_range()?).await?)
            }
            ReportType::BalanceSheet => {
                ReportDto::BalanceSheet(self.balance_sheet(company_id, params.as_of_date()?).await?)
            }
            ReportType::CashFlow => ReportDto::CashFlow(self.cash_flow(company_id, params.date_range()?).await?),
            ReportType::TrialBalance => {
                ReportDto::TrialBalance(self.trial_balance(company_id, params.as_of_date()?).await?)
            }
            ReportType::GeneralLedger => {
                ReportDto::GeneralLedger(self.general_ledger(company_id, params.as_of_date()?).await?)
            }
            ReportType::ColumnarProfitLoss => ReportDto::ColumnarProfitAndLoss(
                self.columnar_profit_and_loss(company_id, params.report_year()?, params.mode.unwrap_or_default())
                    .await?,
            ),
        };
        Ok(report)
    }

    /// Fail with `AggregationInconsistency` when a balance-checked report
    /// does not balance
    pub fn require_balanced(&self, company_id: CompanyId, report: &ReportDto) -> CoreResult<()> {
        let (report_type, discrepancy) = match report {
            ReportDto::BalanceSheet(r) if !r.is_balanced => (ReportType::BalanceSheet, r.discrepancy),
            ReportDto::TrialBalance(r) if !r.is_balanced => (ReportType::TrialBalance, r.discrepancy),
            _ => return Ok(()),
        };
        Err(CoreError::AggregationInconsistency {
            company_id,
            report: report_type,
            discrepancy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cashbook_store::MemoryStore;
    use rust_decimal_macros::dec;
    use std::sync::Mutex;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn books() -> Books {
        Books::new(&Config::default(), Arc::new(MemoryStore::new()))
    }

    fn request(transaction_type: TransactionType, category: &str, amount: Decimal, date: NaiveDate) -> PostRequest {
        PostRequest {
            transaction_type,
            category: category.to_string(),
            amount,
            description: String::new(),
            date,
            source: JournalSource::Manual,
            corresponding_account: None,
        }
    }

    #[derive(Default)]
    struct RecordingLogger {
        errors: Mutex<Vec<ErrorCode>>,
        warnings: Mutex<Vec<String>>,
    }

    impl ErrorLogger for RecordingLogger {
        fn log_error(&self, error: &CoreError, _context: &ErrorContext) {
            self.errors.lock().unwrap().push(error.code());
        }

        fn log_warning(&self, message: &str, _context: &ErrorContext) {
            self.warnings.lock().unwrap().push(message.to_string());
        }
    }

    #[test]
    fn test_tolerance() {
        assert!(within_tolerance(dec!(0.009)));
        assert!(within_tolerance(dec!(-0.009)));
        assert!(!within_tolerance(dec!(0.01)));
    }

    #[tokio::test]
    async fn test_posted_entries_balance() {
        let books = books();
        let day = d(2024, 3, 1);
        let requests = [
            request(TransactionType::Income, "Sales Revenue", dec!(2500), day),
            request(TransactionType::Expense, "Rent", dec!(1200), day),
            request(TransactionType::Asset, "Equipment", dec!(800.50), day),
            request(TransactionType::Asset, "Accounts Receivable", dec!(75), day),
            request(TransactionType::Liability, "Loans Payable", dec!(300), day),
            request(TransactionType::Equity, "Owner's Draws", dec!(40), day),
            request(TransactionType::Equity, "Owner's Capital", dec!(1000), day),
        ];
        for req in requests {
            let entry = books.post(1, req).await.unwrap();
            assert_eq!(entry.lines.len(), 2);
            assert!(entry.is_balanced());
            assert_eq!(entry.total_debits(), entry.total_credits());
        }

        let tb = books.trial_balance(1, day).await.unwrap();
        assert!(tb.is_balanced);
        assert_eq!(tb.total_debits, tb.total_credits);
    }

    #[tokio::test]
    async fn test_oversized_amounts_never_reach_reports() {
        let books = books();
        let day = d(2024, 3, 1);
        for _ in 0..2 {
            let err = books
                .post(1, request(TransactionType::Income, "Sales Revenue", dec!(50000000000000000000000000000), day))
                .await
                .unwrap_err();
            assert_eq!(err.code(), ErrorCode::ValidationError);
        }
        for _ in 0..3 {
            books.post(1, request(TransactionType::Income, "Sales Revenue", max_amount(), day)).await.unwrap();
        }

        let tb = books.trial_balance(1, day).await.unwrap();
        assert!(tb.is_balanced);
        assert_eq!(tb.total_debits, max_amount() * dec!(3));

        let payable = PayableRequest {
            kind: PayableKind::Payable,
            description: "Huge bill".to_string(),
            amount: max_amount() + dec!(1),
            due_date: day,
        };
        let err = books.add_payable(1, payable).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_first_post_seeds_chart() {
        let books = books();
        assert!(books.accounts(1).await.unwrap().is_empty());
        books.post(1, request(TransactionType::Expense, "Rent", dec!(10), d(2024, 1, 1))).await.unwrap();
        assert_eq!(books.accounts(1).await.unwrap().len(), default_chart_of_accounts().len());
    }

    #[tokio::test]
    async fn test_no_seeding_when_disabled() {
        let mut config = Config::default();
        config.data.seed_default_accounts = false;
        let books = Books::new(&config, Arc::new(MemoryStore::new()));
        let err = books
            .post(1, request(TransactionType::Expense, "Rent", dec!(10), d(2024, 1, 1)))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::UnmappableCategory { .. }));
    }

    #[tokio::test]
    async fn test_rejected_post_writes_nothing() {
        let logger = Arc::new(RecordingLogger::default());
        let books = books().with_error_logger(logger.clone());
        books.onboard_company(1).await.unwrap();

        let err = books
            .post(1, request(TransactionType::Income, "Sales Revenue", dec!(-1), d(2024, 1, 1)))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);
        assert_eq!(*logger.errors.lock().unwrap(), vec![ErrorCode::ValidationError]);

        let entries = books.journal_entries(1, DateRange::year(2024).unwrap()).await.unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_sales_and_rent_same_day() {
        let books = books();
        let day = d(2024, 6, 15);
        books.post(1, request(TransactionType::Income, "Sales Revenue", dec!(2500), day)).await.unwrap();
        books.post(1, request(TransactionType::Expense, "Rent", dec!(1200), day)).await.unwrap();

        let pnl = books.profit_and_loss(1, DateRange::year(2024).unwrap()).await.unwrap();
        assert_eq!(pnl.total_revenue, dec!(2500));
        assert_eq!(pnl.total_operating_expenses, dec!(1200));
        assert_eq!(pnl.gross_profit, dec!(2500));
        assert_eq!(pnl.operating_income, dec!(1300));
        assert_eq!(pnl.net_income, dec!(1300));

        let tb = books.trial_balance(1, day).await.unwrap();
        let line = |name: &str| tb.lines.iter().find(|l| l.account_name == name).unwrap().clone();
        let cash = line("Cash");
        assert_eq!((cash.debit, cash.credit, cash.balance), (dec!(2500), dec!(1200), dec!(1300)));
        assert_eq!(line("Sales Revenue").credit, dec!(2500));
        assert_eq!(line("Rent").debit, dec!(1200));
        assert_eq!(tb.total_debits, dec!(3700));
        assert_eq!(tb.total_credits, dec!(3700));
        assert!(tb.is_balanced);
    }

    #[tokio::test]
    async fn test_owner_investment_on_balance_sheet() {
        let books = books();
        books.post(1, request(TransactionType::Asset, "Cash", dec!(10000), d(2024, 1, 5))).await.unwrap();

        let sheet = books.balance_sheet(1, d(2024, 12, 31)).await.unwrap();
        assert_eq!(sheet.assets.len(), 1);
        assert_eq!(sheet.assets[0].account_name, "Cash");
        assert_eq!(sheet.assets[0].amount, dec!(10000));
        assert_eq!(sheet.equity[0].account_name, "Owner's Capital");
        assert_eq!(sheet.equity[0].amount, dec!(10000));
        assert_eq!(sheet.total_assets, sheet.total_liabilities + sheet.total_equity);
        assert!(sheet.is_balanced);
    }

    #[tokio::test]
    async fn test_entries_before_range_only_move_balance_sheet() {
        let books = books();
        let range = DateRange::new(d(2024, 2, 1), d(2024, 2, 29)).unwrap();
        books.post(1, request(TransactionType::Income, "Sales Revenue", dec!(100), d(2024, 2, 10))).await.unwrap();
        let pnl_before = books.profit_and_loss(1, range).await.unwrap();
        let sheet_before = books.balance_sheet(1, range.to).await.unwrap();

        books.post(1, request(TransactionType::Income, "Sales Revenue", dec!(40), d(2024, 1, 20))).await.unwrap();
        let pnl_after = books.profit_and_loss(1, range).await.unwrap();
        let sheet_after = books.balance_sheet(1, range.to).await.unwrap();

        assert_eq!(pnl_before, pnl_after);
        assert_eq!(sheet_after.total_assets - sheet_before.total_assets, dec!(40));
        assert!(sheet_after.is_balanced);
    }

    #[tokio::test]
    async fn test_empty_company_reports() {
        let books = books();
        for report_type in [
            ReportType::ProfitLoss,
            ReportType::BalanceSheet,
            ReportType::CashFlow,
            ReportType::TrialBalance,
        ] {
            let report = books
                .get_report(7, report_type, &ReportParams::range(d(2024, 1, 1), d(2024, 12, 31)))
                .await
                .unwrap();
            assert_ne!(report.is_balanced(), Some(false));
            match report {
                ReportDto::ProfitAndLoss(r) => {
                    assert!(r.revenue.is_empty());
                    assert_eq!(r.net_income, Decimal::ZERO);
                }
                ReportDto::BalanceSheet(r) => {
                    assert!(r.assets.is_empty() && r.liabilities.is_empty() && r.equity.is_empty());
                    assert_eq!(r.total_assets, Decimal::ZERO);
                }
                ReportDto::CashFlow(r) => assert_eq!(r.net_cash_flow, Decimal::ZERO),
                ReportDto::TrialBalance(r) => assert!(r.lines.is_empty()),
                other => panic!("unexpected report {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_reversal_lifecycle() {
        let books = books();
        let day = d(2024, 4, 1);
        let entry = books.post(1, request(TransactionType::Expense, "Rent", dec!(900), day)).await.unwrap();

        let reversed = books.reverse(1, entry.id).await.unwrap();
        assert!(reversed.is_reversed);
        let pnl = books.profit_and_loss(1, DateRange::year(2024).unwrap()).await.unwrap();
        assert!(pnl.operating_expenses.is_empty());

        let again = books.reverse(1, entry.id).await.unwrap_err();
        assert_eq!(again.code(), ErrorCode::ValidationError);
        let missing = books.reverse(1, 999).await.unwrap_err();
        assert!(matches!(missing, CoreError::JournalEntryNotFound { id: 999, .. }));
        // another company cannot reverse it either
        assert!(books.reverse(2, entry.id).await.is_err());
    }

    #[tokio::test]
    async fn test_open_receivable_reported_as_discrepancy() {
        let logger = Arc::new(RecordingLogger::default());
        let books = books().with_error_logger(logger.clone());
        books.post(1, request(TransactionType::Asset, "Cash", dec!(500), d(2024, 1, 5))).await.unwrap();
        let item = books
            .add_payable(1, PayableRequest {
                kind: PayableKind::Receivable,
                description: "Invoice 7".into(),
                amount: dec!(120),
                due_date: d(2024, 2, 1),
            })
            .await
            .unwrap();

        let report = books
            .get_report(1, ReportType::BalanceSheet, &ReportParams::as_of(d(2024, 12, 31)))
            .await
            .unwrap();
        assert_eq!(report.is_balanced(), Some(false));
        assert_eq!(logger.warnings.lock().unwrap().len(), 1);
        let err = books.require_balanced(1, &report).unwrap_err();
        assert!(matches!(err, CoreError::AggregationInconsistency { report: ReportType::BalanceSheet, .. }));

        books.mark_paid(1, item.id).await.unwrap();
        let report = books
            .get_report(1, ReportType::BalanceSheet, &ReportParams::as_of(d(2024, 12, 31)))
            .await
            .unwrap();
        assert!(books.require_balanced(1, &report).is_ok());
    }

    #[tokio::test]
    async fn test_payable_lifecycle_errors() {
        let books = books();
        let bill = PayableRequest {
            kind: PayableKind::Payable,
            description: "Supplier".into(),
            amount: dec!(0),
            due_date: d(2024, 2, 1),
        };
        assert!(matches!(books.add_payable(1, bill.clone()).await, Err(CoreError::ValidationError { .. })));

        let item = books.add_payable(1, PayableRequest { amount: dec!(30), ..bill }).await.unwrap();
        assert!(item.is_open());
        assert_eq!(books.mark_paid(1, item.id).await.unwrap().status, PayableStatus::Paid);
        assert_eq!(books.mark_paid(1, item.id).await.unwrap_err().code(), ErrorCode::ValidationError);
        assert!(matches!(books.mark_paid(1, 42).await, Err(CoreError::PayableNotFound { id: 42, .. })));
        assert_eq!(books.list_payables(1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_columnar_report_by_month() {
        let books = books();
        books.post(1, request(TransactionType::Income, "Sales Revenue", dec!(100), d(2024, 1, 3))).await.unwrap();
        books.post(1, request(TransactionType::Income, "Sales Revenue", dec!(250), d(2024, 3, 9))).await.unwrap();
        books.post(1, request(TransactionType::Income, "Sales Revenue", dec!(999), d(2023, 12, 31))).await.unwrap();

        let report = books
            .get_report(1, ReportType::ColumnarProfitLoss, &ReportParams::year(2024, PeriodMode::Monthly))
            .await
            .unwrap();
        let ReportDto::ColumnarProfitAndLoss(columnar) = report else {
            panic!("expected a columnar report");
        };
        assert_eq!(columnar.periods.len(), 12);
        assert_eq!(columnar.total_revenue.get("2024-01"), dec!(100));
        assert_eq!(columnar.total_revenue.get("2024-02"), Decimal::ZERO);
        assert_eq!(columnar.net_income.total, dec!(350));
    }

    #[test]
    fn test_report_params_resolution() {
        assert_eq!(ReportParams::year(2024, PeriodMode::Monthly).date_range().unwrap(), DateRange::year(2024).unwrap());
        assert_eq!(ReportParams::as_of(d(2024, 5, 1)).as_of_date().unwrap(), d(2024, 5, 1));
        assert_eq!(ReportParams::as_of(d(2024, 5, 1)).report_year().unwrap(), 2024);
        assert!(ReportParams::as_of(d(2024, 5, 1)).date_range().is_err());
        assert!(ReportParams::default().as_of_date().is_err());
        assert!(ReportParams::range(d(2024, 5, 1), d(2024, 4, 1)).date_range().is_err());
    }
}
