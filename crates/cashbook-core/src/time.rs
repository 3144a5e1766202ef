//! Report date ranges and reporting-period generation

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::PeriodMode;

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Inclusive date range `from..=to`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> CoreResult<Self> {
        if from > to {
            return Err(CoreError::validation(format!(
                "fromDate {} is after toDate {}", from, to
            )));
        }
        Ok(Self { from, to })
    }

    /// Calendar year `Jan 1..=Dec 31`
    pub fn year(year: i32) -> CoreResult<Self> {
        let from = ymd(year, 1, 1)?;
        let to = ymd(year, 12, 31)?;
        Ok(Self { from, to })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from && date <= self.to
    }

    /// Day before the range starts, the as-of date for opening balances
    pub fn opening_date(&self) -> Option<NaiveDate> {
        self.from.pred_opt()
    }

    pub fn description(&self) -> String {
        format!("{} to {}", self.from, self.to)
    }
}

/// One column of a period-bucketed report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodDefinition {
    /// Stable key, `2024-01` or `2024-Q1`
    pub key: String,
    /// Display label, `Jan 2024` or `Q1 2024`
    pub label: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl PeriodDefinition {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from && date <= self.to
    }
}

fn ymd(year: i32, month: u32, day: u32) -> CoreResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| CoreError::validation(format!("invalid date {}-{:02}-{:02}", year, month, day)))
}

fn last_day_of_month(year: i32, month: u32) -> CoreResult<NaiveDate> {
    let next = if month == 12 { ymd(year + 1, 1, 1)? } else { ymd(year, month + 1, 1)? };
    next.pred_opt()
        .ok_or_else(|| CoreError::validation(format!("invalid month {}-{:02}", year, month)))
}

/// Non-overlapping, date-ordered periods covering one calendar year
pub fn periods_for_year(year: i32, mode: PeriodMode) -> CoreResult<Vec<PeriodDefinition>> {
    match mode {
        PeriodMode::Monthly => (1..=12u32)
            .map(|month| {
                Ok(PeriodDefinition {
                    key: format!("{}-{:02}", year, month),
                    label: format!("{} {}", MONTH_LABELS[(month - 1) as usize], year),
                    from: ymd(year, month, 1)?,
                    to: last_day_of_month(year, month)?,
                })
            })
            .collect(),
        PeriodMode::Quarterly => (1..=4u32)
            .map(|quarter| {
                let first_month = (quarter - 1) * 3 + 1;
                Ok(PeriodDefinition {
                    key: format!("{}-Q{}", year, quarter),
                    label: format!("Q{} {}", quarter, year),
                    from: ymd(year, first_month, 1)?,
                    to: last_day_of_month(year, first_month + 2)?,
                })
            })
            .collect(),
    }
}

/// First period containing `date`
pub fn period_for(date: NaiveDate, periods: &[PeriodDefinition]) -> Option<&PeriodDefinition> {
    periods.iter().find(|p| p.contains(date))
}
