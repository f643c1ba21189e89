use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::date_utils::YearMonth;
use crate::models::{AllowanceRow, CalendarDay, ExpenditureRecord, MonthlyPlan};
use crate::services::aggregate::{records_in_month, spend_by_date, total_spend};
use crate::services::calendar::month_days;

/// Roll the monthly plan forward day by day.
///
/// Each day gets the same `base` share of the plan (integer division, the
/// remainder is dropped) plus whatever the previous day left over. Overspending
/// carries forward as a negative balance and shrinks the next day's allowance.
///
/// The scan is strictly sequential: every row depends on all rows before it.
pub fn build_allowance(
    days: &[CalendarDay],
    plan_amount: i64,
    spend_by_date: &BTreeMap<NaiveDate, i64>,
) -> Vec<AllowanceRow> {
    let base = plan_amount.div_euclid(days.len().max(1) as i64);
    let mut carry = 0;

    days.iter()
        .map(|day| {
            let spend = spend_by_date.get(&day.date).copied().unwrap_or(0);
            let allowed_today = base + carry;
            let end_carry = allowed_today - spend;
            carry = end_carry;

            AllowanceRow {
                date: day.date,
                weekday: day.weekday,
                base,
                allowed_today,
                spend,
                end_carry,
            }
        })
        .collect()
}

/// The allowance ledger for one month together with its summary figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthLedger {
    pub year_month: YearMonth,
    pub plan_amount: i64,
    pub daily_base: i64,
    pub total_spend: i64,
    pub remaining: i64,
    pub rows: Vec<AllowanceRow>,
}

impl MonthLedger {
    /// Build the ledger from a plan snapshot and the month's records.
    /// Records outside `ym` are ignored; a missing plan counts as zero.
    pub fn build(
        ym: YearMonth,
        plan: Option<&MonthlyPlan>,
        records: &[ExpenditureRecord],
    ) -> Self {
        let days = month_days(ym);
        let plan_amount = MonthlyPlan::amount_or_zero(plan);
        let spends = spend_by_date(&records_in_month(records, ym));
        let rows = build_allowance(&days, plan_amount, &spends);
        let total_spend = total_spend(&spends);

        tracing::debug!(
            year_month = %ym,
            plan_amount,
            total_spend,
            days = rows.len(),
            "Built allowance ledger"
        );

        Self {
            year_month: ym,
            plan_amount,
            daily_base: rows.first().map(|r| r.base).unwrap_or(0),
            total_spend,
            remaining: plan_amount - total_spend,
            rows,
        }
    }

    pub fn row(&self, date: NaiveDate) -> Option<&AllowanceRow> {
        self.rows.iter().find(|r| r.date == date)
    }
}
