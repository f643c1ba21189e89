use axum::extract::{Query, State};
use axum::response::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::date_utils::{parse_day, YearMonth};
use crate::error::{AppError, AppResult};
use crate::models::{AllowanceRow, ExpenditureRecord, MonthlyPlan};
use crate::services::aggregate::records_on;
use crate::services::allowance::MonthLedger;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MonthParams {
    pub ym: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DayParams {
    pub date: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowanceView {
    pub prev_month: YearMonth,
    pub next_month: YearMonth,
    #[serde(flatten)]
    pub ledger: MonthLedger,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayView {
    pub date: NaiveDate,
    pub row: Option<AllowanceRow>,
    pub carry_in: i64,
    pub overspent: bool,
    pub items: Vec<ExpenditureRecord>,
    pub total: i64,
}

pub async fn month(
    State(state): State<AppState>,
    Query(params): Query<MonthParams>,
) -> AppResult<Json<AllowanceView>> {
    let ym = match params.ym.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => s.parse::<YearMonth>()?,
        _ => YearMonth::current(),
    };

    let (plan, records) = load_month(&state, ym).await?;
    let ledger = MonthLedger::build(ym, plan.as_ref(), &records);

    Ok(Json(AllowanceView {
        prev_month: ym.prev(),
        next_month: ym.next(),
        ledger,
    }))
}

pub async fn day(
    State(state): State<AppState>,
    Query(params): Query<DayParams>,
) -> AppResult<Json<DayView>> {
    let date = parse_day(&params.date)
        .ok_or_else(|| AppError::Validation(format!("Invalid date '{}'", params.date)))?;
    let ym = YearMonth::of(date);

    let (plan, records) = load_month(&state, ym).await?;
    let ledger = MonthLedger::build(ym, plan.as_ref(), &records);
    let items = records_on(&records, date);

    let row = ledger.row(date).copied();

    Ok(Json(DayView {
        date,
        carry_in: row.map_or(0, |r| r.carry_in()),
        overspent: row.is_some_and(|r| r.is_overspent()),
        row,
        total: items.iter().map(|r| r.amount).sum(),
        items,
    }))
}

/// Plan and records for `ym`, with pending submissions merged in.
async fn load_month(
    state: &AppState,
    ym: YearMonth,
) -> AppResult<(Option<MonthlyPlan>, Vec<ExpenditureRecord>)> {
    let (plan, server) = tokio::try_join!(state.api.get_plan(ym), state.api.load_month(ym))?;
    let records = state.merged_records(ym, &server);
    Ok((plan, records))
}
