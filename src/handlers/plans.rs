use axum::extract::{Query, State};
use axum::response::Json;
use serde::Deserialize;

use crate::date_utils::YearMonth;
use crate::error::{AppError, AppResult};
use crate::models::{MonthlyPlan, PlanInput};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PlanParams {
    pub ym: String,
}

pub async fn show(
    State(state): State<AppState>,
    Query(params): Query<PlanParams>,
) -> AppResult<Json<MonthlyPlan>> {
    let ym: YearMonth = params.ym.parse()?;
    let plan = state.api.get_plan(ym).await?;

    // An unset month reads as a zero plan
    Ok(Json(plan.unwrap_or(MonthlyPlan { ym, amount: 0 })))
}

pub async fn save(
    State(state): State<AppState>,
    Json(input): Json<PlanInput>,
) -> AppResult<Json<MonthlyPlan>> {
    if input.amount < 0 {
        return Err(AppError::Validation(
            "Plan amount must not be negative".into(),
        ));
    }

    let plan = state.api.save_plan(input.ym, input.amount).await?;
    Ok(Json(plan))
}
