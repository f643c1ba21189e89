use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use tracing::{info, warn};

use crate::error::AppResult;
use crate::models::{ExpenditureId, ExpenditureRecord, ExpenditureUpdate, NewExpenditure};
use crate::state::AppState;

/// Log an expenditure.
///
/// The record is shown in the ledger as pending while the backend call is in
/// flight, and is dropped from the pending set if the backend rejects it.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<NewExpenditure>,
) -> AppResult<(StatusCode, Json<ExpenditureRecord>)> {
    input.validate()?;

    let temp_id = state.pending().push(&input);

    match state.api.add_spend(&input).await {
        Ok(id) => {
            state.pending().resolve(temp_id, id);
            Ok((
                StatusCode::CREATED,
                Json(input.pending_record(ExpenditureId::Server(id))),
            ))
        }
        Err(e) => {
            state.pending().discard(temp_id);
            warn!(%temp_id, error = %e, "Spend rejected, discarded pending entry");
            Err(e)
        }
    }
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ExpenditureRecord>> {
    let record = state.api.get_spend(id).await?;
    Ok(Json(record))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<NewExpenditure>,
) -> AppResult<StatusCode> {
    let update = ExpenditureUpdate {
        id,
        date: input.date,
        category_id: input.category_id,
        amount: input.amount,
        memo: input.memo,
    };
    update.validate()?;

    state.api.update_spend(&update).await?;
    if state.pending().amend(&update) {
        info!(spend_id = id, "Pending spend amended");
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<StatusCode> {
    state.api.delete_spend(id).await?;
    let was_pending = state.pending().forget(id);
    info!(spend_id = id, was_pending, "Spend removed");
    Ok(StatusCode::NO_CONTENT)
}
