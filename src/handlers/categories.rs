use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::{Category, NewCategory};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryParams {
    #[serde(default)]
    pub include_inactive: bool,
}

#[derive(Debug, Serialize)]
pub struct CreatedCategory {
    pub id: i64,
    pub name: String,
}

pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<CategoryParams>,
) -> AppResult<Json<Vec<Category>>> {
    let categories = state.api.list_categories(params.include_inactive).await?;
    debug!(count = categories.len(), "Listed categories");
    Ok(Json(categories))
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<NewCategory>,
) -> AppResult<(StatusCode, Json<CreatedCategory>)> {
    let category = input
        .normalized()
        .ok_or_else(|| AppError::Validation("Category name is required".into()))?;

    let id = state.api.create_category(&category).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedCategory {
            id,
            name: category.name,
        }),
    ))
}
