use axum::extract::{Query, State};
use axum::response::Json;

use crate::error::{AppError, AppResult};
use crate::models::auth::OAuthCallbackParams;
use crate::models::TokenPair;
use crate::state::AppState;

/// Handle the provider redirect: trade `code` and `state` for backend tokens.
/// Storing the tokens is left to the caller.
pub async fn naver_callback(
    State(state): State<AppState>,
    Query(params): Query<OAuthCallbackParams>,
) -> AppResult<Json<TokenPair>> {
    let (code, oauth_state) = match (params.code, params.state) {
        (Some(code), Some(oauth_state)) if !code.is_empty() && !oauth_state.is_empty() => {
            (code, oauth_state)
        }
        _ => {
            return Err(AppError::Validation(
                "Missing code or state parameter".into(),
            ))
        }
    };

    let tokens = state.api.exchange_naver_code(&code, &oauth_state).await?;
    tracing::info!("OAuth login completed");
    Ok(Json(tokens))
}
