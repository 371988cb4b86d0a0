use axum::{Json, extract::State};
use std::sync::Arc;
use tutorly_core::{
    models::ledger::{AddCreditsRequest, BalanceResponse, EarningsResponse, LedgerEntry},
    services,
};

use crate::{
    ApiState,
    middleware::{
        auth::CurrentUser,
        error_handling::{AppError, Success, success},
    },
};

#[axum::debug_handler]
pub async fn get_balance(
    State(state): State<Arc<ApiState>>,
    current: CurrentUser,
) -> Result<Json<BalanceResponse>, AppError> {
    let balance = services::ledger::get_balance(state.store.as_ref(), &current.identity).await?;
    Ok(Json(balance))
}

#[axum::debug_handler]
pub async fn ledger_entries(
    State(state): State<Arc<ApiState>>,
    current: CurrentUser,
) -> Result<Json<Vec<LedgerEntry>>, AppError> {
    let entries =
        services::ledger::ledger_entries(state.store.as_ref(), &current.identity).await?;
    Ok(Json(entries))
}

#[axum::debug_handler]
pub async fn get_earnings(
    State(state): State<Arc<ApiState>>,
    current: CurrentUser,
) -> Result<Json<EarningsResponse>, AppError> {
    let earnings = services::ledger::get_earnings(state.store.as_ref(), &current.identity).await?;
    Ok(Json(earnings))
}

/// Admin top-up of an account.
#[axum::debug_handler]
pub async fn add_credits(
    State(state): State<Arc<ApiState>>,
    current: CurrentUser,
    Json(payload): Json<AddCreditsRequest>,
) -> Result<Json<Success<BalanceResponse>>, AppError> {
    let balance =
        services::ledger::add_credits(state.store.as_ref(), &current.identity, &payload).await?;
    Ok(success(balance))
}
