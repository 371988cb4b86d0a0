use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use crate::{
    errors::{DomainError, DomainResult},
    models::{
        identity::{Identity, Role},
        ledger::{AddCreditsRequest, BalanceResponse, EarningsResponse, LedgerEntry},
    },
    services::{own_tutor_profile, require_admin},
    store::Store,
};

/// Balance of the account the caller pays from.
pub async fn get_balance(store: &dyn Store, identity: &Identity) -> DomainResult<BalanceResponse> {
    let account_id = identity.paying_account();
    let balance = store.get_balance(account_id).await?;
    Ok(BalanceResponse {
        account_id,
        balance,
    })
}

/// Grants credits to an account. Stands in for a payment-gateway purchase.
pub async fn add_credits(
    store: &dyn Store,
    identity: &Identity,
    request: &AddCreditsRequest,
) -> DomainResult<BalanceResponse> {
    require_admin(identity)?;
    if request.amount <= Decimal::ZERO {
        return Err(DomainError::Validation(
            "Credit amount must be greater than zero".to_string(),
        ));
    }
    if request.amount.scale() > 2 {
        return Err(DomainError::Validation(
            "Credit amount supports at most two decimal places".to_string(),
        ));
    }

    let balance = store.add_credits(request.account_id, request.amount).await?;
    info!(account_id = %request.account_id, amount = %request.amount, %balance, "credits added");
    Ok(BalanceResponse {
        account_id: request.account_id,
        balance,
    })
}

pub async fn get_earnings(store: &dyn Store, identity: &Identity) -> DomainResult<EarningsResponse> {
    let profile = own_tutor_profile(store, identity).await?;
    let earnings = store.get_earnings(profile.id).await?;
    Ok(EarningsResponse {
        tutor_id: profile.id,
        earnings,
    })
}

/// Ledger entries of the caller's paying account, plus earnings for tutors.
pub async fn ledger_entries(store: &dyn Store, identity: &Identity) -> DomainResult<Vec<LedgerEntry>> {
    let mut owners: Vec<Uuid> = vec![identity.paying_account()];
    if identity.role == Role::Tutor {
        if let Some(profile) = store.get_tutor_profile_by_user(identity.id).await? {
            owners.push(profile.id);
        }
    }
    store.list_ledger_entries(owners).await
}
